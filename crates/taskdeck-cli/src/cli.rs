use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use taskdeck_core::view::TaskFilter;
use taskdeck_core::{TaskPriority, TaskStatus};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Manage your TaskMaster tasks from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the task API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token in the keyring
    Login {
        /// Account username
        #[arg(long, value_name = "NAME")]
        username: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create a new account
    Signup {
        /// Account username
        #[arg(long, value_name = "NAME")]
        username: String,
        /// Account password (at least 6 characters)
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Must match --password
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List tasks with optional filters
    List {
        /// Show only tasks with this status
        #[arg(long, value_enum, default_value_t = StatusFilterArg::All)]
        status: StatusFilterArg,
        /// Show only tasks with this priority
        #[arg(long, value_enum, default_value_t = PriorityFilterArg::All)]
        priority: PriorityFilterArg,
        /// Case-insensitive substring match on task text
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
        /// Output the visible tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new task
    Add {
        /// Task text
        text: Vec<String>,
        /// Priority for the new task
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// Toggle a task between pending and completed
    #[command(alias = "done")]
    Toggle {
        /// Task ID
        id: String,
    },
    /// Set a task's priority
    Priority {
        /// Task ID
        id: String,
        /// New priority level
        #[arg(value_enum)]
        level: PriorityArg,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Show or update CLI configuration
    Config {
        /// Persist a new API base URL
        #[arg(long, value_name = "URL")]
        set_api_url: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusFilterArg {
    All,
    Pending,
    Completed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PriorityFilterArg {
    All,
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

impl From<StatusFilterArg> for Option<TaskStatus> {
    fn from(value: StatusFilterArg) -> Self {
        match value {
            StatusFilterArg::All => None,
            StatusFilterArg::Pending => Some(TaskStatus::Pending),
            StatusFilterArg::Completed => Some(TaskStatus::Completed),
        }
    }
}

impl From<PriorityFilterArg> for Option<TaskPriority> {
    fn from(value: PriorityFilterArg) -> Self {
        match value {
            PriorityFilterArg::All => None,
            PriorityFilterArg::Low => Some(TaskPriority::Low),
            PriorityFilterArg::Medium => Some(TaskPriority::Medium),
            PriorityFilterArg::High => Some(TaskPriority::High),
        }
    }
}

pub fn build_filter(
    status: StatusFilterArg,
    priority: PriorityFilterArg,
    search: Option<&str>,
) -> TaskFilter {
    TaskFilter {
        status: status.into(),
        priority: priority.into(),
        search: search.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn all_filter_args_map_to_none() {
        let filter = build_filter(StatusFilterArg::All, PriorityFilterArg::All, None);
        assert_eq!(filter, TaskFilter::default());
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn specific_filter_args_map_to_core_values() {
        let filter = build_filter(
            StatusFilterArg::Pending,
            PriorityFilterArg::High,
            Some("milk"),
        );
        assert_eq!(filter.status, Some(TaskStatus::Pending));
        assert_eq!(filter.priority, Some(TaskPriority::High));
        assert_eq!(filter.search, "milk");
    }

    #[test]
    fn priority_arg_converts_to_core_priority() {
        assert_eq!(TaskPriority::from(PriorityArg::Low), TaskPriority::Low);
        assert_eq!(TaskPriority::from(PriorityArg::High), TaskPriority::High);
    }
}
