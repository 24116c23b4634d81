//! Task subcommands: list, add, toggle, priority, delete.

use taskdeck_core::api::HttpTaskClient;
use taskdeck_core::board::TaskBoard;
use taskdeck_core::view::{TaskCounts, TaskFilter};
use taskdeck_core::{Error, Task, TaskPriority, TaskStatus};

use crate::error::CliError;
use crate::session::{clear_stored_session, load_stored_session};

pub async fn run_list(api_url: &str, filter: &TaskFilter, as_json: bool) -> Result<(), CliError> {
    let mut board = open_board(api_url)?;
    refresh(&mut board).await?;

    let tasks = board.tasks();
    let visible = filter.visible(tasks);
    let counts = TaskCounts::of(tasks);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        if tasks.is_empty() {
            println!("No tasks yet. Add your first task!");
        } else {
            println!("No tasks match the current filters.");
        }
    } else {
        for task in &visible {
            println!("{}", format_task_line(task));
        }
    }

    println!(
        "{} total, {} completed, {} pending, {} high priority",
        counts.total, counts.completed, counts.pending, counts.high_priority
    );
    Ok(())
}

pub async fn run_add(
    api_url: &str,
    text_parts: &[String],
    priority: TaskPriority,
) -> Result<(), CliError> {
    let text = text_parts.join(" ");
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::EmptyTaskText);
    }

    let mut board = open_board(api_url)?;
    let task = board
        .add(text, priority)
        .await
        .map_err(map_task_error)?;
    println!("{}", task.id);
    Ok(())
}

pub async fn run_toggle(api_url: &str, id: &str) -> Result<(), CliError> {
    let id = require_task_id(id)?;
    let mut board = open_board(api_url)?;
    refresh(&mut board).await?;

    match board.toggle_status(&id).await {
        Ok(status) => {
            println!("Task {id} is now {status}");
            Ok(())
        }
        Err(error) => Err(surface_failure(&mut board, error)),
    }
}

pub async fn run_priority(api_url: &str, id: &str, priority: TaskPriority) -> Result<(), CliError> {
    let id = require_task_id(id)?;
    let mut board = open_board(api_url)?;
    refresh(&mut board).await?;

    match board.set_priority(&id, priority).await {
        Ok(()) => {
            println!("Task {id} priority set to {priority}");
            Ok(())
        }
        Err(error) => Err(surface_failure(&mut board, error)),
    }
}

pub async fn run_delete(api_url: &str, id: &str) -> Result<(), CliError> {
    let id = require_task_id(id)?;
    let mut board = open_board(api_url)?;
    board.delete(&id).await.map_err(map_task_error)?;
    println!("{id}");
    Ok(())
}

fn open_board(api_url: &str) -> Result<TaskBoard<HttpTaskClient>, CliError> {
    let session = load_stored_session()
        .map_err(|error| CliError::Auth(error.to_string()))?
        .ok_or(CliError::NotSignedIn)?;
    let client = HttpTaskClient::new(api_url, &session)?;
    Ok(TaskBoard::new(client))
}

async fn refresh(board: &mut TaskBoard<HttpTaskClient>) -> Result<(), CliError> {
    board.refresh().await.map_err(map_task_error)
}

/// Print the board's rollback notices before reporting the error itself.
fn surface_failure(board: &mut TaskBoard<HttpTaskClient>, error: Error) -> CliError {
    for notice in board.take_notices() {
        eprintln!("{notice}");
    }
    map_task_error(error)
}

/// A 401 after login means the token is no longer good; drop it so the
/// next command starts from a clean "not signed in" state.
fn map_task_error(error: Error) -> CliError {
    if matches!(error, Error::Unauthorized) {
        if let Err(clear_error) = clear_stored_session() {
            tracing::warn!("failed to clear rejected session: {clear_error}");
        }
        return CliError::SessionRevoked;
    }
    CliError::Core(error)
}

fn require_task_id(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTaskId)
    } else {
        Ok(trimmed.to_string())
    }
}

fn format_task_line(task: &Task) -> String {
    let marker = match task.status {
        TaskStatus::Pending => "[ ]",
        TaskStatus::Completed => "[x]",
    };
    format!(
        "{:<24}  {marker}  {:<6}  {}",
        task.id, task.priority, task.text
    )
}
