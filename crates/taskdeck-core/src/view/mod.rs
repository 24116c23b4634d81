//! Derived view state: pure filtering, search, and aggregate counts over
//! the canonical task collection. Nothing here mutates the collection;
//! everything is recomputed per render, which is cheap at personal-list
//! sizes.

use serde::Serialize;

use crate::models::{Task, TaskPriority, TaskStatus};

/// Filter and search criteria. `None` means "all" for either dimension;
/// an empty search string matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: String,
}

impl TaskFilter {
    /// Whether a task is visible under these criteria. Search is
    /// case-insensitive substring matching over the task text.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.is_none_or(|status| task.status == status);
        let priority_ok = self
            .priority
            .is_none_or(|priority| task.priority == priority);
        let search = self.search.trim();
        let search_ok = search.is_empty()
            || task
                .text
                .to_lowercase()
                .contains(&search.to_lowercase());

        status_ok && priority_ok && search_ok
    }

    /// The visible subset of the collection, preserving order.
    #[must_use]
    pub fn visible<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.search.trim().is_empty()
    }
}

/// Aggregate counts over the *unfiltered* canonical collection. Status is
/// binary, so `completed + pending == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
}

impl TaskCounts {
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        let high_priority = tasks
            .iter()
            .filter(|task| task.priority == TaskPriority::High)
            .count();

        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
            high_priority,
        }
    }
}
