//! The task board: the client's canonical task collection and the
//! optimistic-update machinery that keeps it consistent with the server.
//!
//! Status and priority edits apply locally first, then reconcile with the
//! server's response; a failed call restores the pre-mutation snapshot
//! wholesale. Add and delete are confirm-first instead: the id is
//! server-assigned, so there is nothing sensible to insert optimistically,
//! and an optimistic removal would resurrect a task on failure.

use crate::api::TaskApi;
use crate::error::{Error, Result};
use crate::models::{Task, TaskPriority, TaskStatus};

/// Load state of the canonical collection, driven by [`TaskBoard::refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// The canonical task collection plus the sync engine that mutates it.
///
/// Single-writer: the board is driven from one logical call stack at a
/// time. Overlapping mutations on *different* ids are safe because each
/// failure restores its own snapshot; overlapping mutations on the *same*
/// id race and the last response to land wins. That race is an accepted
/// limitation of the server contract, not something the board papers over.
pub struct TaskBoard<A: TaskApi> {
    api: A,
    tasks: Vec<Task>,
    state: LoadState,
    notices: Vec<String>,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            state: LoadState::Idle,
            notices: Vec::new(),
        }
    }

    /// The canonical collection, in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Failure notices recorded by rolled-back mutations, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Drain pending failure notices for display.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the collection with the server's. On failure the collection
    /// is cleared rather than left partially updated: a board in the
    /// `Error` state holds no tasks the caller could mistake for current.
    pub async fn refresh(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        match self.api.list_tasks().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "refreshed task collection");
                self.tasks = tasks;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(error) => {
                tracing::warn!("task refresh failed: {error}");
                self.tasks.clear();
                self.state = LoadState::Error;
                Err(error)
            }
        }
    }

    /// Create a task and append it once the server confirms. No optimistic
    /// insert: the id is server-assigned and a premature row would need a
    /// reconciliation key the client cannot invent.
    pub async fn add(&mut self, text: &str, priority: TaskPriority) -> Result<Task> {
        let task = self.api.create_task(text, priority).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Delete a task, removing it from the collection only after the
    /// server confirms.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.api.delete_task(id).await?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }

    /// Toggle a task between pending and completed, optimistically.
    pub async fn toggle_status(&mut self, id: &str) -> Result<TaskStatus> {
        let current = self.find(id)?.status;
        let proposed = current.toggled();

        let before = self.tasks.clone();
        self.apply(id, |task| task.status = proposed);

        match self.api.set_status(id, proposed).await {
            Ok(confirmed) => {
                self.reconcile(id, confirmed);
                Ok(proposed)
            }
            Err(error) => {
                self.roll_back(before, format!("Failed to update status for task {id}"));
                Err(error)
            }
        }
    }

    /// Set a task's priority, optimistically.
    pub async fn set_priority(&mut self, id: &str, priority: TaskPriority) -> Result<()> {
        self.find(id)?;

        let before = self.tasks.clone();
        self.apply(id, |task| task.priority = priority);

        match self.api.set_priority(id, priority).await {
            Ok(confirmed) => {
                self.reconcile(id, confirmed);
                Ok(())
            }
            Err(error) => {
                self.roll_back(before, format!("Failed to update priority for task {id}"));
                Err(error)
            }
        }
    }

    fn find(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Mutate the single targeted task in place; ordering and every other
    /// task stay untouched.
    fn apply(&mut self, id: &str, mutate: impl FnOnce(&mut Task)) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            mutate(task);
        }
    }

    /// Fold the server's confirmed task into the *current* collection (not
    /// the optimistic snapshot, in case other mutations interleaved). A
    /// response without a recognizable task keeps the optimistic value.
    fn reconcile(&mut self, id: &str, confirmed: Option<Task>) {
        match confirmed {
            Some(task) => {
                tracing::debug!(id, "reconciled task with server response");
                self.apply(id, |slot| *slot = task);
            }
            None => {
                tracing::debug!(id, "server response held no task; keeping optimistic value");
            }
        }
    }

    fn roll_back(&mut self, before: Vec<Task>, notice: String) {
        tracing::warn!("{notice}; rolling back optimistic update");
        self.tasks = before;
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    /// In-memory stand-in for the remote API. Individual operations can be
    /// scripted to fail to exercise the rollback paths.
    #[derive(Default)]
    struct FakeApi {
        tasks: RefCell<Vec<Task>>,
        next_id: RefCell<u32>,
        fail_status: bool,
        fail_priority: bool,
        fail_delete: bool,
        fail_list: bool,
        /// Respond to updates with a message-only body (no task).
        respond_without_task: bool,
    }

    impl FakeApi {
        fn seeded(tasks: Vec<Task>) -> Self {
            Self {
                tasks: RefCell::new(tasks),
                ..Self::default()
            }
        }

        fn transport_error() -> Error {
            Error::Api("service unavailable (503)".to_string())
        }
    }

    impl TaskApi for FakeApi {
        async fn list_tasks(&self) -> Result<Vec<Task>> {
            if self.fail_list {
                return Err(Self::transport_error());
            }
            Ok(self.tasks.borrow().clone())
        }

        async fn create_task(&self, text: &str, priority: TaskPriority) -> Result<Task> {
            if text.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "task text must not be empty".to_string(),
                ));
            }
            let mut next_id = self.next_id.borrow_mut();
            *next_id += 1;
            let task = Task {
                id: format!("t{next_id}"),
                text: text.trim().to_string(),
                status: TaskStatus::Pending,
                priority,
            };
            self.tasks.borrow_mut().push(task.clone());
            Ok(task)
        }

        async fn delete_task(&self, id: &str) -> Result<()> {
            if self.fail_delete {
                return Err(Self::transport_error());
            }
            self.tasks.borrow_mut().retain(|task| task.id != id);
            Ok(())
        }

        async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Option<Task>> {
            if self.fail_status {
                return Err(Self::transport_error());
            }
            let mut tasks = self.tasks.borrow_mut();
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            task.status = status;
            if self.respond_without_task {
                return Ok(None);
            }
            Ok(Some(task.clone()))
        }

        async fn set_priority(&self, id: &str, priority: TaskPriority) -> Result<Option<Task>> {
            if self.fail_priority {
                return Err(Self::transport_error());
            }
            let mut tasks = self.tasks.borrow_mut();
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            task.priority = priority;
            if self.respond_without_task {
                return Ok(None);
            }
            Ok(Some(task.clone()))
        }
    }

    fn task(id: &str, text: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            status,
            priority,
        }
    }

    fn pending(id: &str, text: &str) -> Task {
        task(id, text, TaskStatus::Pending, TaskPriority::Medium)
    }

    #[tokio::test]
    async fn add_on_empty_board_yields_pending_task() {
        let mut board = TaskBoard::new(FakeApi::default());
        board.refresh().await.unwrap();
        assert!(board.tasks().is_empty());

        let added = board.add("Write report", TaskPriority::High).await.unwrap();
        assert_eq!(added.status, TaskStatus::Pending);
        assert_eq!(added.priority, TaskPriority::High);
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].text, "Write report");
    }

    #[tokio::test]
    async fn add_rejects_empty_text_without_changing_board() {
        let mut board = TaskBoard::new(FakeApi::default());
        let error = board.add("   ", TaskPriority::Medium).await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
        assert!(board.tasks().is_empty());
    }

    #[tokio::test]
    async fn toggle_twice_returns_to_original_status() {
        let api = FakeApi::seeded(vec![pending("t1", "Buy milk")]);
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        let first = board.toggle_status("t1").await.unwrap();
        assert_eq!(first, TaskStatus::Completed);
        assert_eq!(board.tasks()[0].status, TaskStatus::Completed);

        let second = board.toggle_status("t1").await.unwrap();
        assert_eq!(second, TaskStatus::Pending);
        assert_eq!(board.tasks()[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn failed_status_update_rolls_back_elementwise() {
        let api = FakeApi {
            fail_status: true,
            ..FakeApi::seeded(vec![pending("t1", "Buy milk"), pending("t2", "Walk dog")])
        };
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();
        let before = board.tasks().to_vec();

        let error = board.toggle_status("t1").await.unwrap_err();
        assert!(matches!(error, Error::Api(_)));
        assert_eq!(board.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn failed_priority_update_keeps_priority_and_records_notice() {
        let api = FakeApi {
            fail_priority: true,
            ..FakeApi::seeded(vec![task(
                "t1",
                "Buy milk",
                TaskStatus::Pending,
                TaskPriority::Low,
            )])
        };
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.set_priority("t1", TaskPriority::High).await.unwrap_err();
        assert_eq!(board.tasks()[0].priority, TaskPriority::Low);

        let notices = board.take_notices();
        assert_eq!(notices, vec!["Failed to update priority for task t1"]);
        assert!(board.notices().is_empty());
    }

    #[tokio::test]
    async fn update_without_recognizable_task_keeps_optimistic_value() {
        let api = FakeApi {
            respond_without_task: true,
            ..FakeApi::seeded(vec![pending("t1", "Buy milk")])
        };
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.toggle_status("t1").await.unwrap();
        assert_eq!(board.tasks()[0].status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_not_found_and_makes_no_call() {
        let api = FakeApi {
            // Would fail loudly if the board reached the network.
            fail_status: true,
            ..FakeApi::seeded(vec![pending("t1", "Buy milk")])
        };
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        let error = board.toggle_status("missing").await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
        assert!(board.notices().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_only_after_confirmation() {
        let api = FakeApi::seeded(vec![pending("t1", "Buy milk"), pending("t2", "Walk dog")]);
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.delete("t1").await.unwrap();
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].id, "t2");
    }

    #[tokio::test]
    async fn failed_delete_leaves_collection_untouched() {
        let api = FakeApi {
            fail_delete: true,
            ..FakeApi::seeded(vec![pending("t1", "Buy milk")])
        };
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.delete("t1").await.unwrap_err();
        assert_eq!(board.tasks().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_clears_collection_and_sets_error_state() {
        let api = FakeApi {
            fail_list: true,
            ..FakeApi::seeded(vec![pending("t1", "Buy milk")])
        };
        let mut board = TaskBoard::new(api);
        assert_eq!(board.state(), LoadState::Idle);

        board.refresh().await.unwrap_err();
        assert!(board.tasks().is_empty());
        assert_eq!(board.state(), LoadState::Error);
    }

    #[tokio::test]
    async fn refresh_reaches_ready_state() {
        let api = FakeApi::seeded(vec![pending("t1", "Buy milk")]);
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();
        assert_eq!(board.state(), LoadState::Ready);
        assert_eq!(board.tasks().len(), 1);
    }

    #[tokio::test]
    async fn rollback_restores_only_its_own_snapshot() {
        // A mutation on t2 lands between t1's snapshot and rollback; the
        // rollback of t1 must not undo it. Sequential here, but the
        // snapshots compose the same way overlapping ones would.
        let api = FakeApi::seeded(vec![pending("t1", "Buy milk"), pending("t2", "Walk dog")]);
        let mut board = TaskBoard::new(api);
        board.refresh().await.unwrap();

        board.toggle_status("t2").await.unwrap();
        assert_eq!(board.tasks()[1].status, TaskStatus::Completed);

        // t1's snapshot now already includes t2's completion.
        let before = board.tasks().to_vec();
        board.api.fail_status = true;
        board.toggle_status("t1").await.unwrap_err();
        assert_eq!(board.tasks(), before.as_slice());
        assert_eq!(board.tasks()[1].status, TaskStatus::Completed);
    }
}
