//! Data models

mod task;

pub use task::{Task, TaskPriority, TaskStatus};
