//! taskdeck-core - Core library for taskdeck
//!
//! This crate contains the shared models, API clients, and board logic
//! used by the taskdeck CLI. It owns no UI concerns: callers bind the
//! board and view computations to whatever front end they like.

pub mod api;
pub mod auth;
pub mod board;
pub mod error;
pub mod models;
pub mod view;

pub use error::{Error, Result};
pub use models::{Task, TaskPriority, TaskStatus};
