pub mod auth_cmd;
pub mod completions;
pub mod config_cmd;
pub mod tasks;
