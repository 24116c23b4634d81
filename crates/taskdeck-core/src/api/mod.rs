//! Task repository client for the remote task API.
//!
//! The API is reached over HTTPS with a bearer token. Response shapes are
//! not uniform: a task may arrive bare or wrapped in a `{message, task}`
//! envelope, and a list may arrive bare or as `{tasks: [...]}`. All of
//! that is normalized here, at the decode boundary, so callers only ever
//! see [`Task`] values.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::auth::Session;
use crate::error::{parse_api_error, Error, Result};
use crate::models::{Task, TaskPriority, TaskStatus};

/// Operations the board needs from the remote task store.
///
/// [`HttpTaskClient`] is the production implementation; tests drive the
/// board with in-memory fakes instead of a live server.
#[allow(async_fn_in_trait)]
pub trait TaskApi {
    /// Fetch the full task collection.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Create a task; the server assigns the id and initial pending status.
    async fn create_task(&self, text: &str, priority: TaskPriority) -> Result<Task>;

    /// Delete a task by id.
    async fn delete_task(&self, id: &str) -> Result<()>;

    /// Set a task's status. Returns the server's view of the task, or
    /// `None` when the response carried no recognizable task.
    async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Option<Task>>;

    /// Set a task's priority, with the same response contract as
    /// [`TaskApi::set_status`].
    async fn set_priority(&self, id: &str, priority: TaskPriority) -> Result<Option<Task>>;
}

/// HTTP implementation of [`TaskApi`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTaskClient {
    base_url: String,
    token: String,
    client: Client,
}

impl HttpTaskClient {
    /// Build a client bound to one session. Callers guarantee a session
    /// exists before constructing; an empty token is a programmer error.
    pub fn new(base_url: impl Into<String>, session: &Session) -> Result<Self> {
        let token = session.token.trim().to_string();
        if token.is_empty() {
            return Err(Error::InvalidInput(
                "session token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: Client::builder().build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send an authenticated request and return the response body, mapping
    /// 401 to [`Error::Unauthorized`] and any other non-2xx status to
    /// [`Error::Api`] with the server's own message where available.
    async fn send_checked(&self, request: RequestBuilder) -> Result<String> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::Api(parse_api_error(status.as_u16(), &body)));
        }
        Ok(body)
    }
}

impl TaskApi for HttpTaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let body = self.send_checked(self.client.get(self.url("/tasks"))).await?;
        let payload = serde_json::from_str::<TaskListPayload>(&body)?;
        Ok(payload.into_tasks())
    }

    async fn create_task(&self, text: &str, priority: TaskPriority) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput(
                "task text must not be empty".to_string(),
            ));
        }

        let payload = serde_json::json!({
            "text": text,
            "status": TaskStatus::Pending,
            "priority": priority,
        });
        let body = self
            .send_checked(self.client.post(self.url("/tasks")).json(&payload))
            .await?;
        decode_task(&body).ok_or_else(|| {
            Error::Api("Create response did not include the new task".to_string())
        })
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let id = require_id(id)?;
        self.send_checked(self.client.delete(self.url(&format!("/tasks/{id}"))))
            .await?;
        Ok(())
    }

    async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Option<Task>> {
        let id = require_id(id)?;
        let payload = serde_json::json!({ "status": status });
        let body = self
            .send_checked(
                self.client
                    .put(self.url(&format!("/tasks/{id}")))
                    .json(&payload),
            )
            .await?;
        Ok(decode_task(&body))
    }

    async fn set_priority(&self, id: &str, priority: TaskPriority) -> Result<Option<Task>> {
        let id = require_id(id)?;
        let payload = serde_json::json!({ "priority": priority });
        let body = self
            .send_checked(
                self.client
                    .patch(self.url(&format!("/tasks/{id}/priority")))
                    .json(&payload),
            )
            .await?;
        Ok(decode_task(&body))
    }
}

fn require_id(id: &str) -> Result<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(Error::InvalidInput("task id must not be empty".to_string()))
    } else {
        Ok(trimmed)
    }
}

/// A task-shaped response body: either the task itself or a
/// `{message, task}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskPayload {
    Envelope { task: Task },
    Bare(Task),
}

impl TaskPayload {
    fn into_task(self) -> Task {
        match self {
            Self::Envelope { task } | Self::Bare(task) => task,
        }
    }
}

/// Decode a task from a response body, unwrapping the envelope when
/// present. `None` means the body held no recognizable task; callers
/// decide what that means for them (the board keeps its optimistic value).
fn decode_task(body: &str) -> Option<Task> {
    serde_json::from_str::<TaskPayload>(body)
        .ok()
        .map(TaskPayload::into_task)
}

/// A list-shaped response body: either the array itself or `{tasks: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskListPayload {
    Bare(Vec<Task>),
    Envelope { tasks: Vec<Task> },
}

impl TaskListPayload {
    fn into_tasks(self) -> Vec<Task> {
        match self {
            Self::Bare(tasks) | Self::Envelope { tasks } => tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_task_json() -> &'static str {
        r#"{"_id": "t1", "text": "Write report", "status": "pending", "priority": "high"}"#
    }

    #[test]
    fn decode_task_accepts_bare_task() {
        let task = decode_task(sample_task_json()).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn decode_task_unwraps_envelope() {
        let body = format!(r#"{{"message": "Task updated", "task": {}}}"#, sample_task_json());
        let task = decode_task(&body).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.text, "Write report");
    }

    #[test]
    fn decode_task_envelope_and_bare_agree() {
        let bare = decode_task(sample_task_json()).unwrap();
        let wrapped =
            decode_task(&format!(r#"{{"task": {}}}"#, sample_task_json())).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn decode_task_rejects_message_only_body() {
        assert_eq!(decode_task(r#"{"message": "Task updated"}"#), None);
        assert_eq!(decode_task("not json"), None);
    }

    #[test]
    fn list_payload_accepts_bare_array() {
        let body = format!("[{}]", sample_task_json());
        let tasks = serde_json::from_str::<TaskListPayload>(&body)
            .unwrap()
            .into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
    }

    #[test]
    fn list_payload_unwraps_tasks_envelope() {
        let body = format!(r#"{{"tasks": [{}]}}"#, sample_task_json());
        let tasks = serde_json::from_str::<TaskListPayload>(&body)
            .unwrap()
            .into_tasks();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn client_rejects_empty_session_token() {
        let session = Session::new("   ");
        let result = HttpTaskClient::new("https://tasks.example.com", &session);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn require_id_rejects_blank_ids() {
        assert!(matches!(require_id("  "), Err(Error::InvalidInput(_))));
        assert_eq!(require_id(" t1 ").unwrap(), "t1");
    }
}
