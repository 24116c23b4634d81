//! Auth client for the task API's `/login` and `/register` endpoints.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

/// An established session: the bearer token the task API hands out on login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Durable storage for the session token across invocations.
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn load(&self) -> AuthResult<Option<Session>>;
    fn save(&self, session: &Session) -> AuthResult<()>;
    fn clear(&self) -> AuthResult<()>;
}

#[derive(Clone)]
pub struct AuthClient<S: SessionStore> {
    base_url: String,
    client: Client,
    store: S,
}

impl<S: SessionStore> AuthClient<S> {
    pub fn new(base_url: impl AsRef<str>, store: S) -> AuthResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Session previously stored by a successful login, if any.
    pub fn restore(&self) -> AuthResult<Option<Session>> {
        self.store.load()
    }

    /// `POST /login` with the given credentials. A `{token}` response
    /// establishes and persists a session; anything else surfaces the
    /// server's own message when it supplies one.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        validate_credentials(username, password)?;

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let body = response.text().await?;
        let parsed = serde_json::from_str::<LoginResponse>(&body).unwrap_or_default();

        match parsed.token {
            Some(token) if !token.trim().is_empty() => {
                let session = Session::new(token);
                self.store.save(&session)?;
                Ok(session)
            }
            _ => Err(AuthError::Api(
                parsed
                    .message
                    .or(parsed.error)
                    .unwrap_or_else(|| "Login failed".to_string()),
            )),
        }
    }

    /// `POST /register`. Validation (matching confirmation, minimum
    /// password length) runs before any network call.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> AuthResult<String> {
        validate_signup(username, password, confirm_password)?;

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/register", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<LoginResponse>(&body).unwrap_or_default();

        let message = parsed.message.clone();
        if status.is_success() && message.as_deref() == Some("User registered successfully") {
            Ok(message.unwrap_or_default())
        } else {
            Err(AuthError::Api(
                message
                    .or(parsed.error)
                    .unwrap_or_else(|| "Signup failed".to_string()),
            ))
        }
    }

    /// Drop the stored session. The API has no logout endpoint; a session
    /// ends when the client forgets the token.
    pub fn logout(&self) -> AuthResult<()> {
        self.store.clear()
    }
}

pub fn normalize_base_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "API base URL must not be empty",
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthError::InvalidConfiguration(
            "API base URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_credentials(username: &str, password: &str) -> AuthResult<()> {
    if username.trim().is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    Ok(())
}

/// Signup-side validation, checked client-side so that bad input never
/// issues a network call.
pub fn validate_signup(username: &str, password: &str, confirm_password: &str) -> AuthResult<()> {
    validate_credentials(username, password)?;
    if password != confirm_password {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    message: Option<String>,
    error: Option<String>,
}
