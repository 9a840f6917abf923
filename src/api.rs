use std::time::Duration;

use crate::domain::{Todo, TodoDraft, TodoId, User};

/// Failure of a remote call. Two variants so logs can tell a refused
/// connection from a server-side rejection; callers treat both the same way:
/// the operation did not happen remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },
}

impl ApiError {
    fn status(method: &'static str, url: &str, status: reqwest::StatusCode) -> Self {
        Self::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
        }
    }

    fn transport(method: &'static str, url: &str, err: reqwest::Error) -> Self {
        Self::Transport {
            method,
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status {
                method,
                url,
                status,
            } => {
                write!(f, "{method} {url} returned status {status}")
            }
            Self::Transport {
                method,
                url,
                message,
            } => {
                write!(f, "{method} {url} failed: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Thin client for the task API: `/todos` and `/users` under one base URL.
/// Holds no task state; every method is a single request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: String, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("td")
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .expect("reqwest client");
        Self { base, client }
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let url = format!("{}/todos", self.base.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::transport("GET", &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status("GET", &url, status));
        }
        resp.json::<Vec<Todo>>()
            .await
            .map_err(|e| ApiError::transport("GET", &url, e))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = format!("{}/users", self.base.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::transport("GET", &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status("GET", &url, status));
        }
        resp.json::<Vec<User>>()
            .await
            .map_err(|e| ApiError::transport("GET", &url, e))
    }

    /// POST the draft and return the server's echo of the created task.
    pub async fn create_todo(&self, draft: &TodoDraft) -> Result<Todo, ApiError> {
        let url = format!("{}/todos", self.base.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ApiError::transport("POST", &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status("POST", &url, status));
        }
        resp.json::<Todo>()
            .await
            .map_err(|e| ApiError::transport("POST", &url, e))
    }

    /// Partial update: the body carries only `completed`.
    pub async fn set_todo_completed(&self, id: TodoId, completed: bool) -> Result<(), ApiError> {
        let url = format!("{}/todos/{id}", self.base.trim_end_matches('/'));
        let body = serde_json::json!({ "completed": completed });
        let resp = self
            .client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::transport("PATCH", &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status("PATCH", &url, status));
        }
        Ok(())
    }

    pub async fn delete_todo(&self, id: TodoId) -> Result<(), ApiError> {
        let url = format!("{}/todos/{id}", self.base.trim_end_matches('/'));
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::transport("DELETE", &url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status("DELETE", &url, status));
        }
        Ok(())
    }
}
