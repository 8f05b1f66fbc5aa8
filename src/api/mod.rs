//! Typed client for the remote task store.
//!
//! One seam, two implementations: [`TaskApi`] is the interface the board
//! drives; [`HttpTaskApi`] is the real reqwest client against the four task
//! routes. Tests drive the board with in-memory doubles instead.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::board::Task;

/// Errors from the remote task store.
///
/// The board treats every variant identically — log one line and move on —
/// so this taxonomy exists only to make the log line say what happened.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Common interface to the remote task store.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the full ordered task sequence.
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// Create a task with this title. The store assigns the id and returns
    /// the complete record.
    async fn create(&self, title: &str) -> Result<Task, ApiError>;

    /// Flip the completion flag server-side. The response body is not
    /// consumed.
    async fn toggle(&self, id: &str) -> Result<(), ApiError>;

    /// Remove the task server-side.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct CreateTask<'a> {
    title: &'a str,
}

/// HTTP implementation of [`TaskApi`].
///
/// Routes, relative to the configured base URL:
///   GET    /api/tasks
///   POST   /api/tasks                 {"title": ...}
///   PUT    /api/tasks/{id}/complete
///   DELETE /api/tasks/{id}
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Per-request cap — a stuck store must not wedge the client for longer.
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let resp = ok_or_status(self.client.get(self.tasks_url()).send().await?)?;
        Ok(resp.json().await?)
    }

    async fn create(&self, title: &str) -> Result<Task, ApiError> {
        let resp = ok_or_status(
            self.client
                .post(self.tasks_url())
                .json(&CreateTask { title })
                .send()
                .await?,
        )?;
        Ok(resp.json().await?)
    }

    async fn toggle(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/{id}/complete", self.tasks_url());
        ok_or_status(self.client.put(url).send().await?)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/{id}", self.tasks_url());
        ok_or_status(self.client.delete(url).send().await?)?;
        Ok(())
    }
}

fn ok_or_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status(resp.status()))
    }
}
