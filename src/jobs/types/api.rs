//! Collaborators the job store talks to: persistence and notifications

use crate::jobs::types::job::{Job, JobForm, JobPatch};

use async_trait::async_trait;
use thiserror::Error;

/// A remote call did not succeed. The store never re-throws these, it
/// reverts and notifies instead
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Job not found: {0}")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Row store for job records. Mutations return the full stored record
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Job>, ApiError>;
    async fn create(&self, form: &JobForm) -> Result<Job, ApiError>;
    async fn update(&self, id: i32, patch: &JobPatch) -> Result<Job, ApiError>;
    async fn delete(&self, id: i32) -> Result<(), ApiError>;
}

/// Fire-and-forget user facing messages
pub trait Notifier {
    fn notify_success(&self, msg: &str);
    fn notify_error(&self, msg: &str);
}

/// Sends notifications to the log
#[derive(Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&self, msg: &str) {
        log::info!("{}", msg);
    }

    fn notify_error(&self, msg: &str) {
        log::error!("{}", msg);
    }
}
