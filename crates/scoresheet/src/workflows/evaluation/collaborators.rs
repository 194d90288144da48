use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::payload::SubmissionPayload;

/// Storage abstraction for finished score records.
///
/// Returning `Ok` is taken as a successful save; nothing in the response is read back.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("record store unreachable: {0}")]
    Transport(String),
    #[error("record store rejected the record with status {status}")]
    Rejected { status: u16 },
}

/// Dialog capabilities supplied by whatever front end drives the session.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Suspends the calling workflow until the user answers.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Outcome message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn dismiss_after(mut self, duration: Duration) -> Self {
        self.auto_dismiss = Some(duration);
        self
    }
}
