use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::storage::models::NotificationKind;

/// Failure values returned by the session, scheduling and template layers.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("No active template for {0}")]
    NoActiveTemplate(NotificationKind),

    #[error("No template registered for {0}")]
    UnknownTemplate(NotificationKind),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Text generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    #[error("Delivery to {user_id} failed: {reason}")]
    Delivery { user_id: i64, reason: String },
}

impl BotError {
    pub fn validation(message: impl Into<String>) -> Self {
        BotError::Validation(message.into())
    }

    /// True for failures that should drop a single job or reply rather than
    /// surface as a storage fault.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            BotError::Generation(_) | BotError::GenerationTimeout(_) | BotError::NoActiveTemplate(_)
        )
    }
}

pub type BotResult<T> = Result<T, BotError>;
