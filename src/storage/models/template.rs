use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NotificationKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub kind: NotificationKind,
    pub name: String,
    pub prompt: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationTemplate {
    pub fn new(kind: NotificationKind, name: &str, prompt: &str) -> Self {
        let now = Utc::now();
        Self {
            kind,
            name: name.to_string(),
            prompt: prompt.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Templates written on first startup.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                NotificationKind::Diary,
                "Diary reminder",
                "Write a short, warm reminder (2-3 sentences) inviting the reader to spend \
                 five minutes on their diary today. Suggest one gentle question they could \
                 reflect on. Do not use greetings or sign-offs.",
            ),
            Self::new(
                NotificationKind::Exercise,
                "Exercise reminder",
                "Describe one simple breathing or grounding exercise that takes under three \
                 minutes. Give numbered steps, keep it under 80 words and end with an \
                 encouraging line.",
            ),
            Self::new(
                NotificationKind::Motivation,
                "Daily motivation",
                "Write one short motivational message (at most 3 sentences) about small \
                 steps, self-kindness and steady progress. Avoid cliches and exclamation \
                 marks.",
            ),
        ]
    }
}
