use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NotificationKind;

/// A persisted request to deliver a notification at `send_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: String,
    pub kind: NotificationKind,
    pub send_at: DateTime<Utc>,
    /// Empty means every known user.
    #[serde(default)]
    pub recipients: Vec<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precomputed_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

/// Where a due job's text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JobContent<'a> {
    Literal(&'a str),
    Generate(NotificationKind),
}

impl ScheduledJob {
    /// A job whose text is produced from the kind's template at delivery time,
    /// unless `precomputed_message` is non-empty.
    pub fn generated(
        kind: NotificationKind,
        send_at: DateTime<Utc>,
        recipients: Vec<i64>,
        precomputed_message: Option<String>,
    ) -> Self {
        Self {
            id: new_job_id(),
            kind,
            send_at,
            recipients,
            created_at: Utc::now(),
            precomputed_message,
            custom_text: None,
        }
    }

    pub fn custom(text: String, send_at: DateTime<Utc>, recipients: Vec<i64>) -> Self {
        Self {
            id: new_job_id(),
            kind: NotificationKind::Custom,
            send_at,
            recipients,
            created_at: Utc::now(),
            precomputed_message: None,
            custom_text: Some(text),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.send_at <= now
    }

    pub fn is_broadcast(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Custom text wins over a precomputed message; anything else is generated.
    pub fn content(&self) -> JobContent<'_> {
        if let Some(text) = self.custom_text.as_deref() {
            return JobContent::Literal(text);
        }
        match self.precomputed_message.as_deref() {
            Some(message) if !message.trim().is_empty() => JobContent::Literal(message),
            _ => JobContent::Generate(self.kind),
        }
    }
}

/// UUIDv7 ids are unique and sort by creation time.
fn new_job_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_custom_job_carries_text() {
        let job = ScheduledJob::custom("Hello".to_string(), Utc::now(), vec![]);
        assert_eq!(job.kind, NotificationKind::Custom);
        assert_eq!(job.content(), JobContent::Literal("Hello"));
        assert!(job.is_broadcast());
    }

    #[test]
    fn test_empty_precomputed_message_means_generate() {
        let job = ScheduledJob::generated(
            NotificationKind::Diary,
            Utc::now(),
            vec![1],
            Some("  ".to_string()),
        );
        assert_eq!(job.content(), JobContent::Generate(NotificationKind::Diary));

        let job = ScheduledJob::generated(
            NotificationKind::Diary,
            Utc::now(),
            vec![1],
            Some("Write today".to_string()),
        );
        assert_eq!(job.content(), JobContent::Literal("Write today"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ScheduledJob::generated(NotificationKind::Motivation, Utc::now(), vec![], None);
        let b = ScheduledJob::generated(NotificationKind::Motivation, Utc::now(), vec![], None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        let job = ScheduledJob::generated(NotificationKind::Exercise, now, vec![], None);
        assert!(job.is_due(now));
        assert!(!job.is_due(now - Duration::seconds(1)));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let job = ScheduledJob::generated(NotificationKind::Exercise, Utc::now(), vec![], None);
        let json = serde_json::to_string(&job).unwrap();
        assert!(!json.contains("custom_text"));
        assert!(!json.contains("precomputed_message"));
        assert!(json.contains("\"kind\":\"exercise\""));
    }
}
