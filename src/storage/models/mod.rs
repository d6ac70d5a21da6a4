pub mod job;
pub mod template;

pub use job::*;
pub use template::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of notification kinds a job or template can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Diary,
    Exercise,
    Motivation,
    Custom,
}

impl NotificationKind {
    /// Kinds whose content comes from a template.
    pub const GENERATED: [NotificationKind; 3] = [
        NotificationKind::Diary,
        NotificationKind::Exercise,
        NotificationKind::Motivation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Diary => "diary",
            NotificationKind::Exercise => "exercise",
            NotificationKind::Motivation => "motivation",
            NotificationKind::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Diary => "📔 Diary reminder",
            NotificationKind::Exercise => "🧘 Exercise reminder",
            NotificationKind::Motivation => "✨ Motivation",
            NotificationKind::Custom => "✉️ Custom message",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diary" => Ok(NotificationKind::Diary),
            "exercise" => Ok(NotificationKind::Exercise),
            "motivation" => Ok(NotificationKind::Motivation),
            "custom" => Ok(NotificationKind::Custom),
            other => Err(anyhow::anyhow!("Unknown notification kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("diary".parse::<NotificationKind>().unwrap(), NotificationKind::Diary);
        assert_eq!(" Exercise ".parse::<NotificationKind>().unwrap(), NotificationKind::Exercise);
        assert!("weather".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationKind::Motivation).unwrap();
        assert_eq!(json, "\"motivation\"");
    }
}
