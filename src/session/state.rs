use std::fmt;

/// Which kind of diary entry the user is writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryKind {
    Personal,
    Gratitude,
    Emotions,
}

impl DiaryKind {
    pub const ALL: [DiaryKind; 3] = [DiaryKind::Personal, DiaryKind::Gratitude, DiaryKind::Emotions];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiaryKind::Personal => "personal",
            DiaryKind::Gratitude => "gratitude",
            DiaryKind::Emotions => "emotions",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(DiaryKind::Personal),
            "gratitude" => Some(DiaryKind::Gratitude),
            "emotions" => Some(DiaryKind::Emotions),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiaryKind::Personal => "📝 Personal diary",
            DiaryKind::Gratitude => "🙏 Gratitude diary",
            DiaryKind::Emotions => "🎭 Emotions diary",
        }
    }
}

/// Grammatical gender used to phrase generated replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Decoded form of the free-form state label kept in the session store.
///
/// Labels are decoded once, where an event enters the bot, so handlers never
/// split strings themselves. Labels this type does not recognize survive as
/// `Unknown` and encode back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Chat,
    Diary,
    DiaryEntry { kind: DiaryKind, gender: Gender },
    Exercise,
    AwaitingCustomNotification,
    Unknown(String),
}

const DIARY_ENTRY_PREFIX: &str = "diary_entry_";

impl ConversationState {
    pub fn decode(label: &str) -> Self {
        match label {
            "" => ConversationState::Idle,
            "chat" => ConversationState::Chat,
            "diary" => ConversationState::Diary,
            "exercise" => ConversationState::Exercise,
            "notify_custom_text" => ConversationState::AwaitingCustomNotification,
            other => other
                .strip_prefix(DIARY_ENTRY_PREFIX)
                .and_then(|rest| rest.split_once('_'))
                .and_then(|(kind, gender)| {
                    Some(ConversationState::DiaryEntry {
                        kind: DiaryKind::parse(kind)?,
                        gender: Gender::parse(gender)?,
                    })
                })
                .unwrap_or_else(|| ConversationState::Unknown(other.to_string())),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            ConversationState::Idle => String::new(),
            ConversationState::Chat => "chat".to_string(),
            ConversationState::Diary => "diary".to_string(),
            ConversationState::DiaryEntry { kind, gender } => {
                format!("{}{}_{}", DIARY_ENTRY_PREFIX, kind.as_str(), gender.as_str())
            }
            ConversationState::Exercise => "exercise".to_string(),
            ConversationState::AwaitingCustomNotification => "notify_custom_text".to_string(),
            ConversationState::Unknown(label) => label.clone(),
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationState::Idle => f.write_str("idle"),
            other => f.write_str(&other.encode()),
        }
    }
}
