use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};

use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Processing,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Processing => "⏳",
        }
    }

    fn format(&self, message: &str) -> String {
        format!("{} {}", self.emoji(), escape_markdown(message))
    }
}

pub const UNKNOWN_COMMAND: &str = "Unknown command. Use /help to see what I can do.";
pub const INVALID_DATA: &str = "Invalid data. Please open the menu and try again.";
pub const ACCESS_DENIED: &str = "This action is not available.";
pub const RATE_LIMITED: &str = "You are sending messages too quickly, please wait a moment.";

/// Replies to one chat with consistently formatted MarkdownV2 messages.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    /// Create a feedback instance for the given chat
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    /// Send feedback with appropriate formatting
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, feedback_type.format(message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Send feedback with an inline keyboard attached
    pub async fn send_with_keyboard(
        &self,
        feedback_type: FeedbackType,
        message: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, feedback_type.format(message))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboard)
            .await
    }

    /// Send processing indicator
    pub async fn send_processing(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Processing, message).await
    }

    /// Update an existing message with new feedback
    pub async fn update_message(
        &self,
        message_id: MessageId,
        feedback_type: FeedbackType,
        message: &str,
    ) -> ResponseResult<Message> {
        self.bot
            .edit_message_text(self.chat_id, message_id, feedback_type.format(message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Send success feedback
    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    /// Send error feedback
    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    /// Send warning feedback
    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    /// Send info feedback
    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 Suggestion: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }

    /// Points the user at /help
    pub async fn unknown_command(&self) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, UNKNOWN_COMMAND).await
    }

    /// Stale or malformed button data
    pub async fn invalid_data(&self) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, INVALID_DATA).await
    }

    /// Generic refusal; never says why.
    pub async fn denied(&self) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, ACCESS_DENIED).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Processing.emoji(), "⏳");
    }

    #[test]
    fn test_format_escapes_message() {
        assert_eq!(
            FeedbackType::Error.format(INVALID_DATA),
            "❌ Invalid data\\. Please open the menu and try again\\."
        );
    }
}
