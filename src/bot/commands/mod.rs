pub mod chat;
pub mod diary;
pub mod menu;
pub mod notify;
pub mod templates;

use teloxide::utils::command::BotCommands;

/// Commands shown to everyone.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Wellbeing bot commands:")]
pub enum Command {
    #[command(description = "Start the bot and show the menu")]
    Start,
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Show the main menu")]
    Menu,
    #[command(description = "Talk with the assistant")]
    Chat,
    #[command(description = "Write a diary entry")]
    Diary,
    #[command(description = "Get a short breathing exercise")]
    Exercise,
    #[command(description = "Leave the current conversation")]
    Stop,
}

/// Commands listed only for admins.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Admin commands:")]
pub enum AdminCommand {
    #[command(description = "Schedule or send notifications")]
    Notify,
    #[command(description = "List scheduled notifications")]
    Jobs,
    #[command(description = "Cancel a notification: /cancel <job_id>")]
    Cancel,
    #[command(description = "Show notification templates")]
    Templates,
    #[command(description = "Edit a template: /template <kind> <on|off> [prompt]")]
    Template,
}

/// Splits `/name@bot rest` into `("name", "rest")`.
pub fn split_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("/help"), Some(("help", "")));
        assert_eq!(split_command("/cancel  abc-123 "), Some(("cancel", "abc-123")));
        assert_eq!(split_command("/start@WellbeingBot"), Some(("start", "")));
        assert_eq!(
            split_command("/template diary on Write kindly"),
            Some(("template", "diary on Write kindly"))
        );
        assert_eq!(split_command("hello"), None);
        assert_eq!(split_command("/"), None);
    }

    #[test]
    fn test_command_descriptions() {
        let user = Command::descriptions().to_string();
        assert!(user.contains("/diary"));
        assert!(!user.contains("/notify"));

        let admin = AdminCommand::descriptions().to_string();
        assert!(admin.contains("/template"));
    }
}
