use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{AdminCommand, Command};
use crate::bot::handlers::{EventContext, HandlerResult};
use crate::bot::keyboards;
use crate::utils::feedback::FeedbackType;

pub async fn handle_start(ev: &EventContext) -> HandlerResult {
    ev.app.sessions.clear_state(ev.user_id).await;

    ev.bot
        .send_message(
            ev.chat_id,
            "🌿 Welcome!\n\nI can listen when you want to talk, help you keep a diary \
             and suggest short exercises to slow down.\n\nChoose what you need:",
        )
        .reply_markup(keyboards::main_menu(ev.app.sessions.is_admin(ev.user_id)))
        .await?;
    Ok(())
}

pub async fn handle_help(ev: &EventContext) -> HandlerResult {
    let mut text = Command::descriptions().to_string();
    if ev.app.sessions.is_admin(ev.user_id) {
        text.push_str("\n\n");
        text.push_str(&AdminCommand::descriptions().to_string());
    }
    ev.bot.send_message(ev.chat_id, text).await?;
    Ok(())
}

pub async fn handle_menu(ev: &EventContext) -> HandlerResult {
    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            "Main menu",
            keyboards::main_menu(ev.app.sessions.is_admin(ev.user_id)),
        )
        .await?;
    Ok(())
}

pub async fn handle_stop(ev: &EventContext) -> HandlerResult {
    ev.app.sessions.clear_state(ev.user_id).await;
    ev.feedback()
        .success("Conversation closed. Use /menu whenever you want to come back.")
        .await?;
    Ok(())
}

/// Free text while no conversation is open.
pub async fn handle_idle_text(ev: &EventContext) -> HandlerResult {
    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            "Pick what you would like to do first:",
            keyboards::main_menu(ev.app.sessions.is_admin(ev.user_id)),
        )
        .await?;
    Ok(())
}
