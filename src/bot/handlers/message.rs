use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::actions::Action;
use crate::bot::commands::{chat, diary, menu, notify, split_command, templates};
use crate::bot::handlers::{AppContext, EventContext, HandlerResult};
use crate::bot::router::{EventKind, Route};
use crate::session::ConversationState;
use crate::utils::logging::{log_command_error, log_command_start};

pub async fn message_handler(bot: Bot, msg: Message, app: Arc<AppContext>) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        tracing::debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    let ev = EventContext::new(bot, msg.chat.id, user, app);
    ev.register_user().await;

    match split_command(text) {
        Some((name, args)) => handle_command(&ev, name, args).await,
        None => handle_text(&ev, text).await,
    }
}

async fn handle_command(ev: &EventContext, name: &str, args: &str) -> HandlerResult {
    tracing::info!(
        "Command '/{}' from user {}({}) in chat {}",
        name,
        ev.username,
        ev.user_id,
        ev.chat_id
    );

    let action = match ev.app.router.route(EventKind::Command, name) {
        Route::Matched(action) => *action,
        Route::Unknown => {
            tracing::debug!("Unknown command '/{}' from user {}", name, ev.user_id);
            ev.feedback().unknown_command().await?;
            return Ok(());
        }
    };

    let details = (!args.is_empty()).then_some(args);
    log_command_start(name, &ev.username, ev.user_id, details);

    let result = dispatch_command(ev, action, args).await;
    if let Err(e) = &result {
        log_command_error(name, &ev.username, ev.user_id, &e.to_string());
    }
    result
}

async fn dispatch_command(ev: &EventContext, action: Action, args: &str) -> HandlerResult {
    match action {
        Action::Start => menu::handle_start(ev).await,
        Action::Help => menu::handle_help(ev).await,
        Action::Menu => menu::handle_menu(ev).await,
        Action::Stop => menu::handle_stop(ev).await,
        Action::Chat => chat::handle_chat(ev).await,
        Action::Diary => diary::handle_diary(ev).await,
        Action::Exercise => diary::handle_exercise(ev).await,
        Action::NotifyMenu => notify::handle_notify_menu(ev).await,
        Action::NotifyList => notify::handle_list(ev).await,
        Action::CancelJob => notify::handle_cancel_command(ev, args).await,
        Action::Templates => templates::handle_templates(ev).await,
        Action::TemplateUpdate => templates::handle_template_update(ev, args).await,
        other => {
            tracing::warn!("Action {:?} is not reachable as a command", other);
            ev.feedback().unknown_command().await?;
            Ok(())
        }
    }
}

/// Free text goes to whatever conversation the user has open.
async fn handle_text(ev: &EventContext, text: &str) -> HandlerResult {
    let state = ev.app.sessions.conversation_state(ev.user_id).await;
    tracing::debug!("Text from user {} in state '{}'", ev.user_id, state);

    match state {
        ConversationState::Chat => chat::handle_chat_message(ev, text).await,
        ConversationState::DiaryEntry { kind, gender } => {
            diary::handle_diary_entry(ev, kind, gender, text).await
        }
        ConversationState::Exercise => diary::handle_exercise_feedback(ev, text).await,
        ConversationState::AwaitingCustomNotification => notify::handle_custom_text(ev, text).await,
        ConversationState::Diary => diary::handle_diary(ev).await,
        ConversationState::Unknown(label) => {
            tracing::warn!("User {} has unknown state '{}', resetting", ev.user_id, label);
            ev.app.sessions.clear_state(ev.user_id).await;
            menu::handle_idle_text(ev).await
        }
        ConversationState::Idle => menu::handle_idle_text(ev).await,
    }
}
