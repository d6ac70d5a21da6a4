use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::actions::Action;
use crate::bot::commands::{chat, diary, menu, notify, templates};
use crate::bot::handlers::{AppContext, EventContext, HandlerResult};
use crate::bot::router::{EventKind, Route};
use crate::utils::logging::log_command_error;

pub async fn callback_handler(bot: Bot, q: CallbackQuery, app: Arc<AppContext>) -> HandlerResult {
    // Stop the client's spinner whatever happens next.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(q.from.id.0 as i64));

    let ev = EventContext::new(bot, chat_id, &q.from, app);
    ev.register_user().await;

    let action = match ev.app.router.route(EventKind::Callback, data) {
        Route::Matched(action) => *action,
        Route::Unknown => {
            tracing::warn!(
                "Unknown callback '{}' from user {}({})",
                data,
                ev.username,
                ev.user_id
            );
            ev.feedback().unknown_command().await?;
            return Ok(());
        }
    };

    tracing::info!(
        "Callback '{}' -> {:?}{} from user {}({}) in chat {}",
        data,
        action,
        if action.is_privileged() { " [admin]" } else { "" },
        ev.username,
        ev.user_id,
        ev.chat_id
    );

    let result = dispatch_callback(&ev, action, data).await;
    if let Err(e) = &result {
        log_command_error(data, &ev.username, ev.user_id, &e.to_string());
    }
    result
}

async fn dispatch_callback(ev: &EventContext, action: Action, data: &str) -> HandlerResult {
    match action {
        Action::Start => menu::handle_start(ev).await,
        Action::Help => menu::handle_help(ev).await,
        Action::Menu => menu::handle_menu(ev).await,
        Action::Stop => menu::handle_stop(ev).await,
        Action::Chat => chat::handle_chat(ev).await,
        Action::Diary => diary::handle_diary(ev).await,
        Action::Exercise => diary::handle_exercise(ev).await,
        Action::DiaryType => diary::handle_diary_type(ev, data).await,
        Action::DiaryGender => diary::handle_diary_gender(ev, data).await,
        Action::NotifyMenu => notify::handle_notify_menu(ev).await,
        Action::NotifyKind => notify::handle_notify_kind(ev, data).await,
        Action::NotifyList => notify::handle_list(ev).await,
        Action::NotifyCustom => notify::handle_custom_start(ev).await,
        Action::NotifyCustomAt => notify::handle_custom_at(ev, data).await,
        Action::NotifySendAll => notify::handle_send_all(ev, data).await,
        Action::NotifySchedulePreset => notify::handle_schedule_preset(ev, data).await,
        Action::ScheduleType => notify::handle_schedule_type(ev, data).await,
        Action::CancelJob => notify::handle_cancel_callback(ev, data).await,
        Action::Templates => templates::handle_templates(ev).await,
        Action::TemplateUpdate => {
            // Needs free-form arguments, only reachable as a command.
            ev.feedback().unknown_command().await?;
            Ok(())
        }
    }
}
