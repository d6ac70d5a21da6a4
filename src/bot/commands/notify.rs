use chrono::{DateTime, FixedOffset, Utc};

use crate::bot::handlers::{EventContext, HandlerResult};
use crate::bot::keyboards;
use crate::bot::payload;
use crate::error::BotResult;
use crate::session::ConversationState;
use crate::storage::models::{NotificationKind, ScheduledJob};
use crate::utils::datetime::format_datetime;
use crate::utils::feedback::FeedbackType;
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_validation_error,
};
use crate::utils::markdown::preview;
use crate::utils::validation::{validate_job_id, validate_notification_text, validate_send_time};

pub async fn handle_notify_menu(ev: &EventContext) -> HandlerResult {
    if !ev.require_admin("notify_menu").await? {
        return Ok(());
    }

    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            "What kind of notification do you want to send?",
            keyboards::notify_menu(),
        )
        .await?;
    Ok(())
}

pub async fn handle_notify_kind(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("notify_kind").await? {
        return Ok(());
    }

    let kind = match parse_or_reply(ev, "notify_kind", data, payload::parse_notify_kind(data)).await? {
        Some(kind) => kind,
        None => return Ok(()),
    };
    if kind == NotificationKind::Custom {
        return handle_custom_start(ev).await;
    }

    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            &format!("{}: when should it go out?", kind.label()),
            keyboards::notify_time_presets(kind, Utc::now(), &ev.app.offset),
        )
        .await?;
    Ok(())
}

pub async fn handle_schedule_preset(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("notify_schedule_preset").await? {
        return Ok(());
    }

    let parsed = payload::parse_schedule_preset(data).map(|(kind, at)| (at, kind));
    match parse_or_reply(ev, "notify_schedule_preset", data, parsed).await? {
        Some((send_at, kind)) => schedule_generated(ev, send_at, kind).await,
        None => Ok(()),
    }
}

pub async fn handle_schedule_type(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("schedule_type").await? {
        return Ok(());
    }

    let parsed = payload::parse_schedule_type(data, &ev.app.offset);
    match parse_or_reply(ev, "schedule_type", data, parsed).await? {
        Some((send_at, kind)) => schedule_generated(ev, send_at, kind).await,
        None => Ok(()),
    }
}

async fn schedule_generated(
    ev: &EventContext,
    send_at: DateTime<Utc>,
    kind: NotificationKind,
) -> HandlerResult {
    if let Err(e) = validate_send_time(send_at, Utc::now()) {
        log_validation_error("schedule", &send_at.to_rfc3339(), &e.to_string(), &ev.username, ev.user_id);
        ev.feedback()
            .validation_error(&e.to_string(), "Open /notify again to pick a fresh time.")
            .await?;
        return Ok(());
    }

    if kind == NotificationKind::Custom {
        ev.feedback().invalid_data().await?;
        return Ok(());
    }

    log_command_start("schedule", &ev.username, ev.user_id, Some(kind.as_str()));
    match ev.app.notifications.schedule(send_at, kind, Vec::new()).await {
        Ok(job_id) => {
            log_command_success("schedule", &ev.username, ev.user_id, Some(&job_id));
            ev.feedback()
                .success(&format!(
                    "{} scheduled for {}.\nID: {}",
                    kind.label(),
                    format_datetime(&send_at, &ev.app.offset),
                    job_id
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("schedule", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error("Could not save the notification.").await?;
        }
    }
    Ok(())
}

pub async fn handle_send_all(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("notify_send_all").await? {
        return Ok(());
    }

    let kind = match parse_or_reply(ev, "notify_send_all", data, payload::parse_send_all(data)).await? {
        Some(kind) if kind != NotificationKind::Custom => kind,
        Some(_) => {
            ev.feedback().invalid_data().await?;
            return Ok(());
        }
        None => return Ok(()),
    };

    log_command_start("send_all", &ev.username, ev.user_id, Some(kind.as_str()));
    let processing = ev.feedback().send_processing("Generating and sending…").await?;

    match ev.app.notifications.broadcast_now(kind).await {
        Ok(report) => {
            log_command_success(
                "send_all",
                &ev.username,
                ev.user_id,
                Some(&format!("{} delivered, {} failed", report.delivered, report.failed)),
            );
            ev.feedback()
                .update_message(
                    processing.id,
                    FeedbackType::Success,
                    &format!(
                        "{} sent to {} user(s), {} failed.",
                        kind.label(),
                        report.delivered,
                        report.failed
                    ),
                )
                .await?;
        }
        Err(e) => {
            log_command_error("send_all", &ev.username, ev.user_id, &e.to_string());
            ev.feedback()
                .update_message(processing.id, FeedbackType::Error, "Nothing was sent: the text could not be generated.")
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_custom_start(ev: &EventContext) -> HandlerResult {
    if !ev.require_admin("notify_custom").await? {
        return Ok(());
    }

    ev.app
        .sessions
        .set_conversation_state(ev.user_id, &ConversationState::AwaitingCustomNotification)
        .await;
    ev.feedback()
        .info("Send me the text of the notification. Use /stop to cancel.")
        .await?;
    Ok(())
}

/// The text is kept in the admin's session; the time buttons only carry a
/// timestamp.
pub async fn handle_custom_text(ev: &EventContext, text: &str) -> HandlerResult {
    if !ev.require_admin("notify_custom_text").await? {
        return Ok(());
    }

    let text = match validate_notification_text(text) {
        Ok(text) => text,
        Err(e) => {
            log_validation_error("notify_custom_text", &preview(text, 40), &e.to_string(), &ev.username, ev.user_id);
            ev.feedback()
                .validation_error(&e.to_string(), "Send a shorter, non-empty message.")
                .await?;
            return Ok(());
        }
    };

    ev.app
        .sessions
        .set_state_data(
            ev.user_id,
            &ConversationState::AwaitingCustomNotification.encode(),
            &text,
        )
        .await;

    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            &format!("Preview:\n\n{}\n\nWhen should it be sent?", preview(&text, 300)),
            keyboards::custom_time_presets(Utc::now(), &ev.app.offset),
        )
        .await?;
    Ok(())
}

pub async fn handle_custom_at(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("notify_custom_at").await? {
        return Ok(());
    }

    let send_at = match parse_or_reply(ev, "notify_custom_at", data, payload::parse_custom_at(data)).await? {
        Some(send_at) => send_at,
        None => return Ok(()),
    };

    let (state, text) = ev.app.sessions.get_state_data(ev.user_id).await;
    if ConversationState::decode(&state) != ConversationState::AwaitingCustomNotification
        || text.trim().is_empty()
    {
        log_validation_error("notify_custom_at", data, "no pending custom text", &ev.username, ev.user_id);
        ev.feedback().invalid_data().await?;
        return Ok(());
    }

    if let Err(e) = validate_send_time(send_at, Utc::now()) {
        ev.feedback()
            .validation_error(&e.to_string(), "Send the text again to get fresh time options.")
            .await?;
        return Ok(());
    }

    match ev.app.notifications.schedule_custom(send_at, &text, Vec::new()).await {
        Ok(job_id) => {
            ev.app.sessions.clear_state(ev.user_id).await;
            log_command_success("notify_custom_at", &ev.username, ev.user_id, Some(&job_id));
            ev.feedback()
                .success(&format!(
                    "Custom message scheduled for {}.\nID: {}",
                    format_datetime(&send_at, &ev.app.offset),
                    job_id
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("notify_custom_at", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error("Could not save the notification.").await?;
        }
    }
    Ok(())
}

pub async fn handle_list(ev: &EventContext) -> HandlerResult {
    if !ev.require_admin("notify_list").await? {
        return Ok(());
    }

    let jobs = match ev.app.notifications.list().await {
        Ok(jobs) => jobs,
        Err(e) => {
            log_command_error("notify_list", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error("Could not read the schedule.").await?;
            return Ok(());
        }
    };

    if jobs.is_empty() {
        ev.feedback().info("No notifications are scheduled.").await?;
        return Ok(());
    }

    let pages = listing_pages(&jobs, &ev.app.offset);
    let Some((last, rest)) = pages.split_last() else {
        return Ok(());
    };
    for page in rest {
        ev.feedback().info(page).await?;
    }
    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            last,
            keyboards::job_list(&jobs, &ev.app.offset),
        )
        .await?;
    Ok(())
}

/// Characters per listing message; Telegram caps a message at 4096.
const LIST_PAGE_CHARS: usize = 3500;

fn job_entry(job: &ScheduledJob, offset: &FixedOffset) -> String {
    let audience = if job.is_broadcast() {
        "all users".to_string()
    } else {
        format!("{} user(s)", job.recipients.len())
    };
    let mut entry = format!(
        "\n• {} · {} · {}\n  {}",
        job.kind.label(),
        format_datetime(&job.send_at, offset),
        audience,
        job.id
    );
    if let Some(custom) = &job.custom_text {
        entry.push_str(&format!("\n  “{}”", preview(custom, 60)));
    }
    entry
}

/// Splits the job listing into messages of at most `LIST_PAGE_CHARS`
/// characters. The last page says how to cancel jobs without a button.
fn listing_pages(jobs: &[ScheduledJob], offset: &FixedOffset) -> Vec<String> {
    let footer = if jobs.len() > keyboards::MAX_JOB_BUTTONS {
        format!(
            "\n\nButtons cover the first {} jobs. Use /cancel <id> for the rest.",
            keyboards::MAX_JOB_BUTTONS
        )
    } else {
        "\n\nTap a button or use /cancel <id> to cancel.".to_string()
    };

    let mut pages = Vec::new();
    let mut page = format!("{} scheduled notification(s):\n", jobs.len());
    for job in jobs {
        let entry = job_entry(job, offset);
        if page.chars().count() + entry.chars().count() > LIST_PAGE_CHARS {
            pages.push(std::mem::take(&mut page));
        }
        page.push_str(&entry);
    }
    if page.chars().count() + footer.chars().count() > LIST_PAGE_CHARS {
        pages.push(std::mem::take(&mut page));
    }
    page.push_str(&footer);
    pages.push(page);
    pages
}

pub async fn handle_cancel_callback(ev: &EventContext, data: &str) -> HandlerResult {
    if !ev.require_admin("notify_cancel").await? {
        return Ok(());
    }

    match parse_or_reply(ev, "notify_cancel", data, payload::parse_cancel_job(data)).await? {
        Some(job_id) => cancel(ev, &job_id).await,
        None => Ok(()),
    }
}

/// `/cancel <job_id>`
pub async fn handle_cancel_command(ev: &EventContext, args: &str) -> HandlerResult {
    if !ev.require_admin("cancel").await? {
        return Ok(());
    }

    let job_id = args.trim();
    if let Err(e) = validate_job_id(job_id) {
        log_validation_error("cancel", job_id, &e.to_string(), &ev.username, ev.user_id);
        ev.feedback()
            .validation_error(&e.to_string(), "Use /jobs to see the IDs of scheduled notifications.")
            .await?;
        return Ok(());
    }
    cancel(ev, job_id).await
}

async fn cancel(ev: &EventContext, job_id: &str) -> HandlerResult {
    match ev.app.notifications.cancel(job_id).await {
        Ok(true) => {
            log_command_success("cancel", &ev.username, ev.user_id, Some(job_id));
            ev.feedback().success("Notification cancelled.").await?;
        }
        Ok(false) => {
            ev.feedback()
                .warning("That notification no longer exists. It may have been sent already.")
                .await?;
        }
        Err(e) => {
            log_command_error("cancel", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error("Could not update the schedule.").await?;
        }
    }
    Ok(())
}

/// Unwraps a parsed payload, or tells the user the data was invalid.
async fn parse_or_reply<T>(
    ev: &EventContext,
    context: &str,
    data: &str,
    parsed: BotResult<T>,
) -> HandlerResult<Option<T>> {
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log_validation_error(context, data, &e.to_string(), &ev.username, ev.user_id);
            ev.feedback().invalid_data().await?;
            Ok(None)
        }
    }
}
