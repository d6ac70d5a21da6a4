use chrono::{DateTime, Duration, FixedOffset, Utc};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::payload;
use crate::session::{DiaryKind, Gender};
use crate::storage::models::{NotificationKind, ScheduledJob};
use crate::utils::datetime::{format_datetime, next_local_hour};

/// Start menu; admins also get the notifications entry.
pub fn main_menu(is_admin: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![
            InlineKeyboardButton::callback("💬 Talk", "chat_start"),
            InlineKeyboardButton::callback("📔 Diary", "diary_start"),
        ],
        vec![InlineKeyboardButton::callback("🧘 Exercise", "exercise_start")],
    ];
    if is_admin {
        rows.push(vec![InlineKeyboardButton::callback("📣 Notifications", "notify_menu")]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// One button per diary type.
pub fn diary_types() -> InlineKeyboardMarkup {
    let rows = DiaryKind::ALL
        .iter()
        .map(|kind| vec![InlineKeyboardButton::callback(kind.label(), payload::diary_type(*kind))])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

/// Gender choice for the diary prompt.
pub fn diary_genders(kind: DiaryKind) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("👨 Male", payload::diary_gender(kind, Gender::Male)),
        InlineKeyboardButton::callback("👩 Female", payload::diary_gender(kind, Gender::Female)),
    ]])
}

/// Admin notification menu: generated kinds, custom text and the job list.
pub fn notify_menu() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = NotificationKind::GENERATED
        .iter()
        .map(|kind| vec![InlineKeyboardButton::callback(kind.label(), payload::notify_kind(*kind))])
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        NotificationKind::Custom.label(),
        "notify_custom",
    )]);
    rows.push(vec![InlineKeyboardButton::callback("📋 Scheduled", "notify_list")]);
    InlineKeyboardMarkup::new(rows)
}

/// Relative presets carry an absolute timestamp; fixed-hour presets carry the
/// local date and time.
pub fn notify_time_presets(
    kind: NotificationKind,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![InlineKeyboardButton::callback("🚀 Send to everyone now", payload::send_all(kind))],
        vec![
            InlineKeyboardButton::callback(
                "In 1 hour",
                payload::schedule_preset(kind, &(now + Duration::hours(1))),
            ),
            InlineKeyboardButton::callback(
                "In 3 hours",
                payload::schedule_preset(kind, &(now + Duration::hours(3))),
            ),
        ],
    ];

    let fixed_hours: Vec<InlineKeyboardButton> = [9, 20]
        .iter()
        .filter_map(|hour| next_local_hour(now, *hour, offset))
        .map(|at| {
            InlineKeyboardButton::callback(
                format_datetime(&at, offset),
                payload::schedule_type(&at, kind, offset),
            )
        })
        .collect();
    if !fixed_hours.is_empty() {
        rows.push(fixed_hours);
    }

    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", "notify_menu")]);
    InlineKeyboardMarkup::new(rows)
}

/// Send times offered after a custom text is entered.
pub fn custom_time_presets(now: DateTime<Utc>, offset: &FixedOffset) -> InlineKeyboardMarkup {
    let mut times = vec![
        ("In 10 minutes".to_string(), now + Duration::minutes(10)),
        ("In 1 hour".to_string(), now + Duration::hours(1)),
    ];
    for hour in [9, 20] {
        if let Some(at) = next_local_hour(now, hour, offset) {
            times.push((format_datetime(&at, offset), at));
        }
    }

    let rows = times
        .into_iter()
        .map(|(label, at)| vec![InlineKeyboardButton::callback(label, payload::custom_at(&at))])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

/// Cancel buttons under a job listing; Telegram allows about 100 buttons per
/// message.
pub const MAX_JOB_BUTTONS: usize = 30;

/// One cancel button per job, capped at `MAX_JOB_BUTTONS`.
pub fn job_list(jobs: &[ScheduledJob], offset: &FixedOffset) -> InlineKeyboardMarkup {
    let rows = jobs
        .iter()
        .take(MAX_JOB_BUTTONS)
        .map(|job| {
            vec![InlineKeyboardButton::callback(
                format!("❌ {} · {}", job.kind, format_datetime(&job.send_at, offset)),
                payload::cancel_job(&job.id),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}
