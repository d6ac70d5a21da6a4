//! Callback data: underscore-joined verb and positional fields.
//!
//! Each builder has a matching parser; parsers reject payloads with the wrong
//! number of fields or unparseable values with a validation error.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{BotError, BotResult};
use crate::session::{DiaryKind, Gender};
use crate::storage::models::NotificationKind;
use crate::utils::datetime::{local_date_time_parts, parse_local_datetime, parse_unix_timestamp};
use crate::utils::validation::validate_job_id;

/// Telegram rejects callback data longer than this.
pub const MAX_CALLBACK_BYTES: usize = 64;

/// Splits `data` into exactly `expected` non-empty fields.
fn fields(data: &str, expected: usize) -> BotResult<Vec<&str>> {
    let parts: Vec<&str> = data.split('_').collect();
    if parts.len() != expected || parts.iter().any(|p| p.is_empty()) {
        return Err(BotError::validation(format!(
            "'{}' has {} field(s), expected {}",
            data,
            parts.len(),
            expected
        )));
    }
    Ok(parts)
}

fn kind_field(value: &str) -> BotResult<NotificationKind> {
    value
        .parse()
        .map_err(|e: anyhow::Error| BotError::validation(e.to_string()))
}

fn timestamp_field(value: &str) -> BotResult<DateTime<Utc>> {
    parse_unix_timestamp(value).map_err(|e| BotError::validation(e.to_string()))
}

fn diary_kind_field(value: &str) -> BotResult<DiaryKind> {
    DiaryKind::parse(value)
        .ok_or_else(|| BotError::validation(format!("Unknown diary type '{value}'")))
}

/// Diary type picker button.
pub fn diary_type(kind: DiaryKind) -> String {
    format!("diary_type_{}", kind.as_str())
}

/// `diary_type_<kind>`
pub fn parse_diary_type(data: &str) -> BotResult<DiaryKind> {
    let parts = fields(data, 3)?;
    diary_kind_field(parts[2])
}

/// Gender picker button for a chosen diary type.
pub fn diary_gender(kind: DiaryKind, gender: Gender) -> String {
    format!("diary_gender_{}_{}", kind.as_str(), gender.as_str())
}

/// `diary_gender_<kind>_<gender>`
pub fn parse_diary_gender(data: &str) -> BotResult<(DiaryKind, Gender)> {
    let parts = fields(data, 4)?;
    let kind = diary_kind_field(parts[2])?;
    let gender = Gender::parse(parts[3])
        .ok_or_else(|| BotError::validation(format!("Unknown gender '{}'", parts[3])))?;
    Ok((kind, gender))
}

/// Notification kind submenu button.
pub fn notify_kind(kind: NotificationKind) -> String {
    format!("notify_kind_{kind}")
}

/// `notify_kind_<kind>`
pub fn parse_notify_kind(data: &str) -> BotResult<NotificationKind> {
    let parts = fields(data, 3)?;
    kind_field(parts[2])
}

/// Schedule button carrying a local date and time.
pub fn schedule_type(send_at: &DateTime<Utc>, kind: NotificationKind, offset: &FixedOffset) -> String {
    let (date, time) = local_date_time_parts(send_at, offset);
    format!("schedule_type_{date}_{time}_{kind}")
}

/// `schedule_type_<YYYY-MM-DD>_<HH:MM>_<kind>`, date and time in the
/// reference zone.
pub fn parse_schedule_type(data: &str, offset: &FixedOffset) -> BotResult<(DateTime<Utc>, NotificationKind)> {
    let parts = fields(data, 5)?;
    let send_at = parse_local_datetime(parts[2], parts[3], offset)
        .map_err(|e| BotError::validation(e.to_string()))?;
    Ok((send_at, kind_field(parts[4])?))
}

/// Time preset button for a generated notification.
pub fn schedule_preset(kind: NotificationKind, send_at: &DateTime<Utc>) -> String {
    format!("notify_schedule_preset_{}_{}", kind, send_at.timestamp())
}

/// `notify_schedule_preset_<kind>_<unix_ts>`
pub fn parse_schedule_preset(data: &str) -> BotResult<(NotificationKind, DateTime<Utc>)> {
    let parts = fields(data, 5)?;
    Ok((kind_field(parts[3])?, timestamp_field(parts[4])?))
}

/// Immediate broadcast button.
pub fn send_all(kind: NotificationKind) -> String {
    format!("notify_send_all_{kind}")
}

/// `notify_send_all_<kind>`
pub fn parse_send_all(data: &str) -> BotResult<NotificationKind> {
    let parts = fields(data, 4)?;
    kind_field(parts[3])
}

/// The text itself stays in the admin's session data.
pub fn custom_at(send_at: &DateTime<Utc>) -> String {
    format!("notify_custom_at_{}", send_at.timestamp())
}

/// `notify_custom_at_<unix_ts>`
pub fn parse_custom_at(data: &str) -> BotResult<DateTime<Utc>> {
    let parts = fields(data, 4)?;
    timestamp_field(parts[3])
}

/// Cancel button for one scheduled job.
pub fn cancel_job(job_id: &str) -> String {
    format!("notify_cancel_{job_id}")
}

/// `notify_cancel_<job_id>`
pub fn parse_cancel_job(data: &str) -> BotResult<String> {
    let job_id = data
        .strip_prefix("notify_cancel_")
        .ok_or_else(|| BotError::validation(format!("'{data}' is not a cancel payload")))?;
    validate_job_id(job_id).map_err(|e| BotError::validation(e.to_string()))?;
    Ok(job_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::reference_offset;

    #[test]
    fn test_short_payloads_are_rejected() {
        let offset = reference_offset(3).unwrap();
        assert!(parse_diary_type("diary_type").is_err());
        assert!(parse_diary_gender("diary_gender_personal").is_err());
        assert!(parse_schedule_type("schedule_type_2026-10-16_09:00", &offset).is_err());
        assert!(parse_schedule_preset("notify_schedule_preset_diary").is_err());
        assert!(parse_send_all("notify_send_all_").is_err());
        assert!(parse_custom_at("notify_custom_at").is_err());
        assert!(parse_cancel_job("notify_cancel_").is_err());
    }

    #[test]
    fn test_extra_fields_are_rejected() {
        let offset = reference_offset(3).unwrap();
        assert!(parse_send_all("notify_send_all_diary_x").is_err());
        assert!(parse_notify_kind("notify_kind_diary_extra").is_err());
        assert!(parse_diary_type("diary_type_personal_male").is_err());
        assert!(parse_diary_gender("diary_gender_personal_male_1").is_err());
        assert!(parse_schedule_type("schedule_type_2026-10-16_09:00_diary_x", &offset).is_err());
        assert!(parse_schedule_preset("notify_schedule_preset_diary_1767225600_9").is_err());
        assert!(parse_custom_at("notify_custom_at_1767225600_1").is_err());
        assert!(parse_cancel_job("notify_cancel_abc_def").is_err());
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let offset = reference_offset(3).unwrap();
        assert!(parse_diary_type("diary_type_work").is_err());
        assert!(parse_diary_gender("diary_gender_personal_robot").is_err());
        assert!(parse_schedule_type("schedule_type_2026-02-30_09:00_diary", &offset).is_err());
        assert!(parse_schedule_type("schedule_type_2026-10-16_09:00_weather", &offset).is_err());
        assert!(parse_schedule_preset("notify_schedule_preset_diary_soon").is_err());
        assert!(parse_cancel_job("notify_cancel_../../etc").is_err());
    }

    #[test]
    fn test_schedule_type_fields_in_reference_zone() {
        let offset = reference_offset(3).unwrap();
        let (send_at, kind) =
            parse_schedule_type("schedule_type_2026-10-16_09:00_motivation", &offset).unwrap();
        assert_eq!(kind, NotificationKind::Motivation);
        assert_eq!(send_at.to_rfc3339(), "2026-10-16T06:00:00+00:00");
        assert_eq!(
            schedule_type(&send_at, kind, &offset),
            "schedule_type_2026-10-16_09:00_motivation"
        );
    }

    #[test]
    fn test_preset_and_custom_payloads() {
        let send_at = parse_unix_timestamp("1767225600").unwrap();
        let preset = schedule_preset(NotificationKind::Exercise, &send_at);
        assert_eq!(preset, "notify_schedule_preset_exercise_1767225600");
        assert_eq!(
            parse_schedule_preset(&preset).unwrap(),
            (NotificationKind::Exercise, send_at)
        );
        assert_eq!(parse_custom_at(&custom_at(&send_at)).unwrap(), send_at);
    }

    #[test]
    fn test_diary_payloads() {
        let data = diary_gender(DiaryKind::Emotions, Gender::Female);
        assert_eq!(data, "diary_gender_emotions_female");
        assert_eq!(
            parse_diary_gender(&data).unwrap(),
            (DiaryKind::Emotions, Gender::Female)
        );
        assert_eq!(parse_diary_type(&diary_type(DiaryKind::Personal)).unwrap(), DiaryKind::Personal);
    }

    #[test]
    fn test_payloads_fit_telegram_limit() {
        let offset = reference_offset(3).unwrap();
        let send_at = parse_unix_timestamp("4102444800").unwrap();
        let job_id = "0192a3b4-5c6d-7e8f-9a0b-1c2d3e4f5a6b";
        let payloads = [
            schedule_preset(NotificationKind::Motivation, &send_at),
            schedule_type(&send_at, NotificationKind::Motivation, &offset),
            send_all(NotificationKind::Motivation),
            custom_at(&send_at),
            cancel_job(job_id),
            notify_kind(NotificationKind::Motivation),
            diary_gender(DiaryKind::Gratitude, Gender::Female),
        ];
        for payload in payloads {
            assert!(payload.len() <= MAX_CALLBACK_BYTES, "{payload} is too long");
        }
        assert_eq!(parse_cancel_job(&cancel_job(job_id)).unwrap(), job_id);
    }
}
