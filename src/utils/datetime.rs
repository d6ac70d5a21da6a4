use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Builds the reference zone from an hour offset (e.g. `3` for UTC+3).
pub fn reference_offset(hours: i32) -> Result<FixedOffset> {
    if !(-12..=14).contains(&hours) {
        return Err(anyhow!("Timezone offset must be between -12 and 14 hours"));
    }
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| anyhow!("Invalid timezone offset"))
}

/// Parses `YYYY-MM-DD` and `HH:MM` given in the reference zone into UTC.
pub fn parse_local_datetime(date: &str, time: &str, offset: &FixedOffset) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| anyhow!("Invalid time '{}', expected HH:MM", time))?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Ambiguous local time"))
}

/// Parses a unix timestamp in seconds.
pub fn parse_unix_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid timestamp '{}'", value))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| anyhow!("Timestamp out of range"))
}

pub fn format_datetime(dt: &DateTime<Utc>, offset: &FixedOffset) -> String {
    dt.with_timezone(offset).format("%a %d %b %Y, %H:%M").to_string()
}

/// `YYYY-MM-DD` / `HH:MM` pair in the reference zone, as used in callback data.
pub fn local_date_time_parts(dt: &DateTime<Utc>, offset: &FixedOffset) -> (String, String) {
    let local = dt.with_timezone(offset);
    (local.format("%Y-%m-%d").to_string(), local.format("%H:%M").to_string())
}

/// The next occurrence of `hour:00` in the reference zone strictly after `now`.
pub fn next_local_hour(now: DateTime<Utc>, hour: u32, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let local_now = now.with_timezone(offset);
    let today = local_now.date_naive().and_hms_opt(hour, 0, 0)?;
    let candidate = offset.from_local_datetime(&today).single()?;
    let candidate = if candidate.with_timezone(&Utc) > now {
        candidate
    } else {
        candidate + Duration::days(1)
    };
    Some(candidate.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_datetime_normalizes_to_utc() {
        let offset = reference_offset(3).unwrap();
        let dt = parse_local_datetime("2026-03-01", "09:30", &offset).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-01T06:30:00+00:00");
    }

    #[test]
    fn test_parse_local_datetime_rejects_garbage() {
        let offset = reference_offset(0).unwrap();
        assert!(parse_local_datetime("2026-13-01", "09:30", &offset).is_err());
        assert!(parse_local_datetime("2026-03-01", "25:00", &offset).is_err());
        assert!(parse_local_datetime("tomorrow", "09:30", &offset).is_err());
    }

    #[test]
    fn test_reference_offset_range() {
        assert!(reference_offset(-12).is_ok());
        assert!(reference_offset(14).is_ok());
        assert!(reference_offset(15).is_err());
    }

    #[test]
    fn test_parse_unix_timestamp() {
        let dt = parse_unix_timestamp("1767225600").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert!(parse_unix_timestamp("soon").is_err());
    }

    #[test]
    fn test_local_parts_round_trip() {
        let offset = reference_offset(3).unwrap();
        let dt = parse_local_datetime("2026-10-16", "21:05", &offset).unwrap();
        let (date, time) = local_date_time_parts(&dt, &offset);
        assert_eq!(date, "2026-10-16");
        assert_eq!(time, "21:05");
    }

    #[test]
    fn test_next_local_hour() {
        let offset = reference_offset(0).unwrap();
        let now = parse_local_datetime("2026-10-16", "10:00", &offset).unwrap();

        let later_today = next_local_hour(now, 20, &offset).unwrap();
        assert_eq!(later_today.to_rfc3339(), "2026-10-16T20:00:00+00:00");

        let tomorrow = next_local_hour(now, 9, &offset).unwrap();
        assert_eq!(tomorrow.to_rfc3339(), "2026-10-17T09:00:00+00:00");

        let same_hour = next_local_hour(now, 10, &offset).unwrap();
        assert_eq!(same_hour.to_rfc3339(), "2026-10-17T10:00:00+00:00");
    }
}
