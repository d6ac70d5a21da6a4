use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

pub const MAX_NOTIFICATION_LENGTH: usize = 3500;
pub const MAX_PROMPT_LENGTH: usize = 2000;

pub fn validate_notification_text(text: &str) -> Result<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(anyhow!("Notification text cannot be empty"));
    }

    if text.chars().count() > MAX_NOTIFICATION_LENGTH {
        return Err(anyhow!(
            "Notification text cannot be longer than {} characters",
            MAX_NOTIFICATION_LENGTH
        ));
    }

    Ok(text.to_string())
}

pub fn validate_template_prompt(prompt: &str) -> Result<String> {
    let prompt = prompt.trim();

    if prompt.len() < 10 {
        return Err(anyhow!("Template prompt must be at least 10 characters long"));
    }

    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(anyhow!(
            "Template prompt cannot be longer than {} characters",
            MAX_PROMPT_LENGTH
        ));
    }

    Ok(prompt.to_string())
}

pub fn validate_user_id(user_id: i64) -> Result<()> {
    // Private chats with users always have positive ids
    if user_id <= 0 {
        return Err(anyhow!("User ID must be positive"));
    }

    if user_id > 9_999_999_999 {
        return Err(anyhow!("User ID out of valid range"));
    }

    Ok(())
}

pub fn validate_job_id(job_id: &str) -> Result<()> {
    let job_id = job_id.trim();

    if job_id.is_empty() {
        return Err(anyhow!("Job ID cannot be empty"));
    }

    if job_id.len() > 64 {
        return Err(anyhow!("Job ID cannot be longer than 64 characters"));
    }

    if !job_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(anyhow!("Job ID can only contain letters, numbers, and hyphens"));
    }

    Ok(())
}

/// Scheduling into the past is refused; a small grace period absorbs clock
/// drift between rendering a button and pressing it.
pub fn validate_send_time(send_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if send_at < now - chrono::Duration::minutes(1) {
        return Err(anyhow!("Send time is in the past"));
    }

    if send_at > now + chrono::Duration::days(365) {
        return Err(anyhow!("Send time cannot be more than a year ahead"));
    }

    Ok(())
}

/// Parses a comma-separated admin list such as `"123, 456"`.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let id: i64 = s.parse().map_err(|_| anyhow!("Invalid admin ID '{}'", s))?;
            validate_user_id(id).map_err(|e| anyhow!("Invalid admin ID '{}': {}", s, e))?;
            Ok(id)
        })
        .collect()
}
