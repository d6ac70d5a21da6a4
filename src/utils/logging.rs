use std::time::Duration;

use tracing::{debug, error, info, warn};

/// Logs command or callback start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_START: {} by {}({}) - {}", command, user, user_id, d),
        None => info!("CMD_START: {} by {}({})", command, user, user_id),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_SUCCESS: {} by {}({}) - {}", command, user, user_id, d),
        None => info!("CMD_SUCCESS: {} by {}({})", command, user, user_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: i64, error: &str) {
    error!("CMD_ERROR: {} by {}({}) - {}", command, user, user_id, error);
}

/// Logs refused privileged actions
pub fn log_access_denied(action: &str, user: &str, user_id: i64) {
    warn!("ACCESS_DENIED: {} by {}({})", action, user, user_id);
}

/// Logs validation errors with consistent format
pub fn log_validation_error(command: &str, value: &str, error: &str, user: &str, user_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - '{}' invalid: {} - user {}({})",
        command, value, error, user, user_id
    );
}

/// Logs file store operations with consistent format
pub fn log_store_operation(operation: &str, file: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("STORE_OP: {} on {} - {}", operation, file, d),
        None => debug!("STORE_OP: {} on {}", operation, file),
    }
}

/// Logs file store errors with consistent format
pub fn log_store_error(operation: &str, file: &str, error: &str) {
    error!("STORE_ERROR: {} on {} failed: {}", operation, file, error);
}

/// Logs timeout events with consistent format
pub fn log_timeout(operation: &str, duration: Duration, details: Option<&str>) {
    match details {
        Some(d) => warn!("TIMEOUT: {} after {:?} - {}", operation, duration, d),
        None => warn!("TIMEOUT: {} after {:?}", operation, duration),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
