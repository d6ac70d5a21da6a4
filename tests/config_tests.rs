use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use wellbeing_bot::config::Config;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const OPTIONAL_VARS: &[&str] = &[
    "DATA_DIR",
    "HTTP_PORT",
    "ADMIN_IDS",
    "LLM_API_URL",
    "LLM_API_KEY",
    "LLM_MODEL",
    "LLM_TIMEOUT_SECS",
    "RATE_LIMIT_SECONDS",
    "SWEEP_INTERVAL_SECS",
    "TZ_OFFSET_HOURS",
];

fn clear_env() {
    env::remove_var("TELEGRAM_BOT_TOKEN");
    for name in OPTIONAL_VARS {
        env::remove_var(name);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATA_DIR", "/var/lib/wellbeing");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("ADMIN_IDS", "111, 222");
    env::set_var("LLM_API_URL", "http://localhost:11434/v1");
    env::set_var("LLM_API_KEY", "sk-test");
    env::set_var("LLM_MODEL", "llama3");
    env::set_var("LLM_TIMEOUT_SECS", "10");
    env::set_var("RATE_LIMIT_SECONDS", "5");
    env::set_var("SWEEP_INTERVAL_SECS", "15");
    env::set_var("TZ_OFFSET_HOURS", "-5");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/wellbeing"));
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.admin_ids, vec![111, 222]);
    assert_eq!(config.llm_api_url, "http://localhost:11434/v1");
    assert_eq!(config.llm_api_key, "sk-test");
    assert_eq!(config.llm_model, "llama3");
    assert_eq!(config.llm_timeout, Duration::from_secs(10));
    assert_eq!(config.rate_limit_window, Duration::from_secs(5));
    assert_eq!(config.sweep_interval, Duration::from_secs(15));
    assert_eq!(config.tz_offset_hours, -5);
    assert_eq!(
        config.schedule_path(),
        PathBuf::from("/var/lib/wellbeing/schedule.json")
    );

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    // Only set required token, let others use defaults
    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert_eq!(config.http_port, 3000);
    assert!(config.admin_ids.is_empty());
    assert_eq!(config.llm_api_url, "https://api.openai.com/v1");
    assert_eq!(config.llm_model, "gpt-4o-mini");
    assert_eq!(config.llm_timeout, Duration::from_secs(30));
    assert_eq!(config.rate_limit_window, Duration::from_secs(3));
    assert_eq!(config.sweep_interval, Duration::from_secs(30));
    assert_eq!(config.tz_offset_hours, 3);
    assert_eq!(config.users_path(), PathBuf::from("./data/users.json"));
    assert_eq!(config.templates_path(), PathBuf::from("./data/templates.json"));

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_invalid_values() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");

    let cases = [
        ("HTTP_PORT", "invalid_port"),
        ("HTTP_PORT", "70000"),
        ("ADMIN_IDS", "123,abc"),
        ("LLM_TIMEOUT_SECS", "0"),
        ("SWEEP_INTERVAL_SECS", "0"),
        ("RATE_LIMIT_SECONDS", "-1"),
        ("TZ_OFFSET_HOURS", "15"),
    ];

    for (name, value) in cases {
        env::set_var(name, value);
        let result = Config::from_env();
        assert!(result.is_err(), "{name}={value} should be rejected");
        env::remove_var(name);
    }

    let error_msg = {
        env::set_var("HTTP_PORT", "invalid_port");
        let msg = Config::from_env().unwrap_err().to_string();
        env::remove_var("HTTP_PORT");
        msg
    };
    assert!(error_msg.contains("Invalid HTTP_PORT"));

    clear_env();
}

#[test]
fn test_config_blank_optional_uses_default() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("HTTP_PORT", "  ");
    env::set_var("ADMIN_IDS", "");

    let config = Config::from_env().unwrap();
    assert_eq!(config.http_port, 3000);
    assert!(config.admin_ids.is_empty());

    clear_env();
}
