use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::validation::parse_admin_ids;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub data_dir: PathBuf,
    pub http_port: u16,
    pub admin_ids: Vec<i64>,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub rate_limit_window: Duration,
    pub sweep_interval: Duration,
    pub tz_offset_hours: i32,
}

fn var_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    var_or(name, default)
        .parse()
        .map_err(|_| anyhow!("Invalid {}", name))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default())?;

        let http_port = parse_var("HTTP_PORT", "3000")?;
        let llm_timeout_secs: u64 = parse_var("LLM_TIMEOUT_SECS", "30")?;
        let rate_limit_secs: u64 = parse_var("RATE_LIMIT_SECONDS", "3")?;
        let sweep_interval_secs: u64 = parse_var("SWEEP_INTERVAL_SECS", "30")?;
        let tz_offset_hours: i32 = parse_var("TZ_OFFSET_HOURS", "3")?;

        if llm_timeout_secs == 0 {
            return Err(anyhow!("Invalid LLM_TIMEOUT_SECS"));
        }
        if sweep_interval_secs == 0 {
            return Err(anyhow!("Invalid SWEEP_INTERVAL_SECS"));
        }
        if !(-12..=14).contains(&tz_offset_hours) {
            return Err(anyhow!("Invalid TZ_OFFSET_HOURS"));
        }

        Ok(Config {
            telegram_bot_token: token,
            data_dir: PathBuf::from(var_or("DATA_DIR", "./data")),
            http_port,
            admin_ids,
            llm_api_url: var_or("LLM_API_URL", "https://api.openai.com/v1"),
            llm_api_key: var_or("LLM_API_KEY", ""),
            llm_model: var_or("LLM_MODEL", "gpt-4o-mini"),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            rate_limit_window: Duration::from_secs(rate_limit_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            tz_offset_hours,
        })
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.data_dir.join("schedule.json")
    }

    pub fn templates_path(&self) -> PathBuf {
        self.data_dir.join("templates.json")
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }
}
