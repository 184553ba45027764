use std::env;

use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::directory::MatchPolicy;

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub database_path: String,
    pub sheet_name: String,
    /// How `name, contact` arguments are matched against stored players
    pub match_policy: MatchPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: "leaderboard.db".to_string(),
            sheet_name: "Pessoas".to_string(),
            match_policy: MatchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub token: Option<String>,
    pub api_base_url: String,
    pub user_agent: &'static str,
    pub poll_timeout_secs: u64,
    pub retry_delay_secs: u64,
    pub send_interval_ms: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: "https://api.telegram.org".to_string(),
            user_agent: "LeaderboardBot/1.0",
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
            send_interval_ms: 50, // Telegram allows ~30 msg/sec per bot
        }
    }
}

impl TelegramSettings {
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("API_KEY_TELEGRAM not found. Check your .env file")
    }
}

#[derive(Debug, Clone)]
pub struct ClockSettings {
    /// Offset used to render message send times (America/Sao_Paulo by default)
    pub utc_offset_minutes: i32,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: -180,
        }
    }
}

impl ClockSettings {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .with_context(|| format!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub telegram: TelegramSettings,
    pub clock: ClockSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::new();

        if let Some(path) = env_value("LEADERBOARD_DB_PATH") {
            config.store.database_path = path;
        }
        if let Some(sheet) = env_value("LEADERBOARD_SHEET") {
            config.store.sheet_name = sheet;
        }
        if let Some(raw) = env_value("LEADERBOARD_MATCH_POLICY") {
            config.store.match_policy = parse_match_policy(&raw)?;
        }

        config.telegram.token = env_value("API_KEY_TELEGRAM");
        if let Some(url) = env_value("TELEGRAM_API_URL") {
            config.telegram.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = env_parsed("TELEGRAM_POLL_TIMEOUT_SECS")? {
            config.telegram.poll_timeout_secs = secs;
        }
        if let Some(secs) = env_parsed("TELEGRAM_RETRY_DELAY_SECS")? {
            config.telegram.retry_delay_secs = secs;
        }
        if let Some(ms) = env_parsed("TELEGRAM_SEND_INTERVAL_MS")? {
            config.telegram.send_interval_ms = ms;
        }

        if let Some(minutes) = env_parsed("LEADERBOARD_UTC_OFFSET_MINUTES")? {
            config.clock.utc_offset_minutes = minutes;
        }

        Ok(config)
    }

    pub fn with_store_overrides(mut self, database: Option<String>, sheet: Option<String>) -> Self {
        if let Some(path) = database {
            self.store.database_path = path;
        }
        if let Some(name) = sheet {
            self.store.sheet_name = name;
        }
        self
    }
}

fn parse_match_policy(raw: &str) -> Result<MatchPolicy> {
    MatchPolicy::from_name(raw).with_context(|| {
        format!("Invalid value for LEADERBOARD_MATCH_POLICY: {raw} (expected 'or' or 'and')")
    })
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_value(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid value for {key}: {raw}"))
        })
        .transpose()
}
