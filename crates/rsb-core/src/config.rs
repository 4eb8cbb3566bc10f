use std::{env, time::Duration};

use crate::{card::SiteLinks, errors::Error, pagination::NavStyle, Result};

pub const DEFAULT_API_URL: &str = "https://rscripts.net/api/v2";
pub const DEFAULT_SITE_URL: &str = "https://rscripts.net";

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // rscripts
    pub api_base_url: String,
    pub site_url: String,
    pub http_timeout: Duration,

    // Pagination
    pub session_ttl: Duration,
    pub nav_style: NavStyle,

    // Card rendering
    pub raw_preview_limit: usize,
    pub description_limit: usize,
}

impl Config {
    /// Load from the process environment, after merging `.env` if present.
    ///
    /// Variables already set in the environment win over `.env` entries.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("failed to read .env: {e}"))),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_str = |key: &str| lookup(key).and_then(non_empty);
        let env_num = |key: &str, default: u64| -> Result<u64> {
            match env_str(key) {
                None => Ok(default),
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    Error::Config(format!("{key} must be a non-negative integer, got `{raw}`"))
                }),
            }
        };
        let env_positive = |key: &str, default: u64| -> Result<u64> {
            match env_num(key, default)? {
                0 => Err(Error::Config(format!("{key} must be greater than zero"))),
                n => Ok(n),
            }
        };

        // BOT_TOKEN is the historical name; TELEGRAM_BOT_TOKEN is accepted as an alias.
        let telegram_bot_token = env_str("BOT_TOKEN")
            .or_else(|| env_str("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("BOT_TOKEN environment variable is required".to_string())
            })?;

        let api_base_url = trim_base(env_str("RSCRIPTS_API_URL").unwrap_or(DEFAULT_API_URL.into()));
        let site_url = trim_base(env_str("RSCRIPTS_SITE_URL").unwrap_or(DEFAULT_SITE_URL.into()));
        let http_timeout = Duration::from_millis(env_positive("HTTP_TIMEOUT_MS", 10_000)?);

        let session_ttl = Duration::from_secs(env_positive("SEARCH_SESSION_TTL_SECS", 60)?);
        let nav_style = match env_str("SEARCH_NAV_STYLE") {
            None => NavStyle::Full,
            Some(raw) => NavStyle::parse(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "SEARCH_NAV_STYLE must be `full` or `compact`, got `{raw}`"
                ))
            })?,
        };

        let raw_preview_limit = env_num("RAW_PREVIEW_LIMIT", 900)? as usize;
        let description_limit = env_num("DESCRIPTION_LIMIT", 200)? as usize;

        Ok(Self {
            telegram_bot_token,
            api_base_url,
            site_url,
            http_timeout,
            session_ttl,
            nav_style,
            raw_preview_limit,
            description_limit,
        })
    }

    pub fn site_links(&self) -> SiteLinks {
        SiteLinks::new(self.site_url.clone())
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
