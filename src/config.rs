//! Runtime settings read from the environment (and `.env` via `dotenvy`).

use anyhow::{Context, Result};
use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::render::DEFAULT_TITLE;

pub const DEFAULT_CSV_URL: &str =
    "https://raw.githubusercontent.com/jonathanlau97/caudalieprizepool/main/caudalie_sales.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `LEADERBOARD_CSV_URL`: URL or local path of the sales CSV.
    pub csv_url: String,
    /// `LEADERBOARD_CACHE_TTL_SECS`: how long a fetch is reused.
    pub cache_ttl: Duration,
    /// `LEADERBOARD_TITLE`: page heading.
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            cache_ttl: DEFAULT_TTL,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(url) = lookup("LEADERBOARD_CSV_URL") {
            settings.csv_url = url;
        }
        if let Some(raw) = lookup("LEADERBOARD_CACHE_TTL_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LEADERBOARD_CACHE_TTL_SECS must be whole seconds, got '{raw}'"))?;
            settings.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(title) = lookup("LEADERBOARD_TITLE") {
            settings.title = title;
        }

        Ok(settings)
    }
}
