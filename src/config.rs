//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use crate::error::GtsError;

/// Portal host serving both the profile pages and the trade-list API.
pub const DEFAULT_BASE_URL: &str = "https://3ds.pokemon-gl.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Language the portal uses for names in the trade records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Japanese = 1,
    #[default]
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
}

impl Language {
    /// Numeric id sent as `languageId`.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Japanese => "japanese",
            Language::English => "english",
            Language::French => "french",
            Language::Italian => "italian",
            Language::German => "german",
        }
    }
}

impl TryFrom<u8> for Language {
    type Error = GtsError;

    fn try_from(id: u8) -> std::result::Result<Self, Self::Error> {
        match id {
            1 => Ok(Language::Japanese),
            2 => Ok(Language::English),
            3 => Ok(Language::French),
            4 => Ok(Language::Italian),
            5 => Ok(Language::German),
            other => Err(GtsError::InvalidLanguage(other)),
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    /// Accepts either the numeric id or the (case-insensitive) name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u8>() {
            return Ok(Language::try_from(id)?);
        }

        match s.to_lowercase().as_str() {
            "japanese" | "ja" => Ok(Language::Japanese),
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            "italian" | "it" => Ok(Language::Italian),
            "german" | "de" => Ok(Language::German),
            _ => anyhow::bail!("Unknown language: {}", s),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by every request a client makes.
#[derive(Debug, Clone)]
pub struct GtsConfig {
    /// Scheme + host of the portal, without trailing slash
    pub base_url: String,

    /// Language requested for trade records
    pub language: Language,

    /// Timezone the portal's trade dates are written in
    pub timezone: Tz,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GtsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Language::default(),
            timezone: Tz::UTC,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GtsConfig {
    /// Build from environment variables, loading `.env` first if present:
    /// - GTS_BASE_URL (defaults to the official portal)
    /// - GTS_LANGUAGE (id 1-5 or name, defaults to english)
    /// - GTS_TIMEZONE (IANA name, defaults to UTC)
    /// - GTS_TIMEOUT_SECS (defaults to 30)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("GTS_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(lang) = lookup("GTS_LANGUAGE") {
            config.language = lang.parse().context("Invalid GTS_LANGUAGE")?;
        }
        if let Some(tz) = lookup("GTS_TIMEZONE") {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("{}", e))
                .context("Invalid GTS_TIMEZONE")?;
        }
        if let Some(secs) = lookup("GTS_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("Invalid GTS_TIMEOUT_SECS")?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
