use std::env;

use crate::error::ConfigError;

/// Forum used when VANILLA_BASE_URL isn't set.
pub const DEFAULT_BASE_URL: &str = "https://forum.example.com";

/// OpenAI moderation endpoint used when OPENAI_MODERATION_URL isn't set.
pub const DEFAULT_MODERATION_URL: &str = "https://api.openai.com/v1/moderations";

pub const DEFAULT_MODERATION_MODEL: &str = "omni-moderation-latest";
pub const DEFAULT_THRESHOLD: f64 = 0.01;
pub const DEFAULT_LOOKBACK_HOURS: u64 = 24;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Central configuration loaded from environment variables.
///
/// Secrets only ever come from the environment. main loads a .env file
/// via dotenvy before calling `Config::load`, so values in the real
/// environment take precedence over the file.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub vanilla_api_token: String,
    /// Forum base URL with any trailing slash removed.
    pub vanilla_base_url: String,
    pub moderation_url: String,
    pub moderation_model: String,
    /// Inclusive score threshold in [0, 1].
    pub threshold: f64,
    /// Lookback window in hours; 0 disables the cutoff.
    pub lookback_hours: u64,
    pub page_size: u32,
}

impl std::fmt::Debug for Config {
    // Keep both secrets out of debug logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("vanilla_base_url", &self.vanilla_base_url)
            .field("moderation_url", &self.moderation_url)
            .field("moderation_model", &self.moderation_model)
            .field("threshold", &self.threshold)
            .field("lookback_hours", &self.lookback_hours)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset, so `OPENAI_API_KEY=` in a .env file
    /// is reported as missing rather than sent as a blank credential.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let vanilla_api_token =
            get("VANILLA_API_TOKEN").ok_or(ConfigError::Missing("VANILLA_API_TOKEN"))?;

        let vanilla_base_url = get("VANILLA_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let threshold = match get("MODERATION_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => DEFAULT_THRESHOLD,
        };

        let lookback_hours = match get("LOOKBACK_HOURS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "LOOKBACK_HOURS",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_LOOKBACK_HOURS,
        };

        let page_size = match get("PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            openai_api_key,
            vanilla_api_token,
            vanilla_base_url,
            moderation_url: get("OPENAI_MODERATION_URL")
                .unwrap_or_else(|| DEFAULT_MODERATION_URL.to_string()),
            moderation_model: get("OPENAI_MODERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_MODERATION_MODEL.to_string()),
            threshold,
            lookback_hours,
            page_size,
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "MODERATION_THRESHOLD",
        value: raw.to_string(),
        reason,
    };

    let value: f64 = raw.trim().parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid("must be a number between 0 and 1".to_string()));
    }
    Ok(value)
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "PAGE_SIZE",
        value: raw.to_string(),
        reason,
    };

    match raw.trim().parse::<u32>() {
        Ok(0) => Err(invalid("must be at least 1".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(e.to_string())),
    }
}
