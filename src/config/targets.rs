// src/config/targets.rs
//! Target configuration file.
//!
//! ```json
//! { "configs": [ {
//!     "name": "tool",
//!     "website": "https://example.com/downloads",
//!     "steps": [ {"method": "find_text", "params": {"text": "Download"}},
//!                {"method": "parent"},
//!                {"method": "get_attribute", "params": {"name": "href"}} ],
//!     "bot_token": "...", "read_bot_token": "...", "chat_id": "@channel",
//!     "schedule_interval": "30"
//! } ] }
//! ```
//!
//! Loaded once at startup; any problem here is fatal. Step methods are *not*
//! validated into errors at this point: an unknown method is data, and fails
//! that one target at extraction time.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::consts::{MAX_INTERVAL_MINUTES, SECS_PER_MINUTE};
use crate::error::ConfigError;
use crate::extract::Step;

/// One monitored site.
#[derive(Clone, Debug)]
pub struct Target {
    pub name: String,
    pub website: Url,
    pub steps: Vec<StepConfig>,
    pub channel: ChannelCredentials,
    pub interval: Duration,
}

/// A step as written in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StepConfig {
    pub method: String,
    #[serde(default)]
    pub params: StepParams,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StepParams {
    /// Text to look for (`find_text`).
    #[serde(default)]
    pub text: Option<String>,
    /// Attribute name (`get_attribute`).
    #[serde(default)]
    pub name: Option<String>,
}

/// Opaque to the extraction core; handed to the channel as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelCredentials {
    pub bot_token: String,
    pub read_bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for ChannelCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCredentials")
            .field("bot_token", &"<redacted>")
            .field("read_bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    configs: Vec<RawTarget>,
}

#[derive(Deserialize)]
struct RawTarget {
    name: String,
    website: String,
    steps: Vec<StepConfig>,
    bot_token: String,
    read_bot_token: String,
    chat_id: Scalar,
    schedule_interval: Scalar,
}

/// A value the file may spell as a string or a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

pub fn load_targets(path: &Path) -> Result<Vec<Target>, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_targets(&text, path)
}

/// Parse and validate file contents; `path` is only used in error messages.
pub fn parse_targets(text: &str, path: &Path) -> Result<Vec<Target>, ConfigError> {
    let file: ConfigFile = serde_json::from_str(text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(file.configs.len());

    for (index, raw) in file.configs.into_iter().enumerate() {
        if raw.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        if !seen.insert(raw.name.clone()) {
            return Err(ConfigError::DuplicateName(raw.name));
        }

        let website = Url::parse(&raw.website).map_err(|source| ConfigError::InvalidWebsite {
            name: raw.name.clone(),
            website: raw.website.clone(),
            source,
        })?;
        let interval = parse_interval(&raw.name, raw.schedule_interval)?;

        for (i, step) in raw.steps.iter().enumerate() {
            if let Err(e) = Step::try_from(step) {
                logw!("`{}` step #{}: {} (this target will fail every cycle)", raw.name, i, e);
            }
        }

        targets.push(Target {
            name: raw.name,
            website,
            steps: raw.steps,
            channel: ChannelCredentials {
                bot_token: raw.bot_token,
                read_bot_token: raw.read_bot_token,
                chat_id: raw.chat_id.into_string(),
            },
            interval,
        });
    }

    logd!("loaded {} target(s) from {}", targets.len(), path.display());
    Ok(targets)
}

fn parse_interval(name: &str, value: Scalar) -> Result<Duration, ConfigError> {
    let minutes = match &value {
        Scalar::Int(n) => u64::try_from(*n).ok(),
        Scalar::Text(s) => s.trim().parse::<u64>().ok(),
    };
    match minutes {
        Some(m) if (1..=MAX_INTERVAL_MINUTES).contains(&m) => {
            Ok(Duration::from_secs(m * SECS_PER_MINUTE))
        }
        _ => Err(ConfigError::InvalidInterval {
            name: s!(name),
            value: value.into_string(),
            max: MAX_INTERVAL_MINUTES,
        }),
    }
}
