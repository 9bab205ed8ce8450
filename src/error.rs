// src/error.rs
//! Error taxonomy.
//!
//! Only `ConfigError` is fatal. Everything else is scoped to one target in one
//! cycle: it is logged, reported to the progress sink, and the cycle moves on.

use std::path::PathBuf;

/// Startup-only configuration failures.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or a missing required key.
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config entry #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate config name `{0}`")]
    DuplicateName(String),

    #[error("`{name}`: invalid website URL `{website}`: {source}")]
    InvalidWebsite {
        name: String,
        website: String,
        #[source]
        source: url::ParseError,
    },

    #[error("`{name}`: schedule_interval must be a number of minutes between 1 and {max}, got `{value}`")]
    InvalidInterval { name: String, value: String, max: u64 },
}

/// Failure of a single step.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("invalid step method `{0}`")]
    InvalidStepMethod(String),

    #[error("`{0}` applied to an absent node")]
    NullNodeTraversal(&'static str),

    #[error("`{0}` applied to a scalar value")]
    NotANode(&'static str),
}

/// Failure of a whole extraction, pinned to the step that caused it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("step #{index}: {kind}")]
pub struct ExtractError {
    pub index: usize,
    #[source]
    pub kind: StepError,
}

/// Network failures: fetch, send, read-last.
///
/// Messages name the endpoint, never the full request URL: Telegram URLs carry
/// the bot token.
#[derive(thiserror::Error, Debug)]
pub enum NetError {
    /// Transport failure, including timeouts.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("cannot decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl NetError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetError::Request { source, .. } if source.is_timeout())
    }
}

/// Why one target produced no value this cycle.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] NetError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}
