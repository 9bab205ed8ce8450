// src/config/options.rs
use std::path::PathBuf;

/// What the binary was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: PathBuf,
    /// One scrape + reconcile pass, then exit instead of scheduling.
    pub check_once: bool,
    pub log_level: String,
}

