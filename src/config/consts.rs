// src/config/consts.rs
use std::time::Duration;

// Net config
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = concat!("webwatch/", env!("CARGO_PKG_VERSION"));
pub const TELEGRAM_API: &str = "https://api.telegram.org";

// Scheduling
pub const SECS_PER_MINUTE: u64 = 60;
/// One leap year; longer intervals are rejected at load time.
pub const MAX_INTERVAL_MINUTES: u64 = 366 * 24 * 60;
pub const MAX_INTERVAL: Duration = Duration::from_secs(MAX_INTERVAL_MINUTES * SECS_PER_MINUTE);

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
