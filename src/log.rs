// src/log.rs
//! Logging front-end.
//!
//! The rest of the crate logs through `logf!` / `logw!` / `logd!` / `loge!`,
//! which forward to `tracing` under the `webwatch` target. `init` installs the
//! stderr subscriber used by the binary; library users can install their own.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `level` (e.g. "info", "debug") is used.
/// Calling this twice is harmless: the second install is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "webwatch", $($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "webwatch", $($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "webwatch", $($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!(target: "webwatch", $($arg)*)
    };
}
