// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod notify;
pub mod progress;
pub mod runner;
pub mod scheduler;
pub mod watch;

pub use error::{ConfigError, ExtractError, NetError, StepError, WatchError};
pub use runner::{CycleSummary, Outcome, Watcher};
