// src/config/mod.rs

pub mod consts;
pub mod options;
pub mod targets;

pub use options::RunOptions;
pub use targets::{ChannelCredentials, StepConfig, StepParams, Target, load_targets, parse_targets};
