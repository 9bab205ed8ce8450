// src/watch/mod.rs
//! Deciding whether a freshly extracted value is news.
//!
//! - `detector`: value vs. what this process saw last time (in memory).
//! - `reconcile`: value vs. what the channel last acknowledged (startup only).
//!
//! The two decide independently and can both fire in the same startup cycle.

pub mod detector;
pub mod reconcile;

pub use detector::{FileCache, Observation};
pub use reconcile::{ReconcileDecision, file_name, reconcile};
