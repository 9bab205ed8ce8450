// src/extract/mod.rs
//! # Extraction
//!
//! Turns a page into the one string a target watches (usually a file URL).
//!
//! A target's recipe is an ordered list of steps. `pipeline` compiles the raw
//! steps from the config into `step::Step`, folds them from the document root
//! through `step::apply_step`, and renders whatever is left. Failures come back
//! as `ExtractError`, never as an empty string, so the change detector cannot
//! mistake a broken recipe for a file that disappeared.
//!
//! Nothing here does IO: pages arrive as text, results leave as text.

pub mod pipeline;
pub mod step;

pub use pipeline::{compile_steps, extract, extract_html, render, run_steps};
pub use step::{Cursor, Step, apply_step};
