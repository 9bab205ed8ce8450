// src/progress.rs
use crate::error::WatchError;
use crate::runner::Outcome;

/// Observer for long-running passes over the targets.
/// Frontends implement this to surface per-target results.
pub trait Progress {
    /// Called at the start with the number of targets in this pass.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A target was fetched and extracted.
    fn item_done(&mut self, _name: &str, _outcome: &Outcome) {}

    /// A target failed this pass; the pass continues.
    fn item_failed(&mut self, _name: &str, _err: &WatchError) {}

    /// Called at the end of the pass.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
