// src/scheduler.rs
//! Per-target interval jobs.
//!
//! The scheduler only keeps time; running a job is the caller's business.
//! A job first fires one interval after registration, then one interval after
//! each time it was taken.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::consts::MAX_INTERVAL;

#[derive(Clone, Debug)]
struct Job {
    target: usize,
    interval: Duration,
    next_run: Instant,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    jobs: Vec<Job>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register target index `target` to run every `interval`, starting from `now`.
    /// Intervals are capped at [`MAX_INTERVAL`] so deadlines never overflow.
    pub fn every(&mut self, target: usize, interval: Duration, now: Instant) {
        let interval = interval.min(MAX_INTERVAL);
        self.jobs.push(Job { target, interval, next_run: now + interval });
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Targets due at `now`, in registration order; each is rescheduled.
    pub fn take_due(&mut self, now: Instant) -> Vec<usize> {
        self.jobs
            .iter_mut()
            .filter(|job| job.next_run <= now)
            .map(|job| {
                job.next_run = now + job.interval;
                job.target
            })
            .collect()
    }

    /// Earliest pending deadline.
    pub fn next_run(&self) -> Option<Instant> {
        self.jobs.iter().map(|job| job.next_run).min()
    }
}
