// src/runner.rs
//! The watcher: targets, cache, and the IO seams, driven one target at a time.
//!
//! ```text
//! startup:  check every target → reconcile every cached target
//! schedule: on each target's tick → check that target (skipped with check_once)
//! check:    fetch → extract → cache.observe → (on change) send
//! ```
//!
//! A failure in one target is logged and reported; it never stops the pass.

use std::future::Future;

use tokio::time::Instant;

use crate::{
    config::Target,
    core::PageFetcher,
    error::WatchError,
    extract::extract_html,
    notify::Channel,
    progress::Progress,
    scheduler::Scheduler,
    watch::{FileCache, Observation, ReconcileDecision, reconcile},
};

/// Result of checking one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// First value this process has seen for the target; stored, not sent.
    Baseline { value: String },
    Unchanged { value: String },
    Changed { previous: String, value: String, notified: bool },
}

impl Outcome {
    pub fn value(&self) -> &str {
        match self {
            Outcome::Baseline { value }
            | Outcome::Unchanged { value }
            | Outcome::Changed { value, .. } => value,
        }
    }
}

/// Counts for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub checked: usize,
    pub changed: usize,
    pub failed: usize,
}

pub struct Watcher<F, C> {
    targets: Vec<Target>,
    fetcher: F,
    channel: C,
    cache: FileCache,
}

impl<F: PageFetcher, C: Channel> Watcher<F, C> {
    pub fn new(targets: Vec<Target>, fetcher: F, channel: C) -> Self {
        Self { targets, fetcher, channel, cache: FileCache::new() }
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Fetch, extract and classify one target; send on change.
    ///
    /// The cache is updated before sending and stays updated if the send fails.
    pub async fn check_target(&mut self, index: usize) -> Result<Outcome, WatchError> {
        let target = &self.targets[index];

        let body = self.fetcher.fetch(&target.website).await?;
        let value = extract_html(&body, &target.steps)?;
        logd!("`{}`: extracted {:?}", target.name, value);

        Ok(match self.cache.observe(&target.name, &value) {
            Observation::First => {
                logf!("`{}`: baseline {}", target.name, value);
                Outcome::Baseline { value }
            }
            Observation::Unchanged => {
                logf!("`{}`: no change in file detected", target.name);
                Outcome::Unchanged { value }
            }
            Observation::Changed { previous } => {
                logf!("`{}`: change detected: {} -> {}", target.name, previous, value);
                let notified = dispatch(&self.channel, target, &value).await;
                Outcome::Changed { previous, value, notified }
            }
        })
    }

    /// Check the given targets in order, reporting each.
    pub async fn run_targets(
        &mut self,
        indices: &[usize],
        progress: &mut dyn Progress,
    ) -> CycleSummary {
        let mut summary = CycleSummary::default();
        progress.begin(indices.len());

        for &index in indices {
            let result = self.check_target(index).await;
            let name = &self.targets[index].name;
            summary.checked += 1;
            match &result {
                Ok(outcome) => {
                    if matches!(outcome, Outcome::Changed { .. }) {
                        summary.changed += 1;
                    }
                    progress.item_done(name, outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    loge!("`{}`: {}", name, e);
                    progress.item_failed(name, e);
                }
            }
        }

        progress.finish();
        summary
    }

    /// One pass over every target, in configuration order.
    pub async fn scrape_all(&mut self, progress: &mut dyn Progress) -> CycleSummary {
        let all: Vec<usize> = (0..self.targets.len()).collect();
        self.run_targets(&all, progress).await
    }

    /// Compare one target's cached value with its channel's last message and
    /// resend on mismatch. `None` when the target has no cached value.
    pub async fn reconcile_target(&self, index: usize) -> Option<ReconcileDecision> {
        let target = &self.targets[index];
        let cached = self.cache.get(&target.name)?;

        let acknowledged = match self.channel.read_last(target).await {
            Ok(ack) => ack,
            Err(e) => {
                loge!("`{}`: cannot read last message: {}", target.name, e);
                None
            }
        };

        let decision = reconcile(cached, acknowledged.as_deref());
        match &decision {
            ReconcileDecision::NoMessage => {
                logf!("`{}`: no message to compare", target.name);
            }
            ReconcileDecision::InSync => {
                logf!("`{}`: channel already has {}", target.name, cached);
            }
            ReconcileDecision::Mismatch { file_name, acknowledged } => {
                logf!("`{}`: channel has {}, current file is {}", target.name, acknowledged, file_name);
                dispatch(&self.channel, target, cached).await;
            }
        }
        Some(decision)
    }

    /// Startup reconciliation over every cached target, in configuration order.
    pub async fn reconcile_all(
        &self,
        progress: &mut dyn Progress,
    ) -> Vec<(String, ReconcileDecision)> {
        let mut out = Vec::new();
        for index in 0..self.targets.len() {
            let Some(decision) = self.reconcile_target(index).await else {
                continue;
            };
            let name = &self.targets[index].name;
            progress.log(&format!("{name}: {decision:?}"));
            out.push((name.clone(), decision));
        }
        out
    }

    /// Startup pass (check every target, then reconcile), followed by the
    /// schedule unless `check_once`. Returns early once `shutdown` resolves.
    pub async fn run_session<S>(
        &mut self,
        check_once: bool,
        shutdown: S,
        progress: &mut dyn Progress,
    )
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let startup = async {
            self.scrape_all(&mut *progress).await;
            self.reconcile_all(&mut *progress).await;
        };
        tokio::select! {
            biased;
            _ = &mut shutdown => return,
            _ = startup => {}
        }
        if check_once {
            logf!("check_once set, not scheduling");
            return;
        }
        self.run_schedule(shutdown, progress).await;
    }

    /// Run each target on its own interval until `shutdown` resolves.
    ///
    /// Shutdown is honoured between and during ticks; targets not yet reached
    /// in an interrupted tick simply wait for their next one.
    pub async fn run_schedule<S>(&mut self, shutdown: S, progress: &mut dyn Progress)
    where
        S: Future<Output = ()>,
    {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        for (index, target) in self.targets.iter().enumerate() {
            scheduler.every(index, target.interval, start);
        }
        logf!("scheduler started ({} job(s))", self.targets.len());

        tokio::pin!(shutdown);
        while let Some(next) = scheduler.next_run() {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep_until(next) => {}
            }

            let due = scheduler.take_due(Instant::now());
            let tick = self.run_targets(&due, &mut *progress);
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tick => {}
            }
        }
        if scheduler.is_empty() {
            shutdown.await;
        }
        logf!("scheduler stopped");
    }
}

/// Send and log; a failed send is reported, never retried.
async fn dispatch<C: Channel>(channel: &C, target: &Target, value: &str) -> bool {
    match channel.send_document(target, value).await {
        Ok(()) => {
            logf!("`{}`: new file sent", target.name);
            true
        }
        Err(e) => {
            loge!("`{}`: error sending file: {}", target.name, e);
            false
        }
    }
}
