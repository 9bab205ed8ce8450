// tests/watcher_cycle.rs
//
// Watcher behaviour against an in-memory site and channel: change detection,
// failure isolation, startup reconciliation and scheduling.
//
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use webwatch::config::{ChannelCredentials, StepConfig, StepParams, Target};
use webwatch::core::PageFetcher;
use webwatch::error::{NetError, StepError, WatchError};
use webwatch::notify::Channel;
use webwatch::progress::{NullProgress, Progress};
use webwatch::watch::ReconcileDecision;
use webwatch::{Outcome, Watcher};

/* ---------------- fakes ---------------- */

#[derive(Clone, Default)]
struct FakeSite {
    pages: Arc<Mutex<HashMap<String, String>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeSite {
    fn set(&self, url: &str, body: &str) {
        self.pages.lock().unwrap().insert(url.to_string(), body.to_string());
    }
    fn remove(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }
    fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, url: &Url) -> Result<String, NetError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        self.pages.lock().unwrap().get(url.as_str()).cloned().ok_or_else(|| NetError::Status {
            endpoint: url.to_string(),
            status: 503,
            body: "down".into(),
        })
    }
}

#[derive(Clone, Default)]
struct FakeChannel {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    last: Arc<Mutex<HashMap<String, String>>>,
    fail_send: Arc<AtomicBool>,
    fail_read: Arc<AtomicBool>,
}

impl FakeChannel {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
    fn acknowledge(&self, target: &str, text: &str) {
        self.last.lock().unwrap().insert(target.to_string(), text.to_string());
    }
}

#[async_trait]
impl Channel for FakeChannel {
    async fn send_document(&self, target: &Target, value: &str) -> Result<(), NetError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(NetError::Status { endpoint: "telegram sendDocument".into(), status: 400, body: "nope".into() });
        }
        self.sent.lock().unwrap().push((target.name.clone(), value.to_string()));
        Ok(())
    }

    async fn read_last(&self, target: &Target) -> Result<Option<String>, NetError> {
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(NetError::Status { endpoint: "telegram getUpdates".into(), status: 401, body: "unauthorized".into() });
        }
        Ok(self.last.lock().unwrap().get(&target.name).cloned())
    }
}

#[derive(Default)]
struct Recorder {
    done: Vec<String>,
    failed: Vec<(String, String)>,
}

impl Progress for Recorder {
    fn item_done(&mut self, name: &str, _outcome: &Outcome) {
        self.done.push(name.to_string());
    }
    fn item_failed(&mut self, name: &str, err: &WatchError) {
        self.failed.push((name.to_string(), err.to_string()));
    }
}

/* ---------------- helpers ---------------- */

fn step(method: &str, text: Option<&str>, name: Option<&str>) -> StepConfig {
    StepConfig {
        method: method.into(),
        params: StepParams { text: text.map(Into::into), name: name.map(Into::into) },
    }
}

fn download_steps() -> Vec<StepConfig> {
    vec![
        step("find_text", Some("Download"), None),
        step("parent", None, None),
        step("get_attribute", None, Some("href")),
    ]
}

fn target(name: &str, steps: Vec<StepConfig>, minutes: u64) -> Target {
    Target {
        name: name.into(),
        website: Url::parse(&format!("https://{name}.example.com/")).unwrap(),
        steps,
        channel: ChannelCredentials {
            bot_token: "1:W".into(),
            read_bot_token: "2:R".into(),
            chat_id: "@files".into(),
        },
        interval: Duration::from_secs(minutes * 60),
    }
}

fn url(name: &str) -> String {
    format!("https://{name}.example.com/")
}

fn page(href: &str) -> String {
    format!(r#"<html><body><h1>Builds</h1><p><a href="{href}">Download</a></p></body></html>"#)
}

/* ---------------- change detection ---------------- */

#[tokio::test]
async fn baseline_then_unchanged_then_one_notification_on_change() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/f1.zip"));

    let mut w = Watcher::new(vec![target("tool", download_steps(), 5)], site.clone(), channel.clone());

    let out = w.check_target(0).await.unwrap();
    assert_eq!(out, Outcome::Baseline { value: "/f1.zip".into() });
    assert!(channel.sent().is_empty());

    let out = w.check_target(0).await.unwrap();
    assert_eq!(out, Outcome::Unchanged { value: "/f1.zip".into() });
    assert!(channel.sent().is_empty());

    site.set(&url("tool"), &page("/f2.zip"));
    let out = w.check_target(0).await.unwrap();
    assert_eq!(
        out,
        Outcome::Changed { previous: "/f1.zip".into(), value: "/f2.zip".into(), notified: true }
    );
    assert_eq!(channel.sent(), vec![("tool".to_string(), "/f2.zip".to_string())]);
    assert_eq!(w.cache().get("tool"), Some("/f2.zip"));

    // idempotent afterwards
    w.check_target(0).await.unwrap();
    assert_eq!(channel.sent().len(), 1);
}

#[tokio::test]
async fn failed_send_keeps_the_new_value_cached() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/f1.zip"));
    let mut w = Watcher::new(vec![target("tool", download_steps(), 5)], site.clone(), channel.clone());
    w.check_target(0).await.unwrap();

    channel.fail_send.store(true, Ordering::SeqCst);
    site.set(&url("tool"), &page("/f2.zip"));
    let out = w.check_target(0).await.unwrap();
    assert!(matches!(out, Outcome::Changed { notified: false, .. }));
    assert_eq!(w.cache().get("tool"), Some("/f2.zip"));

    channel.fail_send.store(false, Ordering::SeqCst);
    let out = w.check_target(0).await.unwrap();
    assert!(matches!(out, Outcome::Unchanged { .. }));
    assert!(channel.sent().is_empty());
}

/* ---------------- failure isolation ---------------- */

#[tokio::test]
async fn invalid_method_fails_only_its_target() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("bad"), &page("/x.zip"));
    site.set(&url("good"), &page("/g1.zip"));

    let targets = vec![
        target("bad", vec![step("unsupported-xyz", None, None)], 5),
        target("good", download_steps(), 5),
    ];
    let mut w = Watcher::new(targets, site.clone(), channel.clone());

    let mut rec = Recorder::default();
    let summary = w.scrape_all(&mut rec).await;
    assert_eq!((summary.checked, summary.failed), (2, 1));
    assert_eq!(rec.done, vec!["good"]);
    assert_eq!(rec.failed[0].0, "bad");

    match w.check_target(0).await {
        Err(WatchError::Extract(e)) => {
            assert_eq!(e.kind, StepError::InvalidStepMethod("unsupported-xyz".into()));
        }
        other => panic!("expected invalid method, got {other:?}"),
    }
    assert_eq!(w.cache().get("bad"), None);
    assert_eq!(w.cache().get("good"), Some("/g1.zip"));
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn null_traversal_aborts_target_and_leaves_cache_alone() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/f1.zip"));
    site.set(&url("other"), &page("/o1.zip"));

    let targets = vec![target("tool", download_steps(), 5), target("other", download_steps(), 5)];
    let mut w = Watcher::new(targets, site.clone(), channel.clone());
    w.scrape_all(&mut NullProgress).await;

    // the link text disappears: find_text → nothing, parent → abort
    site.set(&url("tool"), "<html><body><p>maintenance</p></body></html>");
    site.set(&url("other"), &page("/o2.zip"));

    let mut rec = Recorder::default();
    let summary = w.scrape_all(&mut rec).await;
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.changed, 1);
    assert!(rec.failed[0].1.contains("absent node"));

    assert_eq!(w.cache().get("tool"), Some("/f1.zip"));
    assert_eq!(channel.sent(), vec![("other".to_string(), "/o2.zip".to_string())]);
}

#[tokio::test]
async fn fetch_failure_skips_target_for_the_cycle() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    let mut w = Watcher::new(vec![target("tool", download_steps(), 5)], site.clone(), channel.clone());

    let err = w.check_target(0).await.unwrap_err();
    assert!(matches!(err, WatchError::Fetch(NetError::Status { status: 503, .. })));
    assert!(w.cache().is_empty());

    // comes back: first successful scrape is still only a baseline
    site.set(&url("tool"), &page("/f1.zip"));
    assert!(matches!(w.check_target(0).await.unwrap(), Outcome::Baseline { .. }));
    assert!(channel.sent().is_empty());
}

/* ---------------- startup reconciliation ---------------- */

#[tokio::test]
async fn reconcile_is_silent_when_channel_matches() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/downloads/f1.zip"));
    channel.acknowledge("tool", "f1.zip");

    let mut w = Watcher::new(vec![target("tool", download_steps(), 5)], site.clone(), channel.clone());
    w.scrape_all(&mut NullProgress).await;
    let decisions = w.reconcile_all(&mut NullProgress).await;

    assert_eq!(decisions, vec![("tool".to_string(), ReconcileDecision::InSync)]);
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn reconcile_resends_once_when_channel_is_behind() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/downloads/f2.zip"));
    channel.acknowledge("tool", "f1.zip");

    let mut w = Watcher::new(vec![target("tool", download_steps(), 5)], site.clone(), channel.clone());
    w.scrape_all(&mut NullProgress).await;
    w.reconcile_all(&mut NullProgress).await;

    assert_eq!(channel.sent(), vec![("tool".to_string(), "/downloads/f2.zip".to_string())]);
}

#[tokio::test]
async fn reconcile_takes_no_action_without_a_message() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("quiet"), &page("/q.zip"));
    site.set(&url("locked"), &page("/l.zip"));

    let targets = vec![
        target("quiet", download_steps(), 5),
        target("locked", download_steps(), 5),
        target("never", download_steps(), 5), // never fetched, nothing cached
    ];
    let mut w = Watcher::new(targets, site.clone(), channel.clone());
    w.scrape_all(&mut NullProgress).await;

    assert_eq!(w.reconcile_target(0).await, Some(ReconcileDecision::NoMessage));
    channel.fail_read.store(true, Ordering::SeqCst);
    assert_eq!(w.reconcile_target(1).await, Some(ReconcileDecision::NoMessage));
    assert_eq!(w.reconcile_target(2).await, None);
    assert!(channel.sent().is_empty());
}

/* ---------------- scheduling ---------------- */

#[tokio::test(start_paused = true)]
async fn each_target_runs_on_its_own_interval_until_shutdown() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("fast"), &page("/a.zip"));
    site.set(&url("slow"), &page("/b.zip"));

    let targets = vec![target("fast", download_steps(), 1), target("slow", download_steps(), 3)];
    let mut w = Watcher::new(targets, site.clone(), channel.clone());

    let shutdown = tokio::time::sleep(Duration::from_secs(3 * 60 + 30));
    w.run_schedule(shutdown, &mut NullProgress).await;

    assert_eq!(site.hits(&url("fast")), 3);
    assert_eq!(site.hits(&url("slow")), 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_failures_do_not_stop_the_loop() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    let mut w = Watcher::new(vec![target("flaky", download_steps(), 1)], site.clone(), channel.clone());

    site.remove(&url("flaky"));
    let shutdown = tokio::time::sleep(Duration::from_secs(4 * 60 + 1));
    let mut rec = Recorder::default();
    w.run_schedule(shutdown, &mut rec).await;

    assert_eq!(site.hits(&url("flaky")), 4);
    assert_eq!(rec.failed.len(), 4);
}

#[tokio::test]
async fn schedule_with_no_targets_returns_on_shutdown() {
    let mut w = Watcher::new(Vec::new(), FakeSite::default(), FakeChannel::default());
    w.run_schedule(std::future::ready(()), &mut NullProgress).await;
}

#[tokio::test]
async fn shutdown_before_first_tick_runs_nothing() {
    let site = FakeSite::default();
    site.set(&url("tool"), &page("/f1.zip"));
    let mut w = Watcher::new(vec![target("tool", download_steps(), 1)], site.clone(), FakeChannel::default());
    w.run_schedule(std::future::ready(()), &mut NullProgress).await;
    assert_eq!(site.hits(&url("tool")), 0);
}

/* ---------------- whole session ---------------- */

#[tokio::test(start_paused = true)]
async fn check_once_runs_one_pass_and_returns() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/downloads/f2.zip"));
    site.set(&url("docs"), &page("/docs/d1.pdf"));
    channel.acknowledge("tool", "f1.zip");
    channel.acknowledge("docs", "d1.pdf");

    let targets = vec![target("tool", download_steps(), 1), target("docs", download_steps(), 1)];
    let mut w = Watcher::new(targets, site.clone(), channel.clone());

    let mut progress = NullProgress;
    let session = w.run_session(true, std::future::pending(), &mut progress);
    let finished = tokio::time::timeout(Duration::from_secs(24 * 60 * 60), session).await;

    assert!(finished.is_ok(), "check_once kept running");
    assert_eq!(site.hits(&url("tool")), 1);
    assert_eq!(site.hits(&url("docs")), 1);
    // only the target whose channel is behind gets resent
    assert_eq!(channel.sent(), vec![("tool".to_string(), "/downloads/f2.zip".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn session_keeps_scheduling_until_shutdown() {
    let site = FakeSite::default();
    let channel = FakeChannel::default();
    site.set(&url("tool"), &page("/downloads/f2.zip"));
    channel.acknowledge("tool", "f1.zip");

    let mut w = Watcher::new(vec![target("tool", download_steps(), 1)], site.clone(), channel.clone());
    let shutdown = tokio::time::sleep(Duration::from_secs(2 * 60 + 30));
    w.run_session(false, shutdown, &mut NullProgress).await;

    // startup pass plus ticks at 1 and 2 minutes
    assert_eq!(site.hits(&url("tool")), 3);
    assert_eq!(channel.sent().len(), 1);
    assert_eq!(w.cache().get("tool"), Some("/downloads/f2.zip"));
}

#[tokio::test]
async fn shutdown_during_startup_skips_everything() {
    let site = FakeSite::default();
    site.set(&url("tool"), &page("/f1.zip"));
    let mut w = Watcher::new(vec![target("tool", download_steps(), 1)], site.clone(), FakeChannel::default());
    w.run_session(false, std::future::ready(()), &mut NullProgress).await;
    assert_eq!(site.hits(&url("tool")), 0);
}
