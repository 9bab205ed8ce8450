// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;

use crate::{
    config::{RunOptions, consts::DEFAULT_LOG_LEVEL, load_targets},
    core::{HttpFetcher, net},
    error::WatchError,
    notify::TelegramChannel,
    progress::Progress,
    runner::{Outcome, Watcher},
};

#[derive(Parser, Debug)]
#[command(name = "webwatch", version, about = "Watch websites for a new file and post it to Telegram")]
pub struct Cli {
    /// The JSON config file to process.
    pub json_config: PathBuf,

    /// Run the check once, without the scheduler.
    #[arg(long = "check_once", visible_alias = "check-once", overrides_with = "no_check_once")]
    pub check_once: bool,

    #[arg(long = "no-check_once", visible_alias = "no-check-once", overrides_with = "check_once")]
    pub no_check_once: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides.
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            config_path: cli.json_config,
            check_once: cli.check_once && !cli.no_check_once,
            log_level: cli.log_level,
        }
    }
}

/// Prints one line per target, like the scrape log a user would tail.
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, name: &str, outcome: &Outcome) {
        let tag = match outcome {
            Outcome::Baseline { .. } => "baseline",
            Outcome::Unchanged { .. } => "unchanged",
            Outcome::Changed { notified: true, .. } => "changed, sent",
            Outcome::Changed { notified: false, .. } => "changed, NOT sent",
        };
        println!("{name}: {} ({tag})", outcome.value());
    }
    fn item_failed(&mut self, name: &str, err: &WatchError) {
        println!("{name}: failed: {err}");
    }
}

/// Load targets, run the startup pass, then schedule unless `check_once`.
/// Ctrl-C ends the run cleanly at any point after the config is loaded.
pub async fn run(opts: RunOptions) -> color_eyre::Result<()> {
    let targets = load_targets(&opts.config_path)
        .wrap_err("cannot start without a valid configuration")?;
    let client = net::client()?;
    let mut watcher = Watcher::new(
        targets,
        HttpFetcher::new(client.clone()),
        TelegramChannel::new(client),
    );
    let mut progress = ConsoleProgress;

    let interrupted = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => logf!("terminated by user"),
            Err(e) => {
                loge!("cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    watcher.run_session(opts.check_once, interrupted, &mut progress).await;
    Ok(())
}
