// src/bin/webwatch.rs
use clap::Parser;
use webwatch::{cli, config::RunOptions, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let opts: RunOptions = cli::Cli::parse().into();
    log::init(&opts.log_level);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(cli::run(opts))
}
