//! Terminal status indicator for Antigravity model quotas.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use gravimeter_core::modules::config::DEFAULT_POLL_INTERVAL_SECS;
use gravimeter_core::{ProcessLocator, QuotaClassifier, QuotaWatcher, WatcherConfig};
use gravimeter_types::{format_clock, ClockMode, QuotaSnapshot, WatchState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Parses the `--clock` argument.
fn parse_clock_mode(s: &str) -> Result<ClockMode, String> {
    match s {
        "auto" => Ok(ClockMode::Auto),
        "12h" => Ok(ClockMode::TwelveHour),
        "24h" => Ok(ClockMode::TwentyFourHour),
        other => Err(format!("unknown clock mode '{other}' (expected auto, 12h or 24h)")),
    }
}

#[derive(Parser, Debug)]
#[command(name = "gravimeter", author, version, about, long_about = None)]
struct Cli {
    /// Workspace folder used to pick among several IDE windows
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one quota snapshot and exit
    Status {
        /// Emit the raw snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Clock style for reset times
        #[arg(long, default_value = "auto", value_parser = parse_clock_mode)]
        clock: ClockMode,
        /// Hide reset countdowns
        #[arg(long)]
        no_countdown: bool,
    },
    /// Poll on an interval and print every update until interrupted
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
        /// Clock style for reset times
        #[arg(long, default_value = "auto", value_parser = parse_clock_mode)]
        clock: ClockMode,
        /// Hide reset countdowns
        #[arg(long)]
        no_countdown: bool,
    },
    /// Print the discovered language-server process and exit
    Locate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { json, clock, no_countdown } => {
            let info = ProcessLocator::new()
                .locate(cli.workspace.as_deref())
                .await
                .context("no running Antigravity language server found")?;
            let snapshot = QuotaClassifier::new()
                .fetch_and_classify(&info)
                .await
                .context("status query failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot, clock, !no_countdown);
            }
        },
        Commands::Watch { interval, clock, no_countdown } => {
            let config = WatcherConfig {
                poll_interval_secs: interval,
                clock_mode: clock,
                show_reset_countdown: !no_countdown,
                workspace_hint: cli.workspace.clone(),
            };
            let watcher = Arc::new(QuotaWatcher::new(config));
            watcher.start();
            info!("watching quota (ctrl-c to stop)");

            let updates = print_updates(&watcher, clock, !no_countdown);
            tokio::select! {
                _ = updates => {},
                _ = tokio::signal::ctrl_c() => {
                    watcher.stop();
                    info!("stopped");
                },
            }
        },
        Commands::Locate => {
            let info = ProcessLocator::new()
                .locate(cli.workspace.as_deref())
                .await
                .context("no running Antigravity language server found")?;
            // ProcessInfo's Display keeps the token redacted.
            println!("{info}");
        },
    }

    Ok(())
}

/// Samples the watcher and prints every new snapshot or availability change.
async fn print_updates(watcher: &QuotaWatcher, clock: ClockMode, show_countdown: bool) {
    let mut last_stamp = None;
    let mut reported_down = false;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        match watcher.state() {
            WatchState::Detecting => {},
            WatchState::Ready(snapshot) => {
                if last_stamp != Some(snapshot.timestamp) {
                    last_stamp = Some(snapshot.timestamp);
                    reported_down = false;
                    println!(
                        "--- {} ---",
                        snapshot.timestamp.with_timezone(&Local).format("%H:%M:%S")
                    );
                    print_snapshot(&snapshot, clock, show_countdown);
                }
            },
            WatchState::Unavailable => {
                if !reported_down {
                    reported_down = true;
                    println!("language server unavailable, retrying...");
                }
            },
        }
    }
}

fn print_snapshot(snapshot: &QuotaSnapshot, clock: ClockMode, show_countdown: bool) {
    if let Some(credits) = &snapshot.credits {
        println!(
            "Credits: {:.1} / {:.0} ({:.1}%)",
            credits.available, credits.monthly, credits.remaining_pct
        );
    }
    if snapshot.pools.is_empty() {
        println!("No model quota reported.");
        return;
    }
    for pool in &snapshot.pools {
        let mut line = format!("{:<10} {:>6.1}%", pool.display_name, pool.remaining_pct);
        if pool.is_exhausted {
            line.push_str("  EXHAUSTED");
        }
        if let Some(reset) = pool.reset_time {
            if show_countdown {
                line.push_str(&format!("  resets in {}", pool.time_until_reset));
            }
            line.push_str(&format!(" (at {})", format_clock(reset.with_timezone(&Local), clock)));
        }
        println!("{line}");
        for member in &pool.members {
            println!("    {} [{}]", member.label, member.model_id);
        }
    }
}
