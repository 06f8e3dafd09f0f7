//! Token Tongs - menu bar app showing the remaining OpenRouter credit balance
//!
//! Polls OpenRouter's credits endpoint every 30 minutes and shows
//! credits minus usage as the menu bar title, with a small menu listing
//! the provider, total credits, total usage and when it last updated.

mod cli;
mod config;
mod core;
mod logging;
mod monitor;
mod providers;
mod tray;

use std::time::Duration;

use clap::Parser;

use crate::cli::{exit_codes, Cli};
use crate::config::Config;
use crate::core::{DisplayState, MenuText};
use crate::monitor::BalanceMonitor;
use crate::providers::OpenRouterSource;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.json_output) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");
    let Config {
        credential,
        endpoint,
        refresh_interval,
        request_timeout,
    } = config;

    let source = match OpenRouterSource::new(endpoint, request_timeout) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };
    tracing::debug!(endpoint = source.endpoint(), "Using balance endpoint");

    let monitor = BalanceMonitor::new(credential, Box::new(source));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    if cli.once {
        rt.block_on(run_once(monitor))
    } else {
        run_tray(&rt, monitor, refresh_interval)
    }
}

/// Refresh once and print the menu instead of showing it
async fn run_once(mut monitor: BalanceMonitor) -> i32 {
    if monitor.has_credential() {
        tracing::info!(provider = monitor.provider(), "Fetching balance");
        monitor.refresh().await;
    }

    print!("{}", format_menu(monitor.text()));

    match monitor.state() {
        DisplayState::Ok { .. } => exit_codes::SUCCESS,
        DisplayState::NoCredential => exit_codes::MISSING_CREDENTIAL,
        DisplayState::Loading | DisplayState::Error { .. } => exit_codes::FETCH_FAILED,
    }
}

fn run_tray(rt: &tokio::runtime::Runtime, monitor: BalanceMonitor, interval: Duration) -> i32 {
    let event_loop = match tray::event_loop() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    let initial = monitor.text().clone();
    let proxy = event_loop.create_proxy();
    rt.spawn(monitor::run_poller(monitor, interval, move |update| {
        tray::publish(&proxy, update)
    }));

    match tray::run(event_loop, initial) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            tracing::error!("Tray application failed: {}", e);
            exit_codes::UNEXPECTED_FAILURE
        }
    }
}

/// Plain-text rendering of the menu for `--once`
fn format_menu(text: &MenuText) -> String {
    let mut out = format!("{}\n", text.title);
    for line in text.lines() {
        match line {
            Some(line) => out.push_str(&format!("  {}\n", line)),
            None => out.push_str("  --\n"),
        }
    }
    out
}
