//! `stockdash`: terminal dashboard for a simulated trading portfolio.
//!
//! Built on [ratatui](https://ratatui.rs) with data from
//! `stockdash-core`'s [`Dashboard`](stockdash_core::Dashboard) watch
//! channels. Screens are navigable via number keys (1-3): Overview,
//! Positions, and Activity.
//!
//! Logs go to a file (default `/tmp/stockdash.log`) so they never corrupt
//! the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use stockdash_config::Config;
use stockdash_core::{Dashboard, DashboardConfig};

use crate::app::App;

/// Terminal dashboard for a simulated trading portfolio feed.
#[derive(Parser, Debug)]
#[command(name = "stockdash", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, short = 'c', env = "STOCKDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Portfolio feed URL, overriding `[dashboard].feed_url`.
    #[arg(long, short = 'f', env = "STOCKDASH_FEED_URL")]
    feed_url: Option<Url>,

    /// Sleep-status proxy URL, overriding `[dashboard].proxy_url`.
    #[arg(long, short = 'p', env = "STOCKDASH_PROXY_URL")]
    proxy_url: Option<Url>,

    /// Auto-refresh period, e.g. `30s` or `2m`. `0s` disables the timer.
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Log file path.
    #[arg(long, default_value = "/tmp/stockdash.log")]
    log_file: PathBuf,

    /// Save the effective settings (file, environment and flags) to the
    /// config file, then exit.
    #[arg(long)]
    write_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard must live until exit so the
/// background writer flushes.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("stockdash={level},stockdash_core={level},stockdash_api={level}"))
    });

    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("stockdash.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Config file (or built-in defaults) with CLI overrides folded into the
/// `[dashboard]` table.
fn effective_settings(cli: &Cli) -> Result<(PathBuf, Config)> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(stockdash_config::config_path);
    let mut settings = stockdash_config::load_config_from(&path)
        .wrap_err_with(|| format!("loading {}", path.display()))?;

    let dashboard = &mut settings.dashboard;
    if let Some(ref url) = cli.feed_url {
        dashboard.feed_url = url.to_string();
    }
    if let Some(ref url) = cli.proxy_url {
        dashboard.proxy_url = Some(url.to_string());
    }
    if let Some(interval) = cli.interval {
        dashboard.refresh_interval = interval.as_secs();
    }
    Ok((path, settings))
}

fn dashboard_config(cli: &Cli) -> Result<DashboardConfig> {
    let (_, settings) = effective_settings(cli)?;
    let mut config = settings.dashboard.to_dashboard_config()?;
    // The file stores whole seconds; keep the flag's full precision.
    if let Some(interval) = cli.interval {
        config.refresh_interval = interval;
    }
    Ok(config)
}

fn write_config(cli: &Cli) -> Result<PathBuf> {
    let (path, settings) = effective_settings(cli)?;
    stockdash_config::save_config_to(&path, &settings)
        .wrap_err_with(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;

    if cli.write_config {
        let path = write_config(&cli)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let _log_guard = setup_tracing(&cli);

    let config = dashboard_config(&cli)?;
    info!(
        feed = %config.feed_url,
        proxy = config.proxy_url.as_ref().map_or("(none)", Url::as_str),
        interval = ?config.refresh_interval,
        "starting stockdash"
    );

    let dashboard = Dashboard::new(config)?;
    let mut app = App::new(dashboard);
    app.run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_flags_override_config_file() {
        let cli = Cli::parse_from([
            "stockdash",
            "--config",
            "/nonexistent/stockdash/config.toml",
            "--feed-url",
            "http://127.0.0.1:9/feed.json",
            "--proxy-url",
            "http://127.0.0.1:8787/",
            "--interval",
            "0s",
        ]);
        let config = dashboard_config(&cli).unwrap();
        assert_eq!(config.feed_url.as_str(), "http://127.0.0.1:9/feed.json");
        assert_eq!(
            config.proxy_url.as_ref().map(Url::as_str),
            Some("http://127.0.0.1:8787/")
        );
        assert!(config.refresh_interval.is_zero());
    }

    #[test]
    fn write_config_persists_flag_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cli = Cli::parse_from([
            "stockdash",
            "--config",
            path.to_str().unwrap(),
            "--proxy-url",
            "http://127.0.0.1:8787/",
            "--interval",
            "90s",
            "--write-config",
        ]);

        assert_eq!(write_config(&cli).unwrap(), path);

        let saved = stockdash_config::load_config_from(&path).unwrap();
        assert_eq!(
            saved.dashboard.proxy_url.as_deref(),
            Some("http://127.0.0.1:8787/")
        );
        assert_eq!(saved.dashboard.refresh_interval, 90);
    }
}
