use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockdash_config::{ProxySettings, load_config_from};
use stockdash_proxy::{ProxyError, ProxyState, router};

/// Serve the Twitch sleep status of one broadcaster as JSON.
#[derive(Debug, Parser)]
#[command(name = "sleep-proxy", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, short = 'c', env = "STOCKDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding `[proxy].bind`.
    #[arg(long, short = 'b', env = "SLEEP_PROXY_BIND")]
    bind: Option<SocketAddr>,

    /// Broadcaster login to watch.
    #[arg(long)]
    channel: Option<String>,

    /// Category name that counts as sleeping.
    #[arg(long)]
    sleep_game: Option<String>,

    /// Upstream request timeout, e.g. `10s`.
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli).await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},tower_http={level},hyper=warn,reqwest=warn"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn settings(cli: &Cli) -> Result<ProxySettings, ProxyError> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(stockdash_config::config_path);
    let mut proxy = load_config_from(&path)?.proxy;

    if let Some(bind) = cli.bind {
        proxy.bind = bind.to_string();
    }
    if let Some(ref channel) = cli.channel {
        proxy.channel.clone_from(channel);
    }
    if let Some(ref game) = cli.sleep_game {
        proxy.sleep_game.clone_from(game);
    }
    if let Some(timeout) = cli.timeout {
        proxy.timeout = timeout.as_secs().max(1);
    }
    Ok(proxy)
}

async fn run(cli: Cli) -> Result<(), ProxyError> {
    let settings = settings(&cli)?;
    let addr = settings.bind_addr()?;
    let state = ProxyState::from_settings(&settings)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ProxyError::Bind { addr, source })?;

    info!(
        %addr,
        channel = %settings.channel,
        sleep_game = %settings.sleep_game,
        "sleep proxy listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ProxyError::Serve)?;

    info!("sleep proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
