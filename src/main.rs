//! `health-probe`: checks a server's health endpoint and reports via exit code.
//!
//! Loads the JSON monitoring config, resolves the target from `SERVER_HOST` /
//! `SERVER_PORT` or positional arguments, runs the retry loop and exits 0 when
//! the server is healthy, 1 otherwise.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use health_probe::{
    config::DEFAULT_CONFIG_PATH, report, MonitoringConfig, RetryController, TargetOverrides,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "health_probe=info";

/// Retried HTTP health probe
#[derive(Parser, Debug)]
#[command(name = "health-probe", version, about)]
struct Args {
    /// Server host (overridden by SERVER_HOST)
    host: Option<String>,

    /// Server port (overridden by SERVER_PORT)
    port: Option<String>,

    /// Path to the JSON monitoring config
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "health_probe=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    ExitCode::from(exit_status(run(args)))
}

/// Maps a run to its process exit status; any fatal error exits 1.
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(err) => {
            tracing::error!("unexpected error: {err:#}");
            1
        }
    }
}

fn run(args: Args) -> anyhow::Result<u8> {
    let config = MonitoringConfig::load(&args.config)?;
    let overrides = TargetOverrides::from_env_or(args.host, args.port);
    let controller = config
        .resolve(&overrides)
        .and_then(RetryController::new)
        .context("cannot start health check")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let options = controller.options();
    report::banner(options);
    let verdict = runtime.block_on(controller.run_with(|event| report::attempt(event, options)));
    report::verdict(&verdict, options);

    Ok(verdict.exit_status())
}
