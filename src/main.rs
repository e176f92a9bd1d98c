use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lantern::config::Config;
use lantern::server;

/// Prefix-routed HTTP server.
#[derive(Debug, Parser)]
#[command(name = "lantern", version)]
struct Args {
    /// Path to the YAML configuration file
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load(&args.config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;

    let workers = num_cpus::get().max(4);
    tracing::info!(workers, port = cfg.port, "Starting server");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async {
        tokio::select! {
            res = server::listener::run(&cfg) => {
                res?;
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
