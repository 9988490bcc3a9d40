mod args;
mod check;
mod console;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackgrab_core::{
    load_config_or_default, metrics, validate_config, AdapterRegistry, BatchOrchestrator,
    HttpArtworkFetcher, Sinks, SystemProcessRunner, ToolResolver, WorkQueue,
};

use args::Cli;
use console::ConsoleSinks;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Loading configuration from {:?}", cli.config);
    let config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let resolver = ToolResolver::new(config.tools.clone());

    if cli.check {
        let (lines, all_available) = check::report(&resolver);
        for line in lines {
            println!("{}", line);
        }
        return Ok(if all_available {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let requests = cli.requests(&config.downloads)?;
    let queue = WorkQueue::new();
    let queued = queue.enqueue_all(requests).await;
    info!("Queued {} request(s)", queued);

    let registry = prometheus::Registry::new();
    metrics::register_metrics(&registry).context("Failed to register metrics")?;

    let artwork = Arc::new(
        HttpArtworkFetcher::new(&config.artwork).context("Failed to create HTTP client")?,
    );
    let adapters = AdapterRegistry::standard(Arc::new(SystemProcessRunner), resolver, artwork);
    let orchestrator = BatchOrchestrator::new(config.orchestrator.clone(), adapters);

    let handle = orchestrator
        .start(queue.clone(), Sinks::from_shared(Arc::new(ConsoleSinks)))
        .await?;

    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current download");
            cancel.cancel();
        }
    });

    let summary = handle.join().await?;

    for line in console::summary_lines(&summary) {
        println!("{}", line);
    }
    for line in console::pending_lines(&queue.snapshot().await) {
        println!("{}", line);
    }

    if cli.metrics {
        print!("{}", metrics::encode_metrics(&registry)?);
    }

    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
