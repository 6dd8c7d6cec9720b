mod cli;
mod config;
mod coordinator;
mod error;
mod executor;
mod fetch;
mod report;
mod runner;
mod script;
mod session;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use config::{Config, RunConfig};
use coordinator::Coordinator;
use fetch::SourceFetcher;
use report::FailureReport;
use session::CqlSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cql_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Cli::parse();
    let cfg = Config::load();
    tracing::debug!(path = %cfg.config_path.display(), "loaded configuration");

    // CLI overrides config
    let run = RunConfig::resolve(&args, &cfg)?;

    let session = CqlSession::connect(&run.cluster).await?;
    let fetcher = SourceFetcher::new(run.fetch_timeout)?;
    let coordinator = Coordinator::new(Arc::new(fetcher), Arc::new(session));

    match coordinator.run_all(&run.sources, run.mode).await {
        Ok(()) => {
            tracing::info!(sources = run.sources.len(), "all scripts applied");
            Ok(())
        }
        Err(failure) => {
            tracing::error!(failed = failure.failures.len(), "run failed");
            FailureReport::for_stderr(&failure).print();
            std::process::exit(1);
        }
    }
}
