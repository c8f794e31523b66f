use anyhow::Context;
use cdc_dispatch::HandlerRegistry;
use clap::Parser;
use contact_sync::{ContactChangeHandler, SyncConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SyncConfig::parse();
    let batch = config.read_batch()?;

    let handler = ContactChangeHandler::new(config.interest());
    let summary = handler.summary();

    let mut registry = HandlerRegistry::new();
    registry.register(config.entity.clone(), handler)?;
    let mut dispatcher = registry
        .dispatcher(&config.entity)
        .context("no handler registered")?;

    let report = dispatcher.dispatch_batch(&batch).await;
    println!("{}", serde_json::to_string_pretty(&summary.counts())?);

    let failures = report.failures.len() + usize::from(report.completion.is_err());
    for error in report.into_errors() {
        println!("- {error:#}");
    }
    if config.strict && failures > 0 {
        anyhow::bail!("{failures} dispatch failures");
    }

    Ok(())
}
