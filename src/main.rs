use anyhow::Result;
use coffee_harvest::HarvestConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coffee_harvest=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = HarvestConfig::default();
    let report = coffee_harvest::run(&config).await?;

    info!(
        "Wrote {} of {} collected hrefs to {} ({:?})",
        report.written,
        report.collected,
        report.output_path.display(),
        report.stop_reason
    );
    Ok(())
}
