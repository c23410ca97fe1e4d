use anyhow::Result;
use clap::Parser;
use pizzeria_storefront::{
    cli::{Args, CliApp},
    utils::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(Config::log_directive(args.verbose)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {:#}", e);
        e
    })?;
    if let Some(path) = &args.catalog {
        config.catalog_path = Some(path.clone());
        config.validate().map_err(|e| {
            tracing::error!("Invalid --catalog: {:#}", e);
            e
        })?;
    }

    tracing::info!(
        "🍕 Pizzeria storefront starting in {} environment",
        config.environment
    );

    let app = CliApp::new(&config).await.map_err(|e| {
        tracing::error!("Failed to start: {:#}", e);
        e
    })?;
    app.run(args)?;

    tracing::info!("🍕 Pizzeria storefront stopped");
    Ok(())
}
