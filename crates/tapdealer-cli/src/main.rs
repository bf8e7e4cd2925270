//! Tapdealer - Main entry point

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapdealer_cli::{run, Cli, DealerConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = DealerConfig::resolve(cli.config.as_deref())?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("tapdealer v{} with {:?}", env!("CARGO_PKG_VERSION"), config);

    run(cli, &config)
}
