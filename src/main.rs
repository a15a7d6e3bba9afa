use std::path::PathBuf;

use anyhow::Context;
use procset::AppConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::discover(explicit.as_deref()).context("loading configuration")?;
    tracing::info!(backend = %config.backend_path.display(), "starting process settings console");

    procset::run_gui(config).map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
