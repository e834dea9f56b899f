use aes_energy_etl::prelude::*;
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = PipelineConfig::from_env().context("invalid configuration")?;
    info!(
        data_dir = %config.data_dir.display(),
        database = %config.database_path.display(),
        "configured"
    );

    // ─── 3) extract, reshape, load ───────────────────────────────────
    let summary = run(&config).context("energy statistics load failed")?;

    info!(
        regions = summary.regions,
        consumption = summary.consumption_records,
        generation = summary.generation_records,
        "all done"
    );
    Ok(())
}
