use anyhow::{Context, Result};
use covidclean::{config::Config, stages};
use std::{env, fs, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) resolve the data directory ───────────────────────────────
    let base = env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let cfg = Config::new(base);
    fs::create_dir_all(cfg.clean_dir())
        .with_context(|| format!("creating {}", cfg.clean_dir().display()))?;

    // ─── 3) run every stage in order ─────────────────────────────────
    let start = Instant::now();
    for (name, stage) in stages::STAGES {
        let stage_start = Instant::now();
        stage(&cfg).with_context(|| format!("stage {} failed", name))?;
        info!(stage = %name, elapsed = ?stage_start.elapsed(), "stage complete");
    }

    info!(elapsed = ?start.elapsed(), "all clean tables written");
    Ok(())
}
