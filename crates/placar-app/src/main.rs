// Match-results analysis entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Load config; a first argument overrides the dataset path
// 3. Load the dataset (fatal if unavailable)
// 4. Run every aggregation
// 5. Print the report

use placar_app::config;
use placar_app::report;

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("placar starting up");

    // 2. Load config
    let mut config = config::load_config().context("failed to load configuration")?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = PathBuf::from(path);
    }
    info!(
        "Config loaded: dataset={}, season={:?}, format={:?}",
        config.dataset_path.display(),
        config.season,
        config.format
    );

    // 3. Load the dataset
    let table = placar_core::load_table(&config.dataset_path, config.delimiter)
        .context("failed to load dataset")?;

    // 4. Run the pipeline
    let report = placar_core::run(table, &config.pipeline_options());

    // 5. Print
    let rendered =
        report::render(&report, config.format, config.pretty).context("failed to render report")?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("placar_core=info,placar_app=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
