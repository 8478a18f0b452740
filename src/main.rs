use anyhow::Context;
use clap::Parser;
use localplot::{
    init_logging, load_into_store, read_drawings, ArrangeSession, ArrangeSummary, CancelToken,
    Config, EventBus, EventBusConfig, ItemStore, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Arrange HPGL drawings on the plotter sheet
#[derive(Parser, Debug)]
#[command(name = "localplot", version, about)]
struct Cli {
    /// JSON list of drawings to arrange
    drawings: PathBuf,

    /// Config file (.toml or .json); defaults to the user config
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    info!("localplot {} (built {})", VERSION, BUILD_DATE);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        history_lines: config.plotter.console_history,
        ..Default::default()
    }));

    let drawings = read_drawings(&cli.drawings)?;
    let store = Arc::new(ItemStore::new());
    load_into_store(&store, &drawings, &bus)?;
    config.remember_directory(&cli.drawings);

    let cancel = CancelToken::new();
    let mut session = {
        let (store, bus, cancel) = (store.clone(), bus.clone(), cancel.clone());
        let arrange = config.arrange.to_arrange_config();
        tokio::task::spawn_blocking(move || {
            ArrangeSession::new(store, arrange)
                .with_event_bus(&bus)
                .with_cancel_token(cancel)
                .run()
        })
    };
    let report = tokio::select! {
        joined = &mut session => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling auto arrange");
            cancel.cancel();
            session.await
        }
    }
    .context("Arrange session stopped unexpectedly")??;

    for line in bus.history() {
        eprintln!("{}", line.render());
    }
    let summary = ArrangeSummary::new(&store, &report, config.plotter.display_units);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Err(e) = config.save_to_file(&config_path) {
        warn!("Could not save config {}: {}", config_path.display(), e);
    }

    if !report.outcome.is_completed() {
        anyhow::bail!("Auto arrange did not complete: {}", report.outcome);
    }
    Ok(())
}
