use crate::layout_settings::EngineSettings;
use crate::serialization::{self, DatasetError, SettingsError};
use crate::state::State;
use crate::store::Store;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(name = "casegraph")]
#[command(about = "Lay out an entity relationship dataset and print the view")]
#[command(version)]
pub struct Args {
    /// Dataset JSON file (entity list or `{ "entities": [...] }`)
    pub dataset: PathBuf,

    /// Engine settings JSON file
    pub settings: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write snapshot: {0}")]
    Output(#[from] std::io::Error),
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`). Stdout carries
/// the snapshot.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Entry point used by the native executable. `args` includes the program
/// name, as `std::env::args_os()` yields it.
pub fn run<I, T>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(args)?;
    let settings = match &args.settings {
        Some(path) => serialization::load_settings(path)?,
        None => EngineSettings::default(),
    };

    let dataset = serialization::load_dataset(&args.dataset)?;
    let mut state = State::new(Store::with_dataset(&settings, dataset));
    let outcome = state.run_layout();
    info!(?outcome, "layout finished");

    let snapshot = state.snapshot();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &snapshot)?;
    writeln!(out)?;
    Ok(())
}
