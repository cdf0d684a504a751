//! Follow a gates file and print each resolved view

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use featuregates_engine::{FeatureGates, FileSource};

use super::configure;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Directory the document path is relative to
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// JSON document to follow, relative to --root
    #[arg(long)]
    pub path: String,

    /// TOML gates config (translate rules, filters, logging)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,
}

pub fn execute(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(args))
}

async fn watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source =
        FileSource::new(&args.root).with_interval(Duration::from_millis(args.interval_ms));
    let builder = configure(FeatureGates::builder(), args.config.as_deref())?
        .source(Arc::new(source))
        .path(args.path.clone())
        .on_loaded(|view| match serde_json::to_string(&view) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("Error: cannot encode view: {err}"),
        })
        .on_reload_error(|err| eprintln!("Error: {err}"));
    let gates = builder.build()?;

    gates.initialize().await?;
    tokio::signal::ctrl_c().await?;
    gates.unsubscribe();
    Ok(())
}
