//! featuregates CLI
//!
//! Resolve a gates document once, or follow a gates file as it changes

use clap::{Parser, Subcommand};
use featuregates_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "featuregates")]
#[command(about = "Feature gates - translate, filter and watch gate documents", long_about = None)]
struct Cli {
    /// Logging profile: dev, prod or test
    #[arg(long, global = true, default_value = "dev")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a JSON gates document and print the result
    Resolve(commands::resolve::ResolveArgs),
    /// Follow a gates file and print every resolved view
    Watch(commands::watch::WatchArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Watch(args) => commands::watch::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
