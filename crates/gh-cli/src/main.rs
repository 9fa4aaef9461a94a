//! CLI frontend for the Gildenhall town layer.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gild",
    about = "Gildenhall — a town of facilities for a party of adventurers",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the demo party through the town interactively
    Visit {
        /// Starting gold for the demo party
        #[arg(short, long, default_value = "1200")]
        gold: u32,
    },

    /// Show the demo party roster
    Roster,

    /// List the town's facilities
    Facilities {
        /// Optional JSON file overriding facility profiles
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Visit { gold } => commands::visit::run(gold),
        Commands::Roster => commands::roster::run(),
        Commands::Facilities { config } => commands::facilities::run(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
