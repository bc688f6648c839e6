//! Metagame CLI - command-line interface
//!
//! Commands:
//! - simulate: evolve a population over a scoring matrix and report
//!   per-archetype statistics

use clap::{Parser, Subcommand};

mod simulate;

#[derive(Parser)]
#[command(name = "metagame")]
#[command(about = "Metagame evolution simulator")]
struct Cli {
    /// RNG seed for reproducible runs (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation over a scoring matrix
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}
