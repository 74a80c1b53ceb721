//! Q-learning Tic-Tac-Toe CLI
//!
//! This CLI provides a unified interface for:
//! - Training an agent by self-play
//! - Inspecting learned action values
//! - Evaluating a trained agent

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use ttt_qlearn::cli::commands::{evaluate, inspect, train};

#[derive(Parser)]
#[command(name = "ttt-qlearn")]
#[command(version, about = "Tabular Q-learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent by self-play
    Train(train::TrainArgs),

    /// Show the learned values of a board position
    Inspect(inspect::InspectArgs),

    /// Evaluate a trained agent against a random opponent
    Evaluate(evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => train::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Evaluate(args) => evaluate::execute(args),
    }
}
