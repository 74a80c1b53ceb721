//! Evaluate command - Play a trained agent against a random opponent

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_number, format_percent, print_kv, print_section},
    pipeline::evaluate_against_random,
    q_learning::SavedQAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent (as X) against a random opponent")]
pub struct EvaluateArgs {
    /// Path to a trained agent file
    #[arg(long, short = 'a')]
    pub agent: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading trained agent from: {}", args.agent.display());
    let saved = SavedQAgent::load_from_file(&args.agent)?;
    let mut agent = saved.to_agent()?;

    print_section("Loaded Agent Info");
    print_kv(
        "Episodes trained",
        &format_number(saved.metadata.episodes_trained),
    );
    print_kv("Table entries", &format_number(agent.q_table().len()));

    let result = evaluate_against_random(&mut agent, args.games, args.seed)?;

    print_section("Evaluation vs Random (agent plays X)");
    print_kv("Games", &format_number(result.games));
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_percent(result.win_rate)),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_percent(result.draw_rate)),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", result.losses, format_percent(result.loss_rate)),
    );

    Ok(())
}
