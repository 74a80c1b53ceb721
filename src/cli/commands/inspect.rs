//! Inspect command - Show learned action values for a board

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection, render_value_grid},
    q_learning::{QLearningAgent, SavedQAgent},
    tictactoe::GameState,
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Show the learned values of a board position")]
pub struct InspectArgs {
    /// Path to a trained agent file
    #[arg(long, short = 'a')]
    pub agent: PathBuf,

    /// Board as nine cells in row-major order, e.g. "X.O......" (default: empty board)
    #[arg(long, short = 'b', default_value = ".........")]
    pub board: String,
}

/// Legal actions of `state` with their stored values, best first
///
/// Ties keep row-major order.
pub fn ranked_actions(agent: &QLearningAgent, state: &GameState) -> Vec<(Action, f64)> {
    let key = state.state_key();
    let mut ranked: Vec<(Action, f64)> = state
        .legal_actions()
        .into_iter()
        .map(|action| (action, agent.value_of(&key, action)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = SavedQAgent::load_from_file(&args.agent)?;
    let agent = saved.to_agent()?;
    let state = GameState::from_string(&args.board)
        .with_context(|| format!("Invalid board '{}'", args.board))?;

    print_section("Agent");
    print_kv("Path", &args.agent.display().to_string());
    print_kv(
        "Episodes trained",
        &format_number(saved.metadata.episodes_trained),
    );
    print_kv("Table entries", &format_number(agent.q_table().len()));
    print_kv("States", &format_number(agent.q_table().state_count()));

    print_subsection(&format!("Board ({} to move)", state.to_move()));
    println!("{state}");

    let outcome = state.evaluate_outcome();
    if outcome.is_terminal() {
        println!("\nGame is over ({outcome:?}); no legal actions.");
        return Ok(());
    }

    let ranked = ranked_actions(&agent, &state);
    print_subsection("Action values");
    println!("{}", render_value_grid(&state, &ranked));
    println!();
    for (action, value) in &ranked {
        let seen = if agent.q_table().contains(&state.state_key(), *action) {
            ""
        } else {
            "  (unseen)"
        };
        println!("  {action}  {value:+.4}{seen}");
    }

    Ok(())
}
