//! Greedy evaluation against a uniformly random opponent

use log::info;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::QLearningAgent,
    tictactoe::{GameOutcome, GameState, Player},
};

/// Outcome counts from the agent's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

#[derive(Debug, Default)]
struct Tally {
    wins: usize,
    draws: usize,
    losses: usize,
}

impl Tally {
    /// Count a finished game; an ongoing game is not a result
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Player::X) => self.wins += 1,
            GameOutcome::Win(Player::O) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }
    }
}

impl EvaluationResult {
    fn new(wins: usize, draws: usize, losses: usize) -> Self {
        let games = wins + draws + losses;
        let rate = |count: usize| {
            if games > 0 {
                count as f64 / games as f64
            } else {
                0.0
            }
        };

        Self {
            games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }
}

/// Play `games` games with the agent as X and a random O
///
/// The agent always exploits (ties still break uniformly). Exploration is
/// off because its values are learned from X's rewards. The table is not
/// updated.
pub fn evaluate_against_random(
    agent: &mut QLearningAgent,
    games: usize,
    seed: Option<u64>,
) -> Result<EvaluationResult> {
    let mut opponent_rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    if let Some(seed) = seed {
        // Offset so the two generators do not mirror each other
        agent.set_rng_seed(seed.wrapping_add(1));
    }

    let mut tally = Tally::default();
    let mut game = GameState::new();

    for _ in 0..games {
        game.reset();
        let outcome = loop {
            let legal = game.legal_actions();
            let action = match game.to_move() {
                Player::X => agent.greedy_action(&game.state_key(), &legal)?,
                Player::O => *legal.choose(&mut opponent_rng).ok_or(Error::NoValidMoves)?,
            };
            let outcome = game.apply_action(action)?;
            if outcome.is_terminal() {
                break outcome;
            }
        };

        tally.record(outcome);
    }

    let result = EvaluationResult::new(tally.wins, tally.draws, tally.losses);
    info!(
        "evaluated {} games vs random: {} wins, {} draws, {} losses",
        result.games, result.wins, result.draws, result.losses
    );
    Ok(result)
}
