//! Common test utilities for the ttt-qlearn test suite.
//!
//! This module provides agent builders and an exhaustive walk of the game
//! tree used across multiple tests.

#![allow(dead_code)]

use std::collections::HashMap;

use ttt_qlearn::{AgentConfig, GameState, QLearningAgent, StateKey};

/// Agent with the given hyper-parameters and a fixed exploration seed.
pub fn seeded_agent(epsilon: f64, alpha: f64, gamma: f64, seed: u64) -> QLearningAgent {
    QLearningAgent::new(AgentConfig::new(epsilon, alpha, gamma).unwrap())
        .unwrap()
        .with_seed(seed)
}

/// Every position reachable from the empty board by legal play, keyed by
/// state key. Play stops at terminal positions.
pub fn reachable_states() -> HashMap<StateKey, GameState> {
    let mut seen = HashMap::new();
    let mut stack = vec![GameState::new()];

    while let Some(state) = stack.pop() {
        if seen.contains_key(&state.state_key()) {
            continue;
        }
        if !state.evaluate_outcome().is_terminal() {
            for action in state.legal_actions() {
                let mut next = state.clone();
                next.apply_action(action).unwrap();
                stack.push(next);
            }
        }
        seen.insert(state.state_key(), state);
    }

    seen
}

/// Play a sequence of (row, col) moves from the empty board.
pub fn play(moves: &[(usize, usize)]) -> GameState {
    let mut state = GameState::new();
    for &(row, col) in moves {
        state.apply_move(row, col).unwrap();
    }
    state
}
