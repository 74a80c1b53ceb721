//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, StateKey};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Absent pairs read as `0.0` through [`QTable::value_of`]; the map itself
/// only holds pairs that have been written. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: (state_key, action) -> Q-value
    q_values: HashMap<(StateKey, Action), f64>,
}

impl QTable {
    /// Value reported for pairs that were never written
    pub const UNSEEN_VALUE: f64 = 0.0;

    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair, `0.0` when absent
    pub fn value_of(&self, state: &StateKey, action: Action) -> f64 {
        match self.q_values.get(&(*state, action)) {
            Some(&value) => value,
            None => Self::UNSEEN_VALUE,
        }
    }

    /// Whether the pair has ever been written
    pub fn contains(&self, state: &StateKey, action: Action) -> bool {
        self.q_values.contains_key(&(*state, action))
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Get maximum Q-value over legal actions in a state, `0.0` when there
    /// are no actions
    pub fn max_value(&self, state: &StateKey, legal_actions: &[Action]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.value_of(state, action))
            .reduce(f64::max)
            .unwrap_or(Self::UNSEEN_VALUE)
    }

    /// Every legal action achieving the maximum Q-value, in input order
    pub fn best_actions(&self, state: &StateKey, legal_actions: &[Action]) -> Vec<Action> {
        let best = self.max_value(state, legal_actions);
        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.value_of(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
    ///
    /// The future term is zero when `next_legal_actions` is empty. Returns the
    /// stored estimate.
    #[allow(clippy::too_many_arguments)]
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[Action],
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current_q = self.value_of(&state, action);
        let max_next_q = self.max_value(next_state, next_legal_actions);
        let td_target = reward + discount_factor * max_next_q;
        let new_q = (1.0 - learning_rate) * current_q + learning_rate * td_target;
        self.set(state, action, new_q);
        new_q
    }

    /// Stored entries for one state, sorted by action
    pub fn entries_for(&self, state: &StateKey) -> Vec<(Action, f64)> {
        let mut entries: Vec<(Action, f64)> = self
            .q_values
            .iter()
            .filter(|((key, _), _)| key == state)
            .map(|(&(_, action), &value)| (action, value))
            .collect();
        entries.sort_by_key(|&(action, _)| action);
        entries
    }

    /// Iterate over all stored entries
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, Action, f64)> + '_ {
        self.q_values
            .iter()
            .map(|(&(state, action), &value)| (state, action, value))
    }

    /// Number of distinct states with at least one stored entry
    pub fn state_count(&self) -> usize {
        let mut states: Vec<StateKey> = self.q_values.keys().map(|&(state, _)| state).collect();
        states.sort_unstable();
        states.dedup();
        states.len()
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::GameState;

    fn action(row: usize, col: usize) -> Action {
        Action::new(row, col).unwrap()
    }

    fn key(board: &str) -> StateKey {
        GameState::from_string(board).unwrap().state_key()
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new();
        assert_eq!(qtable.value_of(&StateKey::EMPTY_BOARD, action(0, 0)), 0.0);
        assert!(!qtable.contains(&StateKey::EMPTY_BOARD, action(0, 0)));
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        let state = StateKey::EMPTY_BOARD;
        qtable.set(state, action(1, 1), 1.5);
        assert_eq!(qtable.value_of(&state, action(1, 1)), 1.5);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_value() {
        let mut qtable = QTable::new();
        let state = StateKey::EMPTY_BOARD;
        qtable.set(state, action(0, 0), 0.5);
        qtable.set(state, action(0, 1), 1.5);
        qtable.set(state, action(0, 2), 0.8);

        let legal_actions = vec![action(0, 0), action(0, 1), action(0, 2)];
        assert_eq!(qtable.max_value(&state, &legal_actions), 1.5);
        assert_eq!(qtable.max_value(&state, &[]), 0.0);
    }

    #[test]
    fn test_max_value_counts_unseen_as_zero() {
        let mut qtable = QTable::new();
        let state = StateKey::EMPTY_BOARD;
        qtable.set(state, action(0, 0), -0.5);

        assert_eq!(qtable.max_value(&state, &[action(0, 0), action(2, 2)]), 0.0);
        assert_eq!(qtable.max_value(&state, &[action(0, 0)]), -0.5);
    }

    #[test]
    fn test_best_actions_keeps_ties() {
        let mut qtable = QTable::new();
        let state = StateKey::EMPTY_BOARD;
        qtable.set(state, action(0, 0), 0.7);
        qtable.set(state, action(1, 1), 0.7);
        qtable.set(state, action(2, 2), 0.1);

        let legal_actions = vec![action(0, 0), action(1, 1), action(2, 2)];
        assert_eq!(
            qtable.best_actions(&state, &legal_actions),
            vec![action(0, 0), action(1, 1)]
        );
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new();
        let state = StateKey::EMPTY_BOARD;
        let next_state = key("X........");

        // Set next state values
        qtable.set(next_state, action(0, 1), 1.0);
        qtable.set(next_state, action(0, 2), 2.0);

        let next_legal = vec![action(0, 1), action(0, 2)];
        let updated =
            qtable.q_learning_update(state, action(0, 0), 0.0, &next_state, &next_legal, 0.5, 0.99);

        // Q(s,a) = 0.5 * 0.0 + 0.5 * (0.0 + 0.99 * 2.0) = 0.99
        assert!((updated - 0.99).abs() < 1e-12);
        assert_eq!(qtable.value_of(&state, action(0, 0)), updated);
    }

    #[test]
    fn test_terminal_update_drops_future_term() {
        let mut qtable = QTable::new();
        let state = key("XX.OO....");
        let next_state = key("XXXOO....");
        qtable.set(next_state, action(2, 2), 10.0);

        let updated = qtable.q_learning_update(state, action(0, 2), 1.0, &next_state, &[], 0.5, 0.9);
        assert!((updated - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_entries_for_state() {
        let mut qtable = QTable::new();
        let other = key("X........");
        qtable.set(StateKey::EMPTY_BOARD, action(2, 2), 0.3);
        qtable.set(StateKey::EMPTY_BOARD, action(0, 0), 0.1);
        qtable.set(other, action(1, 1), 0.9);

        let entries = qtable.entries_for(&StateKey::EMPTY_BOARD);
        assert_eq!(entries, vec![(action(0, 0), 0.1), (action(2, 2), 0.3)]);
        assert_eq!(qtable.state_count(), 2);
    }
}
