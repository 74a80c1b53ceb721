mod common;

use std::sync::{Arc, Mutex};

use common::seeded_agent;
use ttt_qlearn::{
    Action, GameOutcome, GameState, Player, QLearningAgent, StateKey,
    pipeline::{
        MetricsObserver, SharedObserver, TrainingConfig, TrainingPipeline, TrainingResult,
        evaluate_against_random,
    },
};

fn train(episodes: usize, seed: u64) -> (QLearningAgent, TrainingResult) {
    let mut agent = seeded_agent(0.2, 0.5, 0.9, seed);
    let result = TrainingPipeline::new(TrainingConfig {
        episodes,
        seed: Some(seed),
    })
    .run(&mut agent)
    .unwrap();
    (agent, result)
}

#[test]
fn five_hundred_episodes_update_the_opening_moves() {
    let (agent, result) = train(500, 2024);

    assert_eq!(result.episodes, 500);
    assert_eq!(result.completed, 500);
    assert_eq!(result.aborted, 0);
    assert!(!agent.q_table().is_empty());
    assert_eq!(result.table_size, agent.q_table().len());

    let opening_updated = Action::all()
        .any(|action| agent.value_of(&StateKey::EMPTY_BOARD, action) != 0.0);
    assert!(opening_updated, "no opening move moved away from 0.0");
}

#[test]
fn learned_values_stay_within_reward_bounds() {
    let (agent, _) = train(2_000, 11);
    for (_, _, value) in agent.q_table().iter() {
        assert!((-1.0..=1.0).contains(&value), "value {value} out of bounds");
    }
}

#[test]
fn immediate_wins_are_learned() {
    let (agent, _) = train(5_000, 99);

    // X to move with (0,2) completing the top row
    let state = GameState::from_string("XX.OO....").unwrap();
    let key = state.state_key();
    let winning = Action::new(0, 2).unwrap();
    if agent.q_table().contains(&key, winning) {
        assert!(agent.value_of(&key, winning) > 0.0);
    }

    // Every stored value for a move that wins outright is positive
    for (key, action, value) in agent.q_table().iter() {
        let mut board = GameState::from_string(&key.to_string()).unwrap();
        if board.to_move() == Player::X
            && board.apply_action(action).unwrap() == GameOutcome::Win(Player::X)
        {
            assert!(value > 0.0, "winning move {action} on {key} has value {value}");
        }
    }
}

#[test]
fn metrics_agree_with_training_result() {
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut agent = seeded_agent(0.2, 0.5, 0.9, 5);
    let result = TrainingPipeline::new(TrainingConfig {
        episodes: 300,
        seed: Some(5),
    })
    .with_observer(Box::new(SharedObserver::new(Arc::clone(&metrics))))
    .run(&mut agent)
    .unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.completed, result.completed);
    assert_eq!(summary.x_wins, result.x_wins);
    assert_eq!(summary.o_wins, result.o_wins);
    assert_eq!(summary.draws, result.draws);
    // Nobody can win before the fifth move and the board holds nine
    assert!(summary.avg_episode_length >= 5.0 && summary.avg_episode_length <= 9.0);
}

#[test]
fn evaluation_after_training_reports_every_game() {
    let (mut agent, _) = train(1_000, 3);
    let before = agent.q_table().clone();
    let eval = evaluate_against_random(&mut agent, 250, Some(8)).unwrap();

    assert_eq!(eval.wins + eval.draws + eval.losses, 250);
    assert_eq!(agent.q_table(), &before);
}
