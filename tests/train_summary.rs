use clap::Parser;
use tempfile::tempdir;
use ttt_qlearn::{
    cli::commands::{
        inspect::{InspectArgs, execute as inspect},
        train::{TrainArgs, execute},
    },
    q_learning::SavedQAgent,
};

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "ttt-qlearn-train",
        "--episodes",
        "5",
        "--seed",
        "1",
        "--summary",
        summary_stem.to_str().unwrap(),
        "--no-progress",
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 5);
    assert_eq!(parsed["training"]["completed"], 5);
    assert_eq!(parsed["seed"], 1);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "ttt-qlearn-train",
        "--episodes",
        "3",
        "--summary",
        &summary_arg,
        "--no-progress",
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 3);
}

#[test]
fn config_file_values_are_overridden_by_flags() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("run.json");
    std::fs::write(
        &config_path,
        r#"{ "agent": { "epsilon": 0.4, "learning_rate": 0.3 }, "training": { "episodes": 7 } }"#,
    )
    .unwrap();
    let summary_path = tmp.path().join("summary.json");

    let args = parse_args([
        "ttt-qlearn-train",
        "--config",
        config_path.to_str().unwrap(),
        "--epsilon",
        "0.05",
        "--summary",
        summary_path.to_str().unwrap(),
        "--no-progress",
    ]);
    execute(args).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(parsed["training"]["episodes"], 7);
    assert_eq!(parsed["agent"]["epsilon"], 0.05);
    assert_eq!(parsed["agent"]["learning_rate"], 0.3);
}

#[test]
fn resume_accumulates_episodes() {
    let tmp = tempdir().unwrap();
    let agent_path = tmp.path().join("agent.msgpack");
    let agent_arg = agent_path.to_str().unwrap();

    execute(parse_args([
        "ttt-qlearn-train",
        "-e",
        "20",
        "-O",
        agent_arg,
        "--no-progress",
    ]))
    .unwrap();
    execute(parse_args([
        "ttt-qlearn-train",
        "-e",
        "30",
        "-O",
        agent_arg,
        "--resume",
        "--no-progress",
    ]))
    .unwrap();

    let saved = SavedQAgent::load_from_file(&agent_path).unwrap();
    assert_eq!(saved.metadata.episodes_trained, 50);

    // Without --resume the file is replaced
    execute(parse_args([
        "ttt-qlearn-train",
        "-e",
        "4",
        "-O",
        agent_arg,
        "--no-progress",
    ]))
    .unwrap();
    let saved = SavedQAgent::load_from_file(&agent_path).unwrap();
    assert_eq!(saved.metadata.episodes_trained, 4);

    inspect(InspectArgs::parse_from([
        "ttt-qlearn-inspect",
        "--agent",
        agent_arg,
        "--board",
        "X...O....",
    ]))
    .expect("inspect should accept a saved agent");
}
