//! Train command - Self-play training of a Q-learning agent

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::AgentConfig,
    cli::{
        config::RunConfig,
        output::{format_number, format_percent, print_kv, print_section},
    },
    pipeline::{
        MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver, TrainingPipeline,
        TrainingResult,
    },
    q_learning::{QLearningAgent, ScopedAgent},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metrics: MetricsSummary,
    agent: AgentConfig,
    seed: Option<u64>,
    output: Option<PathBuf>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent by self-play")]
pub struct TrainArgs {
    /// Number of self-play episodes (default 500)
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Exploration rate in [0, 1]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Learning rate in (0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor in [0, 1]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON run configuration; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Continue training the agent stored at --output with its stored hyper-parameters
    #[arg(long, requires = "output", conflicts_with_all = ["epsilon", "alpha", "gamma"])]
    pub resume: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Merge the optional config file with command-line overrides
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.training.episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.training.seed = Some(seed);
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            config.agent.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.agent.discount_factor = gamma;
        }

        config.agent.validate().context("Invalid agent parameters")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let run = args.run_config()?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(run.training.clone())
        .with_observer(Box::new(SharedObserver::new(Arc::clone(&metrics))));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let (result, agent_config) = match &args.output {
        Some(path) => {
            let mut agent = if args.resume {
                ScopedAgent::open(path, run.agent)?
            } else {
                ScopedAgent::create(path, run.agent)?
            };

            let result = pipeline.run(&mut agent)?;
            let metadata = agent.metadata_mut();
            metadata.episodes_trained += result.episodes;
            metadata.seed = run.training.seed;
            let total = metadata.episodes_trained;
            agent
                .flush()
                .with_context(|| format!("Failed to save agent to {}", path.display()))?;

            print_section("Saved Agent");
            print_kv("Path", &path.display().to_string());
            print_kv("Episodes trained", &format_number(total));
            (result, *agent.config())
        }
        None => {
            let mut agent = QLearningAgent::new(run.agent)?;
            (pipeline.run(&mut agent)?, run.agent)
        }
    };

    let metrics = metrics
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics observer was poisoned"))?
        .summary();

    print_section("Training Complete");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "X wins",
        &format!("{} ({})", result.x_wins, format_percent(result.x_win_rate)),
    );
    print_kv(
        "O wins",
        &format!("{} ({})", result.o_wins, format_percent(result.o_win_rate)),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_percent(result.draw_rate)),
    );
    if result.aborted > 0 {
        print_kv("Aborted", &result.aborted.to_string());
    }
    print_kv("Avg. moves/episode", &format!("{:.2}", metrics.avg_episode_length));
    print_kv("Table entries", &format_number(result.table_size));

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path.as_path() != raw.as_path() {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let summary = TrainingSummaryFile {
            training: result,
            metrics,
            agent: agent_config,
            seed: run.training.seed,
            output: args.output.clone(),
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("Failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
