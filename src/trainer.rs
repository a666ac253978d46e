//! Trains players over many games from a JSON settings file
use anyhow::Context;
use clap::Parser;
use diezmil_rs::diezmil::trainer::{Trainer, TrainerConfig, TrainingSummary};
use diezmil_rs::players::{AveragingPlayer, IncrementalPlayer, PlayerSettings};
use env_logger::fmt::Formatter;
use log::Record;
use rand::Rng;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, thread};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg()]
    config_file: PathBuf,
    /// Overrides the seed in the settings file
    #[arg(short, long)]
    seed: Option<u64>,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn default_window() -> usize {
    1000
}

#[derive(Debug, Deserialize)]
struct TrainerSettings {
    player: PlayerSettings,
    #[serde(flatten)]
    trainer: TrainerConfig,
    #[serde(default)]
    seed: Option<u64>,
    /// Games at the end of the run the trailing mean is taken over
    #[serde(default = "default_window")]
    window: usize,
    #[serde(default)]
    reports_folder: Option<PathBuf>,
}

fn load_settings(path: &Path) -> anyhow::Result<TrainerSettings> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Trains the configured player and saves what it learned, if it keeps a table
fn run_training(settings: &TrainerSettings, seed: u64) -> anyhow::Result<TrainingSummary> {
    let trainer = Trainer::new(settings.trainer);
    let summary = match &settings.player {
        PlayerSettings::Averaging(averaging) => {
            let table = averaging.load_table()?;
            let report = trainer.train(
                |_| Ok(AveragingPlayer::new(averaging.exploration, table.clone())),
                seed,
            )?;
            let summary = report.summary(settings.window);

            // Every agent started from `table`; fold what they learned back into it
            let mut learned = table.clone();
            for player in report.into_players() {
                player.log_table();
                learned.merge(player.table(), &table);
            }
            if let Some(path) = &averaging.table {
                learned.save(path)?;
                println!("Saved policy table to {}", path.display());
            }
            summary
        }
        PlayerSettings::Incremental(incremental) => {
            let report = trainer.train(
                |_| {
                    Ok(IncrementalPlayer::new(
                        incremental.learning_rate,
                        incremental.discount,
                        incremental.exploration,
                    ))
                },
                seed,
            )?;
            for run in &report.runs {
                run.player.log_table();
            }
            report.summary(settings.window)
        }
        other => trainer
            .train(|_| other.build(), seed)?
            .summary(settings.window),
    };
    Ok(summary)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let thread_id = thread::current().id();
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "[{}] [Thread: {:?}] [{}] - {}",
                timestamp,
                thread_id,
                record.level(),
                record.args()
            )
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = load_settings(&args.config_file)?;
    let seed = args
        .seed
        .or(settings.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    let reports_folder = settings.reports_folder.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "reports/{}",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        ))
    });

    let config = settings.trainer;
    println!(
        "===\nAgents: {}, Games: {}, Threads: {}, Seed: {}, Path: {}",
        config.agents,
        config.games,
        config.threads,
        seed,
        reports_folder.display()
    );
    println!("---");

    let summary = run_training(&settings, seed)?;

    fs::create_dir_all(&reports_folder)
        .with_context(|| format!("failed to create {}", reports_folder.display()))?;
    let report_path = reports_folder.join("summary.json");
    fs::write(&report_path, serde_json::to_string(&summary)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("---");
    println!("Games\tTruncated\tMean turns (last {})", summary.window);
    match summary.trailing_mean {
        Some(mean) => println!("{}\t{}\t{:.2}", summary.games, summary.truncated, mean),
        None => println!("{}\t{}\t-", summary.games, summary.truncated),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diezmil_rs::diezmil::table::PolicyTable;

    #[test]
    fn test_settings_defaults() {
        let settings: TrainerSettings =
            serde_json::from_str(r#"{"player": {"type": "AlwaysBank"}, "games": 50}"#).unwrap();
        assert_eq!(settings.trainer.games, 50);
        assert_eq!(settings.trainer.agents, TrainerConfig::default().agents);
        assert_eq!(settings.trainer.game.turn_cap, 1000);
        assert_eq!(settings.window, 1000);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_settings_files_parse() {
        for name in ["averaging.json", "incremental.json"] {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name);
            let settings = load_settings(&path).unwrap();
            assert!(settings.trainer.threads >= 1, "{}", name);
        }
    }

    #[test]
    fn test_averaging_training_saves_new_table() {
        let table_path = std::env::temp_dir().join(format!(
            "diezmil-trainer-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&table_path);
        let settings: TrainerSettings = serde_json::from_value(serde_json::json!({
            "player": {"type": "Averaging", "exploration": 0.1, "table": table_path},
            "agents": 2,
            "games": 5,
            "threads": 2,
        }))
        .unwrap();

        let summary = run_training(&settings, 3).unwrap();
        assert_eq!(summary.agents, 2);
        assert_eq!(summary.games, 5);

        let saved = PolicyTable::load(&table_path).unwrap();
        fs::remove_file(&table_path).unwrap();
        assert_ne!(saved, PolicyTable::initial());
    }
}
