//! Runs batches of games against learning players.
//!
//! Each agent owns its own player and its own rng, and plays its games strictly one after
//! the other so the player's table is only ever touched by one turn at a time. Agents share
//! nothing, which is what lets them spread across threads.
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::thread;

use super::dice::RandomDice;
use super::game::{Game, GameConfig};
use super::player::Player;

const PROGRESS_TEMPLATE: &str = "{prefix} {wide_bar} {pos:>6}/{len:6} {elapsed}/{duration} ETA:{eta}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Independent learners, each starting from its own copy of the player
    pub agents: usize,
    /// Games played by each agent
    pub games: usize,
    pub threads: usize,
    pub game: GameConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            agents: 10,
            games: 10_000,
            threads: 1,
            game: GameConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct AgentRun<P> {
    pub agent: usize,
    pub player: P,
    /// Turns needed for each game, in the order they were played
    pub turn_counts: Vec<usize>,
    /// Games ended by the turn cap
    pub truncated: usize,
}

#[derive(Debug)]
pub struct TrainingReport<P> {
    pub runs: Vec<AgentRun<P>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub agents: usize,
    pub games: usize,
    /// Turns per game averaged over agents, indexed by game
    pub mean_turns: Vec<f64>,
    pub window: usize,
    pub trailing_mean: Option<f64>,
    pub truncated: usize,
}

impl<P> TrainingReport<P> {
    pub fn mean_turns(&self) -> Vec<f64> {
        let games = self
            .runs
            .iter()
            .map(|run| run.turn_counts.len())
            .min()
            .unwrap_or(0);
        (0..games)
            .map(|game| {
                let sum: usize = self.runs.iter().map(|run| run.turn_counts[game]).sum();
                sum as f64 / self.runs.len() as f64
            })
            .collect()
    }

    /// Mean turns per game over the last `window` games
    pub fn trailing_mean(&self, window: usize) -> Option<f64> {
        let means = self.mean_turns();
        let window = window.min(means.len());
        if window == 0 {
            return None;
        }
        let tail = &means[means.len() - window..];
        Some(tail.iter().sum::<f64>() / window as f64)
    }

    pub fn summary(&self, window: usize) -> TrainingSummary {
        let mean_turns = self.mean_turns();
        TrainingSummary {
            agents: self.runs.len(),
            games: mean_turns.len(),
            trailing_mean: self.trailing_mean(window),
            mean_turns,
            window,
            truncated: self.runs.iter().map(|run| run.truncated).sum(),
        }
    }

    pub fn into_players(self) -> impl Iterator<Item = P> {
        self.runs.into_iter().map(|run| run.player)
    }
}

pub struct Trainer {
    pub config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    /// Plays every game for one agent. The agent's rolls and decisions all come from `seed`.
    pub fn run_agent<P: Player>(
        &self,
        agent: usize,
        mut player: P,
        seed: u64,
        progress: &ProgressBar,
    ) -> AgentRun<P> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut dice = RandomDice::new(StdRng::seed_from_u64(rng.gen()));
        let game = Game::new(self.config.game);

        let mut turn_counts = Vec::with_capacity(self.config.games);
        let mut truncated = 0;
        for _ in 0..self.config.games {
            let result = game.play(&mut player, &mut dice, &mut rng);
            if result.truncated {
                truncated += 1;
            }
            turn_counts.push(result.turns);
            progress.inc(1);
        }
        progress.finish();
        debug!(
            "Agent {} ({}) finished {} games, {} truncated",
            agent,
            player.name(),
            self.config.games,
            truncated
        );

        AgentRun {
            agent,
            player,
            turn_counts,
            truncated,
        }
    }

    ///
    /// Trains `agents` independent players, built by `make_player` from the agent number.
    ///
    /// Agent `n` is seeded with `seed + n`, so a run gives the same results whatever the
    /// thread count.
    ///
    pub fn train<P, F>(&self, make_player: F, seed: u64) -> anyhow::Result<TrainingReport<P>>
    where
        P: Player + Send,
        F: Fn(usize) -> anyhow::Result<P> + Sync,
    {
        let threads = self.config.threads.clamp(1, self.config.agents.max(1));
        info!(
            "Training {} agents for {} games each on {} threads",
            self.config.agents, self.config.games, threads
        );

        let bars = MultiProgress::new();
        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)?;
        let run = |agent: usize| -> anyhow::Result<AgentRun<P>> {
            let player = make_player(agent)?;
            let progress = bars.add(ProgressBar::new(self.config.games as u64));
            progress.set_style(style.clone());
            progress.set_prefix(format!("Agent {:>3}", agent));
            Ok(self.run_agent(
                agent,
                player,
                seed.wrapping_add(agent as u64),
                &progress,
            ))
        };

        let mut runs = if threads == 1 {
            (0..self.config.agents)
                .map(run)
                .collect::<anyhow::Result<Vec<_>>>()?
        } else {
            let per_thread: Vec<Vec<anyhow::Result<AgentRun<P>>>> = thread::scope(|scope| {
                let handles: Vec<_> = (0..threads)
                    .map(|thread_index| {
                        let run = &run;
                        let agents = self.config.agents;
                        scope.spawn(move || {
                            (thread_index..agents)
                                .step_by(threads)
                                .map(run)
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(results) => results,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            });
            per_thread
                .into_iter()
                .flatten()
                .collect::<anyhow::Result<Vec<_>>>()?
        };
        runs.sort_by_key(|run| run.agent);

        Ok(TrainingReport { runs })
    }
}
