//! Learned averages for the Monte-Carlo player, and how they're stored on disk.
use anyhow::{bail, Context};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::player::Action;

/// Dice left after a scoring roll: 0 (hot dice) to 5
pub const DECISION_STATES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStats {
    pub state: usize,
    pub continue_reward: u64,
    pub bank_reward: u64,
    pub continue_count: u64,
    pub bank_count: u64,
}

impl StateStats {
    fn initial(state: usize) -> Self {
        // Counts start at one so averages are defined before the first observation
        StateStats {
            state,
            continue_reward: 0,
            bank_reward: 0,
            continue_count: 1,
            bank_count: 1,
        }
    }

    pub fn reward(&self, action: Action) -> u64 {
        match action {
            Action::Continue => self.continue_reward,
            Action::Bank => self.bank_reward,
        }
    }

    pub fn count(&self, action: Action) -> u64 {
        match action {
            Action::Continue => self.continue_count,
            Action::Bank => self.bank_count,
        }
    }

    pub fn average(&self, action: Action) -> f64 {
        self.reward(action) as f64 / self.count(action) as f64
    }

    pub fn record(&mut self, action: Action, reward: u32) {
        match action {
            Action::Continue => {
                self.continue_reward += reward as u64;
                self.continue_count += 1;
            }
            Action::Bank => {
                self.bank_reward += reward as u64;
                self.bank_count += 1;
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TableFile {
    states: Vec<StateStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    states: [StateStats; DECISION_STATES],
}

impl Default for PolicyTable {
    fn default() -> Self {
        PolicyTable::initial()
    }
}

impl PolicyTable {
    pub fn initial() -> Self {
        PolicyTable {
            states: std::array::from_fn(StateStats::initial),
        }
    }

    pub fn stats(&self, state: usize) -> &StateStats {
        assert!(state < DECISION_STATES, "No decision state {}", state);
        &self.states[state]
    }

    pub fn record(&mut self, state: usize, action: Action, reward: u32) {
        assert!(state < DECISION_STATES, "No decision state {}", state);
        self.states[state].record(action, reward);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateStats> {
        self.states.iter()
    }

    ///
    /// Adds what `other` learned on top of `base` to this table.
    ///
    /// Used to combine agents that all started from the same table.
    ///
    pub fn merge(&mut self, other: &PolicyTable, base: &PolicyTable) {
        let merged = self.states.iter_mut().zip(other.states.iter());
        for ((mine, theirs), start) in merged.zip(base.states.iter()) {
            mine.continue_reward += theirs.continue_reward - start.continue_reward;
            mine.bank_reward += theirs.bank_reward - start.bank_reward;
            mine.continue_count += theirs.continue_count - start.continue_count;
            mine.bank_count += theirs.bank_count - start.bank_count;
        }
    }

    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        let table: TableFile = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let mut states: [Option<StateStats>; DECISION_STATES] = [None; DECISION_STATES];
        for stats in table.states {
            if stats.state >= DECISION_STATES {
                bail!("{}: unknown state {}", path.display(), stats.state);
            }
            if stats.continue_count == 0 || stats.bank_count == 0 {
                bail!("{}: state {} has a zero count", path.display(), stats.state);
            }
            if states[stats.state].replace(stats).is_some() {
                bail!("{}: state {} appears twice", path.display(), stats.state);
            }
        }

        let mut loaded = PolicyTable::initial();
        for (state, stats) in states.into_iter().enumerate() {
            match stats {
                Some(stats) => loaded.states[state] = stats,
                None => bail!("{}: no entry for state {}", path.display(), state),
            }
        }
        debug!("Loaded policy table from {}", path.display());
        Ok(loaded)
    }

    pub fn save<P>(&self, path: P) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let table = TableFile {
            states: self.states.to_vec(),
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &table)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;
        debug!("Saved policy table to {}", path.display());
        Ok(())
    }
}
