mod always_bank;
mod averaging;
mod incremental;
mod random;

pub use always_bank::AlwaysBankPlayer;
pub use averaging::AveragingPlayer;
pub use incremental::IncrementalPlayer;
pub use random::RandomPlayer;

use log::info;
use serde::Deserialize;
use std::path::PathBuf;

use crate::diezmil::player::Player;
use crate::diezmil::table::PolicyTable;

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum PlayerSettings {
    Random,
    AlwaysBank,
    Averaging(AveragingSettings),
    Incremental(IncrementalSettings),
}

#[derive(Debug, Deserialize, Clone)]
pub struct AveragingSettings {
    pub exploration: f64,
    /// Where the learned table lives between runs
    pub table: Option<PathBuf>,
    /// Start from the initial table even if one is already saved. Set to false to keep
    /// training a saved table.
    #[serde(default = "default_fresh")]
    pub fresh: bool,
}

fn default_fresh() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct IncrementalSettings {
    pub learning_rate: f64,
    pub discount: f64,
    pub exploration: f64,
}

impl AveragingSettings {
    pub fn load_table(&self) -> anyhow::Result<PolicyTable> {
        match &self.table {
            Some(path) if !self.fresh => {
                info!("Loading policy table from {}", path.display());
                PolicyTable::load(path)
            }
            _ => Ok(PolicyTable::initial()),
        }
    }
}

impl PlayerSettings {
    pub fn build(&self) -> anyhow::Result<Box<dyn Player + Send>> {
        let player: Box<dyn Player + Send> = match self {
            PlayerSettings::Random => Box::new(RandomPlayer),
            PlayerSettings::AlwaysBank => Box::new(AlwaysBankPlayer),
            PlayerSettings::Averaging(settings) => Box::new(AveragingPlayer::new(
                settings.exploration,
                settings.load_table()?,
            )),
            PlayerSettings::Incremental(settings) => Box::new(IncrementalPlayer::new(
                settings.learning_rate,
                settings.discount,
                settings.exploration,
            )),
        };
        Ok(player)
    }
}
