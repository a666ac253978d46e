use log::{debug, trace};
use rand::{Rng, RngCore};

use crate::diezmil::player::{
    random_action, Action, Decision, DecisionContext, Player, TurnObserver, TurnResolution,
};
use crate::diezmil::table::PolicyTable;

///
/// Monte-Carlo player that keeps the average final turn score seen after each action.
///
/// The state is the number of dice left to reroll. Every decision made in a turn is credited
/// with the turn's final score (0 after a bust) once the turn is over, so the averages are
/// only touched between turns.
///
#[derive(Debug)]
pub struct AveragingPlayer {
    /// Chance of ignoring the table and picking at random
    exploration: f64,
    table: PolicyTable,
    history: Vec<(usize, Action)>,
}

impl AveragingPlayer {
    pub fn new(exploration: f64, table: PolicyTable) -> Self {
        assert!(
            (0.0..=1.0).contains(&exploration),
            "Exploration {} isn't a probability",
            exploration
        );
        AveragingPlayer {
            exploration,
            table,
            history: Vec::new(),
        }
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    pub fn into_table(self) -> PolicyTable {
        self.table
    }

    /// Pairs waiting for the current turn to finish
    pub fn history(&self) -> &[(usize, Action)] {
        &self.history
    }

    fn best_action(&self, state: usize, rng: &mut dyn RngCore) -> Action {
        let stats = self.table.stats(state);
        let continue_average = stats.average(Action::Continue);
        let bank_average = stats.average(Action::Bank);
        trace!(
            "State {}: continue {:.2}, bank {:.2}",
            state,
            continue_average,
            bank_average
        );
        if continue_average > bank_average {
            Action::Continue
        } else if continue_average < bank_average {
            Action::Bank
        } else {
            random_action(rng)
        }
    }

    pub fn log_table(&self) {
        for stats in self.table.iter() {
            debug!("State {}:", stats.state);
            debug!("  Continue count: {}", stats.continue_count);
            debug!("  Bank count: {}", stats.bank_count);
            debug!(
                "  Average continue reward: {:.2}",
                stats.average(Action::Continue)
            );
            debug!("  Average bank reward: {:.2}", stats.average(Action::Bank));
        }
    }
}

impl Player for AveragingPlayer {
    fn name(&self) -> &str {
        "Monte Carlo"
    }

    fn decide(&mut self, context: &DecisionContext, rng: &mut dyn RngCore) -> Decision {
        let state = context.dice_left();
        let action = if rng.gen::<f64>() < self.exploration {
            random_action(rng)
        } else {
            self.best_action(state, rng)
        };
        self.history.push((state, action));
        Decision::from_action(action, context.scoring)
    }

    fn observer(&mut self) -> Option<&mut dyn TurnObserver> {
        Some(self)
    }
}

impl TurnObserver for AveragingPlayer {
    fn turn_resolved(&mut self, resolution: TurnResolution) {
        for (state, action) in self.history.drain(..) {
            self.table.record(state, action, resolution.score);
        }
    }
}
