use log::{debug, trace};
use rand::{Rng, RngCore};

use crate::diezmil::player::{
    random_action, Action, Decision, DecisionContext, Player, TurnEnd, TurnObserver,
    TurnResolution,
};

/// Dice left after a roll, 0 to 5, plus the fresh six dice at the start of a turn
const VALUE_STATES: usize = 7;
const FRESH_DICE: usize = 6;

///
/// One-step temporal difference player.
///
/// The reward for reaching a state is the score of the roll that led there, so the rewards of
/// a banked turn add up to its score. A bust takes back what the turn had built up.
///
#[derive(Debug)]
pub struct IncrementalPlayer {
    learning_rate: f64,
    discount: f64,
    exploration: f64,
    values: [[f64; 2]; VALUE_STATES],
    previous: (usize, Action),
}

impl IncrementalPlayer {
    pub fn new(learning_rate: f64, discount: f64, exploration: f64) -> Self {
        IncrementalPlayer {
            learning_rate,
            discount,
            exploration,
            values: [[0.0; 2]; VALUE_STATES],
            previous: (FRESH_DICE, Action::Continue),
        }
    }

    pub fn value(&self, state: usize, action: Action) -> f64 {
        self.values[state][action.index()]
    }

    pub fn previous(&self) -> (usize, Action) {
        self.previous
    }

    fn best_value(&self, state: usize) -> f64 {
        self.values[state].iter().copied().fold(f64::MIN, f64::max)
    }

    /// Moves the previous pair towards `reward` plus what `next` is worth, if the turn goes on
    fn update(&mut self, reward: f64, next: Option<usize>) {
        let (state, action) = self.previous;
        let future = next.map_or(0.0, |next| self.discount * self.best_value(next));
        let value = &mut self.values[state][action.index()];
        *value += self.learning_rate * (reward + future - *value);
        trace!(
            "Updated ({}, {:?}) to {:.3} with reward {}",
            state,
            action,
            *value,
            reward
        );
    }

    fn greedy_action(&self, state: usize) -> Action {
        if self.value(state, Action::Continue) > self.value(state, Action::Bank) {
            Action::Continue
        } else {
            Action::Bank
        }
    }

    pub fn log_table(&self) {
        for (state, values) in self.values.iter().enumerate() {
            debug!("State {}:", state);
            debug!("  Continue: {:.2}", values[Action::Continue.index()]);
            debug!("  Bank: {:.2}", values[Action::Bank.index()]);
        }
    }
}

impl Player for IncrementalPlayer {
    fn name(&self) -> &str {
        "Q-learning"
    }

    fn decide(&mut self, context: &DecisionContext, rng: &mut dyn RngCore) -> Decision {
        let state = context.dice_left();
        self.update(context.scoring.score as f64, Some(state));

        let action = if rng.gen::<f64>() < self.exploration {
            random_action(rng)
        } else {
            self.greedy_action(state)
        };
        self.previous = (state, action);
        Decision::from_action(action, context.scoring)
    }

    fn observer(&mut self) -> Option<&mut dyn TurnObserver> {
        Some(self)
    }
}

impl TurnObserver for IncrementalPlayer {
    fn hot_dice(&mut self) {
        self.previous = (FRESH_DICE, Action::Continue);
    }

    fn turn_resolved(&mut self, resolution: TurnResolution) {
        let reward = match resolution.end {
            // The roll scores were handed out as they came
            TurnEnd::Banked => 0.0,
            TurnEnd::Bust => -(resolution.at_risk as f64),
        };
        self.update(reward, None);
        self.previous = (FRESH_DICE, Action::Continue);
    }
}
