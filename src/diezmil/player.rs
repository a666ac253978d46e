use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::scoring::ScoringResult;
use super::Roll;

/// The two things a player can do after a scoring roll
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Action {
    Continue,
    Bank,
}

impl Action {
    /// Position in per-state tables
    pub fn index(self) -> usize {
        match self {
            Action::Continue => 0,
            Action::Bank => 1,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Decision {
    Bank,
    /// Pick `reroll` back up and roll it again. Everything else is set aside and scored.
    Continue { reroll: Roll },
}

impl Decision {
    pub fn action(&self) -> Action {
        match self {
            Decision::Bank => Action::Bank,
            Decision::Continue { .. } => Action::Continue,
        }
    }

    /// Continue with exactly the dice that didn't score
    pub fn continue_with(scoring: &ScoringResult) -> Decision {
        Decision::Continue {
            reroll: scoring.unused.clone(),
        }
    }

    pub fn from_action(action: Action, scoring: &ScoringResult) -> Decision {
        match action {
            Action::Bank => Decision::Bank,
            Action::Continue => Decision::continue_with(scoring),
        }
    }
}

/// What a player gets to look at when deciding
#[derive(Debug)]
pub struct DecisionContext<'a> {
    pub game_total: u32,
    /// Points banked in this turn before the current roll
    pub turn_score: u32,
    pub roll: &'a [u8],
    pub scoring: &'a ScoringResult,
}

impl DecisionContext<'_> {
    /// Dice that would be rolled again on a continue
    pub fn dice_left(&self) -> usize {
        self.scoring.unused.len()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TurnEnd {
    Banked,
    Bust,
}

/// How a turn finished, as seen by a learning player
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TurnResolution {
    pub end: TurnEnd,
    /// Points the turn adds to the game total (0 on a bust)
    pub score: u32,
    /// Points the turn had built up before the final roll
    pub at_risk: u32,
}

///
/// Bookkeeping hooks for players that learn from finished turns.
///
/// The turn engine calls these for every player that exposes an observer, regardless of
/// which player it is.
///
pub trait TurnObserver {
    /// All dice scored and a fresh set of six is about to be rolled
    fn hot_dice(&mut self) {}
    fn turn_resolved(&mut self, resolution: TurnResolution);
}

pub trait Player: Debug {
    fn name(&self) -> &str;
    fn decide(&mut self, context: &DecisionContext, rng: &mut dyn RngCore) -> Decision;
    fn observer(&mut self) -> Option<&mut dyn TurnObserver> {
        None
    }
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn decide(&mut self, context: &DecisionContext, rng: &mut dyn RngCore) -> Decision {
        (**self).decide(context, rng)
    }
    fn observer(&mut self) -> Option<&mut dyn TurnObserver> {
        (**self).observer()
    }
}

/// Continue or bank with even odds
pub fn random_action(rng: &mut dyn RngCore) -> Action {
    if rng.gen_bool(0.5) {
        Action::Continue
    } else {
        Action::Bank
    }
}
