use rand::RngCore;

use crate::diezmil::player::{Decision, DecisionContext, Player};

/// Takes the points from the first scoring roll of every turn
#[derive(Debug, Default)]
pub struct AlwaysBankPlayer;

impl Player for AlwaysBankPlayer {
    fn name(&self) -> &str {
        "Always bank"
    }

    fn decide(&mut self, _context: &DecisionContext, _rng: &mut dyn RngCore) -> Decision {
        Decision::Bank
    }
}
