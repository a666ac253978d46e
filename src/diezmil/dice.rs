use std::collections::VecDeque;

use rand::Rng;

use super::{Roll, FACES};

/// Where rolls come from
pub trait Dice {
    fn roll(&mut self, count: usize) -> Roll;
}

/// Fair six-sided dice driven by any rng
pub struct RandomDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        RandomDice { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn roll(&mut self, count: usize) -> Roll {
        (0..count)
            .map(|_| self.rng.gen_range(1..=FACES as u8))
            .collect()
    }
}

///
/// Replays a fixed list of rolls, so turns can be tested against known dice.
///
/// Panics when it runs out of rolls, or when the engine asks for a different number of dice
/// than the next scripted roll has.
///
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<Roll>,
}

impl ScriptedDice {
    pub fn new(rolls: Vec<Roll>) -> Self {
        ScriptedDice {
            rolls: rolls.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, count: usize) -> Roll {
        let roll = self.rolls.pop_front().expect("Scripted dice ran out of rolls");
        assert_eq!(
            roll.len(),
            count,
            "Asked for {} dice but the next scripted roll is {:?}",
            count,
            roll
        );
        roll
    }
}
