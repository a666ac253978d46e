use rand::RngCore;

use crate::diezmil::player::{random_action, Decision, DecisionContext, Player};

/// Flips a coin after every scoring roll
#[derive(Debug, Default)]
pub struct RandomPlayer;

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "Random"
    }

    fn decide(&mut self, context: &DecisionContext, rng: &mut dyn RngCore) -> Decision {
        Decision::from_action(random_action(rng), context.scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diezmil::player::Action;
    use crate::diezmil::scoring::score;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_continue_rerolls_unused() {
        let roll = vec![1, 2, 3, 3, 6, 4];
        let scoring = score(&roll);
        let context = DecisionContext {
            game_total: 0,
            turn_score: 0,
            roll: &roll,
            scoring: &scoring,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = RandomPlayer;
        let mut counts = [0; 2];
        for _ in 0..1000 {
            let decision = player.decide(&context, &mut rng);
            if let Decision::Continue { reroll } = &decision {
                assert_eq!(reroll, &vec![2, 3, 3, 6, 4]);
            }
            counts[decision.action().index()] += 1;
        }
        assert!(counts[Action::Continue.index()] > 400);
        assert!(counts[Action::Bank.index()] > 400);
    }
}
