use log::{info, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::dice::Dice;
use super::player::Player;
use super::turn::play_turn;
use super::TARGET_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Total that ends the game
    pub target: u32,
    /// Games stop after this many turns even if the target isn't reached
    pub turn_cap: usize,
    /// Log every turn at info level
    pub verbose: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            target: TARGET_SCORE,
            turn_cap: 1000,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub turns: usize,
    pub total: u32,
    /// Points each turn added, 0 for busts
    pub turn_scores: Vec<u32>,
    /// The turn cap ended the game before the target was reached
    pub truncated: bool,
}

/// A single player game of ten-thousand
pub struct Game {
    pub config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game { config }
    }

    pub fn play<P, D>(&self, player: &mut P, dice: &mut D, rng: &mut dyn RngCore) -> GameResult
    where
        P: Player + ?Sized,
        D: Dice + ?Sized,
    {
        let mut total: u32 = 0;
        let mut turn_scores = Vec::new();

        while total < self.config.target && turn_scores.len() < self.config.turn_cap {
            let outcome = play_turn(player, dice, rng, total);
            total += outcome.score;
            turn_scores.push(outcome.score);
            if self.config.verbose {
                info!(
                    "turn {}:{} TOTAL: {}",
                    turn_scores.len(),
                    outcome,
                    total
                );
            }
        }

        let truncated = total < self.config.target;
        if truncated {
            warn!(
                "{} stopped at the turn cap of {} with {} points",
                player.name(),
                self.config.turn_cap,
                total
            );
        }

        GameResult {
            turns: turn_scores.len(),
            total,
            turn_scores,
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diezmil::dice::ScriptedDice;
    use crate::diezmil::player::Action;
    use crate::test::scripted_player::ScriptedPlayer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_game_reaches_target() {
        let game = Game::new(GameConfig {
            target: 2000,
            ..Default::default()
        });
        // 1000, bust, 1000
        let mut dice = ScriptedDice::new(vec![
            vec![1, 1, 1, 2, 3, 4],
            vec![2, 2, 3, 3, 4, 6],
            vec![1, 1, 1, 2, 3, 4],
        ]);
        let mut player = ScriptedPlayer::new(vec![Action::Bank, Action::Bank]);
        let result = game.play(&mut player, &mut dice, &mut StdRng::seed_from_u64(0));

        assert_eq!(result.turns, 3);
        assert_eq!(result.total, 2000);
        assert_eq!(result.turn_scores, vec![1000, 0, 1000]);
        assert!(!result.truncated);
    }

    #[test]
    fn test_turn_cap_truncates() {
        let game = Game::new(GameConfig {
            turn_cap: 2,
            ..Default::default()
        });
        let mut dice = ScriptedDice::new(vec![vec![5, 2, 3, 4, 6, 6], vec![1, 2, 3, 4, 6, 6]]);
        let mut player = ScriptedPlayer::new(vec![Action::Bank, Action::Bank]);
        let result = game.play(&mut player, &mut dice, &mut StdRng::seed_from_u64(0));

        assert_eq!(result.turns, 2);
        assert_eq!(result.total, 150);
        assert!(result.truncated);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_game_total_passed_to_player() {
        let game = Game::new(GameConfig {
            target: 1500,
            verbose: true,
            ..Default::default()
        });
        let mut dice = ScriptedDice::new(vec![vec![1, 1, 1, 2, 3, 4], vec![5, 5, 5, 2, 3, 4]]);
        let mut player = ScriptedPlayer::new(vec![Action::Bank, Action::Bank]);
        let result = game.play(&mut player, &mut dice, &mut StdRng::seed_from_u64(0));
        assert_eq!(result.total, 1500);
        assert_eq!(player.game_totals_seen, vec![0, 1000]);
        assert_eq!(player.resolutions.len(), 2);
    }
}
