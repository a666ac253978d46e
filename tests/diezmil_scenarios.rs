use diezmil_rs::diezmil::dice::{Dice, RandomDice, ScriptedDice};
use diezmil_rs::diezmil::game::{Game, GameConfig};
use diezmil_rs::diezmil::player::{
    Decision, DecisionContext, Player, TurnEnd, TurnObserver, TurnResolution,
};
use diezmil_rs::diezmil::scoring::score;
use diezmil_rs::diezmil::table::PolicyTable;
use diezmil_rs::diezmil::turn::play_turn;
use diezmil_rs::diezmil::Roll;
use diezmil_rs::players::{AlwaysBankPlayer, AveragingPlayer, RandomPlayer};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use test_env_log::test;

/// Dice that remember how many were asked for each time
struct CountingDice<D> {
    inner: D,
    counts: Vec<usize>,
}

impl<D: Dice> Dice for CountingDice<D> {
    fn roll(&mut self, count: usize) -> Roll {
        self.counts.push(count);
        self.inner.roll(count)
    }
}

/// Keeps rolling until the turn is worth at least `stop_at`
#[derive(Debug)]
struct GreedyPlayer {
    stop_at: u32,
    resolutions: Vec<TurnResolution>,
}

impl Player for GreedyPlayer {
    fn name(&self) -> &str {
        "Greedy"
    }

    fn decide(&mut self, context: &DecisionContext, _rng: &mut dyn RngCore) -> Decision {
        if context.turn_score + context.scoring.score >= self.stop_at {
            Decision::Bank
        } else {
            Decision::continue_with(context.scoring)
        }
    }

    fn observer(&mut self) -> Option<&mut dyn TurnObserver> {
        Some(self)
    }
}

impl TurnObserver for GreedyPlayer {
    fn turn_resolved(&mut self, resolution: TurnResolution) {
        self.resolutions.push(resolution);
    }
}

#[test]
fn test_triple_ones_scenario() {
    let result = score(&[1, 1, 1, 2, 3, 4]);
    assert_eq!(result.score, 1000);
    assert_eq!(result.unused, vec![2, 3, 4]);
}

#[test]
fn test_no_scoring_dice_busts_turn() {
    let roll = vec![2, 3, 4, 2, 3, 4];
    let result = score(&roll);
    assert_eq!(result.score, 0);
    assert_eq!(result.unused, roll);

    let mut dice = ScriptedDice::new(vec![vec![1, 1, 1, 5, 5, 5], roll]);
    let mut player = GreedyPlayer {
        stop_at: 5000,
        resolutions: vec![],
    };
    let outcome = play_turn(&mut player, &mut dice, &mut StdRng::seed_from_u64(0), 0);
    assert_eq!(outcome.end, TurnEnd::Bust);
    assert_eq!(outcome.score, 0);
    assert_eq!(player.resolutions[0].at_risk, 1500);
}

#[test]
fn test_turn_scores_add_up() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut dice = RandomDice::new(StdRng::seed_from_u64(4321));
    let mut player = GreedyPlayer {
        stop_at: 1000,
        resolutions: vec![],
    };
    for _ in 0..2000 {
        let outcome = play_turn(&mut player, &mut dice, &mut rng, 0);
        let rolled: u32 = outcome.rolls.iter().map(|r| r.score).sum();
        match outcome.end {
            TurnEnd::Banked => {
                assert_eq!(outcome.score, rolled);
                assert!(outcome.score >= 1000);
            }
            TurnEnd::Bust => assert_eq!(outcome.score, 0),
        }
        let resolution = player.resolutions.last().unwrap();
        assert_eq!(resolution.end, outcome.end);
        assert_eq!(resolution.score, outcome.score);
    }
    assert_eq!(player.resolutions.len(), 2000);
}

#[test]
fn test_hot_dice_rolls_six_fresh_dice() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut dice = CountingDice {
        inner: RandomDice::new(StdRng::seed_from_u64(100)),
        counts: vec![],
    };
    let mut player = GreedyPlayer {
        stop_at: 3000,
        resolutions: vec![],
    };
    let mut hot_dice_seen = 0;
    for _ in 0..3000 {
        dice.counts.clear();
        let outcome = play_turn(&mut player, &mut dice, &mut rng, 0);
        assert_eq!(dice.counts[0], 6);
        for (i, sub_roll) in outcome.rolls.iter().enumerate() {
            if let Some(Decision::Continue { reroll }) = &sub_roll.decision {
                let expected = if reroll.is_empty() {
                    hot_dice_seen += 1;
                    6
                } else {
                    reroll.len()
                };
                assert_eq!(dice.counts[i + 1], expected);
            }
        }
    }
    assert!(hot_dice_seen > 0);
}

#[test]
fn test_always_bank_total_is_sum_of_turns() {
    let game = Game::new(GameConfig::default());
    let mut player = AlwaysBankPlayer;
    let mut rng = StdRng::seed_from_u64(7);
    let mut dice = RandomDice::new(StdRng::seed_from_u64(8));
    for _ in 0..50 {
        let result = game.play(&mut player, &mut dice, &mut rng);
        assert_eq!(result.turn_scores.iter().sum::<u32>(), result.total);
        assert_eq!(result.turns, result.turn_scores.len());
        assert!(!result.truncated);
        assert!(result.total >= 10_000);
    }
}

fn mean_turn_score<P: Player>(player: &mut P, seed: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dice = RandomDice::new(StdRng::seed_from_u64(rng.gen()));
    let turns = 30_000;
    let total: u64 = (0..turns)
        .map(|_| play_turn(&mut *player, &mut dice, &mut rng, 0).score as u64)
        .sum();
    total as f64 / turns as f64
}

#[test]
fn test_full_exploration_plays_like_random() {
    let random = mean_turn_score(&mut RandomPlayer, 1);
    let mut averaging = AveragingPlayer::new(1.0, PolicyTable::initial());
    let exploring = mean_turn_score(&mut averaging, 2);
    log::info!("Random {:.1}, exploring {:.1}", random, exploring);
    assert!(
        (random - exploring).abs() < random * 0.1,
        "Random {} vs exploring {}",
        random,
        exploring
    );
}
