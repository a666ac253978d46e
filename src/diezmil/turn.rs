use log::{debug, trace};
use rand::RngCore;
use std::fmt;

use super::player::{Decision, DecisionContext, Player, TurnEnd, TurnResolution};
use super::scoring::{score, set_aside};
use super::{Roll, DICE_COUNT};

/// One roll within a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRoll {
    pub roll: Roll,
    /// Points this roll added to the turn
    pub score: u32,
    /// `None` when the roll busted
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub end: TurnEnd,
    /// Points added to the game total
    pub score: u32,
    pub rolls: Vec<SubRoll>,
}

fn faces(dice: &[u8]) -> String {
    dice.iter().map(|d| d.to_string()).collect()
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sub_roll in &self.rolls {
            write!(f, " {}", faces(&sub_roll.roll))?;
            match &sub_roll.decision {
                Some(Decision::Bank) => write!(f, " P")?,
                Some(Decision::Continue { reroll }) if reroll.is_empty() => {
                    write!(f, " T({})", faces(&[1, 2, 3, 4, 5, 6]))?
                }
                Some(Decision::Continue { reroll }) => write!(f, " T({})", faces(reroll))?,
                None => {}
            }
        }
        write!(f, " --> {} points.", self.score)
    }
}

fn resolve<P: Player + ?Sized>(player: &mut P, resolution: TurnResolution) {
    debug!("{} turn resolved: {:?}", player.name(), resolution);
    if let Some(observer) = player.observer() {
        observer.turn_resolved(resolution);
    }
}

///
/// Plays a single turn to completion.
///
/// The turn opens with all six dice. Each scoring roll goes to the player; a bust throws away
/// everything the turn had built up. When every die has scored the player gets a fresh set
/// of six.
///
pub fn play_turn<P, D>(
    player: &mut P,
    dice: &mut D,
    rng: &mut dyn RngCore,
    game_total: u32,
) -> TurnOutcome
where
    P: Player + ?Sized,
    D: super::dice::Dice + ?Sized,
{
    let mut turn_score: u32 = 0;
    let mut dice_to_roll = DICE_COUNT;
    let mut rolls: Vec<SubRoll> = Vec::new();

    loop {
        let roll = dice.roll(dice_to_roll);
        let scoring = score(&roll);
        trace!(
            "Rolled {:?}: {} points, unused {:?}",
            roll,
            scoring.score,
            scoring.unused
        );

        if scoring.bust() {
            rolls.push(SubRoll {
                roll,
                score: 0,
                decision: None,
            });
            resolve(
                player,
                TurnResolution {
                    end: TurnEnd::Bust,
                    score: 0,
                    at_risk: turn_score,
                },
            );
            return TurnOutcome {
                end: TurnEnd::Bust,
                score: 0,
                rolls,
            };
        }

        let decision = player.decide(
            &DecisionContext {
                game_total,
                turn_score,
                roll: &roll,
                scoring: &scoring,
            },
            rng,
        );
        debug!("{} plays {:?} on {:?}", player.name(), decision, roll);

        match decision {
            Decision::Bank => {
                let at_risk = turn_score;
                turn_score += scoring.score;
                rolls.push(SubRoll {
                    roll,
                    score: scoring.score,
                    decision: Some(Decision::Bank),
                });
                resolve(
                    player,
                    TurnResolution {
                        end: TurnEnd::Banked,
                        score: turn_score,
                        at_risk,
                    },
                );
                return TurnOutcome {
                    end: TurnEnd::Banked,
                    score: turn_score,
                    rolls,
                };
            }
            Decision::Continue { reroll } => {
                let kept = set_aside(&roll, &reroll);
                assert_eq!(kept.len() + reroll.len(), roll.len());
                assert!(
                    !kept.is_empty(),
                    "{} continued without setting aside any of {:?}",
                    player.name(),
                    roll
                );
                let kept_scoring = score(&kept);
                assert!(
                    kept_scoring.score > 0 && kept_scoring.unused.is_empty(),
                    "{} set aside {:?}, which doesn't fully score",
                    player.name(),
                    kept
                );
                turn_score += kept_scoring.score;

                dice_to_roll = if reroll.is_empty() {
                    debug!("Hot dice at {} points", turn_score);
                    if let Some(observer) = player.observer() {
                        observer.hot_dice();
                    }
                    DICE_COUNT
                } else {
                    reroll.len()
                };

                rolls.push(SubRoll {
                    roll,
                    score: kept_scoring.score,
                    decision: Some(Decision::Continue { reroll }),
                });
            }
        }
    }
}
