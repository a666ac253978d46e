use super::{Roll, DICE_COUNT, FACES};

/// Points for a straight 1-2-3-4-5-6
pub const STRAIGHT: u32 = 500;
/// Points for three of a kind, indexed by face - 1
const TRIPLES: [u32; FACES] = [1000, 200, 300, 400, 500, 600];
const SINGLE_ONE: u32 = 100;
const SINGLE_FIVE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub score: u32,
    /// Dice that took no part in any scoring combination, in roll order
    pub unused: Roll,
}

impl ScoringResult {
    pub fn bust(&self) -> bool {
        self.score == 0
    }

    /// Number of dice that went into the score
    pub fn consumed(&self, roll: &[u8]) -> usize {
        roll.len() - self.unused.len()
    }
}

fn histogram(roll: &[u8]) -> [usize; FACES] {
    assert!(
        !roll.is_empty() && roll.len() <= DICE_COUNT,
        "A roll needs between 1 and {} dice, got {:?}",
        DICE_COUNT,
        roll
    );
    let mut counts = [0; FACES];
    for &face in roll {
        assert!(
            (1..=FACES as u8).contains(&face),
            "Face {} out of range in {:?}",
            face,
            roll
        );
        counts[(face - 1) as usize] += 1;
    }
    counts
}

///
/// Scores a roll, taking every combination that scores.
///
/// The score only depends on the multiset of faces. Whatever isn't part of a combination
/// comes back as `unused`, so a bust always returns the whole roll.
///
pub fn score(roll: &[u8]) -> ScoringResult {
    let counts = histogram(roll);

    if counts.iter().all(|&count| count == 1) {
        return ScoringResult {
            score: STRAIGHT,
            unused: Roll::new(),
        };
    }

    let mut points = 0;
    let mut used = [0; FACES];
    for (idx, &count) in counts.iter().enumerate() {
        let triples = count / 3;
        points += triples as u32 * TRIPLES[idx];
        used[idx] = triples * 3;
    }

    // Leftover 1s and 5s score on their own
    let ones = counts[0] - used[0];
    points += ones as u32 * SINGLE_ONE;
    used[0] += ones;
    let fives = counts[4] - used[4];
    points += fives as u32 * SINGLE_FIVE;
    used[4] += fives;

    let mut unused = Roll::with_capacity(roll.len());
    for &face in roll {
        let slot = &mut used[(face - 1) as usize];
        if *slot > 0 {
            *slot -= 1;
        } else {
            unused.push(face);
        }
    }

    ScoringResult {
        score: points,
        unused,
    }
}

///
/// Returns the dice left on the table once `reroll` is picked back up from `roll`.
///
/// Panics if `reroll` isn't part of `roll`.
///
pub fn set_aside(roll: &[u8], reroll: &[u8]) -> Roll {
    let mut kept = roll.to_vec();
    for face in reroll {
        match kept.iter().position(|d| d == face) {
            Some(idx) => {
                kept.remove(idx);
            }
            None => panic!("Rerolling {:?} which isn't in {:?}", reroll, roll),
        }
    }
    kept
}
