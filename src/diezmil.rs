//! Ten-thousand (diez mil): dice scoring, turn and game engine, and the learning loop
pub mod dice;
pub mod game;
pub mod player;
pub mod scoring;
pub mod table;
pub mod trainer;
pub mod turn;

/// Dice in a full set
pub const DICE_COUNT: usize = 6;
pub const FACES: usize = 6;
/// Points needed to finish a game
pub const TARGET_SCORE: u32 = 10_000;

/// Faces of the dice in a single roll, each 1 to 6
pub type Roll = Vec<u8>;
