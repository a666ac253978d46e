pub mod diezmil;
pub mod players;
