//! Plays games of ten-thousand with a single player and prints how they went
use clap::{Parser, ValueEnum};
use diezmil_rs::diezmil::dice::RandomDice;
use diezmil_rs::diezmil::game::{Game, GameConfig};
use diezmil_rs::diezmil::player::Player;
use diezmil_rs::diezmil::table::PolicyTable;
use diezmil_rs::diezmil::TARGET_SCORE;
use diezmil_rs::players::{AlwaysBankPlayer, AveragingPlayer, IncrementalPlayer, RandomPlayer};
use env_logger::fmt::Formatter;
use log::Record;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Clone, ValueEnum)]
enum PlayerType {
    Random,
    AlwaysBank,
    Averaging,
    Incremental,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum)]
    player: PlayerType,

    #[arg(short, long, default_value_t = 1)]
    games: usize,

    #[arg(short, long, default_value_t = 1000)]
    turn_cap: usize,

    #[arg(long, default_value_t = TARGET_SCORE)]
    target: u32,

    /// Seed for the dice and the player; random if not given
    #[arg(short, long)]
    seed: Option<u64>,

    /// Saved table for the averaging player
    #[arg(long)]
    table: Option<PathBuf>,

    #[arg(short, long, default_value_t = 0.0)]
    exploration: f64,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    #[arg(long, default_value_t = 0.9)]
    discount: f64,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

impl Args {
    fn build_player(&self) -> anyhow::Result<Box<dyn Player>> {
        let player: Box<dyn Player> = match self.player {
            PlayerType::Random => Box::new(RandomPlayer),
            PlayerType::AlwaysBank => Box::new(AlwaysBankPlayer),
            PlayerType::Averaging => {
                let table = match &self.table {
                    Some(path) => PolicyTable::load(path)?,
                    None => PolicyTable::initial(),
                };
                Box::new(AveragingPlayer::new(self.exploration, table))
            }
            PlayerType::Incremental => Box::new(IncrementalPlayer::new(
                self.learning_rate,
                self.discount,
                self.exploration,
            )),
        };
        Ok(player)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let thread_id = thread::current().id();
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "[{}] [Thread: {:?}] [{}] - {}",
                timestamp,
                thread_id,
                record.level(),
                record.args()
            )
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("Seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dice = RandomDice::new(StdRng::seed_from_u64(rng.gen()));

    let mut player = args.build_player()?;
    let game = Game::new(GameConfig {
        target: args.target,
        turn_cap: args.turn_cap,
        verbose: true,
    });

    println!("Game\tTurns\tTotal");
    for game_index in 0..args.games {
        let result = game.play(&mut player, &mut dice, &mut rng);
        println!(
            "{}\t{}\t{}{}",
            game_index + 1,
            result.turns,
            result.total,
            if result.truncated { "\t(turn cap)" } else { "" }
        );
    }
    Ok(())
}
