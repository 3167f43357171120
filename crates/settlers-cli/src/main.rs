//! Settlers command-line host: create games and play them move by move over snapshot files.

use clap::{Parser, Subcommand};
use settlers_core::GameConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;
mod summary;

use session::Session;

/// Hex settlement game rules engine
#[derive(Parser, Debug)]
#[command(name = "settlers")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new game and write its snapshot
    New {
        /// Player names in seat order (2-4)
        #[arg(required = true, num_args = 2..=4)]
        players: Vec<String>,

        /// Board and dice seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Victory points needed to win
        #[arg(short, long, default_value = "10")]
        target: u32,

        /// Snapshot file to create
        #[arg(short, long, default_value = "game.json")]
        out: PathBuf,
    },

    /// Apply one move to a snapshot, printing the resulting events as JSON
    Apply {
        /// Snapshot file to update
        game: PathBuf,

        /// Seat making the move
        #[arg(short, long)]
        player: u8,

        /// The move as JSON, e.g. '"RollDice"' or '{"BankTrade":{"give":"Brick","receive":"Ore"}}'
        #[arg(long = "move")]
        mv: String,

        /// Override the derived randomness seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print a summary of a snapshot
    Inspect {
        game: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Args::parse().command {
        Commands::New {
            players,
            seed,
            target,
            out,
        } => {
            let config = GameConfig::new(players, seed).with_victory_points(target);
            let session = Session::create(out, config)?;
            print!("{}", session.summary());
        }
        Commands::Apply {
            game,
            player,
            mv,
            seed,
        } => {
            let mut session = Session::load(game)?;
            let events = session.apply_json(player, &mv, seed)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
            if let Some(winner) = session.game.winner() {
                info!(winner, "game over");
            }
        }
        Commands::Inspect { game, json } => {
            let session = Session::load(game)?;
            let summary = session.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
    }

    Ok(())
}
