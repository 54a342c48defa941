//! Command-line interface for noughts.

use clap::{Parser, Subcommand, ValueEnum};
use noughts_engine::{Difficulty, Mark};
use std::path::PathBuf;

/// Noughts - tic-tac-toe relay server and local game
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe with a networked relay and computer opponents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Local play mode.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Two humans at one terminal
    Pvp,
    /// Human against the computer
    Pvc,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket relay for networked games
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds an empty lobby is kept before disposal
        #[arg(long)]
        grace_secs: Option<u64>,
    },

    /// Play a local game in the terminal
    Play {
        /// Player vs player or player vs computer
        #[arg(long, value_enum, default_value = "pvc")]
        mode: ModeArg,

        /// Computer difficulty (easy, medium, hard)
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Your mark against the computer; X moves first
        #[arg(short, long, default_value = "X")]
        mark: Mark,

        /// Override the computer's thinking pause in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Pit two computer difficulties against each other
    Duel {
        /// Difficulty playing X
        #[arg(long, default_value = "hard")]
        x: Difficulty,

        /// Difficulty playing O
        #[arg(long, default_value = "medium")]
        o: Difficulty,

        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// RNG seed for reproducible series
        #[arg(long)]
        seed: Option<u64>,
    },
}
