//! Noughts - unified CLI.

use anyhow::Result;
use clap::Parser;
use noughts::cli::{Cli, Command, ModeArg};
use noughts::{NoughtsConfig, console, duel, relay};
use noughts_engine::{LocalSession, Mode};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(match cli.command {
        Command::Serve { .. } => "info,noughts=debug",
        Command::Play { .. } | Command::Duel { .. } => "warn",
    });
    let config = NoughtsConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            host,
            port,
            grace_secs,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(secs) = grace_secs {
                config = config.with_disposal_grace_secs(secs);
            }
            relay::serve(&config).await
        }
        Command::Play {
            mode,
            difficulty,
            mark,
            delay_ms,
        } => {
            let mode = match mode {
                ModeArg::Pvp => Mode::PlayerVsPlayer,
                ModeArg::Pvc => Mode::PlayerVsComputer {
                    difficulty,
                    human_mark: mark,
                },
            };
            let delay = delay_ms.map_or_else(|| config.thinking_delay(), Duration::from_millis);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut rng = SmallRng::from_os_rng();
            let last = console::run(LocalSession::new(mode), delay, &mut rng, stdin, tokio::io::stdout()).await?;
            info!(stats = ?last.stats, "Local session ended");
            Ok(())
        }
        Command::Duel { x, o, games, seed } => {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            let stats = duel::run_duel(x, o, games, &mut rng);
            println!(
                "X ({x}) wins: {}\nO ({o}) wins: {}\nDraws: {}\nGames: {}",
                stats.x_wins(),
                stats.o_wins(),
                stats.draws(),
                stats.total_games()
            );
            Ok(())
        }
    }
}

/// Logs go to stderr so the terminal game keeps stdout.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
