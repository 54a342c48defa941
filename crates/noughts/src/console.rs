//! Line-based terminal front end for local play.
//!
//! The engine decides instantly; the thinking pause before a computer move
//! is applied here and is purely cosmetic.

use noughts_engine::{GameStatus, LocalSession, LocalSnapshot, Mark, Mode, Move, Position};
use rand::Rng;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

const HELP: &str = "Enter a cell (1-9 or a name like \"center\"), n = new game, r = reset stats, q = quit";

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play a cell.
    Play(Position),
    /// Start a new game.
    NewGame,
    /// Zero the statistics.
    ResetStats,
    /// Show help.
    Help,
    /// Leave.
    Quit,
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "new" => Some(Command::NewGame),
            "r" | "reset" => Some(Command::ResetStats),
            "h" | "help" | "?" => Some(Command::Help),
            "q" | "quit" | "exit" => Some(Command::Quit),
            other => Position::from_label_or_number(other).map(Command::Play),
        }
    }
}

/// Formats the status line and scoreboard for a snapshot.
pub fn banner(snapshot: &LocalSnapshot) -> String {
    let stats = snapshot.stats;
    let score = match snapshot.mode {
        Mode::PlayerVsPlayer => format!(
            "X: {}  O: {}  Draws: {}  Games: {}",
            stats.x_wins(),
            stats.o_wins(),
            stats.draws(),
            stats.total_games()
        ),
        Mode::PlayerVsComputer { human_mark, .. } => format!(
            "You: {}  Computer: {}  Draws: {}  Games: {}",
            stats.wins_for(human_mark),
            stats.wins_for(human_mark.opponent()),
            stats.draws(),
            stats.total_games()
        ),
    };
    let status = match (snapshot.status, snapshot.mode) {
        (GameStatus::Won(winner), Mode::PlayerVsComputer { human_mark, .. }) if winner == human_mark => {
            "You win!".to_string()
        }
        (GameStatus::Won(_), Mode::PlayerVsComputer { .. }) => "Computer wins!".to_string(),
        (status, _) => status.to_string(),
    };
    format!("{}\n\n{}\n{}\n", snapshot.board.display(), status, score)
}

/// Runs the game loop until `q` or end of input.
#[instrument(skip_all, fields(mode = ?session.mode()))]
pub async fn run<R, W, G>(
    mut session: LocalSession,
    thinking_delay: Duration,
    rng: &mut G,
    input: R,
    mut output: W,
) -> anyhow::Result<LocalSnapshot>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: Rng + ?Sized,
{
    output.write_all(format!("{HELP}\n\n").as_bytes()).await?;
    computer_turn(&mut session, thinking_delay, rng, &mut output).await?;
    output.write_all(banner(&session.snapshot()).as_bytes()).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            output.write_all(format!("Unrecognised input. {HELP}\n").as_bytes()).await?;
            continue;
        };
        debug!(?command, "Console command");
        match command {
            Command::Quit => break,
            Command::Help => {
                output.write_all(format!("{HELP}\n").as_bytes()).await?;
                continue;
            }
            Command::NewGame => {
                session.new_game();
            }
            Command::ResetStats => {
                session.reset_stats();
            }
            Command::Play(position) => {
                let mark = session.table().game().current_mark();
                // Illegal moves are ignored; the redrawn board shows nothing changed.
                if session.apply_move(position.to_index(), None).is_ok() {
                    output
                        .write_all(format!("{}\n", Move::new(mark, position)).as_bytes())
                        .await?;
                }
            }
        }
        computer_turn(&mut session, thinking_delay, rng, &mut output).await?;
        output.write_all(banner(&session.snapshot()).as_bytes()).await?;
        output.flush().await?;
    }

    Ok(session.snapshot())
}

async fn computer_turn<W, G>(
    session: &mut LocalSession,
    thinking_delay: Duration,
    rng: &mut G,
    output: &mut W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    G: Rng + ?Sized,
{
    if !session.is_computer_turn() {
        return Ok(());
    }
    output.write_all(b"Computer is thinking...\n").await?;
    output.flush().await?;
    if !thinking_delay.is_zero() {
        tokio::time::sleep(thinking_delay).await;
    }
    let mark: Mark = session.table().game().current_mark();
    if let Some(position) = session.computer_move(rng).and_then(Position::from_index) {
        output
            .write_all(format!("{}\n", Move::new(mark, position)).as_bytes())
            .await?;
    }
    Ok(())
}
