//! Chess console
//!
//! Reads commands from stdin and plays them against a session. When the
//! configuration names a computer side, the random provider answers after
//! every human move.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chess_rules::{GameState, Outcome, Phase, PieceKind, Square};
use chess_session::{Session, SessionConfig};
use random_provider::RandomProvider;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn print_usage(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "ML-chess Console")?;
    writeln!(out)?;
    writeln!(out, "Usage:")?;
    writeln!(out, "  chess_console [config.toml]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  <move>            - play a move (e2e4, Ng1f3, e7e8q, O-O)")?;
    writeln!(out, "  moves <square>    - legal destinations of the piece on <square>")?;
    writeln!(out, "  promote <q|r|b|n> - finish a pending promotion")?;
    writeln!(out, "  board             - print the board")?;
    writeln!(out, "  key               - print the position key")?;
    writeln!(out, "  history           - print the moves played so far")?;
    writeln!(out, "  outcome           - print the game outcome")?;
    writeln!(out, "  save <path>       - write the history as JSON")?;
    writeln!(out, "  new               - start a new game")?;
    writeln!(out, "  help")?;
    writeln!(out, "  quit")?;
    Ok(())
}

fn load_config(args: &[String]) -> Result<SessionConfig> {
    match args.first() {
        Some(path) => SessionConfig::load(Path::new(path))
            .with_context(|| format!("failed to load config from {path}")),
        None => Ok(SessionConfig::default()),
    }
}

fn render_board(game: &GameState) -> String {
    let board = game.board();
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');
        for file in 0..8u8 {
            let ch = Square::new(rank, file)
                .and_then(|sq| board.piece_at(sq))
                .map_or('.', |pc| pc.symbol());
            out.push(ch);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}

/// Let the computer move for as long as it is its turn.
fn computer_turns(session: &mut Session, out: &mut impl Write) -> Result<()> {
    while session.is_computer_turn() {
        let rec = session.play_computer_turn()?;
        writeln!(out, "computer plays {}", rec.notation)?;
    }
    Ok(())
}

fn report(session: &Session, out: &mut impl Write) -> Result<()> {
    match session.game().phase() {
        Phase::AwaitingPromotion(sq) => writeln!(out, "promote the pawn on {sq}")?,
        Phase::GameOver(outcome) => writeln!(out, "game over: {outcome}")?,
        _ => {
            let outcome = session.outcome();
            if !matches!(outcome, Outcome::InProgress) {
                writeln!(out, "{outcome}")?;
            }
        }
    }
    Ok(())
}

/// Run one command. Returns false when the console should exit.
fn handle(session: &mut Session, parts: &[&str], out: &mut impl Write) -> Result<bool> {
    match parts[0] {
        "quit" | "exit" => return Ok(false),
        "help" => print_usage(out)?,
        "board" => write!(out, "{}", render_board(session.game()))?,
        "key" => writeln!(out, "{}", session.game().position_key())?,
        "history" => writeln!(out, "{}", session.history_text())?,
        "outcome" => writeln!(out, "{}", session.outcome())?,
        "new" => {
            session.new_game()?;
            computer_turns(session, out)?;
        }
        "moves" => {
            let Some(text) = parts.get(1) else {
                bail!("moves needs a square");
            };
            let sq = Square::parse(text).with_context(|| format!("not a square: {text}"))?;
            let targets: Vec<String> = session
                .legal_moves(sq)?
                .iter()
                .map(Square::to_string)
                .collect();
            writeln!(out, "{}", targets.join(" "))?;
        }
        "promote" => {
            let kind = parts
                .get(1)
                .and_then(|t| t.chars().next())
                .and_then(PieceKind::from_letter)
                .filter(|k| k.is_promotion_target());
            let Some(kind) = kind else {
                bail!("promote needs one of q, r, b, n");
            };
            session.promote(kind)?;
            computer_turns(session, out)?;
        }
        "save" => {
            let Some(path) = parts.get(1) else {
                bail!("save needs a path");
            };
            session.save_history_json(Path::new(path))?;
            writeln!(out, "saved {path}")?;
        }
        text => {
            session.play_move(text)?;
            computer_turns(session, out)?;
        }
    }
    report(session, out)?;
    Ok(true)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage(&mut io::stdout())?;
        return Ok(());
    }

    let config = load_config(&args)?;
    let mut session = Session::with_provider(config, Box::new(RandomProvider::new()))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    computer_turns(&mut session, &mut stdout)?;
    write!(stdout, "{}", render_board(session.game()))?;
    stdout.flush().ok();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        debug!(command = parts[0], "console command");

        match handle(&mut session, &parts, &mut stdout) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                error!("{err:#}");
                writeln!(stdout, "error: {err:#}").ok();
            }
        }
        stdout.flush().ok();
    }
    Ok(())
}
