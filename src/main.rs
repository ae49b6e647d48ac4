//! Scoresheet: record a chess game move by move in SAN, then print it as PGN.

mod pgn;

use std::io::{self, BufRead, Write};

use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scoresheet_core::coretypes::Color;
use scoresheet_core::{GameResult, GameSession};

use crate::pgn::Tags;

/// Record a chess game in Standard Algebraic Notation and print it as PGN.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Event tag.
    #[arg(long, default_value = "Casual Game")]
    event: String,
    /// Site tag.
    #[arg(long, default_value = "Local")]
    site: String,
    /// Date tag as YYYY.MM.DD, today when omitted.
    #[arg(long)]
    date: Option<String>,
    /// Round tag.
    #[arg(long, default_value = "1")]
    round: String,
    /// Name of the player with the white pieces.
    #[arg(long, default_value = "Player 1")]
    white: String,
    /// Name of the player with the black pieces.
    #[arg(long, default_value = "Player 2")]
    black: String,
}

impl Args {
    fn into_tags(self) -> Tags {
        Tags {
            event: self.event,
            site: self.site,
            date: self
                .date
                .unwrap_or_else(|| Local::now().format("%Y.%m.%d").to_string()),
            round: self.round,
            white: self.white,
            black: self.black,
        }
    }
}

/// One line of user input.
#[derive(Debug, Clone, Eq, PartialEq)]
enum InputKind {
    Quit,
    Undo,
    Show,
    Preview,
    Legal,
    Help,
    Edit {
        number: usize,
        color: Color,
        san: String,
    },
    Result(GameResult),
    GameMove(String),
    Error(String),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let s = s.trim();
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();

        match command.as_str() {
            "quit" | "exit" | "done" => Self::Quit,
            "undo" => Self::Undo,
            "show" => Self::Show,
            "preview" => Self::Preview,
            "legal" => Self::Legal,
            "help" => Self::Help,
            "edit" => {
                let (Some(number), Some(color), Some(san), None) =
                    (words.next(), words.next(), words.next(), words.next())
                else {
                    return Self::Error("usage: edit <number> <white|black> <move>".to_string());
                };
                match (number.parse::<usize>(), color.parse::<Color>()) {
                    (Ok(number), Ok(color)) => Self::Edit {
                        number,
                        color,
                        san: san.to_string(),
                    },
                    _ => Self::Error(format!("cannot edit move '{number}' of '{color}'")),
                }
            }
            "result" => match words.next().map(str::parse::<GameResult>) {
                Some(Ok(result)) => Self::Result(result),
                Some(Err(err)) => Self::Error(err.to_string()),
                None => Self::Error("usage: result <1-0|0-1|1/2-1/2|*>".to_string()),
            },
            _ => Self::GameMove(s.to_string()),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  done | quit | exit             => Finish the game and print the PGN.");
    println!("  undo                           => Remove the last half-move.");
    println!("  show                           => Display all moves entered.");
    println!("  preview                        => Show the PGN so far.");
    println!("  legal                          => List the legal moves.");
    println!("  edit <n> <white|black> <move>  => Replace an earlier move.");
    println!("  result <1-0|0-1|1/2-1/2|*>     => Set the result and finish.");
    println!("  help                           => Print this help text.");
    println!("\nMoves are entered in Standard Algebraic Notation.");
    println!("Examples: e4, Nf3, exd5, Nbd7, R1a3, O-O, O-O-O, e8=Q, Qh5#");
    println!("Only legal moves are accepted!");
}

/// Reads one line. Returns None at the end of input.
fn read_line(stdin: &mut impl BufRead, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    match stdin.read_line(&mut input)? {
        0 => Ok(None),
        _ => Ok(Some(input)),
    }
}

fn prompt(session: &GameSession) -> String {
    let number = session.move_count() + 1;
    match session.side_to_move() {
        Color::White => format!("\nMove {number}\nWhite's move: "),
        Color::Black => "Black's move: ".to_string(),
    }
}

/// Move entry loop. Returns when the game is over, the user is done, or input ends.
fn record_moves(
    session: &mut GameSession,
    tags: &Tags,
    stdin: &mut impl BufRead,
) -> io::Result<()> {
    while let Some(input) = read_line(stdin, &prompt(session))? {
        match InputKind::from(input.as_str()) {
            InputKind::Quit => break,
            InputKind::Undo => {
                if session.undo_half_move() {
                    println!("✓ Last move removed");
                } else {
                    println!("✗ No moves to undo");
                }
            }
            InputKind::Show => println!("\nCurrent moves:\n{}\n", session.moves_display()),
            InputKind::Preview => {
                let mut preview = session.clone();
                preview.finalize_pending();
                print!("{}", pgn::preview(tags, preview.move_records(), preview.result()));
            }
            InputKind::Legal => {
                let legal_moves = session.legal_moves_san();
                println!("\nLegal moves ({}):\n{}\n", legal_moves.len(), legal_moves.join(", "));
            }
            InputKind::Help => print_help(),
            InputKind::Edit { number, color, san } => {
                match session.edit_move(number, color, &san) {
                    Ok(()) => println!("✓ Move updated successfully"),
                    Err(err) => println!("✗ {err}"),
                }
            }
            InputKind::Result(result) => {
                session.set_result(result);
                break;
            }
            InputKind::Error(message) => println!("✗ {message}"),
            InputKind::GameMove(san) if san.is_empty() => continue,
            InputKind::GameMove(san) => {
                let color = session.side_to_move();
                match session.propose_move(&san, color) {
                    Ok(()) => {
                        println!("{color}'s move: {san} ✓");
                        let status = session.current_status();
                        if !status.as_str().is_empty() {
                            println!("  {status}");
                        }
                        if session.is_game_over() {
                            break;
                        }
                    }
                    Err(err) => println!("✗ Invalid move: {err}"),
                }
            }
        }
    }
    Ok(())
}

/// Asks for the result until a valid token is entered. Input ending keeps `*`.
fn ask_result(session: &mut GameSession, stdin: &mut impl BufRead) -> io::Result<()> {
    println!("\nGame ended. Enter result:");
    println!("  1-0       White wins");
    println!("  0-1       Black wins");
    println!("  1/2-1/2   Draw");
    println!("  *         In progress/Unknown");

    while let Some(input) = read_line(stdin, "\nResult: ")? {
        match input.parse::<GameResult>() {
            Ok(result) => {
                session.set_result(result);
                break;
            }
            Err(_) => println!("Invalid result. Please enter 1-0, 0-1, 1/2-1/2, or *"),
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let tags = Args::parse().into_tags();
    info!("recording {} vs {} at {}", tags.white, tags.black, tags.event);

    println!("Scoresheet 0.1.0");
    println!("Type 'help' for commands | Type 'done' to finish at any time");

    let mut session = GameSession::new();
    let mut stdin = io::stdin().lock();

    record_moves(&mut session, &tags, &mut stdin)?;
    session.finalize_pending();
    if session.result() == GameResult::Unknown {
        ask_result(&mut session, &mut stdin)?;
    }

    print!("\n{}", pgn::render(&tags, session.move_records(), session.result()));
    io::stdout().flush()
}
