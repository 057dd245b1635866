//! Interactive text-mode front-end.
//!
//! Plays a game in the terminal against (or between) engine instances:
//! mode selection, board rendering, coordinate-move input with an
//! interactive promotion prompt, undo by replay, and a one-shot engine
//! time override. All chess decisions (legality, check, mate, draws)
//! are answered by the core predicates; this loop only wires them to
//! the terminal.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use sable_core::{
    Color, Move, PieceKind, Position, SearchLimits, is_legal, legal_moves, move_to_str, parse_move,
    rank_of, sq_from_coords,
};
use sable_engine::Engine;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PlayerKind {
    Human,
    Engine,
}

struct GameConfig {
    white: PlayerKind,
    black: PlayerKind,
    engine_time_ms: u64,
}

impl GameConfig {
    fn is_human_turn(&self, pos: &Position) -> bool {
        let player = match pos.side_to_move {
            Color::White => self.white,
            Color::Black => self.black,
        };
        player == PlayerKind::Human
    }
}

fn piece_symbol(pc: sable_core::Piece) -> &'static str {
    match (pc.color, pc.kind) {
        (Color::White, PieceKind::Pawn) => "♙",
        (Color::White, PieceKind::Knight) => "♘",
        (Color::White, PieceKind::Bishop) => "♗",
        (Color::White, PieceKind::Rook) => "♖",
        (Color::White, PieceKind::Queen) => "♕",
        (Color::White, PieceKind::King) => "♔",
        (Color::Black, PieceKind::Pawn) => "♟",
        (Color::Black, PieceKind::Knight) => "♞",
        (Color::Black, PieceKind::Bishop) => "♝",
        (Color::Black, PieceKind::Rook) => "♜",
        (Color::Black, PieceKind::Queen) => "♛",
        (Color::Black, PieceKind::King) => "♚",
    }
}

fn print_board(pos: &Position) {
    println!("\n  +------------------------+");
    for rank in (0..8u8).rev() {
        print!("{} |", rank + 1);
        for file in 0..8u8 {
            let sq = sq_from_coords(file, rank);
            let piece = pos.piece_at(sq);
            let cell = match piece {
                Some(pc) => format!(" {} ", piece_symbol(pc)),
                None => "   ".to_string(),
            };
            let styled = match piece.map(|pc| pc.color) {
                Some(Color::White) => cell.bright_white(),
                _ => cell.black(),
            };
            let dark = (rank + file) % 2 == 0;
            let styled = if dark {
                styled.on_truecolor(125, 95, 70)
            } else {
                styled.on_truecolor(200, 170, 130)
            };
            print!("{styled}");
        }
        println!("|");
    }
    println!("  +------------------------+");
    println!("    a  b  c  d  e  f  g  h");
    println!(
        "Side to move: {}",
        match pos.side_to_move {
            Color::White => "White",
            Color::Black => "Black",
        }
    );
}

fn read_trimmed(input: &mut impl BufRead) -> Result<Option<String>> {
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn setup_game(input: &mut impl BufRead) -> Result<GameConfig> {
    println!("===== Sable =====");
    println!("Choose game mode:");
    println!("  1) Human (White) vs Engine (Black)");
    println!("  2) Engine (White) vs Human (Black)");
    println!("  3) Human vs Human");
    println!("  4) Engine vs Engine");
    print!("Enter choice [1-4]: ");

    let choice = read_trimmed(input)?
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);
    let (white, black) = match choice {
        2 => (PlayerKind::Engine, PlayerKind::Human),
        3 => (PlayerKind::Human, PlayerKind::Human),
        4 => (PlayerKind::Engine, PlayerKind::Engine),
        _ => (PlayerKind::Human, PlayerKind::Engine),
    };

    print!("Engine time per move in ms (default 2000): ");
    let engine_time_ms = read_trimmed(input)?
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .unwrap_or(2000);

    println!("Configuration:");
    for (name, kind) in [("White", white), ("Black", black)] {
        let label = if kind == PlayerKind::Human {
            "Human"
        } else {
            "Engine"
        };
        println!("  {name}: {label}");
    }
    println!("  Engine time: {engine_time_ms} ms\n");

    Ok(GameConfig {
        white,
        black,
        engine_time_ms,
    })
}

fn is_promotion_attempt(pos: &Position, text: &str) -> bool {
    let Some(from) = sable_core::coord_to_sq(&text[0..2]) else {
        return false;
    };
    let Some(to) = sable_core::coord_to_sq(&text[2..4]) else {
        return false;
    };
    let Some(pc) = pos.piece_at(from) else {
        return false;
    };
    if pc.color != pos.side_to_move || pc.kind != PieceKind::Pawn {
        return false;
    }
    match pc.color {
        Color::White => rank_of(to) == 7,
        Color::Black => rank_of(to) == 0,
    }
}

fn ask_promotion_piece(input: &mut impl BufRead) -> Result<char> {
    loop {
        print!("Promotion piece? Enter q/r/b/n (default q): ");
        let Some(line) = read_trimmed(input)? else {
            return Ok('q');
        };
        let line = line.to_ascii_lowercase();
        match line.chars().next() {
            None => return Ok('q'),
            Some(c @ ('q' | 'r' | 'b' | 'n')) => return Ok(c),
            Some(_) => println!("Invalid. Please type q, r, b, or n."),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut engine = Engine::new();
    let mut pos = Position::startpos();
    engine.start_new_game(&mut pos);

    let config = setup_game(&mut input)?;
    let mut move_history: Vec<Move> = Vec::new();
    let mut next_engine_time_ms: Option<u64> = None;

    loop {
        print_board(&pos);

        let legal = legal_moves(&pos);
        let in_check = pos.in_check(pos.side_to_move);

        if legal.is_empty() {
            if in_check {
                match pos.side_to_move {
                    Color::White => println!("Checkmate: Black wins."),
                    Color::Black => println!("Checkmate: White wins."),
                }
            } else {
                println!("Draw by stalemate (no legal moves).");
            }
            break;
        }
        if in_check {
            println!("Check.");
        }
        if pos.halfmove_clock >= 100 {
            println!("Draw by the fifty-move rule.");
            break;
        }
        if engine.repetition_count_game(&pos) >= 3 {
            println!("Draw by threefold repetition.");
            break;
        }

        // Engine turn
        if !config.is_human_turn(&pos) {
            let time_ms = next_engine_time_ms.take().unwrap_or(config.engine_time_ms);
            println!("[Engine] thinking ({time_ms} ms)...");

            let limits = SearchLimits::depth_and_time(64, Duration::from_millis(time_ms));
            let result = engine.search_best_move(&pos, limits);
            // Legal moves exist here, so the search normally completes
            // at least depth 1; fall back to any legal move otherwise
            let mv = result.best_move.unwrap_or(legal[0]);

            let text = move_to_str(mv);
            engine.apply_game_move(&mut pos, mv);
            move_history.push(mv);
            println!(
                "[Engine] plays: {text} (score {}, nodes {})\n",
                result.score, result.nodes
            );
            continue;
        }

        // Human turn
        let mover = match pos.side_to_move {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("[Human {mover}] enter move (e2e4, 'undo', 'board', 'time', 'quit'): ");
        let Some(line) = read_trimmed(&mut input)? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        match line.to_ascii_lowercase().as_str() {
            "quit" | "q" => {
                println!("Exiting.");
                break;
            }
            "board" => continue,
            "time" | "t" | "modify" | "m" => {
                print!(
                    "Engine time (ms) for the NEXT engine move only (default {}): ",
                    config.engine_time_ms
                );
                let Some(value) = read_trimmed(&mut input)? else {
                    break;
                };
                match value.parse::<u64>() {
                    Ok(ms) if ms > 0 => {
                        next_engine_time_ms = Some(ms);
                        println!("OK. Next engine move will use {ms} ms.");
                    }
                    _ => println!("No change."),
                }
                continue;
            }
            "undo" | "u" => {
                if move_history.is_empty() {
                    println!("Nothing to undo.");
                    continue;
                }
                move_history.pop();
                engine.start_new_game(&mut pos);
                for &mv in &move_history {
                    engine.apply_game_move(&mut pos, mv);
                }
                println!("Move undone.");
                continue;
            }
            _ => {}
        }

        // Coordinate move; ask for the piece when a promotion is typed
        // without its suffix
        let mut text = line.to_ascii_lowercase();
        if text.len() == 4 && text.is_ascii() && is_promotion_attempt(&pos, &text) {
            text.push(ask_promotion_piece(&mut input)?);
        }

        let Some(mv) = parse_move(&pos, &text) else {
            println!("Illegal or unknown move. Format example: e2e4 or e7e8q");
            continue;
        };
        if !is_legal(&mut pos, mv) {
            println!("Move leaves the king in check (illegal).");
            continue;
        }

        engine.apply_game_move(&mut pos, mv);
        move_history.push(mv);
        println!("Played: {text}\n");
    }

    Ok(())
}
