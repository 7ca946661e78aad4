use clap::Parser;
use std::io::{self, Write}; // For input/output
use tile_cascade::action::Action;
use tile_cascade::cli::{GameArgs, Mode};
use tile_cascade::engine::Engine;
use tile_cascade::error::EngineError;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a tile-matching game in the terminal", long_about = None)]
struct Args {
    #[clap(flatten)]
    game: GameArgs,
}

fn prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Crush => "Enter a swap (r1 c1 r2 c2), or 'u' to undo, 'q' to quit: ",
        Mode::Smash => {
            "Enter a cell to smash (r c), 'x r c' to reroll a cell, 'u' to undo, 'q' to quit: "
        }
        Mode::Stack => {
            "Enter a cell to smash (r c), Enter for the next number, 'u' to undo, 'q' to quit: "
        }
    }
}

// Turns "r c" or "r1 c1 r2 c2" into the action for the current mode.
fn parse_move(mode: Mode, parts: &[usize]) -> Option<Action> {
    match (mode, parts) {
        (Mode::Crush, &[r1, c1, r2, c2]) => Some(Action::Swap((r1, c1), (r2, c2))),
        (Mode::Smash | Mode::Stack, &[r, c]) => Some(Action::Smash((r, c))),
        _ => None,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mode = args.game.mode;

    let mut engine = match Engine::new(args.game.to_config()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Cannot start game: {}", e);
            std::process::exit(2);
        }
    };
    println!("Welcome to Tile Cascade ({:?})!", mode);

    loop {
        println!("---------------------");
        println!(
            "Moves: {}, Score: {}, Best chain: {}",
            engine.moves(),
            engine.score(),
            engine.score_state().best_chain()
        );
        println!("{}", engine.grid());

        if !engine.has_moves() {
            println!();
            println!("---------------------");
            println!("GAME OVER! No moves left.");
            println!("Final Score: {}", engine.score());
            println!("---------------------");
            break;
        }

        print!("{}", prompt(mode));
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "u" {
            if engine.undo_last_action() {
                println!("Move undone.");
            } else {
                println!("Cannot undo further (already at initial state or no moves made).");
            }
            continue;
        }

        let action = if trimmed_input.is_empty() && mode == Mode::Stack {
            Some(Action::Spawn)
        } else if let Some(rest) = trimmed_input.strip_prefix('x') {
            let parts: Vec<usize> = rest
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if let &[r, c] = parts.as_slice() {
                match engine.reroll_cell(r, c) {
                    Ok(value) => println!("Cell ({}, {}) is now {}.", r, c, value),
                    Err(e) => println!("Cannot reroll: {}", e),
                }
            } else {
                println!("Invalid input format. Use 'x row col'.");
            }
            continue;
        } else {
            let parts: Result<Vec<usize>, _> =
                trimmed_input.split_whitespace().map(str::parse).collect();
            parts.ok().and_then(|parts| parse_move(mode, &parts))
        };

        let Some(action) = action else {
            println!("Invalid input format.");
            continue;
        };

        let accepted = match action.apply(&mut engine) {
            Ok(report) => {
                println!("{}", report);
                true
            }
            Err(EngineError::ColumnFull { col }) => {
                println!("{}", engine.grid());
                println!("GAME OVER! Column {} is full.", col);
                println!("Final Score: {}", engine.score());
                break;
            }
            Err(e) => {
                println!("Invalid move: {}", e);
                false
            }
        };

        // In the stacking game a new number falls after every smash.
        if accepted && mode == Mode::Stack && matches!(action, Action::Smash(_)) {
            if let Err(EngineError::ColumnFull { col }) = engine.spawn_drop() {
                println!("GAME OVER! Column {} is full.", col);
                println!("Final Score: {}", engine.score());
                break;
            }
        }
    }
}
