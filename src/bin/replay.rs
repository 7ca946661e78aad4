use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tile_cascade::action::{Action, ActionReport};
use tile_cascade::cli::GameArgs;
use tile_cascade::engine::Engine;
use tile_cascade::source::RandomSource;
use tile_cascade::utils::grid_from_text;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Apply scripted actions to a grid loaded from a file",
    long_about = None
)]
struct Args {
    #[clap(flatten)]
    game: GameArgs,

    /// File with one action per line
    /// ('swap r,c r,c', 'smash r,c', 'drop col value', 'spawn', 'undo')
    #[clap(long)]
    script: Option<PathBuf>,

    /// Action to apply after the script; may be repeated
    #[clap(short, long = "action")]
    actions: Vec<Action>,

    /// Path to the grid file (one row per line, '0-9a-z' values, '.' empty)
    grid_file: PathBuf,
}

fn read_engine(args: &Args) -> Result<Engine, String> {
    let mut config = args.game.to_config();
    let content = fs::read_to_string(&args.grid_file)
        .map_err(|e| format!("Failed to read file: {}", e))?;
    let grid = grid_from_text(&content, config.alphabet_size)
        .map_err(|e| format!("Invalid grid format: {}", e))?;
    config.rows = grid.rows();
    config.cols = grid.cols();

    let source = match config.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    Engine::with_grid(config, grid, source).map_err(|e| format!("Invalid configuration: {}", e))
}

fn read_script(path: &PathBuf) -> Result<Vec<Action>, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    content
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(i, line)| {
            line.parse::<Action>()
                .map_err(|e| format!("Line {}: {}", i + 1, e))
        })
        .collect()
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut engine = read_engine(&args).unwrap_or_else(|e| {
        eprintln!("Failed to load grid from {}: {}", args.grid_file.display(), e);
        std::process::exit(2);
    });
    let mut actions = match &args.script {
        Some(path) => read_script(path).unwrap_or_else(|e| {
            eprintln!("Failed to load script from {}: {}", path.display(), e);
            std::process::exit(2);
        }),
        None => Vec::new(),
    };
    actions.extend(args.actions.iter().copied());

    println!("Loaded grid from {}\n", args.grid_file.display());
    println!("Initial grid state:\n{}\n", engine.grid());

    for (i, action) in actions.iter().enumerate() {
        match action.apply(&mut engine) {
            Ok(report) => {
                println!("Action {}: {} -> {}", i + 1, action, report);
                if let ActionReport::Swap(outcome) = &report {
                    for step in &outcome.resolution.steps {
                        println!(
                            "  cascade {}: removed {} cells, +{} points",
                            step.depth,
                            step.removed(),
                            step.score
                        );
                    }
                }
            }
            Err(e) if e.is_rejection() => {
                println!("Action {}: {} -> rejected: {}", i + 1, action, e)
            }
            Err(e) => {
                eprintln!("Action {}: {} -> engine failure: {}", i + 1, action, e);
                std::process::exit(1);
            }
        }
    }

    println!("\nFinal score: {}", engine.score());
    println!("Moves: {}", engine.moves());
    println!("Final grid state:\n{}\n", engine.grid());
}
