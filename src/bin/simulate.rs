use clap::Parser;
use std::collections::BTreeMap;
use tile_cascade::cli::GameArgs;
use tile_cascade::engine::Engine;
use tile_cascade::heuristics::{play_out, PlayReport, Strategy};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Play seeded games with automated strategies and compare them",
    long_about = None
)]
struct Args {
    #[clap(flatten)]
    game: GameArgs,

    /// Number of games per strategy
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// Move limit per game
    #[clap(long, default_value_t = 200)]
    max_moves: u32,

    /// Strategies to evaluate (all of them if omitted)
    #[clap(long = "strategy", value_enum)]
    strategies: Vec<Strategy>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let strategies = if args.strategies.is_empty() {
        vec![Strategy::MaxScore, Strategy::FirstFound]
    } else {
        args.strategies.clone()
    };
    let start_seed = args.game.seed.unwrap_or(0);

    let mut all_reports: BTreeMap<String, Vec<PlayReport>> = BTreeMap::new();
    println!("Starting evaluation for {} games...", args.games);

    for game_idx in 0..args.games {
        let current_seed = start_seed + game_idx;
        let mut config = args.game.to_config();
        config.seed = Some(current_seed);
        println!("\nGame {} (Seed: {})", game_idx, current_seed);

        for strategy in &strategies {
            let mut engine = match Engine::new(config.clone()) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("Cannot start game: {}", e);
                    std::process::exit(2);
                }
            };
            let report = match play_out(&mut engine, *strategy, args.max_moves) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!(
                        "Error: strategy {:?} on seed {} failed: {}. Grid state:\n{}",
                        strategy,
                        current_seed,
                        e,
                        engine.grid()
                    );
                    continue;
                }
            };
            println!(
                "  Strategy: {:<12} Score: {:<6} Moves: {:<4} Best chain: {}{}",
                format!("{:?}", strategy),
                report.score,
                report.moves,
                report.best_chain,
                if report.finished { "" } else { " (move limit)" }
            );
            all_reports
                .entry(format!("{:?}", strategy))
                .or_default()
                .push(report);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of games: {}", args.games);
    println!("\n--- Averages ---");

    let mut averages: Vec<(&str, f64, f64)> = all_reports
        .iter()
        .filter(|(_, reports)| !reports.is_empty())
        .map(|(name, reports)| {
            let n = reports.len() as f64;
            let score = reports.iter().map(|r| r.score).sum::<u64>() as f64 / n;
            let moves = reports.iter().map(|r| u64::from(r.moves)).sum::<u64>() as f64 / n;
            (name.as_str(), score, moves)
        })
        .collect();

    // Sort by average score descending
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (name, score, moves) in averages {
        println!(
            "Strategy {:<12}: Average Score = {:.2}, Average Moves = {:.2}",
            name, score, moves
        );
    }
}
