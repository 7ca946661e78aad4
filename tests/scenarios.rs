use tile_cascade::action::{Action, ActionReport};
use tile_cascade::config::EngineConfig;
use tile_cascade::engine::Engine;
use tile_cascade::error::EngineError;
use tile_cascade::source::SequenceSource;
use tile_cascade::utils::{grid_from_text, grid_to_rows};

fn run_script<S: tile_cascade::source::ValueSource>(
    engine: &mut Engine<S>,
    script: &str,
) -> Vec<Result<ActionReport, EngineError>> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<Action>().unwrap().apply(engine))
        .collect()
}

#[test]
fn test_crush_script_with_revert_and_undo() {
    let grid = grid_from_text(
        "
        2054
        5530
        2143
        2301
        ",
        6,
    )
    .unwrap();
    let config = EngineConfig::crush().with_dimensions(4, 4);
    let source = SequenceSource::new(vec![2, 4, 1, 5, 0, 5, 0]);
    let mut engine = Engine::with_grid(config, grid.clone(), source).unwrap();

    let results = run_script(
        &mut engine,
        "
        swap 0,0 0,1
        swap 0,0 1,1
        swap 0,2 1,2
        ",
    );

    let ActionReport::Swap(reverted) = results[0].as_ref().unwrap() else {
        panic!("expected a swap report");
    };
    assert!(!reverted.committed);
    assert!(results[1].as_ref().unwrap_err().is_invalid_move());
    assert_eq!(results[2].as_ref().unwrap().score_delta(), 110);
    assert_eq!(engine.score(), 110);

    assert_eq!(Action::Undo.apply(&mut engine).unwrap(), ActionReport::Undo(true));
    assert_eq!(engine.grid(), &grid);
    assert_eq!(engine.score(), 0);
}

#[test]
fn test_stack_game_until_column_is_full() {
    let config = EngineConfig::stack().with_dimensions(3, 2);
    let mut engine = Engine::with_source(config, SequenceSource::new(vec![0])).unwrap();

    let results = run_script(
        &mut engine,
        "
        drop 0 0
        drop 0 0
        drop 1 9
        smash 1,0
        drop 0 5
        drop 0 5
        drop 0 5
        drop 0 5
        ",
    );

    assert_eq!(results[3].as_ref().unwrap().score_delta(), 20);
    assert!(results[..7].iter().all(Result::is_ok));
    assert_eq!(results[7], Err(EngineError::ColumnFull { col: 0 }));
    assert_eq!(grid_to_rows(engine.grid()), vec!["5.", "5.", "59"]);
    assert_eq!(engine.score(), 20);
    assert!(engine.has_moves());
}
