use proptest::prelude::*;
use tile_cascade::config::EngineConfig;
use tile_cascade::engine::Engine;
use tile_cascade::grid::{Cell, Grid};
use tile_cascade::matcher::{find_runs, find_scoring_swaps};
use tile_cascade::source::{RandomSource, SequenceSource};
use tile_cascade::swap::are_adjacent;

fn crush(seed: u64, rows: usize, cols: usize, alphabet: u8) -> Engine {
    let config = EngineConfig::crush()
        .with_dimensions(rows, cols)
        .with_alphabet(alphabet)
        .with_seed(seed);
    Engine::new(config).unwrap()
}

proptest! {
    #[test]
    fn initialized_grid_is_full_and_has_no_runs(
        seed in any::<u64>(),
        rows in 3usize..10,
        cols in 3usize..10,
        alphabet in 3u8..8,
        min_run in 2usize..5,
    ) {
        let mut source = RandomSource::seeded(seed);
        let grid = Grid::initialize(rows, cols, alphabet, min_run, &mut source).unwrap();
        prop_assert_eq!(grid.count_filled(), rows * cols);
        prop_assert!(find_runs(&grid, min_run).is_empty());
    }

    #[test]
    fn two_values_with_runs_of_two_always_initialize(
        seed in any::<u64>(),
        rows in 1usize..12,
        cols in 1usize..12,
    ) {
        let grid = Grid::initialize(rows, cols, 2, 2, &mut RandomSource::seeded(seed)).unwrap();
        prop_assert!(find_runs(&grid, 2).is_empty());
    }

    #[test]
    fn committed_swap_leaves_stable_grid(
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut engine = crush(seed, 8, 8, 5);
        let swaps = find_scoring_swaps(engine.grid(), 3);
        prop_assume!(!swaps.is_empty());
        let (a, b) = swaps[pick.index(swaps.len())];

        let outcome = engine.request_swap(a, b).unwrap();
        prop_assert!(outcome.committed);
        prop_assert!(outcome.score_delta() >= 30);
        prop_assert_eq!(engine.score(), outcome.score_delta());
        prop_assert_eq!(engine.chain(), 0);
        prop_assert!(find_runs(engine.grid(), 3).is_empty());
        prop_assert_eq!(engine.grid().count_filled(), 64);

        let depths: Vec<u32> = outcome.resolution.steps.iter().map(|s| s.depth).collect();
        let expected: Vec<u32> = (1..=depths.len() as u32).collect();
        prop_assert_eq!(depths, expected);
    }

    #[test]
    fn non_adjacent_swap_is_rejected_without_change(
        seed in any::<u64>(),
        a in (0usize..8, 0usize..8),
        b in (0usize..8, 0usize..8),
    ) {
        prop_assume!(!are_adjacent(a, b));
        let mut engine = crush(seed, 8, 8, 6);
        let before = engine.grid().clone();
        let err = engine.request_swap(a, b).unwrap_err();
        prop_assert!(err.is_rejection());
        prop_assert_eq!(engine.grid(), &before);
        prop_assert_eq!(engine.score(), 0);
    }

    #[test]
    fn failed_swap_restores_grid_exactly(
        seed in any::<u64>(),
        r in 0usize..8,
        c in 0usize..7,
        vertical in any::<bool>(),
    ) {
        let mut engine = crush(seed, 8, 8, 6);
        let before = engine.grid().clone();
        let (a, b) = if vertical { ((c, r), (c + 1, r)) } else { ((r, c), (r, c + 1)) };

        let outcome = engine.request_swap(a, b).unwrap();
        if !outcome.committed {
            prop_assert_eq!(engine.grid(), &before);
            prop_assert!(outcome.resolution.is_empty());
            prop_assert_eq!(engine.score(), 0);
            prop_assert_eq!(engine.moves(), 0);
        } else {
            prop_assert!(engine.score() > 0);
        }
    }

    #[test]
    fn collapse_keeps_order_of_remaining_values(
        column in prop::collection::vec(prop::option::of(0u8..6), 1..12),
        refill in prop::collection::vec(0usize..6, 1..4),
    ) {
        let rows = column.len();
        let cells: Vec<Cell> = column
            .iter()
            .map(|v| v.map_or(Cell::Empty, Cell::Value))
            .collect();
        let mut grid = Grid::from_cells(rows, 1, 6, cells).unwrap();
        let survivors: Vec<u8> = column.iter().flatten().copied().collect();

        let refilled = grid.collapse_column(0, &mut SequenceSource::new(refill)).unwrap();
        prop_assert_eq!(refilled, rows - survivors.len());
        let after = grid.column(0).unwrap();
        prop_assert!(after.iter().all(|cell| !cell.is_empty()));
        let bottom: Vec<u8> = after[refilled..].iter().filter_map(|cell| cell.value()).collect();
        prop_assert_eq!(bottom, survivors);
    }

    #[test]
    fn smash_either_removes_a_group_or_changes_nothing(
        seed in any::<u64>(),
        r in 0usize..8,
        c in 0usize..8,
    ) {
        let mut engine = Engine::new(EngineConfig::smash().with_seed(seed)).unwrap();
        let before = engine.grid().clone();
        match engine.request_smash(r, c) {
            Ok(outcome) => {
                prop_assert!(outcome.removed_count() >= 2);
                prop_assert!(outcome.value <= 1);
                let value = u64::from(outcome.value);
                prop_assert_eq!(outcome.score_delta, outcome.removed_count() as u64 * (value + 1));
                prop_assert_eq!(engine.grid().count_filled(), 64);
            }
            Err(err) => {
                prop_assert!(err.is_empty_match());
                prop_assert_eq!(engine.grid(), &before);
            }
        }
    }
}
