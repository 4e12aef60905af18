use match3_engine::config::EngineConfig;
use match3_engine::grid::{Direction, Grid, Layout, PieceId, Position};
use match3_engine::hints::{find_swaps, Swap};
use match3_engine::matcher::scan_board;
use match3_engine::motion::{InstantMoves, MoveLog, MoveSink, TimedMoves};
use match3_engine::scoreboard::{Scoreboard, TurnObserver};
use match3_engine::source::{PieceSource, RandomPieces, SequencePieces};
use match3_engine::turn::{SelectionOutcome, TurnController};
use match3_engine::utils::grid_from_str_array;
use std::thread;
use std::time::Duration;

fn seeded<M: MoveSink>(seed: u64, sink: M) -> TurnController<RandomPieces, Scoreboard, M> {
    let config = EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    };
    let layout = Layout::with_blocked(6, 8, &[Position::new(0, 0), Position::new(5, 7)]).unwrap();
    TurnController::from_config(&config, layout, sink).unwrap()
}

fn occupants(grid: &Grid) -> Vec<(Position, Option<PieceId>)> {
    grid.positions().map(|p| (p, grid.occupant(p))).collect()
}

fn assert_settled_board(grid: &Grid) {
    for pos in grid.positions() {
        if !grid.is_usable(pos) {
            assert!(grid.occupant(pos).is_none(), "unusable {} is occupied", pos);
            continue;
        }
        let piece = grid
            .occupant_piece(pos)
            .unwrap_or_else(|| panic!("usable {} left empty\n{}", pos, grid));
        assert_eq!(piece.position, pos);
        assert!(!piece.matched);
    }
    assert!(
        scan_board(&mut grid.clone()).is_empty(),
        "cascade stopped with a match\n{}",
        grid
    );
}

fn play<S, M>(turn: &mut TurnController<S, Scoreboard, M>, swap: Swap) -> bool
where
    S: PieceSource,
    M: MoveSink,
{
    assert_eq!(turn.select_at(swap.from), SelectionOutcome::Selected);
    assert_eq!(turn.select_at(swap.to), SelectionOutcome::Swapped);
    turn.resolve_pending().kept
}

#[test]
fn initialized_boards_never_start_with_a_match() {
    for seed in 0..30 {
        let mut turn = seeded(seed, InstantMoves);
        assert!(!turn.board_has_match(), "seed {}", seed);
        assert_eq!(turn.grid().piece_count(), 46);
        assert_settled_board(turn.grid());
    }
}

#[test]
fn swaps_without_a_match_restore_the_board() {
    for seed in 0..20 {
        let mut turn = seeded(seed, MoveLog::new());
        let winning = find_swaps(turn.grid());

        let losing: Vec<Swap> = turn
            .grid()
            .positions()
            .flat_map(|from| [Direction::Right, Direction::Up].map(|d| (from, d)))
            .filter_map(|(from, d)| {
                let grid = turn.grid();
                let to = grid.neighbor(from, d)?;
                grid.occupant(from)?;
                grid.occupant(to)?;
                Some(Swap { from, to })
            })
            .filter(|swap| !winning.contains(swap))
            .take(6)
            .collect();
        assert!(!losing.is_empty());

        for &swap in &losing {
            let before = occupants(turn.grid());
            assert!(!play(&mut turn, swap), "seed {} {:?}", seed, swap);
            assert!(!turn.is_processing());
            assert_eq!(occupants(turn.grid()), before);
        }
        assert_eq!(turn.observer().points(), 0);
        assert_eq!(turn.observer().moves(), 0);
        // Every rejected swap hints the exchange and the exchange back.
        assert_eq!(turn.sink().hints().len(), losing.len() * 4);
    }
}

#[test]
fn hinted_swaps_play_out_to_a_settled_board() {
    for seed in 0..20 {
        let mut turn = seeded(seed, InstantMoves);
        let mut removed = 0;
        let mut kept = 0;

        for _ in 0..25 {
            let Some(&swap) = find_swaps(turn.grid()).first() else {
                break;
            };
            assert!(play(&mut turn, swap), "seed {} {:?}", seed, swap);
            let summary = turn.summary();
            assert!(summary.waves >= 1);
            assert!(summary.removed >= 3);
            removed += summary.removed;
            kept += 1;

            assert!(!turn.is_processing());
            assert_settled_board(turn.grid());
            assert_eq!(turn.grid().piece_count(), 46);
        }

        assert_eq!(turn.observer().points() as usize, removed);
        assert_eq!(turn.observer().moves(), kept);
    }
}

#[test]
fn swaps_after_the_move_limit_are_reverted() {
    let config = EngineConfig {
        seed: Some(3),
        move_limit: Some(2),
        ..EngineConfig::default()
    };
    let layout = Layout::new(config.width, config.height).unwrap();
    let mut turn = TurnController::from_config(&config, layout, InstantMoves).unwrap();

    for _ in 0..2 {
        let swap = find_swaps(turn.grid())[0];
        assert!(play(&mut turn, swap));
    }
    assert!(turn.observer().game_ended());

    let points = turn.observer().points();
    if let Some(&swap) = find_swaps(turn.grid()).first() {
        assert!(!play(&mut turn, swap));
    }
    assert_eq!(turn.observer().points(), points);
    assert_eq!(turn.observer().moves(), 2);
}

#[test]
fn timed_moves_park_each_wave_until_settled() {
    let mut turn = seeded(5, TimedMoves::new(Duration::from_millis(15)));
    let swap = find_swaps(turn.grid())[0];
    turn.select_at(swap.from);
    assert_eq!(turn.select_at(swap.to), SelectionOutcome::Swapped);

    assert!(!turn.advance());
    assert_eq!(turn.select_at(swap.from), SelectionOutcome::Ignored);

    let mut steps = 0;
    while turn.is_processing() {
        thread::sleep(turn.sink().remaining());
        assert!(turn.advance());
        steps += 1;
    }
    let summary = turn.summary();
    assert!(summary.kept);
    // One step per wave plus the final quiet check.
    assert_eq!(steps, summary.waves + 1);
    assert_settled_board(turn.grid());
}

const BLOCKED_CORNER: [&str; 8] = [
    "GBGBGB", //
    "BGBGBG", //
    "GBGBGB", //
    "BGBGBG", //
    "GBGBGB", //
    "BGBGBG", //
    "GBGBGB", //
    "#RRBRG", //
];

#[test]
fn blocked_corner_is_never_part_of_a_match() {
    let mut turn = TurnController::new(
        grid_from_str_array(&BLOCKED_CORNER).unwrap(),
        SequencePieces::parse("OPY").unwrap(),
        Scoreboard::new(None, None),
        MoveLog::new(),
    );
    assert!(!turn.board_has_match());
    let swap = Swap {
        from: Position::new(3, 0),
        to: Position::new(4, 0),
    };
    assert!(find_swaps(turn.grid()).contains(&swap));

    assert!(play(&mut turn, swap));

    let summary = turn.summary();
    assert_eq!((summary.waves, summary.removed), (1, 3));
    assert_eq!(
        turn.grid().to_rows(),
        vec![
            "GOPYGB", //
            "BBGBBG", //
            "GGBGGB", //
            "BBGBBG", //
            "GGBGGB", //
            "BBGBBG", //
            "GGBGGB", //
            "#BGBBG", //
        ]
    );
    assert!(!turn.grid().is_usable(Position::new(0, 0)));
    assert!(turn.grid().occupant(Position::new(0, 0)).is_none());

    // Two swap hints, then seven falls and one spawn in each emptied column.
    let hints = turn.sink().hints();
    assert_eq!(hints.len(), 2 + 3 * (7 + 1));
    let spawns: Vec<((isize, isize), Position)> = hints
        .iter()
        .filter(|h| h.from.1 >= 8)
        .map(|h| (h.from, h.to))
        .collect();
    assert_eq!(
        spawns,
        vec![
            ((1, 8), Position::new(1, 7)),
            ((2, 8), Position::new(2, 7)),
            ((3, 8), Position::new(3, 7)),
        ]
    );
}

#[test]
fn blocked_corner_run_reports_only_usable_cells() {
    let mut rows = BLOCKED_CORNER;
    rows[7] = "#RRRBG";
    let mut turn = TurnController::new(
        grid_from_str_array(&rows).unwrap(),
        SequencePieces::parse("O").unwrap(),
        Scoreboard::new(None, None),
        InstantMoves,
    );
    assert!(turn.board_has_match());

    let mut matched: Vec<Position> = turn
        .pending()
        .iter()
        .map(|&id| turn.grid().piece(id).position)
        .collect();
    matched.sort_by_key(|p| (p.y, p.x));
    assert_eq!(
        matched,
        vec![Position::new(1, 0), Position::new(2, 0), Position::new(3, 0)]
    );
}
