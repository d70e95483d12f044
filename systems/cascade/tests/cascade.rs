use proptest::prelude::*;
use tileshift_core::{
    BoardConfig, CellCoord, ConfigError, Direction, Event, GoalTracker, Grid, MoveRequest,
    NoGoals, RejectReason, Tile, TileId, TileKind,
};
use tileshift_system_cascade::{Board, BoardError, Phase};
use tileshift_system_goals::{Goal, LevelGoals};
use tileshift_system_matching::Matching;

/// Builds a grid from rows written top row first; `.` marks an empty cell and
/// `A`, `B`, ... map to kinds 0, 1, ...
fn grid_from_rows(rows: &[&str]) -> Grid {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |row| row.len()) as u32;
    let mut grid = Grid::new(width, height);
    let mut next_id = 0;

    for (offset, row) in rows.iter().enumerate() {
        let row_index = height - 1 - offset as u32;
        for (column, symbol) in row.bytes().enumerate() {
            if symbol == b'.' {
                continue;
            }
            grid.set(
                CellCoord::new(column as u32, row_index),
                Some(Tile::new(TileId::new(next_id), TileKind::new(symbol - b'A'))),
            );
            next_id += 1;
        }
    }
    grid
}

fn config(width: u32, height: u32, kinds: &[&str]) -> BoardConfig {
    BoardConfig {
        width,
        height,
        tile_types: kinds.iter().map(|kind| (*kind).to_owned()).collect(),
        ..BoardConfig::default()
    }
}

/// Bottom row already matches; rotating the top row changes nothing else.
fn preset_rows() -> [&'static str; 3] {
    [
        "BCD", //
        "CDB", //
        "AAA", //
    ]
}

fn top_row_right() -> MoveRequest {
    MoveRequest::new(Direction::Right, CellCoord::new(0, 2))
}

#[test]
fn initial_board_is_full_and_spawned_in_place() {
    let mut events = Vec::new();
    let board = Board::new(&config(6, 5, &["a", "b", "c", "d"]), &mut events)
        .expect("valid configuration");

    assert!(board.grid().is_full());
    assert!(board.is_interactable());
    assert_eq!(events.len(), 30);
    assert!(events.iter().all(|event| matches!(
        event,
        Event::TileSpawned { from, to, .. } if from == to
    )));
}

proptest! {
    #[test]
    fn initial_board_never_contains_matches(
        width in 3_u32..9,
        height in 3_u32..9,
        kinds in 3_usize..7,
        seed in any::<u64>(),
    ) {
        let names: Vec<String> = (0..kinds).map(|index| format!("kind{index}")).collect();
        let config = BoardConfig {
            width,
            height,
            tile_types: names,
            seed,
            ..BoardConfig::default()
        };
        let mut events = Vec::new();
        let board = Board::new(&config, &mut events).expect("valid configuration");

        prop_assert!(board.grid().is_full());
        prop_assert!(!Matching::default().has_matches(board.grid()));
        prop_assert!(!events.contains(&Event::BoardReset));
    }
}

#[test]
fn invalid_configuration_creates_nothing() {
    let mut events = Vec::new();
    let result = Board::new(&config(0, 4, &["a", "b", "c"]), &mut events);

    assert_eq!(
        result.err(),
        Some(BoardError::Config(ConfigError::ZeroDimension {
            width: 0,
            height: 4
        }))
    );
    assert!(events.is_empty());
}

#[test]
fn preset_grid_must_fit_configuration() {
    let grid = grid_from_rows(&["AB", "BA"]);
    let result = Board::with_grid(&config(3, 3, &["a", "b"]), grid, NoGoals);
    assert!(matches!(result, Err(BoardError::GridMismatch { width: 3, .. })));

    let grid = grid_from_rows(&["AB", "BE"]);
    let result = Board::with_grid(&config(2, 2, &["a", "b"]), grid, NoGoals);
    assert!(matches!(
        result,
        Err(BoardError::UnknownKind {
            kind: 4,
            catalog_len: 2
        })
    ));
}

#[test]
fn single_kind_chain_reaction_stops_at_cap() {
    let config = BoardConfig {
        cascade_cap: 4,
        initial_fill_attempts: 2,
        ..config(3, 3, &["stone"])
    };
    let mut events = Vec::new();
    let mut board = Board::new(&config, &mut events).expect("valid configuration");
    assert_eq!(
        events
            .iter()
            .filter(|event| **event == Event::BoardReset)
            .count(),
        2,
        "every re-roll is spent on a board that cannot avoid matches",
    );

    events.clear();
    let request = MoveRequest::new(Direction::Up, CellCoord::new(1, 0));
    let phase = board.submit_move(request, &mut events);

    assert_eq!(phase, Phase::Idle);
    assert!(board.is_interactable());
    assert_eq!(board.cascades(), 4);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::MatchesFound { .. }))
            .count(),
        4
    );
    assert_eq!(
        events[events.len() - 2..],
        [
            Event::CascadeLimitReached { cascades: 4 },
            Event::BoardSettled { cascades: 4 },
        ]
    );
    assert!(board.grid().is_full());
}

#[test]
fn completed_goal_keeps_cleared_cells_empty() {
    let grid = grid_from_rows(&preset_rows());
    let goals = LevelGoals::new(vec![Goal::new(TileKind::new(0), 3)]);
    let mut board =
        Board::with_grid(&config(3, 3, &["a", "b", "c", "d"]), grid, goals).expect("valid preset");

    let mut events = Vec::new();
    let phase = board.submit_move(top_row_right(), &mut events);

    assert_eq!(phase, Phase::LevelComplete);
    assert!(board.goals().is_level_complete());
    assert!(!board.is_interactable());
    for column in 0..3 {
        assert_eq!(board.grid().get(CellCoord::new(column, 0)), None);
    }
    assert_eq!(board.grid().tile_count(), 6);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::TilesCollapsed { .. } | Event::TileSpawned { .. })));
    assert_eq!(events.last(), Some(&Event::LevelCompleted { cascades: 1 }));

    events.clear();
    assert_eq!(board.submit_move(top_row_right(), &mut events), Phase::LevelComplete);
    assert_eq!(
        events,
        [Event::MoveRejected {
            request: top_row_right(),
            reason: RejectReason::LevelComplete,
        }]
    );
}

#[test]
fn step_mode_commits_one_stage_per_call() {
    let grid = grid_from_rows(&preset_rows());
    let config = config(3, 3, &["a", "b", "c", "d"]);
    let mut board = Board::with_grid(&config, grid, NoGoals).expect("valid preset");
    let mut events = Vec::new();

    assert!(board.begin_move(top_row_right(), &mut events));
    assert!(board.is_busy());
    assert!(events.is_empty(), "nothing changes before the first step");

    assert_eq!(board.step(&mut events), Phase::Resolving);
    assert!(matches!(
        events.as_slice(),
        [Event::LineRotated {
            direction: Direction::Right,
            ..
        }]
    ));

    events.clear();
    assert!(!board.begin_move(top_row_right(), &mut events));
    assert_eq!(
        events,
        [Event::MoveRejected {
            request: top_row_right(),
            reason: RejectReason::Busy,
        }]
    );

    events.clear();
    assert_eq!(board.step(&mut events), Phase::Resolving);
    assert_eq!(
        events,
        [Event::MatchesFound {
            cascade: 1,
            cells: vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0)
            ],
        }]
    );

    events.clear();
    assert_eq!(board.step(&mut events), Phase::Resolving);
    match events.as_slice() {
        [Event::TilesCleared { tiles }] => {
            assert_eq!(tiles.len(), 3);
            assert!(tiles.iter().all(|tile| tile.kind == TileKind::new(0)));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    events.clear();
    assert_eq!(board.step(&mut events), Phase::Resolving);
    match events.as_slice() {
        [Event::TilesCollapsed { moves }] => assert_eq!(moves.len(), 6),
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(board.grid().tile_count(), 6);

    events.clear();
    assert_eq!(board.step(&mut events), Phase::Resolving);
    assert_eq!(events.len(), 3);
    for event in &events {
        match event {
            Event::TileSpawned { from, to, .. } => {
                assert_eq!(to.row(), 2);
                assert_eq!(*from, CellCoord::new(to.column(), 3));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert!(board.grid().is_full());

    events.clear();
    while board.step(&mut events) == Phase::Resolving {}
    assert!(board.is_interactable());
    assert!(matches!(events.last(), Some(Event::BoardSettled { .. })));
}

#[test]
fn stepping_an_idle_board_does_nothing() {
    let mut events = Vec::new();
    let mut board =
        Board::new(&config(4, 4, &["a", "b", "c"]), &mut events).expect("valid configuration");
    events.clear();

    assert_eq!(board.step(&mut events), Phase::Idle);
    assert!(events.is_empty());
}

#[test]
fn missing_tracker_never_completes_the_level() {
    let grid = grid_from_rows(&preset_rows());
    let mut board = Board::with_grid(
        &config(3, 3, &["a", "b", "c", "d"]),
        grid,
        None::<LevelGoals>,
    )
    .expect("valid preset");
    let mut events = Vec::new();

    let phase = board.submit_move(top_row_right(), &mut events);

    assert_eq!(phase, Phase::Idle);
    assert!(board.cascades() >= 1);
    assert!(board.grid().is_full());
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::LevelCompleted { .. })));
}

#[test]
fn unmatched_move_settles_without_cascades() {
    let grid = grid_from_rows(&["ABC", "BCA", "CAB"]);
    let mut board =
        Board::with_grid(&config(3, 3, &["a", "b", "c"]), grid, NoGoals).expect("valid preset");
    let mut events = Vec::new();

    let request = MoveRequest::new(Direction::Left, CellCoord::new(2, 1));
    let phase = board.submit_move(request, &mut events);

    assert_eq!(phase, Phase::Idle);
    assert_eq!(board.cascades(), 0);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], Event::BoardSettled { cascades: 0 });
}

#[test]
fn boards_can_move_between_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<Board>();
    assert_send::<Board<LevelGoals>>();
}

#[test]
fn already_complete_goals_reject_moves() {
    let grid = grid_from_rows(&["ABC", "BCA", "CAB"]);
    let goals = LevelGoals::new(vec![Goal::new(TileKind::new(0), 0)]);
    let mut board =
        Board::with_grid(&config(3, 3, &["a", "b", "c"]), grid, goals).expect("valid preset");
    let before = board.grid().clone();

    assert_eq!(board.phase(), Phase::LevelComplete);
    assert!(!board.is_interactable());

    let mut events = Vec::new();
    let request = MoveRequest::new(Direction::Left, CellCoord::new(0, 1));
    assert_eq!(board.submit_move(request, &mut events), Phase::LevelComplete);
    assert_eq!(
        events,
        [Event::MoveRejected {
            request,
            reason: RejectReason::LevelComplete,
        }]
    );
    assert_eq!(board.grid(), &before);
}

/// Records every tally the board reports.
#[derive(Debug, Default)]
struct RecordingGoals {
    reports: Vec<(TileKind, u32)>,
}

impl GoalTracker for RecordingGoals {
    fn report_match(&mut self, kind: TileKind, count: u32) {
        self.reports.push((kind, count));
    }

    fn is_level_complete(&self) -> bool {
        false
    }
}

#[test]
fn each_batch_reports_per_kind_tallies_in_kind_order() {
    // Clearing rows 0 and 2 drops the three D tiles of column 0 onto each other.
    let grid = grid_from_rows(&[
        "DCA", //
        "DAC", //
        "BBB", //
        "DCA", //
        "AAA", //
    ]);
    let config = config(3, 5, &["a", "b", "c", "d"]);
    let mut board =
        Board::with_grid(&config, grid, RecordingGoals::default()).expect("valid preset");
    let mut events = Vec::new();

    assert!(board.begin_move(
        MoveRequest::new(Direction::Right, CellCoord::new(0, 0)),
        &mut events
    ));
    // Rotate, then detect the first batch.
    let _ = board.step(&mut events);
    let _ = board.step(&mut events);
    assert_eq!(
        board.goals().reports,
        [(TileKind::new(0), 3), (TileKind::new(1), 3)]
    );

    // Clear, collapse, refill, then detect the cascade.
    for _ in 0..4 {
        assert_eq!(board.step(&mut events), Phase::Resolving);
    }
    assert_eq!(board.cascades(), 2);
    assert_eq!(
        board.goals().reports,
        [
            (TileKind::new(0), 3),
            (TileKind::new(1), 3),
            (TileKind::new(3), 3)
        ]
    );
}
