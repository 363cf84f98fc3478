// Tests for the replay module
//
// Covers:
// - Loading JSONL decision logs
// - Validating expected actions
// - Replaying a freshly recorded game and getting the same decisions back

use quoridor_engine::board::BoardState;
use quoridor_engine::config::Config;
use quoridor_engine::debug_logger::DecisionLogEntry;
use quoridor_engine::replay::{notation, parse_action, ReplayEngine};
use quoridor_engine::search::{SearchMode, SearchSession};
use quoridor_engine::types::{Action, Coord, GameState, Orientation, PlayerState, Side, WallPlacement};
use std::io::Write;
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn opening_game(game_id: &str, inventory: [u8; 3]) -> GameState {
    GameState {
        game_id: game_id.to_string(),
        turn: 0,
        to_move: Side::One,
        players: Side::both()
            .into_iter()
            .map(|side| PlayerState {
                side,
                position: side.start_position(),
                walls: inventory,
            })
            .collect(),
        walls: Vec::new(),
    }
}

/// Applies an action to the wire snapshot the way a game server would
fn advance(game: &mut GameState, action: &Action) {
    let side = game.to_move;
    let player = game
        .players
        .iter_mut()
        .find(|p| p.side == side)
        .expect("both sides are present");

    match action {
        Action::Move { x, y } => player.position = Coord::new(*x, *y),
        Action::Wall(wall) => {
            player.walls[wall.length as usize - 1] -= 1;
            game.walls.push(*wall);
        }
    }

    game.turn += 1;
    game.to_move = side.opponent();
}

#[test]
fn test_load_fixture_log() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);

    let entries = engine
        .load_log_file(fixture_path("opening.jsonl"))
        .expect("Failed to load opening.jsonl");

    assert_eq!(entries.len(), 3, "Blank lines are skipped");
    assert_eq!(entries[0].side, Side::One);
    assert_eq!(entries[1].side, Side::Two);
    assert_eq!(notation(&entries[0].decision.action), "4-1");
    assert_eq!(notation(&entries[1].decision.action), "h3@3-5");
    assert_eq!(entries[2].history, vec![Coord::new(4, 1)]);
    assert_eq!(entries[2].game.walls.len(), 1);
}

#[test]
fn test_fixture_snapshots_are_valid() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine.load_log_file(fixture_path("opening.jsonl")).unwrap();

    for entry in &entries {
        let state = BoardState::snapshot(&entry.game).expect("fixture snapshots are well formed");
        assert_eq!(state.token(entry.side), entry.game.player(entry.side).unwrap().position);
    }

    let state = BoardState::snapshot(&entries[2].game).unwrap();
    assert!(state.horizontal_blocked(4, 5));
    assert_eq!(state.walls_remaining(Side::Two), 9);
}

#[test]
fn test_replay_turns_reports_missing_turn() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine.load_log_file(fixture_path("opening.jsonl")).unwrap();

    let results = engine.replay_turns(&entries, &[0, 2]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].turn, 0);
    assert_eq!(results[1].turn, 2);

    assert!(engine.replay_turns(&entries, &[7]).is_err());
}

#[test]
fn test_validate_expected_actions() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine.load_log_file(fixture_path("opening.jsonl")).unwrap();

    let expected = vec![
        (0, vec![parse_action("4-1").unwrap()]),
        (
            1,
            vec![
                parse_action("4-7").unwrap(),
                Action::Wall(WallPlacement::new(3, 5, 3, Orientation::Horizontal)),
            ],
        ),
    ];
    assert!(engine.validate_expected_actions(&entries, &expected).is_ok());

    let wrong = vec![(2, vec![parse_action("3-1").unwrap()])];
    let err = engine.validate_expected_actions(&entries, &wrong).unwrap_err();
    assert!(err.contains("Turn 2"));
    assert!(err.contains("4-2"));
}

#[test]
fn test_missing_log_file_is_an_error() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    assert!(engine.load_log_file(fixture_path("does_not_exist.jsonl")).is_err());
}

/// Records a short game, writes it as JSONL and replays it: every turn matches
#[test]
fn test_recorded_game_replays_identically() {
    let mut config = Config::default_hardcoded();
    config.search.depth = 1;

    let mut game = opening_game("replay-round-trip", config.game_rules.wall_inventory);
    let mut session = SearchSession::new(config.move_ordering.history_capacity);
    let mut lines = Vec::new();

    for _ in 0..8 {
        let side = game.to_move;
        let state = BoardState::snapshot(&game).unwrap();
        let history = session.history(side).to_vec();
        let decision = session.decide(&state, side, &config, SearchMode::ParallelRoot);
        let action = decision.action.expect("opening positions always have a move");

        let entry = DecisionLogEntry {
            turn: game.turn,
            side,
            game: game.clone(),
            history,
            decision,
            timestamp: "2026-03-02T10:15:00+00:00".to_string(),
        };
        lines.push(serde_json::to_string(&entry).unwrap());

        advance(&mut game, &action);
    }

    let path = std::env::temp_dir().join(format!("quoridor_replay_{}.jsonl", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        for line in &lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(entries.len(), 8);

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 8);
    for result in &results {
        assert!(
            result.matches,
            "turn {}: logged {} replayed {}",
            result.turn,
            notation(&result.original_action),
            notation(&result.replayed_action)
        );
        assert_eq!(result.original_score, result.replayed_score);
    }

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.matches, 8);
    assert_eq!(stats.mismatches, 0);
}
