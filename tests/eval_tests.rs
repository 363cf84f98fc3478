//! Evaluation Tests
//!
//! Sign agreement between the two sides' views of the same board.

use quoridor_engine::board::BoardState;
use quoridor_engine::config::Config;
use quoridor_engine::eval::{evaluate, evaluate_breakdown};
use quoridor_engine::pathfinding::blocks_either_player;
use quoridor_engine::position_gen::random_position;
use quoridor_engine::types::{Coord, Orientation, Side, WallPlacement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The same wall after a half turn of the board
fn rotate_wall(wall: &WallPlacement) -> WallPlacement {
    let len = wall.length as i32;
    match wall.orientation {
        Orientation::Horizontal => {
            WallPlacement::new(9 - wall.x - len, 7 - wall.y, wall.length, wall.orientation)
        }
        Orientation::Vertical => {
            WallPlacement::new(7 - wall.x, 9 - wall.y - len, wall.length, wall.orientation)
        }
    }
}

fn rotate(coord: Coord) -> Coord {
    Coord::new(8 - coord.x, 8 - coord.y)
}

/// Builds a board that looks the same after a half turn with sides swapped
fn symmetric_state(rng: &mut StdRng, walls: usize) -> BoardState {
    let one = loop {
        let c = Coord::new(rng.random_range(0..9), rng.random_range(1..8));
        if c != rotate(c) {
            break c;
        }
    };
    let mut state = BoardState::with_tokens(one, rotate(one), [[1, 2, 1]; 2]);

    for _ in 0..walls {
        let length = rng.random_range(1..=3u8);
        let orientation = if rng.random_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let anchors: Vec<WallPlacement> = BoardState::wall_anchors(length, orientation).collect();
        let wall = anchors[rng.random_range(0..anchors.len())];
        let mirror = rotate_wall(&wall);

        let mut next = state;
        next.mark_segments(&wall);
        next.mark_segments(&mirror);
        if !blocks_either_player(&next) {
            state = next;
        }
    }

    state
}

fn assert_rotation_symmetric(state: &BoardState) {
    assert_eq!(state.token(Side::Two), rotate(state.token(Side::One)));
    for y in 0..8 {
        for x in 0..9 {
            assert_eq!(state.horizontal_blocked(x, y), state.horizontal_blocked(8 - x, 7 - y));
        }
    }
    for y in 0..9 {
        for x in 0..8 {
            assert_eq!(state.vertical_blocked(x, y), state.vertical_blocked(7 - x, 8 - y));
        }
    }
}

#[test]
fn test_rotated_wall_covers_mirrored_edges() {
    let wall = WallPlacement::new(1, 2, 3, Orientation::Horizontal);
    assert_eq!(rotate_wall(&wall), WallPlacement::new(5, 5, 3, Orientation::Horizontal));
    assert_eq!(rotate_wall(&rotate_wall(&wall)), wall);

    let wall = WallPlacement::new(0, 0, 2, Orientation::Vertical);
    assert_eq!(rotate_wall(&wall), WallPlacement::new(7, 7, 2, Orientation::Vertical));
}

#[test]
fn test_symmetric_states_have_opposite_views() {
    let scores = Config::default_hardcoded().scores;
    let mut rng = StdRng::seed_from_u64(5);

    for walls in 0..20 {
        let state = symmetric_state(&mut rng, walls % 7);
        assert_rotation_symmetric(&state);

        let one = evaluate(&state, Side::One, &scores);
        let two = evaluate(&state, Side::Two, &scores);
        assert_eq!(one, -two, "asymmetric views on\n{}", state);
    }
}

#[test]
fn test_symmetric_path_race_is_even() {
    let scores = Config::default_hardcoded().scores;
    let mut rng = StdRng::seed_from_u64(8);

    for _ in 0..10 {
        let state = symmetric_state(&mut rng, 4);
        let breakdown = evaluate_breakdown(&state, Side::One, &scores);
        assert_eq!(breakdown.terminal, 0);
        assert_eq!(breakdown.path_race, 0);
        assert_eq!(breakdown.wall_inventory, 0);
        assert_eq!(breakdown.goal_line_blocks, 0);
        assert_eq!(breakdown.goal_proximity, 0);
    }
}

#[test]
fn test_random_positions_have_opposite_views() {
    let scores = Config::default_hardcoded().scores;
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..30 {
        let (state, _) = random_position(&mut rng, 20, [3, 4, 3], 0.4);
        assert_eq!(
            evaluate(&state, Side::One, &scores),
            -evaluate(&state, Side::Two, &scores)
        );
    }
}

#[test]
fn test_winner_scores_win_score() {
    let scores = Config::default_hardcoded().scores;
    let state = BoardState::with_tokens(Coord::new(3, 8), Coord::new(4, 4), [[0; 3]; 2]);

    assert_eq!(evaluate(&state, Side::One, &scores), scores.win_score);
    assert_eq!(evaluate(&state, Side::Two, &scores), -scores.win_score);
}

#[test]
fn test_shorter_path_scores_higher() {
    let scores = Config::default_hardcoded().scores;
    let ahead = BoardState::with_tokens(Coord::new(2, 5), Coord::new(6, 7), [[1, 1, 1]; 2]);
    assert!(evaluate(&ahead, Side::One, &scores) > 0);
    assert!(evaluate(&ahead, Side::Two, &scores) < 0);
}
