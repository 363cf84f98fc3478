//! Path Solver Tests
//!
//! Shortest-path properties on empty and walled boards.

use quoridor_engine::board::BoardState;
use quoridor_engine::pathfinding::{blocks_either_player, path_length, shortest_path, PathLength};
use quoridor_engine::position_gen::random_position;
use quoridor_engine::types::{Coord, Direction, Orientation, Side, WallPlacement};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// On an empty board the shortest path is exactly the row distance
#[test]
fn test_empty_board_length_is_row_distance() {
    for x in 0..9 {
        for y in 0..9 {
            let one = Coord::new(x, y);
            // Keep the other token out of the way; tokens never block paths anyway
            let two = if one == Coord::new(0, 0) { Coord::new(8, 8) } else { Coord::new(0, 0) };
            let state = BoardState::with_tokens(one, two, [[0; 3]; 2]);

            assert_eq!(
                path_length(&state, Side::One),
                PathLength::Reachable((8 - y) as u32),
                "side One from {}",
                one
            );
            assert_eq!(
                path_length(&state, Side::Two),
                PathLength::Reachable(two.y as u32)
            );
        }
    }
}

/// Side Two from every tile of an empty board
#[test]
fn test_empty_board_side_two() {
    for y in 0..9 {
        let state = BoardState::with_tokens(Coord::new(0, 0), Coord::new(5, y), [[0; 3]; 2]);
        let result = shortest_path(&state, Side::Two);
        assert_eq!(result.length, PathLength::Reachable(y as u32));
        assert_eq!(result.path.len(), y as usize + 1);
    }
}

/// Solver answers for either side regardless of whose turn it is
#[test]
fn test_solver_is_pure() {
    let mut state = BoardState::new_game([3, 4, 3]);
    state.apply_wall(Side::Two, &WallPlacement::new(3, 0, 3, Orientation::Horizontal));
    let before = state;

    let a = shortest_path(&state, Side::One);
    let b = shortest_path(&state, Side::One);
    assert_eq!(a, b);
    assert_eq!(state, before);
}

/// Routes on random reachable positions are made of single unblocked steps
#[test]
fn test_random_positions_paths_are_valid() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..25 {
        let (state, _) = random_position(&mut rng, 30, [3, 4, 3], 0.5);
        assert!(!blocks_either_player(&state));

        for side in Side::both() {
            let result = shortest_path(&state, side);
            let steps = result.length.steps().expect("legal positions keep a path");

            assert_eq!(result.path.len(), steps as usize + 1);
            assert_eq!(result.path[0], state.token(side));
            assert_eq!(result.path.last().unwrap().y, side.goal_row());
            assert!(steps as i32 >= side.rows_to_goal(state.token(side)));

            for pair in result.path.windows(2) {
                let dir = Direction::all()
                    .into_iter()
                    .find(|d| d.apply(&pair[0]) == pair[1])
                    .expect("consecutive tiles are neighbours");
                assert!(!state.is_edge_blocked(pair[0], dir));
            }
        }
    }
}

/// A full horizontal barrier seals both sides
#[test]
fn test_full_barrier_is_unreachable() {
    let mut state = BoardState::new_game([0, 0, 0]);
    state.mark_segments(&WallPlacement::new(0, 4, 3, Orientation::Horizontal));
    state.mark_segments(&WallPlacement::new(3, 4, 3, Orientation::Horizontal));
    state.mark_segments(&WallPlacement::new(6, 4, 3, Orientation::Horizontal));

    assert_eq!(path_length(&state, Side::One), PathLength::Unreachable);
    assert_eq!(path_length(&state, Side::Two), PathLength::Unreachable);
    assert!(blocks_either_player(&state));
}
