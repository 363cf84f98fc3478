// Path solver
//
// A* from a token to its goal row over the 4-connected grid, skipping blocked
// edges. Tokens never block a path; only walls do.

use log::warn;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::board::BoardState;
use crate::types::{Coord, Direction, Side, TILE_COUNT};

/// Length of a side's shortest route to its goal row
///
/// `Unreachable` replaces the old "100 means no path" convention; callers
/// that need a number go through `cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathLength {
    Reachable(u32),
    Unreachable,
}

impl PathLength {
    pub fn is_reachable(&self) -> bool {
        matches!(self, PathLength::Reachable(_))
    }

    /// Standing on the goal row already
    pub fn is_goal(&self) -> bool {
        matches!(self, PathLength::Reachable(0))
    }

    pub fn steps(&self) -> Option<u32> {
        match self {
            PathLength::Reachable(n) => Some(*n),
            PathLength::Unreachable => None,
        }
    }

    /// Numeric cost with unreachable mapped past any real path on the board
    pub fn cost(&self) -> i32 {
        match self {
            PathLength::Reachable(n) => *n as i32,
            PathLength::Unreachable => TILE_COUNT as i32,
        }
    }
}

/// Result of a full shortest-path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPath {
    pub length: PathLength,
    /// Start tile first, goal tile last; empty when unreachable
    pub path: Vec<Coord>,
}

/// Shortest path from `side`'s token to its goal row, with the route
pub fn shortest_path(state: &BoardState, side: Side) -> ShortestPath {
    astar(state, side, true)
}

/// Shortest path length only; skips route reconstruction
pub fn path_length(state: &BoardState, side: Side) -> PathLength {
    astar(state, side, false).length
}

/// True iff either side has no route left to its goal row
///
/// This is the wall legality gate: a placement that makes this true is illegal
/// no matter who places it.
pub fn blocks_either_player(state: &BoardState) -> bool {
    Side::both()
        .iter()
        .any(|&side| !path_length(state, side).is_reachable())
}

fn astar(state: &BoardState, side: Side, want_path: bool) -> ShortestPath {
    let start = state.token(side);
    if !start.in_bounds() {
        warn!("Side {} token {} is off the board; treating as unreachable", side, start);
        return ShortestPath {
            length: PathLength::Unreachable,
            path: Vec::new(),
        };
    }

    let goal_row = side.goal_row();
    // Each step changes the row by at most one, so the row gap never overestimates
    let heuristic = |c: Coord| (goal_row - c.y).unsigned_abs();

    let mut g_score = [u32::MAX; TILE_COUNT];
    let mut came_from = [usize::MAX; TILE_COUNT];
    let mut closed = [false; TILE_COUNT];
    let mut open = BinaryHeap::new();

    g_score[start.index()] = 0;
    open.push(Reverse((heuristic(start), 0u32, start.index())));

    while let Some(Reverse((_, g, idx))) = open.pop() {
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        let current = Coord::from_index(idx);
        if current.y == goal_row {
            let path = if want_path {
                reconstruct(&came_from, idx)
            } else {
                Vec::new()
            };
            return ShortestPath {
                length: PathLength::Reachable(g),
                path,
            };
        }

        for dir in Direction::all() {
            if state.is_edge_blocked(current, dir) {
                continue;
            }
            let next = dir.apply(&current);
            let next_idx = next.index();
            let tentative = g + 1;
            if !closed[next_idx] && tentative < g_score[next_idx] {
                g_score[next_idx] = tentative;
                came_from[next_idx] = idx;
                open.push(Reverse((tentative + heuristic(next), tentative, next_idx)));
            }
        }
    }

    ShortestPath {
        length: PathLength::Unreachable,
        path: Vec::new(),
    }
}

/// Walks parents back from the goal and reverses into start-to-goal order
fn reconstruct(came_from: &[usize; TILE_COUNT], goal_idx: usize) -> Vec<Coord> {
    let mut path = vec![Coord::from_index(goal_idx)];
    let mut idx = goal_idx;
    while came_from[idx] != usize::MAX {
        idx = came_from[idx];
        path.push(Coord::from_index(idx));
    }
    path.reverse();
    path
}

/// Tiles each side reaches first under simultaneous expansion from both tokens
///
/// Breadth-first from both tokens at once, side One seeded first; a tile
/// belongs to whichever frontier claims it first. Walls bound the expansion,
/// tokens do not.
pub fn territory(state: &BoardState) -> [i32; 2] {
    let mut owner: [Option<Side>; TILE_COUNT] = [None; TILE_COUNT];
    let mut queue = VecDeque::with_capacity(TILE_COUNT);
    let mut counts = [0i32; 2];

    for side in Side::both() {
        let pos = state.token(side);
        if !pos.in_bounds() || owner[pos.index()].is_some() {
            continue;
        }
        owner[pos.index()] = Some(side);
        counts[side.index()] += 1;
        queue.push_back((pos, side));
    }

    while let Some((pos, side)) = queue.pop_front() {
        for dir in Direction::all() {
            if state.is_edge_blocked(pos, dir) {
                continue;
            }
            let next = dir.apply(&pos);
            if owner[next.index()].is_none() {
                owner[next.index()] = Some(side);
                counts[side.index()] += 1;
                queue.push_back((next, side));
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Orientation, WallPlacement};

    #[test]
    fn test_goal_row_has_zero_length() {
        let state = BoardState::with_tokens(Coord::new(2, 8), Coord::new(6, 0), [[0; 3]; 2]);
        let one = shortest_path(&state, Side::One);
        assert_eq!(one.length, PathLength::Reachable(0));
        assert_eq!(one.path, vec![Coord::new(2, 8)]);
        assert!(path_length(&state, Side::Two).is_goal());
    }

    #[test]
    fn test_path_goes_around_a_wall() {
        let mut state = BoardState::with_tokens(Coord::new(4, 0), Coord::new(4, 8), [[0; 3]; 2]);
        state.mark_segments(&WallPlacement::new(3, 0, 3, Orientation::Horizontal));

        let result = shortest_path(&state, Side::One);
        // Two sideways steps to x=2 or x=6, then eight rows up
        assert_eq!(result.length, PathLength::Reachable(10));
        assert_eq!(result.path.len(), 11);
        assert_eq!(result.path[0], Coord::new(4, 0));
        assert_eq!(result.path.last().unwrap().y, 8);
        for pair in result.path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn test_sealed_token_is_unreachable() {
        let mut state = BoardState::with_tokens(Coord::new(0, 0), Coord::new(4, 8), [[0; 3]; 2]);
        state.mark_segments(&WallPlacement::new(0, 0, 1, Orientation::Horizontal));
        state.mark_segments(&WallPlacement::new(0, 0, 1, Orientation::Vertical));

        let result = shortest_path(&state, Side::One);
        assert_eq!(result.length, PathLength::Unreachable);
        assert!(result.path.is_empty());
        assert!(blocks_either_player(&state));
        assert!(path_length(&state, Side::Two).is_reachable());
    }

    #[test]
    fn test_cost_of_unreachable_exceeds_any_path() {
        assert!(PathLength::Unreachable.cost() > 80);
        assert_eq!(PathLength::Reachable(7).cost(), 7);
    }

    #[test]
    fn test_territory_splits_open_board() {
        let state = BoardState::new_game([0, 0, 0]);
        let counts = territory(&state);
        assert_eq!(counts[0] + counts[1], 81);
        // Rows 0-3 are strictly closer to side One, rows 5-8 to side Two
        assert!(counts[0] >= 36 && counts[1] >= 36);
    }

    #[test]
    fn test_territory_respects_walls() {
        let mut state = BoardState::with_tokens(Coord::new(0, 0), Coord::new(8, 8), [[0; 3]; 2]);
        state.mark_segments(&WallPlacement::new(0, 0, 1, Orientation::Horizontal));
        state.mark_segments(&WallPlacement::new(0, 0, 1, Orientation::Vertical));
        assert_eq!(territory(&state), [1, 80]);
    }
}
