//! Random reachable positions
//!
//! Positions are produced by legal play from the start position, so every one
//! of them satisfies the board invariants. Used by the selfplay tool for
//! randomized openings and by the property tests.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::BoardState;
use crate::move_gen::{legal_wall_placements, token_moves};
use crate::pathfinding::path_length;
use crate::types::{Action, Side};

/// Picks a uniformly random legal action for `side`
///
/// Walls are chosen with probability `wall_chance` when the side has any left.
pub fn random_action<R: Rng + ?Sized>(
    rng: &mut R,
    state: &BoardState,
    side: Side,
    wall_chance: f64,
) -> Option<Action> {
    if state.walls_remaining(side) > 0 && rng.random_bool(wall_chance) {
        let walls = legal_wall_placements(state, side);
        if let Some(wall) = walls.choose(rng) {
            return Some(Action::Wall(*wall));
        }
    }

    token_moves(state, side)
        .choose(rng)
        .map(|c| Action::move_to(*c))
}

/// Plays up to `plies` random legal actions from a fresh game
///
/// Stops early if a side reaches its goal row. Returns the position and the
/// side to move in it.
pub fn random_position<R: Rng + ?Sized>(
    rng: &mut R,
    plies: usize,
    wall_inventory: [u8; 3],
    wall_chance: f64,
) -> (BoardState, Side) {
    let mut state = BoardState::new_game(wall_inventory);
    let mut to_move = Side::One;

    for _ in 0..plies {
        if Side::both().iter().any(|&s| path_length(&state, s).is_goal()) {
            break;
        }
        match random_action(rng, &state, to_move, wall_chance) {
            Some(action) => state = state.after(to_move, &action),
            None => break,
        }
        to_move = to_move.opponent();
    }

    (state, to_move)
}
