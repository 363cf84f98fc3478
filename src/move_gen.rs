// Move and wall generation
//
// Token moves follow the jump / side-step rules when the tokens are adjacent.
// Wall candidates are every structurally legal placement that leaves both sides
// a route home, scored by how much it slows the opponent versus ourselves and
// then pruned to a short list.

use crate::board::BoardState;
use crate::config::MoveGenerationConfig;
use crate::pathfinding::{path_length, PathLength};
use crate::types::{Action, Coord, Direction, Orientation, Side, WallPlacement, MAX_WALL_LENGTH};

/// A legal wall together with its ordering score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredWall {
    pub wall: WallPlacement,
    pub score: i32,
}

/// Legal token destinations for `side`, closest to its goal row first
///
/// Each direction yields the neighbour when empty. When the neighbour holds the
/// opponent the straight jump is tried first; if the far edge is blocked (wall
/// or board edge) the two side-steps from the opponent's tile are tried instead.
pub fn token_moves(state: &BoardState, side: Side) -> Vec<Coord> {
    let from = state.token(side);
    let opponent = state.token(side.opponent());
    let mut moves = Vec::with_capacity(5);

    for dir in Direction::all() {
        if state.is_edge_blocked(from, dir) {
            continue;
        }

        let next = dir.apply(&from);
        if next != opponent {
            moves.push(next);
            continue;
        }

        if !state.is_edge_blocked(opponent, dir) {
            moves.push(dir.apply(&opponent));
            continue;
        }

        for side_dir in dir.perpendicular() {
            if !state.is_edge_blocked(opponent, side_dir) {
                let step = side_dir.apply(&opponent);
                if step != from && !moves.contains(&step) {
                    moves.push(step);
                }
            }
        }
    }

    // Stable: ties keep direction order
    moves.sort_by_key(|c| side.rows_to_goal(*c));
    moves
}

/// Structurally legal walls `side` could place, before the path check
fn structural_walls(state: &BoardState, side: Side) -> impl Iterator<Item = WallPlacement> + '_ {
    (1..=MAX_WALL_LENGTH)
        .filter(move |&len| state.wall_count(side, len) > 0)
        .flat_map(|len| {
            Orientation::all()
                .into_iter()
                .flat_map(move |o| BoardState::wall_anchors(len, o))
        })
        .filter(move |wall| state.is_structurally_legal(wall))
}

/// Path lengths of (own, opponent) after `wall` is marked, or None if it seals either side
fn lengths_after(state: &BoardState, side: Side, wall: &WallPlacement) -> Option<(u32, u32)> {
    let mut trial = *state;
    trial.mark_segments(wall);
    let own = path_length(&trial, side).steps()?;
    let opp = path_length(&trial, side.opponent()).steps()?;
    Some((own, opp))
}

/// Every wall `side` may legally place: fits, no overlap or cross, and both
/// sides keep a route to their goal row afterwards
pub fn legal_wall_placements(state: &BoardState, side: Side) -> Vec<WallPlacement> {
    structural_walls(state, side)
        .filter(|wall| lengths_after(state, side, wall).is_some())
        .collect()
}

/// Pruned, ordered wall candidates for the search
///
/// Score is `opp_delta * opp_weight - own_delta * own_weight`. Sorted
/// descending, capped at `wall_candidate_cap`, then floored at
/// `wall_score_floor`.
pub fn wall_candidates(
    state: &BoardState,
    side: Side,
    config: &MoveGenerationConfig,
) -> Vec<ScoredWall> {
    if state.walls_remaining(side) == 0 {
        return Vec::new();
    }

    let (own_before, opp_before) = match (
        path_length(state, side),
        path_length(state, side.opponent()),
    ) {
        (PathLength::Reachable(own), PathLength::Reachable(opp)) => (own as i32, opp as i32),
        _ => return Vec::new(),
    };

    let mut scored: Vec<ScoredWall> = structural_walls(state, side)
        .filter_map(|wall| {
            let (own, opp) = lengths_after(state, side, &wall)?;
            let own_delta = own as i32 - own_before;
            let opp_delta = opp as i32 - opp_before;
            Some(ScoredWall {
                wall,
                score: opp_delta * config.wall_opponent_delta_weight
                    - own_delta * config.wall_own_delta_weight,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(config.wall_candidate_cap);
    scored.retain(|w| w.score >= config.wall_score_floor);
    scored
}

/// All actions the search considers for `side`: token moves first, then walls
pub fn candidate_actions(
    state: &BoardState,
    side: Side,
    config: &MoveGenerationConfig,
) -> Vec<Action> {
    let mut actions: Vec<Action> = token_moves(state, side)
        .into_iter()
        .map(Action::move_to)
        .collect();

    actions.extend(
        wall_candidates(state, side, config)
            .into_iter()
            .map(|w| Action::Wall(w.wall)),
    );
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn gen_config() -> MoveGenerationConfig {
        Config::default_hardcoded().move_generation
    }

    #[test]
    fn test_open_board_moves_sorted_toward_goal() {
        let state = BoardState::with_tokens(Coord::new(4, 4), Coord::new(0, 8), [[0; 3]; 2]);
        let moves = token_moves(&state, Side::One);
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[0], Coord::new(4, 5));
        assert_eq!(*moves.last().unwrap(), Coord::new(4, 3));
    }

    #[test]
    fn test_straight_jump_over_opponent() {
        let state = BoardState::with_tokens(Coord::new(4, 4), Coord::new(4, 5), [[0; 3]; 2]);
        let moves = token_moves(&state, Side::One);
        assert!(moves.contains(&Coord::new(4, 6)));
        assert!(!moves.contains(&Coord::new(4, 5)));
        assert_eq!(moves[0], Coord::new(4, 6));
    }

    #[test]
    fn test_side_steps_when_jump_is_walled() {
        let mut state = BoardState::with_tokens(Coord::new(4, 4), Coord::new(4, 5), [[0; 3]; 2]);
        state.mark_segments(&WallPlacement::new(4, 5, 1, Orientation::Horizontal));

        let moves = token_moves(&state, Side::One);
        assert!(!moves.contains(&Coord::new(4, 6)));
        assert!(moves.contains(&Coord::new(3, 5)));
        assert!(moves.contains(&Coord::new(5, 5)));
    }

    #[test]
    fn test_side_steps_at_board_edge() {
        // Opponent on the top row: the straight jump would leave the board
        let state = BoardState::with_tokens(Coord::new(0, 7), Coord::new(0, 8), [[0; 3]; 2]);
        let moves = token_moves(&state, Side::One);
        assert!(moves.contains(&Coord::new(1, 8)));
        assert!(!moves.iter().any(|c| !c.in_bounds()));
    }

    #[test]
    fn test_no_walls_without_inventory() {
        let state = BoardState::with_tokens(Coord::new(4, 0), Coord::new(4, 8), [[0; 3], [3, 3, 3]]);
        assert!(wall_candidates(&state, Side::One, &gen_config()).is_empty());
        assert!(legal_wall_placements(&state, Side::One).is_empty());
        assert!(!wall_candidates(&state, Side::Two, &gen_config()).is_empty());
    }

    #[test]
    fn test_wall_candidates_are_capped_sorted_and_floored() {
        let state = BoardState::new_game([3, 4, 3]);
        let config = gen_config();
        let walls = wall_candidates(&state, Side::One, &config);

        assert!(!walls.is_empty());
        assert!(walls.len() <= config.wall_candidate_cap);
        for pair in walls.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(walls.iter().all(|w| w.score >= config.wall_score_floor));
        // Tokens share a column, so no single wall slows only the opponent
        assert_eq!(walls[0].score, 0);
    }

    #[test]
    fn test_wall_in_front_of_opponent_ranks_first() {
        let state = BoardState::with_tokens(Coord::new(1, 0), Coord::new(7, 7), [[3, 4, 3]; 2]);
        let config = gen_config();
        let walls = wall_candidates(&state, Side::One, &config);

        // A length-3 wall over columns 6..=8 forces side Two two columns sideways
        let best = walls[0];
        assert_eq!(best.score, 2 * config.wall_opponent_delta_weight);
        assert_eq!(best.wall.length, 3);
        assert_eq!(best.wall.orientation, Orientation::Horizontal);
        assert_eq!(best.wall.x, 6);

        let after = state.after(Side::One, &Action::Wall(best.wall));
        assert_eq!(path_length(&after, Side::Two), PathLength::Reachable(9));
        assert_eq!(path_length(&after, Side::One), PathLength::Reachable(8));

        let in_front = WallPlacement::new(6, 6, 3, Orientation::Horizontal);
        assert!(walls.iter().any(|w| w.wall == in_front && w.score == best.score));

        // Walling off our own route falls under the floor
        let own_route = WallPlacement::new(0, 0, 3, Orientation::Horizontal);
        assert!(walls.iter().all(|w| w.wall != own_route));
    }

    #[test]
    fn test_only_length_held_is_generated() {
        let state = BoardState::with_tokens(Coord::new(4, 0), Coord::new(4, 8), [[0, 1, 0], [0; 3]]);
        let walls = legal_wall_placements(&state, Side::One);
        assert!(!walls.is_empty());
        assert!(walls.iter().all(|w| w.length == 2));
    }
}
