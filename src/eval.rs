// Static evaluation
//
// Score is from `root`'s point of view. Every term is a differential (root minus
// opponent), so evaluate(s, One) == -evaluate(s, Two) for any state.

use crate::board::BoardState;
use crate::config::ScoresConfig;
use crate::pathfinding::{shortest_path, territory, PathLength, ShortestPath};
use crate::types::{Coord, Side, BOARD_SIZE};

/// Each weighted term of the evaluation, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalBreakdown {
    /// Set when a side is home or sealed; all other terms are zero then
    pub terminal: i32,
    pub path_race: i32,
    pub wall_inventory: i32,
    pub territory: i32,
    pub goal_line_blocks: i32,
    pub exposure: i32,
    pub goal_proximity: i32,
}

impl EvalBreakdown {
    pub fn total(&self) -> i32 {
        self.terminal
            + self.path_race
            + self.wall_inventory
            + self.territory
            + self.goal_line_blocks
            + self.exposure
            + self.goal_proximity
    }
}

/// Static score of `state` for `root`; larger is better for `root`
pub fn evaluate(state: &BoardState, root: Side, weights: &ScoresConfig) -> i32 {
    evaluate_breakdown(state, root, weights).total()
}

pub fn evaluate_breakdown(state: &BoardState, root: Side, weights: &ScoresConfig) -> EvalBreakdown {
    let opp = root.opponent();
    let own_path = shortest_path(state, root);
    let opp_path = shortest_path(state, opp);

    // Goal checks come before sealed checks so both views agree on the sign
    let terminal = match (own_path.length, opp_path.length) {
        (PathLength::Reachable(0), _) => Some(weights.win_score),
        (_, PathLength::Reachable(0)) => Some(-weights.win_score),
        (PathLength::Unreachable, _) => Some(-weights.blocked_score),
        (_, PathLength::Unreachable) => Some(weights.blocked_score),
        _ => None,
    };
    if let Some(terminal) = terminal {
        return EvalBreakdown {
            terminal,
            ..EvalBreakdown::default()
        };
    }

    let own_len = own_path.length.cost();
    let opp_len = opp_path.length.cost();
    let tiles = territory(state);

    let own_walls = state.walls_remaining(root) as i32;
    let opp_walls = state.walls_remaining(opp) as i32;

    EvalBreakdown {
        terminal: 0,
        path_race: (opp_len - own_len) * weights.path_race_weight,
        wall_inventory: (own_walls - opp_walls) * weights.wall_inventory_weight,
        territory: (tiles[root.index()] - tiles[opp.index()]) * weights.territory_weight,
        goal_line_blocks: (state.goal_line_blocks(opp) - state.goal_line_blocks(root))
            * weights.goal_line_block_bonus,
        exposure: exposure_penalty(&opp_path, state.token(root), weights)
            - exposure_penalty(&own_path, state.token(opp), weights),
        goal_proximity: (goal_proximity(state.token(root), root)
            - goal_proximity(state.token(opp), opp))
            * weights.goal_proximity_weight,
    }
}

/// Penalty for a route with the enemy token sitting close to it
fn exposure_penalty(path: &ShortestPath, enemy: Coord, weights: &ScoresConfig) -> i32 {
    let nearest = path.path.iter().map(|tile| tile.manhattan(enemy)).min();
    match nearest {
        Some(d) if d <= weights.exposure_distance => (weights.exposure_base - d) * weights.exposure_weight,
        _ => 0,
    }
}

fn goal_proximity(pos: Coord, side: Side) -> i32 {
    (BOARD_SIZE - 1) - side.rows_to_goal(pos)
}
