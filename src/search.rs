// Adversarial search
//
// Plain minimax, alpha-beta minimax and root action selection (sequential or
// split across the rayon pool). Every recursive call works on its own copy of
// the board; the caller's state is never touched.

use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::board::BoardState;
use crate::config::{Config, MoveOrderingConfig};
use crate::eval::evaluate;
use crate::move_gen::candidate_actions;
use crate::pathfinding::{blocks_either_player, path_length};
use crate::types::{Action, Coord, Side};

/// Score given to root candidates that must never be picked
pub const EXCLUDED_SCORE: i32 = i32::MIN;

const NEG_INF: i32 = i32::MIN + 1;
const POS_INF: i32 = i32::MAX;

/// How root candidates are searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// One candidate after another, alpha-beta below the root
    Sequential,
    /// One rayon task per candidate, plain minimax below the root
    ParallelRoot,
}

/// Recent token destinations of one side, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    entries: VecDeque<Coord>,
    capacity: usize,
}

impl MoveHistory {
    pub fn new(capacity: usize) -> Self {
        MoveHistory {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Rebuilds a history from logged entries (oldest first)
    pub fn from_entries(entries: &[Coord], capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        for &c in entries {
            history.record(c);
        }
        history
    }

    /// Appends a destination, dropping the oldest entries past capacity
    pub fn record(&mut self, destination: Coord) {
        self.entries.push_back(destination);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn most_recent(&self) -> Option<Coord> {
        self.entries.back().copied()
    }

    pub fn two_plies_ago(&self) -> Option<Coord> {
        self.entries.iter().rev().nth(1).copied()
    }

    pub fn to_vec(&self) -> Vec<Coord> {
        self.entries.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anti-oscillation penalty for moving to `destination` (zero or negative)
    pub fn penalty(&self, destination: Coord, ordering: &MoveOrderingConfig) -> i32 {
        if self.most_recent() == Some(destination) {
            -ordering.immediate_reversal_penalty
        } else if self.two_plies_ago() == Some(destination) {
            -ordering.two_ply_reversal_penalty
        } else {
            0
        }
    }
}

/// Node and cutoff counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
    }
}

/// The engine's answer for one decision request
///
/// `action == None` flags the invalid/default answer returned when no root
/// candidate exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Option<Action>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

impl Decision {
    pub fn invalid(depth: u8) -> Self {
        Decision {
            action: None,
            score: EXCLUDED_SCORE,
            depth,
            nodes: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.action.is_some()
    }
}

/// Final score of one root candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootScore {
    pub action: Action,
    pub score: i32,
}

/// Either side already standing on its goal row
fn is_decided(state: &BoardState) -> bool {
    Side::both()
        .iter()
        .any(|&side| path_length(state, side).is_goal())
}

/// Plain minimax: max on `root`'s plies, min on the opponent's
pub fn minimax(
    state: &BoardState,
    depth: u8,
    root: Side,
    to_move: Side,
    config: &Config,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;

    if depth == 0 || is_decided(state) {
        return evaluate(state, root, &config.scores);
    }

    let candidates = candidate_actions(state, to_move, &config.move_generation);
    if candidates.is_empty() {
        warn!("No candidates for side {} inside minimax; evaluating statically", to_move);
        return evaluate(state, root, &config.scores);
    }

    let maximizing = to_move == root;
    let mut best = if maximizing { NEG_INF } else { POS_INF };

    for action in &candidates {
        let child = state.after(to_move, action);
        let value = minimax(&child, depth - 1, root, to_move.opponent(), config, stats);
        best = if maximizing { best.max(value) } else { best.min(value) };
    }

    best
}

/// Alpha-beta minimax; with a full window the result equals `minimax`
#[allow(clippy::too_many_arguments)]
pub fn alpha_beta(
    state: &BoardState,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    root: Side,
    to_move: Side,
    config: &Config,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;

    if depth == 0 || is_decided(state) {
        return evaluate(state, root, &config.scores);
    }

    let candidates = candidate_actions(state, to_move, &config.move_generation);
    if candidates.is_empty() {
        warn!("No candidates for side {} inside alpha-beta; evaluating statically", to_move);
        return evaluate(state, root, &config.scores);
    }

    if to_move == root {
        let mut best = NEG_INF;
        for action in &candidates {
            let child = state.after(to_move, action);
            let value = alpha_beta(&child, depth - 1, alpha, beta, root, to_move.opponent(), config, stats);
            best = best.max(value);
            alpha = alpha.max(value);
            if beta <= alpha {
                stats.cutoffs += 1;
                return alpha;
            }
        }
        best
    } else {
        let mut best = POS_INF;
        for action in &candidates {
            let child = state.after(to_move, action);
            let value = alpha_beta(&child, depth - 1, alpha, beta, root, to_move.opponent(), config, stats);
            best = best.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                stats.cutoffs += 1;
                return beta;
            }
        }
        best
    }
}

/// Root candidate with everything known before recursing
struct PreparedCandidate {
    action: Action,
    /// Path-differential gain times weight, plus the history penalty
    bonus: i32,
    excluded: bool,
}

/// `opp_len - own_len` as seen by `side`
fn path_differential(state: &BoardState, side: Side) -> i32 {
    path_length(state, side.opponent()).cost() - path_length(state, side).cost()
}

fn prepare_candidates(
    state: &BoardState,
    root: Side,
    history: &MoveHistory,
    config: &Config,
) -> Vec<PreparedCandidate> {
    let baseline = path_differential(state, root);
    let ordering = &config.move_ordering;

    let mut prepared: Vec<PreparedCandidate> = candidate_actions(state, root, &config.move_generation)
        .into_iter()
        .map(|action| {
            let child = state.after(root, &action);

            // Re-checked here rather than trusted from the generator
            if action.is_wall() && blocks_either_player(&child) {
                return PreparedCandidate {
                    action,
                    bonus: 0,
                    excluded: true,
                };
            }

            let gain = path_differential(&child, root) - baseline;
            let penalty = action
                .destination()
                .map(|dest| history.penalty(dest, ordering))
                .unwrap_or(0);

            PreparedCandidate {
                action,
                bonus: gain * ordering.root_path_gain_weight + penalty,
                excluded: false,
            }
        })
        .collect();

    // Stable, so equal bonuses keep generation order
    prepared.sort_by(|a, b| b.bonus.cmp(&a.bonus));
    prepared
}

/// Full search score of one prepared root candidate
fn score_candidate(
    state: &BoardState,
    candidate: &PreparedCandidate,
    depth: u8,
    root: Side,
    config: &Config,
    mode: SearchMode,
    stats: &mut SearchStats,
) -> i32 {
    if candidate.excluded {
        return EXCLUDED_SCORE;
    }

    let child = state.after(root, &candidate.action);
    let remaining = depth.saturating_sub(1);
    let recursive = match mode {
        SearchMode::Sequential => alpha_beta(
            &child,
            remaining,
            NEG_INF,
            POS_INF,
            root,
            root.opponent(),
            config,
            stats,
        ),
        SearchMode::ParallelRoot => minimax(&child, remaining, root, root.opponent(), config, stats),
    };

    recursive.saturating_add(candidate.bonus)
}

/// Scores every root candidate, in ordering order
///
/// The parallel mode gives each rayon task its own copy of the board and its
/// own counters; nothing is shared except read-only inputs.
pub fn root_scores(
    state: &BoardState,
    depth: u8,
    root: Side,
    history: &MoveHistory,
    config: &Config,
    mode: SearchMode,
) -> (Vec<RootScore>, SearchStats) {
    let prepared = prepare_candidates(state, root, history, config);
    let mut stats = SearchStats::default();

    let scored: Vec<(RootScore, SearchStats)> = match mode {
        SearchMode::Sequential => prepared
            .iter()
            .map(|c| {
                let mut local = SearchStats::default();
                let score = score_candidate(state, c, depth, root, config, mode, &mut local);
                (RootScore { action: c.action, score }, local)
            })
            .collect(),
        SearchMode::ParallelRoot => prepared
            .par_iter()
            .map(|c| {
                let snapshot = *state;
                let mut local = SearchStats::default();
                let score = score_candidate(&snapshot, c, depth, root, config, mode, &mut local);
                (RootScore { action: c.action, score }, local)
            })
            .collect(),
    };

    let mut scores = Vec::with_capacity(scored.len());
    for (root_score, local) in scored {
        debug!("  {} -> {}", root_score.action, root_score.score);
        stats.merge(&local);
        scores.push(root_score);
    }

    (scores, stats)
}

/// Picks the best action for `root`
///
/// Ties go to the earliest candidate in ordering order. Returns an invalid
/// decision when there is nothing playable.
pub fn solve(
    state: &BoardState,
    depth: u8,
    root: Side,
    history: &MoveHistory,
    config: &Config,
    mode: SearchMode,
) -> Decision {
    let (scores, stats) = root_scores(state, depth, root, history, config, mode);

    let mut best: Option<RootScore> = None;
    for candidate in scores {
        match best {
            Some(b) if candidate.score <= b.score => {}
            _ => best = Some(candidate),
        }
    }

    match best {
        Some(b) if b.score != EXCLUDED_SCORE => {
            info!(
                "Side {}: chose {} (score: {}, depth: {}, nodes: {}, cutoffs: {})",
                root, b.action, b.score, depth, stats.nodes, stats.cutoffs
            );
            Decision {
                action: Some(b.action),
                score: b.score,
                depth,
                nodes: stats.nodes,
            }
        }
        _ => {
            error!("Side {}: no playable root candidate; returning invalid decision", root);
            Decision {
                nodes: stats.nodes,
                ..Decision::invalid(depth)
            }
        }
    }
}

/// Per-game search state: one move history per side
///
/// Histories are written only here, after a decision is complete.
#[derive(Debug, Clone)]
pub struct SearchSession {
    histories: [MoveHistory; 2],
}

impl SearchSession {
    pub fn new(history_capacity: usize) -> Self {
        SearchSession {
            histories: [
                MoveHistory::new(history_capacity),
                MoveHistory::new(history_capacity),
            ],
        }
    }

    pub fn history(&self, side: Side) -> &MoveHistory {
        &self.histories[side.index()]
    }

    /// Feeds a finished decision into the side's history; walls are not recorded
    pub fn record(&mut self, side: Side, decision: &Decision) {
        if let Some(dest) = decision.action.and_then(|a| a.destination()) {
            self.histories[side.index()].record(dest);
        }
    }

    /// Solves and records in one step
    pub fn decide(&mut self, state: &BoardState, side: Side, config: &Config, mode: SearchMode) -> Decision {
        let decision = solve(state, config.search.depth, side, self.history(side), config, mode);
        self.record(side, &decision);
        decision
    }
}
