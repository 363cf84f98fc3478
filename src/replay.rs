// Replay module for analyzing logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the search on each logged position with the logged move history
// 3. Compare logged vs replayed actions
// 4. Generate a summary report

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::board::BoardState;
use crate::config::Config;
use crate::debug_logger::DecisionLogEntry;
use crate::search::{solve, MoveHistory, SearchMode};
use crate::types::{Action, Orientation, WallPlacement};

/// Result of replaying a single decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original_action: Option<Action>,
    pub replayed_action: Option<Action>,
    pub matches: bool,
    pub original_score: i32,
    pub replayed_score: i32,
    pub search_depth: u8,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DecisionLogEntry>, String> {
        let file = File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DecisionLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    ///
    /// Always searches sequentially: the parallel root search returns the same
    /// scores, and the sequential one is cheaper to reason about when debugging.
    pub fn replay_entry(&self, entry: &DecisionLogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let state = BoardState::snapshot(&entry.game)?;
        let history = MoveHistory::from_entries(&entry.history, self.config.move_ordering.history_capacity);
        let depth = entry.decision.depth.max(1);

        let start_time = Instant::now();
        let replayed = solve(&state, depth, entry.side, &history, &self.config, SearchMode::Sequential);
        let computation_time = start_time.elapsed().as_millis();

        let matches = replayed.action == entry.decision.action;

        let result = ReplayResult {
            turn: entry.turn,
            original_action: entry.decision.action,
            replayed_action: replayed.action,
            matches,
            original_score: entry.decision.score,
            replayed_score: replayed.score,
            search_depth: depth,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    notation(&replayed.action),
                    replayed.score,
                    depth,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    notation(&entry.decision.action),
                    notation(&replayed.action),
                    replayed.score,
                    depth,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DecisionLogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(&self, entries: &[DecisionLogEntry], turn_numbers: &[u32]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 =
                results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>() / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (logged score: {}, replayed score: {}, depth: {}, time: {}ms)",
                    result.turn,
                    notation(&result.original_action),
                    notation(&result.replayed_action),
                    result.original_score,
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected actions were logged
    pub fn validate_expected_actions(
        &self,
        entries: &[DecisionLogEntry],
        expected: &[(u32, Vec<Action>)], // (turn, acceptable_actions)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual = entry.decision.action;
            if !actual.map(|a| acceptable.contains(&a)).unwrap_or(false) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|a| notation(&Some(*a))).collect::<Vec<_>>(),
                    notation(&actual)
                ));
            }
        }

        Ok(())
    }
}

/// Compact action notation: `x-y` for a move, `h2@x-y` / `v3@x-y` for a wall
pub fn notation(action: &Option<Action>) -> String {
    match action {
        Some(Action::Move { x, y }) => format!("{}-{}", x, y),
        Some(Action::Wall(w)) => {
            let o = if w.is_horizontal() { 'h' } else { 'v' };
            format!("{}{}@{}-{}", o, w.length, w.x, w.y)
        }
        None => "none".to_string(),
    }
}

/// Parses the notation produced by `notation`
pub fn parse_action(s: &str) -> Result<Action, String> {
    let s = s.trim().to_lowercase();

    let parse_xy = |xy: &str| -> Result<(i32, i32), String> {
        let mut parts = xy.split('-');
        let x = parts.next().and_then(|p| p.parse::<i32>().ok());
        let y = parts.next().and_then(|p| p.parse::<i32>().ok());
        match (x, y, parts.next()) {
            (Some(x), Some(y), None) => Ok((x, y)),
            _ => Err(format!("Invalid coordinate '{}'", xy)),
        }
    };

    match s.split_once('@') {
        None => {
            let (x, y) = parse_xy(&s)?;
            Ok(Action::Move { x, y })
        }
        Some((head, xy)) => {
            let mut chars = head.chars();
            let orientation = match chars.next() {
                Some('h') => Orientation::Horizontal,
                Some('v') => Orientation::Vertical,
                _ => return Err(format!("Invalid wall orientation in '{}'", s)),
            };
            let length = chars
                .as_str()
                .parse::<u8>()
                .map_err(|e| format!("Invalid wall length in '{}': {}", s, e))?;
            let (x, y) = parse_xy(xy)?;
            Ok(Action::Wall(WallPlacement::new(x, y, length, orientation)))
        }
    }
}
