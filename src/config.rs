// Configuration module for reading Engine.toml
// Every tunable the engine consumes lives here: search depth, evaluation weights,
// move-ordering penalties and the wall-candidate pruning knobs

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub scores: ScoresConfig,
    pub move_ordering: MoveOrderingConfig,
    pub move_generation: MoveGenerationConfig,
    pub game_rules: GameRulesConfig,
    pub debug: DebugConfig,
}

/// Search depth and execution strategy
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Total plies searched, root action included (>= 1)
    pub depth: u8,
    pub parallel_root: bool,
    pub min_cpus_for_parallel: usize,
}

/// Evaluation weights
///
/// All tunable; the path race term must stay the dominant one.
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    // Terminal shortcuts
    pub win_score: i32,
    pub blocked_score: i32,

    // Component weights
    pub path_race_weight: i32,
    pub wall_inventory_weight: i32,
    pub territory_weight: i32,
    pub goal_line_block_bonus: i32,

    // Path exposure: opponent token within `exposure_distance` of our route
    pub exposure_distance: i32,
    pub exposure_base: i32,
    pub exposure_weight: i32,

    pub goal_proximity_weight: i32,
}

/// Root move ordering and anti-oscillation constants
#[derive(Debug, Deserialize, Clone)]
pub struct MoveOrderingConfig {
    pub history_capacity: usize,
    pub immediate_reversal_penalty: i32,
    pub two_ply_reversal_penalty: i32,
    pub root_path_gain_weight: i32,
}

/// Wall candidate pruning
///
/// Full wall enumeration is large; candidates are scored, capped and floored.
/// These are search-space heuristics, not game rules.
#[derive(Debug, Deserialize, Clone)]
pub struct MoveGenerationConfig {
    pub wall_candidate_cap: usize,
    pub wall_score_floor: i32,
    pub wall_opponent_delta_weight: i32,
    pub wall_own_delta_weight: i32,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    /// Walls of length 1, 2 and 3 each side starts with
    pub wall_inventory: [u8; 3],
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Engine.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Engine.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Engine.toml")
    }

    /// Rejects values the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.search.depth == 0 {
            return Err("search.depth must be at least 1".to_string());
        }
        if self.move_ordering.history_capacity < 2 {
            return Err("move_ordering.history_capacity must be at least 2".to_string());
        }
        if self.move_generation.wall_candidate_cap == 0 {
            return Err("move_generation.wall_candidate_cap must be at least 1".to_string());
        }
        if self.scores.path_race_weight <= self.scores.wall_inventory_weight
            || self.scores.path_race_weight <= self.scores.territory_weight
        {
            return Err("scores.path_race_weight must dominate the other weights".to_string());
        }
        Ok(())
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Engine.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                depth: 2,
                parallel_root: true,
                min_cpus_for_parallel: 2,
            },
            scores: ScoresConfig {
                win_score: 50_000,
                blocked_score: 49_000,
                path_race_weight: 150,
                wall_inventory_weight: 8,
                territory_weight: 3,
                goal_line_block_bonus: 15,
                exposure_distance: 2,
                exposure_base: 3,
                exposure_weight: 7,
                goal_proximity_weight: 2,
            },
            move_ordering: MoveOrderingConfig {
                history_capacity: 4,
                immediate_reversal_penalty: 1000,
                two_ply_reversal_penalty: 500,
                root_path_gain_weight: 40,
            },
            move_generation: MoveGenerationConfig {
                wall_candidate_cap: 25,
                wall_score_floor: -10,
                wall_opponent_delta_weight: 10,
                wall_own_delta_weight: 15,
            },
            game_rules: GameRulesConfig {
                wall_inventory: [3, 4, 3],
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "engine_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Engine.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
