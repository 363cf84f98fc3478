// Decision service state
//
// Bot is what the HTTP layer manages: static configuration, one search session
// per running game, and the debug decision log. Each endpoint maps to one
// method here.

use log::{error, info, warn};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;

use crate::board::BoardState;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::search::{solve, Decision, SearchMode, SearchSession};
use crate::types::GameState;

/// Per-game session, held across the whole of a decision request
type SharedSession = Arc<AsyncMutex<SearchSession>>;

/// Decision engine with per-game move histories
pub struct Bot {
    config: Config,
    sessions: Mutex<HashMap<String, SharedSession>>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, DebugLogger::disabled())
    }

    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot {
            config,
            sessions: Mutex::new(HashMap::new()),
            logger,
        }
    }

    /// Returns engine metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "engine": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "depth": self.config.search.depth,
        })
    }

    /// Called when a game starts; opens a fresh search session
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &GameState) {
        info!("GAME START {}", game.game_id);
        self.sessions
            .lock()
            .insert(game.game_id.clone(), self.new_session());
    }

    fn new_session(&self) -> SharedSession {
        Arc::new(AsyncMutex::new(SearchSession::new(
            self.config.move_ordering.history_capacity,
        )))
    }

    /// Called when a game ends; drops its session
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &GameState) {
        info!("GAME OVER {}", game.game_id);
        self.sessions.lock().remove(&game.game_id);
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Computes the decision for the side to move
    /// Corresponds to POST /move endpoint
    ///
    /// The search is CPU-bound and runs to completion on a blocking worker.
    /// The game's session stays locked from reading the history until the
    /// decision is recorded, so requests for the same game run one at a time.
    ///
    /// # Returns
    /// * `Err` when the snapshot is malformed
    pub async fn get_move(&self, game: &GameState) -> Result<Decision, String> {
        let start_time = Instant::now();
        let side = game.to_move;

        info!("Game {} turn {}: computing decision for side {}", game.game_id, game.turn, side);

        let state = BoardState::snapshot(game)?;

        let shared = {
            let mut sessions = self.sessions.lock();
            sessions
                .entry(game.game_id.clone())
                .or_insert_with(|| {
                    warn!("No session for game {}; starting one", game.game_id);
                    self.new_session()
                })
                .clone()
        };
        let mut session = shared.lock().await;
        let history = session.history(side).clone();

        let config = self.config.clone();
        let mode = Self::determine_mode(&config);
        let depth = config.search.depth;
        let logged_history = history.to_vec();

        let decision = tokio::task::spawn_blocking(move || {
            solve(&state, depth, side, &history, &config, mode)
        })
        .await
        .unwrap_or_else(|e| {
            error!("Search task failed: {}", e);
            Decision::invalid(depth)
        });

        session.record(side, &decision);
        drop(session);

        info!(
            "Game {} turn {}: side {} plays {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
            game.game_id,
            game.turn,
            side,
            decision
                .action
                .map(|a| a.to_string())
                .unwrap_or_else(|| "nothing".to_string()),
            decision.score,
            decision.depth,
            decision.nodes,
            start_time.elapsed().as_millis()
        );

        self.logger
            .log_decision(game.clone(), logged_history, decision.clone());

        Ok(decision)
    }

    /// Parallel root search when enabled and the pool is wide enough
    pub fn determine_mode(config: &Config) -> SearchMode {
        let num_cpus = rayon::current_num_threads();
        if config.search.parallel_root && num_cpus >= config.search.min_cpus_for_parallel {
            SearchMode::ParallelRoot
        } else {
            SearchMode::Sequential
        }
    }

    /// Decision as the JSON body returned to the caller
    pub fn decision_json(decision: &Decision) -> Value {
        json!({
            "action": decision.action,
            "score": decision.score,
            "depth": decision.depth,
            "nodes": decision.nodes,
            "valid": decision.is_valid(),
        })
    }
}
