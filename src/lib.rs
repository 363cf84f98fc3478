// Library exports for the decision engine
// The service binary, the replay tool and selfplay all build on these modules

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod eval;
pub mod move_gen;
pub mod pathfinding;
pub mod position_gen;
pub mod replay;
pub mod search;
pub mod types;
