//! yd-core: Yahtzee rules, scoring, match state machine, and configuration.

pub mod category;
pub mod config;
pub mod engine;
pub mod scoring;
pub mod state;

pub use category::{Category, NUM_CATS};
pub use config::{Config, ConfigError, PhysicsConfig, SessionConfig};
pub use engine::{FillReport, SeatResult, TransitionError, TurnEngine};
pub use scoring::{score_for_category, scores_for_dice};
pub use state::{
    MatchOutcome, MatchState, PlayerBoard, ScoreCard, TurnPhase, MAX_ROLLS, NUM_DICE, NUM_ROUNDS,
    UPPER_BONUS, UPPER_BONUS_THRESHOLD,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod state_tests;
