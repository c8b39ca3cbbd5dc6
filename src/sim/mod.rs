//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod state;
pub mod tick;

pub use difficulty::{DifficultyParams, progress};
pub use state::{Game, GameEvent, GamePhase, Session};
pub use tick::{TickInput, tick};
