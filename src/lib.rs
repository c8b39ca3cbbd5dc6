//! Pop the Lock - A one-button arcade timing game
//!
//! Core modules:
//! - `sim`: Simulation core (state machine, difficulty curve)
//! - `renderer`: Presentation adapter and WebGPU pipeline
//! - `platform`: Frame clock, input mapping and the shared host driver
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: Player preferences and leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use std::f32::consts::TAU;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::TAU;

    /// Target circle radius (fraction of half the smaller screen dimension)
    pub const TARGET_RADIUS: f32 = 0.1;
    /// Reticle circle radius (fraction of half the smaller screen dimension)
    pub const RETICLE_RADIUS: f32 = 0.06667;

    /// Hits needed to win a run
    pub const MAX_HIT_COUNT: u32 = 50;

    /// Reticle angular speed at progress 0 (rad/s)
    pub const MIN_SPEED: f32 = 1.5;
    /// Reticle angular speed at progress 1 (rad/s)
    pub const MAX_SPEED: f32 = 4.0;

    /// Lower offset bound at progress 1
    pub const MIN_MIN_OFFSET: f32 = TAU / 8.0;
    /// Lower offset bound at progress 0
    pub const MAX_MIN_OFFSET: f32 = TAU / 4.0;
    /// Upper offset bound at progress 1
    pub const MIN_MAX_OFFSET: f32 = TAU / 3.0;
    /// Upper offset bound at progress 0
    pub const MAX_MAX_OFFSET: f32 = TAU / 2.0;

    /// Largest reticle/target distance that still counts as a lock (radians)
    pub const HIT_THRESHOLD: f32 = 0.16;

    /// Largest frame delta the host feeds into `advance` (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Host frame pacing
    pub const TARGET_FPS: u32 = 60;

    /// Title background; progress 0 while playing
    pub const START_COLOR: [u8; 3] = [0, 128, 0];
    /// Win background; progress 1 while playing
    pub const END_COLOR: [u8; 3] = [64, 128, 255];
    pub const LOSE_COLOR: [u8; 3] = [0xf0, 0x40, 0x40];
    pub const TARGET_COLOR: [u8; 3] = [0xf0, 0xc0, 0x20];
    pub const RETICLE_COLOR: [u8; 3] = [255, 255, 255];
    pub const TEXT_COLOR: [u8; 3] = [255, 255, 255];
}

/// Wrap an angle into [0, τ)
///
/// `f32::rem_euclid` can round up to exactly τ for tiny negative inputs, so the
/// remainder is taken twice instead.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    ((angle % TAU) + TAU) % TAU
}

/// Shortest distance between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).min(normalize_angle(b - a))
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
