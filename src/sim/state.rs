//! Game state and core simulation types

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::difficulty::{self, DifficultyParams};
use crate::normalize_angle;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, before the first run
    Start,
    /// Reticle is moving, action attempts a lock
    Playing,
    /// All hits landed
    Win,
    /// Action pressed away from the target
    Lose,
}

/// Something the state machine did in response to an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh session entered `Playing`
    RunStarted,
    /// Lock landed; `hits` is the new count
    Hit { hits: u32, distance: f32 },
    /// Final lock landed
    Won { hits: u32 },
    /// Lock missed by `distance` radians
    Missed { hits: u32, distance: f32 },
}

/// One run of the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Reticle position (radians, [0, τ))
    pub reticle_angle: f32,
    /// Target position (radians, [0, τ))
    pub target_angle: f32,
    /// Successful locks this run
    pub hits: u32,
}

impl Session {
    /// Fresh session in `Start` with a random reticle and a target already placed
    pub fn new<R: Rng>(params: &DifficultyParams, rng: &mut R) -> Self {
        let mut session = Self {
            phase: GamePhase::Start,
            reticle_angle: rng.random_range(0.0..TAU),
            target_angle: 0.0,
            hits: 0,
        };
        session.pick_target(params, rng);
        session
    }

    /// Sweep direction: +1 on even hit counts, -1 on odd
    #[inline]
    pub fn direction(&self) -> f32 {
        if self.hits % 2 == 0 { 1.0 } else { -1.0 }
    }

    #[inline]
    pub fn progress(&self, params: &DifficultyParams) -> f32 {
        difficulty::progress(self.hits, params.max_hits)
    }

    /// Place the target ahead of the reticle in the current sweep direction
    pub fn pick_target<R: Rng>(&mut self, params: &DifficultyParams, rng: &mut R) {
        let offset = params.pick_target_offset(self.progress(params), rng);
        self.target_angle = normalize_angle(self.reticle_angle + self.direction() * offset);
    }
}

/// Complete game: current session, balance parameters, and the shared RNG
#[derive(Debug, Clone)]
pub struct Game {
    pub session: Session,
    pub params: DifficultyParams,
    /// Seed the RNG was created from (for logging/replay)
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl Game {
    /// Create a game on the title screen with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_params(DifficultyParams::default(), seed)
    }

    pub fn with_params(params: DifficultyParams, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let session = Session::new(&params, &mut rng);
        Self {
            session,
            params,
            seed,
            rng,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.session.progress(&self.params)
    }

    /// Replace the session with a fresh one in `Playing`
    pub(crate) fn start_run(&mut self) {
        self.session = Session {
            phase: GamePhase::Playing,
            ..Session::new(&self.params, &mut self.rng)
        };
    }
}
