//! Platform-independent half of the host
//!
//! Both binaries run the game through a `Driver`: input events go in, frames
//! are stepped, and finished runs land on the leaderboard. Hosts keep only
//! what is theirs (canvas, GPU, audio, the loop itself).

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{Game, GameEvent, tick};

use super::{FrameClock, InputEvent, InputQueue};

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    /// Leaderboard rank (1-indexed) of a run that ended this frame, if it made the board
    pub rank: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Driver {
    pub game: Game,
    pub settings: Settings,
    pub high_scores: HighScores,
    input: InputQueue,
    clock: FrameClock,
}

impl Driver {
    pub fn new(game: Game, settings: Settings, high_scores: HighScores) -> Self {
        Self {
            game,
            settings,
            high_scores,
            input: InputQueue::default(),
            clock: FrameClock::new(),
        }
    }

    /// Queue an input event for the next frame. Settings changes are applied
    /// and saved right away.
    pub fn push_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Setting(change) => {
                self.settings.apply(change);
                self.settings.save();
            }
            InputEvent::Quit => {
                log::info!("Quit requested");
                self.input.push(event);
            }
            _ => self.input.push(event),
        }
    }

    /// False once quit was requested. Hosts stop scheduling frames.
    pub fn is_running(&self) -> bool {
        !self.input.quit_requested()
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot()
    }

    /// Forget the previous frame time (tab hidden, window resized)
    pub fn pause_clock(&mut self) {
        self.clock.reset();
    }

    /// Run one frame at animation timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let dt = self.clock.tick(now_ms);
        self.step(dt, now_ms)
    }

    /// Run one frame with a fixed `dt`. `timestamp` (ms) stamps leaderboard entries.
    pub fn step(&mut self, dt: f32, timestamp: f64) -> FrameReport {
        if !self.is_running() {
            return FrameReport::default();
        }

        let events = tick(&mut self.game, &self.input.take(), dt);
        let mut rank = None;
        for event in &events {
            let (hits, won) = match *event {
                GameEvent::Won { hits } => (hits, true),
                GameEvent::Missed { hits, .. } => (hits, false),
                _ => continue,
            };
            if let Some(r) = self.high_scores.add_score(hits, won, timestamp) {
                log::info!("New high score: {} hits (rank {})", hits, r);
                self.high_scores.save();
                rank = Some(r);
            }
        }

        FrameReport { events, rank }
    }
}
