//! Platform abstraction layer
//!
//! The pieces of the host loop that are the same on every platform:
//! - Frame clock (timestamps in, clamped frame delta out)
//! - Input events (key names in, game input out)
//! - `Driver`, which owns the game and runs frames for either host

mod driver;

pub use driver::{Driver, FrameReport};

use crate::consts::{MAX_FRAME_DT, TARGET_FPS};
use crate::settings::SettingChange;
use crate::sim::TickInput;

/// Discrete input the host cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Lock / start / restart
    Action,
    /// Toggle demo mode
    ToggleAutopilot,
    /// Leave the host loop
    Quit,
    /// Change a player setting
    Setting(SettingChange),
}

/// Map a DOM-style key name to an input event
pub fn map_key(key: &str) -> Option<InputEvent> {
    match key {
        " " | "Space" | "Enter" => Some(InputEvent::Action),
        "i" | "I" => Some(InputEvent::ToggleAutopilot),
        "Escape" | "q" | "Q" => Some(InputEvent::Quit),
        "f" | "F" => Some(InputEvent::Setting(SettingChange::ToggleFps)),
        "b" | "B" => Some(InputEvent::Setting(SettingChange::ToggleMuteOnBlur)),
        "r" | "R" => Some(InputEvent::Setting(SettingChange::ToggleReducedMotion)),
        "c" | "C" => Some(InputEvent::Setting(SettingChange::ToggleHighContrast)),
        "+" | "=" => Some(InputEvent::Setting(SettingChange::VolumeUp)),
        "-" | "_" => Some(InputEvent::Setting(SettingChange::VolumeDown)),
        _ => None,
    }
}

/// Accumulates one frame's input events into a `TickInput`
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    input: TickInput,
    quit: bool,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Action => self.input.actions += 1,
            InputEvent::ToggleAutopilot => {
                self.input.autopilot = !self.input.autopilot;
                log::info!("Autopilot: {}", self.input.autopilot);
            }
            InputEvent::Quit => self.quit = true,
            // Settings apply immediately and never reach the tick
            InputEvent::Setting(_) => {}
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Hand this frame's input to the tick. Presses are one-shot; the
    /// autopilot toggle persists.
    pub fn take(&mut self) -> TickInput {
        let input = self.input.clone();
        self.input.actions = 0;
        input
    }
}

/// Turns frame timestamps (ms) into clamped deltas (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, in [0, MAX_FRAME_DT].
    /// The first frame reports one nominal frame.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => frame_interval(),
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Nominal frame length at the target frame rate (s)
#[inline]
pub fn frame_interval() -> f32 {
    1.0 / TARGET_FPS as f32
}

/// Rolling FPS estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % 60;

        // Oldest sample is the one we'll overwrite next; 59 intervals back
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time_ms - oldest_time;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(" "), Some(InputEvent::Action));
        assert_eq!(map_key("Enter"), Some(InputEvent::Action));
        assert_eq!(map_key("Escape"), Some(InputEvent::Quit));
        assert_eq!(map_key("i"), Some(InputEvent::ToggleAutopilot));
        assert_eq!(
            map_key("c"),
            Some(InputEvent::Setting(SettingChange::ToggleHighContrast))
        );
        assert_eq!(map_key("+"), Some(InputEvent::Setting(SettingChange::VolumeUp)));
        assert_eq!(map_key("x"), None);
    }

    #[test]
    fn test_queue_counts_presses_and_resets() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::Action);
        queue.push(InputEvent::Action);
        queue.push(InputEvent::ToggleAutopilot);

        let input = queue.take();
        assert_eq!(input.actions, 2);
        assert!(input.autopilot);

        let input = queue.take();
        assert_eq!(input.actions, 0);
        assert!(input.autopilot);
        assert!(!queue.quit_requested());

        queue.push(InputEvent::Quit);
        assert!(queue.quit_requested());
    }

    #[test]
    fn test_clock_clamps_spikes() {
        let mut clock = FrameClock::new();
        assert!((clock.tick(1000.0) - frame_interval()).abs() < 1e-6);
        assert!((clock.tick(1016.0) - 0.016).abs() < 1e-6);
        // Tab was hidden for five seconds
        assert_eq!(clock.tick(6016.0), MAX_FRAME_DT);
        // Timestamps going backwards never produce negative time
        assert_eq!(clock.tick(6000.0), 0.0);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.reset();
        assert!((clock.tick(50_000.0) - frame_interval()).abs() < 1e-6);
    }

    #[test]
    fn test_fps_counter_steady_rate() {
        let mut counter = FpsCounter::default();
        let mut fps = 0;
        for i in 1..=120 {
            fps = counter.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps, 60);
    }
}
