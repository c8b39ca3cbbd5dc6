//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// New run begins
    Start,
    /// Lock landed; pitch rises with progress (0-1)
    Hit { progress: f32 },
    /// Final lock landed
    Win,
    /// Lock missed
    Lose,
    /// Run made the leaderboard
    HighScore,
}

impl SoundEffect {
    /// Effect for a state machine event
    pub fn for_event(event: GameEvent, max_hits: u32) -> Self {
        match event {
            GameEvent::RunStarted => SoundEffect::Start,
            GameEvent::Hit { hits, .. } => SoundEffect::Hit {
                progress: hits as f32 / max_hits as f32,
            },
            GameEvent::Won { .. } => SoundEffect::Win,
            GameEvent::Missed { .. } => SoundEffect::Lose,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set output volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::Hit { progress } => self.play_hit(ctx, vol, progress),
            SoundEffect::Win => self.play_win(ctx, vol),
            SoundEffect::Lose => self.play_lose(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short blip at `freq` starting `delay` seconds from now
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        delay: f64,
        length: f64,
        level: f32,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.02).ok();
    }

    /// Run start - rising two-note chirp
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 440.0, 0.0, 0.08, vol * 0.3, OscillatorType::Triangle);
        self.blip(ctx, 660.0, 0.08, 0.1, vol * 0.3, OscillatorType::Triangle);
    }

    /// Lock - click whose pitch climbs over the run
    fn play_hit(&self, ctx: &AudioContext, vol: f32, progress: f32) {
        let freq = 500.0 + 700.0 * progress.clamp(0.0, 1.0);
        self.blip(ctx, freq, 0.0, 0.06, vol * 0.4, OscillatorType::Square);
    }

    /// Win - major arpeggio
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
            self.blip(ctx, freq, i as f64 * 0.12, 0.25, vol * 0.35, OscillatorType::Triangle);
        }
    }

    /// Lose - descending buzz
    fn play_lose(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.55).ok();
    }

    /// High score - quick sparkle on top of the end sound
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [1318.5, 1568.0, 2093.0].into_iter().enumerate() {
            self.blip(ctx, freq, 0.5 + i as f64 * 0.07, 0.12, vol * 0.2, OscillatorType::Sine);
        }
    }
}
