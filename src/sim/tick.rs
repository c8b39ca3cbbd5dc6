//! State machine transitions and the per-frame tick
//!
//! `handle_action` is the only way player input changes the game; `advance`
//! moves the reticle. The host calls `tick` once per frame with the actions
//! that arrived since the last frame.

use super::state::{Game, GameEvent, GamePhase};
use crate::{angular_distance, normalize_angle};

/// Input collected for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Action presses this frame, processed in order
    pub actions: u32,
    /// Demo mode - the game presses action for the player
    pub autopilot: bool,
}

impl Game {
    /// React to one action press. Performs at most one transition.
    pub fn handle_action(&mut self) -> GameEvent {
        match self.session.phase {
            GamePhase::Start | GamePhase::Win | GamePhase::Lose => {
                self.start_run();
                log::info!(
                    "Run started (reticle {:.3}, target {:.3})",
                    self.session.reticle_angle,
                    self.session.target_angle
                );
                GameEvent::RunStarted
            }
            GamePhase::Playing => {
                let session = &mut self.session;
                let distance = angular_distance(session.reticle_angle, session.target_angle);
                log::debug!("Lock attempt: distance {:.4}", distance);

                if distance < self.params.hit_threshold {
                    session.hits += 1;
                    if session.hits >= self.params.max_hits {
                        session.phase = GamePhase::Win;
                        log::info!("Run won with {} hits", session.hits);
                        GameEvent::Won { hits: session.hits }
                    } else {
                        session.pick_target(&self.params, &mut self.rng);
                        GameEvent::Hit {
                            hits: session.hits,
                            distance,
                        }
                    }
                } else {
                    session.phase = GamePhase::Lose;
                    log::info!("Run lost at {} hits (missed by {:.3})", session.hits, distance);
                    GameEvent::Missed {
                        hits: session.hits,
                        distance,
                    }
                }
            }
        }
    }

    /// Move the reticle by `dt` seconds. Only has an effect while playing.
    ///
    /// `dt` is trusted: the host clamps it to `consts::MAX_FRAME_DT`.
    pub fn advance(&mut self, dt: f32) {
        if self.session.phase != GamePhase::Playing {
            return;
        }
        let speed = self.params.angular_speed(self.progress());
        let session = &mut self.session;
        session.reticle_angle =
            normalize_angle(session.reticle_angle + session.direction() * speed * dt);
    }

    /// Whether the demo player would press action right now
    pub fn autopilot_wants_action(&self) -> bool {
        match self.session.phase {
            GamePhase::Playing => {
                angular_distance(self.session.reticle_angle, self.session.target_angle)
                    < self.params.hit_threshold * 0.5
            }
            _ => true,
        }
    }
}

/// Advance the game by one frame: queued actions first, then movement
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::with_capacity(input.actions as usize + 1);

    for _ in 0..input.actions {
        events.push(game.handle_action());
    }
    if input.autopilot && input.actions == 0 && game.autopilot_wants_action() {
        events.push(game.handle_action());
    }

    game.advance(dt);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use std::f32::consts::TAU;

    const DT: f32 = 1.0 / TARGET_FPS as f32;

    fn playing_game() -> Game {
        let mut game = Game::new(12345);
        game.handle_action();
        assert_eq!(game.phase(), GamePhase::Playing);
        game
    }

    #[test]
    fn test_start_to_playing() {
        let mut game = Game::new(12345);
        assert_eq!(game.phase(), GamePhase::Start);

        let event = game.handle_action();
        assert_eq!(event, GameEvent::RunStarted);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session.hits, 0);

        let (lo, hi) = game.params.target_offset_range(0.0);
        let along = normalize_angle(game.session.target_angle - game.session.reticle_angle);
        assert!(along >= lo - 1e-4 && along <= hi + 1e-4);
    }

    #[test]
    fn test_hit_keeps_playing() {
        let mut game = playing_game();
        game.session.reticle_angle = 0.0;
        game.session.target_angle = 0.1;

        let event = game.handle_action();
        assert!(matches!(event, GameEvent::Hit { hits: 1, .. }));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session.hits, 1);

        // Odd hit count sweeps backwards, so the new target is behind the reticle
        let (lo, hi) = game.params.target_offset_range(game.progress());
        let along = normalize_angle(game.session.reticle_angle - game.session.target_angle);
        assert!(along >= lo - 1e-4 && along <= hi + 1e-4);
    }

    #[test]
    fn test_hit_across_zero() {
        let mut game = playing_game();
        game.session.reticle_angle = TAU - 0.05;
        game.session.target_angle = 0.05;
        assert!(matches!(game.handle_action(), GameEvent::Hit { .. }));
    }

    #[test]
    fn test_miss_loses() {
        let mut game = playing_game();
        game.session.reticle_angle = 0.0;
        game.session.target_angle = 1.0;

        let event = game.handle_action();
        assert!(matches!(event, GameEvent::Missed { hits: 0, .. }));
        assert_eq!(game.phase(), GamePhase::Lose);
    }

    #[test]
    fn test_exact_threshold_is_miss() {
        let mut game = playing_game();
        game.session.reticle_angle = 0.0;
        game.session.target_angle = 0.5;
        game.params.hit_threshold = 0.5;
        game.handle_action();
        assert_eq!(game.phase(), GamePhase::Lose);
    }

    #[test]
    fn test_final_hit_wins_without_new_target() {
        let mut game = playing_game();
        game.session.hits = MAX_HIT_COUNT - 1;
        game.session.reticle_angle = 2.0;
        game.session.target_angle = 2.05;

        let event = game.handle_action();
        assert_eq!(event, GameEvent::Won { hits: MAX_HIT_COUNT });
        assert_eq!(game.phase(), GamePhase::Win);
        assert_eq!(game.session.hits, MAX_HIT_COUNT);
        assert_eq!(game.session.target_angle, 2.05);
    }

    #[test]
    fn test_restart_from_win_and_lose() {
        for end in [GamePhase::Win, GamePhase::Lose] {
            let mut game = playing_game();
            game.session.hits = 12;
            game.session.phase = end;

            assert_eq!(game.handle_action(), GameEvent::RunStarted);
            assert_eq!(game.phase(), GamePhase::Playing);
            assert_eq!(game.session.hits, 0);
            assert!((0.0..TAU).contains(&game.session.reticle_angle));
            assert!((0.0..TAU).contains(&game.session.target_angle));
        }
    }

    #[test]
    fn test_advance_moves_with_direction() {
        let mut game = playing_game();
        game.session.reticle_angle = 1.0;
        game.advance(0.5);
        // Progress 0: 1.5 rad/s forward
        assert!((game.session.reticle_angle - 1.75).abs() < 1e-5);

        game.session.hits = 1;
        game.session.reticle_angle = 0.01;
        game.advance(0.1);
        let speed = game.params.angular_speed(game.progress());
        let expected = normalize_angle(0.01 - speed * 0.1);
        assert!((game.session.reticle_angle - expected).abs() < 1e-5);
        assert!(game.session.reticle_angle > TAU / 2.0);
    }

    #[test]
    fn test_advance_ignored_outside_playing() {
        for phase in [GamePhase::Start, GamePhase::Win, GamePhase::Lose] {
            let mut game = Game::new(3);
            game.session.phase = phase;
            let before = game.session.clone();
            for dt in [0.0, DT, 0.1, 10.0] {
                game.advance(dt);
            }
            assert_eq!(game.session, before);
        }
    }

    #[test]
    fn test_tick_processes_actions_then_advances() {
        let mut game = Game::new(8);
        let input = TickInput {
            actions: 1,
            ..Default::default()
        };
        let events = tick(&mut game, &input, DT);
        assert_eq!(events, vec![GameEvent::RunStarted]);
        assert_eq!(game.phase(), GamePhase::Playing);

        let reticle = game.session.reticle_angle;
        let events = tick(&mut game, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert!(angular_distance(reticle, game.session.reticle_angle) > 0.0);
    }

    #[test]
    fn test_hits_never_decrease_within_run() {
        let mut game = playing_game();
        let mut last = 0;
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..TARGET_FPS * 30 {
            tick(&mut game, &input, DT);
            if game.phase() != GamePhase::Playing {
                break;
            }
            assert!(game.session.hits >= last);
            last = game.session.hits;
        }
    }

    #[test]
    fn test_autopilot_wins_a_run() {
        let mut game = Game::new(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut won = false;
        for _ in 0..TARGET_FPS * 120 {
            let events = tick(&mut game, &input, DT);
            if events.iter().any(|e| matches!(e, GameEvent::Won { .. })) {
                won = true;
                break;
            }
            assert_ne!(game.phase(), GamePhase::Lose);
        }
        assert!(won);
        assert_eq!(game.session.hits, MAX_HIT_COUNT);
    }
}
