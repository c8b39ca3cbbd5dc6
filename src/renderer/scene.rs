//! Draws the game onto a `Renderer`

use glam::Vec2;

use super::{Color, Renderer};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{Game, GamePhase};
use crate::direction_vector;

const TITLE_SIZE: u32 = 64;
const PROMPT_SIZE: u32 = 48;
const COUNT_SIZE: u32 = 64;
const BEST_SIZE: u32 = 32;
const TITLE_POS: Vec2 = Vec2::new(10.0, 100.0);
const PROMPT_POS: Vec2 = Vec2::new(10.0, 300.0);
const BEST_POS: Vec2 = Vec2::new(10.0, 400.0);

/// Screen-space geometry of the ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub center: Vec2,
    /// Half the smaller screen dimension; marker radii are fractions of this
    pub min_radius: f32,
    /// Radius the markers orbit on, keeping the larger marker on screen
    pub orbit_radius: f32,
}

impl BoardLayout {
    pub fn for_screen(size: Vec2) -> Self {
        let min_radius = size.x.min(size.y) / 2.0;
        Self {
            center: size / 2.0,
            min_radius,
            orbit_radius: min_radius * (1.0 - TARGET_RADIUS.max(RETICLE_RADIUS)),
        }
    }

    /// Screen position of a marker at `angle`
    pub fn marker_position(&self, angle: f32) -> Vec2 {
        self.center + direction_vector(angle) * self.orbit_radius
    }
}

/// Background for the current phase
pub fn background_color(game: &Game, settings: &Settings) -> Color {
    if settings.high_contrast {
        return Color::BLACK;
    }
    let start = Color::rgb8(START_COLOR);
    let end = Color::rgb8(END_COLOR);
    match game.phase() {
        GamePhase::Start => start,
        GamePhase::Playing if settings.reduced_motion => start,
        GamePhase::Playing => start.lerp(end, game.progress()),
        GamePhase::Win => end,
        GamePhase::Lose => Color::rgb8(LOSE_COLOR),
    }
}

/// Render one frame of the game and present it
pub fn draw_game<R: Renderer>(
    renderer: &mut R,
    game: &Game,
    settings: &Settings,
    high_scores: &HighScores,
) {
    let text = Color::rgb8(TEXT_COLOR);
    renderer.clear(background_color(game, settings));

    match game.phase() {
        GamePhase::Start => {
            renderer.draw_text("Pop the Lock!", TITLE_SIZE, text, TITLE_POS);
            renderer.draw_text("Press SPACE to start", PROMPT_SIZE, text, PROMPT_POS);
            draw_best(renderer, high_scores);
        }
        GamePhase::Playing => {
            draw_board(renderer, game);
            draw_count(renderer, game);
        }
        GamePhase::Win => {
            renderer.draw_text("You Win!", TITLE_SIZE, text, TITLE_POS);
            renderer.draw_text("Press SPACE to play again", PROMPT_SIZE, text, PROMPT_POS);
            draw_best(renderer, high_scores);
        }
        GamePhase::Lose => {
            draw_board(renderer, game);
            draw_count(renderer, game);
            renderer.draw_text("Press SPACE to play again", PROMPT_SIZE, text, PROMPT_POS);
            draw_best(renderer, high_scores);
        }
    }

    renderer.present();
}

fn draw_board<R: Renderer>(renderer: &mut R, game: &Game) {
    let layout = BoardLayout::for_screen(renderer.screen_size());
    // Target first so the reticle sits on top of it
    renderer.draw_filled_circle(
        layout.marker_position(game.session.target_angle),
        TARGET_RADIUS * layout.min_radius,
        Color::rgb8(TARGET_COLOR),
    );
    renderer.draw_filled_circle(
        layout.marker_position(game.session.reticle_angle),
        RETICLE_RADIUS * layout.min_radius,
        Color::rgb8(RETICLE_COLOR),
    );
}

fn draw_count<R: Renderer>(renderer: &mut R, game: &Game) {
    let center = renderer.screen_size() / 2.0;
    let count = game.session.hits.to_string();
    let extent = renderer.measure_text(&count, COUNT_SIZE);
    renderer.draw_text(
        &count,
        COUNT_SIZE,
        Color::rgb8(TEXT_COLOR),
        center - extent.size() / 2.0,
    );
}

fn draw_best<R: Renderer>(renderer: &mut R, high_scores: &HighScores) {
    if let Some(best) = high_scores.top_score() {
        let label = format!("Best: {}", best);
        renderer.draw_text(&label, BEST_SIZE, Color::rgb8(TEXT_COLOR), BEST_POS);
    }
}
