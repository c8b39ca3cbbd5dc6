//! Recorded frame of draw calls
//!
//! `DrawList` implements `Renderer` by remembering what was drawn. The GPU
//! pipeline replays the circles, the DOM overlay replays the text, and tests
//! inspect it directly.

use std::collections::HashMap;

use glam::Vec2;

use super::{Color, Renderer, TextExtent};

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        content: String,
        size: u32,
        color: Color,
        position: Vec2,
        extent: TextExtent,
    },
}

/// Per-size metrics of the overlay's monospace font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Horizontal advance per character (px)
    pub advance: f32,
    /// Line box height (px)
    pub line_height: f32,
}

impl FontMetrics {
    pub fn for_size(size: u32) -> Self {
        let size = size as f32;
        Self {
            advance: size * 0.6,
            line_height: size * 1.2,
        }
    }

    pub fn measure(&self, content: &str) -> TextExtent {
        let lines = content.lines().count().max(1);
        let longest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        TextExtent {
            width: longest as f32 * self.advance,
            height: lines as f32 * self.line_height,
        }
    }
}

/// Renderer that records a frame instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    pending: Vec<DrawCommand>,
    frame: Vec<DrawCommand>,
    /// Font metrics, cached per pixel size
    fonts: HashMap<u32, FontMetrics>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Last presented frame
    pub fn frame(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// Background of the last presented frame (last clear wins)
    pub fn clear_color(&self) -> Color {
        self.frame
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                DrawCommand::Clear(color) => Some(*color),
                _ => None,
            })
            .unwrap_or(Color::BLACK)
    }

    /// Circles drawn since the last clear, in draw order
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.since_last_clear().iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    /// Text drawn since the last clear, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.since_last_clear()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Text { .. }))
    }

    fn since_last_clear(&self) -> &[DrawCommand] {
        let start = self
            .frame
            .iter()
            .rposition(|cmd| matches!(cmd, DrawCommand::Clear(_)))
            .unwrap_or(0);
        &self.frame[start..]
    }

    fn font(&mut self, size: u32) -> FontMetrics {
        *self.fonts.entry(size).or_insert_with(|| {
            log::debug!("Caching font metrics for size {}", size);
            FontMetrics::for_size(size)
        })
    }

    #[cfg(test)]
    pub(crate) fn cached_font_sizes(&self) -> usize {
        self.fonts.len()
    }
}

impl Renderer for DrawList {
    fn screen_size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.pending.push(DrawCommand::Clear(color));
    }

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.pending.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn measure_text(&mut self, content: &str, size: u32) -> TextExtent {
        self.font(size).measure(content)
    }

    fn draw_text(&mut self, content: &str, size: u32, color: Color, position: Vec2) -> TextExtent {
        let extent = self.measure_text(content, size);
        self.pending.push(DrawCommand::Text {
            content: content.to_string(),
            size,
            color,
            position,
            extent,
        });
        extent
    }

    fn present(&mut self) {
        self.frame = std::mem::take(&mut self.pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_visible_until_present() {
        let mut list = DrawList::new(100.0, 100.0);
        list.clear(Color::WHITE);
        list.draw_filled_circle(Vec2::ZERO, 5.0, Color::BLACK);
        assert!(list.frame().is_empty());

        list.present();
        assert_eq!(list.frame().len(), 2);
        assert_eq!(list.clear_color(), Color::WHITE);
        assert_eq!(list.circles().count(), 1);

        // Next frame starts empty
        list.present();
        assert!(list.frame().is_empty());
    }

    #[test]
    fn test_font_metrics_cached_per_size() {
        let mut list = DrawList::new(100.0, 100.0);
        list.measure_text("abc", 48);
        list.measure_text("defg", 48);
        list.draw_text("x", 64, Color::WHITE, Vec2::ZERO);
        assert_eq!(list.cached_font_sizes(), 2);
    }

    #[test]
    fn test_measure_scales_with_size_and_length() {
        let mut list = DrawList::new(100.0, 100.0);
        let small = list.measure_text("12", 32);
        let big = list.measure_text("12", 64);
        let long = list.measure_text("1234", 32);
        assert!((big.width - small.width * 2.0).abs() < 1e-4);
        assert!((long.width - small.width * 2.0).abs() < 1e-4);
        assert_eq!(small.height, big.height / 2.0);
    }

    #[test]
    fn test_resize_changes_screen_size() {
        let mut list = DrawList::new(100.0, 100.0);
        list.resize(640.0, 480.0);
        assert_eq!(list.screen_size(), Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_circles_after_last_clear_only() {
        let mut list = DrawList::new(100.0, 100.0);
        list.draw_filled_circle(Vec2::ONE, 1.0, Color::WHITE);
        list.clear(Color::BLACK);
        list.draw_filled_circle(Vec2::ZERO, 2.0, Color::WHITE);
        list.present();
        let circles: Vec<_> = list.circles().collect();
        assert_eq!(circles, vec![(Vec2::ZERO, 2.0, Color::WHITE)]);
    }
}
