//! Presentation layer
//!
//! The simulation never draws. `scene` reads the game's public state and
//! issues calls on a `Renderer`; `DrawList` records those calls, and the
//! WebGPU pipeline turns a recorded frame into pixels (text goes to a DOM
//! overlay on the web).

pub mod draw_list;
pub mod scene;
#[cfg(target_arch = "wasm32")]
pub mod sdf_pipeline;

pub use draw_list::{DrawCommand, DrawList, FontMetrics};
pub use scene::{BoardLayout, draw_game};
#[cfg(target_arch = "wasm32")]
pub use sdf_pipeline::SdfRenderState;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp;

/// RGBA color, sRGB components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
            1.0,
        )
    }

    /// Component-wise interpolation
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }

    /// Linear-light components for an sRGB surface
    pub fn to_linear(self) -> [f32; 4] {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b), self.a]
    }

    /// Components to write to a surface; sRGB formats expect linear light
    pub fn to_surface(self, srgb: bool) -> [f32; 4] {
        if srgb {
            self.to_linear()
        } else {
            [self.r, self.g, self.b, self.a]
        }
    }

    /// CSS `rgb()` string for DOM text
    pub fn to_css(self) -> String {
        format!(
            "rgb({}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }
}

/// Size of a rendered text block in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Drawing surface the scene is rendered onto
pub trait Renderer {
    /// Drawable area in pixels
    fn screen_size(&self) -> Vec2;

    fn clear(&mut self, color: Color);

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Extent `content` would occupy at `size` pixels
    fn measure_text(&mut self, content: &str, size: u32) -> TextExtent;

    /// Draw text with its top-left corner at `position`
    fn draw_text(&mut self, content: &str, size: u32, color: Color, position: Vec2) -> TextExtent;

    /// Finish the frame
    fn present(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::rgb8([0, 128, 0]);
        let b = Color::rgb8([64, 128, 255]);
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!((end.b - 1.0).abs() < 1e-6);
        assert!((end.r - 64.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb8([0xf0, 0x40, 0x40]).to_css(), "rgb(240, 64, 64)");
    }

    #[test]
    fn test_linear_conversion_keeps_extremes() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0, 1.0]);
        let white = Color::WHITE.to_linear();
        assert!((white[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_surface_components_follow_format() {
        let mid = Color::new(0.5, 0.5, 0.5, 1.0);
        assert_eq!(mid.to_surface(false), [0.5, 0.5, 0.5, 1.0]);
        // Linear light is darker than the encoded value
        assert!(mid.to_surface(true)[0] < 0.25);
        assert_eq!(mid.to_surface(true), mid.to_linear());
    }
}
