/// Drawing capability injected into the simulation.
///
/// The world only ever talks to a `Surface`; it never knows whether pixels end
/// up in a terminal, a canvas, or a test recorder.

use glam::Vec2;

use crate::entities::{Rect, Rgb, Sprite, SpriteKind};

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Blit a sprite scaled into `dest`.
    fn draw_image(&mut self, sprite: &Sprite, dest: Rect);

    /// Filled circle composited at `alpha` over whatever is below it.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);

    fn fill_text(&mut self, text: &str, at: Vec2, color: Rgb);
}

/// Discards every draw call.  Useful for headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn fill_rect(&mut self, _rect: Rect, _color: Rgb) {}
    fn draw_image(&mut self, _sprite: &Sprite, _dest: Rect) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgb, _alpha: f32) {}
    fn fill_text(&mut self, _text: &str, _at: Vec2, _color: Rgb) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Rect { rect: Rect, color: Rgb },
    Image { kind: SpriteKind, dest: Rect },
    Circle { center: Vec2, radius: f32, color: Rgb, alpha: f32 },
    Text { text: String, at: Vec2, color: Rgb },
}

/// Keeps every draw call in order.  `clear` between frames to inspect one.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn images(&self, kind: SpriteKind) -> impl Iterator<Item = &Rect> + '_ {
        self.calls.iter().filter_map(move |c| match c {
            DrawCall::Image { kind: k, dest } if *k == kind => Some(dest),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.calls.push(DrawCall::Rect { rect, color });
    }

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect) {
        self.calls.push(DrawCall::Image {
            kind: sprite.kind,
            dest,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, color: Rgb) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            at,
            color,
        });
    }
}
