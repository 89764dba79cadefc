//! Axis-aligned collision helpers shared by the paddle games
//!
//! Everything here is O(1) bounding-box math: rect/rect and circle/rect
//! overlap plus the paddle-strike deflection mapping that drives both Pong's
//! and Breakout's bounce angles.

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Does a circle overlap an axis-aligned rect?
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = Vec2::new(
        center.x.clamp(rect.x, rect.right()),
        center.y.clamp(rect.y, rect.bottom()),
    );
    (center - closest).length_squared() <= radius * radius
}

/// Unit direction for a ball leaving a paddle.
///
/// `hit` is the strike position relative to the paddle center, normalized to
/// [-1, 1] along the paddle's long axis; it maps linearly to an exit angle in
/// [-max_angle, max_angle]. `axis` is the outgoing direction perpendicular to
/// the paddle face (e.g. `Vec2::X` for Pong's left paddle, `-Vec2::Y` for
/// Breakout) and `long` the paddle's long axis oriented so positive `hit`
/// deflects toward it (both unit).
pub fn paddle_deflection(hit: f32, max_angle: f32, axis: Vec2, long: Vec2) -> Vec2 {
    let angle = hit.clamp(-1.0, 1.0) * max_angle;
    (axis * angle.cos() + long * angle.sin()).normalize()
}
