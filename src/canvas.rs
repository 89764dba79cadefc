//! Drawing surface abstraction
//!
//! A `Canvas` hands out its layout size and a 2D drawing context; the
//! simulations render through the `Context2d` trait and never touch the
//! surface directly. `HeadlessCanvas` records draw commands instead of
//! drawing, which is how the native demo and the tests run without a browser.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::collision::Rect;

/// Why a surface could not be turned into a drawing context.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// The surface has no layout area (zero or negative dimensions).
    ZeroSized,
    /// The surface is not a valid canvas element.
    NotACanvas,
    /// The surface exists but refused to produce a 2D context.
    ContextUnavailable,
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::ZeroSized => write!(f, "canvas element required: surface has no drawable area"),
            CanvasError::NotACanvas => write!(f, "not a valid canvas element"),
            CanvasError::ContextUnavailable => write!(f, "failed to get 2D rendering context"),
        }
    }
}

impl std::error::Error for CanvasError {}

/// A canvas-like surface the lifecycle controller can bind to.
pub trait Canvas {
    /// Layout size in pixels (the backing store is sized from this once, at
    /// construction).
    fn size(&self) -> Vec2;

    /// Consume the surface and produce its 2D drawing context.
    fn into_context_2d(self) -> Result<Box<dyn Context2d>, CanvasError>;
}

/// The 2D drawing primitives the simulations render with.
pub trait Context2d {
    /// Fill the whole surface with a color.
    fn clear(&mut self, size: Vec2, color: &str);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    /// Draw text with its top-left corner at `pos`.
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, font: &str, color: &str);
}

/// A recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        size: Vec2,
        color: String,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: String,
    },
    FillText {
        text: String,
        pos: Vec2,
        size: f32,
        font: String,
        color: String,
    },
}

/// An in-memory canvas that records draw commands instead of rasterizing.
pub struct HeadlessCanvas {
    size: Vec2,
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl HeadlessCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the command log; clone before handing the canvas to a
    /// game to inspect what was drawn.
    pub fn commands(&self) -> Rc<RefCell<Vec<DrawCommand>>> {
        self.commands.clone()
    }
}

impl Canvas for HeadlessCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn into_context_2d(self) -> Result<Box<dyn Context2d>, CanvasError> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(CanvasError::ZeroSized);
        }
        Ok(Box::new(RecordingContext {
            commands: self.commands,
        }))
    }
}

struct RecordingContext {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl Context2d for RecordingContext {
    fn clear(&mut self, size: Vec2, color: &str) {
        self.commands.borrow_mut().push(DrawCommand::Clear {
            size,
            color: color.into(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.borrow_mut().push(DrawCommand::FillRect {
            rect,
            color: color.into(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.commands.borrow_mut().push(DrawCommand::StrokeRect {
            rect,
            color: color.into(),
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.borrow_mut().push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.into(),
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, font: &str, color: &str) {
        self.commands.borrow_mut().push(DrawCommand::FillText {
            text: text.into(),
            pos,
            size,
            font: font.into(),
            color: color.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_canvas_records_commands() {
        let canvas = HeadlessCanvas::new(100.0, 50.0);
        let commands = canvas.commands();
        let mut ctx = canvas.into_context_2d().unwrap();

        ctx.clear(Vec2::new(100.0, 50.0), "#000");
        ctx.fill_circle(Vec2::new(10.0, 10.0), 4.0, "#fff");

        let log = commands.borrow();
        assert_eq!(log.len(), 2);
        assert!(matches!(log[0], DrawCommand::Clear { .. }));
        assert!(matches!(log[1], DrawCommand::FillCircle { radius, .. } if radius == 4.0));
    }

    #[test]
    fn zero_sized_canvas_has_no_context() {
        let canvas = HeadlessCanvas::new(0.0, 600.0);
        assert_eq!(
            canvas.into_context_2d().err(),
            Some(CanvasError::ZeroSized)
        );
    }

    #[test]
    fn error_messages_name_the_failure() {
        assert!(CanvasError::NotACanvas.to_string().contains("not a valid canvas"));
        assert!(
            CanvasError::ContextUnavailable
                .to_string()
                .contains("2D rendering context")
        );
        assert!(CanvasError::ZeroSized.to_string().contains("canvas element required"));
    }
}
