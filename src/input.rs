//! Input event model
//!
//! The host forwards keyboard and pointer events into the bound game; the
//! controller routes them to the active simulation only between `init` and
//! `cleanup`. Events are generic - the simulations decide what each key means.

use std::collections::HashSet;

use glam::Vec2;

/// Keys the simulations react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unknown keys return `None`.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            " " | "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

/// A single input event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
}

/// Held-key and pointer state, rebuilt from the event stream.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    pointer: Option<Vec2>,
    dragging: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.pressed.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.pressed.remove(&key);
            }
            InputEvent::PointerDown { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                self.dragging = true;
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
            }
            InputEvent::PointerUp => {
                self.dragging = false;
            }
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Last known pointer position, if any.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// True while a pointer drag is in progress.
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// -1/0/+1 from a pair of opposing keys (negative key first).
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.is_down(negative) {
            value -= 1.0;
        }
        if self.is_down(positive) {
            value += 1.0;
        }
        value
    }

    /// Drop all held state (used on cleanup so keys don't stick across runs).
    pub fn clear(&mut self) {
        self.pressed.clear();
        self.pointer = None;
        self.dragging = false;
    }
}
