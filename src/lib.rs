//! Pocket Arcade - embeddable canvas minigames
//!
//! Core modules:
//! - `game`: Lifecycle controller, frame loop, `Simulation` trait
//! - `events`: Typed publish/subscribe event bus
//! - `config`: Themeable game configuration with deep merge
//! - `canvas`: 2D drawing surface abstraction (plus a headless recorder)
//! - `snake` / `pong` / `breakout`: The three simulations

pub mod breakout;
pub mod canvas;
pub mod collision;
pub mod config;
pub mod events;
pub mod game;
pub mod input;
pub mod pong;
pub mod snake;

pub use breakout::Breakout;
pub use canvas::{Canvas, CanvasError, Context2d, HeadlessCanvas};
pub use config::{ConfigPatch, GameConfig};
pub use events::{EventKind, GameEvent};
pub use game::{Game, GameError, Phase, Simulation};
pub use input::{InputEvent, Key};
pub use pong::{Pong, PongMode};
pub use snake::Snake;

/// Gameplay tuning constants
pub mod consts {
    /// Snake grid cell size in pixels
    pub const SNAKE_CELL: f32 = 20.0;
    /// Seconds between snake grid steps
    pub const SNAKE_MOVE_INTERVAL: f32 = 0.15;
    /// Initial snake length in cells
    pub const SNAKE_START_LENGTH: usize = 3;

    /// Pong paddle dimensions
    pub const PONG_PADDLE_WIDTH: f32 = 12.0;
    pub const PONG_PADDLE_HEIGHT: f32 = 80.0;
    /// Pong paddle speed (pixels/sec while a key is held)
    pub const PONG_PADDLE_SPEED: f32 = 320.0;
    /// Gap between paddle and its canvas edge
    pub const PONG_PADDLE_MARGIN: f32 = 24.0;
    /// First player to this score wins
    pub const PONG_WIN_SCORE: i64 = 11;
    /// Fraction of full paddle speed the AI moves at
    pub const PONG_AI_SPEED_FACTOR: f32 = 0.7;
    /// AI ignores ball offsets smaller than this (pixels)
    pub const PONG_AI_DEADZONE: f32 = 12.0;

    /// Ball defaults (shared by Pong and Breakout)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 300.0;
    pub const BALL_MAX_SPEED: f32 = 900.0;
    /// Speed boost when ball hits a paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.05;
    /// Maximum deflection angle off a paddle (radians, ±60°)
    pub const MAX_DEFLECTION: f32 = std::f32::consts::FRAC_PI_3;
    /// Maximum serve angle off the serving axis (radians, ±30°)
    pub const SERVE_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Breakout brick grid
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_COLS: usize = 8;
    pub const BRICK_HEIGHT: f32 = 22.0;
    pub const BRICK_GAP: f32 = 4.0;
    /// Vertical offset of the brick grid from the canvas top
    pub const BRICK_TOP: f32 = 50.0;
    /// Score awarded per destroyed brick
    pub const BRICK_POINTS: i64 = 10;
    /// Breakout paddle dimensions
    pub const BREAKOUT_PADDLE_WIDTH: f32 = 90.0;
    pub const BREAKOUT_PADDLE_HEIGHT: f32 = 14.0;
    pub const BREAKOUT_PADDLE_SPEED: f32 = 420.0;
    /// Starting lives
    pub const BREAKOUT_LIVES: u8 = 3;

    /// Ceiling for the animation-speed config multiplier
    pub const MAX_ANIMATION_SPEED: f32 = 10.0;
}
