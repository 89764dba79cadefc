//! Pong simulation
//!
//! Continuous ball integration (no accumulator): position advances by
//! direction × speed × elapsed time every frame. The scalar speed grows 5%
//! on each paddle contact, which is the entire difficulty ramp. The right
//! paddle is AI, a second human, or stationary depending on the mode.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Context2d};
use crate::collision::{Rect, circle_intersects_rect, paddle_deflection};
use crate::config::{ConfigPatch, GameConfig};
use crate::consts::*;
use crate::game::{Game, GameContext, GameError, Simulation};
use crate::input::{InputEvent, InputState, Key};

/// Who controls the right paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PongMode {
    /// Human vs position-tracking AI
    #[default]
    PvAi,
    /// Two humans on one keyboard
    PvP,
    /// No opponent; the right paddle never moves
    Practice,
}

#[derive(Debug, Clone, Copy)]
struct Ball {
    pos: Vec2,
    /// Unit direction; scalar speed is tracked separately so paddle hits can
    /// ramp it without renormalizing
    dir: Vec2,
    speed: f32,
    radius: f32,
}

/// Serializable snapshot of a pong run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PongSnapshot {
    pub mode: PongMode,
    pub left_paddle: Rect,
    pub right_paddle: Rect,
    pub ball_pos: Vec2,
    pub ball_velocity: Vec2,
    pub ball_radius: f32,
    /// Scores for player 1 (left) and player 2 (right)
    pub scores: [i64; 2],
}

/// The pong game.
pub struct Pong {
    mode: PongMode,
    seed: u64,
    rng: Pcg32,
    size: Vec2,
    left: Rect,
    right: Rect,
    ball: Ball,
    scores: [i64; 2],
    input: InputState,
}

impl Pong {
    pub fn new(mode: PongMode) -> Self {
        Self::seeded(mode, rand::rng().random())
    }

    /// Deterministic serve angles for a given seed.
    pub fn seeded(mode: PongMode, seed: u64) -> Self {
        Self {
            mode,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            size: Vec2::ZERO,
            left: Rect::default(),
            right: Rect::default(),
            ball: Ball {
                pos: Vec2::ZERO,
                dir: Vec2::X,
                speed: BALL_START_SPEED,
                radius: BALL_RADIUS,
            },
            scores: [0, 0],
            input: InputState::new(),
        }
    }

    /// Reset the ball to center, serving toward `side` (-1 left, +1 right)
    /// at a random shallow angle.
    fn serve(&mut self, side: f32) {
        let angle = self.rng.random_range(-SERVE_ANGLE..SERVE_ANGLE);
        self.ball.pos = self.size / 2.0;
        self.ball.dir = Vec2::new(side.signum() * angle.cos(), angle.sin());
        self.ball.speed = BALL_START_SPEED;
    }

    fn move_paddles(&mut self, dt: f32) {
        let step = PONG_PADDLE_SPEED * dt;

        let mut left_axis = self.input.axis(Key::W, Key::S);
        if self.mode != PongMode::PvP {
            // Arrows also steer the human paddle when there's no second player
            left_axis += self.input.axis(Key::ArrowUp, Key::ArrowDown);
            left_axis = left_axis.clamp(-1.0, 1.0);
        }
        self.left.y += left_axis * step;

        match self.mode {
            PongMode::PvP => {
                let right_axis = self.input.axis(Key::ArrowUp, Key::ArrowDown);
                self.right.y += right_axis * step;
            }
            PongMode::PvAi => {
                // Track the ball at a fraction of full speed outside a small
                // dead-zone; the asymmetry is the entire difficulty model.
                let gap = self.ball.pos.y - self.right.center().y;
                if gap.abs() > PONG_AI_DEADZONE {
                    self.right.y += gap.signum() * step * PONG_AI_SPEED_FACTOR;
                }
            }
            PongMode::Practice => {}
        }

        let max_y = self.size.y - PONG_PADDLE_HEIGHT;
        self.left.y = self.left.y.clamp(0.0, max_y);
        self.right.y = self.right.y.clamp(0.0, max_y);
    }

    /// Reflect off a paddle: horizontal flip, vertical component re-derived
    /// from the strike position, speed ramped.
    fn bounce_off(&mut self, paddle: Rect, outgoing: Vec2) {
        let hit = ((self.ball.pos.y - paddle.center().y) / (paddle.h / 2.0)).clamp(-1.0, 1.0);
        self.ball.dir = paddle_deflection(hit, MAX_DEFLECTION, outgoing, Vec2::Y);
        self.ball.speed = (self.ball.speed * PADDLE_BOOST).min(BALL_MAX_SPEED);
    }

    fn ball_rect_hit(&self, paddle: &Rect) -> bool {
        circle_intersects_rect(self.ball.pos, self.ball.radius, paddle)
    }
}

impl Default for Pong {
    fn default() -> Self {
        Self::new(PongMode::default())
    }
}

impl Simulation for Pong {
    type Snapshot = PongSnapshot;

    fn init(&mut self, ctx: &mut GameContext) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.size = ctx.size;
        self.scores = [0, 0];
        self.input.clear();

        let paddle_y = (self.size.y - PONG_PADDLE_HEIGHT) / 2.0;
        self.left = Rect::new(
            PONG_PADDLE_MARGIN,
            paddle_y,
            PONG_PADDLE_WIDTH,
            PONG_PADDLE_HEIGHT,
        );
        self.right = Rect::new(
            self.size.x - PONG_PADDLE_MARGIN - PONG_PADDLE_WIDTH,
            paddle_y,
            PONG_PADDLE_WIDTH,
            PONG_PADDLE_HEIGHT,
        );

        let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.serve(side);
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        let dt = dt * ctx.config.animation.speed;
        self.move_paddles(dt);

        let ball = &mut self.ball;
        ball.pos += ball.dir * ball.speed * dt;

        // Top/bottom walls: reflect and reposition inside
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.dir.y = ball.dir.y.abs();
        } else if ball.pos.y + ball.radius > self.size.y {
            ball.pos.y = self.size.y - ball.radius;
            ball.dir.y = -ball.dir.y.abs();
        }

        // Paddle contact only counts when the ball is moving into the paddle
        if self.ball.dir.x < 0.0 && self.ball_rect_hit(&self.left) {
            let paddle = self.left;
            self.bounce_off(paddle, Vec2::X);
            self.ball.pos.x = paddle.right() + self.ball.radius;
        } else if self.ball.dir.x > 0.0 && self.ball_rect_hit(&self.right) {
            let paddle = self.right;
            self.bounce_off(paddle, Vec2::NEG_X);
            self.ball.pos.x = paddle.x - self.ball.radius;
        }

        // Scoring edges: the point is awarded the frame the ball center
        // crosses, so the ball never lingers outside the drawable area
        if self.ball.pos.x < 0.0 {
            self.scores[1] += 1;
            ctx.emit_score(self.scores[1], 1);
            if self.scores[1] >= PONG_WIN_SCORE {
                ctx.end_game("player 2 wins", self.scores[1]);
            } else {
                self.serve(-1.0);
            }
        } else if self.ball.pos.x > self.size.x {
            self.scores[0] += 1;
            ctx.emit_score(self.scores[0], 1);
            if self.scores[0] >= PONG_WIN_SCORE {
                ctx.end_game("player 1 wins", self.scores[0]);
            } else {
                self.serve(1.0);
            }
        }
    }

    fn render(&self, canvas: &mut dyn Context2d, config: &GameConfig, size: Vec2) {
        canvas.clear(size, &config.colors.background);

        // Center line, dashed
        let dash = 12.0;
        let mut y = 0.0;
        while y < size.y {
            canvas.fill_rect(
                Rect::new(size.x / 2.0 - 1.0, y, 2.0, dash),
                &config.colors.secondary,
            );
            y += dash * 2.0;
        }

        canvas.fill_rect(self.left, &config.colors.primary);
        if self.mode != PongMode::Practice {
            canvas.fill_rect(self.right, &config.colors.primary);
        } else {
            canvas.stroke_rect(self.right, &config.colors.secondary, config.styling.border_width);
        }
        canvas.fill_circle(self.ball.pos, self.ball.radius, &config.colors.text);

        canvas.fill_text(
            &self.scores[0].to_string(),
            Vec2::new(size.x * 0.25, 16.0),
            config.typography.size_large,
            &config.typography.font_family,
            &config.colors.text,
        );
        canvas.fill_text(
            &self.scores[1].to_string(),
            Vec2::new(size.x * 0.75, 16.0),
            config.typography.size_large,
            &config.typography.font_family,
            &config.colors.text,
        );
    }

    fn cleanup(&mut self) {
        self.input.clear();
    }

    fn input(&mut self, event: &InputEvent) {
        self.input.apply(event);
    }

    fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            mode: self.mode,
            left_paddle: self.left,
            right_paddle: self.right,
            ball_pos: self.ball.pos,
            ball_velocity: self.ball.dir * self.ball.speed,
            ball_radius: self.ball.radius,
            scores: self.scores,
        }
    }
}

impl Game<Pong> {
    /// Construct a pong game bound to `canvas`.
    pub fn pong(canvas: impl Canvas, patch: ConfigPatch, mode: PongMode) -> Result<Self, GameError> {
        Self::with_simulation(canvas, patch, Pong::new(mode))
    }
}
