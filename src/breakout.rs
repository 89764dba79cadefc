//! Breakout simulation
//!
//! A fixed 6×8 brick grid generated once per start, colors cycled by row.
//! The ball integrates continuously like Pong's; at most one brick is
//! resolved per frame even when the ball's bounding circle could overlap
//! more than one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::canvas::{Canvas, Context2d};
use crate::collision::{Rect, circle_intersects_rect, paddle_deflection};
use crate::config::{ConfigPatch, GameConfig};
use crate::consts::*;
use crate::game::{Game, GameContext, GameError, Simulation};
use crate::input::{InputEvent, InputState, Key};

/// Brick fill colors, cycled by row index.
const ROW_PALETTE: [&str; 6] = [
    "#e94560", "#f5a623", "#f8e71c", "#4ecca3", "#4a90d9", "#9013fe",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brick {
    pub rect: Rect,
    pub color: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
struct Ball {
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    radius: f32,
}

/// Serializable snapshot of a breakout run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutSnapshot {
    pub bricks: Vec<Brick>,
    pub bricks_remaining: u32,
    pub paddle: Rect,
    pub ball_pos: Vec2,
    pub ball_velocity: Vec2,
    pub ball_radius: f32,
    pub score: i64,
    pub lives: u8,
    pub level: u32,
}

/// The breakout game.
pub struct Breakout {
    seed: u64,
    rng: Pcg32,
    size: Vec2,
    bricks: Vec<Brick>,
    remaining: u32,
    paddle: Rect,
    ball: Ball,
    score: i64,
    lives: u8,
    level: u32,
    input: InputState,
}

impl Breakout {
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Deterministic serve angles for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            size: Vec2::ZERO,
            bricks: Vec::new(),
            remaining: 0,
            paddle: Rect::default(),
            ball: Ball {
                pos: Vec2::ZERO,
                dir: Vec2::NEG_Y,
                speed: BALL_START_SPEED,
                radius: BALL_RADIUS,
            },
            score: 0,
            lives: BREAKOUT_LIVES,
            level: 1,
            input: InputState::new(),
        }
    }

    fn build_bricks(&mut self) {
        let brick_w =
            (self.size.x - BRICK_GAP * (BRICK_COLS as f32 + 1.0)) / BRICK_COLS as f32;
        self.bricks.clear();
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                self.bricks.push(Brick {
                    rect: Rect::new(
                        BRICK_GAP + col as f32 * (brick_w + BRICK_GAP),
                        BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                        brick_w,
                        BRICK_HEIGHT,
                    ),
                    color: ROW_PALETTE[row % ROW_PALETTE.len()],
                    active: true,
                });
            }
        }
        self.remaining = self.bricks.len() as u32;
    }

    /// Put the ball back on a fresh serve above the paddle, heading up at a
    /// random shallow angle.
    fn serve(&mut self) {
        let angle = self.rng.random_range(-SERVE_ANGLE..SERVE_ANGLE);
        self.ball.pos = Vec2::new(
            self.paddle.center().x,
            self.paddle.y - self.ball.radius - 4.0,
        );
        self.ball.dir = Vec2::new(angle.sin(), -angle.cos());
        self.ball.speed = BALL_START_SPEED;
    }

    fn move_paddle(&mut self, dt: f32) {
        let axis = (self.input.axis(Key::A, Key::D)
            + self.input.axis(Key::ArrowLeft, Key::ArrowRight))
        .clamp(-1.0, 1.0);
        self.paddle.x += axis * BREAKOUT_PADDLE_SPEED * dt;

        if self.input.dragging() {
            if let Some(pointer) = self.input.pointer() {
                self.paddle.x = pointer.x - self.paddle.w / 2.0;
            }
        }

        self.paddle.x = self.paddle.x.clamp(0.0, self.size.x - self.paddle.w);
    }

    /// Resolve at most one brick hit. Returns true when the grid was cleared.
    fn hit_bricks(&mut self, ctx: &mut GameContext) -> bool {
        let hit = self
            .bricks
            .iter_mut()
            .find(|b| b.active && circle_intersects_rect(self.ball.pos, self.ball.radius, &b.rect));
        let Some(brick) = hit else {
            return false;
        };
        brick.active = false;
        self.remaining -= 1;
        self.score += BRICK_POINTS;
        // Simplified bounce: vertical reflection only
        self.ball.dir.y = -self.ball.dir.y;
        ctx.emit_score(self.score, BRICK_POINTS);
        self.remaining == 0
    }
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for Breakout {
    type Snapshot = BreakoutSnapshot;

    fn init(&mut self, ctx: &mut GameContext) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.size = ctx.size;
        self.score = 0;
        self.lives = BREAKOUT_LIVES;
        self.level = 1;
        self.input.clear();

        self.paddle = Rect::new(
            (self.size.x - BREAKOUT_PADDLE_WIDTH) / 2.0,
            self.size.y - BREAKOUT_PADDLE_HEIGHT - 12.0,
            BREAKOUT_PADDLE_WIDTH,
            BREAKOUT_PADDLE_HEIGHT,
        );
        self.build_bricks();
        self.serve();
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        let dt = dt * ctx.config.animation.speed;
        self.move_paddle(dt);

        let ball = &mut self.ball;
        ball.pos += ball.dir * ball.speed * dt;

        // Side and top walls
        if ball.pos.x - ball.radius < 0.0 {
            ball.pos.x = ball.radius;
            ball.dir.x = ball.dir.x.abs();
        } else if ball.pos.x + ball.radius > self.size.x {
            ball.pos.x = self.size.x - ball.radius;
            ball.dir.x = -ball.dir.x.abs();
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.dir.y = ball.dir.y.abs();
        }

        // Paddle bounce re-derives direction from the strike position
        if self.ball.dir.y > 0.0
            && circle_intersects_rect(self.ball.pos, self.ball.radius, &self.paddle)
        {
            let hit = ((self.ball.pos.x - self.paddle.center().x) / (self.paddle.w / 2.0))
                .clamp(-1.0, 1.0);
            self.ball.dir = paddle_deflection(hit, MAX_DEFLECTION, Vec2::NEG_Y, Vec2::X);
            self.ball.pos.y = self.paddle.y - self.ball.radius;
        }

        if self.hit_bricks(ctx) {
            ctx.end_game("level complete", self.score);
            return;
        }

        // Ball lost below the paddle
        if self.ball.pos.y > self.size.y {
            self.lives -= 1;
            if self.lives == 0 {
                ctx.end_game("no lives remaining", self.score);
            } else {
                self.serve();
            }
        }
    }

    fn render(&self, canvas: &mut dyn Context2d, config: &GameConfig, size: Vec2) {
        canvas.clear(size, &config.colors.background);

        for brick in self.bricks.iter().filter(|b| b.active) {
            canvas.fill_rect(brick.rect, brick.color);
        }

        canvas.fill_rect(self.paddle, &config.colors.primary);
        canvas.fill_circle(self.ball.pos, self.ball.radius, &config.colors.text);

        canvas.fill_text(
            &format!("Score: {}", self.score),
            Vec2::new(8.0, 8.0),
            config.typography.size_medium,
            &config.typography.font_family,
            &config.colors.text,
        );
        canvas.fill_text(
            &format!("Lives: {}", self.lives),
            Vec2::new(size.x - 90.0, 8.0),
            config.typography.size_medium,
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

    fn snapshot(&self) -> BreakoutSnapshot {
        BreakoutSnapshot {
            bricks: self.bricks.clone(),
            bricks_remaining: self.remaining,
            paddle: self.paddle,
            ball_pos: self.ball.pos,
            ball_velocity: self.ball.dir * self.ball.speed,
            ball_radius: self.ball.radius,
            score: self.score,
            lives: self.lives,
            level: self.level,
        }
    }
}

impl Game<Breakout> {
    /// Construct a breakout game bound to `canvas`.
    pub fn breakout(canvas: impl Canvas, patch: ConfigPatch) -> Result<Self, GameError> {
        Self::with_simulation(canvas, patch, Breakout::new())
    }
}
