//! Snake simulation
//!
//! Grid-based movement on a fixed-step accumulator: the snake advances one
//! cell every `SNAKE_MOVE_INTERVAL` seconds regardless of frame rate.
//! Direction changes queue into a pending heading applied at the next step,
//! with 180° reversals rejected outright.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::canvas::{Canvas, Context2d};
use crate::collision::Rect;
use crate::config::{ConfigPatch, GameConfig};
use crate::consts::*;
use crate::game::{Game, GameContext, GameError, Simulation};
use crate::input::{InputEvent, Key};

/// Serializable snapshot of a snake run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeSnapshot {
    /// Grid dimensions in cells (cols, rows)
    pub grid: IVec2,
    /// Body cells, head first
    pub body: Vec<IVec2>,
    pub direction: IVec2,
    pub food: IVec2,
    pub score: i64,
}

/// The snake game.
pub struct Snake {
    seed: u64,
    rng: Pcg32,
    grid: IVec2,
    body: VecDeque<IVec2>,
    dir: IVec2,
    pending: IVec2,
    food: IVec2,
    score: i64,
    accumulator: f32,
}

impl Snake {
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Deterministic food placement for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid: IVec2::ZERO,
            body: VecDeque::new(),
            dir: IVec2::X,
            pending: IVec2::X,
            food: IVec2::ZERO,
            score: 0,
            accumulator: 0.0,
        }
    }

    /// Advance one grid cell. Returns false when the run ended.
    fn step(&mut self, ctx: &mut GameContext) -> bool {
        self.dir = self.pending;
        let head = self.body[0];
        let next = head + self.dir;

        if next.x < 0 || next.y < 0 || next.x >= self.grid.x || next.y >= self.grid.y {
            ctx.end_game("wall collision", self.score);
            return false;
        }
        if self.body.contains(&next) {
            ctx.end_game("self collision", self.score);
            return false;
        }

        self.body.push_front(next);
        if next == self.food {
            self.score += 1;
            ctx.emit_score(self.score, 1);
            self.spawn_food();
        } else {
            self.body.pop_back();
        }
        true
    }

    fn spawn_food(&mut self) {
        let cells = (self.grid.x * self.grid.y) as usize;
        if self.body.len() >= cells {
            return; // board is full, nowhere to spawn
        }
        loop {
            let cell = IVec2::new(
                self.rng.random_range(0..self.grid.x),
                self.rng.random_range(0..self.grid.y),
            );
            if !self.body.contains(&cell) {
                self.food = cell;
                return;
            }
        }
    }

    fn queue_direction(&mut self, wanted: IVec2) {
        // Reversing the current heading would be instant self-collision
        if wanted + self.dir == IVec2::ZERO {
            return;
        }
        self.pending = wanted;
    }

    fn cell_rect(&self, cell: IVec2) -> Rect {
        Rect::new(
            cell.x as f32 * SNAKE_CELL + 1.0,
            cell.y as f32 * SNAKE_CELL + 1.0,
            SNAKE_CELL - 2.0,
            SNAKE_CELL - 2.0,
        )
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for Snake {
    type Snapshot = SnakeSnapshot;

    fn init(&mut self, ctx: &mut GameContext) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.grid = IVec2::new(
            (ctx.size.x / SNAKE_CELL) as i32,
            (ctx.size.y / SNAKE_CELL) as i32,
        );
        self.dir = IVec2::X;
        self.pending = IVec2::X;
        self.score = 0;
        self.accumulator = 0.0;

        // Head at center, body trailing left
        let head = self.grid / 2;
        self.body.clear();
        for i in 0..SNAKE_START_LENGTH as i32 {
            self.body.push_back(head - IVec2::new(i, 0));
        }
        self.spawn_food();
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        self.accumulator += dt * ctx.config.animation.speed;
        while self.accumulator >= SNAKE_MOVE_INTERVAL {
            self.accumulator -= SNAKE_MOVE_INTERVAL;
            if !self.step(ctx) {
                return;
            }
        }
    }

    fn render(&self, canvas: &mut dyn Context2d, config: &GameConfig, size: Vec2) {
        canvas.clear(size, &config.colors.background);

        for (i, &cell) in self.body.iter().enumerate() {
            let color = if i == 0 {
                &config.colors.primary
            } else {
                &config.colors.secondary
            };
            canvas.fill_rect(self.cell_rect(cell), color);
        }

        let food_center = (self.food.as_vec2() + Vec2::splat(0.5)) * SNAKE_CELL;
        canvas.fill_circle(food_center, SNAKE_CELL / 2.0 - 2.0, &config.colors.primary);

        canvas.fill_text(
            &format!("Score: {}", self.score),
            Vec2::new(8.0, 8.0),
            config.typography.size_medium,
            &config.typography.font_family,
            &config.colors.text,
        );
    }

    fn cleanup(&mut self) {
        self.pending = self.dir;
    }

    fn input(&mut self, event: &InputEvent) {
        if let InputEvent::KeyDown(key) = event {
            match key {
                Key::ArrowUp | Key::W => self.queue_direction(IVec2::NEG_Y),
                Key::ArrowDown | Key::S => self.queue_direction(IVec2::Y),
                Key::ArrowLeft | Key::A => self.queue_direction(IVec2::NEG_X),
                Key::ArrowRight | Key::D => self.queue_direction(IVec2::X),
                _ => {}
            }
        }
    }

    fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            grid: self.grid,
            body: self.body.iter().copied().collect(),
            direction: self.dir,
            food: self.food,
            score: self.score,
        }
    }
}

impl Game<Snake> {
    /// Construct a snake game bound to `canvas`.
    pub fn snake(canvas: impl Canvas, patch: ConfigPatch) -> Result<Self, GameError> {
        Self::with_simulation(canvas, patch, Snake::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessCanvas;
    use crate::events::{EventBus, EventKind, GameEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    const SIZE: Vec2 = Vec2::new(600.0, 600.0);

    fn init_snake(seed: u64) -> (Snake, GameConfig, EventBus) {
        let mut snake = Snake::seeded(seed);
        let config = GameConfig::default();
        let bus = EventBus::new();
        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        snake.init(&mut ctx);
        (snake, config, bus)
    }

    #[test]
    fn one_accumulated_step_advances_one_cell_right() {
        let (mut snake, config, bus) = init_snake(7);
        snake.food = IVec2::ZERO; // keep the path clear
        let head_before = snake.body[0];

        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        snake.update(&mut ctx, 0.2); // exceeds the 150ms move interval exactly once

        let state = snake.snapshot();
        assert_eq!(state.body[0], head_before + IVec2::X);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn movement_is_frame_rate_independent() {
        let (mut a, config, bus) = init_snake(3);
        let (mut b, ..) = init_snake(3);

        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        // 0.3s in one chunk vs twenty 15ms slices
        a.update(&mut ctx, 0.3);
        for _ in 0..20 {
            b.update(&mut ctx, 0.015);
        }
        assert_eq!(a.snapshot().body, b.snapshot().body);
    }

    #[test]
    fn eating_food_grows_by_one_and_scores_one() {
        let (mut snake, config, mut bus) = init_snake(11);
        let scores = Rc::new(RefCell::new(Vec::new()));
        let scores2 = scores.clone();
        bus.on(
            EventKind::ScoreUpdate,
            Rc::new(move |e| {
                if let GameEvent::ScoreUpdate { score, delta, .. } = e {
                    scores2.borrow_mut().push((*score, *delta));
                }
            }),
        );

        // Plant the food directly in the snake's path
        snake.food = snake.body[0] + IVec2::X;
        let len_before = snake.body.len();

        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        assert!(snake.step(&mut ctx));

        assert_eq!(snake.body.len(), len_before + 1);
        assert_eq!(snake.score, 1);
        assert_eq!(*scores.borrow(), vec![(1, 1)]);
        // Respawned food never lands on the snake
        assert!(!snake.body.contains(&snake.food));
    }

    #[test]
    fn moving_without_food_preserves_length() {
        let (mut snake, config, bus) = init_snake(11);
        snake.food = IVec2::ZERO; // out of the way
        let len_before = snake.body.len();

        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        assert!(snake.step(&mut ctx));
        assert_eq!(snake.body.len(), len_before);
    }

    #[test]
    fn reversal_is_rejected_other_turns_accepted() {
        let (mut snake, ..) = init_snake(1);
        assert_eq!(snake.dir, IVec2::X);

        snake.input(&InputEvent::KeyDown(Key::ArrowLeft));
        assert_eq!(snake.pending, IVec2::X); // 180° rejected

        snake.input(&InputEvent::KeyDown(Key::ArrowUp));
        assert_eq!(snake.pending, IVec2::NEG_Y);
    }

    #[test]
    fn wall_hit_ends_with_wall_collision() {
        let (mut snake, config, bus) = init_snake(5);
        // Walk the head to the right edge
        let steps_to_wall = snake.grid.x - 1 - snake.body[0].x;
        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        for _ in 0..steps_to_wall {
            snake.food = IVec2::ZERO;
            assert!(snake.step(&mut ctx), "died before reaching the wall");
        }
        assert!(snake.step(&mut ctx) == false);
        assert_eq!(ctx.ended_reason(), Some("wall collision"));
    }

    #[test]
    fn self_hit_ends_with_self_collision() {
        let (mut snake, config, bus) = init_snake(5);
        // Fabricate a body long enough to turn into: head plus a hook above
        let head = snake.body[0];
        snake.body = VecDeque::from(vec![
            head,
            head + IVec2::new(0, -1),
            head + IVec2::new(1, -1),
            head + IVec2::new(1, 0),
            head + IVec2::new(1, 1),
        ]);
        snake.dir = IVec2::X;
        snake.pending = IVec2::NEG_Y; // turn up into the body
        snake.food = IVec2::ZERO;

        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        assert!(!snake.step(&mut ctx));
        assert_eq!(ctx.ended_reason(), Some("self collision"));
    }

    #[test]
    fn body_stays_inside_the_grid() {
        let (mut snake, config, bus) = init_snake(21);
        let mut ctx = GameContext::for_tests(SIZE, &config, &bus);
        for _ in 0..200 {
            snake.update(&mut ctx, 0.15);
            for cell in &snake.body {
                assert!(cell.x >= 0 && cell.x < snake.grid.x);
                assert!(cell.y >= 0 && cell.y < snake.grid.y);
            }
            if ctx.ended_reason().is_some() {
                break;
            }
        }
    }

    #[test]
    fn render_draws_every_body_cell_and_the_food() {
        let canvas = HeadlessCanvas::new(600.0, 600.0);
        let commands = canvas.commands();
        let mut game = Game::with_simulation(canvas, ConfigPatch::default(), Snake::seeded(2))
            .unwrap();
        game.start();
        game.advance(0.0);

        use crate::canvas::DrawCommand;
        let log = commands.borrow();
        let rects = log
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        let circles = log
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(rects, SNAKE_START_LENGTH);
        assert_eq!(circles, 1);
    }
}
