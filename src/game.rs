//! Game lifecycle controller
//!
//! Owns the drawing context, the merged configuration, the phase state
//! machine and the frame loop; everything game-specific lives behind the
//! `Simulation` trait. One controller instance is bound to one canvas for
//! its whole life.

use std::fmt;

use glam::Vec2;
use serde::Serialize;

use crate::canvas::{Canvas, CanvasError, Context2d};
use crate::config::{ConfigPatch, GameConfig};
use crate::events::{Callback, Envelope, EventBus, EventKind, GameEvent};
use crate::input::InputEvent;

/// Lifecycle phase. Transitions are constrained:
/// `start` from Idle/Finished, `pause` from Running, `resume` from Paused,
/// `stop` from Running/Paused. Anything else is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Construction-time failure.
#[derive(Debug)]
pub enum GameError {
    Canvas(CanvasError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Canvas(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Canvas(e) => Some(e),
        }
    }
}

impl From<CanvasError> for GameError {
    fn from(e: CanvasError) -> Self {
        GameError::Canvas(e)
    }
}

/// What the controller hands a simulation during `init` and `update`.
///
/// Emission goes through here so only the bound simulation (and the
/// controller itself) can publish events.
pub struct GameContext<'a> {
    /// Canvas size in pixels
    pub size: Vec2,
    pub config: &'a GameConfig,
    bus: &'a EventBus,
    player_name: Option<&'a str>,
    ended: Option<String>,
}

impl GameContext<'_> {
    fn envelope(&self) -> Envelope {
        Envelope::new(self.player_name)
    }

    /// Publish a `scoreUpdate` with the new total and the change.
    pub fn emit_score(&mut self, score: i64, delta: i64) {
        self.bus.emit(&GameEvent::ScoreUpdate {
            envelope: self.envelope(),
            score,
            delta,
        });
    }

    /// Publish `gameOver` and ask the controller to finish the run after the
    /// current frame completes.
    pub fn end_game(&mut self, reason: impl Into<String>, final_score: i64) {
        let reason = reason.into();
        self.bus.emit(&GameEvent::GameOver {
            envelope: self.envelope(),
            reason: reason.clone(),
            final_score,
        });
        self.ended = Some(reason);
    }
}

#[cfg(test)]
impl<'a> GameContext<'a> {
    /// Direct context for driving a simulation without a controller.
    pub(crate) fn for_tests(size: Vec2, config: &'a GameConfig, bus: &'a EventBus) -> Self {
        Self {
            size,
            config,
            bus,
            player_name: None,
            ended: None,
        }
    }

    pub(crate) fn ended_reason(&self) -> Option<&str> {
        self.ended.as_deref()
    }
}

/// The per-game hooks the controller drives.
pub trait Simulation {
    /// Serializable state snapshot returned by [`Game::game_state`].
    type Snapshot: Clone + Serialize;

    /// One-time setup per game start.
    fn init(&mut self, ctx: &mut GameContext);
    /// Advance the simulation by `dt` seconds.
    fn update(&mut self, ctx: &mut GameContext, dt: f32);
    /// Draw the current state.
    fn render(&self, canvas: &mut dyn Context2d, config: &GameConfig, size: Vec2);
    /// Release held input/resources. Runs on stop and on game over.
    fn cleanup(&mut self);
    /// React to a host input event. Default: ignore.
    fn input(&mut self, _event: &InputEvent) {}
    /// Owned snapshot of the current state (callable in any phase).
    fn snapshot(&self) -> Self::Snapshot;
}

/// Lifecycle controller binding one simulation to one canvas.
pub struct Game<S: Simulation> {
    sim: S,
    context: Box<dyn Context2d>,
    size: Vec2,
    config: GameConfig,
    phase: Phase,
    bus: EventBus,
    player_name: Option<String>,
    last_frame: Option<f64>,
}

impl<S: Simulation> Game<S> {
    /// Bind a simulation to a canvas with a partial config override.
    ///
    /// Fails if the surface has no drawable area or cannot produce a 2D
    /// context; config problems only warn (see [`GameConfig::merged`]).
    pub fn with_simulation(
        canvas: impl Canvas,
        patch: ConfigPatch,
        sim: S,
    ) -> Result<Self, GameError> {
        let size = canvas.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(CanvasError::ZeroSized.into());
        }
        let context = canvas.into_context_2d()?;
        let config = GameConfig::merged(patch);
        Ok(Self {
            sim,
            context,
            size,
            config,
            phase: Phase::Idle,
            bus: EventBus::new(),
            player_name: None,
            last_frame: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Canvas size the game was bound with.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Begin a run. No-op unless Idle or Finished.
    pub fn start(&mut self) {
        if !matches!(self.phase, Phase::Idle | Phase::Finished) {
            return;
        }
        log::debug!("game start");
        self.phase = Phase::Running;
        self.last_frame = None;
        let mut ctx = GameContext {
            size: self.size,
            config: &self.config,
            bus: &self.bus,
            player_name: self.player_name.as_deref(),
            ended: None,
        };
        self.sim.init(&mut ctx);
        self.bus.emit(&GameEvent::GameStarted {
            envelope: Envelope::new(self.player_name.as_deref()),
        });
    }

    /// End a run. No-op unless Running or Paused.
    pub fn stop(&mut self) {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return;
        }
        log::debug!("game stop");
        self.finish();
    }

    /// Suspend updates. No-op unless Running.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Continue after `pause`. No-op unless Paused.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Set `audio.muted` and emit `soundMuted`. Works in any phase.
    pub fn mute(&mut self) {
        self.config.audio.muted = true;
        self.bus.emit(&GameEvent::SoundMuted {
            envelope: Envelope::new(self.player_name.as_deref()),
        });
    }

    /// Clear `audio.muted` and emit `soundUnmuted`. Works in any phase.
    pub fn unmute(&mut self) {
        self.config.audio.muted = false;
        self.bus.emit(&GameEvent::SoundUnmuted {
            envelope: Envelope::new(self.player_name.as_deref()),
        });
    }

    /// Name included in subsequent event payloads.
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = Some(name.into());
    }

    /// Owned, serializable snapshot of the simulation state.
    pub fn game_state(&self) -> S::Snapshot {
        self.sim.snapshot()
    }

    /// Subscribe to an event kind. Duplicate registrations are idempotent.
    pub fn on(&mut self, kind: EventKind, callback: Callback) {
        self.bus.on(kind, callback);
    }

    /// Unsubscribe. Unknown pairs are a no-op.
    pub fn off(&mut self, kind: EventKind, callback: &Callback) {
        self.bus.off(kind, callback);
    }

    /// Forward a host input event to the simulation. Events are only routed
    /// while a run exists (between `init` and `cleanup`).
    pub fn input(&mut self, event: &InputEvent) {
        if matches!(self.phase, Phase::Running | Phase::Paused) {
            self.sim.input(event);
        }
    }

    /// Per-frame entry point; `now` is the host clock in seconds.
    ///
    /// Computes the delta since the previous call and, only while Running,
    /// runs update then render. Paused/idle frames still refresh the
    /// timestamp so `resume` never sees a stale delta.
    pub fn frame(&mut self, now: f64) {
        let Some(last) = self.last_frame.replace(now) else {
            return;
        };
        let dt = ((now - last).max(0.0) as f32).min(0.1);
        if self.phase == Phase::Running {
            self.advance(dt);
        }
    }

    /// Advance one frame by an explicit delta (headless stepping).
    ///
    /// Update always completes before render; a game-over signaled during
    /// update finishes the run after the frame is drawn.
    pub fn advance(&mut self, dt: f32) {
        if self.phase != Phase::Running {
            return;
        }
        let mut ctx = GameContext {
            size: self.size,
            config: &self.config,
            bus: &self.bus,
            player_name: self.player_name.as_deref(),
            ended: None,
        };
        self.sim.update(&mut ctx, dt);
        let ended = ctx.ended.take();
        self.sim
            .render(self.context.as_mut(), &self.config, self.size);
        if let Some(reason) = ended {
            log::info!("game over: {reason}");
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.sim.cleanup();
        self.phase = Phase::Finished;
        self.bus.emit(&GameEvent::GameFinished {
            envelope: Envelope::new(self.player_name.as_deref()),
        });
    }
}
