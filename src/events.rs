//! Typed publish/subscribe event bus
//!
//! Events form a closed set (`EventKind`) with a payload variant per kind
//! (`GameEvent`). Delivery is synchronous and in registration order; a
//! panicking subscriber is isolated and logged, never propagated.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Event names subscribers can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    GameStarted,
    GameFinished,
    GameOver,
    ScoreUpdate,
    SoundMuted,
    SoundUnmuted,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::GameStarted,
        EventKind::GameFinished,
        EventKind::GameOver,
        EventKind::ScoreUpdate,
        EventKind::SoundMuted,
        EventKind::SoundUnmuted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::GameStarted => "gameStarted",
            EventKind::GameFinished => "gameFinished",
            EventKind::GameOver => "gameOver",
            EventKind::ScoreUpdate => "scoreUpdate",
            EventKind::SoundMuted => "soundMuted",
            EventKind::SoundUnmuted => "soundUnmuted",
        }
    }
}

/// Base payload carried by every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// ISO-8601 emission time
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl Envelope {
    pub(crate) fn new(player_name: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            player_name: player_name.map(str::to_owned),
        }
    }
}

/// An emitted event with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    GameStarted {
        #[serde(flatten)]
        envelope: Envelope,
    },
    GameFinished {
        #[serde(flatten)]
        envelope: Envelope,
    },
    ScoreUpdate {
        #[serde(flatten)]
        envelope: Envelope,
        score: i64,
        delta: i64,
    },
    GameOver {
        #[serde(flatten)]
        envelope: Envelope,
        reason: String,
        final_score: i64,
    },
    SoundMuted {
        #[serde(flatten)]
        envelope: Envelope,
    },
    SoundUnmuted {
        #[serde(flatten)]
        envelope: Envelope,
    },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameStarted { .. } => EventKind::GameStarted,
            GameEvent::GameFinished { .. } => EventKind::GameFinished,
            GameEvent::ScoreUpdate { .. } => EventKind::ScoreUpdate,
            GameEvent::GameOver { .. } => EventKind::GameOver,
            GameEvent::SoundMuted { .. } => EventKind::SoundMuted,
            GameEvent::SoundUnmuted { .. } => EventKind::SoundUnmuted,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            GameEvent::GameStarted { envelope }
            | GameEvent::GameFinished { envelope }
            | GameEvent::ScoreUpdate { envelope, .. }
            | GameEvent::GameOver { envelope, .. }
            | GameEvent::SoundMuted { envelope }
            | GameEvent::SoundUnmuted { envelope } => envelope,
        }
    }
}

/// Subscriber callback. `Rc` identity is used to deduplicate registrations.
pub type Callback = Rc<dyn Fn(&GameEvent)>;

/// Synchronous event bus keyed by `EventKind`.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(EventKind, Callback)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event kind.
    ///
    /// Registering the identical `Rc` for the same kind twice is idempotent.
    pub fn on(&mut self, kind: EventKind, callback: Callback) {
        let already = self
            .subscribers
            .iter()
            .any(|(k, cb)| *k == kind && Rc::ptr_eq(cb, &callback));
        if !already {
            self.subscribers.push((kind, callback));
        }
    }

    /// Remove a callback. Unknown pairs are a no-op.
    pub fn off(&mut self, kind: EventKind, callback: &Callback) {
        self.subscribers
            .retain(|(k, cb)| *k != kind || !Rc::ptr_eq(cb, callback));
    }

    /// Deliver an event to every subscriber of its kind, in registration
    /// order. A panicking subscriber does not prevent the rest from running.
    pub(crate) fn emit(&self, event: &GameEvent) {
        let kind = event.kind();
        for (k, callback) in &self.subscribers {
            if *k != kind {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                log::warn!("subscriber for {} panicked, continuing", kind.as_str());
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.subscribers.len()
    }
}
