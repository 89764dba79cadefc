//! End-to-end tests through the public API only: lifecycle state machine,
//! config merge, event plumbing and the in-bounds invariant, across all
//! three games.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use pocket_arcade::breakout::Breakout;
use pocket_arcade::config::{AnimationPatch, ColorPatch, ConfigPatch, GameConfig};
use pocket_arcade::pong::{Pong, PongMode};
use pocket_arcade::snake::Snake;
use pocket_arcade::{EventKind, Game, GameEvent, HeadlessCanvas, InputEvent, Key, Phase};

fn snake_game(seed: u64) -> Game<Snake> {
    Game::with_simulation(
        HeadlessCanvas::new(600.0, 600.0),
        ConfigPatch::default(),
        Snake::seeded(seed),
    )
    .expect("headless canvas is always valid")
}

#[test]
fn full_session_event_order() {
    let mut game = snake_game(1);
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let log = log.clone();
        game.on(kind, Rc::new(move |e: &GameEvent| log.borrow_mut().push(e.kind())));
    }

    game.start();
    game.frame(0.0);
    game.frame(0.016);
    game.pause();
    game.resume();
    game.stop();

    assert_eq!(
        *log.borrow(),
        vec![EventKind::GameStarted, EventKind::GameFinished]
    );
    assert_eq!(game.phase(), Phase::Finished);
}

#[test]
fn snake_runs_into_the_wall_without_input() {
    let mut game = snake_game(3);
    let over = Rc::new(RefCell::new(None));
    let over2 = over.clone();
    game.on(
        EventKind::GameOver,
        Rc::new(move |e| {
            if let GameEvent::GameOver { reason, .. } = e {
                *over2.borrow_mut() = Some(reason.clone());
            }
        }),
    );

    game.start();
    // Head starts at the grid center heading right; the wall is <30 cells away
    for _ in 0..40 {
        game.advance(0.15);
    }

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(over.borrow().as_deref(), Some("wall collision"));
}

#[test]
fn pong_ai_match_plays_to_a_verdict() {
    let mut game = Game::with_simulation(
        HeadlessCanvas::new(800.0, 600.0),
        ConfigPatch::default(),
        Pong::seeded(PongMode::PvAi, 7),
    )
    .unwrap();
    let over = Rc::new(RefCell::new(None));
    let over2 = over.clone();
    game.on(
        EventKind::GameOver,
        Rc::new(move |e| {
            if let GameEvent::GameOver {
                reason,
                final_score,
                ..
            } = e
            {
                *over2.borrow_mut() = Some((reason.clone(), *final_score));
            }
        }),
    );

    game.start();
    // Idle human vs AI: the match must conclude well within ten simulated minutes
    for _ in 0..(60 * 600) {
        game.advance(1.0 / 60.0);
        if game.phase() == Phase::Finished {
            break;
        }
    }

    let over = over.borrow();
    let (reason, final_score) = over.as_ref().expect("match should end");
    assert!(reason.ends_with("wins"), "unexpected reason: {reason}");
    assert_eq!(*final_score, 11);
}

#[test]
fn breakout_paddle_input_steers_through_the_public_surface() {
    let mut game = Game::with_simulation(
        HeadlessCanvas::new(480.0, 640.0),
        ConfigPatch::default(),
        Breakout::seeded(5),
    )
    .unwrap();
    game.start();
    let x_before = game.game_state().paddle.x;

    game.input(&InputEvent::KeyDown(Key::ArrowRight));
    for _ in 0..30 {
        game.advance(1.0 / 60.0);
    }
    game.input(&InputEvent::KeyUp(Key::ArrowRight));

    assert!(game.game_state().paddle.x > x_before);
}

#[test]
fn snapshots_serialize_in_any_phase() {
    let mut game = snake_game(8);
    assert!(serde_json::to_string(&game.game_state()).is_ok());
    game.start();
    game.advance(0.2);
    assert!(serde_json::to_string(&game.game_state()).is_ok());
    game.stop();
    assert!(serde_json::to_string(&game.game_state()).is_ok());
}

#[derive(Debug, Clone, Copy)]
enum Call {
    Start,
    Stop,
    Pause,
    Resume,
    Mute,
    Unmute,
    Frame,
}

fn call_strategy() -> impl Strategy<Value = Call> {
    prop_oneof![
        Just(Call::Start),
        Just(Call::Stop),
        Just(Call::Pause),
        Just(Call::Resume),
        Just(Call::Mute),
        Just(Call::Unmute),
        Just(Call::Frame),
    ]
}

/// The transition table, written out: what each call should do to the phase.
fn expected_phase(phase: Phase, call: Call) -> Phase {
    match (phase, call) {
        (Phase::Idle | Phase::Finished, Call::Start) => Phase::Running,
        (Phase::Running | Phase::Paused, Call::Stop) => Phase::Finished,
        (Phase::Running, Call::Pause) => Phase::Paused,
        (Phase::Paused, Call::Resume) => Phase::Running,
        _ => phase,
    }
}

proptest! {
    #[test]
    fn lifecycle_follows_the_transition_table(calls in proptest::collection::vec(call_strategy(), 0..40)) {
        let mut game = snake_game(1);
        let mut now = 0.0;
        for call in calls {
            let expected = expected_phase(game.phase(), call);
            match call {
                Call::Start => game.start(),
                Call::Stop => game.stop(),
                Call::Pause => game.pause(),
                Call::Resume => game.resume(),
                Call::Mute => game.mute(),
                Call::Unmute => game.unmute(),
                Call::Frame => {
                    now += 0.016;
                    game.frame(now);
                }
            }
            // A frame may finish the run from inside (game over), never anything else
            if matches!(call, Call::Frame) {
                prop_assert!(matches!(game.phase(), Phase::Running | Phase::Finished)
                    || game.phase() == expected);
            } else {
                prop_assert_eq!(game.phase(), expected);
            }
        }
    }

    #[test]
    fn config_merge_never_loses_leaves(
        primary in proptest::option::of("#[0-9a-f]{6}"),
        speed in proptest::option::of(-5.0f32..20.0),
        volume in proptest::option::of(-1.0f32..2.0),
    ) {
        let patch = ConfigPatch {
            colors: ColorPatch { primary: primary.clone(), ..Default::default() },
            animation: AnimationPatch { speed },
            audio: pocket_arcade::config::AudioPatch { volume, ..Default::default() },
            ..Default::default()
        };
        let config = GameConfig::merged(patch);
        let defaults = GameConfig::default();

        // Every leaf is concrete and siblings of overrides keep their defaults
        prop_assert!(!config.colors.primary.is_empty());
        prop_assert_eq!(&config.colors.background, &defaults.colors.background);
        prop_assert_eq!(&config.typography, &defaults.typography);
        prop_assert!(config.animation.speed > 0.0);
        prop_assert!((0.0..=1.0).contains(&config.audio.volume));

        if let Some(primary) = primary {
            prop_assert_eq!(&config.colors.primary, &primary);
        }
        if let Some(speed) = speed {
            if speed > 0.0 && speed <= 10.0 {
                prop_assert_eq!(config.animation.speed, speed);
            } else {
                prop_assert_eq!(config.animation.speed, defaults.animation.speed);
            }
        }
    }

    #[test]
    fn snake_head_never_leaves_the_grid(seed in 0u64..1000, frames in 1usize..120) {
        let mut game = snake_game(seed);
        game.start();
        for _ in 0..frames {
            game.advance(0.05);
            let state = game.game_state();
            for cell in &state.body {
                prop_assert!(cell.x >= 0 && cell.x < state.grid.x);
                prop_assert!(cell.y >= 0 && cell.y < state.grid.y);
            }
            if game.phase() == Phase::Finished {
                break;
            }
        }
    }

    #[test]
    fn pong_ball_stays_in_vertical_bounds(seed in 0u64..500, frames in 1usize..300) {
        let mut game = Game::with_simulation(
            HeadlessCanvas::new(800.0, 600.0),
            ConfigPatch::default(),
            Pong::seeded(PongMode::PvAi, seed),
        )
        .unwrap();
        game.start();
        for _ in 0..frames {
            game.advance(1.0 / 60.0);
            let state = game.game_state();
            prop_assert!(state.ball_pos.y >= 0.0 && state.ball_pos.y <= 600.0);
            if game.phase() == Phase::Finished {
                break;
            }
        }
    }
}
