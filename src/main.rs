//! Pocket Arcade demo entry point
//!
//! Runs a headless Pong match (human side idle, AI returning serves) on a
//! recording canvas and logs the event stream. Useful for eyeballing the
//! simulation without a browser host.

use std::cell::RefCell;
use std::rc::Rc;

use pocket_arcade::canvas::HeadlessCanvas;
use pocket_arcade::config::ConfigPatch;
use pocket_arcade::events::EventKind;
use pocket_arcade::game::{Game, Phase};
use pocket_arcade::pong::{Pong, PongMode};

fn main() {
    env_logger::init();
    log::info!("Pocket Arcade demo starting...");

    let canvas = HeadlessCanvas::new(800.0, 600.0);
    let commands = canvas.commands();

    let mut game = match Game::with_simulation(
        canvas,
        ConfigPatch::default(),
        Pong::seeded(PongMode::PvAi, 0xC0FFEE),
    ) {
        Ok(game) => game,
        Err(e) => {
            log::error!("failed to construct game: {e}");
            std::process::exit(1);
        }
    };

    game.set_player_name("demo");
    let events_seen = Rc::new(RefCell::new(0u32));
    for kind in EventKind::ALL {
        let events_seen = events_seen.clone();
        game.on(
            kind,
            Rc::new(move |event| {
                *events_seen.borrow_mut() += 1;
                match serde_json::to_string(event) {
                    Ok(json) => log::info!("event: {json}"),
                    Err(e) => log::warn!("event failed to serialize: {e}"),
                }
            }),
        );
    }

    game.start();

    // Step at 60 Hz of simulated time until the match ends
    let dt = 1.0 / 60.0;
    let mut now = 0.0;
    let mut frames = 0u64;
    while game.phase() == Phase::Running && frames < 60 * 600 {
        game.frame(now);
        commands.borrow_mut().clear(); // keep the recording from growing unbounded
        now += dt;
        frames += 1;
    }

    let snapshot = game.game_state();
    log::info!(
        "demo finished after {:.1}s simulated, {} events",
        frames as f64 * dt,
        events_seen.borrow()
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("snapshot failed to serialize: {e}"),
    }
}
