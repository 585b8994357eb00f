//! Centipede entry point
//!
//! Headless native build: an autopilot plays the configured number of rounds
//! while a text renderer prints the arena once per second.

use std::error::Error;
use std::io;
use std::path::Path;

use centipede::Settings;
use centipede::audio::{AudioManager, LogAudio};
use centipede::consts::TICK_RATE_HZ;
use centipede::game::Game;
use centipede::platform::{Clock, DemoInput, ManualClock, SystemClock};
use centipede::renderer::TextRenderer;
use centipede::settings::SETTINGS_FILE;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Centipede (native) starting...");

    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    let seed = settings.resolved_seed();
    log::info!(
        "Seed {}, {} demo round(s), realtime {}",
        seed,
        settings.demo_rounds,
        settings.realtime
    );

    if settings.realtime {
        run(SystemClock::new(), &settings, seed)
    } else {
        run(ManualClock::new(), &settings, seed)
    }
}

fn run<C: Clock>(clock: C, settings: &Settings, seed: u64) -> Result<(), Box<dyn Error>> {
    let renderer = TextRenderer::new(io::stdout().lock()).every(u64::from(TICK_RATE_HZ));
    let mut game = Game::new(
        clock,
        DemoInput::new(seed, settings.demo_rounds),
        renderer,
        AudioManager::from_settings(LogAudio, settings),
        settings.leaderboard_path.clone(),
        seed,
    );
    let summary = game.run_session()?;
    println!(
        "Played {} round(s); best {}; leaderboard lead {}",
        summary.rounds, summary.best, summary.leading
    );
    Ok(())
}
