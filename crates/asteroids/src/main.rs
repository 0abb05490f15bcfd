//! Headless asteroids demo
//!
//! Runs the game with a fixed frame delta for a bounded number of frames and
//! logs progress. Reads `asteroids.toml` and `engine.toml` from the working
//! directory when they exist, falling back to defaults.

mod components;
mod config;
mod game;

use actor_engine::config::{Config, EngineSettings};
use actor_engine::foundation::logging;
use actor_engine::Engine;

use crate::config::GameConfig;
use crate::game::AsteroidsGame;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = GameConfig::load_or_default("asteroids.toml");
    let mut settings = EngineSettings::load_or_default("engine.toml");
    settings.fixed_delta = Some(config.run.timestep);
    settings.max_frames = Some(config.run.max_frames);

    let mut game = AsteroidsGame::new(config);
    Engine::run(settings, &mut game)?;
    Ok(())
}
