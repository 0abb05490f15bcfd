//! Game hooks driven by [`Engine::run`]

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// A game driven by the engine's main loop
///
/// `initialize` runs once before the first frame, `update` runs every frame
/// before the engine advances its schedulers and scenes, and `cleanup` runs
/// once after the loop stops, whether it stopped through [`Engine::quit`] or
/// a frame limit.
pub trait Application {
    /// Add scenes, resources and callbacks
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Per-frame game logic; `delta_time` is the measured or fixed frame
    /// delta before the engine clamps it
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Release game state
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Errors raised by game code
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine call failed
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Game data could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Game rule violated
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
