//! # Actor Engine
//!
//! A 2D scene-graph engine: trees of actors grouped into scenes, updated
//! once per frame, optionally driven by a rigid-body physics world.
//!
//! ## Features
//!
//! - **Scene graph**: actors in slot-map arenas with deferred removal
//! - **Transforms**: cached world matrices with parallax depth and docking
//! - **Schedulers**: timelines, action lists and tasks on one state machine
//! - **Camera**: follow, damping, touch panning and extents clamping
//! - **Physics glue**: pluggable [`physics::PhysicsWorld`] backends
//!
//! Rendering, audio and input devices are left to the host.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actor_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let mut scene = Scene::new("main");
//!         scene.add_actor(Actor::new("ship").with_velocity(40.0, 0.0));
//!         engine.add_scene(scene);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = EngineSettings { max_frames: Some(600), ..EngineSettings::default() };
//!     Engine::run(settings, &mut MyGame)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

pub mod foundation;
pub mod config;
pub mod scheduling;
pub mod physics;
pub mod actor;
pub mod scene;
pub mod resources;
pub mod callbacks;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        actor::{
            actions::{
                AddProperty, Destroy, FollowPath, LimitMove, MoveTo, RotateTo, ScaleTo,
                SetProperty, SetVelocity, TweenProperty,
            },
            Actor, ActorKind, ActorProperty, DockX, DockY, Docking, VirtualCanvas,
        },
        callbacks::CallbackRegistry,
        config::{Config, EngineSettings, PhysicsSettings, SceneSettings},
        foundation::{
            collections::{ActorId, SceneId},
            math::{Mat3, Rect, Vec2},
            time::Timer,
        },
        physics::{BodyType, CollisionLayers, MaterialDesc, PhysicsWorld, ShapeDesc, SimpleWorld},
        resources::{Resource, ResourceData, ResourceStore, ResourceType},
        scene::{Camera, FrameContext, Scene},
        scheduling::{
            Action, ActionsList, Animation, Call, Ease, JobState, Parallel, Sequence, Task,
            TaskControl, TaskQueue, Timeline, Wait,
        },
        AppError, Application, Engine, EngineError,
    };
}
