//! Engine and scene settings

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::Rect;

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Design (virtual canvas) width in pixels
    pub design_width: f32,

    /// Design (virtual canvas) height in pixels
    pub design_height: f32,

    /// Frame rate the game is tuned for
    pub target_frame_rate: f32,

    /// Upper bound applied to every frame delta, in seconds
    pub max_delta: f32,

    /// Sub-step physics when the measured frame rate drops below target
    pub adaptive_physics: bool,

    /// Upper bound for adaptive physics sub-steps
    pub max_physics_substeps: u32,

    /// Log silently ignored conditions (missing resources, no physics world)
    pub debug: bool,

    /// Stop [`crate::Engine::run`] after this many frames (headless runs)
    pub max_frames: Option<u64>,

    /// Step every frame by this delta instead of wall-clock time
    pub fixed_delta: Option<f32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            design_width: 1024.0,
            design_height: 768.0,
            target_frame_rate: 60.0,
            max_delta: 0.1,
            adaptive_physics: false,
            max_physics_substeps: 3,
            debug: cfg!(debug_assertions),
            max_frames: None,
            fixed_delta: None,
        }
    }
}

impl Config for EngineSettings {}

/// Physics world parameters for a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravity in physics units per second squared
    pub gravity: [f32; 2],

    /// Pixels per physics unit
    pub world_scale: f32,

    /// Solver velocity iterations passed to the world step
    pub velocity_iterations: u32,

    /// Solver position iterations passed to the world step
    pub position_iterations: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, 10.0],
            world_scale: 20.0,
            velocity_iterations: 10,
            position_iterations: 10,
        }
    }
}

/// Scene parameters, typically produced by a scene loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Scene name
    pub name: String,

    /// Scene width, `None` uses the engine design width
    pub width: Option<f32>,

    /// Scene height, `None` uses the engine design height
    pub height: Option<f32>,

    /// Camera travel limits
    pub extents: Rect,

    /// Clamp the camera against `extents`
    pub clip_camera: bool,

    /// Camera velocity damping applied per frame
    pub camera_damping: [f32; 2],

    /// Camera follow speeds, 0 snaps to the target
    pub follow_speed: [f32; 2],

    /// Allow touch panning on each axis
    pub touch_pan: [bool; 2],

    /// Physics world parameters, `None` for arcade-only scenes
    pub physics: Option<PhysicsSettings>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: None,
            height: None,
            extents: Rect::new(0.0, 0.0, 0.0, 0.0),
            clip_camera: false,
            camera_damping: [1.0, 1.0],
            follow_speed: [0.0, 0.0],
            touch_pan: [false, false],
            physics: None,
        }
    }
}

impl Config for SceneSettings {}
