//! Physics world abstraction
//!
//! Scenes talk to rigid-body physics only through the [`PhysicsWorld`]
//! trait so the backend can be swapped or mocked. Positions exchanged with
//! the world are in physics units; the scene converts with its world scale.
//! [`SimpleWorld`] is a small built-in backend used by tests and demos.

pub mod simple_world;

pub use simple_world::SimpleWorld;

use crate::foundation::math::Vec2;

/// Handle of a body inside a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u64);

/// Handle of a fixture attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixtureHandle(pub u64);

/// Handle of a joint between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointHandle(pub u64);

bitflags::bitflags! {
    /// Collision category and mask bits
    ///
    /// Two fixtures collide when each one's category is in the other's mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player controlled actors
        const PLAYER = 1 << 0;
        /// Enemies
        const ENEMY = 1 << 1;
        /// Bullets, missiles
        const PROJECTILE = 1 << 2;
        /// Static level geometry
        const ENVIRONMENT = 1 << 3;
        /// Sensors without a physical response
        const TRIGGER = 1 << 4;
        /// Small loose objects
        const DEBRIS = 1 << 5;
        /// Collectibles
        const PICKUP = 1 << 6;
    }
}

impl CollisionLayers {
    /// Check if two fixtures should collide based on their categories and masks
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

/// How a body reacts to forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Never moves
    Static,
    /// Moves by velocity only, ignores forces
    Kinematic,
    /// Fully simulated
    #[default]
    Dynamic,
}

/// Parameters for [`PhysicsWorld::create_body`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyDesc {
    /// Body type
    pub body_type: BodyType,
    /// Initial position in physics units
    pub position: Vec2,
    /// Initial angle in radians
    pub angle: f32,
    /// Lock rotation
    pub fixed_rotation: bool,
    /// Continuous collision for fast movers
    pub is_bullet: bool,
}

/// Collision shape of a fixture, in physics units relative to the body
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDesc {
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
    /// Axis-aligned box given by half extents
    Box {
        /// Half width
        half_width: f32,
        /// Half height
        half_height: f32,
    },
    /// Convex polygon
    Polygon {
        /// Vertices
        points: Vec<Vec2>,
    },
}

/// Surface material of a fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    /// Density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Report contacts without a physical response
    pub is_sensor: bool,
    /// Category bits
    pub category: CollisionLayers,
    /// Categories this fixture collides with
    pub mask: CollisionLayers,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.0,
            is_sensor: false,
            category: CollisionLayers::all(),
            mask: CollisionLayers::all(),
        }
    }
}

/// Joint flavours
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Glue two bodies together
    Weld,
    /// Keep the anchors at a fixed distance
    Distance {
        /// Rest length in physics units
        length: f32,
    },
    /// Hinge around the anchor
    Revolute {
        /// Motor speed in radians per second, 0 for no motor
        motor_speed: f32,
    },
}

/// Parameters for [`PhysicsWorld::create_joint`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDesc {
    /// Joint flavour
    pub kind: JointKind,
    /// First body
    pub body_a: BodyHandle,
    /// Second body
    pub body_b: BodyHandle,
    /// Anchor on the first body, local physics units
    pub anchor_a: Vec2,
    /// Anchor on the second body, local physics units
    pub anchor_b: Vec2,
    /// Let the joined bodies collide with each other
    pub collide_connected: bool,
}

/// Contact notification drained after each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// Two bodies started touching
    Begin(BodyHandle, BodyHandle),
    /// Two bodies stopped touching
    End(BodyHandle, BodyHandle),
}

/// Rigid-body world consumed by scenes
pub trait PhysicsWorld {
    /// Create a body
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Destroy a body along with its fixtures and joints
    fn destroy_body(&mut self, body: BodyHandle);

    /// Body position in physics units
    fn body_position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Body angle in radians
    fn body_angle(&self, body: BodyHandle) -> Option<f32>;

    /// Body linear velocity in physics units per second
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// Teleport a body
    fn set_body_position(&mut self, body: BodyHandle, position: Vec2);

    /// Set a body's angle
    fn set_body_angle(&mut self, body: BodyHandle, angle: f32);

    /// Set a body's linear velocity
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Set a body's angular velocity
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32);

    /// Attach a fixture, `None` if the body does not exist
    fn create_fixture(
        &mut self,
        body: BodyHandle,
        shape: &ShapeDesc,
        material: &MaterialDesc,
    ) -> Option<FixtureHandle>;

    /// Create a joint, `None` if either body does not exist
    fn create_joint(&mut self, desc: &JointDesc) -> Option<JointHandle>;

    /// Destroy a joint
    fn destroy_joint(&mut self, joint: JointHandle);

    /// Advance the simulation
    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);

    /// Clear accumulated forces
    fn clear_forces(&mut self);

    /// Take the contact events produced since the last call
    fn drain_contacts(&mut self) -> Vec<ContactEvent>;
}
