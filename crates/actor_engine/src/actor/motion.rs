//! Arcade motion and edge docking

use crate::foundation::math::Vec2;

/// Velocity and per-frame damping used when no physics body is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Linear velocity in pixels per second
    pub velocity: Vec2,
    /// Angular velocity in radians per second
    pub angular_velocity: f32,
    /// Depth velocity per second
    pub depth_velocity: f32,
    /// Multiplier applied to `velocity` every frame
    pub damping: Vec2,
    /// Multiplier applied to `angular_velocity` every frame
    pub angular_damping: f32,
    /// Multiplier applied to `depth_velocity` every frame
    pub depth_damping: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            depth_velocity: 0.0,
            damping: Vec2::new(1.0, 1.0),
            angular_damping: 1.0,
            depth_damping: 1.0,
        }
    }
}

/// Result of one arcade integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Position delta
    pub delta: Vec2,
    /// Rotation delta
    pub rotation: f32,
    /// Depth delta
    pub depth: f32,
}

impl MotionStep {
    /// True if the step moved anything
    pub fn is_moving(&self) -> bool {
        self.delta != Vec2::zeros() || self.rotation != 0.0 || self.depth != 0.0
    }
}

impl Motion {
    /// Integrate one step and apply damping
    pub fn integrate(&mut self, dt: f32) -> MotionStep {
        let step = MotionStep {
            delta: self.velocity * dt,
            rotation: self.angular_velocity * dt,
            depth: self.depth_velocity * dt,
        };
        self.velocity.component_mul_assign(&self.damping);
        self.angular_velocity *= self.angular_damping;
        self.depth_velocity *= self.depth_damping;
        step
    }
}

/// Horizontal docking edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockX {
    /// Free on this axis
    #[default]
    None,
    /// Stick to the left edge
    Left,
    /// Stick to the right edge
    Right,
}

/// Vertical docking edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockY {
    /// Free on this axis
    #[default]
    None,
    /// Stick to the top edge
    Top,
    /// Stick to the bottom edge
    Bottom,
}

/// Docking request of an actor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Docking {
    /// Horizontal edge
    pub x: DockX,
    /// Vertical edge
    pub y: DockY,
    /// Margins as (left, right, top, bottom)
    pub margin: [f32; 4],
    /// Dock against the screen (design size) instead of the scene
    pub screen: bool,
}

impl Docking {
    /// True if either axis is docked
    pub fn is_docked(&self) -> bool {
        self.x != DockX::None || self.y != DockY::None
    }

    /// Docked position for an actor of `half_size` inside a container of
    /// `container_half` extents, centred on the origin
    ///
    /// Axes that are not docked keep the value from `current`.
    pub fn resolve(&self, current: Vec2, half_size: Vec2, container_half: Vec2) -> Vec2 {
        let [left, right, top, bottom] = self.margin;
        let x = match self.x {
            DockX::None => current.x,
            DockX::Left => -container_half.x + half_size.x + left,
            DockX::Right => container_half.x - half_size.x - right,
        };
        let y = match self.y {
            DockY::None => current.y,
            DockY::Top => -container_half.y + half_size.y + top,
            DockY::Bottom => container_half.y - half_size.y - bottom,
        };
        Vec2::new(x, y)
    }
}
