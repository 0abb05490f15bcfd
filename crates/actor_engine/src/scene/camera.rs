//! Scene camera controller

use crate::foundation::collections::ActorId;
use crate::foundation::math::{Rect, Vec2};

/// Camera position, velocity and follow state
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Position in scene space
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Multiplier applied to `velocity` every frame
    pub damping: Vec2,
    /// Follow gain per axis, 0 snaps to the target
    pub follow_speed: Vec2,
    /// Actor followed on the x axis
    pub target_x: Option<ActorId>,
    /// Actor followed on the y axis
    pub target_y: Option<ActorId>,
    /// Touch panning per axis
    pub touch_pan: [bool; 2],
    /// Clamp against the scene extents
    pub clip: bool,
    pub(crate) panning: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            damping: Vec2::new(1.0, 1.0),
            follow_speed: Vec2::zeros(),
            target_x: None,
            target_y: None,
            touch_pan: [false, false],
            clip: false,
            panning: false,
        }
    }
}

impl Camera {
    /// True while a touch pans the camera
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Follow both axes of one actor
    pub fn follow(&mut self, target: ActorId) {
        self.target_x = Some(target);
        self.target_y = Some(target);
    }

    /// Advance one frame
    ///
    /// `target` holds the followed positions per axis. Returns `true` if the
    /// camera moved.
    pub fn update(&mut self, dt: f32, target: [Option<f32>; 2], extents: &Rect, design_size: Vec2) -> bool {
        let before = self.position;

        for axis in 0..2 {
            let Some(goal) = target[axis] else {
                continue;
            };
            if self.follow_speed[axis] == 0.0 {
                self.position[axis] = goal;
                self.velocity[axis] = 0.0;
            } else {
                self.velocity[axis] += (goal - self.position[axis]) * self.follow_speed[axis];
            }
        }

        if !self.panning {
            self.position += self.velocity * dt;
            self.velocity.component_mul_assign(&self.damping);
        }

        if self.clip {
            self.clamp(extents, design_size);
        }

        self.position != before
    }

    /// Clamp against the extents, or pin to 0 on axes where the design size
    /// does not fit inside them
    pub fn clamp(&mut self, extents: &Rect, design_size: Vec2) {
        let origin = [extents.x, extents.y];
        let size = [extents.w, extents.h];
        for axis in 0..2 {
            let half = design_size[axis] * 0.5;
            if design_size[axis] <= size[axis] {
                let min = origin[axis] + half;
                let max = origin[axis] + size[axis] - half;
                if self.position[axis] < min {
                    self.position[axis] = min;
                    self.velocity[axis] = 0.0;
                } else if self.position[axis] > max {
                    self.position[axis] = max;
                    self.velocity[axis] = 0.0;
                }
            } else {
                self.position[axis] = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_snap_follow_is_clamped_to_centre() {
        let mut camera = Camera { clip: true, ..Camera::default() };
        let extents = Rect::new(0.0, 0.0, 800.0, 600.0);
        camera.update(0.016, [Some(5000.0), Some(-5000.0)], &extents, Vec2::new(800.0, 600.0));
        assert_relative_eq!(camera.position.x, 400.0);
        assert_relative_eq!(camera.position.y, 300.0);
    }

    #[test]
    fn test_design_larger_than_extents_pins_to_zero() {
        let mut camera = Camera { clip: true, position: Vec2::new(50.0, 0.0), ..Camera::default() };
        camera.clamp(&Rect::new(0.0, 0.0, 500.0, 2000.0), Vec2::new(800.0, 600.0));
        assert_relative_eq!(camera.position.x, 0.0);
    }

    #[test]
    fn test_eased_follow_accumulates_velocity() {
        let mut camera = Camera { follow_speed: Vec2::new(0.5, 0.0), ..Camera::default() };
        camera.update(1.0, [Some(10.0), None], &Rect::default(), Vec2::zeros());
        assert_relative_eq!(camera.velocity.x, 5.0);
        assert_relative_eq!(camera.position.x, 5.0);
    }

    #[test]
    fn test_damping_and_pan_hold() {
        let mut camera = Camera {
            velocity: Vec2::new(100.0, 0.0),
            damping: Vec2::new(0.5, 0.5),
            ..Camera::default()
        };
        camera.update(0.1, [None, None], &Rect::default(), Vec2::zeros());
        assert_relative_eq!(camera.position.x, 10.0);
        assert_relative_eq!(camera.velocity.x, 50.0);

        camera.panning = true;
        camera.update(0.1, [None, None], &Rect::default(), Vec2::zeros());
        assert_relative_eq!(camera.position.x, 10.0);
    }
}
