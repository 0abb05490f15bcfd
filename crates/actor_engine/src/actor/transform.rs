//! Per-actor transform composition
//!
//! Local matrix layout (columns a/b, c/d, translation):
//!
//! ```text
//! | cos*sx  -sin*sy  x |
//! | sin*sx   cos*sy  y |   *  T(-ox, -oy)
//! |   0        0     1 |
//! ```
//!
//! A depth other than 0 or 1 divides scale by depth and places the actor
//! relative to the camera (parallax). Origins inside `[-1, 1]` are a
//! fraction of the actor size, anything else is in pixels.

use crate::foundation::math::{affine, Mat3, Vec2};

/// Transform fields plus the cached world matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Transform2D {
    pub(crate) position: Vec2,
    pub(crate) origin: Vec2,
    pub(crate) rotation: f32,
    pub(crate) scale: Vec2,
    pub(crate) depth: f32,
    pub(crate) size: Vec2,
    pub(crate) world: Mat3,
    pub(crate) accum_scale: Vec2,
    pub(crate) dirty: bool,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            origin: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            depth: 0.0,
            size: Vec2::zeros(),
            world: Mat3::identity(),
            accum_scale: Vec2::new(1.0, 1.0),
            dirty: true,
        }
    }
}

impl Transform2D {
    /// True when depth triggers the perspective divide
    pub fn has_parallax(&self) -> bool {
        self.depth != 0.0 && self.depth != 1.0
    }

    /// Origin resolved to pixels
    pub fn origin_pixels(&self) -> Vec2 {
        let resolve = |o: f32, extent: f32| if (-1.0..=1.0).contains(&o) { o * extent } else { o };
        Vec2::new(
            resolve(self.origin.x, self.size.x),
            resolve(self.origin.y, self.size.y),
        )
    }

    /// Build the local matrix and its scale for the given camera position
    pub fn local_matrix(&self, camera: Vec2) -> (Mat3, Vec2) {
        let mut scale = self.scale;
        let mut position = self.position;
        if self.has_parallax() {
            let pd = 1.0 / self.depth;
            scale *= pd;
            position = (position - camera) * pd;
        }

        let (sin, cos) = self.rotation.sin_cos();
        let m = affine::from_parts(
            cos * scale.x,
            sin * scale.x,
            -sin * scale.y,
            cos * scale.y,
            position.x,
            position.y,
        );
        let origin = self.origin_pixels();
        (m * affine::translation(-origin.x, -origin.y), scale)
    }

    /// Rebuild the world matrix if dirty
    ///
    /// `parent` carries the parent's world matrix and accumulated scale, or
    /// `None` for root and orphaned actors. Returns `true` if a rebuild
    /// happened, in which case the caller must dirty the children.
    pub fn rebuild(&mut self, parent: Option<(&Mat3, Vec2)>, camera: Vec2) -> bool {
        if !self.dirty {
            return false;
        }
        let (local, scale) = self.local_matrix(camera);
        match parent {
            Some((parent_world, parent_scale)) => {
                self.world = parent_world * local;
                self.accum_scale = parent_scale.component_mul(&scale);
            }
            None => {
                self.world = local;
                self.accum_scale = scale;
            }
        }
        self.dirty = false;
        true
    }

    /// World-space position (translation of the world matrix)
    pub fn world_position(&self) -> Vec2 {
        affine::translation_of(&self.world)
    }

    /// Map a screen point into approximate local space and test it against
    /// the half size
    ///
    /// The point is translated by the world position, then the 2x2 block is
    /// transposed and the accumulated scale divided out. Exact for rotation
    /// about the centre; non-centre origins and parallax depth drift.
    pub fn contains_point(&self, point: Vec2, camera: Option<Vec2>) -> bool {
        let (a, b, c, d) = affine::linear_of(&self.world);
        let mut origin = self.world_position();
        if let Some(camera) = camera {
            origin -= camera;
        }
        let delta = point - origin;

        let sx2 = self.accum_scale.x * self.accum_scale.x;
        let sy2 = self.accum_scale.y * self.accum_scale.y;
        if sx2 == 0.0 || sy2 == 0.0 {
            return false;
        }
        let lx = (a * delta.x + b * delta.y) / sx2;
        let ly = (c * delta.x + d * delta.y) / sy2;

        lx.abs() <= self.size.x * 0.5 && ly.abs() <= self.size.y * 0.5
    }
}
