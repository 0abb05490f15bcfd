//! Math utilities and types
//!
//! Provides the 2D math types used by the actor and scene modules. World
//! transforms are 2×3 affine matrices stored in homogeneous `Mat3` form:
//!
//! ```text
//! | a  c  tx |
//! | b  d  ty |
//! | 0  0  1  |
//! ```

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (used as a 2D affine transform)
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x <= self.right()
            && point.y >= self.top() && point.y <= self.bottom()
    }
}

/// Affine matrix helpers
pub mod affine {
    use super::{Mat3, Vec2};

    /// Build an affine matrix from its six coefficients
    pub fn from_parts(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Mat3 {
        Mat3::new(
            a, c, tx,
            b, d, ty,
            0.0, 0.0, 1.0,
        )
    }

    /// Pure translation
    pub fn translation(x: f32, y: f32) -> Mat3 {
        from_parts(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Translation column of an affine matrix
    pub fn translation_of(m: &Mat3) -> Vec2 {
        Vec2::new(m[(0, 2)], m[(1, 2)])
    }

    /// The 2×2 rotation/scale block as `(a, b, c, d)`
    pub fn linear_of(m: &Mat3) -> (f32, f32, f32, f32) {
        (m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)])
    }

    /// Transform a point by an affine matrix
    pub fn transform_point(m: &Mat3, p: Vec2) -> Vec2 {
        let (a, b, c, d) = linear_of(m);
        Vec2::new(a * p.x + c * p.y + m[(0, 2)], b * p.x + d * p.y + m[(1, 2)])
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap a value into `[min, min + range)`, keeping the overflow amount
    pub fn wrap(value: f32, min: f32, range: f32) -> f32 {
        if range <= 0.0 {
            return value;
        }
        min + (value - min).rem_euclid(range)
    }
}
