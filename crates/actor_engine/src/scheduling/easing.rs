//! Easing functions used by timeline segments and tween actions

use serde::{Deserialize, Serialize};

/// Easing function id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic, accelerating
    QuadIn,
    /// Quadratic, decelerating
    QuadOut,
    /// Cubic, accelerating
    CubicIn,
    /// Cubic, decelerating
    CubicOut,
    /// Quartic, accelerating
    QuarticIn,
    /// Quartic, decelerating
    QuarticOut,
    /// Quintic, accelerating
    QuinticIn,
    /// Quintic, decelerating
    QuinticOut,
    /// Quarter sine wave, decelerating
    Sin,
    /// Quarter cosine wave, accelerating
    Cos,
}

impl Ease {
    /// Map normalized time `t` in `[0, 1]` to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - inv * inv,
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - inv * inv * inv,
            Self::QuarticIn => t * t * t * t,
            Self::QuarticOut => 1.0 - inv * inv * inv * inv,
            Self::QuinticIn => t * t * t * t * t,
            Self::QuinticOut => 1.0 - inv * inv * inv * inv * inv,
            Self::Sin => (t * std::f32::consts::FRAC_PI_2).sin(),
            Self::Cos => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
        }
    }

    /// Interpolate between two values
    pub fn interpolate(self, from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * self.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Ease; 11] = [
        Ease::Linear,
        Ease::QuadIn,
        Ease::QuadOut,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::QuarticIn,
        Ease::QuarticOut,
        Ease::QuinticIn,
        Ease::QuinticOut,
        Ease::Sin,
        Ease::Cos,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for ease in ALL {
            assert_relative_eq!(ease.apply(0.0), 0.0, epsilon = 1e-6);
            assert_relative_eq!(ease.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_in_and_out_bend_opposite_ways() {
        assert!(Ease::QuadIn.apply(0.5) < 0.5);
        assert!(Ease::QuadOut.apply(0.5) > 0.5);
        assert!(Ease::Cos.apply(0.5) < 0.5);
        assert!(Ease::Sin.apply(0.5) > 0.5);
    }

    #[test]
    fn test_interpolate_clamps_time() {
        assert_relative_eq!(Ease::Linear.interpolate(10.0, 20.0, 2.0), 20.0);
        assert_relative_eq!(Ease::Linear.interpolate(10.0, 20.0, 0.25), 12.5);
    }
}
