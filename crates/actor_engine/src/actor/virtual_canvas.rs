//! Scrollable container state
//!
//! A virtual canvas scrolls its children. While touched the scroll offset
//! follows the raw touch delta; once released it coasts on its velocity,
//! which decays by [`VirtualCanvas::DECAY`] per frame and snaps to zero
//! below [`VirtualCanvas::SNAP`].

use crate::foundation::math::{Rect, Vec2};

/// Scroll state of a virtual canvas actor
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualCanvas {
    /// Current scroll offset
    pub scroll_pos: Vec2,
    /// Scroll velocity in pixels per second
    pub scroll_velocity: Vec2,
    /// Allowed scroll offsets
    pub scroll_range: Rect,
    /// Hide children that scroll outside the canvas
    pub clip_virtual: bool,
    pub(crate) touching: bool,
}

impl Default for VirtualCanvas {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl VirtualCanvas {
    /// Velocity multiplier applied every frame while coasting
    pub const DECAY: f32 = 0.9;

    /// Speeds below this snap to zero
    pub const SNAP: f32 = 0.5;

    /// Create a canvas with the given scroll range
    pub fn new(scroll_range: Rect) -> Self {
        Self {
            scroll_pos: Vec2::zeros(),
            scroll_velocity: Vec2::zeros(),
            scroll_range,
            clip_virtual: true,
            touching: false,
        }
    }

    /// True while a touch holds the canvas
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Clamp `scroll_pos` to the range; zero velocity on axes that hit a limit
    fn clamp_to_range(&mut self) {
        let range = self.scroll_range;
        if self.scroll_pos.x < range.left() {
            self.scroll_pos.x = range.left();
            self.scroll_velocity.x = 0.0;
        } else if self.scroll_pos.x > range.right() {
            self.scroll_pos.x = range.right();
            self.scroll_velocity.x = 0.0;
        }
        if self.scroll_pos.y < range.top() {
            self.scroll_pos.y = range.top();
            self.scroll_velocity.y = 0.0;
        } else if self.scroll_pos.y > range.bottom() {
            self.scroll_pos.y = range.bottom();
            self.scroll_velocity.y = 0.0;
        }
    }

    /// Coast for one frame; returns the scroll delta
    pub fn update(&mut self, dt: f32) -> Vec2 {
        if self.touching {
            return Vec2::zeros();
        }
        let before = self.scroll_pos;
        self.scroll_pos += self.scroll_velocity * dt;
        self.scroll_velocity *= Self::DECAY;
        if self.scroll_velocity.x.abs() < Self::SNAP {
            self.scroll_velocity.x = 0.0;
        }
        if self.scroll_velocity.y.abs() < Self::SNAP {
            self.scroll_velocity.y = 0.0;
        }
        self.clamp_to_range();
        self.scroll_pos - before
    }

    /// Apply a touch-move delta; returns the scroll delta actually applied
    pub fn scroll_by(&mut self, delta: Vec2) -> Vec2 {
        let before = self.scroll_pos;
        self.scroll_pos += delta;
        self.clamp_to_range();
        self.scroll_pos - before
    }

    /// Start a touch: hold the canvas and kill momentum
    pub fn begin_touch(&mut self) {
        self.touching = true;
        self.scroll_velocity = Vec2::zeros();
    }

    /// Release the touch with a flick velocity
    pub fn end_touch(&mut self, velocity: Vec2) {
        self.touching = false;
        self.scroll_velocity = velocity;
    }
}

/// True if a child centred at `child_pos` with `child_half` extents overlaps
/// a canvas of `canvas_half` extents
pub fn child_in_view(child_pos: Vec2, child_half: Vec2, canvas_half: Vec2) -> bool {
    child_pos.x.abs() <= canvas_half.x + child_half.x
        && child_pos.y.abs() <= canvas_half.y + child_half.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wide_canvas() -> VirtualCanvas {
        VirtualCanvas::new(Rect::new(-1000.0, -1000.0, 2000.0, 2000.0))
    }

    #[test]
    fn test_velocity_decays_then_snaps() {
        let mut canvas = wide_canvas();
        canvas.scroll_velocity = Vec2::new(10.0, 0.0);
        let mut previous = canvas.scroll_velocity.x;
        loop {
            canvas.update(1.0 / 60.0);
            let v = canvas.scroll_velocity.x;
            if v == 0.0 {
                assert!(previous * VirtualCanvas::DECAY < VirtualCanvas::SNAP);
                break;
            }
            assert_relative_eq!(v, previous * VirtualCanvas::DECAY, epsilon = 1e-5);
            previous = v;
        }
    }

    #[test]
    fn test_touch_delta_is_clamped_and_stops_axis() {
        let mut canvas = VirtualCanvas::new(Rect::new(0.0, 0.0, 100.0, 0.0));
        canvas.scroll_velocity = Vec2::new(50.0, 0.0);
        let applied = canvas.scroll_by(Vec2::new(150.0, 20.0));
        assert_relative_eq!(applied.x, 100.0);
        assert_relative_eq!(applied.y, 0.0);
        assert_relative_eq!(canvas.scroll_velocity.x, 0.0);
    }

    #[test]
    fn test_no_coasting_while_touched() {
        let mut canvas = wide_canvas();
        canvas.scroll_velocity = Vec2::new(100.0, 0.0);
        canvas.begin_touch();
        assert_eq!(canvas.update(0.1), Vec2::zeros());
        canvas.end_touch(Vec2::new(30.0, 0.0));
        assert_relative_eq!(canvas.update(0.1).x, 3.0);
    }

    #[test]
    fn test_child_in_view() {
        let half = Vec2::new(100.0, 100.0);
        assert!(child_in_view(Vec2::new(105.0, 0.0), Vec2::new(10.0, 10.0), half));
        assert!(!child_in_view(Vec2::new(111.0, 0.0), Vec2::new(10.0, 10.0), half));
    }
}
