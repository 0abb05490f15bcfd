//! Visual state read by the rendering collaborator
//!
//! The engine never draws. Each actor carries a [`Visual`] describing what
//! a renderer should draw at the actor's world transform.

use crate::foundation::math::Vec2;

/// Draw kind with kind-specific fields
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActorKind {
    /// Bitmap or atlas frame
    #[default]
    Sprite,
    /// Filled or stroked rectangle
    Rect {
        /// Corner radius, 0 for sharp corners
        corner_radius: f32,
    },
    /// Circle or arc
    Arc {
        /// Radius in pixels
        radius: f32,
        /// Start angle in radians
        start_angle: f32,
        /// End angle in radians
        end_angle: f32,
    },
    /// Closed or open polygon
    Polygon {
        /// Vertices relative to the actor origin
        points: Vec<Vec2>,
        /// Close the outline
        closed: bool,
    },
    /// Text
    Label {
        /// Text to draw
        text: String,
        /// CSS-style font description
        font: String,
        /// Horizontal alignment
        align: TextAlign,
    },
    /// Grid of atlas tiles
    TileMap {
        /// Columns
        map_width: u32,
        /// Rows
        map_height: u32,
        /// Tile size in pixels
        tile_size: Vec2,
        /// Atlas frame per cell, row-major
        tiles: Vec<u32>,
    },
}

/// Label alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Left aligned
    Left,
    /// Centred
    #[default]
    Center,
    /// Right aligned
    Right,
}

/// Shape used to clip children
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipShape {
    /// The actor's own bounds
    #[default]
    Bounds,
    /// Named shape resource
    Shape(String),
}

/// Everything a renderer needs besides the transform
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Draw kind
    pub kind: ActorKind,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Bitmap resource name
    pub bitmap: Option<String>,
    /// Image atlas resource name
    pub atlas: Option<String>,
    /// Fill colour as CSS text
    pub fill_style: Option<String>,
    /// Stroke colour as CSS text
    pub stroke_style: Option<String>,
    /// Outline width
    pub stroke_thickness: f32,
    /// Clip children against `clip_shape`
    pub clip_children: bool,
    /// Margin added around the clip shape (left, right, top, bottom)
    pub clip_margin: [f32; 4],
    /// Clip shape
    pub clip_shape: ClipShape,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            kind: ActorKind::Sprite,
            opacity: 1.0,
            bitmap: None,
            atlas: None,
            fill_style: None,
            stroke_style: None,
            stroke_thickness: 1.0,
            clip_children: false,
            clip_margin: [0.0; 4],
            clip_shape: ClipShape::Bounds,
        }
    }
}

/// Bitmap frame animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnimation {
    /// Current frame, fractional
    pub frame: f32,
    /// Frames per second
    pub speed: f32,
    /// Number of frames, 0 disables the animation
    pub count: u32,
    /// Wrap around at the end instead of holding the last frame
    pub repeat: bool,
}

impl Default for FrameAnimation {
    fn default() -> Self {
        Self {
            frame: 0.0,
            speed: 0.0,
            count: 0,
            repeat: true,
        }
    }
}

impl FrameAnimation {
    /// Advance by `dt`, wrapping or clamping against the frame count
    pub fn advance(&mut self, dt: f32) {
        if self.count == 0 || self.speed == 0.0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f32;
        self.frame += self.speed * dt;
        if self.repeat {
            self.frame = self.frame.rem_euclid(count);
            // rem_euclid rounds up to `count` for tiny negative inputs
            if self.frame >= count {
                self.frame = 0.0;
            }
        } else {
            self.frame = self.frame.clamp(0.0, count - 1.0);
        }
    }

    /// Integer frame index for the renderer
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index(&self) -> u32 {
        (self.frame.max(0.0) as u32).min(self.count.saturating_sub(1))
    }
}
