//! Actors: the nodes of the scene graph
//!
//! An [`Actor`] is plain data owned by its scene's arena and addressed by
//! [`ActorId`]. Hierarchy, update order and deferred removal are driven by
//! the [`Scene`](crate::scene::Scene); this module holds the per-actor state
//! and the pieces of logic that only need one actor.

pub mod actions;
pub mod motion;
pub mod transform;
pub mod virtual_canvas;
pub mod visual;

pub use motion::{DockX, DockY, Docking, Motion, MotionStep};
pub use transform::Transform2D;
pub use virtual_canvas::VirtualCanvas;
pub use visual::{ActorKind, ClipShape, FrameAnimation, TextAlign, Visual};

use crate::callbacks::{ActorFn, CollisionFn, TickFn, TouchFn};
use crate::foundation::collections::ActorId;
use crate::foundation::math::{Mat3, Vec2};
use crate::physics::{BodyHandle, JointHandle};
use crate::scene::Scene;
use crate::scheduling::{ActionsListManager, TaskManager, TimelineManager};

/// Animatable actor fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorProperty {
    /// Position x
    X,
    /// Position y
    Y,
    /// Rotation in radians
    Rotation,
    /// Horizontal scale
    ScaleX,
    /// Vertical scale
    ScaleY,
    /// Parallax depth
    Depth,
    /// Opacity
    Opacity,
    /// Width in pixels
    Width,
    /// Height in pixels
    Height,
    /// Origin x
    OriginX,
    /// Origin y
    OriginY,
    /// Velocity x
    Vx,
    /// Velocity y
    Vy,
    /// Angular velocity
    Vr,
    /// Bitmap animation frame
    Frame,
}

impl ActorProperty {
    /// Parse a property name as used in scene data
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "x" | "_x" => Self::X,
            "y" | "_y" => Self::Y,
            "r" | "rotation" | "_r" => Self::Rotation,
            "sx" | "scale_x" | "_sx" => Self::ScaleX,
            "sy" | "scale_y" | "_sy" => Self::ScaleY,
            "depth" | "_depth" => Self::Depth,
            "opacity" | "_opacity" => Self::Opacity,
            "w" | "width" => Self::Width,
            "h" | "height" => Self::Height,
            "ox" => Self::OriginX,
            "oy" => Self::OriginY,
            "vx" => Self::Vx,
            "vy" => Self::Vy,
            "vr" => Self::Vr,
            "frame" | "current_frame" => Self::Frame,
            _ => return None,
        };
        Some(property)
    }

    /// True for fields that invalidate the transform when written
    pub fn affects_transform(self) -> bool {
        matches!(
            self,
            Self::X
                | Self::Y
                | Self::Rotation
                | Self::ScaleX
                | Self::ScaleY
                | Self::Depth
                | Self::Width
                | Self::Height
                | Self::OriginX
                | Self::OriginY
        )
    }
}

/// A scene-graph node
pub struct Actor {
    /// Name used by lookups
    pub name: String,
    /// Free-form group tag
    pub tag: String,
    /// Numeric user id
    pub user_id: i64,

    pub(crate) parent: Option<ActorId>,
    pub(crate) children: Vec<ActorId>,
    pub(crate) removals: Vec<ActorId>,

    pub(crate) transform: Transform2D,
    layer: i32,
    pub(crate) layer_changed: bool,

    /// Arcade motion state
    pub motion: Motion,
    /// Docking request
    pub dock: Docking,
    /// Drawing state
    pub visual: Visual,
    /// Bitmap frame animation
    pub frames: FrameAnimation,
    /// Scroll state when the actor is a virtual canvas
    pub canvas: Option<VirtualCanvas>,

    /// Updated each frame
    pub active: bool,
    /// Drawn each frame
    pub visible: bool,
    /// Takes part in hit testing
    pub touchable: bool,
    /// Hit test and draw in screen space
    pub ignore_camera: bool,
    /// Compose against the scene instead of the parent
    pub orphaned: bool,
    /// Teleport across the scene extents
    pub wrap_position: bool,
    /// Cleared when scrolled out of a clipping virtual canvas
    pub in_view: bool,
    pub(crate) destroyed: bool,

    pub(crate) body: Option<BodyHandle>,
    pub(crate) joints: Vec<JointHandle>,

    /// Keyframe animations targeting this actor
    pub timelines: TimelineManager<Scene>,
    /// Action lists owned by this actor
    pub actions: ActionsListManager<Scene>,
    /// Tasks owned by this actor
    pub tasks: TaskManager<Scene>,

    /// Called first in every update
    pub on_tick: Option<TickFn>,
    /// Called when the actor is removed from the scene
    pub on_destroy: Option<ActorFn>,
    /// Called when a physics contact starts
    pub on_collision_start: Option<CollisionFn>,
    /// Called when a physics contact ends
    pub on_collision_end: Option<CollisionFn>,
    /// Called when a touch starts on the actor
    pub on_begin_touch: Option<TouchFn>,
    /// Called when a touch that started on the actor ends
    pub on_end_touch: Option<TouchFn>,
    /// Called when a touch starts and ends on the actor
    pub on_tapped: Option<TouchFn>,
    /// Called while a touch that started on the actor moves
    pub on_move_touch: Option<TouchFn>,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Actor {
    /// Create an active, visible, touch-transparent actor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            user_id: 0,
            parent: None,
            children: Vec::new(),
            removals: Vec::new(),
            transform: Transform2D::default(),
            layer: 0,
            layer_changed: false,
            motion: Motion::default(),
            dock: Docking::default(),
            visual: Visual::default(),
            frames: FrameAnimation::default(),
            canvas: None,
            active: true,
            visible: true,
            touchable: false,
            ignore_camera: false,
            orphaned: false,
            wrap_position: false,
            in_view: true,
            destroyed: false,
            body: None,
            joints: Vec::new(),
            timelines: TimelineManager::new(),
            actions: ActionsListManager::new(),
            tasks: TaskManager::new(),
            on_tick: None,
            on_destroy: None,
            on_collision_start: None,
            on_collision_end: None,
            on_begin_touch: None,
            on_end_touch: None,
            on_tapped: None,
            on_move_touch: None,
        }
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.set_position(x, y);
        self
    }

    /// Builder pattern: set size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.set_size(width, height);
        self
    }

    /// Builder pattern: set rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.set_scale(sx, sy);
        self
    }

    /// Builder pattern: set velocity
    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.motion.velocity = Vec2::new(vx, vy);
        self
    }

    /// Builder pattern: set the draw kind
    pub fn with_kind(mut self, kind: ActorKind) -> Self {
        self.visual.kind = kind;
        self
    }

    /// Builder pattern: set the tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Builder pattern: set the layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Builder pattern: enable hit testing
    pub fn touchable(mut self) -> Self {
        self.touchable = true;
        self
    }

    /// Builder pattern: make the actor a virtual canvas
    pub fn with_canvas(mut self, canvas: VirtualCanvas) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Builder pattern: set the tick callback
    pub fn on_tick(mut self, f: impl FnMut(&mut Scene, ActorId, f32) + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Parent actor, `None` for roots
    pub fn parent(&self) -> Option<ActorId> {
        self.parent
    }

    /// Children in update order
    pub fn children(&self) -> &[ActorId] {
        &self.children
    }

    /// True once `destroy_actor` has been called, until the removal drain
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Attached physics body
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Joints created through this actor
    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// Transform state
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Position x
    pub fn x(&self) -> f32 {
        self.transform.position.x
    }

    /// Position y
    pub fn y(&self) -> f32 {
        self.transform.position.y
    }

    /// Local position
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    /// Scale
    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    /// Origin, fractional inside `[-1, 1]`, pixels otherwise
    pub fn origin(&self) -> Vec2 {
        self.transform.origin
    }

    /// Parallax depth
    pub fn depth(&self) -> f32 {
        self.transform.depth
    }

    /// Size in pixels
    pub fn size(&self) -> Vec2 {
        self.transform.size
    }

    /// Half the scaled size, used by docking and culling
    pub fn half_extents(&self) -> Vec2 {
        self.transform.size.component_mul(&self.transform.scale) * 0.5
    }

    /// Layer
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Cached world matrix, valid after the scene updated transforms
    pub fn world_transform(&self) -> &Mat3 {
        &self.transform.world
    }

    /// Accumulated scale, valid after the scene updated transforms
    pub fn accum_scale(&self) -> Vec2 {
        self.transform.accum_scale
    }

    /// True when the world matrix needs a rebuild
    pub fn is_dirty(&self) -> bool {
        self.transform.dirty
    }

    /// Flag this actor's transform for rebuild
    ///
    /// Only this actor is flagged; use [`Scene::dirty`] to flag a subtree.
    /// The scene dirties children itself whenever it rebuilds a parent.
    pub fn mark_dirty(&mut self) {
        self.transform.dirty = true;
    }

    /// Set position
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.position = Vec2::new(x, y);
        self.mark_dirty();
    }

    /// Set rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.transform.rotation = rotation;
        self.mark_dirty();
    }

    /// Set scale
    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale = Vec2::new(sx, sy);
        self.mark_dirty();
    }

    /// Set origin
    pub fn set_origin(&mut self, ox: f32, oy: f32) {
        self.transform.origin = Vec2::new(ox, oy);
        self.mark_dirty();
    }

    /// Set parallax depth
    pub fn set_depth(&mut self, depth: f32) {
        self.transform.depth = depth;
        self.mark_dirty();
    }

    /// Set size
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.transform.size = Vec2::new(width, height);
        self.mark_dirty();
    }

    /// Set layer; the owning list re-sorts after its next traversal
    pub fn set_layer(&mut self, layer: i32) {
        if self.layer != layer {
            self.layer = layer;
            self.layer_changed = true;
        }
    }

    /// Read an animatable property
    pub fn get_property(&self, property: ActorProperty) -> f32 {
        let t = &self.transform;
        match property {
            ActorProperty::X => t.position.x,
            ActorProperty::Y => t.position.y,
            ActorProperty::Rotation => t.rotation,
            ActorProperty::ScaleX => t.scale.x,
            ActorProperty::ScaleY => t.scale.y,
            ActorProperty::Depth => t.depth,
            ActorProperty::Opacity => self.visual.opacity,
            ActorProperty::Width => t.size.x,
            ActorProperty::Height => t.size.y,
            ActorProperty::OriginX => t.origin.x,
            ActorProperty::OriginY => t.origin.y,
            ActorProperty::Vx => self.motion.velocity.x,
            ActorProperty::Vy => self.motion.velocity.y,
            ActorProperty::Vr => self.motion.angular_velocity,
            ActorProperty::Frame => self.frames.frame,
        }
    }

    /// Write an animatable property, marking the transform dirty if needed
    pub fn set_property(&mut self, property: ActorProperty, value: f32) {
        let t = &mut self.transform;
        match property {
            ActorProperty::X => t.position.x = value,
            ActorProperty::Y => t.position.y = value,
            ActorProperty::Rotation => t.rotation = value,
            ActorProperty::ScaleX => t.scale.x = value,
            ActorProperty::ScaleY => t.scale.y = value,
            ActorProperty::Depth => t.depth = value,
            ActorProperty::Opacity => self.visual.opacity = value.clamp(0.0, 1.0),
            ActorProperty::Width => t.size.x = value,
            ActorProperty::Height => t.size.y = value,
            ActorProperty::OriginX => t.origin.x = value,
            ActorProperty::OriginY => t.origin.y = value,
            ActorProperty::Vx => self.motion.velocity.x = value,
            ActorProperty::Vy => self.motion.velocity.y = value,
            ActorProperty::Vr => self.motion.angular_velocity = value,
            ActorProperty::Frame => self.frames.frame = value,
        }
        if property.affects_transform() {
            self.mark_dirty();
        }
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("position", &self.transform.position)
            .field("layer", &self.layer)
            .field("active", &self.active)
            .field("visible", &self.visible)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_setters_mark_dirty() {
        let mut actor = Actor::new("ship");
        actor.transform.dirty = false;
        actor.set_rotation(1.0);
        assert!(actor.is_dirty());

        actor.transform.dirty = false;
        actor.set_property(ActorProperty::Opacity, 0.5);
        assert!(!actor.is_dirty());
        actor.set_property(ActorProperty::ScaleX, 2.0);
        assert!(actor.is_dirty());
    }

    #[test]
    fn test_property_round_trip_through_names() {
        let mut actor = Actor::new("a");
        let vx = ActorProperty::from_name("vx").unwrap();
        actor.set_property(vx, 12.0);
        assert_relative_eq!(actor.motion.velocity.x, 12.0);
        assert!(ActorProperty::from_name("colour").is_none());
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut actor = Actor::new("a");
        actor.set_property(ActorProperty::Opacity, 3.0);
        assert_relative_eq!(actor.visual.opacity, 1.0);
    }

    #[test]
    fn test_layer_change_is_flagged_once() {
        let mut actor = Actor::new("a");
        actor.set_layer(0);
        assert!(!actor.layer_changed);
        actor.set_layer(3);
        assert!(actor.layer_changed);
        assert_eq!(actor.layer(), 3);
    }

    #[test]
    fn test_half_extents_use_scale() {
        let actor = Actor::new("a").with_size(40.0, 20.0).with_scale(2.0, 0.5);
        assert_eq!(actor.half_extents(), Vec2::new(40.0, 5.0));
    }
}
