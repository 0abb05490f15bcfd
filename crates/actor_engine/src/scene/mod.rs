//! Scenes: actor arenas with a camera, schedulers and optional physics
//!
//! A [`Scene`] owns every actor it contains in a slot-map arena. Root actors
//! are kept in an ordered list and every actor keeps its children in
//! insertion order. Removal is always deferred: [`Scene::destroy_actor`]
//! queues the actor on its owner's removal list, which is drained after the
//! owner finished traversing its children for the frame.

mod camera;
mod hit_test;
mod physics;
mod update;

pub use camera::Camera;
pub use hit_test::TouchState;

use std::collections::HashMap;

use crate::actor::{Actor, ActorProperty};
use crate::callbacks::SceneTickFn;
use crate::config::{PhysicsSettings, SceneSettings};
use crate::foundation::collections::{remove_ordered, ActorId, SlotMap};
use crate::foundation::math::{Mat3, Rect, Vec2};
use crate::physics::{BodyHandle, PhysicsWorld, SimpleWorld};
use crate::resources::ResourceStore;
use crate::scheduling::{ActionsListManager, TaskManager, TimelineManager};

/// Per-frame values handed down from the engine
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    /// Design (screen) size in pixels
    pub design_size: Vec2,
    /// Frame rate the game is tuned for
    pub target_fps: f32,
    /// Rolling measured frame rate, if known
    pub measured_fps: Option<f32>,
    /// Sub-step physics when running slow
    pub adaptive_physics: bool,
    /// Upper bound for physics sub-steps
    pub max_substeps: u32,
    /// Log silently ignored conditions
    pub debug: bool,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            design_size: Vec2::new(1024.0, 768.0),
            target_fps: 60.0,
            measured_fps: None,
            adaptive_physics: false,
            max_substeps: 3,
            debug: false,
        }
    }
}

impl FrameContext {
    /// Physics sub-steps for this frame: `round(target / measured)` in
    /// `[1, max_substeps]` when adaptive, otherwise 1
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn physics_substeps(&self) -> u32 {
        if !self.adaptive_physics {
            return 1;
        }
        match self.measured_fps {
            Some(measured) if measured > 0.0 => {
                let steps = (self.target_fps / measured).round().max(1.0) as u32;
                steps.clamp(1, self.max_substeps.max(1))
            }
            _ => 1,
        }
    }
}

/// Container of root actors plus camera, physics and schedulers
pub struct Scene {
    /// Scene name
    pub name: String,
    /// Updated by the engine
    pub active: bool,
    /// Drawn by the renderer
    pub visible: bool,
    /// Draw order among scenes
    pub layer: i32,
    /// Camera state
    pub camera: Camera,
    /// Camera travel limits and wrap area
    pub extents: Rect,

    size: Vec2,
    design_size: Vec2,
    pub(crate) actors: SlotMap<ActorId, Actor>,
    pub(crate) roots: Vec<ActorId>,
    pub(crate) removals: Vec<ActorId>,

    pub(crate) physics: Option<Box<dyn PhysicsWorld>>,
    pub(crate) physics_settings: PhysicsSettings,
    pub(crate) bodies: HashMap<BodyHandle, ActorId>,

    /// Timelines with the scene as context
    pub timelines: TimelineManager<Scene>,
    /// Action lists with the scene as context
    pub actions: ActionsListManager<Scene>,
    /// Tasks with the scene as context
    pub tasks: TaskManager<Scene>,
    /// Scene-local resources, searched before the engine's
    pub resources: ResourceStore,
    /// Called first in every scene update
    pub on_tick: Option<SceneTickFn>,

    pub(crate) touch: TouchState,
    pub(crate) last_dt: f32,
    pub(crate) debug: bool,
    pub(crate) destroyed: bool,
}

impl Scene {
    /// Create an empty scene sized to the default design size
    pub fn new(name: impl Into<String>) -> Self {
        let design = FrameContext::default().design_size;
        Self {
            name: name.into(),
            active: true,
            visible: true,
            layer: 0,
            camera: Camera::default(),
            extents: Rect::default(),
            size: design,
            design_size: design,
            actors: SlotMap::with_key(),
            roots: Vec::new(),
            removals: Vec::new(),
            physics: None,
            physics_settings: PhysicsSettings::default(),
            bodies: HashMap::new(),
            timelines: TimelineManager::new(),
            actions: ActionsListManager::new(),
            tasks: TaskManager::new(),
            resources: ResourceStore::new(),
            on_tick: None,
            touch: TouchState::default(),
            last_dt: 0.0,
            debug: false,
            destroyed: false,
        }
    }

    /// Create a scene from settings; `design_size` fills unset dimensions
    ///
    /// Physics settings attach a [`SimpleWorld`] with the configured gravity.
    pub fn from_settings(settings: &SceneSettings, design_size: Vec2) -> Self {
        let mut scene = Self::new(settings.name.clone());
        scene.size = Vec2::new(
            settings.width.unwrap_or(design_size.x),
            settings.height.unwrap_or(design_size.y),
        );
        scene.design_size = design_size;
        scene.extents = settings.extents;
        scene.camera.clip = settings.clip_camera;
        scene.camera.damping = Vec2::new(settings.camera_damping[0], settings.camera_damping[1]);
        scene.camera.follow_speed = Vec2::new(settings.follow_speed[0], settings.follow_speed[1]);
        scene.camera.touch_pan = settings.touch_pan;
        if let Some(physics) = &settings.physics {
            let gravity = Vec2::new(physics.gravity[0], physics.gravity[1]);
            scene.set_physics_world(Box::new(SimpleWorld::new(gravity)), physics.clone());
        }
        scene
    }

    /// Scene size in pixels
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Set the scene size
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Design (screen) size seen during the last update
    pub fn design_size(&self) -> Vec2 {
        self.design_size
    }

    /// Set the design size used before the first update
    pub fn set_design_size(&mut self, width: f32, height: f32) {
        self.design_size = Vec2::new(width, height);
    }

    /// True once the engine has queued this scene for removal
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Add a root actor
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = self.insert(actor, None);
        self.roots.push(id);
        id
    }

    /// Add a child actor, `None` if the parent does not exist
    pub fn add_child(&mut self, parent: ActorId, actor: Actor) -> Option<ActorId> {
        if !self.actors.contains_key(parent) {
            log::warn!("add_child: parent {:?} not found in scene '{}'", parent, self.name);
            return None;
        }
        let id = self.insert(actor, Some(parent));
        if let Some(parent) = self.actors.get_mut(parent) {
            parent.children.push(id);
        }
        Some(id)
    }

    fn insert(&mut self, mut actor: Actor, parent: Option<ActorId>) -> ActorId {
        actor.parent = parent;
        actor.children.clear();
        actor.destroyed = false;
        actor.layer_changed = true;
        actor.mark_dirty();
        self.actors.insert(actor)
    }

    /// Queue an actor and its subtree for removal at the end of the frame
    ///
    /// The actor stays valid and reachable until its owner drains removals.
    /// Returns `false` if the actor does not exist or is already queued.
    pub fn destroy_actor(&mut self, id: ActorId) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        if actor.destroyed {
            return false;
        }
        actor.destroyed = true;
        match actor.parent {
            Some(parent) => match self.actors.get_mut(parent) {
                Some(parent) => parent.removals.push(id),
                None => self.removals.push(id),
            },
            None => self.removals.push(id),
        }
        true
    }

    /// Apply queued removals of `owner` (a parent actor, or the scene root
    /// list for `None`)
    pub(crate) fn drain_removals(&mut self, owner: Option<ActorId>) {
        let queued = match owner {
            Some(owner) => match self.actors.get_mut(owner) {
                Some(actor) => std::mem::take(&mut actor.removals),
                None => return,
            },
            None => std::mem::take(&mut self.removals),
        };

        for id in queued {
            let Some(actor) = self.actors.get(id) else {
                continue;
            };
            match actor.parent {
                Some(parent) => {
                    if let Some(parent) = self.actors.get_mut(parent) {
                        remove_ordered(&mut parent.children, &id);
                    }
                }
                None => {
                    remove_ordered(&mut self.roots, &id);
                }
            }
            self.remove_subtree(id);
        }
    }

    /// Detach and free an actor and its descendants, children first
    fn remove_subtree(&mut self, id: ActorId) {
        let mut order = Vec::new();
        self.collect_subtree(id, &mut order);

        for &actor_id in order.iter().rev() {
            let callback = self.actors.get_mut(actor_id).and_then(|a| a.on_destroy.take());
            if let Some(mut on_destroy) = callback {
                on_destroy(self, actor_id);
            }
            self.release_physics(actor_id);
            self.actors.remove(actor_id);
        }
        log::trace!("Removed {} actor(s) from scene '{}'", order.len(), self.name);
    }

    /// Pre-order list of `id` and its descendants
    fn collect_subtree(&self, id: ActorId, out: &mut Vec<ActorId>) {
        let Some(actor) = self.actors.get(id) else {
            return;
        };
        out.push(id);
        for &child in &actor.children {
            self.collect_subtree(child, out);
        }
    }

    /// True if the actor exists (including actors queued for removal)
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(id)
    }

    /// Borrow an actor
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Borrow an actor mutably
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Root actors in update order
    pub fn roots(&self) -> &[ActorId] {
        &self.roots
    }

    /// Number of live actors, including actors queued for removal
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Parent of an actor
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.actors.get(id)?.parent
    }

    /// Children of an actor in update order
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.actors.get(id).map_or(&[], |a| a.children.as_slice())
    }

    /// Find an actor by name among the roots, optionally searching subtrees
    pub fn find_actor(&self, name: &str, recursive: bool) -> Option<ActorId> {
        self.find_in(&self.roots, name, recursive)
    }

    /// Find a child by name, optionally searching deeper descendants
    pub fn find_child(&self, parent: ActorId, name: &str, recursive: bool) -> Option<ActorId> {
        self.find_in(self.children(parent), name, recursive)
    }

    fn find_in(&self, list: &[ActorId], name: &str, recursive: bool) -> Option<ActorId> {
        if let Some(&id) = list.iter().find(|&&id| self.actors.get(id).is_some_and(|a| a.name == name)) {
            return Some(id);
        }
        if !recursive {
            return None;
        }
        list.iter().find_map(|&id| self.find_in(self.children(id), name, true))
    }

    /// Read an actor property
    pub fn get_property(&self, id: ActorId, property: ActorProperty) -> Option<f32> {
        self.actors.get(id).map(|a| a.get_property(property))
    }

    /// Write an actor property; position and angle writes are forwarded to
    /// an attached physics body
    pub fn set_property(&mut self, id: ActorId, property: ActorProperty, value: f32) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.set_property(property, value);
        match property {
            ActorProperty::X | ActorProperty::Y => self.sync_body_position(id),
            ActorProperty::Rotation => self.sync_body_angle(id),
            ActorProperty::Vx | ActorProperty::Vy => {
                let velocity = self.actors.get(id).map(|a| a.motion.velocity);
                if let Some(velocity) = velocity {
                    self.set_velocity(id, velocity);
                }
            }
            ActorProperty::Vr => {
                self.set_angular_velocity(id, value);
            }
            _ => {}
        }
        true
    }

    /// Move an actor, forwarding the new position to its physics body
    pub fn set_position(&mut self, id: ActorId, position: Vec2) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.set_position(position.x, position.y);
        self.sync_body_position(id);
        true
    }

    /// Mark an actor and all of its descendants dirty
    pub fn dirty(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        actor.mark_dirty();
        let count = actor.children.len();
        for i in 0..count {
            let Some(child) = self.actors.get(id).and_then(|a| a.children.get(i).copied()) else {
                break;
            };
            self.dirty(child);
        }
    }

    /// Rebuild an actor's world transform if needed, ancestors first
    pub fn update_transform(&mut self, id: ActorId) {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        for &actor_id in chain.iter().rev() {
            self.rebuild_one(actor_id);
        }
    }

    /// Rebuild every dirty transform in the scene, top-down
    pub fn update_transforms(&mut self) {
        let roots = self.roots.clone();
        for id in roots {
            self.rebuild_subtree(id);
        }
    }

    fn rebuild_subtree(&mut self, id: ActorId) {
        self.rebuild_one(id);
        let children = self.children(id).to_vec();
        for child in children {
            self.rebuild_subtree(child);
        }
    }

    /// Rebuild one actor against its parent's cached world matrix
    fn rebuild_one(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get(id) else {
            return;
        };
        if !actor.transform.dirty {
            return;
        }
        let parent: Option<(Mat3, Vec2)> = if actor.orphaned {
            None
        } else {
            actor
                .parent
                .and_then(|p| self.actors.get(p))
                .map(|p| (p.transform.world, p.transform.accum_scale))
        };
        let camera = self.camera.position;

        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let rebuilt = actor
            .transform
            .rebuild(parent.as_ref().map(|(m, s)| (m, *s)), camera);
        if rebuilt {
            let children = actor.children.clone();
            for child in children {
                if let Some(child) = self.actors.get_mut(child) {
                    child.mark_dirty();
                }
            }
        }
    }

    /// World matrix of an actor, rebuilt if needed
    pub fn world_transform(&mut self, id: ActorId) -> Option<Mat3> {
        self.update_transform(id);
        self.actors.get(id).map(|a| a.transform.world)
    }

    /// World position of an actor, rebuilt if needed
    pub fn world_position(&mut self, id: ActorId) -> Option<Vec2> {
        self.update_transform(id);
        self.actors.get(id).map(|a| a.transform.world_position())
    }

    /// Stable-sort a child list (or the root list) by layer if any member
    /// changed layer since the last sort
    pub(crate) fn sort_layers(&mut self, owner: Option<ActorId>) {
        let list = match owner {
            Some(owner) => match self.actors.get(owner) {
                Some(actor) => &actor.children,
                None => return,
            },
            None => &self.roots,
        };
        let changed = list
            .iter()
            .any(|&id| self.actors.get(id).is_some_and(|a| a.layer_changed));
        if !changed {
            return;
        }

        let mut sorted = list.clone();
        sorted.sort_by_key(|&id| self.actors.get(id).map_or(0, Actor::layer));
        for &id in &sorted {
            if let Some(actor) = self.actors.get_mut(id) {
                actor.layer_changed = false;
            }
        }
        match owner {
            Some(owner) => {
                if let Some(actor) = self.actors.get_mut(owner) {
                    actor.children = sorted;
                }
            }
            None => self.roots = sorted,
        }
    }

    /// Remove every actor without firing callbacks
    pub fn clear(&mut self) {
        let bodies: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        if let Some(world) = self.physics.as_mut() {
            for body in bodies {
                world.destroy_body(body);
            }
        }
        self.bodies.clear();
        self.actors.clear();
        self.roots.clear();
        self.removals.clear();
        self.touch = TouchState::default();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("actors", &self.actors.len())
            .field("roots", &self.roots)
            .field("camera", &self.camera)
            .field("extents", &self.extents)
            .field("physics", &self.physics.is_some())
            .finish_non_exhaustive()
    }
}
