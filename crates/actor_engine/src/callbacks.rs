//! Named callback registry
//!
//! Scene data refers to behaviour by name ("on_tick": "spin"). Game code
//! registers the functions up front and a loader resolves the names into
//! the boxed closures stored on actors and scenes. Names never become code.

use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::collections::ActorId;
use crate::foundation::math::Vec2;
use crate::scene::Scene;

/// Per-frame actor hook
pub type TickFn = Box<dyn FnMut(&mut Scene, ActorId, f32)>;

/// Actor event without payload (destroy)
pub type ActorFn = Box<dyn FnMut(&mut Scene, ActorId)>;

/// Touch event with the touch point in screen space
pub type TouchFn = Box<dyn FnMut(&mut Scene, ActorId, Vec2)>;

/// Contact event, receives `(self, other)`
pub type CollisionFn = Box<dyn FnMut(&mut Scene, ActorId, ActorId)>;

/// Per-frame scene hook
pub type SceneTickFn = Box<dyn FnMut(&mut Scene, f32)>;

type SharedTick = Rc<dyn Fn(&mut Scene, ActorId, f32)>;
type SharedActor = Rc<dyn Fn(&mut Scene, ActorId)>;
type SharedTouch = Rc<dyn Fn(&mut Scene, ActorId, Vec2)>;
type SharedCollision = Rc<dyn Fn(&mut Scene, ActorId, ActorId)>;
type SharedSceneTick = Rc<dyn Fn(&mut Scene, f32)>;

/// Callback table keyed by name
#[derive(Default)]
pub struct CallbackRegistry {
    ticks: HashMap<String, SharedTick>,
    events: HashMap<String, SharedActor>,
    touches: HashMap<String, SharedTouch>,
    collisions: HashMap<String, SharedCollision>,
    scene_ticks: HashMap<String, SharedSceneTick>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor tick callback
    pub fn register_tick(&mut self, name: impl Into<String>, f: impl Fn(&mut Scene, ActorId, f32) + 'static) {
        self.ticks.insert(name.into(), Rc::new(f));
    }

    /// Register an actor event callback (destroy)
    pub fn register_event(&mut self, name: impl Into<String>, f: impl Fn(&mut Scene, ActorId) + 'static) {
        self.events.insert(name.into(), Rc::new(f));
    }

    /// Register a touch callback
    pub fn register_touch(&mut self, name: impl Into<String>, f: impl Fn(&mut Scene, ActorId, Vec2) + 'static) {
        self.touches.insert(name.into(), Rc::new(f));
    }

    /// Register a collision callback
    pub fn register_collision(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut Scene, ActorId, ActorId) + 'static,
    ) {
        self.collisions.insert(name.into(), Rc::new(f));
    }

    /// Register a scene tick callback
    pub fn register_scene_tick(&mut self, name: impl Into<String>, f: impl Fn(&mut Scene, f32) + 'static) {
        self.scene_ticks.insert(name.into(), Rc::new(f));
    }

    /// Resolve an actor tick callback
    pub fn tick(&self, name: &str) -> Option<TickFn> {
        let f = Rc::clone(self.ticks.get(name)?);
        Some(Box::new(move |scene, id, dt| f(scene, id, dt)))
    }

    /// Resolve an actor event callback
    pub fn event(&self, name: &str) -> Option<ActorFn> {
        let f = Rc::clone(self.events.get(name)?);
        Some(Box::new(move |scene, id| f(scene, id)))
    }

    /// Resolve a touch callback
    pub fn touch(&self, name: &str) -> Option<TouchFn> {
        let f = Rc::clone(self.touches.get(name)?);
        Some(Box::new(move |scene, id, point| f(scene, id, point)))
    }

    /// Resolve a collision callback
    pub fn collision(&self, name: &str) -> Option<CollisionFn> {
        let f = Rc::clone(self.collisions.get(name)?);
        Some(Box::new(move |scene, id, other| f(scene, id, other)))
    }

    /// Resolve a scene tick callback
    pub fn scene_tick(&self, name: &str) -> Option<SceneTickFn> {
        let f = Rc::clone(self.scene_ticks.get(name)?);
        Some(Box::new(move |scene, dt| f(scene, dt)))
    }

    /// True if any callback kind is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.ticks.contains_key(name)
            || self.events.contains_key(name)
            || self.touches.contains_key(name)
            || self.collisions.contains_key(name)
            || self.scene_ticks.contains_key(name)
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("ticks", &self.ticks.keys().collect::<Vec<_>>())
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("touches", &self.touches.keys().collect::<Vec<_>>())
            .field("collisions", &self.collisions.keys().collect::<Vec<_>>())
            .field("scene_ticks", &self.scene_ticks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolved_callbacks_share_one_registration() {
        let mut registry = CallbackRegistry::new();
        registry.register_tick("spin", |scene: &mut Scene, id: ActorId, dt: f32| {
            if let Some(actor) = scene.actor_mut(id) {
                actor.set_rotation(actor.rotation() + dt);
            }
        });

        let mut scene = Scene::new("callbacks");
        let first = scene.add_actor(Actor::new("first"));
        let second = scene.add_actor(Actor::new("second"));
        for id in [first, second] {
            let tick = registry.tick("spin");
            assert!(tick.is_some());
            if let Some(actor) = scene.actor_mut(id) {
                actor.on_tick = tick;
            }
        }

        scene.update(0.5, &crate::scene::FrameContext::default());
        assert_relative_eq!(scene.actor(first).unwrap().rotation(), 0.5);
        assert_relative_eq!(scene.actor(second).unwrap().rotation(), 0.5);
    }

    #[test]
    fn test_lookup_is_per_kind() {
        let mut registry = CallbackRegistry::new();
        registry.register_event("boom", |_: &mut Scene, _: ActorId| {});
        registry.register_scene_tick("clock", |_: &mut Scene, _: f32| {});

        assert!(registry.contains("boom"));
        assert!(registry.event("boom").is_some());
        assert!(registry.tick("boom").is_none());
        assert!(registry.scene_tick("clock").is_some());
        assert!(registry.collision("missing").is_none());
        assert!(!registry.contains("missing"));
    }
}
