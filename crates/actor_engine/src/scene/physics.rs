//! Glue between scene actors and the physics world
//!
//! Actors keep positions in pixels while the world works in physics units;
//! every exchange divides or multiplies by the scene's world scale. Without
//! an attached world every call here is a logged no-op.

use super::{FrameContext, Scene};
use crate::actor::Actor;
use crate::callbacks::CollisionFn;
use crate::config::PhysicsSettings;
use crate::foundation::collections::ActorId;
use crate::foundation::math::Vec2;
use crate::physics::{
    BodyDesc, BodyHandle, BodyType, ContactEvent, FixtureHandle, JointDesc, JointHandle, JointKind,
    MaterialDesc, PhysicsWorld, ShapeDesc,
};

impl Scene {
    /// Attach a physics world, replacing (and emptying) any previous one
    pub fn set_physics_world(&mut self, world: Box<dyn PhysicsWorld>, settings: PhysicsSettings) {
        if self.physics.is_some() {
            let ids: Vec<ActorId> = self.bodies.values().copied().collect();
            for id in ids {
                self.release_physics(id);
            }
        }
        log::info!(
            "Scene '{}' physics attached (scale {} px/unit)",
            self.name,
            settings.world_scale
        );
        self.physics = Some(world);
        self.physics_settings = settings;
    }

    /// True if a physics world is attached
    pub fn has_physics(&self) -> bool {
        self.physics.is_some()
    }

    /// Pixels per physics unit
    pub fn world_scale(&self) -> f32 {
        self.physics_settings.world_scale
    }

    /// Physics settings in use
    pub fn physics_settings(&self) -> &PhysicsSettings {
        &self.physics_settings
    }

    /// Borrow the physics world
    pub fn physics_world(&self) -> Option<&dyn PhysicsWorld> {
        self.physics.as_deref()
    }

    /// Borrow the physics world mutably
    pub fn physics_world_mut(&mut self) -> Option<&mut (dyn PhysicsWorld + 'static)> {
        self.physics.as_deref_mut()
    }

    /// Actor driven by a body
    pub fn body_actor(&self, body: BodyHandle) -> Option<ActorId> {
        self.bodies.get(&body).copied()
    }

    /// Create a body at the actor's position and angle
    ///
    /// Replaces an existing body. Returns `None` when the actor is missing or
    /// the scene has no physics world.
    pub fn init_body(
        &mut self,
        id: ActorId,
        body_type: BodyType,
        fixed_rotation: bool,
        is_bullet: bool,
    ) -> Option<BodyHandle> {
        let (position, angle) = {
            let actor = self.actors.get(id)?;
            (actor.position(), actor.rotation())
        };
        if self.physics.is_none() {
            if self.debug {
                log::debug!("init_body: scene '{}' has no physics world", self.name);
            }
            return None;
        }
        self.release_physics(id);

        let scale = self.world_scale();
        let desc = BodyDesc {
            body_type,
            position: position / scale,
            angle,
            fixed_rotation,
            is_bullet,
        };
        let body = self.physics.as_mut()?.create_body(&desc);
        self.bodies.insert(body, id);
        if let Some(actor) = self.actors.get_mut(id) {
            actor.body = Some(body);
        }
        Some(body)
    }

    /// Attach a fixture to the actor's body; `shape` is in pixels
    pub fn add_fixture(
        &mut self,
        id: ActorId,
        shape: &ShapeDesc,
        material: &MaterialDesc,
    ) -> Option<FixtureHandle> {
        let Some(body) = self.actors.get(id)?.body else {
            if self.debug {
                log::debug!("add_fixture: actor {:?} has no body", id);
            }
            return None;
        };
        let scaled = scale_shape(shape, 1.0 / self.world_scale());
        self.physics.as_mut()?.create_fixture(body, &scaled, material)
    }

    /// Join the bodies of two actors; anchors are local pixel offsets
    ///
    /// The joint is owned by actor `a` and destroyed with it.
    pub fn add_joint(
        &mut self,
        a: ActorId,
        b: ActorId,
        kind: JointKind,
        anchors: (Vec2, Vec2),
        collide_connected: bool,
    ) -> Option<JointHandle> {
        let body_a = self.actors.get(a)?.body;
        let body_b = self.actors.get(b)?.body;
        let (Some(body_a), Some(body_b)) = (body_a, body_b) else {
            if self.debug {
                log::debug!("add_joint: actors {:?} and {:?} need bodies", a, b);
            }
            return None;
        };

        let scale = self.world_scale();
        let kind = match kind {
            JointKind::Distance { length } => JointKind::Distance { length: length / scale },
            other => other,
        };
        let desc = JointDesc {
            kind,
            body_a,
            body_b,
            anchor_a: anchors.0 / scale,
            anchor_b: anchors.1 / scale,
            collide_connected,
        };
        let joint = self.physics.as_mut()?.create_joint(&desc)?;
        if let Some(actor) = self.actors.get_mut(a) {
            actor.joints.push(joint);
        }
        Some(joint)
    }

    /// Destroy a joint owned by an actor
    pub fn remove_joint(&mut self, id: ActorId, joint: JointHandle) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        let Some(index) = actor.joints.iter().position(|&j| j == joint) else {
            return false;
        };
        actor.joints.remove(index);
        if let Some(world) = self.physics.as_mut() {
            world.destroy_joint(joint);
        }
        true
    }

    /// Destroy an actor's joints and body
    pub(crate) fn release_physics(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let joints = std::mem::take(&mut actor.joints);
        let body = actor.body.take();
        if let Some(body) = body {
            self.bodies.remove(&body);
        }
        let Some(world) = self.physics.as_mut() else {
            return;
        };
        for joint in joints {
            world.destroy_joint(joint);
        }
        if let Some(body) = body {
            world.destroy_body(body);
        }
    }

    /// Push the actor's position to its body
    pub(crate) fn sync_body_position(&mut self, id: ActorId) {
        let Some((body, position)) = self.actors.get(id).and_then(|a| Some((a.body?, a.position()))) else {
            return;
        };
        let scale = self.world_scale();
        if let Some(world) = self.physics.as_mut() {
            world.set_body_position(body, position / scale);
        }
    }

    /// Push the actor's rotation to its body
    pub(crate) fn sync_body_angle(&mut self, id: ActorId) {
        let Some((body, angle)) = self.actors.get(id).and_then(|a| Some((a.body?, a.rotation()))) else {
            return;
        };
        if let Some(world) = self.physics.as_mut() {
            world.set_body_angle(body, angle);
        }
    }

    /// Set linear velocity in pixels per second, on the body if there is one
    pub fn set_velocity(&mut self, id: ActorId, velocity: Vec2) -> bool {
        let scale = self.world_scale();
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.motion.velocity = velocity;
        if let (Some(body), Some(world)) = (actor.body, self.physics.as_mut()) {
            world.set_linear_velocity(body, velocity / scale);
        }
        true
    }

    /// Set angular velocity in radians per second, on the body if there is one
    pub fn set_angular_velocity(&mut self, id: ActorId, velocity: f32) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.motion.angular_velocity = velocity;
        if let (Some(body), Some(world)) = (actor.body, self.physics.as_mut()) {
            world.set_angular_velocity(body, velocity);
        }
        true
    }

    /// Step the world and dispatch contact callbacks to both actors
    pub(crate) fn step_physics(&mut self, dt: f32, frame: &FrameContext) {
        let Some(world) = self.physics.as_mut() else {
            return;
        };
        let substeps = frame.physics_substeps();
        let step = dt / substeps as f32;
        let velocity_iterations = self.physics_settings.velocity_iterations;
        let position_iterations = self.physics_settings.position_iterations;
        for _ in 0..substeps {
            world.step(step, velocity_iterations, position_iterations);
        }
        world.clear_forces();

        for event in world.drain_contacts() {
            let (a, b, slot): (_, _, fn(&mut Actor) -> &mut Option<CollisionFn>) = match event {
                ContactEvent::Begin(a, b) => (a, b, |actor| &mut actor.on_collision_start),
                ContactEvent::End(a, b) => (a, b, |actor| &mut actor.on_collision_end),
            };
            let (Some(&actor_a), Some(&actor_b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
                continue;
            };
            self.fire_collision(actor_a, actor_b, slot);
            self.fire_collision(actor_b, actor_a, slot);
        }
    }

    fn fire_collision(
        &mut self,
        id: ActorId,
        other: ActorId,
        slot: fn(&mut Actor) -> &mut Option<CollisionFn>,
    ) {
        let Some(mut callback) = self.actors.get_mut(id).and_then(|a| slot(a).take()) else {
            return;
        };
        callback(self, id, other);
        if let Some(actor) = self.actors.get_mut(id) {
            let stored = slot(actor);
            if stored.is_none() {
                *stored = Some(callback);
            }
        }
    }
}

/// Scale a shape uniformly
fn scale_shape(shape: &ShapeDesc, factor: f32) -> ShapeDesc {
    match shape {
        ShapeDesc::Circle { radius } => ShapeDesc::Circle { radius: radius * factor },
        ShapeDesc::Box { half_width, half_height } => ShapeDesc::Box {
            half_width: half_width * factor,
            half_height: half_height * factor,
        },
        ShapeDesc::Polygon { points } => ShapeDesc::Polygon {
            points: points.iter().map(|p| p * factor).collect(),
        },
    }
}
