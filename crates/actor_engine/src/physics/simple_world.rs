//! Minimal built-in physics backend
//!
//! Euler integration with gravity plus overlap-based contact detection.
//! There is no collision response and joints are only recorded; this backend
//! exists so scenes, tests and headless demos can run without an external
//! physics engine.

use std::collections::{HashMap, HashSet};

use super::{
    BodyDesc, BodyHandle, BodyType, ContactEvent, FixtureHandle, JointDesc, JointHandle,
    MaterialDesc, PhysicsWorld, ShapeDesc,
};
use crate::foundation::math::Vec2;

/// Unordered pair of bodies in contact, smaller handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ContactPair {
    body_a: BodyHandle,
    body_b: BodyHandle,
}

impl ContactPair {
    fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a < b {
            Self { body_a: a, body_b: b }
        } else {
            Self { body_a: b, body_b: a }
        }
    }
}

#[derive(Debug, Clone)]
struct Fixture {
    shape: ShapeDesc,
    material: MaterialDesc,
}

#[derive(Debug, Clone)]
struct Body {
    body_type: BodyType,
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
    force: Vec2,
    fixed_rotation: bool,
    fixtures: Vec<Fixture>,
}

/// World-space collision bounds of one fixture
#[derive(Debug, Clone, Copy)]
enum Bounds {
    Circle { center: Vec2, radius: f32 },
    Box { min: Vec2, max: Vec2 },
}

impl Bounds {
    fn of(shape: &ShapeDesc, position: Vec2) -> Option<Self> {
        match shape {
            ShapeDesc::Circle { radius } => Some(Self::Circle {
                center: position,
                radius: *radius,
            }),
            ShapeDesc::Box { half_width, half_height } => {
                let half = Vec2::new(*half_width, *half_height);
                Some(Self::Box {
                    min: position - half,
                    max: position + half,
                })
            }
            ShapeDesc::Polygon { points } => {
                let first = points.first()?;
                let (min, max) = points.iter().fold((*first, *first), |(min, max), p| {
                    (min.inf(p), max.sup(p))
                });
                Some(Self::Box {
                    min: position + min,
                    max: position + max,
                })
            }
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Circle { center: ca, radius: ra }, Self::Circle { center: cb, radius: rb }) => {
                (ca - cb).norm_squared() < (ra + rb) * (ra + rb)
            }
            (Self::Box { min: amin, max: amax }, Self::Box { min: bmin, max: bmax }) => {
                amin.x < bmax.x && amax.x > bmin.x && amin.y < bmax.y && amax.y > bmin.y
            }
            (Self::Circle { center, radius }, Self::Box { min, max })
            | (Self::Box { min, max }, Self::Circle { center, radius }) => {
                let closest = Vec2::new(center.x.clamp(min.x, max.x), center.y.clamp(min.y, max.y));
                (center - closest).norm_squared() < radius * radius
            }
        }
    }
}

/// Reference physics backend
#[derive(Debug)]
pub struct SimpleWorld {
    gravity: Vec2,
    bodies: HashMap<BodyHandle, Body>,
    joints: HashMap<JointHandle, JointDesc>,
    next_id: u64,
    current_pairs: HashSet<ContactPair>,
    previous_pairs: HashSet<ContactPair>,
    events: Vec<ContactEvent>,
}

impl SimpleWorld {
    /// Create an empty world
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: HashMap::new(),
            joints: HashMap::new(),
            next_id: 1,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// World gravity
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Accumulate a force on a dynamic body until the next `clear_forces`
    pub fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.force += force;
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            match body.body_type {
                BodyType::Static => continue,
                BodyType::Dynamic => {
                    let mass: f32 = body.fixtures.iter().map(|f| f.material.density).sum();
                    let inv_mass = if mass > 0.0 { 1.0 / mass } else { 1.0 };
                    body.velocity += (self.gravity + body.force * inv_mass) * dt;
                }
                BodyType::Kinematic => {}
            }
            body.position += body.velocity * dt;
            if !body.fixed_rotation {
                body.angle += body.angular_velocity * dt;
            }
        }
    }

    fn detect_contacts(&mut self) {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let mut handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        handles.sort_unstable();

        for (i, &handle_a) in handles.iter().enumerate() {
            for &handle_b in &handles[i + 1..] {
                if self.joined_without_collision(handle_a, handle_b) {
                    continue;
                }
                let (Some(a), Some(b)) = (self.bodies.get(&handle_a), self.bodies.get(&handle_b)) else {
                    continue;
                };
                if a.body_type == BodyType::Static && b.body_type == BodyType::Static {
                    continue;
                }
                if Self::bodies_touch(a, b) {
                    self.current_pairs.insert(ContactPair::new(handle_a, handle_b));
                }
            }
        }

        let mut began: Vec<ContactPair> = self.current_pairs.difference(&self.previous_pairs).copied().collect();
        let mut ended: Vec<ContactPair> = self.previous_pairs.difference(&self.current_pairs).copied().collect();
        began.sort_unstable_by_key(|p| (p.body_a, p.body_b));
        ended.sort_unstable_by_key(|p| (p.body_a, p.body_b));

        self.events.extend(began.into_iter().map(|p| ContactEvent::Begin(p.body_a, p.body_b)));
        self.events.extend(ended.into_iter().map(|p| ContactEvent::End(p.body_a, p.body_b)));
    }

    fn joined_without_collision(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.joints.values().any(|j| {
            !j.collide_connected
                && ((j.body_a == a && j.body_b == b) || (j.body_a == b && j.body_b == a))
        })
    }

    fn bodies_touch(a: &Body, b: &Body) -> bool {
        a.fixtures.iter().any(|fa| {
            b.fixtures.iter().any(|fb| {
                if !super::CollisionLayers::should_collide(
                    fa.material.category,
                    fa.material.mask,
                    fb.material.category,
                    fb.material.mask,
                ) {
                    return false;
                }
                match (Bounds::of(&fa.shape, a.position), Bounds::of(&fb.shape, b.position)) {
                    (Some(ba), Some(bb)) => ba.overlaps(&bb),
                    _ => false,
                }
            })
        })
    }
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, 10.0))
    }
}

impl PhysicsWorld for SimpleWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id());
        self.bodies.insert(
            handle,
            Body {
                body_type: desc.body_type,
                position: desc.position,
                angle: desc.angle,
                velocity: Vec2::zeros(),
                angular_velocity: 0.0,
                force: Vec2::zeros(),
                fixed_rotation: desc.fixed_rotation,
                fixtures: Vec::new(),
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(&body).is_none() {
            return;
        }
        self.joints.retain(|_, j| j.body_a != body && j.body_b != body);
        self.current_pairs.retain(|p| p.body_a != body && p.body_b != body);
        self.previous_pairs.retain(|p| p.body_a != body && p.body_b != body);
    }

    fn body_position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn body_angle(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.angle)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn set_body_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.position = position;
        }
    }

    fn set_body_angle(&mut self, body: BodyHandle, angle: f32) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.angle = angle;
        }
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            if body.body_type != BodyType::Static {
                body.velocity = velocity;
            }
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32) {
        if let Some(body) = self.bodies.get_mut(&body) {
            if body.body_type != BodyType::Static {
                body.angular_velocity = velocity;
            }
        }
    }

    fn create_fixture(
        &mut self,
        body: BodyHandle,
        shape: &ShapeDesc,
        material: &MaterialDesc,
    ) -> Option<FixtureHandle> {
        if !self.bodies.contains_key(&body) {
            return None;
        }
        let handle = FixtureHandle(self.next_id());
        let body = self.bodies.get_mut(&body)?;
        body.fixtures.push(Fixture {
            shape: shape.clone(),
            material: *material,
        });
        log::trace!("Fixture {:?} attached, {} on body", handle, body.fixtures.len());
        Some(handle)
    }

    fn create_joint(&mut self, desc: &JointDesc) -> Option<JointHandle> {
        if !self.bodies.contains_key(&desc.body_a) || !self.bodies.contains_key(&desc.body_b) {
            return None;
        }
        let handle = JointHandle(self.next_id());
        self.joints.insert(handle, *desc);
        Some(handle)
    }

    fn destroy_joint(&mut self, joint: JointHandle) {
        self.joints.remove(&joint);
    }

    fn step(&mut self, dt: f32, _velocity_iterations: u32, _position_iterations: u32) {
        self.integrate(dt);
        self.detect_contacts();
    }

    fn clear_forces(&mut self) {
        for body in self.bodies.values_mut() {
            body.force = Vec2::zeros();
        }
    }

    fn drain_contacts(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }
}
