//! Built-in actions that drive actors
//!
//! Every action runs with the owning [`Scene`] as context and addresses its
//! target by [`ActorId`]. An action whose target no longer exists finishes
//! on its next tick.

use crate::foundation::collections::ActorId;
use crate::foundation::math::{Rect, Vec2};
use crate::scene::Scene;
use crate::scheduling::{Action, Animation, Ease};

use super::ActorProperty;

impl Animation<Scene> {
    /// Animation writing one property of an actor
    pub fn actor_property(name: impl Into<String>, actor: ActorId, property: ActorProperty) -> Self {
        Self::new(name, move |scene: &mut Scene, value| {
            scene.set_property(actor, property, value);
        })
    }
}

/// Set a property once
#[derive(Debug, Clone, Copy)]
pub struct SetProperty {
    actor: ActorId,
    property: ActorProperty,
    value: f32,
}

impl SetProperty {
    /// Set `property` of `actor` to `value`
    pub fn new(actor: ActorId, property: ActorProperty, value: f32) -> Self {
        Self { actor, property, value }
    }
}

impl Action<Scene> for SetProperty {
    fn on_tick(&mut self, scene: &mut Scene, _dt: f32) -> bool {
        scene.set_property(self.actor, self.property, self.value);
        false
    }
}

/// Add to a property once
#[derive(Debug, Clone, Copy)]
pub struct AddProperty {
    actor: ActorId,
    property: ActorProperty,
    delta: f32,
}

impl AddProperty {
    /// Add `delta` to `property` of `actor`
    pub fn new(actor: ActorId, property: ActorProperty, delta: f32) -> Self {
        Self { actor, property, delta }
    }
}

impl Action<Scene> for AddProperty {
    fn on_tick(&mut self, scene: &mut Scene, _dt: f32) -> bool {
        if let Some(current) = scene.get_property(self.actor, self.property) {
            scene.set_property(self.actor, self.property, current + self.delta);
        }
        false
    }
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    property: ActorProperty,
    from: Option<f32>,
    to: f32,
    start: f32,
}

/// Tween one or more properties over a duration
///
/// A channel without an explicit start value starts from the property's
/// value when the action becomes current.
#[derive(Debug, Clone)]
pub struct TweenProperty {
    actor: ActorId,
    channels: Vec<Channel>,
    duration: f32,
    ease: Ease,
    elapsed: f32,
}

impl TweenProperty {
    /// Tween `property` from its current value to `to`
    pub fn new(actor: ActorId, property: ActorProperty, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            actor,
            channels: vec![Channel { property, from: None, to, start: 0.0 }],
            duration,
            ease,
            elapsed: 0.0,
        }
    }

    /// Builder pattern: explicit start value for the first channel
    pub fn from(mut self, from: f32) -> Self {
        if let Some(channel) = self.channels.first_mut() {
            channel.from = Some(from);
        }
        self
    }

    /// Builder pattern: tween another property over the same duration
    pub fn and(mut self, property: ActorProperty, to: f32) -> Self {
        self.channels.push(Channel { property, from: None, to, start: 0.0 });
        self
    }
}

impl Action<Scene> for TweenProperty {
    fn on_init(&mut self, scene: &mut Scene) {
        self.elapsed = 0.0;
        for channel in &mut self.channels {
            channel.start = channel
                .from
                .or_else(|| scene.get_property(self.actor, channel.property))
                .unwrap_or(channel.to);
        }
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        if !scene.contains(self.actor) {
            return false;
        }
        self.elapsed += dt;
        let t = if self.duration > 0.0 { self.elapsed / self.duration } else { 1.0 };
        for channel in &self.channels {
            let value = self.ease.interpolate(channel.start, channel.to, t);
            scene.set_property(self.actor, channel.property, value);
        }
        t < 1.0
    }
}

/// Tween position to a point
#[derive(Debug, Clone)]
pub struct MoveTo(TweenProperty);

impl MoveTo {
    /// Move `actor` to `target` over `duration` seconds
    pub fn new(actor: ActorId, target: Vec2, duration: f32, ease: Ease) -> Self {
        Self(TweenProperty::new(actor, ActorProperty::X, target.x, duration, ease).and(ActorProperty::Y, target.y))
    }
}

impl Action<Scene> for MoveTo {
    fn on_init(&mut self, scene: &mut Scene) {
        self.0.on_init(scene);
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        self.0.on_tick(scene, dt)
    }
}

/// Tween rotation to an angle
#[derive(Debug, Clone)]
pub struct RotateTo(TweenProperty);

impl RotateTo {
    /// Rotate `actor` to `angle` radians over `duration` seconds
    pub fn new(actor: ActorId, angle: f32, duration: f32, ease: Ease) -> Self {
        Self(TweenProperty::new(actor, ActorProperty::Rotation, angle, duration, ease))
    }
}

impl Action<Scene> for RotateTo {
    fn on_init(&mut self, scene: &mut Scene) {
        self.0.on_init(scene);
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        self.0.on_tick(scene, dt)
    }
}

/// Tween scale
#[derive(Debug, Clone)]
pub struct ScaleTo(TweenProperty);

impl ScaleTo {
    /// Scale `actor` to `scale` over `duration` seconds
    pub fn new(actor: ActorId, scale: Vec2, duration: f32, ease: Ease) -> Self {
        Self(TweenProperty::new(actor, ActorProperty::ScaleX, scale.x, duration, ease).and(ActorProperty::ScaleY, scale.y))
    }
}

impl Action<Scene> for ScaleTo {
    fn on_init(&mut self, scene: &mut Scene) {
        self.0.on_init(scene);
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        self.0.on_tick(scene, dt)
    }
}

/// Move along a polyline at constant speed
///
/// Paths with fewer than two points or zero length finish immediately
/// without moving the actor.
#[derive(Debug, Clone)]
pub struct FollowPath {
    actor: ActorId,
    points: Vec<Vec2>,
    distances: Vec<f32>,
    speed: f32,
    travelled: f32,
    looped: bool,
    face_direction: bool,
}

impl FollowPath {
    /// Follow `points` at `speed` pixels per second
    pub fn new(actor: ActorId, points: Vec<Vec2>, speed: f32) -> Self {
        let mut distances = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                total += (point - points[i - 1]).norm();
            }
            distances.push(total);
        }
        Self {
            actor,
            points,
            distances,
            speed,
            travelled: 0.0,
            looped: false,
            face_direction: false,
        }
    }

    /// Builder pattern: restart from the first point at the end
    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    /// Builder pattern: rotate the actor to face along the path
    pub fn face_direction(mut self) -> Self {
        self.face_direction = true;
        self
    }

    /// Total path length
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Point and segment direction at `distance` along the path
    fn sample(&self, distance: f32) -> (Vec2, Vec2) {
        let segment = self
            .distances
            .partition_point(|&d| d <= distance)
            .clamp(1, self.points.len() - 1);
        let (start, end) = (self.points[segment - 1], self.points[segment]);
        let span = self.distances[segment] - self.distances[segment - 1];
        let t = if span > 0.0 { (distance - self.distances[segment - 1]) / span } else { 1.0 };
        (start + (end - start) * t.clamp(0.0, 1.0), end - start)
    }
}

impl Action<Scene> for FollowPath {
    fn on_init(&mut self, _scene: &mut Scene) {
        self.travelled = 0.0;
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        let total = self.length();
        if self.points.len() < 2 || total <= 0.0 || !scene.contains(self.actor) {
            return false;
        }

        self.travelled += self.speed * dt;
        let mut running = true;
        if self.travelled >= total {
            if self.looped {
                self.travelled %= total;
            } else {
                self.travelled = total;
                running = false;
            }
        }

        let (point, direction) = self.sample(self.travelled);
        scene.set_position(self.actor, point);
        if self.face_direction && direction != Vec2::zeros() {
            scene.set_property(self.actor, ActorProperty::Rotation, direction.y.atan2(direction.x));
        }
        running
    }
}

/// Keep an actor inside an area
#[derive(Debug, Clone)]
pub struct LimitMove {
    actor: ActorId,
    area: Rect,
    bounce: bool,
    duration: Option<f32>,
    elapsed: f32,
}

impl LimitMove {
    /// Clamp `actor` to `area`, reflecting velocity when `bounce` is set and
    /// stopping it otherwise
    pub fn new(actor: ActorId, area: Rect, bounce: bool) -> Self {
        Self {
            actor,
            area,
            bounce,
            duration: None,
            elapsed: 0.0,
        }
    }

    /// Builder pattern: finish after `duration` seconds instead of never
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl Action<Scene> for LimitMove {
    fn on_init(&mut self, _scene: &mut Scene) {
        self.elapsed = 0.0;
    }

    fn on_tick(&mut self, scene: &mut Scene, dt: f32) -> bool {
        let Some((start, mut velocity)) = scene.actor(self.actor).map(|a| (a.position(), a.motion.velocity)) else {
            return false;
        };
        let area = self.area;
        let mut position = start;
        let reflect = |v: f32| if self.bounce { -v } else { 0.0 };

        if position.x < area.left() {
            position.x = area.left();
            velocity.x = reflect(velocity.x);
        } else if position.x > area.right() {
            position.x = area.right();
            velocity.x = reflect(velocity.x);
        }
        if position.y < area.top() {
            position.y = area.top();
            velocity.y = reflect(velocity.y);
        } else if position.y > area.bottom() {
            position.y = area.bottom();
            velocity.y = reflect(velocity.y);
        }

        if position != start {
            scene.set_position(self.actor, position);
            scene.set_velocity(self.actor, velocity);
        }

        self.elapsed += dt;
        self.duration.map_or(true, |d| self.elapsed < d)
    }
}

/// Set linear and optionally angular velocity once
#[derive(Debug, Clone, Copy)]
pub struct SetVelocity {
    actor: ActorId,
    velocity: Vec2,
    angular: Option<f32>,
}

impl SetVelocity {
    /// Set the linear velocity of `actor`
    pub fn new(actor: ActorId, velocity: Vec2) -> Self {
        Self { actor, velocity, angular: None }
    }

    /// Builder pattern: also set the angular velocity
    pub fn with_angular(mut self, angular: f32) -> Self {
        self.angular = Some(angular);
        self
    }
}

impl Action<Scene> for SetVelocity {
    fn on_tick(&mut self, scene: &mut Scene, _dt: f32) -> bool {
        scene.set_velocity(self.actor, self.velocity);
        if let Some(angular) = self.angular {
            scene.set_angular_velocity(self.actor, angular);
        }
        false
    }
}

/// Destroy an actor
#[derive(Debug, Clone, Copy)]
pub struct Destroy {
    actor: ActorId,
}

impl Destroy {
    /// Destroy `actor` at the end of the frame
    pub fn new(actor: ActorId) -> Self {
        Self { actor }
    }
}

impl Action<Scene> for Destroy {
    fn on_tick(&mut self, scene: &mut Scene, _dt: f32) -> bool {
        scene.destroy_actor(self.actor);
        false
    }
}
