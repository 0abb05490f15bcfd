//! Game-specific actors and rules

use actor_engine::prelude::*;

/// Tag of the player ship
pub const SHIP_TAG: &str = "ship";
/// Tag of asteroids
pub const ASTEROID_TAG: &str = "asteroid";
/// Tag of bullets
pub const BULLET_TAG: &str = "bullet";

const BASE_RADIUS: f32 = 16.0;
const BULLET_RADIUS: f32 = 2.0;
const SHIP_RADIUS: f32 = 12.0;

/// Asteroid size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    /// Large asteroid (splits into medium)
    Large,

    /// Medium asteroid (splits into small)
    Medium,

    /// Small asteroid (destroyed completely)
    Small,
}

impl AsteroidSize {
    /// Get the scale factor for this size
    pub fn scale_factor(self) -> f32 {
        match self {
            AsteroidSize::Large => 2.0,
            AsteroidSize::Medium => 1.5,
            AsteroidSize::Small => 1.0,
        }
    }

    /// Get the points awarded for destroying this size
    pub fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Get the next smaller size when split
    pub fn split_into(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    /// Collision radius in pixels
    pub fn radius(self) -> f32 {
        BASE_RADIUS * self.scale_factor()
    }

    /// Stored in [`Actor::user_id`]
    fn id(self) -> i64 {
        match self {
            AsteroidSize::Large => 3,
            AsteroidSize::Medium => 2,
            AsteroidSize::Small => 1,
        }
    }

    fn from_id(id: i64) -> Option<Self> {
        match id {
            3 => Some(AsteroidSize::Large),
            2 => Some(AsteroidSize::Medium),
            1 => Some(AsteroidSize::Small),
            _ => None,
        }
    }
}

/// Score with a bonus multiplier
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub value: u32,

    /// Multiplier for bonus points
    pub multiplier: f32,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            value: 0,
            multiplier: 1.0,
        }
    }
}

impl Score {
    /// Add points to the score
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn add_points(&mut self, points: u32) {
        self.value += (points as f32 * self.multiplier) as u32;
    }
}

/// Player ship at `position`
pub fn ship(position: Vec2) -> Actor {
    let mut actor = Actor::new("ship")
        .with_tag(SHIP_TAG)
        .with_position(position.x, position.y)
        .with_size(SHIP_RADIUS * 2.0, SHIP_RADIUS * 2.0)
        .with_kind(ActorKind::Polygon {
            points: vec![Vec2::new(12.0, 0.0), Vec2::new(-8.0, -8.0), Vec2::new(-8.0, 8.0)],
            closed: true,
        })
        .with_layer(2);
    actor.wrap_position = true;
    actor
}

/// Asteroid of `size` drifting with `velocity` and spinning at `spin`
pub fn asteroid(size: AsteroidSize, position: Vec2, velocity: Vec2, spin: f32) -> Actor {
    let diameter = size.radius() * 2.0;
    let mut actor = Actor::new("asteroid")
        .with_tag(ASTEROID_TAG)
        .with_position(position.x, position.y)
        .with_size(diameter, diameter)
        .with_velocity(velocity.x, velocity.y)
        .with_kind(ActorKind::Arc {
            radius: size.radius(),
            start_angle: 0.0,
            end_angle: std::f32::consts::TAU,
        });
    actor.user_id = size.id();
    actor.motion.angular_velocity = spin;
    actor.wrap_position = true;
    actor
}

/// Size of an asteroid actor
pub fn asteroid_size(actor: &Actor) -> Option<AsteroidSize> {
    (actor.tag == ASTEROID_TAG).then(|| AsteroidSize::from_id(actor.user_id)).flatten()
}

/// Fire a bullet from the ship's nose; it expires after `lifetime` seconds
pub fn spawn_bullet(scene: &mut Scene, ship: ActorId, speed: f32, lifetime: f32) -> Option<ActorId> {
    let ship = scene.actor(ship).filter(|a| !a.is_destroyed())?;
    let direction = Vec2::new(ship.rotation().cos(), ship.rotation().sin());
    let position = ship.position() + direction * SHIP_RADIUS;
    let velocity = direction * speed;

    let mut bullet = Actor::new("bullet")
        .with_tag(BULLET_TAG)
        .with_position(position.x, position.y)
        .with_size(BULLET_RADIUS * 2.0, BULLET_RADIUS * 2.0)
        .with_velocity(velocity.x, velocity.y)
        .with_layer(1);
    bullet.wrap_position = true;

    let id = scene.add_actor(bullet);
    if let Some(actor) = scene.actor_mut(id) {
        actor.tasks.add(
            Task::new("expire", move |scene: &mut Scene, _| {
                scene.destroy_actor(id);
            })
            .with_delay(lifetime)
            .with_repeat(1),
        );
    }
    Some(id)
}

/// Replace an asteroid with two smaller ones flying apart
pub fn split_asteroid(scene: &mut Scene, id: ActorId) -> Vec<ActorId> {
    let Some(actor) = scene.actor(id) else {
        return Vec::new();
    };
    let Some(smaller) = asteroid_size(actor).and_then(AsteroidSize::split_into) else {
        return Vec::new();
    };
    let position = actor.position();
    let velocity = actor.motion.velocity * 1.25;
    let spin = actor.motion.angular_velocity;

    [std::f32::consts::FRAC_PI_4, -std::f32::consts::FRAC_PI_4]
        .into_iter()
        .map(|angle| {
            let (sin, cos) = angle.sin_cos();
            let v = Vec2::new(velocity.x * cos - velocity.y * sin, velocity.x * sin + velocity.y * cos);
            scene.add_actor(asteroid(smaller, position, v, -spin))
        })
        .collect()
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hits {
    /// Points scored by bullets
    pub points: u32,
    /// True if an asteroid struck the ship
    pub ship_hit: bool,
}

/// Resolve bullet and ship collisions against asteroids
///
/// Hit actors are destroyed (removal happens at the end of the frame) and
/// asteroids split. A vulnerable ship is hit by at most one asteroid per
/// pass.
pub fn resolve_hits(scene: &mut Scene, ship: Option<ActorId>, ship_vulnerable: bool) -> Hits {
    let bullets = live_actors(scene, BULLET_TAG);
    let asteroids = live_actors(scene, ASTEROID_TAG);
    let mut hits = Hits::default();

    for (bullet, bullet_pos, bullet_radius) in bullets {
        let target = asteroids.iter().find(|(id, pos, radius)| {
            scene.actor(*id).is_some_and(|a| !a.is_destroyed())
                && (pos - bullet_pos).norm() < radius + bullet_radius
        });
        if let Some(&(asteroid_id, _, _)) = target {
            hits.points += scene
                .actor(asteroid_id)
                .and_then(asteroid_size)
                .map_or(0, AsteroidSize::points);
            scene.destroy_actor(bullet);
            split_asteroid(scene, asteroid_id);
            scene.destroy_actor(asteroid_id);
        }
    }

    let ship_state = ship.and_then(|id| scene.actor(id)).map(|a| (a.position(), a.size().x * 0.5));
    if let (true, Some((ship_pos, ship_radius))) = (ship_vulnerable, ship_state) {
        let target = asteroids.iter().find(|(id, pos, radius)| {
            scene.actor(*id).is_some_and(|a| !a.is_destroyed())
                && (pos - ship_pos).norm() < radius + ship_radius
        });
        if let Some(&(asteroid_id, _, _)) = target {
            split_asteroid(scene, asteroid_id);
            scene.destroy_actor(asteroid_id);
            hits.ship_hit = true;
        }
    }
    hits
}

/// Id, position and radius of every live root actor with `tag`
fn live_actors(scene: &Scene, tag: &str) -> Vec<(ActorId, Vec2, f32)> {
    scene
        .roots()
        .iter()
        .filter_map(|&id| {
            let actor = scene.actor(id)?;
            (actor.tag == tag && !actor.is_destroyed()).then(|| (id, actor.position(), actor.size().x * 0.5))
        })
        .collect()
}

/// Count asteroids still in play
pub fn asteroid_count(scene: &Scene) -> usize {
    scene
        .roots()
        .iter()
        .filter(|&&id| scene.actor(id).is_some_and(|a| a.tag == ASTEROID_TAG && !a.is_destroyed()))
        .count()
}
