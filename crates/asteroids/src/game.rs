//! Asteroids application driving the engine headless

use std::cell::RefCell;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;

use actor_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{self, AsteroidSize, Score};
use crate::config::GameConfig;

/// State shared between the application and scene callbacks
#[derive(Debug, Default)]
pub struct GameState {
    /// Points scored
    pub score: Score,
    /// Lives left
    pub lives: u32,
    /// Seconds of invulnerability left
    pub invulnerable: f32,
    /// Times the ship was hit
    pub hits_taken: u32,
}

/// The asteroids game
pub struct AsteroidsGame {
    config: GameConfig,
    rng: StdRng,
    state: Rc<RefCell<GameState>>,
    scene: Option<SceneId>,
    ship: Option<ActorId>,
    wave: u32,
}

impl AsteroidsGame {
    /// Create a game from its configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.run.seed);
        let state = GameState {
            lives: config.gameplay.starting_lives,
            ..GameState::default()
        };
        Self {
            config,
            rng,
            state: Rc::new(RefCell::new(state)),
            scene: None,
            ship: None,
            wave: 0,
        }
    }

    /// Current wave, starting at 1
    pub fn wave(&self) -> u32 {
        self.wave
    }

    fn build_scene(&mut self, design: Vec2) -> Scene {
        let settings = SceneSettings {
            name: "field".to_string(),
            extents: Rect::new(0.0, 0.0, design.x, design.y),
            ..SceneSettings::default()
        };
        let mut scene = Scene::from_settings(&settings, design);

        let ship_id = scene.add_actor(components::ship(design * 0.5));
        self.ship = Some(ship_id);
        if let Some(ship) = scene.actor_mut(ship_id) {
            ship.actions.add(autopilot(ship_id, self.config.gameplay.ship_turn_time));
            ship.timelines.add(blink(ship_id, 3));
        }

        let gameplay = &self.config.gameplay;
        let (speed, lifetime) = (gameplay.bullet_speed, gameplay.bullet_lifetime);
        scene.tasks.add(
            Task::new("fire", move |scene: &mut Scene, _| {
                components::spawn_bullet(scene, ship_id, speed, lifetime);
            })
            .with_wait(gameplay.fire_interval),
        );

        let state = Rc::clone(&self.state);
        let invulnerability_time = gameplay.invulnerability_time;
        scene.on_tick = Some(Box::new(move |scene: &mut Scene, dt: f32| {
            let mut state = state.borrow_mut();
            state.invulnerable = (state.invulnerable - dt).max(0.0);
            let hits = components::resolve_hits(scene, Some(ship_id), state.invulnerable <= 0.0);
            state.score.add_points(hits.points);
            if hits.ship_hit {
                state.lives = state.lives.saturating_sub(1);
                state.hits_taken += 1;
                state.invulnerable = invulnerability_time;
                log::info!("Ship hit, {} lives left", state.lives);
                if let Some(ship) = scene.actor_mut(ship_id) {
                    ship.timelines.remove("blink");
                    ship.timelines.add(blink(ship_id, 4));
                }
            }
        }));

        scene
    }

    /// Spawn a wave of large asteroids along the scene edges
    fn spawn_wave(&mut self, scene: &mut Scene) {
        self.wave += 1;
        let count = self.config.gameplay.asteroid_count + self.wave - 1;
        let [min_speed, max_speed] = self.config.gameplay.asteroid_speed;
        let extents = scene.extents;

        for _ in 0..count {
            let position = if self.rng.gen_bool(0.5) {
                Vec2::new(self.rng.gen_range(extents.left()..extents.right()), extents.top())
            } else {
                Vec2::new(extents.left(), self.rng.gen_range(extents.top()..extents.bottom()))
            };
            let heading = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(min_speed..=max_speed);
            let spin = self.rng.gen_range(-1.0..1.0);
            let velocity = Vec2::new(heading.cos(), heading.sin()) * speed;
            scene.add_actor(components::asteroid(AsteroidSize::Large, position, velocity, spin));
        }
        log::info!("Wave {} with {} asteroids", self.wave, count);
    }
}

/// Ship autopilot: quarter turns with a pause after each, forever
fn autopilot(ship: ActorId, turn_time: f32) -> ActionsList<Scene> {
    let pause = turn_time / 3.0;
    ActionsList::new("autopilot")
        .with_action(RotateTo::new(ship, FRAC_PI_2, turn_time, Ease::QuadOut))
        .with_action(Wait::new(pause))
        .with_action(RotateTo::new(ship, PI, turn_time, Ease::QuadOut))
        .with_action(Wait::new(pause))
        .with_action(RotateTo::new(ship, PI + FRAC_PI_2, turn_time, Ease::QuadOut))
        .with_action(Wait::new(pause))
        .with_action(RotateTo::new(ship, TAU, turn_time, Ease::QuadOut))
        .with_action(SetProperty::new(ship, ActorProperty::Rotation, 0.0))
        .with_repeat(0)
}

/// Opacity pulse shown while the ship is invulnerable
fn blink(ship: ActorId, pulses: u32) -> Timeline<Scene> {
    Timeline::new("blink").with_animation(
        Animation::actor_property("opacity", ship, ActorProperty::Opacity)
            .with_key(0.0, 1.0, Ease::Linear)
            .with_key(0.25, 0.2, Ease::Sin)
            .with_key(0.5, 1.0, Ease::Cos)
            .with_repeat(pulses),
    )
}

impl Application for AsteroidsGame {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let mut scene = self.build_scene(engine.design_size());
        self.spawn_wave(&mut scene);
        self.scene = Some(engine.add_scene(scene));

        let interval = self.config.run.report_interval;
        engine.add_task(
            Task::new("report", |engine: &mut Engine, _| {
                let actors: usize = engine
                    .scenes()
                    .iter()
                    .filter_map(|&id| engine.scene(id))
                    .map(Scene::actor_count)
                    .sum();
                log::info!(
                    "Frame {}: {} actors, {:.1} fps",
                    engine.frame_count(),
                    actors,
                    engine.measured_fps().unwrap_or(0.0)
                );
            })
            .with_delay(interval)
            .with_wait(interval),
        );
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let scene_id = self
            .scene
            .ok_or_else(|| AppError::GameLogic("update before initialize".to_string()))?;

        let Some(scene) = engine.scene_mut(scene_id) else {
            return Err(AppError::Engine(EngineError::SceneNotFound("field".to_string())));
        };

        if self.state.borrow().lives == 0 {
            log::info!("Game over");
            if let Some(ship) = self.ship.take() {
                scene.destroy_actor(ship);
            }
            engine.quit();
            return Ok(());
        }
        if components::asteroid_count(scene) == 0 {
            if self.wave >= self.config.gameplay.waves {
                log::info!("All {} waves cleared", self.wave);
                engine.quit();
            } else {
                self.spawn_wave(scene);
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let state = self.state.borrow();
        log::info!(
            "Final score {} after {} frames, wave {}, {} lives left ({} hits taken)",
            state.score.value,
            engine.frame_count(),
            self.wave,
            state.lives,
            state.hits_taken
        );
    }
}
