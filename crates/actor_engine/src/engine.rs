//! Core engine implementation

use crate::{
    application::Application,
    callbacks::CallbackRegistry,
    config::{Config, ConfigError, EngineSettings},
    foundation::{
        collections::{remove_ordered, SceneId, SlotMap},
        math::Vec2,
        time::{FrameRateMeter, Timer},
    },
    resources::{Resource, ResourceStore, ResourceType},
    scene::{FrameContext, Scene},
    scheduling::{ActionsList, ActionsListManager, Task, TaskManager, Timeline, TimelineManager},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the scenes and updates them in list order once per frame,
/// after its own global schedulers.
pub struct Engine {
    scenes: SlotMap<SceneId, Scene>,
    order: Vec<SceneId>,
    removals: Vec<SceneId>,
    focus: Option<SceneId>,

    /// Timelines with the engine as context
    pub timelines: TimelineManager<Engine>,

    /// Action lists with the engine as context
    pub actions: ActionsListManager<Engine>,

    /// Tasks with the engine as context
    pub tasks: TaskManager<Engine>,

    /// Resources shared by every scene
    pub resources: ResourceStore,

    /// Named callbacks resolved by scene loaders
    pub callbacks: CallbackRegistry,

    /// Frame timing
    timer: Timer,
    fps: FrameRateMeter,
    frame_count: u64,

    /// Engine configuration
    settings: EngineSettings,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(settings: EngineSettings) -> Self {
        log::info!(
            "Initializing engine ({}x{} design, {} fps target)",
            settings.design_width,
            settings.design_height,
            settings.target_frame_rate
        );
        if settings.max_delta <= 0.0 {
            log::warn!("max_delta {} clamps every frame to zero", settings.max_delta);
        }

        Self {
            scenes: SlotMap::with_key(),
            order: Vec::new(),
            removals: Vec::new(),
            focus: None,
            timelines: TimelineManager::new(),
            actions: ActionsListManager::new(),
            tasks: TaskManager::new(),
            resources: ResourceStore::new(),
            callbacks: CallbackRegistry::new(),
            timer: Timer::new(),
            fps: FrameRateMeter::default(),
            frame_count: 0,
            settings,
            running: true,
        }
    }

    /// Create an engine from a TOML or RON settings file
    pub fn from_config_file(path: &str) -> Result<Self, EngineError> {
        let settings = EngineSettings::load_from_file(path)?;
        Ok(Self::new(settings))
    }

    /// Run the engine main loop with the given application
    ///
    /// Stops when [`Engine::quit`] is called or after
    /// [`EngineSettings::max_frames`] frames.
    pub fn run<T: Application>(settings: EngineSettings, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(settings);

        app.initialize(&mut engine)
            .map_err(|e| EngineError::Application(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        engine.timer.reset();

        while engine.running {
            let delta_time = engine.next_delta();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::Application(format!("App update: {}", e)))?;

            engine.update(delta_time);

            if engine
                .settings
                .max_frames
                .is_some_and(|max| engine.frame_count >= max)
            {
                log::info!("Reached {} frames", engine.frame_count);
                engine.running = false;
            }
        }

        app.cleanup(&mut engine);

        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Measure the next frame delta and update once
    pub fn run_frame(&mut self) -> f32 {
        let delta_time = self.next_delta();
        self.update(delta_time);
        delta_time
    }

    /// Wall-clock delta since the previous frame, or the fixed delta
    fn next_delta(&mut self) -> f32 {
        let measured = self.timer.tick();
        self.settings.fixed_delta.unwrap_or(measured)
    }

    /// Advance global schedulers and every active scene by `dt`
    ///
    /// `dt` is clamped to `[0, max_delta]`. Scenes removed during the frame
    /// stay valid until every scene has updated.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.settings.max_delta.max(0.0));
        self.fps.record(dt);
        self.frame_count += 1;

        self.run_global_schedulers(dt);

        let frame = self.frame_context();
        let count = self.order.len();
        for i in 0..count {
            let Some(&id) = self.order.get(i) else {
                break;
            };
            if let Some(scene) = self.scenes.get_mut(id) {
                if scene.active && !scene.is_destroyed() {
                    scene.update(dt, &frame);
                }
            }
        }

        self.drain_scene_removals();
    }

    fn run_global_schedulers(&mut self, dt: f32) {
        let mut timelines = std::mem::take(&mut self.timelines);
        timelines.update(self, dt);
        timelines.merge_from(std::mem::take(&mut self.timelines));
        self.timelines = timelines;

        let mut actions = std::mem::take(&mut self.actions);
        actions.execute(self, dt);
        actions.merge_from(std::mem::take(&mut self.actions));
        self.actions = actions;

        let mut tasks = std::mem::take(&mut self.tasks);
        tasks.execute(self, dt);
        tasks.merge_from(std::mem::take(&mut self.tasks));
        self.tasks = tasks;
    }

    /// Per-frame values handed to every scene
    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            design_size: self.design_size(),
            target_fps: self.settings.target_frame_rate,
            measured_fps: self.fps.fps(),
            adaptive_physics: self.settings.adaptive_physics,
            max_substeps: self.settings.max_physics_substeps,
            debug: self.settings.debug,
        }
    }

    fn drain_scene_removals(&mut self) {
        for id in std::mem::take(&mut self.removals) {
            remove_ordered(&mut self.order, &id);
            if let Some(mut scene) = self.scenes.remove(id) {
                scene.clear();
                log::info!("Removed scene '{}'", scene.name);
            }
            if self.focus == Some(id) {
                self.focus = None;
            }
        }
    }

    /// Add a scene at the end of the update order
    ///
    /// The first scene added takes focus.
    pub fn add_scene(&mut self, mut scene: Scene) -> SceneId {
        scene.set_design_size(self.settings.design_width, self.settings.design_height);
        log::info!("Added scene '{}'", scene.name);
        let id = self.scenes.insert(scene);
        self.order.push(id);
        if self.focus.is_none() {
            self.focus = Some(id);
        }
        id
    }

    /// Find a scene by name
    pub fn find_scene(&self, name: &str) -> Option<SceneId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.scenes.get(id).is_some_and(|s| s.name == name))
    }

    /// Find a scene by name, failing if it does not exist
    pub fn require_scene(&self, name: &str) -> Result<SceneId, EngineError> {
        self.find_scene(name)
            .ok_or_else(|| EngineError::SceneNotFound(name.to_string()))
    }

    /// Queue a scene for removal at the end of the frame
    pub fn remove_scene(&mut self, id: SceneId) -> bool {
        let Some(scene) = self.scenes.get_mut(id) else {
            return false;
        };
        if scene.destroyed {
            return false;
        }
        scene.destroyed = true;
        self.removals.push(id);
        true
    }

    /// Give a scene focus
    pub fn focus_scene(&mut self, id: SceneId) -> bool {
        if !self.scenes.contains_key(id) {
            return false;
        }
        self.focus = Some(id);
        true
    }

    /// Scene with focus
    pub fn focus(&self) -> Option<SceneId> {
        self.focus
    }

    /// Borrow a scene
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Get mutable access to a scene
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// Scene ids in update order
    pub fn scenes(&self) -> &[SceneId] {
        &self.order
    }

    /// Number of scenes, including scenes queued for removal
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Find a resource in a scene's store, then in the global store
    pub fn find_resource(
        &self,
        scene: Option<SceneId>,
        name: &str,
        resource_type: ResourceType,
    ) -> Option<&Resource> {
        let found = scene
            .and_then(|id| self.scenes.get(id))
            .and_then(|s| s.resources.find_resource(name, resource_type))
            .or_else(|| self.resources.find_resource(name, resource_type));
        if found.is_none() && self.settings.debug {
            log::debug!("Resource '{}' ({:?}) not found", name, resource_type);
        }
        found
    }

    /// Add a global timeline
    pub fn add_timeline(&mut self, timeline: Timeline<Engine>) {
        self.timelines.add(timeline);
    }

    /// Add a global action list
    pub fn add_actions_list(&mut self, list: ActionsList<Engine>) {
        self.actions.add(list);
    }

    /// Add a global task
    pub fn add_task(&mut self, task: Task<Engine>) {
        self.tasks.add(task);
    }

    /// Design size in pixels
    pub fn design_size(&self) -> Vec2 {
        Vec2::new(self.settings.design_width, self.settings.design_height)
    }

    /// Engine settings
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Frames updated so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rolling measured frame rate
    pub fn measured_fps(&self) -> Option<f32> {
        self.fps.fps()
    }

    /// True until [`Engine::quit`] is called
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scenes", &self.order.len())
            .field("focus", &self.focus)
            .field("frame_count", &self.frame_count)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No scene with the given name
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    /// Application error
    #[error("Application error: {0}")]
    Application(String),
}
