//! Action lists
//!
//! An [`ActionsList`] runs a sequence of stateful [`Action`]s one tick per
//! frame. The current action stays current while `on_tick` returns `true`;
//! once it returns `false` the next action becomes current and gets its
//! `on_init` on the following tick. When the last action finishes the list
//! completes one cycle and the shared [`Schedule`] repeat rules apply.

use super::state::{CycleOutcome, JobState, Schedule};

/// A step in an action list
pub trait Action<C> {
    /// Called every time the action becomes current, including list restarts
    fn on_init(&mut self, _ctx: &mut C) {}

    /// Advance the action; return `true` to keep running
    fn on_tick(&mut self, ctx: &mut C, dt: f32) -> bool;
}

type EventFn<C> = Box<dyn FnMut(&mut C)>;

/// Ordered list of actions with delay and repeat
pub struct ActionsList<C> {
    name: String,
    actions: Vec<Box<dyn Action<C>>>,
    current: usize,
    current_started: bool,
    schedule: Schedule,
    finished: bool,
    on_complete: Option<EventFn<C>>,
}

impl<C> ActionsList<C> {
    /// Create an empty list that runs once
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            current: 0,
            current_started: false,
            schedule: Schedule::new(0.0, 0.0, 1),
            finished: false,
            on_complete: None,
        }
    }

    /// Builder pattern: append an action
    pub fn with_action(mut self, action: impl Action<C> + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Builder pattern: start delay in seconds (negative runs one pass)
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.schedule.delay = delay;
        self
    }

    /// Builder pattern: number of passes, 0 for forever
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.schedule.repeat = repeat;
        self
    }

    /// Builder pattern: callback fired after the last pass
    pub fn on_complete(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Append an action
    pub fn push(&mut self, action: Box<dyn Action<C>>) {
        self.actions.push(action);
    }

    /// List name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the current action
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True if the list holds no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Current state
    pub fn state(&self) -> JobState {
        self.schedule.state()
    }

    /// Completed passes
    pub fn loops(&self) -> u32 {
        self.schedule.loops()
    }

    /// True once the last pass finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pause the list
    pub fn pause(&mut self) {
        self.schedule.pause();
    }

    /// Resume the list
    pub fn play(&mut self) {
        self.schedule.play();
    }

    /// Stop the list without finishing it
    pub fn stop(&mut self) {
        self.schedule.stop();
    }

    /// Rewind to the first action, including the delay
    pub fn restart(&mut self) {
        self.schedule.restart();
        self.current = 0;
        self.current_started = false;
        self.finished = false;
    }

    /// Run one tick; returns `true` when the list just finished
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> bool {
        let Some(dt) = self.schedule.advance(dt) else {
            return false;
        };

        if self.actions.is_empty() {
            self.schedule.stop();
            self.finished = true;
            return true;
        }

        let action = &mut self.actions[self.current];
        if !self.current_started {
            self.current_started = true;
            action.on_init(ctx);
        }
        if action.on_tick(ctx, dt) {
            return false;
        }

        self.current_started = false;
        self.current += 1;
        if self.current < self.actions.len() {
            return false;
        }

        self.current = 0;
        match self.schedule.complete_cycle() {
            CycleOutcome::Continue | CycleOutcome::OneShotDone => false,
            CycleOutcome::Completed => {
                self.finished = true;
                if let Some(on_complete) = self.on_complete.as_mut() {
                    on_complete(ctx);
                }
                true
            }
        }
    }
}

/// Owns action lists and evicts them once finished
pub struct ActionsListManager<C> {
    lists: Vec<ActionsList<C>>,
}

impl<C> Default for ActionsListManager<C> {
    fn default() -> Self {
        Self { lists: Vec::new() }
    }
}

impl<C> ActionsListManager<C> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a list
    pub fn add(&mut self, list: ActionsList<C>) {
        self.lists.push(list);
    }

    /// Find a list by name
    pub fn find(&self, name: &str) -> Option<&ActionsList<C>> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Find a list by name for modification
    pub fn find_mut(&mut self, name: &str) -> Option<&mut ActionsList<C>> {
        self.lists.iter_mut().find(|l| l.name == name)
    }

    /// Remove a list by name
    pub fn remove(&mut self, name: &str) -> Option<ActionsList<C>> {
        let index = self.lists.iter().position(|l| l.name == name)?;
        Some(self.lists.remove(index))
    }

    /// Pause a list by name
    pub fn pause(&mut self, name: &str) -> bool {
        self.find_mut(name).map(ActionsList::pause).is_some()
    }

    /// Resume a list by name
    pub fn play(&mut self, name: &str) -> bool {
        self.find_mut(name).map(ActionsList::play).is_some()
    }

    /// Stop a list by name
    pub fn stop(&mut self, name: &str) -> bool {
        self.find_mut(name).map(ActionsList::stop).is_some()
    }

    /// Rewind a list by name
    pub fn restart(&mut self, name: &str) -> bool {
        self.find_mut(name).map(ActionsList::restart).is_some()
    }

    /// Number of lists
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// True if no lists are owned
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Remove every list
    pub fn clear(&mut self) {
        self.lists.clear();
    }

    /// Tick every list, then evict the finished ones
    pub fn execute(&mut self, ctx: &mut C, dt: f32) {
        let mut any_finished = false;
        for list in &mut self.lists {
            any_finished |= list.update(ctx, dt);
        }
        if any_finished {
            self.lists.retain(|l| !l.finished);
        }
    }

    /// Append lists added to `newer` while this manager was executing
    pub fn merge_from(&mut self, newer: Self) {
        self.lists.extend(newer.lists);
    }
}

/// Waits for a fixed duration
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f32,
    elapsed: f32,
}

impl Wait {
    /// Wait for `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }
}

impl<C> Action<C> for Wait {
    fn on_init(&mut self, _ctx: &mut C) {
        self.elapsed = 0.0;
    }

    fn on_tick(&mut self, _ctx: &mut C, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed < self.duration
    }
}

/// Calls a closure once and finishes
pub struct Call<C> {
    f: EventFn<C>,
}

impl<C> Call<C> {
    /// Wrap a closure
    pub fn new(f: impl FnMut(&mut C) + 'static) -> Self {
        Self { f: Box::new(f) }
    }
}

impl<C> Action<C> for Call<C> {
    fn on_tick(&mut self, ctx: &mut C, _dt: f32) -> bool {
        (self.f)(ctx);
        false
    }
}

/// Runs child actions side by side until all of them finish
pub struct Parallel<C> {
    actions: Vec<Box<dyn Action<C>>>,
    running: Vec<bool>,
}

impl<C> Default for Parallel<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            running: Vec::new(),
        }
    }
}

impl<C> Parallel<C> {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add a child action
    pub fn with(mut self, action: impl Action<C> + 'static) -> Self {
        self.actions.push(Box::new(action));
        self.running.push(false);
        self
    }
}

impl<C> Action<C> for Parallel<C> {
    fn on_init(&mut self, ctx: &mut C) {
        for (action, running) in self.actions.iter_mut().zip(&mut self.running) {
            action.on_init(ctx);
            *running = true;
        }
    }

    fn on_tick(&mut self, ctx: &mut C, dt: f32) -> bool {
        let mut any_running = false;
        for (action, running) in self.actions.iter_mut().zip(&mut self.running) {
            if *running {
                *running = action.on_tick(ctx, dt);
                any_running |= *running;
            }
        }
        any_running
    }
}

/// Runs child actions one after another, usable inside a [`Parallel`]
pub struct Sequence<C> {
    actions: Vec<Box<dyn Action<C>>>,
    current: usize,
    started: bool,
}

impl<C> Default for Sequence<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            current: 0,
            started: false,
        }
    }
}

impl<C> Sequence<C> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: append a child action
    pub fn then(mut self, action: impl Action<C> + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }
}

impl<C> Action<C> for Sequence<C> {
    fn on_init(&mut self, _ctx: &mut C) {
        self.current = 0;
        self.started = false;
    }

    fn on_tick(&mut self, ctx: &mut C, dt: f32) -> bool {
        let Some(action) = self.actions.get_mut(self.current) else {
            return false;
        };
        if !self.started {
            self.started = true;
            action.on_init(ctx);
        }
        if action.on_tick(ctx, dt) {
            return true;
        }
        self.started = false;
        self.current += 1;
        self.current < self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        entries: Vec<&'static str>,
    }

    fn note(entry: &'static str) -> Call<Log> {
        Call::new(move |log: &mut Log| log.entries.push(entry))
    }

    #[test]
    fn test_actions_advance_one_per_completion() {
        let mut log = Log::default();
        let mut list = ActionsList::new("intro")
            .with_action(note("a"))
            .with_action(Wait::new(0.25))
            .with_action(note("b"));

        list.update(&mut log, 0.1);
        assert_eq!(log.entries, vec!["a"]);
        list.update(&mut log, 0.1);
        list.update(&mut log, 0.1);
        assert_eq!(list.current(), 1);
        list.update(&mut log, 0.1);
        assert_eq!(list.current(), 2);
        assert!(list.update(&mut log, 0.1));
        assert_eq!(log.entries, vec!["a", "b"]);
        assert!(list.is_finished());
    }

    #[test]
    fn test_repeat_reinitializes_actions() {
        let mut log = Log::default();
        let mut list = ActionsList::new("loop")
            .with_action(Wait::new(0.15))
            .with_action(note("tick"))
            .with_repeat(3);

        for _ in 0..20 {
            list.update(&mut log, 0.1);
        }
        assert_eq!(log.entries.len(), 3);
        assert_eq!(list.state(), JobState::Stopped);
    }

    #[test]
    fn test_parallel_waits_for_slowest() {
        let mut log = Log::default();
        let mut list = ActionsList::new("par")
            .with_action(Parallel::new().with(Wait::new(0.1)).with(Wait::new(0.35)))
            .with_action(note("done"));

        for _ in 0..3 {
            list.update(&mut log, 0.1);
        }
        assert!(log.entries.is_empty());
        list.update(&mut log, 0.1);
        list.update(&mut log, 0.1);
        assert_eq!(log.entries, vec!["done"]);
    }

    #[test]
    fn test_sequence_inside_parallel() {
        let mut log = Log::default();
        let mut list = ActionsList::new("seq").with_action(
            Parallel::new()
                .with(Sequence::new().then(note("one")).then(note("two")))
                .with(note("side")),
        );
        list.update(&mut log, 0.1);
        list.update(&mut log, 0.1);
        assert_eq!(log.entries, vec!["one", "side", "two"]);
        assert!(list.is_finished());
    }

    #[test]
    fn test_manager_evicts_after_pass() {
        let mut log = Log::default();
        let mut manager = ActionsListManager::new();
        manager.add(ActionsList::new("short").with_action(note("s")));
        manager.add(
            ActionsList::new("long")
                .with_action(Wait::new(1.0))
                .on_complete(|log: &mut Log| log.entries.push("long done")),
        );

        manager.execute(&mut log, 0.1);
        assert!(manager.find("short").is_none());
        assert_eq!(manager.len(), 1);

        for _ in 0..10 {
            manager.execute(&mut log, 0.1);
        }
        assert!(manager.is_empty());
        assert_eq!(log.entries, vec!["s", "long done"]);
    }

    #[test]
    fn test_one_shot_list_stays_stopped_in_manager() {
        let mut log = Log::default();
        let mut manager = ActionsListManager::new();
        manager.add(
            ActionsList::new("once")
                .with_action(note("o"))
                .with_delay(-1.0)
                .on_complete(|log: &mut Log| log.entries.push("done")),
        );

        manager.execute(&mut log, 0.1);
        manager.execute(&mut log, 0.1);
        assert_eq!(log.entries, vec!["o"]);
        let list = manager.find("once").unwrap();
        assert_eq!(list.state(), JobState::Stopped);
        assert!(!list.is_finished());
    }

    #[test]
    fn test_delay_and_pause() {
        let mut log = Log::default();
        let mut manager = ActionsListManager::new();
        manager.add(ActionsList::new("late").with_action(note("x")).with_delay(0.5));
        manager.execute(&mut log, 0.25);
        assert!(log.entries.is_empty());
        manager.pause("late");
        manager.execute(&mut log, 1.0);
        assert!(log.entries.is_empty());
        manager.play("late");
        manager.execute(&mut log, 0.1);
        assert_eq!(log.entries, vec!["x"]);
    }
}
