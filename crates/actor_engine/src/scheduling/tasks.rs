//! Tasks: delayed, repeating, cooldown-gated callbacks
//!
//! A [`TaskManager`] runs every task it owns each step; a [`TaskQueue`]
//! runs only its head and promotes the next task once the head completes.

use std::collections::VecDeque;

use super::state::{CycleOutcome, JobState, Schedule};

/// Handle given to a task payload for controlling its own task
#[derive(Debug, Clone, Default)]
pub struct TaskControl {
    loops: u32,
    stop: bool,
    pause: bool,
}

impl TaskControl {
    /// Completed invocations before this one
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// Stop the task after this invocation
    pub fn stop(&mut self) {
        self.stop = true;
    }

    /// Pause the task after this invocation
    pub fn pause(&mut self) {
        self.pause = true;
    }
}

type TaskFn<C> = Box<dyn FnMut(&mut C, &mut TaskControl)>;
type CompleteFn<C> = Box<dyn FnMut(&mut C)>;

/// A named callback with delay, cooldown and repeat count
pub struct Task<C> {
    name: String,
    schedule: Schedule,
    func: TaskFn<C>,
    on_complete: Option<CompleteFn<C>>,
    completed: bool,
}

impl<C> Task<C> {
    /// Create a task that runs every step forever, starting immediately
    pub fn new(name: impl Into<String>, func: impl FnMut(&mut C, &mut TaskControl) + 'static) -> Self {
        Self {
            name: name.into(),
            schedule: Schedule::default(),
            func: Box::new(func),
            on_complete: None,
            completed: false,
        }
    }

    /// Builder pattern: seconds before the first invocation (negative runs once)
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.schedule.delay = delay;
        self
    }

    /// Builder pattern: seconds between invocations
    pub fn with_wait(mut self, wait: f32) -> Self {
        self.schedule.wait = wait.max(0.0);
        self
    }

    /// Builder pattern: number of invocations, 0 for forever
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.schedule.repeat = repeat;
        self
    }

    /// Builder pattern: callback fired when the repeat count is reached
    pub fn on_complete(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    pub fn state(&self) -> JobState {
        self.schedule.state()
    }

    /// Completed invocations
    pub fn loops(&self) -> u32 {
        self.schedule.loops()
    }

    /// True once the repeat count has been reached
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Pause the task
    pub fn pause(&mut self) {
        self.schedule.pause();
    }

    /// Resume a paused task
    pub fn play(&mut self) {
        self.schedule.play();
    }

    /// Stop the task without evicting it
    pub fn stop(&mut self) {
        self.schedule.stop();
    }

    /// Reset delay, cooldown and loop counters
    pub fn restart(&mut self) {
        self.schedule.restart();
        self.completed = false;
    }

    /// Advance the task by `dt`; returns `true` when it just completed
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> bool {
        let Some(running_dt) = self.schedule.advance(dt) else {
            return false;
        };

        for _ in 0..self.schedule.due_invocations(running_dt) {
            let mut control = TaskControl {
                loops: self.schedule.loops(),
                ..TaskControl::default()
            };
            (self.func)(ctx, &mut control);

            match self.schedule.complete_cycle() {
                CycleOutcome::Continue => {}
                CycleOutcome::OneShotDone => return false,
                CycleOutcome::Completed => {
                    self.completed = true;
                    if let Some(on_complete) = self.on_complete.as_mut() {
                        on_complete(ctx);
                    }
                    return true;
                }
            }

            if control.stop {
                self.schedule.stop();
                return false;
            }
            if control.pause {
                self.schedule.pause();
                return false;
            }
        }
        false
    }
}

impl<C> std::fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("schedule", &self.schedule)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// Runs every owned task each step
pub struct TaskManager<C> {
    tasks: Vec<Task<C>>,
}

impl<C> Default for TaskManager<C> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<C> TaskManager<C> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task
    pub fn add(&mut self, task: Task<C>) {
        self.tasks.push(task);
    }

    /// Find a task by name
    pub fn find(&self, name: &str) -> Option<&Task<C>> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Find a task by name for modification
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Task<C>> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }

    /// Remove a task by name
    pub fn remove(&mut self, name: &str) -> Option<Task<C>> {
        let index = self.tasks.iter().position(|t| t.name == name)?;
        Some(self.tasks.remove(index))
    }

    /// Pause a task by name
    pub fn pause(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::pause).is_some()
    }

    /// Resume a task by name
    pub fn play(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::play).is_some()
    }

    /// Stop a task by name
    pub fn stop(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::stop).is_some()
    }

    /// Remove every task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if no tasks are owned
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate tasks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Task<C>> {
        self.tasks.iter()
    }

    /// Advance every task, then evict the ones that completed during the pass
    pub fn execute(&mut self, ctx: &mut C, dt: f32) {
        let mut any_completed = false;
        for task in &mut self.tasks {
            any_completed |= task.update(ctx, dt);
        }
        if any_completed {
            self.tasks.retain(|t| !t.completed);
        }
    }

    /// Append tasks that were added to `newer` while this manager was executing
    pub fn merge_from(&mut self, newer: Self) {
        self.tasks.extend(newer.tasks);
    }
}

/// Runs only its head task; the next task starts once the head completes
pub struct TaskQueue<C> {
    tasks: VecDeque<Task<C>>,
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self { tasks: VecDeque::new() }
    }
}

impl<C> TaskQueue<C> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the back of the queue
    pub fn add(&mut self, task: Task<C>) {
        self.tasks.push_back(task);
    }

    /// The task currently executing
    pub fn head(&self) -> Option<&Task<C>> {
        self.tasks.front()
    }

    /// Find a queued task by name
    pub fn find(&self, name: &str) -> Option<&Task<C>> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Find a queued task by name for modification
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Task<C>> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }

    /// Remove a queued task by name
    pub fn remove(&mut self, name: &str) -> Option<Task<C>> {
        let index = self.tasks.iter().position(|t| t.name == name)?;
        self.tasks.remove(index)
    }

    /// Pause a queued task by name
    pub fn pause(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::pause).is_some()
    }

    /// Resume a queued task by name
    pub fn play(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::play).is_some()
    }

    /// Stop a queued task by name
    pub fn stop(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::stop).is_some()
    }

    /// Rewind a queued task by name
    pub fn restart(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Task::restart).is_some()
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remove every task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Advance the head task only
    ///
    /// A head that reaches its repeat count is evicted and the next task
    /// first runs on the following call. A stopped or paused head stays in
    /// place and holds the queue until it is restarted or removed.
    pub fn execute(&mut self, ctx: &mut C, dt: f32) {
        let Some(head) = self.tasks.front_mut() else {
            return;
        };
        if head.update(ctx, dt) {
            self.tasks.pop_front();
        }
    }

    /// Append tasks that were queued on `newer` while this queue was executing
    pub fn merge_from(&mut self, newer: Self) {
        self.tasks.extend(newer.tasks);
    }
}
