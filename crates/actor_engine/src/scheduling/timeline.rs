//! Keyframed property animation
//!
//! An [`Animation`] drives one property through a list of keyframes. The
//! property is written through a setter closure so the same machinery
//! animates actor fields, scene camera values or anything else reachable
//! from the context type `C`. Animations are grouped into a [`Timeline`],
//! and timelines are owned by a [`TimelineManager`].

use super::easing::Ease;
use super::state::{CycleOutcome, JobState, Schedule};

/// A single keyframe
///
/// `ease` shapes the segment that starts at this keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Time of the keyframe from the start of the animation, in seconds
    pub time: f32,
    /// Property value at `time`
    pub value: f32,
    /// Easing of the segment leaving this keyframe
    pub ease: Ease,
}

impl Keyframe {
    /// Create a keyframe
    pub const fn new(time: f32, value: f32, ease: Ease) -> Self {
        Self { time, value, ease }
    }
}

type SetterFn<C> = Box<dyn FnMut(&mut C, f32)>;
type EventFn<C> = Box<dyn FnMut(&mut C)>;
type KeyframeFn<C> = Box<dyn FnMut(&mut C, usize)>;

/// Keyframe animation of one property
pub struct Animation<C> {
    name: String,
    keys: Vec<Keyframe>,
    tween: bool,
    schedule: Schedule,
    setter: SetterFn<C>,
    time: f32,
    last_key: Option<usize>,
    finished: bool,
    on_end: Option<EventFn<C>>,
    on_repeat: Option<EventFn<C>>,
    on_keyframe: Option<KeyframeFn<C>>,
}

impl<C> Animation<C> {
    /// Create an empty, tweened animation that plays once
    pub fn new(name: impl Into<String>, setter: impl FnMut(&mut C, f32) + 'static) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            tween: true,
            schedule: Schedule::new(0.0, 0.0, 1),
            setter: Box::new(setter),
            time: 0.0,
            last_key: None,
            finished: false,
            on_end: None,
            on_repeat: None,
            on_keyframe: None,
        }
    }

    /// Builder pattern: add a keyframe (kept sorted by time)
    pub fn with_key(mut self, time: f32, value: f32, ease: Ease) -> Self {
        let index = self.keys.partition_point(|k| k.time <= time);
        self.keys.insert(index, Keyframe::new(time, value, ease));
        self
    }

    /// Builder pattern: add several keyframes
    pub fn with_keys(self, keys: impl IntoIterator<Item = Keyframe>) -> Self {
        keys.into_iter()
            .fold(self, |anim, k| anim.with_key(k.time, k.value, k.ease))
    }

    /// Builder pattern: interpolate between keys (`true`) or step (`false`)
    pub fn with_tween(mut self, tween: bool) -> Self {
        self.tween = tween;
        self
    }

    /// Builder pattern: start delay in seconds (negative plays one pass)
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.schedule.delay = delay;
        self
    }

    /// Builder pattern: number of passes, 0 for forever
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.schedule.repeat = repeat;
        self
    }

    /// Builder pattern: callback fired when the last pass ends
    pub fn on_end(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    /// Builder pattern: callback fired each time a pass wraps around
    pub fn on_repeat(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.on_repeat = Some(Box::new(f));
        self
    }

    /// Builder pattern: callback fired when playback reaches a keyframe
    pub fn on_keyframe(mut self, f: impl FnMut(&mut C, usize) + 'static) -> Self {
        self.on_keyframe = Some(Box::new(f));
        self
    }

    /// Animation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keyframes in time order
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Playhead within the current pass
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Length of one pass
    pub fn duration(&self) -> f32 {
        self.keys.last().map_or(0.0, |k| k.time)
    }

    /// Current state
    pub fn state(&self) -> JobState {
        self.schedule.state()
    }

    /// Completed passes
    pub fn loops(&self) -> u32 {
        self.schedule.loops()
    }

    /// True once the animation played its last pass
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.schedule.pause();
    }

    /// Resume playback
    pub fn play(&mut self) {
        self.schedule.play();
    }

    /// Stop playback without finishing
    pub fn stop(&mut self) {
        self.schedule.stop();
    }

    /// Rewind to the start, including the delay
    pub fn restart(&mut self) {
        self.schedule.restart();
        self.time = 0.0;
        self.last_key = None;
        self.finished = false;
    }

    /// Index of the last keyframe at or before `time`
    fn key_index(&self, time: f32) -> usize {
        self.keys.partition_point(|k| k.time <= time).saturating_sub(1)
    }

    /// Property value at `time`, or `None` without keyframes
    pub fn value_at(&self, time: f32) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if time <= first.time {
            return Some(first.value);
        }
        if time >= last.time {
            return Some(last.value);
        }

        let index = self.key_index(time);
        let from = self.keys[index];
        let to = self.keys[index + 1];
        if !self.tween {
            return Some(from.value);
        }
        let span = to.time - from.time;
        if span <= 0.0 {
            return Some(to.value);
        }
        Some(from.ease.interpolate(from.value, to.value, (time - from.time) / span))
    }

    fn apply(&mut self, ctx: &mut C, time: f32) {
        let Some(value) = self.value_at(time) else {
            return;
        };
        (self.setter)(ctx, value);

        let index = self.key_index(time);
        if self.last_key != Some(index) && time >= self.keys[index].time {
            self.last_key = Some(index);
            if let Some(on_keyframe) = self.on_keyframe.as_mut() {
                on_keyframe(ctx, index);
            }
        }
    }

    /// Advance playback by `dt`; returns `true` when the animation just finished
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> bool {
        let Some(dt) = self.schedule.advance(dt) else {
            return false;
        };

        if self.keys.is_empty() {
            log::debug!("Animation '{}' has no keyframes, stopping", self.name);
            self.schedule.stop();
            self.finished = true;
            return true;
        }

        self.time += dt;
        let duration = self.duration();
        while self.time >= duration {
            self.apply(ctx, duration);
            match self.schedule.complete_cycle() {
                CycleOutcome::Continue => {
                    self.last_key = None;
                    if let Some(on_repeat) = self.on_repeat.as_mut() {
                        on_repeat(ctx);
                    }
                    if duration <= 0.0 {
                        self.time = 0.0;
                        return false;
                    }
                    self.time -= duration;
                }
                CycleOutcome::OneShotDone => {
                    // Stays with its manager until restarted or removed
                    self.time = duration;
                    return false;
                }
                CycleOutcome::Completed => {
                    self.time = duration;
                    self.finished = true;
                    if let Some(on_end) = self.on_end.as_mut() {
                        on_end(ctx);
                    }
                    return true;
                }
            }
        }

        let time = self.time;
        self.apply(ctx, time);
        false
    }
}

/// A named group of animations played together
pub struct Timeline<C> {
    name: String,
    animations: Vec<Animation<C>>,
}

impl<C> Timeline<C> {
    /// Create an empty timeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animations: Vec::new(),
        }
    }

    /// Builder pattern: add an animation
    pub fn with_animation(mut self, animation: Animation<C>) -> Self {
        self.animations.push(animation);
        self
    }

    /// Add an animation
    pub fn add(&mut self, animation: Animation<C>) {
        self.animations.push(animation);
    }

    /// Timeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find an animation by name
    pub fn find(&self, name: &str) -> Option<&Animation<C>> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Find an animation by name for modification
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Animation<C>> {
        self.animations.iter_mut().find(|a| a.name == name)
    }

    /// Animations in insertion order
    pub fn animations(&self) -> &[Animation<C>] {
        &self.animations
    }

    /// True when every animation has finished
    pub fn is_finished(&self) -> bool {
        !self.animations.is_empty() && self.animations.iter().all(Animation::is_finished)
    }

    /// Pause every animation
    pub fn pause(&mut self) {
        self.animations.iter_mut().for_each(Animation::pause);
    }

    /// Resume every animation
    pub fn play(&mut self) {
        self.animations.iter_mut().for_each(Animation::play);
    }

    /// Rewind every animation
    pub fn restart(&mut self) {
        self.animations.iter_mut().for_each(Animation::restart);
    }

    /// Advance every animation; returns `true` if the timeline is now finished
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> bool {
        for animation in &mut self.animations {
            animation.update(ctx, dt);
        }
        self.is_finished()
    }
}

/// Owns timelines and evicts them once finished
pub struct TimelineManager<C> {
    timelines: Vec<Timeline<C>>,
}

impl<C> Default for TimelineManager<C> {
    fn default() -> Self {
        Self { timelines: Vec::new() }
    }
}

impl<C> TimelineManager<C> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timeline
    pub fn add(&mut self, timeline: Timeline<C>) {
        self.timelines.push(timeline);
    }

    /// Find a timeline by name
    pub fn find(&self, name: &str) -> Option<&Timeline<C>> {
        self.timelines.iter().find(|t| t.name == name)
    }

    /// Find a timeline by name for modification
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Timeline<C>> {
        self.timelines.iter_mut().find(|t| t.name == name)
    }

    /// Remove a timeline by name
    pub fn remove(&mut self, name: &str) -> Option<Timeline<C>> {
        let index = self.timelines.iter().position(|t| t.name == name)?;
        Some(self.timelines.remove(index))
    }

    /// Pause a timeline by name
    pub fn pause(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Timeline::pause).is_some()
    }

    /// Resume a timeline by name
    pub fn play(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Timeline::play).is_some()
    }

    /// Rewind a timeline by name
    pub fn restart(&mut self, name: &str) -> bool {
        self.find_mut(name).map(Timeline::restart).is_some()
    }

    /// Number of timelines
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    /// True if no timelines are owned
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Remove every timeline
    pub fn clear(&mut self) {
        self.timelines.clear();
    }

    /// Advance every timeline, then evict the finished ones
    pub fn update(&mut self, ctx: &mut C, dt: f32) {
        let mut any_finished = false;
        for timeline in &mut self.timelines {
            any_finished |= timeline.update(ctx, dt);
        }
        if any_finished {
            self.timelines.retain(|t| !t.is_finished());
        }
    }

    /// Append timelines added to `newer` while this manager was updating
    pub fn merge_from(&mut self, newer: Self) {
        self.timelines.extend(newer.timelines);
    }
}
