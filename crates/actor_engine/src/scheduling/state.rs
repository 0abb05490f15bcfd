//! Shared job state machine
//!
//! Timelines, action lists and tasks all move through the same states:
//!
//! ```text
//! Dormant --(running_time >= delay)--> Running --(loops >= repeat)--> Stopped
//!    |                                    ^  |
//!    +--(delay < 0: run once)--> Stopped  |  +--pause()--> Paused --play()--+
//! ```
//!
//! All timing is accumulated from the dt handed to `advance`, never from the
//! wall clock, so a scripted dt sequence reproduces exactly.

/// Lifecycle state of a scheduled job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    /// Waiting for its start delay to elapse
    #[default]
    Dormant,
    /// Executing every step
    Running,
    /// Halted by the caller, resumes with `play()`
    Paused,
    /// Finished or stopped by the caller
    Stopped,
}

/// What happened to a job after one cycle of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Keep running
    Continue,
    /// One-shot job (`delay < 0`) ran its single invocation
    OneShotDone,
    /// Reached its repeat count
    Completed,
}

/// Delay / cooldown / repeat bookkeeping shared by every job type
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    state: JobState,
    /// Seconds to stay dormant; negative means run once then stop
    pub delay: f32,
    /// Seconds between invocations while running, 0 invokes every step
    pub wait: f32,
    /// Number of cycles before completion, 0 repeats forever
    pub repeat: u32,
    running_time: f32,
    last_time: f32,
    loops: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0)
    }
}

impl Schedule {
    /// Create a schedule in the dormant state
    pub fn new(delay: f32, wait: f32, repeat: u32) -> Self {
        Self {
            state: JobState::Dormant,
            delay,
            wait: wait.max(0.0),
            repeat,
            running_time: 0.0,
            last_time: 0.0,
            loops: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Completed cycles so far
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// True for jobs created with a negative delay
    pub fn is_one_shot(&self) -> bool {
        self.delay < 0.0
    }

    /// True while the job still takes part in updates
    pub fn is_live(&self) -> bool {
        matches!(self.state, JobState::Dormant | JobState::Running)
    }

    /// Advance the dormant phase
    ///
    /// Returns the time available to the running phase this step: the full
    /// `dt` if already running, the leftover past the delay on the step that
    /// starts the job, or `None` if the job must not execute this step.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        match self.state {
            JobState::Running => Some(dt),
            JobState::Paused | JobState::Stopped => None,
            JobState::Dormant => {
                if self.is_one_shot() {
                    self.state = JobState::Running;
                    return Some(dt);
                }
                self.running_time += dt;
                if self.running_time >= self.delay {
                    self.state = JobState::Running;
                    let leftover = self.running_time - self.delay;
                    self.running_time -= self.delay;
                    Some(leftover)
                } else {
                    None
                }
            }
        }
    }

    /// Number of payload invocations due for `dt` seconds of running time
    ///
    /// With a zero wait this is always 1. With a cooldown the elapsed time
    /// accumulates and every full `wait` period yields one invocation.
    pub fn due_invocations(&mut self, dt: f32) -> u32 {
        if self.wait <= 0.0 {
            return 1;
        }
        self.last_time += dt;
        let mut count = 0;
        while self.last_time >= self.wait {
            self.last_time -= self.wait;
            count += 1;
        }
        count
    }

    /// Record one completed cycle and apply the repeat rules
    pub fn complete_cycle(&mut self) -> CycleOutcome {
        if self.is_one_shot() {
            self.state = JobState::Stopped;
            return CycleOutcome::OneShotDone;
        }
        if self.repeat > 0 {
            self.loops += 1;
            if self.loops >= self.repeat {
                self.state = JobState::Stopped;
                return CycleOutcome::Completed;
            }
        }
        CycleOutcome::Continue
    }

    /// Pause a dormant or running job
    pub fn pause(&mut self) {
        if self.is_live() {
            self.state = JobState::Paused;
        }
    }

    /// Resume a paused job
    ///
    /// A job paused before its delay elapsed resumes running; the remaining
    /// delay is not re-applied.
    pub fn play(&mut self) {
        if self.state == JobState::Paused {
            self.state = JobState::Running;
        }
    }

    /// Halt the job; it is not evicted unless its manager is told to
    pub fn stop(&mut self) {
        self.state = JobState::Stopped;
    }

    /// Return to the dormant state with all counters cleared
    pub fn restart(&mut self) {
        self.state = JobState::Dormant;
        self.running_time = 0.0;
        self.last_time = 0.0;
        self.loops = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_releases_on_threshold() {
        let mut schedule = Schedule::new(2.0, 0.0, 0);
        assert_eq!(schedule.advance(0.5), None);
        assert_eq!(schedule.advance(0.5), None);
        assert_eq!(schedule.advance(0.5), None);
        assert_eq!(schedule.advance(0.5), Some(0.0));
        assert_eq!(schedule.state(), JobState::Running);
    }

    #[test]
    fn test_delay_leftover_carries_over() {
        let mut schedule = Schedule::new(1.0, 0.0, 0);
        let leftover = schedule.advance(1.25).unwrap();
        assert!((leftover - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_wait_allows_several_invocations() {
        let mut schedule = Schedule::new(0.0, 0.1, 0);
        assert_eq!(schedule.due_invocations(0.05), 0);
        assert_eq!(schedule.due_invocations(0.3), 3);
    }

    #[test]
    fn test_repeat_completes() {
        let mut schedule = Schedule::new(0.0, 0.0, 2);
        assert_eq!(schedule.complete_cycle(), CycleOutcome::Continue);
        assert_eq!(schedule.complete_cycle(), CycleOutcome::Completed);
        assert_eq!(schedule.state(), JobState::Stopped);
    }

    #[test]
    fn test_zero_repeat_runs_forever() {
        let mut schedule = Schedule::new(0.0, 0.0, 0);
        for _ in 0..1000 {
            assert_eq!(schedule.complete_cycle(), CycleOutcome::Continue);
        }
    }

    #[test]
    fn test_one_shot_runs_immediately_then_stops() {
        let mut schedule = Schedule::new(-1.0, 0.0, 5);
        assert_eq!(schedule.advance(0.016), Some(0.016));
        assert_eq!(schedule.complete_cycle(), CycleOutcome::OneShotDone);
        assert_eq!(schedule.state(), JobState::Stopped);
        assert_eq!(schedule.advance(0.016), None);
    }

    #[test]
    fn test_pause_and_play_override() {
        let mut schedule = Schedule::new(0.0, 0.0, 0);
        schedule.pause();
        assert_eq!(schedule.advance(1.0), None);
        schedule.play();
        assert_eq!(schedule.advance(1.0), Some(1.0));
        schedule.stop();
        schedule.play();
        assert_eq!(schedule.state(), JobState::Stopped);
    }
}
