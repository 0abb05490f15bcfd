//! Cooperative schedulers
//!
//! Three families of time-driven jobs share one [`Schedule`] state machine:
//! - [`Timeline`]: keyframed property animation
//! - [`ActionsList`]: ordered stateful steps
//! - [`Task`]: delayed, repeating or cooldown-gated callbacks
//!
//! Every scheduler is generic over a context `C` handed to each callback by
//! `&mut`, so jobs reach the scene or engine that owns them without globals.

pub mod actions;
pub mod easing;
pub mod state;
pub mod tasks;
pub mod timeline;

pub use actions::{Action, ActionsList, ActionsListManager, Call, Parallel, Sequence, Wait};
pub use easing::Ease;
pub use state::{CycleOutcome, JobState, Schedule};
pub use tasks::{Task, TaskControl, TaskManager, TaskQueue};
pub use timeline::{Animation, Keyframe, Timeline, TimelineManager};
