//! Shared building blocks
//!
//! Math aliases and affine helpers, slotmap keys for actors and scenes, frame
//! timing and the logging entry point.

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
