//! # sw-stage — SpinWorks Stage System
//!
//! Canonical phase definitions for the reel game flow.
//!
//! A Stage is NOT an animation and NOT an engine internal.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow:
//! collaborators (audio, telemetry, replay capture) respond to stages,
//! never to raw engine state transitions.

pub mod event;
pub mod stage;

pub use event::*;
pub use stage::*;
