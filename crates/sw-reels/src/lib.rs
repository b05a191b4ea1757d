//! # sw-reels — SpinWorks Reel & Win Engine
//!
//! A deterministic, tick-driven reel game core: spin choreography, win
//! detection, Hot Spin bonus progression, and win-line presentation.
//! Rendering, effect playback, audio, and progression are consumed through
//! narrow trait interfaces; the engine itself never touches a wall clock,
//! a screen, or a speaker.
//!
//! ## Architecture
//!
//! ```text
//! GameSession (FSM: Idle → Spinning → Evaluating → Presenting → …)
//!     │
//!     ├── SpinScheduler ── ReelColumn × N   (staggered stop cascade)
//!     ├── WinEvaluator                      (runs | paylines strategies)
//!     ├── ScoreAccumulator / ScoreLedger    (per-cell dedup, checkpoints)
//!     ├── BonusController                   (Normal ⇄ BonusActive)
//!     └── LinePresentationSequencer         (rotating | total playback)
//!           │
//!           v
//!     StageEvent stream (sw-stage) → audio / telemetry collaborators
//! ```

pub mod bonus;
pub mod clock;
pub mod collab;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod grid;
pub mod payline;
pub mod present;
pub mod reel;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod symbols;
pub mod timing;

pub use bonus::*;
pub use clock::*;
pub use collab::*;
pub use config::*;
pub use error::*;
pub use evaluate::*;
pub use grid::*;
pub use payline::*;
pub use present::*;
pub use reel::*;
pub use scheduler::*;
pub use score::*;
pub use session::*;
pub use symbols::*;
pub use timing::*;
