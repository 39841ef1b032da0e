//! Deterministic game session
//!
//! All gameplay logic lives here:
//! - Integer millisecond timers only
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod command;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use command::{Effect, Label, RenderCommand};
pub use scheduler::{Scheduler, TimerEvent, TimerId};
pub use state::{GameSession, SessionPhase, Target, TargetId, TargetKind};
pub use tick::{IgnoreReason, TapHit, TapOutcome};
