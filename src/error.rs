//! Error types for the game session and its tuning

use thiserror::Error;

/// Broken session invariants.
///
/// The tap and reload guards keep these unreachable; they are returned
/// instead of aborting so a violation can be observed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("a round was fired with an empty magazine")]
    AmmunitionUnderflow,
    #[error("ammunition exceeded the magazine capacity of {capacity}")]
    AmmunitionOverflow { capacity: u8 },
}

/// Rejected starting parameters
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("at least one lane is required")]
    NoLanes,
    #[error("magazine capacity must be greater than zero")]
    ZeroCapacity,
    #[error("the round must start with time on the clock")]
    ZeroStartingTime,
    #[error("interval `{0}` must be greater than zero")]
    ZeroInterval(&'static str),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
