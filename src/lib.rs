//! Shooting Range - a lane-based tap shooting gallery
//!
//! Core modules:
//! - `sim`: Deterministic game session (timers, ammunition, scoring)
//! - `tuning`: Starting parameters and lane layout
//! - `error`: Session and tuning errors
//!
//! Rendering, hit-testing and audio live outside the crate. The session
//! hands out [`sim::RenderCommand`]s and takes taps and elapsed time.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SessionError, TuningError};
pub use tuning::{Lane, Tuning};

/// Game configuration constants
pub mod consts {
    /// Round length (seconds on the clock)
    pub const START_TIME_SECS: u32 = 20;
    /// Magazine size
    pub const MAGAZINE_CAPACITY: u8 = 6;

    /// Clock tick interval (ms)
    pub const CLOCK_INTERVAL_MS: u64 = 1000;
    /// Target spawn interval (ms)
    pub const SPAWN_INTERVAL_MS: u64 = 1000;
    /// One round is loaded per reload tick (ms)
    pub const RELOAD_INTERVAL_MS: u64 = 500;

    /// Time for a target to cross its lane (ms)
    pub const TARGET_TRAVEL_MS: u64 = 3000;
    /// Extra time after arrival before an untouched target is removed (ms)
    pub const TARGET_EXPIRY_GRACE_MS: u64 = 500;

    /// Score for hitting a hostile target
    pub const HOSTILE_HIT_SCORE: i32 = 1;
    /// Score for hitting a friendly target
    pub const FRIENDLY_HIT_SCORE: i32 = -5;

    /// Default lane endpoints, (from, to) in scene coordinates
    pub const LANES: [((f32, f32), (f32, f32)); 3] = [
        ((-50.0, 670.0), (1074.0, 670.0)),
        ((1074.0, 570.0), (-50.0, 570.0)),
        ((-50.0, 470.0), (1074.0, 470.0)),
    ];
}

/// Convert seconds to scheduler milliseconds (rounded)
#[inline]
pub fn secs_to_ms(secs: f32) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}
