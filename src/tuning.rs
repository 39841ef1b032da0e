//! Starting parameters for a game session
//!
//! Fixed by default. A host may load a JSON override (the demo binary does).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// A straight path a target travels along
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub from: Vec2,
    pub to: Vec2,
}

impl Lane {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    /// Targets on a reversed lane travel right to left and are drawn mirrored
    pub fn is_reversed(&self) -> bool {
        self.to.x < self.from.x
    }

    /// Point along the lane for progress `t` in [0, 1]
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.from.lerp(self.to, t.clamp(0.0, 1.0))
    }
}

/// Session tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds on the clock at the start of a round
    pub start_time_secs: u32,
    /// Rounds in a full magazine
    pub magazine_capacity: u8,

    pub clock_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub reload_interval_ms: u64,

    /// Time to cross a lane
    pub target_travel_ms: u64,
    /// Extra lifetime after reaching the lane end
    pub target_expiry_grace_ms: u64,

    pub hostile_hit_score: i32,
    pub friendly_hit_score: i32,

    pub lanes: Vec<Lane>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_time_secs: START_TIME_SECS,
            magazine_capacity: MAGAZINE_CAPACITY,
            clock_interval_ms: CLOCK_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            reload_interval_ms: RELOAD_INTERVAL_MS,
            target_travel_ms: TARGET_TRAVEL_MS,
            target_expiry_grace_ms: TARGET_EXPIRY_GRACE_MS,
            hostile_hit_score: HOSTILE_HIT_SCORE,
            friendly_hit_score: FRIENDLY_HIT_SCORE,
            lanes: LANES
                .iter()
                .map(|&((fx, fy), (tx, ty))| Lane::new(Vec2::new(fx, fy), Vec2::new(tx, ty)))
                .collect(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that a session built from this tuning can run
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lanes.is_empty() {
            return Err(TuningError::NoLanes);
        }
        if self.magazine_capacity == 0 {
            return Err(TuningError::ZeroCapacity);
        }
        if self.start_time_secs == 0 {
            return Err(TuningError::ZeroStartingTime);
        }
        let intervals = [
            ("clock_interval_ms", self.clock_interval_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("reload_interval_ms", self.reload_interval_ms),
            ("target_travel_ms", self.target_travel_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(TuningError::ZeroInterval(name));
            }
        }
        Ok(())
    }

    /// Lifetime of an untouched target before it is removed
    #[inline]
    pub fn target_lifetime_ms(&self) -> u64 {
        self.target_travel_ms + self.target_expiry_grace_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.lanes.len(), 3);
        assert!(!tuning.lanes[0].is_reversed());
        assert!(tuning.lanes[1].is_reversed());
        assert!(!tuning.lanes[2].is_reversed());
        assert_eq!(tuning.target_lifetime_ms(), 3500);
    }

    #[test]
    fn test_lane_point_clamps() {
        let lane = Lane::new(Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0));
        assert_eq!(lane.point_at(0.5), Vec2::new(50.0, 10.0));
        assert_eq!(lane.point_at(2.0), lane.to);
        assert_eq!(lane.point_at(-1.0), lane.from);
    }

    #[test]
    fn test_from_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "start_time_secs": 5 }"#).unwrap();
        assert_eq!(tuning.start_time_secs, 5);
        assert_eq!(tuning.magazine_capacity, MAGAZINE_CAPACITY);
        assert_eq!(tuning.lanes.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            Tuning::from_json(r#"{ "lanes": [] }"#),
            Err(TuningError::NoLanes)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "reload_interval_ms": 0 }"#),
            Err(TuningError::ZeroInterval("reload_interval_ms"))
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Json(_))
        ));
    }
}
