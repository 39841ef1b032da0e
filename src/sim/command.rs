//! Instructions for the rendering surface
//!
//! The session never draws. Everything the player should see is queued as a
//! [`RenderCommand`] and drained by the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{TargetId, TargetKind};

/// Glyph drawn once per loaded round
pub const ROUND_GLYPH: char = '⁍';

/// HUD labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Score,
    Time,
    Ammo,
}

/// Particle effects played at a tap location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Hostile target hit
    Kill,
    /// Friendly target hit
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    SetLabel {
        label: Label,
        text: String,
    },
    /// Add a target sprite at `position`; it should glide to `destination`
    /// over `travel_ms`
    SpawnEntity {
        id: TargetId,
        kind: TargetKind,
        position: Vec2,
        destination: Vec2,
        travel_ms: u64,
        mirrored: bool,
    },
    RemoveEntity {
        id: TargetId,
    },
    PlayEffect {
        effect: Effect,
        position: Vec2,
    },
    SetReloadControlVisible(bool),
    GameOverDisplay,
}

pub fn score_text(score: i32) -> String {
    format!("Score: {}", score)
}

pub fn time_text(secs: u32) -> String {
    format!("Time: {}", secs)
}

pub fn ammo_text(rounds: u8) -> String {
    std::iter::repeat_n(ROUND_GLYPH, rounds as usize).collect()
}

pub const GAME_OVER_TEXT: &str = "Game Over";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_text() {
        assert_eq!(score_text(-4), "Score: -4");
        assert_eq!(time_text(20), "Time: 20");
        assert_eq!(ammo_text(3), "⁍⁍⁍");
        assert_eq!(ammo_text(0), "");
    }

    #[test]
    fn test_spawn_serializes_sprite_tag() {
        for (kind, tag) in [(TargetKind::Hostile, "bad"), (TargetKind::Friendly, "good")] {
            let spawn = RenderCommand::SpawnEntity {
                id: TargetId(1),
                kind,
                position: Vec2::new(-50.0, 670.0),
                destination: Vec2::new(1074.0, 670.0),
                travel_ms: 3000,
                mirrored: false,
            };
            let json = serde_json::to_string(&spawn).unwrap();
            assert!(json.contains(&format!("\"kind\":\"{}\"", tag)), "{}", json);
            assert_eq!(kind.tag(), tag);

            let back: RenderCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(back, spawn);
        }
    }
}
