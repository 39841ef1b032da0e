//! Event handling for the game session
//!
//! Ticks arrive through [`GameSession::advance`], which drains the scheduler
//! in deadline order. Taps arrive through [`GameSession::on_tap`] and are
//! resolved at the current scheduler time.

use glam::Vec2;
use rand::Rng;

use super::command::{self, Effect, Label, RenderCommand};
use super::scheduler::TimerEvent;
use super::state::{GameSession, SessionPhase, Target, TargetId, TargetKind};
use crate::error::SessionError;

/// What the renderer found under a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapHit {
    ReloadControl,
    Background,
    Target(TargetId),
    /// Any other tappable node (labels, decorations)
    Other,
}

/// Why a tap changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Ended,
    Reloading,
    /// Background, empty space, or a target that already left
    Background,
    OutOfAmmo,
    /// Reload requested with a full magazine
    MagazineFull,
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored(IgnoreReason),
    ReloadStarted,
    /// A target was shot and removed
    Hit {
        id: TargetId,
        kind: TargetKind,
        score_delta: i32,
    },
    /// A round was spent on something that is not a target
    StrayShot,
}

impl GameSession {
    /// Advance the session clock by `dt_ms`, firing every timer that comes due
    pub fn advance(&mut self, dt_ms: u64) -> Result<(), SessionError> {
        let until = self.scheduler.now() + dt_ms;
        while let Some((_, event)) = self.scheduler.pop_due(until) {
            log::trace!("t={}ms {:?}", self.scheduler.now(), event);
            match event {
                TimerEvent::Clock => self.on_clock_tick(),
                TimerEvent::Spawn => {
                    self.on_spawn_tick();
                }
                TimerEvent::Reload => self.on_reload_tick()?,
                TimerEvent::Expire(id) => self.on_target_expired(id),
            }
        }
        self.scheduler.advance_to(until);
        Ok(())
    }

    /// One second off the clock. Reaching zero ends the session.
    pub fn on_clock_tick(&mut self) {
        if self.phase == SessionPhase::Ended {
            return;
        }
        let remaining = self.time_remaining.saturating_sub(1);
        self.set_time_remaining(remaining);
        if remaining == 0 {
            self.game_over();
        }
    }

    /// Send a new target down a random lane. Returns its id, or None once ended.
    pub fn on_spawn_tick(&mut self) -> Option<TargetId> {
        if self.phase == SessionPhase::Ended {
            return None;
        }

        let lane_index = self.rng.random_range(0..self.tuning.lanes.len());
        let kind = if self.rng.random_bool(0.5) {
            TargetKind::Hostile
        } else {
            TargetKind::Friendly
        };
        let lane = self.tuning.lanes[lane_index];

        let id = self.next_target_id();
        let expiry = self
            .scheduler
            .schedule_once(self.tuning.target_lifetime_ms(), TimerEvent::Expire(id));

        // Ids are monotonic, so pushing keeps the list sorted
        self.targets.push(Target {
            id,
            lane: lane_index,
            path: lane,
            kind,
            spawned_at: self.scheduler.now(),
            travel_ms: self.tuning.target_travel_ms,
            expiry,
        });
        self.commands.push(RenderCommand::SpawnEntity {
            id,
            kind,
            position: lane.from,
            destination: lane.to,
            travel_ms: self.tuning.target_travel_ms,
            mirrored: lane.is_reversed(),
        });

        log::debug!("Spawned {} target {:?} on lane {}", kind.tag(), id, lane_index);
        Some(id)
    }

    /// Load one round while reloading
    pub fn on_reload_tick(&mut self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Ended || !self.is_reloading {
            return Ok(());
        }
        self.set_ammunition(self.ammunition as i32 + 1)
    }

    /// Remove a target that crossed its lane untouched
    pub fn on_target_expired(&mut self, id: TargetId) {
        if self.remove_target(id).is_some() {
            log::trace!("Target {:?} expired", id);
        }
    }

    /// Handle a tap at `location`, with `hit` being whatever the renderer found there
    pub fn on_tap(
        &mut self,
        location: Vec2,
        hit: Option<TapHit>,
    ) -> Result<TapOutcome, SessionError> {
        if self.phase == SessionPhase::Ended {
            return Ok(TapOutcome::Ignored(IgnoreReason::Ended));
        }
        if self.is_reloading {
            return Ok(TapOutcome::Ignored(IgnoreReason::Reloading));
        }

        match hit {
            None | Some(TapHit::Background) => Ok(TapOutcome::Ignored(IgnoreReason::Background)),

            Some(TapHit::ReloadControl) => {
                if self.ammunition >= self.tuning.magazine_capacity {
                    return Ok(TapOutcome::Ignored(IgnoreReason::MagazineFull));
                }
                self.set_reloading(true);
                Ok(TapOutcome::ReloadStarted)
            }

            Some(TapHit::Target(id)) => {
                if self.ammunition == 0 {
                    return Ok(TapOutcome::Ignored(IgnoreReason::OutOfAmmo));
                }
                let Some(kind) = self.target(id).map(|t| t.kind) else {
                    return Ok(TapOutcome::Ignored(IgnoreReason::Background));
                };

                self.fire_round()?;
                let (score_delta, effect) = match kind {
                    TargetKind::Hostile => (self.tuning.hostile_hit_score, Effect::Kill),
                    TargetKind::Friendly => (self.tuning.friendly_hit_score, Effect::Miss),
                };
                self.commands.push(RenderCommand::PlayEffect {
                    effect,
                    position: location,
                });
                self.set_score(self.score + score_delta);
                self.remove_target(id);

                log::debug!("Hit {:?} target {:?} ({:+})", kind, id, score_delta);
                Ok(TapOutcome::Hit {
                    id,
                    kind,
                    score_delta,
                })
            }

            Some(TapHit::Other) => {
                if self.ammunition == 0 {
                    return Ok(TapOutcome::Ignored(IgnoreReason::OutOfAmmo));
                }
                self.fire_round()?;
                Ok(TapOutcome::StrayShot)
            }
        }
    }

    fn fire_round(&mut self) -> Result<(), SessionError> {
        self.set_ammunition(self.ammunition as i32 - 1)
    }

    fn game_over(&mut self) {
        self.phase = SessionPhase::Ended;
        for timer in [
            self.clock_timer.take(),
            self.spawn_timer.take(),
            self.reload_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(timer);
        }

        self.commands.push(RenderCommand::SetLabel {
            label: Label::Time,
            text: command::GAME_OVER_TEXT.to_string(),
        });
        self.commands.push(RenderCommand::GameOverDisplay);
        self.sync_reload_control();

        log::info!(
            "Game over: score {} ({} targets still on screen)",
            self.score,
            self.targets.len()
        );
    }
}
