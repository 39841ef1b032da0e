//! Game session state and the setters that keep the HUD in sync
//!
//! Every mutation of score, time, ammunition or the reload flag goes through
//! a setter that queues the matching [`RenderCommand`] right after it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::command::{self, Label, RenderCommand};
use super::scheduler::{Scheduler, TimerEvent, TimerId};
use crate::error::{SessionError, TuningError};
use crate::tuning::{Lane, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Clock running, targets spawning
    Playing,
    /// Time ran out (terminal)
    Ended,
}

/// Target identity, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Target types. Serialized as the renderer's sprite tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Shoot these
    #[serde(rename = "bad")]
    Hostile,
    /// Don't
    #[serde(rename = "good")]
    Friendly,
}

impl TargetKind {
    /// Sprite tag used by the renderer
    pub fn tag(&self) -> &'static str {
        match self {
            TargetKind::Hostile => "bad",
            TargetKind::Friendly => "good",
        }
    }
}

/// A target crossing a lane
#[derive(Debug, Clone)]
pub struct Target {
    pub id: TargetId,
    /// Index into the lane layout it spawned under
    pub lane: usize,
    /// Copy of that lane's endpoints
    pub path: Lane,
    pub kind: TargetKind,
    /// Scheduler time at spawn (ms)
    pub spawned_at: u64,
    pub travel_ms: u64,
    /// Pending removal if never tapped
    pub(crate) expiry: TimerId,
}

impl Target {
    /// Progress along the lane in [0, 1] at scheduler time `now`
    pub fn progress_at(&self, now: u64) -> f32 {
        let elapsed = now.saturating_sub(self.spawned_at);
        (elapsed as f32 / self.travel_ms as f32).min(1.0)
    }

    /// Interpolated position at scheduler time `now`
    pub fn position_at(&self, now: u64) -> Vec2 {
        self.path.point_at(self.progress_at(now))
    }
}

/// The whole game: one round of targets, ammunition and a countdown
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) tuning: Tuning,
    pub(crate) phase: SessionPhase,
    pub(crate) score: i32,
    pub(crate) time_remaining: u32,
    pub(crate) ammunition: u8,
    pub(crate) is_reloading: bool,
    pub(crate) reload_control_visible: bool,
    /// Active targets (sorted by id)
    pub(crate) targets: Vec<Target>,
    pub(crate) scheduler: Scheduler,
    pub(crate) clock_timer: Option<TimerId>,
    pub(crate) spawn_timer: Option<TimerId>,
    pub(crate) reload_timer: Option<TimerId>,
    /// Outbox for the renderer
    pub(crate) commands: Vec<RenderCommand>,
    next_id: u32,
}

impl GameSession {
    /// Start a session with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::start(seed, Tuning::default())
    }

    /// Start a session with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::start(seed, tuning))
    }

    fn start(seed: u64, tuning: Tuning) -> Self {
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Playing,
            score: 0,
            time_remaining: tuning.start_time_secs,
            ammunition: tuning.magazine_capacity,
            is_reloading: false,
            reload_control_visible: false,
            targets: Vec::new(),
            scheduler: Scheduler::new(),
            clock_timer: None,
            spawn_timer: None,
            reload_timer: None,
            commands: Vec::new(),
            next_id: 1,
            tuning,
        };

        session.clock_timer = Some(
            session
                .scheduler
                .schedule_repeating(session.tuning.clock_interval_ms, TimerEvent::Clock),
        );
        session.spawn_timer = Some(
            session
                .scheduler
                .schedule_repeating(session.tuning.spawn_interval_ms, TimerEvent::Spawn),
        );

        // Initial HUD
        session.push_label(Label::Score, command::score_text(session.score));
        session.push_label(Label::Time, command::time_text(session.time_remaining));
        session.push_label(Label::Ammo, command::ammo_text(session.ammunition));
        session.commands.push(RenderCommand::SetReloadControlVisible(false));

        log::info!("Session started with seed: {}", seed);
        session
    }

    // === Accessors ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn ammunition(&self) -> u8 {
        self.ammunition
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Whether the reload control is currently shown
    pub fn reload_control_visible(&self) -> bool {
        self.reload_control_visible
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|i| &self.targets[i])
    }

    /// Scheduler time (ms since the session started)
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Take all queued render commands
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Queued render commands, not yet drained
    pub fn pending_commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    // === Setters ===

    pub(crate) fn set_score(&mut self, score: i32) {
        self.score = score;
        self.push_label(Label::Score, command::score_text(score));
    }

    pub(crate) fn set_time_remaining(&mut self, secs: u32) {
        self.time_remaining = secs;
        self.push_label(Label::Time, command::time_text(secs));
    }

    /// Store a new round count, then settle the reload flag and control.
    pub(crate) fn set_ammunition(&mut self, rounds: i32) -> Result<(), SessionError> {
        let capacity = self.tuning.magazine_capacity;
        if rounds < 0 {
            log::error!("Fired with an empty magazine");
            return Err(SessionError::AmmunitionUnderflow);
        }
        if rounds > capacity as i32 {
            log::error!("Magazine overfilled: {} > {}", rounds, capacity);
            return Err(SessionError::AmmunitionOverflow { capacity });
        }

        self.ammunition = rounds as u8;
        self.push_label(Label::Ammo, command::ammo_text(self.ammunition));

        if self.ammunition == capacity && self.is_reloading {
            self.set_reloading(false);
        }
        self.sync_reload_control();
        Ok(())
    }

    /// Enter or leave reload mode, starting or stopping the reload ticker
    pub(crate) fn set_reloading(&mut self, reloading: bool) {
        if self.is_reloading == reloading {
            return;
        }
        self.is_reloading = reloading;
        if reloading {
            let id = self
                .scheduler
                .schedule_repeating(self.tuning.reload_interval_ms, TimerEvent::Reload);
            self.reload_timer = Some(id);
            log::debug!("Reload started at {} rounds", self.ammunition);
        } else {
            if let Some(id) = self.reload_timer.take() {
                self.scheduler.cancel(id);
            }
            log::debug!("Reload finished");
        }
        self.sync_reload_control();
    }

    /// Control is shown only while the magazine is short and no reload runs
    pub(crate) fn sync_reload_control(&mut self) {
        let visible = self.phase == SessionPhase::Playing
            && !self.is_reloading
            && self.ammunition < self.tuning.magazine_capacity;
        if visible != self.reload_control_visible {
            self.reload_control_visible = visible;
            self.commands.push(RenderCommand::SetReloadControlVisible(visible));
        }
    }

    fn push_label(&mut self, label: Label, text: String) {
        self.commands.push(RenderCommand::SetLabel { label, text });
    }

    /// Allocate a new target ID
    pub(crate) fn next_target_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Remove a target and cancel its pending expiry
    pub(crate) fn remove_target(&mut self, id: TargetId) -> Option<Target> {
        let index = self.targets.binary_search_by_key(&id, |t| t.id).ok()?;
        let target = self.targets.remove(index);
        self.scheduler.cancel(target.expiry);
        self.commands.push(RenderCommand::RemoveEntity { id });
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let mut session = GameSession::new(42);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining(), 20);
        assert_eq!(session.ammunition(), 6);
        assert!(!session.is_reloading());
        assert!(!session.reload_control_visible());
        assert!(session.targets().is_empty());

        let commands = session.drain_commands();
        assert_eq!(
            commands,
            vec![
                RenderCommand::SetLabel {
                    label: Label::Score,
                    text: "Score: 0".into(),
                },
                RenderCommand::SetLabel {
                    label: Label::Time,
                    text: "Time: 20".into(),
                },
                RenderCommand::SetLabel {
                    label: Label::Ammo,
                    text: "⁍⁍⁍⁍⁍⁍".into(),
                },
                RenderCommand::SetReloadControlVisible(false),
            ]
        );
        assert!(session.pending_commands().is_empty());
    }

    #[test]
    fn test_with_tuning_validates() {
        let tuning = Tuning {
            magazine_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            GameSession::with_tuning(1, tuning),
            Err(TuningError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_ammunition_bounds_are_reported() {
        let mut session = GameSession::new(1);
        assert_eq!(session.set_ammunition(-1), Err(SessionError::AmmunitionUnderflow));
        assert_eq!(
            session.set_ammunition(7),
            Err(SessionError::AmmunitionOverflow { capacity: 6 })
        );
        // Rejected writes leave state alone
        assert_eq!(session.ammunition(), 6);
    }

    #[test]
    fn test_reload_control_follows_ammunition() {
        let mut session = GameSession::new(1);
        session.drain_commands();

        session.set_ammunition(5).unwrap();
        assert!(session.reload_control_visible());
        assert!(
            session
                .pending_commands()
                .contains(&RenderCommand::SetReloadControlVisible(true))
        );

        session.set_reloading(true);
        assert!(!session.reload_control_visible());
        assert!(session.reload_timer.is_some());

        session.set_ammunition(6).unwrap();
        assert!(!session.is_reloading());
        assert!(!session.reload_control_visible());
        assert!(session.reload_timer.is_none());
    }

    #[test]
    fn test_target_position_interpolates() {
        let mut session = GameSession::new(3);
        let id = session.next_target_id();
        let expiry = session.scheduler.schedule_once(3500, TimerEvent::Expire(id));
        let target = Target {
            id,
            lane: 1,
            path: session.tuning().lanes[1],
            kind: TargetKind::Hostile,
            spawned_at: 0,
            travel_ms: 3000,
            expiry,
        };
        assert_eq!(target.position_at(0), Vec2::new(1074.0, 570.0));
        assert_eq!(target.position_at(1500), Vec2::new(512.0, 570.0));
        assert_eq!(target.position_at(9000), Vec2::new(-50.0, 570.0));
    }

    #[test]
    fn test_target_keeps_its_lane_path() {
        let mut session = GameSession::new(17);
        let mut spawned = None;
        for _ in 0..64 {
            let id = session.on_spawn_tick().unwrap();
            if session.target(id).unwrap().lane == 2 {
                spawned = Some(id);
                break;
            }
        }
        let id = spawned.expect("no spawn on lane 2");

        // Shrinking the layout afterwards cannot strand the target
        session.tuning.lanes.truncate(1);
        let target = session.target(id).unwrap();
        assert_eq!(target.position_at(0), Vec2::new(-50.0, 470.0));
        assert_eq!(target.position_at(3000), Vec2::new(1074.0, 470.0));
    }
}
