// Progress timing for a single scene-to-scene move.

use bevy::log::{debug, warn};

use crate::error::GameError;
use crate::gauges::GAUGE_MAX;
use crate::scenes::{Edge, SceneId};

/// Length of one fixed tick. The progress math assumes this cadence.
pub const TICK_INTERVAL_MS: u64 = 16;
pub const MOVE_DURATION_WALK_MS: f32 = 5000.0;
pub const MOVE_DURATION_RUN_MS: f32 = 3000.0;

/// Progress steps at which a debug line is logged.
const PROGRESS_LOG_STEP: f32 = 5.0;

/// The move currently in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSession {
    pub target: SceneId,
    pub time_cost: f32,
    pub has_event: bool,
}

impl From<Edge> for MoveSession {
    fn from(edge: Edge) -> Self {
        Self {
            target: edge.target,
            time_cost: edge.time_cost,
            has_event: edge.has_event,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum MovePhase {
    #[default]
    Idle,
    InProgress(MoveSession),
}

#[derive(Debug, Clone, Default)]
pub struct MoveController {
    phase: MovePhase,
}

/// Progress added per tick. Looked up from the live running flag every tick,
/// so toggling speed mid-move takes effect immediately.
pub fn progress_increment(is_running: bool) -> f32 {
    let duration = if is_running {
        MOVE_DURATION_RUN_MS
    } else {
        MOVE_DURATION_WALK_MS
    };
    GAUGE_MAX / (duration / TICK_INTERVAL_MS as f32)
}

impl MoveController {
    pub fn is_moving(&self) -> bool {
        matches!(self.phase, MovePhase::InProgress(_))
    }

    pub fn active(&self) -> Option<&MoveSession> {
        match &self.phase {
            MovePhase::InProgress(session) => Some(session),
            MovePhase::Idle => None,
        }
    }

    /// Begin moving along `edge`. Rejected if a move is already in flight.
    pub fn start(&mut self, edge: Edge, progress: &mut f32) -> Result<(), GameError> {
        if let MovePhase::InProgress(current) = self.phase {
            warn!(
                "already moving to {}, rejected move to {}",
                current.target, edge.target
            );
            return Err(GameError::InvalidMoveRequest {
                active: current.target,
            });
        }
        debug!(
            "move started: {} (cost {}, event {})",
            edge.target, edge.time_cost, edge.has_event
        );
        self.phase = MovePhase::InProgress(edge.into());
        *progress = 0.0;
        Ok(())
    }

    /// Advance the active move by one tick. Returns the finished session once
    /// progress reaches 100; the controller is then idle again with progress 0.
    pub fn advance(&mut self, progress: &mut f32, is_running: bool) -> Option<MoveSession> {
        let MovePhase::InProgress(session) = self.phase else {
            return None;
        };

        let before = *progress;
        *progress += progress_increment(is_running);
        if (*progress / PROGRESS_LOG_STEP).floor() > (before / PROGRESS_LOG_STEP).floor() {
            debug!("move to {}: {:.1}%", session.target, progress.min(GAUGE_MAX));
        }

        if *progress < GAUGE_MAX {
            return None;
        }
        self.stop(progress);
        Some(session)
    }

    /// Drop any move in flight.
    pub fn stop(&mut self, progress: &mut f32) {
        self.phase = MovePhase::Idle;
        *progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> Edge {
        Edge::new(SceneId::CorridorMid, 200.0)
    }

    fn ticks_to_finish(controller: &mut MoveController, progress: &mut f32, running: bool) -> usize {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if controller.advance(progress, running).is_some() {
                return ticks;
            }
            assert!(ticks < 10_000);
        }
    }

    #[test]
    fn test_increment_per_mode() {
        assert!((progress_increment(false) - 0.32).abs() < 1e-5);
        assert!((progress_increment(true) - 100.0 / 187.5).abs() < 1e-5);
    }

    #[test]
    fn test_walk_completes_in_expected_ticks() {
        let mut controller = MoveController::default();
        let mut progress = 0.0;
        controller.start(edge(), &mut progress).unwrap();
        let ticks = ticks_to_finish(&mut controller, &mut progress, false);
        // 5000 ms / 16 ms = 312.5 ticks
        assert!((312..=314).contains(&ticks), "took {ticks} ticks");
        assert!(!controller.is_moving());
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_run_is_faster() {
        let mut controller = MoveController::default();
        let mut progress = 0.0;
        controller.start(edge(), &mut progress).unwrap();
        let ticks = ticks_to_finish(&mut controller, &mut progress, true);
        assert!((187..=189).contains(&ticks), "took {ticks} ticks");
    }

    #[test]
    fn test_toggle_mid_move_applies_immediately() {
        let mut controller = MoveController::default();
        let mut progress = 0.0;
        controller.start(edge(), &mut progress).unwrap();
        for _ in 0..100 {
            assert!(controller.advance(&mut progress, false).is_none());
        }
        let walked = progress;
        assert!(controller.advance(&mut progress, true).is_none());
        assert!((progress - walked - progress_increment(true)).abs() < 1e-4);
    }

    #[test]
    fn test_second_start_rejected() {
        let mut controller = MoveController::default();
        let mut progress = 0.0;
        controller.start(edge(), &mut progress).unwrap();
        controller.advance(&mut progress, false);
        let before = progress;

        let other = Edge::new(SceneId::Goal, 10.0);
        assert_eq!(
            controller.start(other, &mut progress),
            Err(GameError::InvalidMoveRequest {
                active: SceneId::CorridorMid
            })
        );
        assert_eq!(progress, before);
        assert_eq!(controller.active().unwrap().target, SceneId::CorridorMid);
    }

    #[test]
    fn test_completion_returns_session() {
        let mut controller = MoveController::default();
        let mut progress = 99.9;
        controller.phase = MovePhase::InProgress(edge().with_event().into());
        let done = controller.advance(&mut progress, false).unwrap();
        assert_eq!(done.target, SceneId::CorridorMid);
        assert!(done.has_event);
        assert_eq!(done.time_cost, 200.0);
    }

    #[test]
    fn test_idle_advance_is_noop() {
        let mut controller = MoveController::default();
        let mut progress = 0.0;
        assert!(controller.advance(&mut progress, true).is_none());
        assert_eq!(progress, 0.0);
    }
}
