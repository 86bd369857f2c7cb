//! The game state machine.
//!
//! [`GameSession`] owns every piece of mutable game state: mode, current
//! scene, gauges, the move in flight and any delayed actions. Bevy systems
//! call into it from input handlers and from the fixed tick; nothing else
//! mutates it.

use bevy::log::{debug, info, warn};
use bevy::prelude::{Message, Resource};

use crate::error::GameError;
use crate::gauges::{self, GaugeSignals, GaugeState};
use crate::movement::{MoveController, MoveSession, TICK_INTERVAL_MS};
use crate::scenes::{BranchChoice, Edge, Exit, Scene, SceneGraph, SceneId, START_SCENE};

/// Delay between entering a regular scene and the next move starting.
pub const AUTO_MOVE_DELAY_MS: u64 = 1000;
/// Heart-rate gained when a horror event is outrun.
pub const HORROR_EVADE_HEART: f32 = 10.0;
/// Heart-rate gained when a horror event hits a walking player.
pub const HORROR_HIT_HEART: f32 = 30.0;
/// Urgency floor after a horror hit.
pub const HORROR_HIT_URGENCY: f32 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Ended(Outcome),
}

/// One-shot notifications for the presentation layer.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    CrisisEntered,
    CrisisExited,
    HorrorEvaded,
    HorrorHit,
    SceneEntered(SceneId),
    GameEnded(Outcome),
}

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    generation: u32,
    due_ms: u64,
    from: SceneId,
    edge: Edge,
}

/// What the presentation layer reads after each tick or input.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub scene_text: &'static str,
    pub background: &'static str,
    pub urgency: f32,
    pub heart_rate: f32,
    pub move_progress: f32,
    pub is_running: bool,
    pub is_moving: bool,
    pub awaiting_branch: bool,
    pub urgency_critical: bool,
}

#[derive(Resource, Debug)]
pub struct GameSession {
    graph: SceneGraph,
    mode: Mode,
    scene: SceneId,
    gauges: GaugeState,
    mover: MoveController,
    awaiting_branch: bool,
    /// Bumped on every start and return to menu; delayed actions from an
    /// older generation are dropped.
    generation: u32,
    clock_ms: u64,
    pending: Vec<PendingMove>,
    notices: Vec<Notice>,
}

impl GameSession {
    pub fn new(graph: SceneGraph) -> Self {
        Self {
            graph,
            mode: Mode::Menu,
            scene: START_SCENE,
            gauges: GaugeState::default(),
            mover: MoveController::default(),
            awaiting_branch: false,
            generation: 0,
            clock_ms: 0,
            pending: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene
    }

    pub fn scene(&self) -> Result<&Scene, GameError> {
        self.graph.scene(self.scene)
    }

    pub fn gauges(&self) -> &GaugeState {
        &self.gauges
    }

    pub fn is_moving(&self) -> bool {
        self.mover.is_moving()
    }

    pub fn active_move(&self) -> Option<&MoveSession> {
        self.mover.active()
    }

    pub fn awaiting_branch(&self) -> bool {
        self.awaiting_branch
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        let (scene_text, background) = match self.scene() {
            Ok(scene) => (scene.text, scene.background),
            Err(_) => ("", ""),
        };
        let gauges = self.gauges();
        Snapshot {
            scene_text,
            background,
            urgency: gauges.urgency,
            heart_rate: gauges.heart_rate,
            move_progress: gauges.move_progress,
            is_running: gauges.is_running,
            is_moving: self.is_moving(),
            awaiting_branch: self.awaiting_branch(),
            urgency_critical: gauges.urgency_critical(),
        }
    }

    /// Take the notices raised since the last drain.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Reset everything and enter the start scene.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        info!("game started");
        self.reset();
        self.mode = Mode::Playing;
        self.enter_scene(START_SCENE, 0.0)
    }

    /// Leave the end screen for the menu.
    pub fn acknowledge_end(&mut self) -> Result<(), GameError> {
        if !matches!(self.mode, Mode::Ended(_)) {
            return Err(GameError::NotEnded);
        }
        self.reset();
        self.mode = Mode::Menu;
        Ok(())
    }

    pub fn press_patience(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        self.gauges.press();
        Ok(())
    }

    pub fn toggle_speed(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        self.gauges.toggle_speed();
        debug!(
            "speed toggled: {}",
            if self.gauges.is_running { "running" } else { "walking" }
        );
        Ok(())
    }

    /// Manual "forward" input: start the current scene's move right away, or
    /// re-raise the branch prompt at the gate.
    pub fn advance(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        match self.graph.scene(self.scene)?.exit {
            Exit::Edge(edge) => self.start_move(edge),
            Exit::BranchGate { .. } => {
                self.reject_while_moving()?;
                self.awaiting_branch = true;
                Ok(())
            }
            Exit::Goal => Ok(()),
        }
    }

    /// Pick a route at the branch gate and start moving along it.
    pub fn choose_branch(&mut self, choice: BranchChoice) -> Result<(), GameError> {
        self.ensure_playing()?;
        let route = self.graph.resolve_branch(self.scene_id(), choice)?;
        self.reject_while_moving()?;
        if !self.awaiting_branch {
            return Err(GameError::NotAtBranchGate);
        }

        info!("branch chosen: {choice}");
        self.awaiting_branch = false;
        self.gauges.add_heart_rate(route.heart_delta);
        self.start_move(route.edge)
    }

    /// Textual branch input, e.g. from a debug console.
    pub fn choose_branch_input(&mut self, input: &str) -> Result<(), GameError> {
        let choice = BranchChoice::parse(input)?;
        self.choose_branch(choice)
    }

    /// Advance one fixed tick. Does nothing outside of play.
    pub fn tick(&mut self) -> Result<(), GameError> {
        if self.mode != Mode::Playing {
            return Ok(());
        }
        self.clock_ms += TICK_INTERVAL_MS;

        let (next, signals) = gauges::tick(self.gauges);
        self.gauges = next;
        self.push_signals(signals);
        if signals.urgency_exceeded {
            self.end(Outcome::Failure);
            return Ok(());
        }

        self.run_due_moves();

        let is_running = self.gauges.is_running;
        if let Some(done) = self.mover.advance(&mut self.gauges.move_progress, is_running) {
            self.complete_move(done)?;
        }

        if self.mode == Mode::Playing && self.gauges.urgency_exceeded() {
            self.end(Outcome::Failure);
        }
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.mode == Mode::Playing {
            Ok(())
        } else {
            Err(GameError::NotPlaying)
        }
    }

    fn reject_while_moving(&self) -> Result<(), GameError> {
        match self.active_move() {
            Some(active) => {
                warn!("already moving to {}, input ignored", active.target);
                Err(GameError::InvalidMoveRequest {
                    active: active.target,
                })
            }
            None => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.scene = START_SCENE;
        self.gauges = GaugeState::default();
        self.mover.stop(&mut self.gauges.move_progress);
        self.awaiting_branch = false;
        self.clock_ms = 0;
        self.notices.clear();
    }

    fn start_move(&mut self, edge: Edge) -> Result<(), GameError> {
        self.mover.start(edge, &mut self.gauges.move_progress)
    }

    fn schedule_move(&mut self, edge: Edge) {
        self.pending.push(PendingMove {
            generation: self.generation,
            due_ms: self.clock_ms + AUTO_MOVE_DELAY_MS,
            from: self.scene,
            edge,
        });
    }

    fn run_due_moves(&mut self) {
        let now = self.clock_ms;
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.generation != self.generation || p.due_ms <= now);
        self.pending = waiting;

        for pending in due {
            if pending.generation != self.generation {
                debug!("dropped stale move to {} from an earlier game", pending.edge.target);
                continue;
            }
            if pending.from != self.scene {
                debug!("dropped move to {}, already left {}", pending.edge.target, pending.from);
                continue;
            }
            // A manual advance may have beaten the timer; that rejection is logged and harmless.
            let _ = self.start_move(pending.edge);
        }
    }

    fn complete_move(&mut self, done: MoveSession) -> Result<(), GameError> {
        info!("arrived: {} -> {}", self.scene, done.target);
        if done.has_event && done.target != SceneId::Goal {
            self.resolve_horror();
        }
        self.enter_scene(done.target, done.time_cost)
    }

    /// Outcome depends only on whether the player is running on arrival.
    fn resolve_horror(&mut self) {
        if self.gauges.is_running {
            info!("horror event evaded");
            self.gauges.add_heart_rate(HORROR_EVADE_HEART);
            self.notices.push(Notice::HorrorEvaded);
        } else {
            info!("horror event hit");
            self.gauges.add_heart_rate(HORROR_HIT_HEART);
            self.gauges.urgency = self.gauges.urgency.max(HORROR_HIT_URGENCY);
            self.notices.push(Notice::HorrorHit);
        }
    }

    fn enter_scene(&mut self, id: SceneId, time_cost: f32) -> Result<(), GameError> {
        let exit = match self.graph.scene(id) {
            Ok(scene) => scene.exit,
            Err(err) => {
                warn!("{err}, staying in {}", self.scene);
                return Err(err);
            }
        };

        self.scene = id;
        self.gauges.apply_scene_cost(time_cost);
        self.notices.push(Notice::SceneEntered(id));
        info!("scene {id} (urgency {:.1})", self.gauges.urgency);

        match exit {
            // Entry cost is charged before the win is decided.
            Exit::Goal if self.gauges.urgency_exceeded() => self.end(Outcome::Failure),
            Exit::Goal => self.end(Outcome::Success),
            Exit::BranchGate { .. } => self.awaiting_branch = true,
            Exit::Edge(edge) => self.schedule_move(edge),
        }
        Ok(())
    }

    fn push_signals(&mut self, signals: GaugeSignals) {
        if signals.crisis_entered {
            self.notices.push(Notice::CrisisEntered);
        }
        if signals.crisis_exited {
            self.notices.push(Notice::CrisisExited);
        }
    }

    fn end(&mut self, outcome: Outcome) {
        info!("game over: {outcome:?}");
        self.mode = Mode::Ended(outcome);
        self.mover.stop(&mut self.gauges.move_progress);
        self.awaiting_branch = false;
        self.notices.push(Notice::GameEnded(outcome));
    }
}
