//! Urgency and heart-rate gauges.
//!
//! All gauge math lives here as pure functions over [`GaugeState`], so the
//! session can run it once per fixed tick and tests can run it in a loop.

/// Upper bound shared by every gauge.
pub const GAUGE_MAX: f32 = 100.0;

/// Urgency added every tick before multipliers.
pub const BASE_URGENCY_INCREASE: f32 = 0.15;
/// Urgency growth multiplier while running.
pub const RUN_MULTIPLIER: f32 = 3.0;
/// Heart-rate gained per tick while running.
pub const RUN_HEART_GAIN: f32 = 0.1;
/// Heart-rate lost per tick while walking.
pub const HEART_DECAY: f32 = 0.02;
/// Heart-rate above which panic doubles urgency growth.
pub const CRISIS_HEART_RATE: f32 = 70.0;
pub const PANIC_MULTIPLIER: f32 = 2.0;
/// Urgency growth multiplier while the patience button is being mashed.
pub const SUPPRESSION_MULTIPLIER: f32 = 0.3;
/// Per-tick decay factor of the patience press counter.
pub const PRESS_DECAY: f32 = 0.7;
/// Urgency added per unit of scene time cost on entry.
pub const SCENE_COST_FACTOR: f32 = 0.02;
/// Urgency shown as critical by the HUD.
pub const URGENCY_DANGER: f32 = 80.0;

/// Every value the per-tick update reads or writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    pub urgency: f32,
    pub heart_rate: f32,
    pub move_progress: f32,
    pub press_count: f32,
    pub is_running: bool,
}

impl Default for GaugeState {
    fn default() -> Self {
        Self {
            urgency: 0.0,
            heart_rate: 10.0,
            move_progress: 0.0,
            press_count: 0.0,
            is_running: false,
        }
    }
}

/// Edge-triggered signals produced by a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaugeSignals {
    pub crisis_entered: bool,
    pub crisis_exited: bool,
    pub urgency_exceeded: bool,
}

impl GaugeState {
    pub fn in_crisis(&self) -> bool {
        self.heart_rate > CRISIS_HEART_RATE
    }

    pub fn is_suppressed(&self) -> bool {
        self.press_count > 0.0
    }

    pub fn urgency_exceeded(&self) -> bool {
        self.urgency >= GAUGE_MAX
    }

    pub fn urgency_critical(&self) -> bool {
        self.urgency > URGENCY_DANGER
    }

    /// Shift heart-rate by `delta`, keeping it inside the gauge range.
    pub fn add_heart_rate(&mut self, delta: f32) {
        self.heart_rate = clamp_gauge(self.heart_rate + delta);
    }

    pub fn add_urgency(&mut self, delta: f32) {
        self.urgency = clamp_gauge(self.urgency + delta);
    }

    /// Urgency penalty for arriving in a scene with the given time cost.
    pub fn apply_scene_cost(&mut self, time_cost: f32) {
        if time_cost > 0.0 {
            self.add_urgency(time_cost * SCENE_COST_FACTOR);
        }
    }

    /// One hold-style press on the patience button.
    pub fn press(&mut self) {
        self.press_count += 1.0;
    }

    pub fn toggle_speed(&mut self) {
        self.is_running = !self.is_running;
    }
}

pub fn clamp_gauge(value: f32) -> f32 {
    value.clamp(0.0, GAUGE_MAX)
}

/// Urgency gained this tick for the given heart-rate and modifiers.
///
/// Running triples the base rate, panic doubles it and suppression cuts it
/// to 30 %. Suppression slows growth, it never reverses it.
pub fn urgency_increase(is_running: bool, heart_rate: f32, suppressed: bool) -> f32 {
    let mut increase = BASE_URGENCY_INCREASE;
    if is_running {
        increase *= RUN_MULTIPLIER;
    }
    if heart_rate > CRISIS_HEART_RATE {
        increase *= PANIC_MULTIPLIER;
    }
    if suppressed {
        increase *= SUPPRESSION_MULTIPLIER;
    }
    increase
}

/// Advance the gauges by one fixed tick.
pub fn tick(state: GaugeState) -> (GaugeState, GaugeSignals) {
    let was_in_crisis = state.in_crisis();
    let mut next = state;

    // Heart-rate moves first; panic is judged on the updated value.
    next.heart_rate = if state.is_running {
        clamp_gauge(state.heart_rate + RUN_HEART_GAIN)
    } else {
        (state.heart_rate - HEART_DECAY).max(0.0).min(GAUGE_MAX)
    };

    let increase = urgency_increase(state.is_running, next.heart_rate, state.is_suppressed());
    next.urgency = clamp_gauge(state.urgency + increase);
    next.move_progress = clamp_gauge(state.move_progress);
    next.press_count = state.press_count * PRESS_DECAY;

    let signals = GaugeSignals {
        crisis_entered: !was_in_crisis && next.in_crisis(),
        crisis_exited: was_in_crisis && !next.in_crisis(),
        urgency_exceeded: next.urgency_exceeded(),
    };
    (next, signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn walking() -> GaugeState {
        GaugeState::default()
    }

    #[test]
    fn test_walking_tick_base_rate() {
        let (next, signals) = tick(walking());
        assert!((next.urgency - 0.15).abs() < EPS);
        assert!((next.heart_rate - 9.98).abs() < EPS);
        assert_eq!(signals, GaugeSignals::default());
    }

    #[test]
    fn test_running_triples_urgency_and_raises_heart() {
        let state = GaugeState {
            is_running: true,
            ..walking()
        };
        let (next, _) = tick(state);
        assert!((next.urgency - 0.45).abs() < EPS);
        assert!((next.heart_rate - 10.1).abs() < EPS);
    }

    #[test]
    fn test_heart_decay_floors_at_zero() {
        let state = GaugeState {
            heart_rate: 0.01,
            ..walking()
        };
        let (next, _) = tick(state);
        assert_eq!(next.heart_rate, 0.0);
        let (next, _) = tick(next);
        assert_eq!(next.heart_rate, 0.0);
    }

    #[test]
    fn test_panic_doubles_increase() {
        let state = GaugeState {
            heart_rate: 80.0,
            ..walking()
        };
        let (next, _) = tick(state);
        assert!((next.urgency - 0.30).abs() < EPS);
    }

    #[test]
    fn test_panic_stops_at_threshold() {
        assert!((urgency_increase(false, 70.0, false) - 0.15).abs() < EPS);
        assert!((urgency_increase(false, 70.01, false) - 0.30).abs() < EPS);
    }

    #[test]
    fn test_suppression_slows_but_never_reverses() {
        let state = GaugeState {
            urgency: 50.0,
            press_count: 1.0,
            ..walking()
        };
        let (next, _) = tick(state);
        assert!(next.urgency > 50.0);
        assert!((next.urgency - (50.0 + 0.15 * 0.3)).abs() < EPS);
    }

    #[test]
    fn test_all_multipliers_stack() {
        let inc = urgency_increase(true, 90.0, true);
        assert!((inc - 0.15 * 3.0 * 2.0 * 0.3).abs() < EPS);
    }

    #[test]
    fn test_press_count_decays_geometrically() {
        let mut state = walking();
        state.press();
        state.press();
        let mut expected = 2.0_f32;
        for _ in 0..20 {
            let (next, _) = tick(state);
            expected *= PRESS_DECAY;
            assert!((next.press_count - expected).abs() < EPS);
            assert!(next.press_count >= 0.0);
            state = next;
        }
    }

    #[test]
    fn test_gauges_stay_in_range() {
        let mut state = GaugeState {
            urgency: 99.9,
            heart_rate: 99.95,
            is_running: true,
            ..walking()
        };
        for i in 0..500 {
            if i % 7 == 0 {
                state.toggle_speed();
            }
            if i % 3 == 0 {
                state.press();
            }
            let (next, _) = tick(state);
            assert!((0.0..=GAUGE_MAX).contains(&next.urgency));
            assert!((0.0..=GAUGE_MAX).contains(&next.heart_rate));
            assert!((0.0..=GAUGE_MAX).contains(&next.move_progress));
            state = next;
        }
    }

    #[test]
    fn test_crisis_edges() {
        let state = GaugeState {
            heart_rate: 69.95,
            is_running: true,
            ..walking()
        };
        let (next, signals) = tick(state);
        assert!(signals.crisis_entered);
        assert!(!signals.crisis_exited);

        let (_, signals) = tick(next);
        assert!(!signals.crisis_entered);

        let calm = GaugeState {
            heart_rate: 70.01,
            ..walking()
        };
        let (_, signals) = tick(calm);
        assert!(signals.crisis_exited);
    }

    #[test]
    fn test_urgency_exceeded_signal() {
        let state = GaugeState {
            urgency: 99.9,
            ..walking()
        };
        let (next, signals) = tick(state);
        assert_eq!(next.urgency, GAUGE_MAX);
        assert!(signals.urgency_exceeded);
    }

    #[test]
    fn test_scene_cost() {
        let mut state = walking();
        state.apply_scene_cost(200.0);
        assert!((state.urgency - 4.0).abs() < EPS);

        state.urgency = 98.0;
        state.apply_scene_cost(350.0);
        assert_eq!(state.urgency, GAUGE_MAX);
    }

    #[test]
    fn test_heart_delta_clamped() {
        let mut state = walking();
        state.add_heart_rate(-50.0);
        assert_eq!(state.heart_rate, 0.0);
        state.add_heart_rate(500.0);
        assert_eq!(state.heart_rate, GAUGE_MAX);
    }
}
