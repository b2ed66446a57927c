//! Draw-and-release state machine.
//!
//! ```text
//!          press                      release
//!  Idle ───────────▶ Charging ─────────────────▶ Idle   (emits LaunchRequest)
//!   ▲  release: no-op   │  press: no-op
//!   └───────────────────┘  tick: power += step, saturating at max_power
//! ```

use crate::config::BowConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargePhase { Idle, Charging }

/// Observable charge state, read once per frame by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeState {
    pub is_charging: bool,
    pub power:       f32,
}

/// Emitted by [`ChargeController::release`]; carries the power as it stood
/// immediately before the reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchRequest {
    pub power: f32,
}

#[derive(Clone, Debug)]
pub struct ChargeController {
    phase:     ChargePhase,
    /// Ticks accumulated in the current draw.  Power is derived from the
    /// count so repeated float additions cannot drift.
    ticks:     u32,
    step:      f32,
    max_power: f32,
}

impl ChargeController {
    pub fn new(cfg: &BowConfig) -> Self {
        ChargeController {
            phase:     ChargePhase::Idle,
            ticks:     0,
            step:      cfg.charge_step.max(0.0),
            max_power: cfg.max_power.max(0.0),
        }
    }

    pub fn phase(&self) -> ChargePhase { self.phase }

    pub fn is_charging(&self) -> bool { self.phase == ChargePhase::Charging }

    pub fn power(&self) -> f32 {
        (self.ticks as f32 * self.step).min(self.max_power)
    }

    /// Fraction of full draw, 0.0–1.0.
    pub fn fraction(&self) -> f32 {
        if self.max_power <= 0.0 { 0.0 } else { self.power() / self.max_power }
    }

    pub fn state(&self) -> ChargeState {
        ChargeState { is_charging: self.is_charging(), power: self.power() }
    }

    /// Start drawing.  Returns `true` on the Idle → Charging transition.
    pub fn press(&mut self) -> bool {
        match self.phase {
            ChargePhase::Idle => {
                self.phase = ChargePhase::Charging;
                true
            }
            ChargePhase::Charging => false,
        }
    }

    /// Let go.  Only a release while charging produces a launch; power is
    /// reset in the same call.
    pub fn release(&mut self) -> Option<LaunchRequest> {
        match self.phase {
            ChargePhase::Charging => {
                let request = LaunchRequest { power: self.power() };
                self.phase = ChargePhase::Idle;
                self.ticks = 0;
                Some(request)
            }
            ChargePhase::Idle => None,
        }
    }

    /// One fixed-interval accumulation step.  Returns `true` if power grew.
    pub fn tick(&mut self) -> bool {
        if self.phase != ChargePhase::Charging || self.power() >= self.max_power {
            return false;
        }
        if self.step <= 0.0 {
            return false;
        }
        self.ticks += 1;
        true
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn controller() -> ChargeController {
        ChargeController::new(&BowConfig::default())
    }

    #[test]
    fn starts_idle_with_no_power() {
        let c = controller();
        assert_eq!(c.phase(), ChargePhase::Idle);
        assert_eq!(c.power(), 0.0);
    }

    #[test]
    fn ticks_while_idle_do_nothing() {
        let mut c = controller();
        for _ in 0..5 { assert!(!c.tick()); }
        assert_eq!(c.power(), 0.0);
    }

    #[test]
    fn three_ticks_give_point_three() {
        let mut c = controller();
        c.press();
        for _ in 0..3 { c.tick(); }
        let req = c.release().unwrap();
        assert_abs_diff_eq!(req.power, 0.3, epsilon = 1e-6);
        assert_eq!(c.power(), 0.0);
        assert!(!c.is_charging());
    }

    #[test]
    fn power_saturates_at_max() {
        let mut c = controller();
        c.press();
        for _ in 0..100 { c.tick(); }
        assert_eq!(c.power(), 2.0);
        assert!(!c.tick());
        assert_eq!(c.release(), Some(LaunchRequest { power: 2.0 }));
    }

    #[test]
    fn cap_that_is_not_a_multiple_of_step_still_clamps() {
        let cfg = BowConfig { max_power: 0.25, ..BowConfig::default() };
        let mut c = ChargeController::new(&cfg);
        c.press();
        for _ in 0..10 { c.tick(); }
        assert_eq!(c.power(), 0.25);
    }

    #[test]
    fn double_press_is_single_press() {
        let mut once  = controller();
        let mut twice = controller();
        assert!(once.press());
        assert!(twice.press());
        assert!(!twice.press());
        for _ in 0..4 {
            once.tick();
            twice.tick();
        }
        assert_eq!(once.power(), twice.power());
    }

    #[test]
    fn release_while_idle_is_noop() {
        let mut c = controller();
        assert_eq!(c.release(), None);
        assert_eq!(c.phase(), ChargePhase::Idle);
    }

    #[test]
    fn release_without_ticks_launches_zero_power() {
        let mut c = controller();
        c.press();
        assert_eq!(c.release(), Some(LaunchRequest { power: 0.0 }));
    }

    #[test]
    fn power_stays_in_bounds_for_mixed_sequences() {
        let mut c = controller();
        // Deterministic pseudo-random walk over press/release/tick.
        let mut seed = 0x2545F491u32;
        for _ in 0..5_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 5 {
                0 => { c.press(); }
                1 => {
                    if c.release().is_some() {
                        assert_eq!(c.power(), 0.0);
                    }
                }
                _ => { c.tick(); }
            }
            assert!((0.0..=2.0).contains(&c.power()));
        }
    }

    #[test]
    fn fraction_tracks_power() {
        let mut c = controller();
        c.press();
        for _ in 0..10 { c.tick(); }
        assert_abs_diff_eq!(c.fraction(), 0.5, epsilon = 1e-6);
    }
}
