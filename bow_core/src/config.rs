//! Tunable constants for aiming, charging and flight.
//!
//! Every component takes a [`BowConfig`]; `BowConfig::default()` is built
//! from the `DEFAULT_*` constants below.

use std::time::Duration;

/// Normalized landmark space [0,1] → world units.
pub const DEFAULT_AIM_SCALE:       f32 = 10.0;
/// Power cap reached after `MAX_POWER / CHARGE_STEP` ticks.
pub const DEFAULT_MAX_POWER:       f32 = 2.0;
pub const DEFAULT_CHARGE_STEP:     f32 = 0.1;
pub const DEFAULT_CHARGE_INTERVAL: Duration = Duration::from_millis(100);
/// Downward velocity change per frame (world units / frame²).
pub const DEFAULT_GRAVITY_STEP:    f32 = 0.01;
/// Symmetric play-area limit on both axes.
pub const DEFAULT_BOUNDARY:        f32 = 20.0;

/// All tunables of the bow core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BowConfig {
    pub aim_scale:       f32,
    pub max_power:       f32,
    pub charge_step:     f32,
    pub charge_interval: Duration,
    pub gravity_step:    f32,
    pub boundary:        f32,
}

impl Default for BowConfig {
    fn default() -> Self {
        BowConfig {
            aim_scale:       DEFAULT_AIM_SCALE,
            max_power:       DEFAULT_MAX_POWER,
            charge_step:     DEFAULT_CHARGE_STEP,
            charge_interval: DEFAULT_CHARGE_INTERVAL,
            gravity_step:    DEFAULT_GRAVITY_STEP,
            boundary:        DEFAULT_BOUNDARY,
        }
    }
}

impl BowConfig {
    /// Number of charge ticks needed to reach `max_power`.
    pub fn ticks_to_full(&self) -> u32 {
        if self.charge_step <= 0.0 {
            return 0;
        }
        (self.max_power / self.charge_step).round() as u32
    }

    /// Wall-clock time from press to full power.
    pub fn time_to_full(&self) -> Duration {
        self.charge_interval * self.ticks_to_full()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = BowConfig::default();
        assert_eq!(cfg.aim_scale, 10.0);
        assert_eq!(cfg.boundary, 20.0);
        assert_eq!(cfg.charge_interval, Duration::from_millis(100));
    }

    #[test]
    fn full_charge_takes_two_seconds() {
        let cfg = BowConfig::default();
        assert_eq!(cfg.ticks_to_full(), 20);
        assert_eq!(cfg.time_to_full(), Duration::from_secs(2));
    }

    #[test]
    fn zero_step_never_charges() {
        let cfg = BowConfig { charge_step: 0.0, ..BowConfig::default() };
        assert_eq!(cfg.ticks_to_full(), 0);
    }
}
