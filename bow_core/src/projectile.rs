//! Live arrows and their per-frame flight.
//!
//! Arrows live in a generational arena so ids stay valid while others are
//! removed, and removal during a step is done by [`Arena::retain`], which
//! visits every live arrow exactly once.

use generational_arena::{Arena, Index};
use log::debug;
use nalgebra::{Point2, Vector2};

use crate::config::BowConfig;

/// One arrow in flight.  Velocity is in world units per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub position:    Point2<f32>,
    pub velocity:    Vector2<f32>,
    pub orientation: f32,
}

impl Projectile {
    /// True once the arrow has left the square `[-boundary, boundary]²`.
    pub fn out_of_bounds(&self, boundary: f32) -> bool {
        self.position.x.abs() > boundary || self.position.y.abs() > boundary
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectileId(Index);

/// Outcome of one [`ProjectileSimulator::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Arrows that were integrated this frame (including removed ones).
    pub advanced: usize,
    /// Arrows that crossed the boundary and were dropped.
    pub removed:  usize,
}

/// Owns every live arrow from launch until it leaves the play area.
#[derive(Debug)]
pub struct ProjectileSimulator {
    live:         Arena<Projectile>,
    gravity_step: f32,
    boundary:     f32,
}

impl ProjectileSimulator {
    pub fn new(cfg: &BowConfig) -> Self {
        ProjectileSimulator {
            live:         Arena::new(),
            gravity_step: cfg.gravity_step,
            boundary:     cfg.boundary,
        }
    }

    pub fn spawn(&mut self, projectile: Projectile) -> ProjectileId {
        ProjectileId(self.live.insert(projectile))
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.get(id.0)
    }

    pub fn len(&self) -> usize { self.live.len() }

    pub fn is_empty(&self) -> bool { self.live.is_empty() }

    /// Advance every arrow by one frame: move, fall, then cull.
    pub fn step(&mut self) -> StepReport {
        let gravity  = self.gravity_step;
        let boundary = self.boundary;
        let mut report = StepReport::default();

        self.live.retain(|_, p| {
            p.position += p.velocity;
            p.velocity.y -= gravity;
            report.advanced += 1;

            let keep = !p.out_of_bounds(boundary);
            if !keep {
                report.removed += 1;
            }
            keep
        });

        if report.removed > 0 {
            debug!(
                "removed {} arrow(s) past the boundary, {} in flight",
                report.removed,
                self.live.len()
            );
        }
        report
    }

    /// Read-only view of every live arrow, for the renderer.
    pub fn snapshot(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.live.iter().map(|(_, p)| p)
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn arrow(px: f32, py: f32, vx: f32, vy: f32) -> Projectile {
        Projectile {
            position:    Point2::new(px, py),
            velocity:    Vector2::new(vx, vy),
            orientation: 0.0,
        }
    }

    fn sim() -> ProjectileSimulator {
        ProjectileSimulator::new(&BowConfig::default())
    }

    #[test]
    fn position_moves_before_gravity_applies() {
        let mut s = sim();
        let id = s.spawn(arrow(0.0, 0.0, 0.5, 0.2));
        s.step();
        let p = s.get(id).unwrap();
        assert_abs_diff_eq!(p.position.x, 0.5);
        assert_abs_diff_eq!(p.position.y, 0.2);
        assert_abs_diff_eq!(p.velocity.y, 0.19, epsilon = 1e-6);
    }

    #[test]
    fn vertical_velocity_falls_linearly() {
        let mut s = sim();
        let id = s.spawn(arrow(0.0, 0.0, 0.0, 0.5));
        for n in 1..=60 {
            s.step();
            let vy = s.get(id).unwrap().velocity.y;
            assert_abs_diff_eq!(vy, 0.5 - n as f32 * 0.01, epsilon = 1e-5);
        }
    }

    #[test]
    fn unit_velocity_is_removed_on_frame_21() {
        let mut s = sim();
        let id = s.spawn(arrow(0.0, 0.0, 1.0, 0.0));
        for _ in 0..20 {
            assert_eq!(s.step().removed, 0);
        }
        assert!(s.get(id).is_some());
        let report = s.step();
        assert_eq!(report.removed, 1);
        assert!(s.get(id).is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn falling_arrow_is_removed_below_floor() {
        let cfg = BowConfig { gravity_step: 1.0, ..BowConfig::default() };
        let mut s = ProjectileSimulator::new(&cfg);
        s.spawn(arrow(0.0, 0.0, 0.0, 0.0));
        let mut frames = 0;
        while !s.is_empty() {
            s.step();
            frames += 1;
            assert!(frames < 100);
        }
        // y: 0, -1, -3, -6, -10, -15, -21
        assert_eq!(frames, 7);
    }

    #[test]
    fn removal_does_not_skip_neighbours() {
        let mut s = sim();
        // Interleave arrows that leave immediately with arrows that stay.
        let mut stay = Vec::new();
        for i in 0..10 {
            if i % 2 == 0 {
                s.spawn(arrow(19.5, 0.0, 1.0, 0.0));
            } else {
                stay.push(s.spawn(arrow(0.0, 0.0, 0.1, 0.0)));
            }
        }
        let report = s.step();
        assert_eq!(report, StepReport { advanced: 10, removed: 5 });
        for id in stay {
            // Each survivor advanced exactly once.
            assert_abs_diff_eq!(s.get(id).unwrap().position.x, 0.1);
        }
    }

    #[test]
    fn ids_stay_valid_after_other_removals() {
        let mut s = sim();
        let gone = s.spawn(arrow(20.0, 0.0, 1.0, 0.0));
        let kept = s.spawn(arrow(0.0, 0.0, 0.0, 0.0));
        s.step();
        assert!(s.get(gone).is_none());
        assert!(s.get(kept).is_some());
        // A recycled slot must not resurrect the old id.
        let fresh = s.spawn(arrow(1.0, 1.0, 0.0, 0.0));
        assert_ne!(fresh, gone);
        assert!(s.get(gone).is_none());
    }

    #[test]
    fn snapshot_lists_every_live_arrow() {
        let mut s = sim();
        s.spawn(arrow(1.0, 0.0, 0.0, 0.0));
        s.spawn(arrow(2.0, 0.0, 0.0, 0.0));
        let mut xs: Vec<f32> = s.snapshot().map(|p| p.position.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn boundary_is_exclusive() {
        assert!(!arrow(20.0, -20.0, 0.0, 0.0).out_of_bounds(20.0));
        assert!(arrow(-20.01, 0.0, 0.0, 0.0).out_of_bounds(20.0));
    }
}
