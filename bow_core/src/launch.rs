//! Arrow creation at the moment of release.

use std::f32::consts::FRAC_PI_2;

use nalgebra::Vector2;

use crate::aim::AimState;
use crate::projectile::Projectile;

/// Builds projectiles from an aim snapshot and the released power.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaunchFactory;

impl LaunchFactory {
    pub fn new() -> Self { LaunchFactory }

    /// Snapshot `aim` into a new arrow travelling at `power` units/frame.
    ///
    /// A zero `power` yields an arrow that is stationary at launch and only
    /// falls under gravity afterwards.
    pub fn create(&self, aim: &AimState, power: f32) -> Projectile {
        let orientation = aim.angle;
        Projectile {
            position: aim.position,
            velocity: travel_direction(orientation) * power,
            orientation,
        }
    }
}

/// Unit travel direction for a mesh orientation.
///
/// Orientations carry the quarter-turn rest-pose correction applied in
/// [`crate::aim::estimate`]; adding it back recovers the raw
/// pointer→reference direction.  The renderer draws arrow shafts along the
/// same vector.
pub fn travel_direction(orientation: f32) -> Vector2<f32> {
    let heading = orientation + FRAC_PI_2;
    Vector2::new(heading.cos(), heading.sin())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point2;

    #[test]
    fn speed_equals_power() {
        let aim = AimState { position: Point2::new(1.0, -2.0), angle: 0.7 };
        let p = LaunchFactory::new().create(&aim, 1.5);
        assert_abs_diff_eq!(p.velocity.norm(), 1.5, epsilon = 1e-6);
        assert_eq!(p.position, aim.position);
        assert_eq!(p.orientation, aim.angle);
    }

    #[test]
    fn direction_undoes_rest_pose_offset() {
        // Raw direction straight up → stored angle 0 → travels +y.
        let aim = AimState { position: Point2::origin(), angle: 0.0 };
        let p = LaunchFactory::new().create(&aim, 1.0);
        assert_abs_diff_eq!(p.velocity.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.velocity.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_power_is_stationary() {
        let aim = AimState { position: Point2::new(3.0, 3.0), angle: 1.0 };
        let p = LaunchFactory::new().create(&aim, 0.0);
        assert_eq!(p.velocity.norm(), 0.0);
    }

    #[test]
    fn launched_arrow_does_not_follow_later_aim() {
        let mut aim = AimState { position: Point2::new(1.0, 1.0), angle: 0.0 };
        let p = LaunchFactory::new().create(&aim, 1.0);
        aim.position = Point2::new(9.0, 9.0);
        aim.angle = 2.0;
        assert_eq!(p.position, Point2::new(1.0, 1.0));
        assert_eq!(p.orientation, 0.0);
    }

    #[test]
    fn travel_direction_is_unit_length() {
        for i in 0..16 {
            let o = i as f32 * 0.4 - 3.0;
            assert_abs_diff_eq!(travel_direction(o).norm(), 1.0, epsilon = 1e-6);
        }
    }
}
