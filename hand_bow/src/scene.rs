//! What the frame loop hands to the renderer each frame.

use bow_core::{AimState, ChargeState, Projectile};
use nalgebra::Point2;

/// Placement of a rigid mesh on the play plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position:    Point2<f32>,
    pub orientation: f32,
}

impl From<AimState> for Pose {
    fn from(aim: AimState) -> Self {
        Pose { position: aim.position, orientation: aim.angle }
    }
}

impl From<&Projectile> for Pose {
    fn from(p: &Projectile) -> Self {
        Pose { position: p.position, orientation: p.orientation }
    }
}

/// One frame's worth of drawable state.
#[derive(Clone, Debug)]
pub struct SceneFrame<'a> {
    pub bow:             Pose,
    /// The nocked arrow; it shares the bow's transform.
    pub indicator:       Pose,
    pub projectiles:     Vec<Pose>,
    pub charge:          ChargeState,
    /// Draw progress 0.0–1.0, for the power bar.
    pub charge_fraction: f32,
    pub hand_visible:    bool,
    pub status:          &'a str,
}

/// A renderer.  Called once per frame; must not block.
pub trait RenderSink {
    fn present(&mut self, frame: &SceneFrame<'_>);
}
