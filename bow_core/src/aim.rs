//! Aim estimation: hand landmarks → bow position and draw angle.

use std::f32::consts::FRAC_PI_2;

use nalgebra::Point2;

use crate::config::BowConfig;
use crate::landmarks::{HandLandmarkSet, LandmarkError, LandmarkFrame};

/// Where the bow sits and which way it is turned.
///
/// `angle` already carries the mesh rest-pose correction: it is the raw
/// pointer→reference direction minus a quarter turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimState {
    pub position: Point2<f32>,
    pub angle:    f32,
}

impl Default for AimState {
    fn default() -> Self {
        AimState { position: Point2::origin(), angle: 0.0 }
    }
}

/// Turns landmark snapshots into an [`AimState`], holding the last value
/// whenever the tracker loses the hand.
#[derive(Clone, Debug)]
pub struct AimEstimator {
    state:     AimState,
    aim_scale: f32,
}

impl AimEstimator {
    pub fn new(cfg: &BowConfig) -> Self {
        AimEstimator { state: AimState::default(), aim_scale: cfg.aim_scale }
    }

    pub fn state(&self) -> AimState { self.state }

    /// Apply the latest snapshot.  `None` leaves the aim where it was.
    pub fn update(&mut self, hand: Option<&HandLandmarkSet>) -> AimState {
        if let Some(hand) = hand {
            self.state = estimate(hand, self.aim_scale);
        }
        self.state
    }

    /// Apply a tracker frame; only its first hand is consulted.
    pub fn update_frame(&mut self, frame: &LandmarkFrame) -> Result<AimState, LandmarkError> {
        let hand = frame.first_hand()?;
        Ok(self.update(hand.as_ref()))
    }
}

/// Pure mapping from one hand to an aim pose.
pub fn estimate(hand: &HandLandmarkSet, aim_scale: f32) -> AimState {
    let pointer   = hand.pointer();
    let reference = hand.reference();

    // Image y grows downward, world y upward.
    let position = Point2::new(
        (pointer.x - 0.5) * aim_scale,
        -(pointer.y - 0.5) * aim_scale,
    );
    let raw   = (reference.y - pointer.y).atan2(reference.x - pointer.x);
    let angle = raw - FRAC_PI_2;

    AimState { position, angle }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
