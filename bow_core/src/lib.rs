//! # bow_core
//!
//! The simulation half of the hand-tracked bow: everything between "a hand
//! tracker saw these keypoints" and "these arrows are in the air".
//!
//! | Module | Role |
//! |---|---|
//! | [`landmarks`] | 21-point hand keypoint sets and tracker frames |
//! | [`aim`] | index fingertip + thumb tip → bow position and angle |
//! | [`charge`] | Idle/Charging state machine, power accumulated per tick |
//! | [`launch`] | aim snapshot + released power → new arrow |
//! | [`projectile`] | per-frame flight under gravity, boundary culling |
//! | [`config`] | every tunable constant |
//!
//! No windowing, threads or devices here; the `hand_bow` crate wires these
//! pieces to a tracker, a keyboard and a framebuffer.
//!
//! ## Quick start
//!
//! ```rust
//! use bow_core::{AimEstimator, BowConfig, ChargeController, LaunchFactory, ProjectileSimulator};
//!
//! let cfg = BowConfig::default();
//! let aim = AimEstimator::new(&cfg);
//! let mut charge = ChargeController::new(&cfg);
//! let mut sim = ProjectileSimulator::new(&cfg);
//!
//! charge.press();
//! for _ in 0..5 { charge.tick(); }
//! if let Some(req) = charge.release() {
//!     sim.spawn(LaunchFactory::new().create(&aim.state(), req.power));
//! }
//! sim.step();
//! assert_eq!(sim.len(), 1);
//! ```

pub mod config;
pub mod landmarks;
pub mod aim;
pub mod charge;
pub mod launch;
pub mod projectile;

pub use aim::{AimEstimator, AimState};
pub use charge::{ChargeController, ChargePhase, ChargeState, LaunchRequest};
pub use config::BowConfig;
pub use landmarks::{HandLandmarkSet, Landmark, LandmarkError, LandmarkFrame};
pub use launch::{travel_direction, LaunchFactory};
pub use projectile::{Projectile, ProjectileId, ProjectileSimulator, StepReport};
