//! Hand landmark sources: LeapMotion hardware or mouse/keyboard simulation.
//!
//! The public interface is [`LandmarkFrame`] delivered over a `mpsc` channel.
//! The frame loop neither knows nor cares whether frames came from a real
//! tracker or the simulator, and never waits for one: it applies whatever
//! arrived since the last frame.

use std::f32::consts::FRAC_PI_4;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use bow_core::landmarks::{
    HandLandmarkSet, Landmark, LandmarkFrame, LANDMARK_COUNT, INDEX_TIP, THUMB_TIP, WRIST,
};
use log::{debug, info};

use crate::control::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// HandTrackingOptions
// ════════════════════════════════════════════════════════════════════════════

/// Settings handed to the tracker.  They shape what the tracker reports, not
/// how the bow interprets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandTrackingOptions {
    /// Only the first hand is ever consulted.
    pub max_hands:                usize,
    /// Tracker model fidelity tier (0 = lite, 1 = full).
    pub model_complexity:         u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
    /// How often the tracker samples when nothing changes.
    pub sample_interval:          Duration,
}

impl Default for HandTrackingOptions {
    fn default() -> Self {
        HandTrackingOptions {
            max_hands:                1,
            model_complexity:         1,
            min_detection_confidence: 0.5,
            min_tracking_confidence:  0.5,
            sample_interval:          Duration::from_millis(33),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<L: LandmarkSource>(source: L) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Distance from index fingertip to thumb tip, in normalized image units.
const SIM_REACH:       f32 = 0.08;
/// Radians per arrow-key repeat.
const SIM_ROTATE_STEP: f32 = 0.05;

/// Synthesises a hand from [`SimInput`] events sent by the visualizer.
///
/// The mouse places the index fingertip; Left/Right rotate the thumb around
/// it, which sets the draw direction; holding `H` hides the hand so the
/// tracker reports empty frames.
pub struct SimHandSource {
    rx:      Receiver<SimInput>,
    options: HandTrackingOptions,
    pointer: (f32, f32),
    /// World-space travel direction, radians CCW from +x.
    heading: f32,
    hidden:  bool,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, options: HandTrackingOptions) -> Self {
        SimHandSource {
            rx,
            options,
            pointer: (0.5, 0.5),
            heading: FRAC_PI_4,
            hidden:  false,
        }
    }

    /// Fold one input into the simulated hand.  Returns false on quit.
    fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pointer { x, y }            => self.pointer = (x, y),
            SimInput::KeyDown(SimKey::RotateLeft)  => self.heading += SIM_ROTATE_STEP,
            SimInput::KeyDown(SimKey::RotateRight) => self.heading -= SIM_ROTATE_STEP,
            SimInput::KeyDown(SimKey::HideHand)    => self.hidden = true,
            SimInput::KeyUp(SimKey::HideHand)      => self.hidden = false,
            SimInput::KeyDown(SimKey::Quit)        => return false,
            _ => {}
        }
        true
    }

    /// The frame a tracker would report for the current simulated hand.
    pub fn frame(&self) -> LandmarkFrame {
        if self.hidden || self.options.max_hands == 0 {
            return LandmarkFrame::empty();
        }
        LandmarkFrame::single(&synthetic_hand(self.pointer, self.heading))
    }
}

impl LandmarkSource for SimHandSource {
    fn run(mut self: Box<Self>, tx: Sender<LandmarkFrame>) {
        info!(
            "simulated hand tracker: max_hands={} complexity={} detect>={:.2} track>={:.2}",
            self.options.max_hands,
            self.options.model_complexity,
            self.options.min_detection_confidence,
            self.options.min_tracking_confidence,
        );
        let mut last_sent = Instant::now();
        loop {
            let changed = match self.rx.recv_timeout(self.options.sample_interval) {
                Ok(input) => {
                    if !self.apply(input) { return; }
                    true
                }
                Err(RecvTimeoutError::Timeout)      => false,
                Err(RecvTimeoutError::Disconnected) => return,
            };
            // Coalesce bursts of mouse events to the sampling rate.
            if changed && last_sent.elapsed() < self.options.sample_interval / 2 {
                continue;
            }
            if tx.send(self.frame()).is_err() {
                debug!("simulated hand tracker: frame loop gone, stopping");
                return;
            }
            last_sent = Instant::now();
        }
    }
}

/// Build a plausible 21-point hand whose index fingertip is at `pointer`
/// and whose thumb tip lies `SIM_REACH` away along `heading`.
///
/// Image y grows downward while the aim maps the raw fingertip→thumb angle
/// straight to world space, so the thumb offset is applied unflipped.
pub fn synthetic_hand(pointer: (f32, f32), heading: f32) -> HandLandmarkSet {
    let (px, py) = pointer;
    let (dx, dy) = (heading.cos(), heading.sin());
    let wrist    = Landmark::new(px - dx * 3.0 * SIM_REACH, py - dy * 3.0 * SIM_REACH, 0.0);

    let mut points = [Landmark::default(); LANDMARK_COUNT];
    points[WRIST] = wrist;
    // Four joints per finger, spread along the wrist→fingertip line.
    for finger in 0..5 {
        let spread = (finger as f32 - 2.0) * 0.25 * SIM_REACH;
        for joint in 0..4 {
            let t = (joint + 1) as f32 / 4.0;
            let idx = 1 + finger * 4 + joint;
            points[idx] = Landmark::new(
                wrist.x + (px - wrist.x) * t - dy * spread,
                wrist.y + (py - wrist.y) * t + dx * spread,
                0.0,
            );
        }
    }
    points[INDEX_TIP] = Landmark::new(px, py, 0.0);
    points[THUMB_TIP] = Landmark::new(px + dx * SIM_REACH, py + dy * SIM_REACH, 0.0);

    HandLandmarkSet::from_array(points)
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each tracking frame, the first hand's joints are laid out in the
/// 21-keypoint convention (wrist, then MCP/PIP/DIP/TIP per finger, thumb
/// first) and projected from millimetres above the device onto a
/// normalized image plane with y pointing down.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub options: HandTrackingOptions,
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                log::error!("LeapC connection failed: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        info!(
            "LeapMotion hand tracker: max_hands={} detect>={:.2} track>={:.2}",
            self.options.max_hands,
            self.options.min_detection_confidence,
            self.options.min_tracking_confidence,
        );

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands = frame
                    .hands()
                    .take(self.options.max_hands)
                    .map(|hand| leap_hand_points(&hand))
                    .collect();
                if tx.send(LandmarkFrame { hands }).is_err() {
                    return;
                }
            }
        }
    }
}

/// Interaction box above the device, in millimetres.
#[cfg(feature = "leap")]
const LEAP_X_RANGE:  f32 = 400.0;
#[cfg(feature = "leap")]
const LEAP_Y_FLOOR:  f32 = 100.0;
#[cfg(feature = "leap")]
const LEAP_Y_RANGE:  f32 = 400.0;

#[cfg(feature = "leap")]
fn leap_to_image(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(
        x / LEAP_X_RANGE + 0.5,
        1.0 - (y - LEAP_Y_FLOOR) / LEAP_Y_RANGE,
        z / LEAP_X_RANGE,
    )
}

#[cfg(feature = "leap")]
fn leap_hand_points(hand: &leaprs::Hand) -> Vec<Landmark> {
    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    let digits: Vec<_> = hand.digits().collect();

    // Wrist ≈ base of the middle metacarpal.
    if let Some(middle) = digits.get(2) {
        let w = middle.metacarpal().prev_joint();
        points.push(leap_to_image(w.x, w.y, w.z));
    }
    for digit in &digits {
        for joint in [
            digit.metacarpal().next_joint(),
            digit.proximal().next_joint(),
            digit.intermediate().next_joint(),
            digit.distal().next_joint(),
        ] {
            points.push(leap_to_image(joint.x, joint.y, joint.z));
        }
    }
    // A short list is passed through as-is; the frame loop rejects it.
    points
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bow_core::{AimEstimator, BowConfig};

    #[test]
    fn synthetic_hand_puts_tips_where_asked() {
        let hand = synthetic_hand((0.3, 0.6), 0.0);
        assert_eq!(hand.pointer(), Landmark::new(0.3, 0.6, 0.0));
        assert_abs_diff_eq!(hand.reference().x, 0.3 + SIM_REACH, epsilon = 1e-6);
        assert_abs_diff_eq!(hand.reference().y, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn synthetic_heading_becomes_travel_direction() {
        let heading = 1.1;
        let hand = synthetic_hand((0.5, 0.5), heading);
        let mut est = AimEstimator::new(&BowConfig::default());
        let aim = est.update(Some(&hand));
        let dir = bow_core::travel_direction(aim.angle);
        assert_abs_diff_eq!(dir.x, heading.cos(), epsilon = 1e-5);
        assert_abs_diff_eq!(dir.y, heading.sin(), epsilon = 1e-5);
    }

    #[test]
    fn sim_source_follows_pointer_and_rotation() {
        let (_tx, rx) = mpsc::channel();
        let mut src = SimHandSource::new(rx, HandTrackingOptions::default());
        src.apply(SimInput::Pointer { x: 0.2, y: 0.8 });
        src.apply(SimInput::KeyDown(SimKey::RotateLeft));
        let hand = src.frame().first_hand().unwrap().unwrap();
        assert_eq!(hand.pointer().x, 0.2);
        assert_abs_diff_eq!(src.heading, FRAC_PI_4 + SIM_ROTATE_STEP);
    }

    #[test]
    fn hidden_hand_gives_empty_frames() {
        let (_tx, rx) = mpsc::channel();
        let mut src = SimHandSource::new(rx, HandTrackingOptions::default());
        src.apply(SimInput::KeyDown(SimKey::HideHand));
        assert_eq!(src.frame(), LandmarkFrame::empty());
        src.apply(SimInput::KeyUp(SimKey::HideHand));
        assert_eq!(src.frame().hands.len(), 1);
    }

    #[test]
    fn spawned_sim_source_samples_without_input() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let opts = HandTrackingOptions {
            sample_interval: Duration::from_millis(5),
            ..HandTrackingOptions::default()
        };
        let frames = spawn_landmark_source(SimHandSource::new(sim_rx, opts));
        let first = frames.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.hands.len(), 1);
        // Dropping the input side shuts the source down.
        drop(sim_tx);
        while frames.recv_timeout(Duration::from_secs(2)).is_ok() {}
    }
}
