//! Hand landmark data as delivered by a hand tracker.
//!
//! Points follow the 21-keypoint hand convention (wrist, then four joints per
//! finger from thumb to pinky) in normalized image space: x grows right,
//! y grows *down*, both nominally in [0, 1].

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_TIP:  usize = 20;

/// The aim follows the index fingertip.
pub const POINTER:   usize = INDEX_TIP;
/// The draw direction points from the fingertip toward the thumb tip.
pub const REFERENCE: usize = THUMB_TIP;

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandLandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// One tracked keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

/// A complete, validated set of 21 keypoints for one hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarkSet {
    /// Build a set from exactly [`LANDMARK_COUNT`] points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                found:    points.len(),
            })?;
        Ok(HandLandmarkSet { points })
    }

    pub fn from_array(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarkSet { points }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn pointer(&self)   -> Landmark { self.points[POINTER] }
    pub fn reference(&self) -> Landmark { self.points[REFERENCE] }

    pub fn points(&self) -> &[Landmark] { &self.points }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame — one delivery from a tracker
// ════════════════════════════════════════════════════════════════════════════

/// Everything a tracker reported for one camera frame.
///
/// Hands are kept raw until consumed; [`LandmarkFrame::first_hand`]
/// validates the point count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub hands: Vec<Vec<Landmark>>,
}

impl LandmarkFrame {
    /// A frame in which no hand was detected.
    pub fn empty() -> Self {
        LandmarkFrame { hands: Vec::new() }
    }

    pub fn single(hand: &HandLandmarkSet) -> Self {
        LandmarkFrame { hands: vec![hand.points().to_vec()] }
    }

    /// The first detected hand, if any.  Additional hands are ignored.
    pub fn first_hand(&self) -> Result<Option<HandLandmarkSet>, LandmarkError> {
        self.hands
            .first()
            .map(|points| HandLandmarkSet::from_slice(points))
            .transpose()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    /// The tracker delivered a hand with the wrong number of keypoints.
    WrongCount { expected: usize, found: usize },
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::WrongCount { expected, found } => write!(
                f,
                "hand landmark set has {} points, expected {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with(pointer: Landmark, reference: Landmark) -> Vec<Landmark> {
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[POINTER]   = pointer;
        pts[REFERENCE] = reference;
        pts
    }

    #[test]
    fn from_slice_accepts_21_points() {
        let pts = hand_with(Landmark::new(0.2, 0.3, 0.0), Landmark::new(0.4, 0.1, 0.0));
        let set = HandLandmarkSet::from_slice(&pts).unwrap();
        assert_eq!(set.pointer(),   Landmark::new(0.2, 0.3, 0.0));
        assert_eq!(set.reference(), Landmark::new(0.4, 0.1, 0.0));
    }

    #[test]
    fn from_slice_rejects_wrong_count() {
        let err = HandLandmarkSet::from_slice(&[Landmark::default(); 20]).unwrap_err();
        assert_eq!(err, LandmarkError::WrongCount { expected: 21, found: 20 });
        assert!(err.to_string().contains("20 points"));
    }

    #[test]
    fn empty_frame_has_no_hand() {
        assert_eq!(LandmarkFrame::empty().first_hand(), Ok(None));
    }

    #[test]
    fn only_first_hand_is_consulted() {
        let first  = hand_with(Landmark::new(0.1, 0.1, 0.0), Landmark::default());
        // A malformed second hand must not matter.
        let second = vec![Landmark::default(); 3];
        let frame  = LandmarkFrame { hands: vec![first, second] };
        let hand   = frame.first_hand().unwrap().unwrap();
        assert_eq!(hand.pointer().x, 0.1);
    }

    #[test]
    fn malformed_first_hand_is_an_error() {
        let frame = LandmarkFrame { hands: vec![vec![Landmark::default(); 5]] };
        assert!(frame.first_hand().is_err());
    }
}
