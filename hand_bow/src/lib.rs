//! # hand_bow
//!
//! Interactive front end for [`bow_core`]: a hand tracker aims the bow, the
//! Space key draws and looses it, and arrows fly across a software-rendered
//! window.
//!
//! ## Input → Action mapping
//!
//! | Input | Source | Action |
//! |---|---|---|
//! | Index fingertip position | Hand tracker | Moves the bow |
//! | Fingertip → thumb tip direction | Hand tracker | Turns the bow / sets travel direction |
//! | No hand in view | Hand tracker | Bow holds its last pose |
//! | Space down | Trigger | Start drawing; power grows 0.1 per 100 ms up to 2.0 |
//! | Space up | Trigger | Loose an arrow with the accumulated power |
//! | `Q` / `Escape` | Keyboard | Quit |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse stands in for the fingertip.
//! * `leap` — **Hardware mode**: hand landmarks from a LeapMotion via LeapC.
//!
//! ### Simulation controls
//!
//! | Key | Effect |
//! |---|---|
//! | Mouse | Index fingertip position |
//! | `←` / `→` | Rotate the thumb (aim direction) |
//! | `H` (hold) | Hide the hand from the tracker |
//! | `Space` | Draw / release |
//! | `Q` | Quit |

pub mod tracking;
pub mod control;
pub mod camera;
pub mod scene;
pub mod visualizer;
pub mod app;
