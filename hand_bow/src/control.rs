//! Draw/release input and the charge clock.
//!
//! Two producers share one [`ControlEvent`] channel: the trigger source
//! (Space key) and the charge ticker (fixed-interval timer).  Sharing the
//! channel keeps press → tick → release in real arrival order when the
//! frame loop drains it.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::debug;

// ════════════════════════════════════════════════════════════════════════════
// ControlEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// Trigger pressed: start drawing the bow.
    Press,
    /// Trigger released: loose the arrow.
    Release,
    /// One charge-clock interval elapsed.
    Tick,
    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Raw window input (shared by the simulated trigger and simulated hand)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
    /// Mouse position, normalized to the window (x right, y down, 0–1).
    Pointer { x: f32, y: f32 },
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    Draw,        // Space
    RotateLeft,  // Left arrow
    RotateRight, // Right arrow
    HideHand,    // H
    Quit,        // Q / Escape
}

// ════════════════════════════════════════════════════════════════════════════
// TriggerSource
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver press/release [`ControlEvent`]s.
pub trait TriggerSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<ControlEvent>);
}

/// Spawn a trigger source on its own thread, sending into `tx`.
pub fn spawn_trigger_source<T: TriggerSource>(source: T, tx: Sender<ControlEvent>) {
    thread::spawn(move || Box::new(source).run(tx));
}

/// Trigger driven by the Space key of the visualizer window.
///
/// Auto-repeat keydowns while Space is held are swallowed here, so the
/// controller only ever sees one press per hold.
pub struct SimTriggerSource {
    pub rx: Receiver<SimInput>,
}

impl TriggerSource for SimTriggerSource {
    fn run(self: Box<Self>, tx: Sender<ControlEvent>) {
        let mut held = false;
        for input in self.rx {
            let event = match input {
                SimInput::KeyDown(SimKey::Draw) if !held => {
                    held = true;
                    ControlEvent::Press
                }
                SimInput::KeyUp(SimKey::Draw) if held => {
                    held = false;
                    ControlEvent::Release
                }
                SimInput::KeyDown(SimKey::Quit) => {
                    let _ = tx.send(ControlEvent::Quit);
                    return;
                }
                _ => continue,
            };
            if tx.send(event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Charge ticker
// ════════════════════════════════════════════════════════════════════════════

/// Send [`ControlEvent::Tick`] every `interval` until the receiver is gone.
///
/// The clock runs whether or not the bow is drawn; ticks while idle are
/// ignored by the charge controller.
pub fn spawn_charge_ticker(interval: Duration, tx: Sender<ControlEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if tx.send(ControlEvent::Tick).is_err() {
            debug!("charge ticker: frame loop gone, stopping");
            return;
        }
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn run_trigger(inputs: Vec<SimInput>) -> Vec<ControlEvent> {
        let (sim_tx, sim_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        for i in inputs { sim_tx.send(i).unwrap(); }
        drop(sim_tx);
        Box::new(SimTriggerSource { rx: sim_rx }).run(tx);
        rx.try_iter().collect()
    }

    #[test]
    fn space_maps_to_press_and_release() {
        let events = run_trigger(vec![
            SimInput::KeyDown(SimKey::Draw),
            SimInput::KeyUp(SimKey::Draw),
        ]);
        assert_eq!(events, vec![ControlEvent::Press, ControlEvent::Release]);
    }

    #[test]
    fn repeated_press_while_held_is_ignored() {
        let events = run_trigger(vec![
            SimInput::KeyDown(SimKey::Draw),
            SimInput::KeyDown(SimKey::Draw),
            SimInput::KeyDown(SimKey::Draw),
            SimInput::KeyUp(SimKey::Draw),
        ]);
        assert_eq!(events, vec![ControlEvent::Press, ControlEvent::Release]);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let events = run_trigger(vec![SimInput::KeyUp(SimKey::Draw)]);
        assert!(events.is_empty());
    }

    #[test]
    fn quit_ends_the_source() {
        let events = run_trigger(vec![
            SimInput::KeyDown(SimKey::Quit),
            SimInput::KeyDown(SimKey::Draw),
        ]);
        assert_eq!(events, vec![ControlEvent::Quit]);
    }

    #[test]
    fn non_trigger_keys_are_ignored() {
        let events = run_trigger(vec![
            SimInput::Pointer { x: 0.1, y: 0.1 },
            SimInput::KeyDown(SimKey::RotateLeft),
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn ticker_delivers_ticks_and_stops_when_dropped() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_charge_ticker(Duration::from_millis(1), tx);
        for _ in 0..3 {
            assert_eq!(
                rx.recv_timeout(Duration::from_secs(2)),
                Ok(ControlEvent::Tick)
            );
        }
        drop(rx);
        handle.join().unwrap();
    }
}
