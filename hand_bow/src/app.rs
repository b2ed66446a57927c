//! Top-level frame loop.
//!
//! `BowApp` owns the aim, the charge controller and the live arrows.  It
//! applies landmark frames and control events as they arrive and, once per
//! frame, steps the flight simulation and hands a [`SceneFrame`] to the
//! renderer.  All state lives on the main thread; the sources only send.

use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use bow_core::{
    AimEstimator, BowConfig, ChargeController, LandmarkError, LandmarkFrame, LaunchFactory,
    ProjectileId, ProjectileSimulator,
};
use log::{debug, info, warn};

use crate::control::{
    spawn_charge_ticker, spawn_trigger_source, ControlEvent, SimInput, SimTriggerSource,
};
use crate::scene::{Pose, RenderSink, SceneFrame};
use crate::tracking::{spawn_landmark_source, HandTrackingOptions};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppConfig {
    pub bow:           BowConfig,
    pub tracking:      HandTrackingOptions,
    pub window_width:  usize,
    pub window_height: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bow:           BowConfig::default(),
            tracking:      HandTrackingOptions::default(),
            window_width:  1024,
            window_height: 640,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum AppError {
    /// The visualizer window could not be opened.
    Window(String),
    /// The hand tracker broke the 21-keypoint contract.
    Landmark(LandmarkError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Window(e)   => write!(f, "cannot open window: {}", e),
            AppError::Landmark(e) => write!(f, "hand tracker contract violated: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Landmark(e) => Some(e),
            AppError::Window(_)   => None,
        }
    }
}

impl From<LandmarkError> for AppError {
    fn from(e: LandmarkError) -> Self { AppError::Landmark(e) }
}

// ════════════════════════════════════════════════════════════════════════════
// BowApp
// ════════════════════════════════════════════════════════════════════════════

pub struct BowApp {
    aim:      AimEstimator,
    charge:   ChargeController,
    launcher: LaunchFactory,
    arrows:   ProjectileSimulator,

    /// Whether the most recent landmark frame contained a hand.
    hand_visible: bool,
    frames:       u64,
    launched:     u64,

    pub status: String,
}

impl BowApp {
    pub fn new(cfg: &BowConfig) -> Self {
        BowApp {
            aim:          AimEstimator::new(cfg),
            charge:       ChargeController::new(cfg),
            launcher:     LaunchFactory::new(),
            arrows:       ProjectileSimulator::new(cfg),
            hand_visible: false,
            frames:       0,
            launched:     0,
            status:       "Ready: show your hand, hold Space to draw".to_string(),
        }
    }

    // ── event handlers ───────────────────────────────────────────────────

    /// Apply one tracker frame.  An empty frame keeps the last aim.
    pub fn handle_landmarks(&mut self, frame: &LandmarkFrame) -> Result<(), AppError> {
        let was_visible = self.hand_visible;
        self.aim.update_frame(frame)?;
        self.hand_visible = !frame.hands.is_empty();
        if was_visible != self.hand_visible {
            debug!("hand {}", if self.hand_visible { "found" } else { "lost, holding aim" });
        }
        Ok(())
    }

    /// Apply one trigger or clock event.  Returns the id of a launched arrow.
    pub fn handle_control(&mut self, event: ControlEvent) -> Option<ProjectileId> {
        match event {
            ControlEvent::Press => {
                if self.charge.press() {
                    self.status = "Drawing…".to_string();
                }
                None
            }
            ControlEvent::Tick => {
                if self.charge.tick() {
                    self.status = format!("Drawing…  power {:.1}", self.charge.power());
                }
                None
            }
            ControlEvent::Release => {
                let request = self.charge.release()?;
                let aim     = self.aim.state();
                let arrow   = self.launcher.create(&aim, request.power);
                let id      = self.arrows.spawn(arrow);
                self.launched += 1;
                debug!(
                    "loosed arrow #{} power={:.2} from ({:.2}, {:.2}) angle={:.3}",
                    self.launched, request.power, aim.position.x, aim.position.y, aim.angle
                );
                self.status = format!(
                    "Loosed arrow #{}  power {:.1}  ({} in flight)",
                    self.launched, request.power, self.arrows.len()
                );
                Some(id)
            }
            ControlEvent::Quit => None, // handled in run loop
        }
    }

    // ── per-frame ────────────────────────────────────────────────────────

    /// Step the flight simulation, then present the frame.
    pub fn frame(&mut self, sink: &mut dyn RenderSink) {
        self.arrows.step();
        self.frames += 1;
        let scene = self.scene();
        sink.present(&scene);
    }

    /// Everything the renderer needs for the current state.
    pub fn scene(&self) -> SceneFrame<'_> {
        let bow = Pose::from(self.aim.state());
        SceneFrame {
            bow,
            indicator:       bow,
            projectiles:     self.arrows.snapshot().map(Pose::from).collect(),
            charge:          self.charge.state(),
            charge_fraction: self.charge.fraction(),
            hand_visible:    self.hand_visible,
            status:          &self.status,
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn aim(&self)      -> &AimEstimator        { &self.aim }
    pub fn charge(&self)   -> &ChargeController    { &self.charge }
    pub fn arrows(&self)   -> &ProjectileSimulator { &self.arrows }
    pub fn frames(&self)   -> u64                  { self.frames }
    pub fn launched(&self) -> u64                  { self.launched }
}

// ════════════════════════════════════════════════════════════════════════════
// Channel draining
// ════════════════════════════════════════════════════════════════════════════

/// Apply every landmark frame delivered since the last call.
/// Returns false once the tracker has gone away.
pub fn drain_landmarks(
    app: &mut BowApp,
    rx:  &Receiver<LandmarkFrame>,
) -> Result<bool, AppError> {
    loop {
        match rx.try_recv() {
            Ok(frame)                       => app.handle_landmarks(&frame)?,
            Err(TryRecvError::Empty)        => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        }
    }
}

/// Apply every queued control event.  Returns false on quit or when every
/// control producer has stopped.
pub fn drain_controls(app: &mut BowApp, rx: &Receiver<ControlEvent>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(ControlEvent::Quit)          => return false,
            Ok(event)                       => { app.handle_control(event); }
            Err(TryRecvError::Empty)        => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It spawns the hand
/// tracker (simulation by default, hardware with `--features leap`), the
/// Space-key trigger and the charge clock, then drives the frame loop at
/// ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Control channel: trigger + charge clock ───────────────────────────
    let (control_tx, control_rx) = mpsc::channel::<ControlEvent>();
    let (trigger_tx, trigger_rx) = mpsc::channel::<SimInput>();
    spawn_trigger_source(SimTriggerSource { rx: trigger_rx }, control_tx.clone());
    spawn_charge_ticker(cfg.bow.charge_interval, control_tx);

    // ── Hand tracker ──────────────────────────────────────────────────────
    #[cfg(feature = "leap")]
    let (landmark_rx, hand_tx) = {
        use crate::tracking::LeapHandSource;
        (spawn_landmark_source(LeapHandSource { options: cfg.tracking }), None)
    };
    #[cfg(not(feature = "leap"))]
    let (landmark_rx, hand_tx) = {
        use crate::tracking::SimHandSource;
        let (tx, rx) = mpsc::channel::<SimInput>();
        (spawn_landmark_source(SimHandSource::new(rx, cfg.tracking)), Some(tx))
    };

    // ── Visualizer (owns the window and the sim input senders) ────────────
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, trigger_tx, hand_tx)
        .map_err(AppError::Window)?;

    let mut app = BowApp::new(&cfg.bow);
    let mut tracker_alive = true;
    info!(
        "frame loop started: power cap {:.1}, +{:.2} every {} ms, gravity {:.3}/frame, boundary ±{}",
        cfg.bow.max_power,
        cfg.bow.charge_step,
        cfg.bow.charge_interval.as_millis(),
        cfg.bow.gravity_step,
        cfg.bow.boundary,
    );

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → SimInput for the trigger and sim hand
        if !vis.poll_input() { break; }

        // 2. Latest aim from whatever the tracker delivered
        if tracker_alive && !drain_landmarks(&mut app, &landmark_rx)? {
            warn!("hand tracker stopped; holding the last aim");
            tracker_alive = false;
        }

        // 3. Charge clock and trigger, in arrival order
        if !drain_controls(&mut app, &control_rx) { break; }

        // 4. Flight + render
        app.frame(&mut vis);
    }

    info!("frame loop ended after {} frames, {} arrows loosed", app.frames(), app.launched());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
