//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │                    ╭──╮      ──▶ arrows in flight            │
//! │                    │  ─────▶  bow + nocked arrow             │
//! │                    ╰──╯                                      │
//! │                                                              │
//! │  [power bar ███████░░░░]                                     │
//! │  status bar                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window is resizable; the camera follows the new aspect ratio so the
//! hand → world mapping keeps its scale.

use std::f32::consts::PI;
use std::sync::mpsc::Sender;

use bow_core::travel_direction;
use log::debug;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use nalgebra::{Point2, Rotation2, Vector2};

use crate::camera::Camera;
use crate::control::{SimInput, SimKey};
use crate::scene::{Pose, RenderSink, SceneFrame};

// ════════════════════════════════════════════════════════════════════════════
// Layout and mesh constants
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:        u32 = 0xFF1A1A2E;
const TEXT_BG:         u32 = 0xFF0F3460;
const BOW_COLOR:       u32 = 0xFF8B4513;  // saddle brown
const STRING_COLOR:    u32 = 0xFFDDDDDD;
const ARROW_COLOR:     u32 = 0xFF4A4A4A;
const FLIGHT_COLOR:    u32 = 0xFFB0B0B0;
const HEAD_COLOR:      u32 = 0xFFFFD700;
const BAR_EMPTY:       u32 = 0xFF333344;
const BAR_LOW:         u32 = 0xFF2ECC71;
const BAR_HIGH:        u32 = 0xFFE74C3C;

const STATUS_H:        usize = 36;
const BAR_W:           usize = 220;
const BAR_H:           usize = 12;

/// Half-torus bow: radius and tube radius in world units.
const BOW_RADIUS:      f32 = 1.0;
const BOW_TUBE:        f32 = 0.1;
const BOW_SEGMENTS:    usize = 48;
/// Arrow shaft: full length and radius in world units.
const ARROW_LENGTH:    f32 = 2.0;
const ARROW_RADIUS:    f32 = 0.05;
/// How far the string nock travels back at full draw.
const DRAW_DEPTH:      f32 = 0.6;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    buf:          Vec<u32>,
    camera:       Camera,
    trigger_tx:   Sender<SimInput>,
    /// `None` when a hardware tracker supplies the hand.
    hand_tx:      Option<Sender<SimInput>>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(
        width:      usize,
        height:     usize,
        trigger_tx: Sender<SimInput>,
        hand_tx:    Option<Sender<SimInput>>,
    ) -> Result<Self, String> {
        let mut window = Window::new(
            "Hand Bow — hold Space to draw, release to shoot",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let camera = Camera::new(width, height);
        let (w, h) = camera.viewport();
        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; w * h],
            camera,
            trigger_tx,
            hand_tx,
            last_pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse and forward them as [`SimInput`] events.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.trigger_tx.send(SimInput::KeyDown(SimKey::Quit));
            self.send_hand(SimInput::KeyDown(SimKey::Quit));
            return false;
        }

        // Trigger: auto-repeat is left on; the trigger source drops repeats.
        if self.window.is_key_pressed(Key::Space, KeyRepeat::Yes) {
            let _ = self.trigger_tx.send(SimInput::KeyDown(SimKey::Draw));
        }
        if self.window.is_key_released(Key::Space) {
            let _ = self.trigger_tx.send(SimInput::KeyUp(SimKey::Draw));
        }

        if self.hand_tx.is_none() { return true; }

        if self.window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            self.send_hand(SimInput::KeyDown(SimKey::RotateLeft));
        }
        if self.window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            self.send_hand(SimInput::KeyDown(SimKey::RotateRight));
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            self.send_hand(SimInput::KeyDown(SimKey::HideHand));
        }
        if self.window.is_key_released(Key::H) {
            self.send_hand(SimInput::KeyUp(SimKey::HideHand));
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let (w, h) = self.camera.viewport();
            let pointer = (mx / w as f32, my / h as f32);
            if self.last_pointer != Some(pointer) {
                self.last_pointer = Some(pointer);
                self.send_hand(SimInput::Pointer { x: pointer.0, y: pointer.1 });
            }
        }

        true
    }

    fn send_hand(&self, input: SimInput) {
        if let Some(tx) = &self.hand_tx {
            let _ = tx.send(input);
        }
    }

    /// Reallocate the framebuffer and re-aim the camera after a resize.
    fn track_window_size(&mut self) {
        let (w, h) = self.window.get_size();
        if self.camera.set_viewport(w, h) {
            let (w, h) = self.camera.viewport();
            self.buf = vec![BG_COLOR; w * h];
            debug!("viewport resized to {}×{} (aspect {:.3})", w, h, self.camera.aspect());
        }
    }

    // ── Bow ───────────────────────────────────────────────────────────────

    fn draw_bow(&mut self, bow: Pose, draw: f32) {
        let rot  = Rotation2::new(bow.orientation);
        let ppu  = self.camera.pixels_per_unit();
        let tube = (BOW_TUBE * ppu).max(1.0);

        // Half torus, bulging toward the travel direction.
        let at = |theta: f32| bow.position + rot * Vector2::new(theta.cos(), theta.sin()) * BOW_RADIUS;
        let mut prev = self.camera.world_to_screen(at(0.0));
        for i in 1..=BOW_SEGMENTS {
            let next = self.camera.world_to_screen(at(PI * i as f32 / BOW_SEGMENTS as f32));
            self.draw_segment(prev, next, tube, BOW_COLOR);
            prev = next;
        }

        // String from tip to tip through the nock, pulled back while drawing.
        let nock = bow.position + rot * Vector2::new(0.0, -DRAW_DEPTH * draw);
        let nock = self.camera.world_to_screen(nock);
        let a    = self.camera.world_to_screen(at(0.0));
        let b    = self.camera.world_to_screen(at(PI));
        self.draw_segment(a, nock, 1.0, STRING_COLOR);
        self.draw_segment(nock, b, 1.0, STRING_COLOR);
    }

    // ── Arrows ────────────────────────────────────────────────────────────

    fn draw_arrow(&mut self, pose: Pose, color: u32) {
        let dir  = travel_direction(pose.orientation) * (ARROW_LENGTH * 0.5);
        let tail = self.camera.world_to_screen(pose.position - dir);
        let tip  = self.camera.world_to_screen(pose.position + dir);
        let ppu  = self.camera.pixels_per_unit();
        self.draw_segment(tail, tip, (ARROW_RADIUS * ppu).max(1.0), color);
        self.stamp(tip.0, tip.1, (ARROW_RADIUS * 2.0 * ppu).max(2.0), HEAD_COLOR);
    }

    // ── Power bar and status ──────────────────────────────────────────────

    fn draw_power_bar(&mut self, fraction: f32, charging: bool) {
        let (_, h) = self.camera.viewport();
        let y = h.saturating_sub(STATUS_H + BAR_H + 8);
        self.fill_rect(10, y, BAR_W, BAR_H, BAR_EMPTY);
        let filled = (BAR_W as f32 * fraction.clamp(0.0, 1.0)) as usize;
        let color  = blend(BAR_LOW, BAR_HIGH, fraction);
        self.fill_rect(10, y, filled, BAR_H, color);
        if charging {
            self.draw_border(10, y, BAR_W, BAR_H, HEAD_COLOR);
        }
    }

    fn draw_status(&mut self, status: &str, hand_visible: bool) {
        let (w, h) = self.camera.viewport();
        let y = h.saturating_sub(STATUS_H);
        self.fill_rect(0, y, w, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, y + 8, 0xFFEEEEEE);
        let legend = if self.hand_tx.is_some() {
            "mouse=aim  left/right=turn  space=draw  h=hide hand  q=quit"
        } else {
            "space=draw  q=quit"
        };
        self.draw_label(legend, 10, y + 22, 0xFF888888);
        if !hand_visible {
            self.draw_label("no hand", w.saturating_sub(40), 8, 0xFFFF8866);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let (ww, wh) = self.camera.viewport();
        for row in y..(y + h).min(wh) {
            for col in x..(x + w).min(ww) {
                self.buf[row * ww + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..x + w {
            self.set_pixel(col as isize, y as isize, color);
            self.set_pixel(col as isize, (y + h - 1) as isize, color);
        }
        for row in y..y + h {
            self.set_pixel(x as isize, row as isize, color);
            self.set_pixel((x + w - 1) as isize, row as isize, color);
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        let (w, h) = self.camera.viewport();
        if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
            self.buf[y as usize * w + x as usize] = color;
        }
    }

    /// Filled disc of radius `r` pixels.
    fn stamp(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let ri = r.ceil() as isize;
        let (cxi, cyi) = (cx.round() as isize, cy.round() as isize);
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if (dx * dx + dy * dy) as f32 <= r * r {
                    self.set_pixel(cxi + dx, cyi + dy, color);
                }
            }
        }
    }

    /// Thick line by stamping discs every pixel along the segment.
    fn draw_segment(&mut self, a: (f32, f32), b: (f32, f32), radius: f32, color: u32) {
        let len   = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        // Fully off-screen segments of flying arrows are common; skip them.
        let (w, h) = self.camera.viewport();
        let margin = radius + 1.0;
        if (a.0 < -margin && b.0 < -margin) || (a.1 < -margin && b.1 < -margin)
            || (a.0 > w as f32 + margin && b.0 > w as f32 + margin)
            || (a.1 > h as f32 + margin && b.1 > h as f32 + margin)
        {
            return;
        }
        let steps = len.ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t, radius, color);
        }
    }

    /// Minimal bitmap font, 3×5 characters for labels.
    /// Each character is encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let (w, _) = self.camera.viewport();
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > w { break; }
        }
    }
}

impl RenderSink for Visualizer {
    fn present(&mut self, frame: &SceneFrame<'_>) {
        self.track_window_size();
        self.buf.fill(BG_COLOR);

        // Arrows in flight first, so the bow sits on top of fresh launches.
        for pose in &frame.projectiles {
            if near_view(&self.camera, pose.position) {
                self.draw_arrow(*pose, FLIGHT_COLOR);
            }
        }

        self.draw_bow(frame.bow, frame.charge_fraction);
        self.draw_arrow(frame.indicator, ARROW_COLOR);

        self.draw_power_bar(frame.charge_fraction, frame.charge.is_charging);
        self.draw_status(frame.status, frame.hand_visible);

        let (w, h) = self.camera.viewport();
        self.window.update_with_buffer(&self.buf, w, h).ok();
    }
}

/// Arrows centred just outside the view can still poke into it.
fn near_view(camera: &Camera, p: Point2<f32>) -> bool {
    let (hw, hh) = camera.half_extents();
    p.x.abs() <= hw + ARROW_LENGTH && p.y.abs() <= hh + ARROW_LENGTH
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Linear blend of two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ch = |c: u32, shift: u32| (c >> shift) & 0xFF;
    0xFF000000
        | (lerp(ch(a, 16), ch(b, 16)) << 16)
        | (lerp(ch(a, 8),  ch(b, 8))  << 8)
        |  lerp(ch(a, 0),  ch(b, 0))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
