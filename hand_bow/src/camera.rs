//! Perspective camera looking straight at the z = 0 play plane.
//!
//! Everything in the game lives on that plane, so the full projection
//! collapses to a uniform scale around the window centre.  The scale only
//! depends on the vertical field of view; the aspect ratio decides how much
//! of the plane is visible sideways, which is why it has to follow window
//! resizes.

use nalgebra::Point2;

pub const DEFAULT_FOV_Y_DEG: f32 = 75.0;
pub const DEFAULT_DISTANCE:  f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    fov_y:    f32,
    /// Eye distance from the play plane.
    distance: f32,
    width:    usize,
    height:   usize,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        Camera {
            fov_y:    DEFAULT_FOV_Y_DEG.to_radians(),
            distance: DEFAULT_DISTANCE,
            width:    width.max(1),
            height:   height.max(1),
        }
    }

    /// Track a resized viewport.  Returns true if the size changed.
    pub fn set_viewport(&mut self, width: usize, height: usize) -> bool {
        let (w, h) = (width.max(1), height.max(1));
        if (w, h) == (self.width, self.height) {
            return false;
        }
        self.width  = w;
        self.height = h;
        true
    }

    pub fn viewport(&self) -> (usize, usize) { (self.width, self.height) }

    pub fn aspect(&self) -> f32 { self.width as f32 / self.height as f32 }

    /// Half the visible extent of the play plane, (horizontal, vertical).
    pub fn half_extents(&self) -> (f32, f32) {
        let half_h = self.distance * (self.fov_y * 0.5).tan();
        (half_h * self.aspect(), half_h)
    }

    pub fn pixels_per_unit(&self) -> f32 {
        let (_, half_h) = self.half_extents();
        self.height as f32 * 0.5 / half_h
    }

    /// World point → pixel coordinates (x right, y down).
    pub fn world_to_screen(&self, p: Point2<f32>) -> (f32, f32) {
        let ppu = self.pixels_per_unit();
        (
            self.width  as f32 * 0.5 + p.x * ppu,
            self.height as f32 * 0.5 - p.y * ppu,
        )
    }

    pub fn is_visible(&self, p: Point2<f32>) -> bool {
        let (hw, hh) = self.half_extents();
        p.x.abs() <= hw && p.y.abs() <= hh
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn origin_is_window_centre() {
        let cam = Camera::new(800, 600);
        assert_eq!(cam.world_to_screen(Point2::origin()), (400.0, 300.0));
    }

    #[test]
    fn up_is_screen_up() {
        let cam = Camera::new(800, 600);
        let (_, y) = cam.world_to_screen(Point2::new(0.0, 1.0));
        assert!(y < 300.0);
    }

    #[test]
    fn visible_height_matches_fov() {
        let cam = Camera::new(800, 600);
        let (_, hh) = cam.half_extents();
        assert_abs_diff_eq!(hh, 5.0 * 37.5_f32.to_radians().tan(), epsilon = 1e-5);
        let (_, top) = cam.world_to_screen(Point2::new(0.0, hh));
        assert_abs_diff_eq!(top, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = Camera::new(800, 600);
        assert!(cam.set_viewport(1200, 600));
        assert_abs_diff_eq!(cam.aspect(), 2.0);
        let (hw, hh) = cam.half_extents();
        assert_abs_diff_eq!(hw, 2.0 * hh);
        assert!(!cam.set_viewport(1200, 600));
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let mut cam = Camera::new(0, 0);
        cam.set_viewport(0, 0);
        assert_eq!(cam.viewport(), (1, 1));
        assert!(cam.aspect().is_finite());
    }

    #[test]
    fn play_boundary_is_off_screen() {
        let cam = Camera::new(1024, 640);
        assert!(!cam.is_visible(Point2::new(20.0, 0.0)));
        assert!(cam.is_visible(Point2::new(1.0, 1.0)));
    }
}
