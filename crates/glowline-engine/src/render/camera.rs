use glam::{Mat4, Vec2, Vec3};

/// Radians of rotation per pixel of pointer travel.
pub const DEFAULT_PAN_SENSITIVITY: f32 = 0.0004;

/// Zoom multiplier for taps in the upper half of the screen (moves the camera closer).
pub const TAP_ZOOM_IN: f32 = 0.8;

/// Zoom multiplier for taps in the lower half of the screen.
pub const TAP_ZOOM_OUT: f32 = 1.2;

const FOV_Y: f32 = 45.0 * std::f32::consts::PI / 180.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Orbit distance at zoom 1.0.
const ORBIT_DISTANCE: f32 = 6.0;

/// Orbit camera driven by pan and tap gestures.
///
/// `rotation.x` is yaw and `rotation.y` is pitch, both in radians. `zoom` scales
/// the orbit distance and is deliberately unclamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub rotation: Vec2,
    pub zoom: f32,
    pan_sensitivity: f32,
    zoom_in: f32,
    zoom_out: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_SENSITIVITY, TAP_ZOOM_IN, TAP_ZOOM_OUT)
    }
}

impl Camera {
    pub fn new(pan_sensitivity: f32, zoom_in: f32, zoom_out: f32) -> Self {
        Self {
            rotation: Vec2::ZERO,
            zoom: 1.0,
            pan_sensitivity,
            zoom_in,
            zoom_out,
        }
    }

    /// Rotates by a raw pointer delta, so rotation speed does not depend on
    /// frame rate.
    pub fn apply_pan(&mut self, dx: f32, dy: f32) {
        self.rotation.x -= dx * self.pan_sensitivity;
        self.rotation.y -= dy * self.pan_sensitivity;
    }

    /// Zooms in for taps above the vertical midline, out otherwise.
    pub fn apply_tap(&mut self, screen_y: f32, viewport_height: f32) {
        self.zoom *= if screen_y < viewport_height / 2.0 {
            self.zoom_in
        } else {
            self.zoom_out
        };
    }

    /// `projection × translation × yaw × pitch`.
    ///
    /// Depth maps to `[0, 1]`, matching wgpu's clip volume and the `[0, 1]`
    /// viewport depth range used by the compositor.
    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(FOV_Y, aspect_ratio, Z_NEAR, Z_FAR);
        let translation = Mat4::from_translation(Vec3::new(0.0, 0.0, -ORBIT_DISTANCE * self.zoom));
        let yaw = Mat4::from_rotation_y(-self.rotation.x);
        let pitch = Mat4::from_rotation_x(self.rotation.y);

        projection * translation * (yaw * pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-6;

    // ── pan ───────────────────────────────────────────────────────────────

    #[test]
    fn pan_decreases_yaw_by_scaled_delta() {
        let mut cam = Camera::default();
        cam.apply_pan(100.0, 0.0);
        assert!((cam.rotation.x - -0.04).abs() < EPS);
        assert_eq!(cam.rotation.y, 0.0);
    }

    #[test]
    fn pan_vertical_moves_pitch() {
        let mut cam = Camera::default();
        cam.apply_pan(0.0, -50.0);
        assert!((cam.rotation.y - 0.02).abs() < EPS);
    }

    #[test]
    fn pans_accumulate() {
        let mut cam = Camera::default();
        cam.apply_pan(10.0, 0.0);
        cam.apply_pan(15.0, 0.0);
        assert!((cam.rotation.x - -0.01).abs() < EPS);
    }

    // ── tap ───────────────────────────────────────────────────────────────

    #[test]
    fn tap_top_then_bottom() {
        let mut cam = Camera::default();
        cam.apply_tap(0.0, 600.0);
        assert!((cam.zoom - 0.8).abs() < EPS);
        cam.apply_tap(600.0, 600.0);
        assert!((cam.zoom - 0.96).abs() < EPS);
    }

    #[test]
    fn tap_on_midline_zooms_out() {
        let mut cam = Camera::default();
        cam.apply_tap(300.0, 600.0);
        assert!((cam.zoom - 1.2).abs() < EPS);
    }

    #[test]
    fn zoom_is_product_of_tap_factors() {
        let mut cam = Camera::default();
        let taps = [10.0, 590.0, 20.0, 400.0, 450.0, 100.0, 599.0];
        let (mut above, mut below) = (0, 0);
        for y in taps {
            cam.apply_tap(y, 600.0);
            if y < 300.0 {
                above += 1;
            } else {
                below += 1;
            }
        }
        let expected = 0.8f32.powi(above) * 1.2f32.powi(below);
        assert!((cam.zoom - expected).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_not_clamped() {
        let mut cam = Camera::default();
        for _ in 0..200 {
            cam.apply_tap(0.0, 600.0);
        }
        assert!(cam.zoom > 0.0 && cam.zoom < 1e-15);
    }

    // ── view projection ───────────────────────────────────────────────────

    #[test]
    fn view_projection_is_bit_identical() {
        let mut cam = Camera::default();
        cam.apply_pan(123.0, -45.0);
        cam.apply_tap(500.0, 600.0);
        let a = cam.view_projection(16.0 / 9.0);
        let b = cam.view_projection(16.0 / 9.0);
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn origin_projects_to_screen_center_in_front() {
        let cam = Camera::default();
        let clip = cam.view_projection(1.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < EPS && clip.y.abs() < EPS);
        assert!((clip.w - 6.0).abs() < 1e-5);
        let ndc_z = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&ndc_z));
    }

    #[test]
    fn zoom_scales_orbit_distance() {
        let mut cam = Camera::default();
        cam.apply_tap(0.0, 2.0);
        let clip = cam.view_projection(1.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.w - 6.0 * 0.8).abs() < 1e-5);
    }

    #[test]
    fn rotation_is_applied_before_translation() {
        // Yaw a quarter turn: the point at +x swings onto the view axis and
        // stays centered horizontally.
        let mut cam = Camera::default();
        cam.rotation.x = std::f32::consts::FRAC_PI_2;
        let clip = cam.view_projection(1.0) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5);
        assert!((clip.w - 5.0).abs() < 1e-5 || (clip.w - 7.0).abs() < 1e-5);
    }
}
