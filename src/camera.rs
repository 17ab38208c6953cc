use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Elevation limits as dot product of camera direction with world up
const MIN_UP_DOT: f32 = 0.05; // Camera must be at least slightly above target
const MAX_UP_DOT: f32 = 0.98; // Don't allow looking straight down

/// Zoom limits (distance from target)
pub const MIN_DISTANCE: f32 = 2.2;
pub const MAX_DISTANCE: f32 = 7.6;

/// Target point for orbit camera (chest height of the character)
pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.25, 0.0);

/// Eye position on load and after a view reset
pub const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 1.9, 4.6);

/// The camera orbits around a fixed target point. Its position is determined
/// by rotating a "back" vector (0, 0, distance) by the orientation quaternion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Camera {
    /// Quaternion representing camera's orbital rotation
    pub orientation: Quat,
    /// Distance from target point
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        // Straight in front, slightly above the target
        let offset = DEFAULT_EYE - CAMERA_TARGET;
        let pitch = -offset.y.atan2(offset.z);

        Self {
            orientation: Quat::from_rotation_x(pitch).normalize(),
            distance: offset.length(),
        }
    }
}

impl Camera {
    /// Create a new camera with specified orientation and distance
    pub fn new(orientation: Quat, distance: f32) -> Self {
        Self {
            orientation,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
        }
    }

    /// Compute new camera with rotation applied
    ///
    /// Returns a new Camera with the rotation applied, or the original
    /// camera if the rotation would exceed elevation limits.
    pub fn with_rotation(self, axis: Vec3, angle: f32) -> Camera {
        let axis = axis.normalize_or_zero();
        if axis.length_squared() < 0.5 || !angle.is_finite() {
            return self; // Invalid input
        }

        let delta = Quat::from_axis_angle(axis, angle);
        let new_orientation = (delta * self.orientation).normalize();

        let up_dot = (new_orientation * Vec3::Z).y;
        if (MIN_UP_DOT..=MAX_UP_DOT).contains(&up_dot) {
            return Camera {
                orientation: new_orientation,
                ..self
            };
        }

        // Out of range: only accept rotations heading back toward it
        let old_up_dot = (self.orientation * Vec3::Z).y;
        let moving_to_valid = (old_up_dot < MIN_UP_DOT && up_dot > old_up_dot)
            || (old_up_dot > MAX_UP_DOT && up_dot < old_up_dot);

        if moving_to_valid {
            Camera {
                orientation: new_orientation,
                ..self
            }
        } else {
            self
        }
    }

    /// Scale the orbit distance, clamped to the zoom limits
    pub fn with_zoom(self, factor: f32) -> Camera {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        Camera {
            distance: (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE),
            ..self
        }
    }

    /// Compute camera eye position
    pub fn eye_position(&self) -> Vec3 {
        let offset = self.orientation * Vec3::new(0.0, 0.0, self.distance);
        CAMERA_TARGET + offset
    }

    /// Compute camera's local right axis
    ///
    /// This is the axis to rotate around for up/down elevation changes.
    /// Computed as cross product of world up and view direction.
    pub fn right_axis(&self) -> Vec3 {
        let eye = self.eye_position();
        let forward = (CAMERA_TARGET - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        // Return X axis if degenerate (looking straight up/down)
        if right.length_squared() < 0.5 {
            Vec3::X
        } else {
            right
        }
    }

    /// Compute view matrix
    ///
    /// Uses world up (Y axis) so orbiting never introduces roll.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), CAMERA_TARGET, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]
    #[wasm_bindgen_test]
    fn test_default_eye_matches_scene_setup() {
        let eye = Camera::default().eye_position();
        assert!(
            (eye - DEFAULT_EYE).abs().max_element() < 1e-4,
            "eye {} should start at {}",
            eye,
            DEFAULT_EYE
        );
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_camera_rotation_clamping() {
        let camera = Camera::default();

        // Try to rotate way down (should be clamped)
        let rotated = camera.with_rotation(Vec3::X, -std::f32::consts::PI);

        let dir = rotated.orientation * Vec3::Z;
        assert!(
            dir.y >= MIN_UP_DOT,
            "Camera should be clamped to min elevation"
        );
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_orbit_keeps_distance() {
        let camera = Camera::default();
        let rotated = camera.with_rotation(Vec3::Y, 1.2);
        let eye = rotated.eye_position();
        assert!((eye.distance(CAMERA_TARGET) - camera.distance).abs() < 1e-4);
        assert!(eye.x.abs() > 1.0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_zoom_is_clamped() {
        let camera = Camera::default();
        assert_eq!(camera.with_zoom(100.0).distance, MAX_DISTANCE);
        assert_eq!(camera.with_zoom(0.01).distance, MIN_DISTANCE);
        assert_eq!(camera.with_zoom(-1.0), camera);

        let closer = camera.with_zoom(0.8);
        assert!((closer.distance - camera.distance * 0.8).abs() < 1e-5);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_view_matrix_looks_at_target() {
        let view = Camera::default().view_matrix();

        for val in view.to_cols_array() {
            assert!(!val.is_nan(), "View matrix should not contain NaN");
        }
        // Target sits straight ahead on the view axis
        let target = view.transform_point3(CAMERA_TARGET);
        assert!(target.x.abs() < 1e-4 && target.y.abs() < 1e-4);
        assert!(target.z < 0.0);
    }
}

// App methods for camera control
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Apply a rotation to the camera around a world-space axis
    ///
    /// Rotates the camera's stored quaternion orientation incrementally.
    /// Clamps elevation to prevent going under floor or directly overhead.
    ///
    /// # Arguments
    /// * `axis_x, axis_y, axis_z` - World-space axis to rotate around (should be normalized)
    /// * `angle` - Rotation angle in radians
    pub fn rotate_camera(&mut self, axis_x: f32, axis_y: f32, axis_z: f32, angle: f32) {
        let axis = Vec3::new(axis_x, axis_y, axis_z);
        self.state.camera = self.state.camera.with_rotation(axis, angle);
    }

    /// Multiply the orbit distance (wheel / pinch)
    pub fn zoom_camera(&mut self, factor: f32) {
        self.state.camera = self.state.camera.with_zoom(factor);
    }

    pub fn reset_view(&mut self) {
        self.state.camera = Camera::default();
    }

    /// Get the camera's right axis (for vertical input rotation)
    pub fn get_camera_right_axis(&self) -> Vec<f32> {
        self.state.camera.right_axis().to_array().to_vec()
    }

    pub fn camera_eye(&self) -> Vec<f32> {
        self.state.camera.eye_position().to_array().to_vec()
    }

    /// Column-major view matrix for the host renderer
    pub fn view_matrix(&self) -> Vec<f32> {
        self.state.camera.view_matrix().to_cols_array().to_vec()
    }
}
