//! Scalar easing and rotation helpers on top of glam.

use glam::{Quat, Vec3};

/// Fraction of the remaining distance covered by one damping step.
///
/// `1 - e^(-rate * dt)`, which is 0 for a non-positive rate or time step and
/// approaches 1 as `rate * dt` grows. Never leaves `[0, 1]`.
#[inline]
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Frame-rate independent exponential damping toward `target`.
///
/// Moves `current` by `1 - e^(-rate * dt)` of the remaining distance. Repeated
/// steps converge monotonically and never overshoot.
#[inline]
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(rate, dt)
}

/// Component-wise [`damp`] for rotation triples.
#[inline]
pub fn damp_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current + (target - current) * damp_factor(rate, dt)
}

/// `sin(t * frequency)` with the phase taken in f64.
///
/// The session clock grows without bound, so the product is formed at full
/// precision and only the bounded result is narrowed.
#[inline]
pub fn oscillate(t: f64, frequency: f64) -> f32 {
    (t * frequency).sin() as f32
}

/// Quaternion for an Euler XYZ triple (`Rx * Ry * Rz`).
pub fn euler_xyz(rotation: Vec3) -> Quat {
    Quat::from_rotation_x(rotation.x)
        * Quat::from_rotation_y(rotation.y)
        * Quat::from_rotation_z(rotation.z)
}

/// Direction of a limb that hangs straight down at rest.
#[inline]
pub fn rotate_down(rotation: Vec3) -> Vec3 {
    euler_xyz(rotation) * Vec3::NEG_Y
}
