//! Shared rig constants used by both build.rs and runtime code.
//!
//! This module is included by both the build script and the joint module so
//! compile-time validation and runtime constraints read the same numbers.
//!
//! Frame convention: the character faces +Z, Y is up and its left side is +X.
//! Rotations are Euler XYZ triples in radians.

// Some constants are only used by build.rs for validation
#![allow(dead_code)]

use glam::Vec3;

// --- Pivots (pelvis frame, meters) ---

pub const BODY_PIVOT: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const HEAD_PIVOT: Vec3 = Vec3::new(0.0, 1.58, 0.0);
pub const LEFT_SHOULDER_PIVOT: Vec3 = Vec3::new(0.88, 1.62, 0.08);
pub const RIGHT_SHOULDER_PIVOT: Vec3 = Vec3::new(-0.88, 1.62, 0.08);
/// Elbow pivot relative to its shoulder
pub const ELBOW_PIVOT: Vec3 = Vec3::new(0.0, -0.86, 0.0);
pub const LEFT_HIP_PIVOT: Vec3 = Vec3::new(0.35, 0.02, 0.0);
pub const RIGHT_HIP_PIVOT: Vec3 = Vec3::new(-0.35, 0.02, 0.0);
/// Knee pivot relative to its hip
pub const KNEE_PIVOT: Vec3 = Vec3::new(0.0, -0.52, 0.0);

// --- Arm segments used by the collision sampler ---

pub const UPPER_ARM_LENGTH: f32 = 0.78;
pub const FOREARM_LENGTH: f32 = 0.72;
/// Fraction of the elbow bend folded into the forearm's flexion angle
pub const ELBOW_COUPLING: f32 = 0.88;

// --- Torso collider ---

pub const TORSO_CENTER: Vec3 = Vec3::new(0.0, 1.36, 0.03);
pub const TORSO_RADII: Vec3 = Vec3::new(0.92, 1.08, 0.8);

// --- Neutral pose ---

pub const NEUTRAL_LEFT_SHOULDER: Vec3 = Vec3::new(0.1, -0.08, 0.26);
pub const NEUTRAL_RIGHT_SHOULDER: Vec3 = Vec3::new(0.1, 0.08, -0.26);
pub const NEUTRAL_ELBOW: Vec3 = Vec3::new(0.17, 0.0, 0.0);
pub const NEUTRAL_LEFT_HIP: Vec3 = Vec3::new(0.05, 0.0, 0.08);
pub const NEUTRAL_RIGHT_HIP: Vec3 = Vec3::new(0.05, 0.0, -0.08);
pub const NEUTRAL_KNEE: Vec3 = Vec3::new(-0.12, 0.0, 0.0);

// --- Arm joint limits (min, max) ---

pub const SHOULDER_FLEXION_RANGE: (f32, f32) = (-1.35, 0.9);
pub const LEFT_SHOULDER_YAW_RANGE: (f32, f32) = (-1.05, 0.24);
pub const RIGHT_SHOULDER_YAW_RANGE: (f32, f32) = (-0.24, 1.05);
pub const LEFT_SHOULDER_ABDUCTION_RANGE: (f32, f32) = (0.08, 1.25);
pub const RIGHT_SHOULDER_ABDUCTION_RANGE: (f32, f32) = (-1.25, -0.08);
pub const ELBOW_FLEXION_RANGE: (f32, f32) = (0.0, 2.05);

/// Maximum shoulder nudges per arm per frame
pub const MAX_PUSH_ITERATIONS: u32 = 4;
pub const PUSH_FLEXION_STEP: f32 = 0.04;
pub const PUSH_YAW_STEP: f32 = 0.08;
pub const PUSH_ABDUCTION_STEP: f32 = 0.05;
