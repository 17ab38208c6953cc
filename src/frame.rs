//! Per-frame output handed to the host renderer.
//!
//! Two forms: a flat `f32` buffer of [`JointTransform`] records for the hot
//! path, and a serde [`FrameSnapshot`] for inspection and the UI.

use crate::action::Action;
use crate::animation::Phase;
use crate::appearance::Appearance;
use crate::constraint::PushOutReport;
use crate::expression::{HeartOverlay, TearOverlay};
use crate::joint::{JointId, Pose};
use crate::math::euler_xyz;
use glam::Vec3;
use serde::Serialize;
use static_assertions::const_assert_eq;

/// One rotational record in the joint buffer
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct JointTransform {
    /// Euler XYZ (radians)
    pub euler: [f32; 3],
    /// Vertical translation, only non-zero on the root record
    pub offset: f32,
    /// Same rotation as a quaternion (x, y, z, w)
    pub quaternion: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<JointTransform>(), 32);
const_assert_eq!(std::mem::align_of::<JointTransform>(), 4);

impl JointTransform {
    /// Floats per record
    pub const STRIDE: usize = std::mem::size_of::<JointTransform>() / std::mem::size_of::<f32>();

    pub fn new(euler: Vec3, offset: f32) -> Self {
        Self {
            euler: euler.to_array(),
            offset,
            quaternion: euler_xyz(euler).to_array(),
        }
    }
}

/// Records per frame: the root followed by every joint in `JointId` order
pub const RECORD_COUNT: usize = JointId::COUNT + 1;

/// Pack a pose into renderer records
pub fn joint_transforms(pose: &Pose) -> [JointTransform; RECORD_COUNT] {
    let mut records = [JointTransform::new(Vec3::ZERO, 0.0); RECORD_COUNT];
    records[0] = JointTransform::new(Vec3::new(0.0, pose.root_yaw, 0.0), pose.root_height);
    for joint in JointId::ALL {
        records[joint.index() + 1] = JointTransform::new(pose[joint], 0.0);
    }
    records
}

/// Flat float view of [`joint_transforms`]
pub fn joint_buffer(pose: &Pose) -> Vec<f32> {
    let records = joint_transforms(pose);
    bytemuck::cast_slice::<JointTransform, f32>(&records).to_vec()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct JointSample {
    pub joint: JointId,
    pub rotation: Vec3,
}

/// Everything the UI may want to show about the last frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub elapsed: f64,
    pub phase: Phase,
    pub current_action: Action,
    pub pending_action: Option<Action>,
    pub deviation: Option<f32>,
    pub root_height: f32,
    pub root_yaw: f32,
    pub joints: Vec<JointSample>,
    pub arms: [PushOutReport; 2],
    pub eye_scale: f32,
    pub heart: HeartOverlay,
    pub tear: TearOverlay,
    pub appearance: &'a Appearance,
    pub camera_eye: Vec3,
}

pub fn joint_samples(pose: &Pose) -> Vec<JointSample> {
    JointId::ALL
        .iter()
        .map(|&joint| JointSample {
            joint,
            rotation: pose[joint],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]
    #[wasm_bindgen_test]
    fn test_buffer_layout() {
        let pose = Pose::neutral().with_root(0.02, 0.5);
        let buffer = joint_buffer(&pose);

        assert_eq!(JointTransform::STRIDE, 8);
        assert_eq!(buffer.len(), RECORD_COUNT * JointTransform::STRIDE);

        // Root record carries yaw and height
        assert_eq!(&buffer[0..4], &[0.0, 0.5, 0.0, 0.02]);

        // Left shoulder sits after the root, body and head records
        let start = (JointId::LeftShoulder.index() + 1) * JointTransform::STRIDE;
        assert_eq!(&buffer[start..start + 3], &[0.1, -0.08, 0.26]);
        assert_eq!(buffer[start + 3], 0.0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_quaternion_matches_euler() {
        let rotation = Vec3::new(-1.15, 0.26, -0.34);
        let record = JointTransform::new(rotation, 0.0);
        let q = glam::Quat::from_array(record.quaternion);

        let expected = glam::Quat::from_euler(glam::EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
        assert!(q.angle_between(expected) < 1e-4);
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_snapshot_serializes() {
        let appearance = Appearance::builtin(0).unwrap();
        let pose = Pose::neutral();
        let snapshot = FrameSnapshot {
            elapsed: 1.0,
            phase: Phase::Action,
            current_action: Action::Wave,
            pending_action: None,
            deviation: None,
            root_height: pose.root_height,
            root_yaw: pose.root_yaw,
            joints: joint_samples(&pose),
            arms: [PushOutReport::default(); 2],
            eye_scale: 1.0,
            heart: HeartOverlay::default(),
            tear: TearOverlay::default(),
            appearance: &appearance,
            camera_eye: Vec3::ZERO,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["current_action"], "wave");
        assert_eq!(json["phase"], "action");
        assert_eq!(json["joints"].as_array().unwrap().len(), JointId::COUNT);
        assert_eq!(json["joints"][2]["joint"], "left_shoulder");
        assert_eq!(json["appearance"]["base_color"], "#f7f8f9");
    }
}
