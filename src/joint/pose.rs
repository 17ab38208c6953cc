use super::id::{Axis, JointId};
use crate::rig_constants::{
    NEUTRAL_ELBOW, NEUTRAL_KNEE, NEUTRAL_LEFT_HIP, NEUTRAL_LEFT_SHOULDER, NEUTRAL_RIGHT_HIP,
    NEUTRAL_RIGHT_SHOULDER,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Desired (or live) joint configuration for one frame.
///
/// Each joint stores an Euler XYZ rotation in radians relative to its
/// parent. `root_height` and `root_yaw` move the whole body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotations: [Vec3; JointId::COUNT],
    /// Vertical bob of the whole body (meters)
    pub root_height: f32,
    /// Turn of the whole body around +Y (radians)
    pub root_yaw: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Pose {
    /// All rotations at zero, the rig as its meshes were built
    pub const fn rest() -> Self {
        Self {
            rotations: [Vec3::ZERO; JointId::COUNT],
            root_height: 0.0,
            root_yaw: 0.0,
        }
    }

    /// The relaxed stance every action transition blends through
    pub const fn neutral() -> Self {
        let mut rotations = [Vec3::ZERO; JointId::COUNT];
        rotations[JointId::LeftShoulder.index()] = NEUTRAL_LEFT_SHOULDER;
        rotations[JointId::RightShoulder.index()] = NEUTRAL_RIGHT_SHOULDER;
        rotations[JointId::LeftElbow.index()] = NEUTRAL_ELBOW;
        rotations[JointId::RightElbow.index()] = NEUTRAL_ELBOW;
        rotations[JointId::LeftHip.index()] = NEUTRAL_LEFT_HIP;
        rotations[JointId::RightHip.index()] = NEUTRAL_RIGHT_HIP;
        rotations[JointId::LeftKnee.index()] = NEUTRAL_KNEE;
        rotations[JointId::RightKnee.index()] = NEUTRAL_KNEE;

        Self {
            rotations,
            root_height: 0.0,
            root_yaw: 0.0,
        }
    }

    /// Return a new pose with the specified joint rotation (Functional Set)
    pub fn with_rotation(self, joint: JointId, rotation: Vec3) -> Self {
        let mut new_pose = self;
        new_pose.rotations[joint.index()] = rotation;
        new_pose
    }

    /// Return a new pose with the specified whole-body offsets (Functional Set)
    pub fn with_root(self, height: f32, yaw: f32) -> Self {
        Self {
            root_height: height,
            root_yaw: yaw,
            ..self
        }
    }

    /// Read a single scalar channel
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Joint(joint, axis) => axis.of(self[joint]),
            Channel::RootHeight => self.root_height,
            Channel::RootYaw => self.root_yaw,
        }
    }
}

impl Index<JointId> for Pose {
    type Output = Vec3;

    #[inline]
    fn index(&self, joint: JointId) -> &Vec3 {
        &self.rotations[joint.index()]
    }
}

impl IndexMut<JointId> for Pose {
    #[inline]
    fn index_mut(&mut self, joint: JointId) -> &mut Vec3 {
        &mut self.rotations[joint.index()]
    }
}

/// One scalar degree of freedom of a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Joint(JointId, Axis),
    RootHeight,
    RootYaw,
}

impl Channel {
    /// The handful of channels checked before an action switch.
    /// Leg joints and head are not part of it.
    pub const DIAGNOSTIC: [Channel; 7] = [
        Channel::Joint(JointId::LeftShoulder, Axis::Z),
        Channel::Joint(JointId::RightShoulder, Axis::Z),
        Channel::Joint(JointId::LeftElbow, Axis::X),
        Channel::Joint(JointId::RightElbow, Axis::X),
        Channel::Joint(JointId::Body, Axis::X),
        Channel::Joint(JointId::Body, Axis::Z),
        Channel::RootYaw,
    ];

    /// Every joint axis plus both root offsets
    pub fn all() -> Vec<Channel> {
        let mut channels = Vec::with_capacity(JointId::COUNT * 3 + 2);
        for joint in JointId::ALL {
            for axis in Axis::ALL {
                channels.push(Channel::Joint(joint, axis));
            }
        }
        channels.push(Channel::RootHeight);
        channels.push(Channel::RootYaw);
        channels
    }
}
