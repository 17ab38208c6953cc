use super::id::JointId;
use super::pose::{Channel, Pose};
use crate::config::DampingRates;
use crate::math::{damp, damp_vec3};
use glam::Vec3;

/// Live joint state consumed by the renderer.
///
/// Created once per session and only ever mutated by blending toward the
/// frame's target pose.
#[derive(Debug, Clone)]
pub struct Rig {
    live: Pose,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}

impl Rig {
    /// Rig already settled in the neutral stance
    pub fn new() -> Self {
        Self::from_pose(Pose::neutral())
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self { live: pose }
    }

    /// Current live pose
    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.live
    }

    #[inline]
    pub fn rotation(&self, joint: JointId) -> Vec3 {
        self.live[joint]
    }

    /// Damp every live channel toward `target`, each joint group at its own rate
    pub fn blend_toward(&mut self, target: &Pose, rates: &DampingRates, dt: f32) {
        for joint in JointId::ALL {
            let rate = rates.for_group(joint.group());
            self.live[joint] = damp_vec3(self.live[joint], target[joint], rate, dt);
        }
        self.live.root_height = damp(
            self.live.root_height,
            target.root_height,
            rates.root_height,
            dt,
        );
        self.live.root_yaw = damp(self.live.root_yaw, target.root_yaw, rates.root_yaw, dt);
    }

    /// Sum of absolute differences between the live pose and `reference`
    /// over the given channels.
    pub fn deviation(&self, reference: &Pose, channels: &[Channel]) -> f32 {
        channels
            .iter()
            .map(|&channel| (self.live.channel(channel) - reference.channel(channel)).abs())
            .sum()
    }
}
