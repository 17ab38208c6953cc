//! Action catalogue: which pose generator runs for each button.
//!
//! Generators are plain functions stored in a table indexed by [`Action`],
//! so adding an action means one enum variant plus one table entry.

use crate::error::RigError;
use crate::joint::{JointId, Pose};
use crate::math::oscillate;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Procedural action selectable from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    #[default]
    Idle = 0,
    Wave = 1,
    Heart = 2,
    Dance = 3,
    Spin = 4,
    Hug = 5,
    Comfort = 6,
    Cry = 7,
}

/// Writes an action's targets over a neutral pose at elapsed time `t`
pub type PoseGenerator = fn(&mut Pose, f64);

/// Fixed size table, indexed by Action
const ACTION_TABLE: [PoseGenerator; Action::COUNT] = [
    idle_pose, wave_pose, heart_pose, dance_pose, spin_pose, hug_pose, comfort_pose, cry_pose,
];

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Self::COUNT] = [
        Action::Idle,
        Action::Wave,
        Action::Heart,
        Action::Dance,
        Action::Spin,
        Action::Hug,
        Action::Comfort,
        Action::Cry,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used by the host page's `data-action` buttons
    pub const fn name(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Wave => "wave",
            Action::Heart => "heart",
            Action::Dance => "dance",
            Action::Spin => "spin",
            Action::Hug => "hug",
            Action::Comfort => "comfort",
            Action::Cry => "cry",
        }
    }

    /// Layer this action's targets onto `pose`
    #[inline]
    pub fn apply(self, pose: &mut Pose, t: f64) {
        ACTION_TABLE[self.index()](pose, t);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| RigError::UnknownAction(s.to_string()))
    }
}

/// Breathing bob, slow body sway and head drift layered on every frame
pub fn idle_sway(pose: &mut Pose, t: f64) {
    pose.root_height += oscillate(t, 2.1) * 0.015;
    pose[JointId::Body].z += oscillate(t, 1.4) * 0.035;
    pose[JointId::Head].y += oscillate(t, 0.9) * 0.08;
}

/// Neutral stance plus idle sway at time `t`
pub fn base_pose(t: f64) -> Pose {
    let mut pose = Pose::neutral();
    idle_sway(&mut pose, t);
    pose
}

fn idle_pose(_pose: &mut Pose, _t: f64) {}

fn wave_pose(pose: &mut Pose, t: f64) {
    let shoulder = &mut pose[JointId::RightShoulder];
    shoulder.x = -1.15;
    shoulder.y = 0.26;
    shoulder.z = -0.34;
    pose[JointId::RightElbow].x = 0.9;
    pose[JointId::LeftShoulder].z = 0.3;
    pose[JointId::Head].y = oscillate(t, 2.5) * 0.08;
}

fn heart_pose(pose: &mut Pose, _t: f64) {
    pose[JointId::LeftShoulder] = glam::Vec3::new(-0.78, -0.14, 0.34);
    pose[JointId::RightShoulder] = glam::Vec3::new(-0.78, 0.14, -0.34);
    pose[JointId::LeftElbow].x = 1.28;
    pose[JointId::RightElbow].x = 1.28;
    pose[JointId::Body].x = 0.04;
}

fn dance_pose(pose: &mut Pose, t: f64) {
    let sway = oscillate(t, 2.2);
    let step = t * 3.2;
    pose[JointId::Body].z = sway * 0.22;
    pose[JointId::Head].y = sway * 0.24;
    pose[JointId::LeftShoulder].z = 0.34 + oscillate(t, 4.3) * 0.36;
    pose[JointId::RightShoulder].z = -0.34 - (t * 4.3 + 0.8).sin() as f32 * 0.36;
    pose[JointId::LeftHip].x = 0.06 + step.sin() as f32 * 0.18;
    pose[JointId::RightHip].x = 0.06 + (step + PI).sin() as f32 * 0.18;
    pose.root_height = (step.sin() as f32).abs() * 0.05;
}

fn spin_pose(pose: &mut Pose, t: f64) {
    // Narrowing can round up to a full turn, so wrap again in f32
    let yaw = (t * 0.85).rem_euclid(std::f64::consts::TAU) as f32;
    pose.root_yaw = yaw.rem_euclid(TAU);
    pose[JointId::Head].y = oscillate(t, 1.1) * 0.14;
}

fn hug_pose(pose: &mut Pose, _t: f64) {
    pose[JointId::LeftShoulder] = glam::Vec3::new(-0.72, -0.18, 0.28);
    pose[JointId::RightShoulder] = glam::Vec3::new(-0.72, 0.18, -0.28);
    pose[JointId::LeftElbow].x = 1.18;
    pose[JointId::RightElbow].x = 1.18;
    pose[JointId::Body].x = 0.13;
    pose[JointId::Head].x = -0.07;
}

fn comfort_pose(pose: &mut Pose, t: f64) {
    let pat = oscillate(t, 3.0);
    pose[JointId::Head].x = pat * 0.16;
    pose[JointId::RightShoulder].x = -0.6;
    pose[JointId::RightElbow].x = 0.84 + pat * 0.2;
    pose[JointId::LeftShoulder].z = 0.27;
    pose[JointId::Body].z = pat * 0.05;
}

fn cry_pose(pose: &mut Pose, t: f64) {
    let sob = oscillate(t, 11.0);
    pose[JointId::LeftShoulder] = glam::Vec3::new(-0.95, -0.2, 0.22);
    pose[JointId::RightShoulder] = glam::Vec3::new(-0.95, 0.2, -0.22);
    pose[JointId::LeftElbow].x = 0.35;
    pose[JointId::RightElbow].x = 0.35;
    pose[JointId::Head].x = 0.32 + sob * 0.03;
    pose[JointId::Body].x = 0.08;
    pose[JointId::Body].z = sob * 0.03;
    pose.root_height = oscillate(t, 5.5).abs() * 0.015;
}
