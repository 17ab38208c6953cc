use crate::rig_constants::{
    BODY_PIVOT, ELBOW_PIVOT, HEAD_PIVOT, KNEE_PIVOT, LEFT_HIP_PIVOT, LEFT_SHOULDER_PIVOT,
    RIGHT_HIP_PIVOT, RIGHT_SHOULDER_PIVOT,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for each rotational joint of the rig.
/// Ordered for topological traversal (parents before children).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum JointId {
    // Torso
    Body = 0,
    Head = 1,

    // Left arm chain
    LeftShoulder = 2,
    LeftElbow = 3,

    // Right arm chain
    RightShoulder = 4,
    RightElbow = 5,

    // Left leg chain
    LeftHip = 6,
    LeftKnee = 7,

    // Right leg chain
    RightHip = 8,
    RightKnee = 9,
}

impl JointId {
    /// Total number of joints in the rig
    pub const COUNT: usize = 10;

    /// All joints in topological order (parents before children)
    pub const ALL: [JointId; Self::COUNT] = [
        JointId::Body,
        JointId::Head,
        JointId::LeftShoulder,
        JointId::LeftElbow,
        JointId::RightShoulder,
        JointId::RightElbow,
        JointId::LeftHip,
        JointId::LeftKnee,
        JointId::RightHip,
        JointId::RightKnee,
    ];

    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static definition of this joint
    #[inline]
    pub fn def(self) -> &'static JointDef {
        &JOINT_HIERARCHY[self.index()]
    }

    #[inline]
    pub fn parent(self) -> Option<JointId> {
        self.def().parent
    }

    #[inline]
    pub fn group(self) -> JointGroup {
        self.def().group
    }

    /// Name used by the host page and in snapshots
    pub const fn name(self) -> &'static str {
        match self {
            JointId::Body => "body",
            JointId::Head => "head",
            JointId::LeftShoulder => "left_shoulder",
            JointId::LeftElbow => "left_elbow",
            JointId::RightShoulder => "right_shoulder",
            JointId::RightElbow => "right_elbow",
            JointId::LeftHip => "left_hip",
            JointId::LeftKnee => "left_knee",
            JointId::RightHip => "right_hip",
            JointId::RightKnee => "right_knee",
        }
    }
}

/// Rotation axis of a joint's Euler triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Joints sharing a stiffness and therefore a damping rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointGroup {
    Body,
    Head,
    Shoulder,
    Elbow,
    Hip,
    Knee,
}

/// Static joint definition: parent relationship and pivot placement
#[derive(Debug, Clone, Copy)]
pub struct JointDef {
    /// Parent joint (None when attached directly to the pelvis)
    pub parent: Option<JointId>,
    /// Pivot position in the parent's space (meters)
    pub pivot: Vec3,
    pub group: JointGroup,
}

/// Joint hierarchy with rest-pose pivots.
/// Pivots come from rig_constants.rs so build-time checks agree.
pub static JOINT_HIERARCHY: [JointDef; JointId::COUNT] = [
    // Body - torso shell, sits on the pelvis
    JointDef {
        parent: None,
        pivot: BODY_PIVOT,
        group: JointGroup::Body,
    },
    // Head - pivots independently of the torso shell
    JointDef {
        parent: None,
        pivot: HEAD_PIVOT,
        group: JointGroup::Head,
    },
    JointDef {
        parent: None,
        pivot: LEFT_SHOULDER_PIVOT,
        group: JointGroup::Shoulder,
    },
    JointDef {
        parent: Some(JointId::LeftShoulder),
        pivot: ELBOW_PIVOT,
        group: JointGroup::Elbow,
    },
    JointDef {
        parent: None,
        pivot: RIGHT_SHOULDER_PIVOT,
        group: JointGroup::Shoulder,
    },
    JointDef {
        parent: Some(JointId::RightShoulder),
        pivot: ELBOW_PIVOT,
        group: JointGroup::Elbow,
    },
    JointDef {
        parent: None,
        pivot: LEFT_HIP_PIVOT,
        group: JointGroup::Hip,
    },
    JointDef {
        parent: Some(JointId::LeftHip),
        pivot: KNEE_PIVOT,
        group: JointGroup::Knee,
    },
    JointDef {
        parent: None,
        pivot: RIGHT_HIP_PIVOT,
        group: JointGroup::Hip,
    },
    JointDef {
        parent: Some(JointId::RightHip),
        pivot: KNEE_PIVOT,
        group: JointGroup::Knee,
    },
];
