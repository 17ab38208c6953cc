pub mod id;
pub mod pose;
pub mod rig;

pub use id::*;
pub use pose::*;
pub use rig::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DampingRates;
    use glam::Vec3;
    use wasm_bindgen_test::*;

    #[test]
    #[wasm_bindgen_test]
    fn test_hierarchy_is_topological() {
        for joint in JointId::ALL {
            if let Some(parent) = joint.parent() {
                assert!(
                    parent.index() < joint.index(),
                    "{:?} listed before its parent {:?}",
                    joint,
                    parent
                );
            }
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_all_matches_index() {
        for (i, joint) in JointId::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_shoulders_mirror_across_centerline() {
        let left = JointId::LeftShoulder.def().pivot;
        let right = JointId::RightShoulder.def().pivot;
        assert!(left.x > 0.0);
        assert_eq!(left.x, -right.x);
        assert_eq!(left.y, right.y);
        assert_eq!(left.z, right.z);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_neutral_pose_values() {
        let pose = Pose::neutral();
        assert_eq!(pose[JointId::LeftShoulder], Vec3::new(0.1, -0.08, 0.26));
        assert_eq!(pose[JointId::RightShoulder], Vec3::new(0.1, 0.08, -0.26));
        assert_eq!(pose[JointId::LeftElbow].x, 0.17);
        assert_eq!(pose[JointId::Body], Vec3::ZERO);
        assert_eq!(pose.root_yaw, 0.0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_with_rotation_leaves_original() {
        let base = Pose::neutral();
        let raised = base.with_rotation(JointId::RightShoulder, Vec3::new(-1.15, 0.26, -0.34));

        assert_eq!(raised[JointId::RightShoulder].x, -1.15);
        assert_eq!(base[JointId::RightShoulder].x, 0.1);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_blend_moves_every_channel_toward_target() {
        let mut rig = Rig::from_pose(Pose::rest());
        let target = Pose::neutral().with_root(0.05, 0.4);

        rig.blend_toward(&target, &DampingRates::default(), 0.1);

        // Shoulders run at 10/s: 1 - e^-1 of the way
        let expected = 0.26 * (1.0 - (-1.0f32).exp());
        assert!((rig.rotation(JointId::LeftShoulder).z - expected).abs() < 1e-5);
        assert!(rig.pose().root_yaw > 0.0 && rig.pose().root_yaw < 0.4);
        assert!(rig.pose().root_height > 0.0 && rig.pose().root_height < 0.05);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_blend_converges() {
        let mut rig = Rig::from_pose(Pose::rest());
        let target = Pose::neutral();
        let rates = DampingRates::default();

        for _ in 0..600 {
            rig.blend_toward(&target, &rates, 1.0 / 60.0);
        }

        let all = Channel::all();
        assert!(rig.deviation(&target, &all) < 1e-3);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_diagnostic_deviation_ignores_legs() {
        let rig = Rig::from_pose(Pose::neutral().with_rotation(JointId::LeftKnee, Vec3::X));
        let neutral = Pose::neutral();

        assert_eq!(rig.deviation(&neutral, &Channel::DIAGNOSTIC), 0.0);
        assert!(rig.deviation(&neutral, &Channel::all()) > 0.5);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_diagnostic_deviation_sums_absolute_values() {
        let pose = Pose::neutral()
            .with_rotation(JointId::Body, Vec3::new(0.1, 0.0, -0.2))
            .with_root(0.0, -0.3);
        let rig = Rig::from_pose(pose);

        let deviation = rig.deviation(&Pose::neutral(), &Channel::DIAGNOSTIC);
        assert!((deviation - 0.6).abs() < 1e-6);
    }
}
