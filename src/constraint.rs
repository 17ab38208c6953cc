//! Arm joint limits and torso push-out.
//!
//! Runs on the desired pose before blending, so the live rig only ever damps
//! toward arm targets that are inside their limits and (when resolvable)
//! clear of the torso ellipsoid.

use crate::error::{Result, RigError};
use crate::joint::{JointId, Pose};
use crate::math::rotate_down;
use crate::rig_constants::{
    ELBOW_COUPLING, ELBOW_FLEXION_RANGE, FOREARM_LENGTH, LEFT_SHOULDER_ABDUCTION_RANGE,
    LEFT_SHOULDER_YAW_RANGE, MAX_PUSH_ITERATIONS, PUSH_ABDUCTION_STEP, PUSH_FLEXION_STEP,
    PUSH_YAW_STEP, RIGHT_SHOULDER_ABDUCTION_RANGE, RIGHT_SHOULDER_YAW_RANGE,
    SHOULDER_FLEXION_RANGE, TORSO_CENTER, TORSO_RADII, UPPER_ARM_LENGTH,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmSide {
    Left,
    Right,
}

impl ArmSide {
    pub const ALL: [ArmSide; 2] = [ArmSide::Left, ArmSide::Right];

    #[inline]
    pub const fn shoulder(self) -> JointId {
        match self {
            ArmSide::Left => JointId::LeftShoulder,
            ArmSide::Right => JointId::RightShoulder,
        }
    }

    #[inline]
    pub const fn elbow(self) -> JointId {
        match self {
            ArmSide::Left => JointId::LeftElbow,
            ArmSide::Right => JointId::RightElbow,
        }
    }

    /// +1 when positive abduction swings this arm away from the body
    #[inline]
    pub const fn outward_sign(self) -> f32 {
        match self {
            ArmSide::Left => 1.0,
            ArmSide::Right => -1.0,
        }
    }
}

/// Closed interval of allowed joint angles (radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    const fn from_tuple(range: (f32, f32)) -> Self {
        Self::new(range.0, range.1)
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(RigError::invalid(
                field,
                format!("range [{}, {}] is empty or non-finite", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Per-arm angle limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmLimits {
    /// Shoulder X, negative raises the arm forward
    pub flexion: AngleRange,
    /// Shoulder Y
    pub yaw: AngleRange,
    /// Shoulder Z
    pub abduction: AngleRange,
    /// Elbow X
    pub elbow: AngleRange,
}

impl ArmLimits {
    pub const LEFT: ArmLimits = ArmLimits {
        flexion: AngleRange::from_tuple(SHOULDER_FLEXION_RANGE),
        yaw: AngleRange::from_tuple(LEFT_SHOULDER_YAW_RANGE),
        abduction: AngleRange::from_tuple(LEFT_SHOULDER_ABDUCTION_RANGE),
        elbow: AngleRange::from_tuple(ELBOW_FLEXION_RANGE),
    };

    pub const RIGHT: ArmLimits = ArmLimits {
        flexion: AngleRange::from_tuple(SHOULDER_FLEXION_RANGE),
        yaw: AngleRange::from_tuple(RIGHT_SHOULDER_YAW_RANGE),
        abduction: AngleRange::from_tuple(RIGHT_SHOULDER_ABDUCTION_RANGE),
        elbow: AngleRange::from_tuple(ELBOW_FLEXION_RANGE),
    };

    pub const fn for_side(side: ArmSide) -> Self {
        match side {
            ArmSide::Left => Self::LEFT,
            ArmSide::Right => Self::RIGHT,
        }
    }

    /// Clamp the shoulder triple into range
    pub fn clamp_shoulder(&self, shoulder: Vec3) -> Vec3 {
        Vec3::new(
            self.flexion.clamp(shoulder.x),
            self.yaw.clamp(shoulder.y),
            self.abduction.clamp(shoulder.z),
        )
    }

    /// Clamp an arm in place. Only the elbow's X axis is limited.
    pub fn clamp(&self, shoulder: &mut Vec3, elbow: &mut Vec3) {
        *shoulder = self.clamp_shoulder(*shoulder);
        elbow.x = self.elbow.clamp(elbow.x);
    }

    pub fn contains(&self, shoulder: Vec3, elbow: Vec3) -> bool {
        self.flexion.contains(shoulder.x)
            && self.yaw.contains(shoulder.y)
            && self.abduction.contains(shoulder.z)
            && self.elbow.contains(elbow.x)
    }

    fn validate(&self, side: &str) -> Result<()> {
        self.flexion.validate(&format!("arms.{}.flexion", side))?;
        self.yaw.validate(&format!("arms.{}.yaw", side))?;
        self.abduction.validate(&format!("arms.{}.abduction", side))?;
        self.elbow.validate(&format!("arms.{}.elbow", side))
    }
}

/// Axis-aligned ellipsoid approximating the torso shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorsoCollider {
    pub center: Vec3,
    pub radii: Vec3,
}

impl Default for TorsoCollider {
    fn default() -> Self {
        Self {
            center: TORSO_CENTER,
            radii: TORSO_RADII,
        }
    }
}

impl TorsoCollider {
    /// Squared normalized distance, below 1 inside the ellipsoid
    #[inline]
    pub fn normalized_distance(&self, point: Vec3) -> f32 {
        ((point - self.center) / self.radii).length_squared()
    }

    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.normalized_distance(point) < 1.0
    }

    /// How far inside the ellipsoid a point sits, 0 when outside
    #[inline]
    pub fn penetration(&self, point: Vec3) -> f32 {
        (1.0 - self.normalized_distance(point)).max(0.0)
    }

    /// Summed penetration of a set of points
    pub fn deficit(&self, points: &[Vec3]) -> f32 {
        points.iter().map(|&p| self.penetration(p)).sum()
    }
}

/// Forward kinematics of one arm reduced to a few collision samples
#[derive(Debug, Clone, Copy)]
pub struct ArmGeometry {
    pub pivot: Vec3,
    pub upper_length: f32,
    pub forearm_length: f32,
    pub elbow_coupling: f32,
}

impl ArmGeometry {
    pub fn for_side(side: ArmSide) -> Self {
        Self {
            pivot: side.shoulder().def().pivot,
            upper_length: UPPER_ARM_LENGTH,
            forearm_length: FOREARM_LENGTH,
            elbow_coupling: ELBOW_COUPLING,
        }
    }

    /// Two points along the upper arm, two along the forearm and the wrist
    pub fn samples(&self, shoulder: Vec3, elbow_flexion: f32) -> [Vec3; 5] {
        let elbow = self.pivot + rotate_down(shoulder) * self.upper_length;
        let forearm = Vec3::new(
            shoulder.x + elbow_flexion * self.elbow_coupling,
            shoulder.y,
            shoulder.z,
        );
        let wrist = elbow + rotate_down(forearm) * self.forearm_length;

        [
            self.pivot.lerp(elbow, 0.3),
            self.pivot.lerp(elbow, 0.7),
            elbow.lerp(wrist, 0.33),
            elbow.lerp(wrist, 0.66),
            wrist,
        ]
    }
}

/// Shoulder nudge applied per push-out iteration, signed outward per side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushOutStep {
    pub flexion: f32,
    pub yaw: f32,
    pub abduction: f32,
}

impl Default for PushOutStep {
    fn default() -> Self {
        Self {
            flexion: PUSH_FLEXION_STEP,
            yaw: PUSH_YAW_STEP,
            abduction: PUSH_ABDUCTION_STEP,
        }
    }
}

impl PushOutStep {
    /// Shoulder rotation after one nudge, before clamping
    #[inline]
    pub fn apply(&self, shoulder: Vec3, side: ArmSide) -> Vec3 {
        let sign = side.outward_sign();
        Vec3::new(
            shoulder.x + self.flexion,
            shoulder.y - sign * self.yaw,
            shoulder.z + sign * self.abduction,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmConstraintConfig {
    /// When false arms are neither clamped nor pushed, only measured
    pub enabled: bool,
    pub left: ArmLimits,
    pub right: ArmLimits,
    pub collider: TorsoCollider,
    pub max_iterations: u32,
    pub step: PushOutStep,
}

impl Default for ArmConstraintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            left: ArmLimits::LEFT,
            right: ArmLimits::RIGHT,
            collider: TorsoCollider::default(),
            max_iterations: MAX_PUSH_ITERATIONS,
            step: PushOutStep::default(),
        }
    }
}

impl ArmConstraintConfig {
    pub fn limits(&self, side: ArmSide) -> &ArmLimits {
        match side {
            ArmSide::Left => &self.left,
            ArmSide::Right => &self.right,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.left.validate("left")?;
        self.right.validate("right")?;

        let radii = self.collider.radii;
        if !radii.is_finite() || radii.min_element() <= 0.0 {
            return Err(RigError::invalid(
                "arms.collider.radii",
                format!("radii must be positive, got {}", radii),
            ));
        }
        if !self.collider.center.is_finite() {
            return Err(RigError::invalid("arms.collider.center", "must be finite"));
        }
        Ok(())
    }
}

/// Outcome of constraining one arm for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PushOutReport {
    /// Nudges applied
    pub iterations: u32,
    /// True when every sample ended outside the torso
    pub resolved: bool,
    /// Remaining summed penetration
    pub penetration: f32,
}

/// Clamp one arm of `pose` to its limits, then nudge the shoulder outward
/// until its samples clear the torso or the iteration budget runs out.
///
/// A nudge that would deepen the penetration is rejected and ends the loop,
/// so the returned pose is never worse than the clamped input.
pub fn constrain_arm(config: &ArmConstraintConfig, side: ArmSide, pose: &mut Pose) -> PushOutReport {
    let limits = config.limits(side);
    let geometry = ArmGeometry::for_side(side);
    let collider = &config.collider;

    let mut shoulder = pose[side.shoulder()];
    let mut elbow = pose[side.elbow()];
    limits.clamp(&mut shoulder, &mut elbow);

    let mut deficit = collider.deficit(&geometry.samples(shoulder, elbow.x));
    let mut iterations = 0;

    while deficit > 0.0 && iterations < config.max_iterations {
        let candidate = limits.clamp_shoulder(config.step.apply(shoulder, side));
        let candidate_deficit = collider.deficit(&geometry.samples(candidate, elbow.x));
        if candidate_deficit > deficit {
            log::debug!(
                "{:?} arm push-out stalled after {} iterations (penetration {:.4})",
                side,
                iterations,
                deficit
            );
            break;
        }
        shoulder = candidate;
        deficit = candidate_deficit;
        iterations += 1;
    }

    if deficit > 0.0 && iterations == config.max_iterations {
        log::debug!(
            "{:?} arm still inside torso after {} iterations (penetration {:.4})",
            side,
            iterations,
            deficit
        );
    }

    pose[side.shoulder()] = shoulder;
    pose[side.elbow()] = elbow;

    PushOutReport {
        iterations,
        resolved: deficit <= 0.0,
        penetration: deficit,
    }
}

/// Penetration of one arm as posed, without changing it
pub fn measure_arm(config: &ArmConstraintConfig, side: ArmSide, pose: &Pose) -> PushOutReport {
    let geometry = ArmGeometry::for_side(side);
    let penetration = config
        .collider
        .deficit(&geometry.samples(pose[side.shoulder()], pose[side.elbow()].x));

    PushOutReport {
        iterations: 0,
        resolved: penetration <= 0.0,
        penetration,
    }
}

/// Constrain both arms, left first
pub fn constrain_arms(config: &ArmConstraintConfig, pose: &mut Pose) -> [PushOutReport; 2] {
    if !config.enabled {
        return ArmSide::ALL.map(|side| measure_arm(config, side, pose));
    }
    ArmSide::ALL.map(|side| constrain_arm(config, side, &mut *pose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use wasm_bindgen_test::*;

    fn arm_pose(side: ArmSide, shoulder: Vec3, elbow: f32) -> Pose {
        Pose::neutral()
            .with_rotation(side.shoulder(), shoulder)
            .with_rotation(side.elbow(), Vec3::new(elbow, 0.0, 0.0))
    }

    fn assert_vec_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).abs().max_element() < 1e-4,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_left_yaw_clamps_to_limit() {
        let config = ArmConstraintConfig::default();
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.1, 2.0, 0.26), 0.17);

        constrain_arm(&config, ArmSide::Left, &mut pose);

        assert_eq!(pose[JointId::LeftShoulder].y, 0.24);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_clamp_is_projection() {
        let mut rng = StdRng::seed_from_u64(3);
        for side in ArmSide::ALL {
            let limits = ArmLimits::for_side(side);
            for _ in 0..500 {
                let mut shoulder = Vec3::new(
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                );
                let mut elbow = Vec3::new(rng.random_range(-1.0..3.0), 0.0, 0.0);
                limits.clamp(&mut shoulder, &mut elbow);
                assert!(limits.contains(shoulder, elbow));

                // Clamping an in-range arm is the identity
                let (before_shoulder, before_elbow) = (shoulder, elbow);
                limits.clamp(&mut shoulder, &mut elbow);
                assert_eq!(shoulder, before_shoulder);
                assert_eq!(elbow, before_elbow);
            }
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_neutral_arms_are_clear() {
        let config = ArmConstraintConfig::default();
        let mut pose = Pose::neutral();

        let reports = constrain_arms(&config, &mut pose);

        for report in reports {
            assert_eq!(report.iterations, 0);
            assert!(report.resolved);
            assert_eq!(report.penetration, 0.0);
        }
        assert_eq!(pose, Pose::neutral());
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_tucked_left_arm_pushed_out() {
        let config = ArmConstraintConfig::default();
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.1, -0.08, 0.08), 0.17);

        let report = constrain_arm(&config, ArmSide::Left, &mut pose);

        assert_eq!(report.iterations, 2);
        assert!(report.resolved);
        assert_vec_close(pose[JointId::LeftShoulder], Vec3::new(0.18, -0.24, 0.18));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_right_arm_push_is_mirrored() {
        let config = ArmConstraintConfig::default();
        let mut pose = arm_pose(ArmSide::Right, Vec3::new(0.1, 0.08, -0.08), 0.17);

        let report = constrain_arm(&config, ArmSide::Right, &mut pose);

        assert_eq!(report.iterations, 2);
        assert!(report.resolved);
        assert_vec_close(pose[JointId::RightShoulder], Vec3::new(0.18, 0.24, -0.18));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_unresolved_after_iteration_budget() {
        let config = ArmConstraintConfig::default();
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.0, -1.05, 0.08), 0.0);

        let report = constrain_arm(&config, ArmSide::Left, &mut pose);

        assert_eq!(report.iterations, MAX_PUSH_ITERATIONS);
        assert!(!report.resolved);
        assert!(
            report.penetration > 0.005 && report.penetration < 0.012,
            "penetration {}",
            report.penetration
        );
        // Yaw is pinned at its limit, the other axes keep moving outward
        assert_vec_close(pose[JointId::LeftShoulder], Vec3::new(0.16, -1.05, 0.28));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_other_arm_untouched() {
        let config = ArmConstraintConfig::default();
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.1, -0.08, 0.08), 0.17);
        let right_before = pose[JointId::RightShoulder];

        constrain_arm(&config, ArmSide::Left, &mut pose);

        assert_eq!(pose[JointId::RightShoulder], right_before);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_push_out_never_deepens_penetration() {
        let config = ArmConstraintConfig::default();
        let mut rng = StdRng::seed_from_u64(19);

        for _ in 0..400 {
            for side in ArmSide::ALL {
                let shoulder = Vec3::new(
                    rng.random_range(-1.5..1.0),
                    rng.random_range(-1.2..1.2),
                    rng.random_range(-1.3..1.3),
                );
                let elbow = rng.random_range(0.0..2.1);
                let mut pose = arm_pose(side, shoulder, elbow);

                let limits = config.limits(side);
                let clamped = limits.clamp_shoulder(shoulder);
                let geometry = ArmGeometry::for_side(side);
                let before = config
                    .collider
                    .deficit(&geometry.samples(clamped, limits.elbow.clamp(elbow)));

                let report = constrain_arm(&config, side, &mut pose);

                assert!(report.iterations <= config.max_iterations);
                assert!(
                    report.penetration <= before + 1e-6,
                    "{:?} {} went from {} to {}",
                    side,
                    shoulder,
                    before,
                    report.penetration
                );
                assert!(limits.contains(pose[side.shoulder()], pose[side.elbow()]));
            }
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_collider_inside_and_outside() {
        let collider = TorsoCollider::default();
        assert!(collider.contains(TORSO_CENTER));
        assert_eq!(collider.penetration(TORSO_CENTER), 1.0);
        assert!(!collider.contains(TORSO_CENTER + Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(collider.penetration(Vec3::new(3.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_zero_iterations_only_clamps() {
        let config = ArmConstraintConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.1, -0.08, 0.08), 0.17);

        let report = constrain_arm(&config, ArmSide::Left, &mut pose);

        assert_eq!(report.iterations, 0);
        assert!(!report.resolved);
        assert_eq!(pose[JointId::LeftShoulder], Vec3::new(0.1, -0.08, 0.08));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_disabled_filter_only_measures() {
        let config = ArmConstraintConfig {
            enabled: false,
            ..Default::default()
        };
        let mut pose = arm_pose(ArmSide::Left, Vec3::new(0.1, 2.0, 0.08), 0.17);
        let before = pose;

        let [left, right] = constrain_arms(&config, &mut pose);

        assert_eq!(pose, before);
        assert_eq!(left.iterations, 0);
        assert!(right.resolved);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_config_rejects_inverted_range() {
        let mut config = ArmConstraintConfig::default();
        config.left.yaw = AngleRange::new(0.5, -0.5);
        assert!(config.validate().is_err());

        let mut config = ArmConstraintConfig::default();
        config.collider.radii = Vec3::new(0.9, 0.0, 0.8);
        assert!(config.validate().is_err());
    }
}
