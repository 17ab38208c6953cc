//! Centralized application state with context passing pattern
//!
//! `AppState` owns everything one animated character needs. Core logic lives
//! in the modules that own each concern and takes explicit references; the
//! wasm `App` handle is a thin wrapper around a single `AppState`.
//!
//! Several characters on one page are simply several `App` values.

use crate::action::Action;
use crate::animation::{AnimationDriver, FrameStep, Phase};
use crate::appearance::Appearance;
use crate::camera::Camera;
use crate::config::AnimatorConfig;
use crate::error::Result;
use crate::expression::Expression;
use crate::frame::{joint_buffer, joint_samples, FrameSnapshot};
use crate::joint::Rig;
use serde::Serialize;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Summary of one `tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub phase: Phase,
    pub current: Action,
    #[serde(flatten)]
    pub step: FrameStep,
}

pub struct AppState {
    pub config: AnimatorConfig,
    /// Live joint rotations
    pub rig: Rig,
    pub driver: AnimationDriver,
    pub expression: Expression,
    pub appearance: Appearance,
    /// Camera orientation and distance
    pub camera: Camera,
    /// Seconds since start, the clock every action pose reads
    pub elapsed: f64,
    last_step: FrameStep,
}

impl AppState {
    /// Build state from a validated configuration
    pub fn new(config: AnimatorConfig) -> Result<Self> {
        config.validate()?;
        let appearance = Appearance::builtin(config.initial_preset)?;

        Ok(Self {
            driver: AnimationDriver::new(&config),
            rig: Rig::new(),
            expression: Expression::default(),
            appearance,
            camera: Camera::default(),
            elapsed: 0.0,
            last_step: FrameStep::default(),
            config,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(AnimatorConfig::from_json(json)?)
    }

    /// Sanitize a host frame delta: non-finite or negative becomes 0, long
    /// stalls are capped.
    pub fn clamp_delta(&self, delta_seconds: f32) -> f32 {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return 0.0;
        }
        delta_seconds.min(self.config.max_frame_delta)
    }

    /// Advance everything by one frame
    pub fn tick(&mut self, delta_seconds: f32) -> TickReport {
        let dt = self.clamp_delta(delta_seconds);
        self.elapsed += f64::from(dt);
        let t = self.elapsed;

        let step = self.driver.frame(&mut self.rig, &self.config, t, dt);
        self.expression.update(
            self.driver.current(),
            self.driver.phase(),
            t,
            self.config.damping.blink,
            dt,
        );
        self.last_step = step;

        TickReport {
            phase: self.driver.phase(),
            current: self.driver.current(),
            step,
        }
    }

    /// Request an action by its button name.
    ///
    /// Unknown names are logged and ignored. Returns whether the request
    /// changed the action the rig is heading for.
    pub fn request_action(&mut self, name: &str) -> bool {
        match name.parse::<Action>() {
            Ok(action) => self.driver.request(action),
            Err(err) => {
                log::warn!("Ignoring action request: {}", err);
                false
            }
        }
    }

    pub fn joint_buffer(&self) -> Vec<f32> {
        joint_buffer(self.rig.pose())
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let pose = self.rig.pose();
        FrameSnapshot {
            elapsed: self.elapsed,
            phase: self.driver.phase(),
            current_action: self.driver.current(),
            pending_action: self.driver.pending(),
            deviation: self.last_step.deviation,
            root_height: pose.root_height,
            root_yaw: pose.root_yaw,
            joints: joint_samples(pose),
            arms: self.last_step.arms,
            eye_scale: self.expression.blink.eye_scale(),
            heart: self.expression.heart,
            tear: self.expression.tear,
            appearance: &self.appearance,
            camera_eye: self.camera.eye_position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::JointId;
    use wasm_bindgen_test::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    #[wasm_bindgen_test]
    fn test_unknown_action_is_ignored() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();
        state.tick(DT);

        assert!(!state.request_action("foo"));
        let report = state.tick(DT);

        assert_eq!(report.current, Action::Idle);
        assert_eq!(report.phase, Phase::Action);
        assert_eq!(state.driver.pending(), None);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_wave_flow() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();

        assert!(state.request_action("wave"));
        assert!(!state.request_action("wave"));
        assert_eq!(state.driver.phase(), Phase::TransitioningToNeutral);

        let report = state.tick(DT);
        assert!(report.step.switched);
        assert_eq!(report.current, Action::Wave);

        for _ in 0..90 {
            state.tick(DT);
        }
        // Right arm raised forward, elbow bent
        assert!(state.rig.rotation(JointId::RightShoulder).x < -1.0);
        assert!(state.rig.rotation(JointId::RightElbow).x > 0.8);
        assert!(!state.expression.heart.visible);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_heart_overlay_follows_action() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();
        state.request_action("heart");
        state.tick(DT);
        assert!(state.expression.heart.visible);

        state.request_action("idle");
        state.tick(DT);
        assert!(!state.expression.heart.visible);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_bad_frame_deltas_are_sanitized() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();

        state.tick(f32::NAN);
        state.tick(-1.0);
        state.tick(f32::INFINITY);
        assert_eq!(state.elapsed, 0.0);

        state.tick(10.0);
        assert_eq!(state.elapsed, 0.25);
        assert!(state.rig.pose().rotations.iter().all(|r| r.is_finite()));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_clock_keeps_pace_after_a_week() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();
        let start = 600_000.0;
        state.elapsed = start;

        let mut sway = Vec::new();
        for _ in 0..60 {
            state.tick(DT);
            sway.push(state.rig.rotation(JointId::Body).z);
        }

        let advanced = state.elapsed - start;
        assert!((advanced - 1.0).abs() < 1e-5, "advanced {}s", advanced);
        // Idle sway still drives the body every frame
        assert!(sway.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_initial_action_and_preset_from_config() {
        let state =
            AppState::from_json(r#"{ "initial_action": "dance", "initial_preset": 3 }"#).unwrap();
        assert_eq!(state.driver.current(), Action::Dance);
        assert_eq!(state.appearance.active_preset, Some(3));

        assert!(AppState::from_json(r#"{ "initial_preset": 42 }"#).is_err());
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_arms_stay_in_range_through_every_action() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();
        let arms = state.config.arms.clone();
        let within = |range: &crate::constraint::AngleRange, v: f32| {
            v >= range.min - 1e-5 && v <= range.max + 1e-5
        };

        for action in Action::ALL {
            state.request_action(action.name());
            for _ in 0..120 {
                let report = state.tick(DT);
                let pose = state.rig.pose();
                for side in crate::constraint::ArmSide::ALL {
                    let limits = arms.limits(side);
                    let shoulder = pose[side.shoulder()];
                    // Live rig damps toward clamped targets, so it stays in the box
                    assert!(
                        within(&limits.flexion, shoulder.x)
                            && within(&limits.yaw, shoulder.y)
                            && within(&limits.abduction, shoulder.z)
                            && within(&limits.elbow, pose[side.elbow()].x),
                        "{}: {:?} arm out of range: {}",
                        action,
                        side,
                        shoulder
                    );
                }
                assert!(report.step.arms.iter().all(|arm| arm.iterations <= 4));
            }
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_snapshot_reflects_state() {
        let mut state = AppState::new(AnimatorConfig::default()).unwrap();
        state.request_action("cry");
        state.tick(DT);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.current_action, Action::Cry);
        assert!(snapshot.tear.visible);
        assert_eq!(snapshot.joints.len(), JointId::COUNT);
        assert_eq!(state.joint_buffer().len(), crate::frame::RECORD_COUNT * 8);
    }
}

/// Handle owned by the host page, one per animated character
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct App {
    pub(crate) state: AppState,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Create an animator with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<App, JsValue> {
        crate::init_logging();
        let state = AppState::new(AnimatorConfig::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(App { state })
    }

    /// Create an animator from a JSON configuration
    pub fn with_config(json: &str) -> std::result::Result<App, JsValue> {
        crate::init_logging();
        let state = AppState::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(App { state })
    }

    /// Advance simulation time (call each frame with delta time in seconds)
    pub fn tick(&mut self, delta_seconds: f32) -> std::result::Result<JsValue, JsValue> {
        let report = self.state.tick(delta_seconds);
        serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
    }

    /// Returns false for unknown names and for the action already playing
    pub fn request_action(&mut self, name: &str) -> bool {
        self.state.request_action(name)
    }

    /// Root record followed by one record per joint, 8 floats each
    /// Returned to JS as a Float32Array
    pub fn joint_buffer(&self) -> Vec<f32> {
        self.state.joint_buffer()
    }

    pub fn snapshot(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.snapshot()).map_err(JsValue::from)
    }

    pub fn current_action(&self) -> String {
        self.state.driver.current().name().to_string()
    }
}
