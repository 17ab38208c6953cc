use crate::action::{base_pose, Action};
use crate::config::AnimatorConfig;
use crate::constraint::{constrain_arms, PushOutReport};
use crate::joint::{Channel, Pose, Rig};
use serde::Serialize;

/// Whether the driver is playing an action or returning to neutral first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Action,
    TransitioningToNeutral,
}

/// Result of one driver frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameStep {
    /// Measured distance from neutral, only while transitioning
    pub deviation: Option<f32>,
    /// The pending action became current this frame
    pub switched: bool,
    /// Left then right arm
    pub arms: [PushOutReport; 2],
}

/// Action state machine.
///
/// Every action change goes through the neutral stance: a request moves the
/// driver into `TransitioningToNeutral`, and the pending action only becomes
/// current once the live rig is close enough to neutral.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    current: Action,
    target: Action,
    phase: Phase,
    /// Seconds spent in the current transition
    transition_time: f32,
    channels: Vec<Channel>,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(&AnimatorConfig::default())
    }
}

impl AnimationDriver {
    pub fn new(config: &AnimatorConfig) -> Self {
        Self {
            current: config.initial_action,
            target: config.initial_action,
            phase: Phase::Action,
            transition_time: 0.0,
            channels: config.channels(),
        }
    }

    #[inline]
    pub fn current(&self) -> Action {
        self.current
    }

    /// Action waiting for the rig to reach neutral
    pub fn pending(&self) -> Option<Action> {
        match self.phase {
            Phase::Action => None,
            Phase::TransitioningToNeutral => Some(self.target),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ask for a new action.
    ///
    /// Returns false when `action` is already what the driver is heading for.
    /// A request made mid-transition replaces the pending action without
    /// restarting the transition.
    pub fn request(&mut self, action: Action) -> bool {
        let heading_for = match self.phase {
            Phase::Action => self.current,
            Phase::TransitioningToNeutral => self.target,
        };
        if action == heading_for {
            return false;
        }

        self.target = action;
        if self.phase == Phase::Action {
            self.phase = Phase::TransitioningToNeutral;
            self.transition_time = 0.0;
        }
        log::info!("Action requested: {} (current {})", action, self.current);
        true
    }

    /// Pose the rig is damped toward this frame, before constraints
    pub fn desired_pose(&self, t: f64) -> Pose {
        let mut pose = base_pose(t);
        if self.phase == Phase::Action {
            self.current.apply(&mut pose, t);
        }
        pose
    }

    /// Check whether the live rig has settled at neutral and, if so, promote
    /// the pending action. Returns the measured deviation and whether the
    /// switch happened.
    pub fn advance(&mut self, rig: &Rig, config: &AnimatorConfig, dt: f32) -> (Option<f32>, bool) {
        if self.phase != Phase::TransitioningToNeutral {
            return (None, false);
        }

        self.transition_time += dt;
        let deviation = rig.deviation(&Pose::neutral(), &self.channels);

        let settled = deviation < config.neutral_epsilon;
        let timed_out = config
            .transition_timeout
            .is_some_and(|timeout| self.transition_time >= timeout);

        if settled || timed_out {
            if !settled {
                log::warn!(
                    "Forcing {} after {:.2}s, rig still {:.3} from neutral",
                    self.target,
                    self.transition_time,
                    deviation
                );
            }
            self.current = self.target;
            self.phase = Phase::Action;
            self.transition_time = 0.0;
            log::info!("Action started: {}", self.current);
            return (Some(deviation), true);
        }

        (Some(deviation), false)
    }

    /// Run one frame: build the target from the phase at frame start, settle
    /// any transition, constrain the arms, then blend the rig.
    pub fn frame(&mut self, rig: &mut Rig, config: &AnimatorConfig, t: f64, dt: f32) -> FrameStep {
        let mut target = self.desired_pose(t);
        let (deviation, switched) = self.advance(rig, config, dt);
        let arms = constrain_arms(&config.arms, &mut target);
        rig.blend_toward(&target, &config.damping, dt);

        FrameStep {
            deviation,
            switched,
            arms,
        }
    }
}
