//! Tunables for the animator, loadable from JSON.
//!
//! Every field has a default matching the stock character, so an empty
//! object (`{}`) is a valid configuration.

use crate::action::Action;
use crate::constraint::ArmConstraintConfig;
use crate::error::{Result, RigError};
use crate::joint::{Channel, JointGroup};
use serde::{Deserialize, Serialize};

/// Per-group damping rates (1/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DampingRates {
    pub shoulder: f32,
    pub elbow: f32,
    pub hip: f32,
    pub knee: f32,
    pub body: f32,
    pub head: f32,
    pub root_height: f32,
    pub root_yaw: f32,
    /// Recovery rate of the eyelids after a blink
    pub blink: f32,
}

impl Default for DampingRates {
    fn default() -> Self {
        Self {
            shoulder: 10.0,
            elbow: 12.0,
            hip: 8.0,
            knee: 8.0,
            body: 7.0,
            head: 7.0,
            root_height: 8.0,
            root_yaw: 7.0,
            blink: 14.0,
        }
    }
}

impl DampingRates {
    #[inline]
    pub fn for_group(&self, group: JointGroup) -> f32 {
        match group {
            JointGroup::Body => self.body,
            JointGroup::Head => self.head,
            JointGroup::Shoulder => self.shoulder,
            JointGroup::Elbow => self.elbow,
            JointGroup::Hip => self.hip,
            JointGroup::Knee => self.knee,
        }
    }

    fn validate(&self) -> Result<()> {
        let rates = [
            ("damping.shoulder", self.shoulder),
            ("damping.elbow", self.elbow),
            ("damping.hip", self.hip),
            ("damping.knee", self.knee),
            ("damping.body", self.body),
            ("damping.head", self.head),
            ("damping.root_height", self.root_height),
            ("damping.root_yaw", self.root_yaw),
            ("damping.blink", self.blink),
        ];
        for (field, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(RigError::invalid(
                    field,
                    format!("rate must be positive and finite, got {}", rate),
                ));
            }
        }
        Ok(())
    }
}

/// Which channels are compared against neutral before an action switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMode {
    /// Shoulder and elbow swing, torso lean and root yaw only
    #[default]
    Diagnostic,
    /// Every joint axis and both root offsets
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatorConfig {
    pub damping: DampingRates,
    /// Deviation below which the rig counts as back at neutral
    pub neutral_epsilon: f32,
    pub deviation: DeviationMode,
    /// Force the pending action after this many seconds in transition.
    /// `None` waits for convergence indefinitely.
    pub transition_timeout: Option<f32>,
    /// Longest frame step accepted by `tick` (seconds)
    pub max_frame_delta: f32,
    /// Action running when the animator starts
    pub initial_action: Action,
    pub arms: ArmConstraintConfig,
    /// Index into the built-in appearance presets
    pub initial_preset: usize,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            damping: DampingRates::default(),
            neutral_epsilon: 0.05,
            deviation: DeviationMode::default(),
            transition_timeout: None,
            max_frame_delta: 0.25,
            initial_action: Action::Idle,
            arms: ArmConstraintConfig::default(),
            initial_preset: 0,
        }
    }
}

impl AnimatorConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnimatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.damping.validate()?;

        if !self.neutral_epsilon.is_finite() || self.neutral_epsilon <= 0.0 {
            return Err(RigError::invalid(
                "neutral_epsilon",
                format!("must be positive, got {}", self.neutral_epsilon),
            ));
        }
        if let Some(timeout) = self.transition_timeout {
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err(RigError::invalid(
                    "transition_timeout",
                    format!("must be positive seconds, got {}", timeout),
                ));
            }
        }
        if !self.max_frame_delta.is_finite() || self.max_frame_delta <= 0.0 {
            return Err(RigError::invalid(
                "max_frame_delta",
                format!("must be positive, got {}", self.max_frame_delta),
            ));
        }

        self.arms.validate()
    }

    /// Channels compared against neutral while transitioning
    pub fn channels(&self) -> Vec<Channel> {
        match self.deviation {
            DeviationMode::Diagnostic => Channel::DIAGNOSTIC.to_vec(),
            DeviationMode::Full => Channel::all(),
        }
    }
}
