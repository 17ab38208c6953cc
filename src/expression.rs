//! Face and overlay effects that ride on top of the joint animation.

use crate::action::Action;
use crate::animation::Phase;
use crate::math::{damp, oscillate};
use serde::Serialize;

/// Eyelid value below which the eyes are drawn fully closed
const MIN_EYE_SCALE: f32 = 0.2;
/// `sin(2.9t)` peaks above this for a few frames every ~2.2s
const BLINK_TRIGGER: f32 = 0.992;
const BLINK_FREQUENCY: f64 = 2.9;

/// Periodic blink. `value` is 1 with the eyes open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    value: f32,
}

impl Default for Blink {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl Blink {
    pub fn update(&mut self, t: f64, rate: f32, dt: f32) {
        if oscillate(t, BLINK_FREQUENCY) > BLINK_TRIGGER {
            self.value = MIN_EYE_SCALE;
        }
        self.value = damp(self.value, 1.0, rate, dt);
    }

    /// Vertical scale for the eye meshes
    #[inline]
    pub fn eye_scale(&self) -> f32 {
        self.value.clamp(MIN_EYE_SCALE, 1.0)
    }
}

/// Pulsing heart shown while the heart action plays
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HeartOverlay {
    pub visible: bool,
    pub scale: f32,
    pub opacity: f32,
}

impl HeartOverlay {
    pub fn at(active: bool, t: f64) -> Self {
        if !active {
            return Self::default();
        }
        let wave = oscillate(t, 6.0);
        Self {
            visible: true,
            scale: 0.4 * (1.0 + wave * 0.12),
            opacity: 0.66 + 0.26 * (wave * 0.5 + 0.5),
        }
    }
}

/// Falling tear drops shown while crying
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TearOverlay {
    pub visible: bool,
    /// Fall progress of the current drop, 0 at the eye and 1 at the chin
    pub progress: f32,
}

impl TearOverlay {
    pub fn at(active: bool, t: f64) -> Self {
        if !active {
            return Self::default();
        }
        // A fraction just under 1 may narrow to exactly 1
        let progress = (t * 1.6).fract() as f32;
        Self {
            visible: true,
            progress: progress.fract(),
        }
    }
}

/// Everything non-skeletal that changes per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expression {
    pub blink: Blink,
    pub heart: HeartOverlay,
    pub tear: TearOverlay,
}

impl Expression {
    /// Refresh after the action state for this frame is settled
    pub fn update(&mut self, current: Action, phase: Phase, t: f64, blink_rate: f32, dt: f32) {
        self.blink.update(t, blink_rate, dt);

        let playing = |action: Action| current == action && phase == Phase::Action;
        self.heart = HeartOverlay::at(playing(Action::Heart), t);
        self.tear = TearOverlay::at(playing(Action::Cry), t);
    }
}
