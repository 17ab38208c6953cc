//! Plush Rig - Wasm Core
//!
//! Procedural joint animation for a soft toy character: action poses, eased
//! blending through a neutral stance, and arm limits that keep the arms out
//! of the torso. Rendering stays on the JS side, which reads the joint buffer
//! every frame.

pub mod action;
pub mod animation;
pub mod appearance;
pub mod camera;
pub mod config;
pub mod constraint;
pub mod error;
pub mod expression;
pub mod frame;
pub mod joint;
mod math;
mod rig_constants;
pub mod state;

pub use action::Action;
pub use animation::{AnimationDriver, Phase};
pub use config::AnimatorConfig;
pub use error::RigError;
pub use glam::Vec3;
pub use joint::{JointId, Pose, Rig};
pub use math::damp;
pub use state::AppState;

#[cfg(target_arch = "wasm32")]
pub use state::App;

/// Install the panic hook and console logger once per page
#[cfg(target_arch = "wasm32")]
pub(crate) fn init_logging() {
    console_error_panic_hook::set_once();

    cfg_if::cfg_if! {
        if #[cfg(debug_assertions)] {
            const LOG_LEVEL: log::Level = log::Level::Debug;
        } else {
            const LOG_LEVEL: log::Level = log::Level::Info;
        }
    }
    // Errors only when a logger is already installed
    console_log::init_with_level(LOG_LEVEL).ok();
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;
    wasm_bindgen_test_configure!(run_in_browser);
}
