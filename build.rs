//! Build script for rig data validation
//!
//! This script runs at compile time and checks the bundled appearance presets
//! and the rig constants shared with the runtime, so a bad edit fails the
//! build instead of producing a broken character.

// Include the shared rig constants
#[path = "src/rig_constants.rs"]
mod rig_constants;

use glam::Vec3;
use rig_constants::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Appearance preset from JSON
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Preset {
    name: String,
    base_color: String,
    eye_color: String,
    badge_color: String,
    #[allow(dead_code)]
    show_badge: bool,
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Validate the preset file
fn validate_presets(path: &Path) -> Result<usize, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let presets: Vec<Preset> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    if presets.is_empty() {
        return Err(format!("{} contains no presets", path.display()));
    }

    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (i, preset) in presets.iter().enumerate() {
        if preset.name.trim().is_empty() {
            errors.push(format!("  preset {} has an empty name", i));
        }
        if !names.insert(preset.name.to_lowercase()) {
            errors.push(format!("  duplicate preset name '{}'", preset.name));
        }
        for (field, value) in [
            ("base_color", &preset.base_color),
            ("eye_color", &preset.eye_color),
            ("badge_color", &preset.badge_color),
        ] {
            if !is_hex_color(value) {
                errors.push(format!(
                    "  preset '{}' {}: '{}' is not #rgb or #rrggbb",
                    preset.name, field, value
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(presets.len())
    } else {
        Err(format!("Invalid presets:\n{}", errors.join("\n")))
    }
}

/// Check that the neutral arms sit inside their own joint limits
fn validate_arm_limits() -> Vec<String> {
    let mut errors = Vec::new();

    let check = |errors: &mut Vec<String>, name: &str, value: f32, range: (f32, f32)| {
        if range.0 > range.1 {
            errors.push(format!("  {} range [{}, {}] is empty", name, range.0, range.1));
        } else if value < range.0 || value > range.1 {
            errors.push(format!(
                "  {}: neutral {:.3} outside [{:.3}, {:.3}]",
                name, value, range.0, range.1
            ));
        }
    };

    let arms: [(&str, Vec3, (f32, f32), (f32, f32)); 2] = [
        (
            "Left",
            NEUTRAL_LEFT_SHOULDER,
            LEFT_SHOULDER_YAW_RANGE,
            LEFT_SHOULDER_ABDUCTION_RANGE,
        ),
        (
            "Right",
            NEUTRAL_RIGHT_SHOULDER,
            RIGHT_SHOULDER_YAW_RANGE,
            RIGHT_SHOULDER_ABDUCTION_RANGE,
        ),
    ];

    for (side, shoulder, yaw, abduction) in arms {
        check(
            &mut errors,
            &format!("{} shoulder flexion", side),
            shoulder.x,
            SHOULDER_FLEXION_RANGE,
        );
        check(&mut errors, &format!("{} shoulder yaw", side), shoulder.y, yaw);
        check(
            &mut errors,
            &format!("{} shoulder abduction", side),
            shoulder.z,
            abduction,
        );
        check(
            &mut errors,
            &format!("{} elbow", side),
            NEUTRAL_ELBOW.x,
            ELBOW_FLEXION_RANGE,
        );
    }

    // Mirrored pivots keep the push-out symmetric
    if LEFT_SHOULDER_PIVOT.x != -RIGHT_SHOULDER_PIVOT.x || LEFT_SHOULDER_PIVOT.x <= 0.0 {
        errors.push("  shoulder pivots must mirror with the left side at +X".to_string());
    }
    if TORSO_RADII.min_element() <= 0.0 {
        errors.push(format!("  torso radii {} must be positive", TORSO_RADII));
    }

    errors
}

fn main() {
    // Rerun if shared constants change
    println!("cargo:rerun-if-changed=src/rig_constants.rs");

    let mut has_errors = false;

    let arm_errors = validate_arm_limits();
    if arm_errors.is_empty() {
        println!("cargo:warning=✓ arm limits validated");
    } else {
        println!(
            "cargo:warning=VALIDATION ERROR: Invalid arm limits:\n{}",
            arm_errors.join("\n")
        );
        has_errors = true;
    }

    let presets_path = Path::new("assets/presets.json");
    println!("cargo:rerun-if-changed={}", presets_path.display());

    match validate_presets(presets_path) {
        Ok(count) => println!("cargo:warning=✓ {} presets validated", count),
        Err(e) => {
            println!("cargo:warning=VALIDATION ERROR: {}", e);
            has_errors = true;
        }
    }

    if has_errors {
        panic!("Rig data validation failed! Fix the presets or rig constants.");
    }
}
