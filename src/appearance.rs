//! Colors, presets and cosmetic toggles.
//!
//! None of this touches the rig. The host page reads the resulting
//! `Appearance` and applies it to its materials.

use crate::error::{Result, RigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Built-in presets, validated by build.rs
const PRESETS_JSON: &str = include_str!("../assets/presets.json");

/// sRGB color parsed from `#rgb` or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Color::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = RigError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub name: String,
    pub base_color: Color,
    pub eye_color: Color,
    pub badge_color: Color,
    pub show_badge: bool,
}

/// Parse the bundled preset list
pub fn builtin_presets() -> Result<Vec<Preset>> {
    Ok(serde_json::from_str(PRESETS_JSON)?)
}

/// Which material a color picker edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Base,
    Eye,
    Badge,
}

impl FromStr for ColorSlot {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "body" => Ok(ColorSlot::Base),
            "eye" | "eyes" => Ok(ColorSlot::Eye),
            "badge" => Ok(ColorSlot::Badge),
            _ => Err(RigError::UnknownColorSlot(s.to_string())),
        }
    }
}

/// Boolean cosmetic toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Badge,
    Blush,
    Shadows,
    Particles,
}

impl FromStr for Feature {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "badge" => Ok(Feature::Badge),
            "blush" => Ok(Feature::Blush),
            "shadows" => Ok(Feature::Shadows),
            "particles" => Ok(Feature::Particles),
            _ => Err(RigError::UnknownFeature(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub badge: bool,
    pub blush: bool,
    pub shadows: bool,
    pub particles: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            badge: false,
            blush: false,
            shadows: true,
            particles: false,
        }
    }
}

impl FeatureFlags {
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        let flag = match feature {
            Feature::Badge => &mut self.badge,
            Feature::Blush => &mut self.blush,
            Feature::Shadows => &mut self.shadows,
            Feature::Particles => &mut self.particles,
        };
        *flag = enabled;
    }
}

/// Current look of the character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    #[serde(skip)]
    pub presets: Vec<Preset>,
    /// Preset last applied, cleared by manual edits
    pub active_preset: Option<usize>,
    pub base_color: Color,
    pub eye_color: Color,
    pub badge_color: Color,
    pub features: FeatureFlags,
}

impl Appearance {
    /// Start from preset `index` of `presets`
    pub fn new(presets: Vec<Preset>, index: usize) -> Result<Self> {
        let mut appearance = Self {
            presets,
            active_preset: None,
            base_color: Color::new(0xf7, 0xf8, 0xf9),
            eye_color: Color::new(0x11, 0x11, 0x11),
            badge_color: Color::new(0xf5, 0xb6, 0xd8),
            features: FeatureFlags::default(),
        };
        appearance.apply_preset(index)?;
        Ok(appearance)
    }

    pub fn builtin(index: usize) -> Result<Self> {
        Self::new(builtin_presets()?, index)
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name.clone()).collect()
    }

    /// Replace colors and badge visibility. Other toggles are kept.
    pub fn apply_preset(&mut self, index: usize) -> Result<()> {
        let preset = self.presets.get(index).ok_or_else(|| {
            RigError::UnknownPreset(format!("{} (have {})", index, self.presets.len()))
        })?;
        self.base_color = preset.base_color;
        self.eye_color = preset.eye_color;
        self.badge_color = preset.badge_color;
        self.features.badge = preset.show_badge;
        self.active_preset = Some(index);
        log::info!("Preset applied: {}", preset.name);
        Ok(())
    }

    pub fn apply_preset_named(&mut self, name: &str) -> Result<()> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RigError::UnknownPreset(name.to_string()))?;
        self.apply_preset(index)
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: Color) {
        let target = match slot {
            ColorSlot::Base => &mut self.base_color,
            ColorSlot::Eye => &mut self.eye_color,
            ColorSlot::Badge => &mut self.badge_color,
        };
        *target = color;
        self.active_preset = None;
    }

    pub fn set_feature(&mut self, feature: Feature, enabled: bool) {
        self.features.set(feature, enabled);
        if feature == Feature::Badge {
            self.active_preset = None;
        }
    }
}


// App methods for appearance
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
fn to_js(err: RigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Names of the built-in presets, in button order
    pub fn preset_names(&self) -> Vec<String> {
        self.state.appearance.preset_names()
    }

    pub fn apply_preset(&mut self, index: usize) -> std::result::Result<(), JsValue> {
        self.state.appearance.apply_preset(index).map_err(to_js)
    }

    /// Apply a preset by its display name, ignoring case
    pub fn apply_preset_named(&mut self, name: &str) -> std::result::Result<(), JsValue> {
        self.state.appearance.apply_preset_named(name).map_err(to_js)
    }

    /// Set a material color from a color picker value
    /// slot: "base", "eye" or "badge"
    pub fn set_color(&mut self, slot: &str, hex: &str) -> std::result::Result<(), JsValue> {
        let slot: ColorSlot = slot.parse().map_err(to_js)?;
        let color: Color = hex.parse().map_err(to_js)?;
        self.state.appearance.set_color(slot, color);
        Ok(())
    }

    /// Toggle "badge", "blush", "shadows" or "particles"
    pub fn set_feature(&mut self, name: &str, enabled: bool) -> std::result::Result<(), JsValue> {
        let feature: Feature = name.parse().map_err(to_js)?;
        self.state.appearance.set_feature(feature, enabled);
        Ok(())
    }
}
