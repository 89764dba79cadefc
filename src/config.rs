//! Game configuration and theming
//!
//! A complete `GameConfig` is merged from host-supplied partial overrides
//! (`ConfigPatch`) over built-in defaults. Every leaf of the merged config is
//! concrete; invalid override values are replaced by their defaults with a
//! logged warning rather than an error.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ANIMATION_SPEED;

/// Theme colors (CSS color strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#4ecca3".into(),
            secondary: "#e94560".into(),
            background: "#1a1a2e".into(),
            text: "#ffffff".into(),
        }
    }
}

/// Font settings for text overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyConfig {
    pub font_family: String,
    /// Pixel sizes for small/medium/large text
    pub size_small: f32,
    pub size_medium: f32,
    pub size_large: f32,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            font_family: "'Courier New', monospace".into(),
            size_small: 12.0,
            size_medium: 16.0,
            size_large: 24.0,
        }
    }
}

/// Shape styling (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingConfig {
    pub border_radius: f32,
    pub border_width: f32,
    pub shadow_blur: f32,
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            border_radius: 4.0,
            border_width: 2.0,
            shadow_blur: 0.0,
        }
    }
}

/// Simulation pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Multiplier applied to elapsed time (1.0 = normal speed)
    pub speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

/// Audio preferences (playback itself is host-side)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            muted: false,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub colors: ColorConfig,
    pub typography: TypographyConfig,
    pub styling: StylingConfig,
    pub animation: AnimationConfig,
    pub audio: AudioConfig,
}

/// Partial color overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPatch {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
}

/// Partial typography overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyPatch {
    pub font_family: Option<String>,
    pub size_small: Option<f32>,
    pub size_medium: Option<f32>,
    pub size_large: Option<f32>,
}

/// Partial styling overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylingPatch {
    pub border_radius: Option<f32>,
    pub border_width: Option<f32>,
    pub shadow_blur: Option<f32>,
}

/// Partial animation overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationPatch {
    pub speed: Option<f32>,
}

/// Partial audio overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioPatch {
    pub volume: Option<f32>,
    pub muted: Option<bool>,
}

/// Host-supplied partial configuration, deep-merged over defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub colors: ColorPatch,
    pub typography: TypographyPatch,
    pub styling: StylingPatch,
    pub animation: AnimationPatch,
    pub audio: AudioPatch,
}

impl GameConfig {
    /// Merge a partial override over the defaults, then validate.
    ///
    /// Out-of-range or malformed values are replaced by their defaults with a
    /// `log::warn!`, never an error.
    pub fn merged(patch: ConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config.validate();
        config
    }

    fn apply(&mut self, patch: ConfigPatch) {
        let ConfigPatch {
            colors,
            typography,
            styling,
            animation,
            audio,
        } = patch;

        merge(&mut self.colors.primary, colors.primary);
        merge(&mut self.colors.secondary, colors.secondary);
        merge(&mut self.colors.background, colors.background);
        merge(&mut self.colors.text, colors.text);

        merge(&mut self.typography.font_family, typography.font_family);
        merge(&mut self.typography.size_small, typography.size_small);
        merge(&mut self.typography.size_medium, typography.size_medium);
        merge(&mut self.typography.size_large, typography.size_large);

        merge(&mut self.styling.border_radius, styling.border_radius);
        merge(&mut self.styling.border_width, styling.border_width);
        merge(&mut self.styling.shadow_blur, styling.shadow_blur);

        merge(&mut self.animation.speed, animation.speed);

        merge(&mut self.audio.volume, audio.volume);
        merge(&mut self.audio.muted, audio.muted);
    }

    /// Replace invalid values with defaults, warning about each.
    fn validate(&mut self) {
        let defaults = Self::default();

        check_color(&mut self.colors.primary, &defaults.colors.primary, "colors.primary");
        check_color(
            &mut self.colors.secondary,
            &defaults.colors.secondary,
            "colors.secondary",
        );
        check_color(
            &mut self.colors.background,
            &defaults.colors.background,
            "colors.background",
        );
        check_color(&mut self.colors.text, &defaults.colors.text, "colors.text");

        if self.typography.font_family.trim().is_empty() {
            log::warn!("config: empty typography.fontFamily, using default");
            self.typography.font_family = defaults.typography.font_family;
        }
        check_range(
            &mut self.typography.size_small,
            defaults.typography.size_small,
            1.0..=256.0,
            "typography.sizeSmall",
        );
        check_range(
            &mut self.typography.size_medium,
            defaults.typography.size_medium,
            1.0..=256.0,
            "typography.sizeMedium",
        );
        check_range(
            &mut self.typography.size_large,
            defaults.typography.size_large,
            1.0..=256.0,
            "typography.sizeLarge",
        );

        check_range(
            &mut self.styling.border_radius,
            defaults.styling.border_radius,
            0.0..=128.0,
            "styling.borderRadius",
        );
        check_range(
            &mut self.styling.border_width,
            defaults.styling.border_width,
            0.0..=64.0,
            "styling.borderWidth",
        );
        check_range(
            &mut self.styling.shadow_blur,
            defaults.styling.shadow_blur,
            0.0..=128.0,
            "styling.shadowBlur",
        );

        if !(self.animation.speed > 0.0 && self.animation.speed <= MAX_ANIMATION_SPEED) {
            log::warn!(
                "config: animation.speed {} out of range (0, {}], using default",
                self.animation.speed,
                MAX_ANIMATION_SPEED
            );
            self.animation.speed = defaults.animation.speed;
        }

        check_range(
            &mut self.audio.volume,
            defaults.audio.volume,
            0.0..=1.0,
            "audio.volume",
        );
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn check_range(
    value: &mut f32,
    default: f32,
    range: std::ops::RangeInclusive<f32>,
    name: &str,
) {
    if !value.is_finite() || !range.contains(value) {
        log::warn!(
            "config: {name} {value} out of range [{}, {}], using default",
            range.start(),
            range.end()
        );
        *value = default;
    }
}

fn check_color(value: &mut String, default: &str, name: &str) {
    if !is_css_color(value) {
        log::warn!("config: {name} {value:?} is not a valid CSS color, using default");
        *value = default.to_string();
    }
}

/// Loose CSS color check: hex, functional (rgb/hsl), or a named color.
fn is_css_color(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = s.to_ascii_lowercase();
    if ["rgb(", "rgba(", "hsl(", "hsla("]
        .iter()
        .any(|p| lower.starts_with(p))
    {
        return lower.ends_with(')');
    }
    // Named colors: letters only
    s.chars().all(|c| c.is_ascii_alphabetic())
}
