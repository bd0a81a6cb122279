//! Generation parameters.
//!
//! Sensible defaults for a 64x64 still sprite, loadable from JSON with any
//! subset of fields present.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorStyle;
use crate::error::{ConfigError, ConfigResult};
use crate::palette::PaletteMode;
use crate::shape::NoiseStyle;

/// Smallest sprite the pipeline can lay out a head and body in.
pub const MIN_DIMENSION: usize = 8;

/// Everything that shapes one sprite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Side length of the square grid, in cells
    pub dimension: usize,
    /// Border cells that always stay empty
    pub margin: usize,
    pub noise_style: NoiseStyle,
    pub palette_mode: PaletteMode,
    pub color_style: ColorStyle,
    /// Palette length
    pub number_of_colors: usize,
    /// Spots or stripes on the body
    pub draw_patterns: bool,
    /// Dark rim around body and head
    pub draw_outline: bool,
    /// Frames in the idle loop (1 = still)
    pub frame_count: usize,
    /// Squash-stretch strength, 1.0 = about 6% at peak
    pub animation_intensity: f32,
    /// Per-frame delay for animated output
    pub frame_delay_ms: u32,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            dimension: 64,
            margin: 3,
            noise_style: NoiseStyle::Detailed,
            palette_mode: PaletteMode::Monochrome,
            color_style: ColorStyle::Harmonious,
            number_of_colors: 6,
            draw_patterns: false,
            draw_outline: true,
            frame_count: 1,
            animation_intensity: 1.0,
            frame_delay_ms: 100,
            seed: None,
        }
    }
}

impl MonsterConfig {
    /// Idle-loop preset: eight frames at 100 ms.
    pub fn animated() -> Self {
        Self {
            frame_count: 8,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dimension < MIN_DIMENSION {
            return Err(ConfigError::invalid(format!(
                "dimension {} is below the minimum of {}",
                self.dimension, MIN_DIMENSION
            )));
        }
        if 2 * self.margin + 4 > self.dimension {
            return Err(ConfigError::invalid(format!(
                "margin {} leaves no room in a {}x{} grid",
                self.margin, self.dimension, self.dimension
            )));
        }
        if self.number_of_colors == 0 {
            return Err(ConfigError::invalid("number_of_colors must be at least 1"));
        }
        if self.frame_count == 0 {
            return Err(ConfigError::invalid("frame_count must be at least 1"));
        }
        if !self.animation_intensity.is_finite() || self.animation_intensity < 0.0 {
            return Err(ConfigError::invalid(format!(
                "animation_intensity must be a non-negative number, got {}",
                self.animation_intensity
            )));
        }
        Ok(())
    }

    /// Parse JSON; absent fields keep their defaults. The result is validated.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialisation cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MonsterConfig::default();
        assert_eq!(config.dimension, 64);
        assert_eq!(config.margin, 3);
        assert_eq!(config.noise_style, NoiseStyle::Detailed);
        assert_eq!(config.number_of_colors, 6);
        assert_eq!(config.frame_count, 1);
        assert!(config.draw_outline);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = MonsterConfig::from_json_str(r#"{"dimension": 32, "seed": 7, "palette_mode": "Triadic"}"#).unwrap();
        assert_eq!(config.dimension, 32);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.palette_mode, PaletteMode::Triadic);
        assert_eq!(config.margin, 3);
        assert_eq!(config.frame_delay_ms, 100);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MonsterConfig::animated().with_seed(99);
        let back = MonsterConfig::from_json_str(&config.to_json()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            MonsterConfig { dimension: 4, ..Default::default() },
            MonsterConfig { dimension: 16, margin: 7, ..Default::default() },
            MonsterConfig { number_of_colors: 0, ..Default::default() },
            MonsterConfig { frame_count: 0, ..Default::default() },
            MonsterConfig { animation_intensity: f32::NAN, ..Default::default() },
            MonsterConfig { animation_intensity: -1.0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "{:?}", config);
        }
        let edge = MonsterConfig { dimension: 16, margin: 6, ..Default::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(MonsterConfig::from_json_str("{dimension"), Err(ConfigError::Json(_))));
        assert!(matches!(
            MonsterConfig::from_json_str(r#"{"frame_count": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"number_of_colors": 3, "draw_patterns": true}}"#).unwrap();
        let config = MonsterConfig::load(file.path()).unwrap();
        assert_eq!(config.number_of_colors, 3);
        assert!(config.draw_patterns);

        let missing = MonsterConfig::load("/definitely/not/here.json");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
