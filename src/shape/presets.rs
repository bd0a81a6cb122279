//! Noise-style presets for silhouette displacement.
//!
//! Each style maps to well-separated parameter ranges tuned for 32..128 cell
//! sprites; a concrete [`NoiseProfile`] is drawn from those ranges per run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random::RngExt;

/// How coarse or fine the silhouette displacement noise is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseStyle {
    /// Big smooth blobs, strong displacement, little detail
    Blobby,
    /// Recognisable silhouette changes with moderate detail
    Balanced,
    /// Many tight wiggles, small displacement
    #[default]
    Detailed,
    /// One of the concrete styles, chosen per run
    Random,
}

impl NoiseStyle {
    pub fn all() -> &'static [Self] {
        &[Self::Blobby, Self::Balanced, Self::Detailed, Self::Random]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Blobby => "Big smooth blobs, strong silhouette displacement",
            Self::Balanced => "Moderate detail and displacement",
            Self::Detailed => "Fine wiggles, small displacement",
            Self::Random => "Pick one of the above per sprite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blobby" => Some(Self::Blobby),
            "balanced" => Some(Self::Balanced),
            "detailed" => Some(Self::Detailed),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    /// Resolve `Random` to a concrete style; concrete styles draw nothing.
    pub fn resolve(self, rng: &mut impl Rng) -> Self {
        match self {
            Self::Random => match rng.gen_range(0..3) {
                0 => Self::Blobby,
                1 => Self::Balanced,
                _ => Self::Detailed,
            },
            other => other,
        }
    }
}

impl std::fmt::Display for NoiseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blobby => write!(f, "blobby"),
            Self::Balanced => write!(f, "balanced"),
            Self::Detailed => write!(f, "detailed"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Parameter ranges for one concrete style.
struct StyleRanges {
    cells: (i32, i32),
    amplitude_factor: (f32, f32),
    octaves: (i32, i32),
    persistence: (f32, f32),
    scale_multiplier: f32,
}

impl StyleRanges {
    fn for_style(style: NoiseStyle) -> Self {
        match style {
            NoiseStyle::Blobby => Self {
                cells: (1, 3),
                amplitude_factor: (0.08, 0.18),
                octaves: (1, 2),
                persistence: (0.28, 0.48),
                scale_multiplier: 0.60,
            },
            NoiseStyle::Balanced => Self {
                cells: (3, 5),
                amplitude_factor: (0.05, 0.11),
                octaves: (2, 3),
                persistence: (0.45, 0.60),
                scale_multiplier: 1.00,
            },
            NoiseStyle::Detailed | NoiseStyle::Random => Self {
                cells: (6, 12),
                amplitude_factor: (0.02, 0.06),
                octaves: (3, 5),
                persistence: (0.55, 0.80),
                scale_multiplier: 1.60,
            },
        }
    }
}

/// Concrete displacement-noise parameters for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseProfile {
    /// Input coordinate multiplier (noise cells per grid cell)
    pub base_scale: f32,
    /// Peak displacement of the signed field, in cells
    pub amplitude_px: f32,
    pub octaves: u32,
    pub persistence: f32,
}

impl NoiseProfile {
    /// Draw a profile for a sprite `width` cells wide.
    ///
    /// `style` must already be resolved; `Random` is treated as `Detailed`.
    pub fn for_width(width: usize, style: NoiseStyle, rng: &mut impl Rng) -> Self {
        let width = width.max(8) as f32;
        let ranges = StyleRanges::for_style(style);

        let target_cells = rng.range_i32(ranges.cells.0, ranges.cells.1 + 1);
        let t = rng.unit() as f32;
        let amplitude_factor =
            ranges.amplitude_factor.0 + t * (ranges.amplitude_factor.1 - ranges.amplitude_factor.0);

        let mut base_scale = target_cells as f32 / width * ranges.scale_multiplier;
        let mut amplitude_px = width * amplitude_factor;

        let octaves = rng.range_i32(ranges.octaves.0, ranges.octaves.1 + 1);
        let mut persistence = ranges.persistence.0
            + rng.unit() as f32 * (ranges.persistence.1 - ranges.persistence.0);

        base_scale = base_scale.clamp(0.004, 0.6);
        amplitude_px = amplitude_px.clamp((width * 0.02).max(0.5), width * 0.35);
        persistence = persistence.clamp(0.20, 0.95);

        // More octaves make busier edges, so they get less amplitude.
        let octave_penalty = 1.0 / (1.0 + 0.16 * (octaves - 2).max(0) as f32);
        amplitude_px *= octave_penalty;

        Self {
            base_scale: round_to(base_scale, 6),
            amplitude_px: round_to(amplitude_px, 3),
            octaves: octaves as u32,
            persistence: round_to(persistence, 3),
        }
    }
}

fn round_to(v: f32, digits: i32) -> f32 {
    let factor = 10f32.powi(digits);
    (v * factor).round() / factor
}
