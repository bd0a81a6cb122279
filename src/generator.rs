//! One generation run: seed, layered parts and animation frames.

use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::animation::animate;
use crate::config::MonsterConfig;
use crate::error::ConfigResult;
use crate::random::{resolve_seed, rng_from_seed, MonsterRng};
use crate::sprite::{Anchors, MonsterParts};

/// A generated monster and the seed that reproduces it.
#[derive(Clone, Debug)]
pub struct Monster {
    pub seed: u64,
    pub config: MonsterConfig,
    pub parts: MonsterParts,
    /// `config.frame_count` frames; a single frame is the still composite
    pub frames: Vec<RgbaImage>,
}

/// Serializable description of a run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSummary {
    pub seed: u64,
    pub dimension: usize,
    pub archetype: String,
    pub noise_style: String,
    pub palette_mode: String,
    pub palette: Vec<String>,
    pub anchors: Anchors,
    pub frame_count: usize,
    pub frame_delay_ms: u32,
}

impl Monster {
    pub fn summary(&self) -> MonsterSummary {
        MonsterSummary {
            seed: self.seed,
            dimension: self.config.dimension,
            archetype: format!("{:?}", self.parts.archetype),
            noise_style: self.parts.noise_style.to_string(),
            palette_mode: self.parts.palette.mode().to_string(),
            palette: self.parts.palette.hex_colors(),
            anchors: self.parts.anchors,
            frame_count: self.frames.len(),
            frame_delay_ms: self.config.frame_delay_ms,
        }
    }

    /// The still sprite.
    pub fn still(&self) -> RgbaImage {
        self.parts.composite()
    }
}

/// Validate `config` and run the pipeline with its seed, or a fresh one.
#[instrument(skip(config), fields(dimension = config.dimension, seed = tracing::field::Empty))]
pub fn generate(config: &MonsterConfig) -> ConfigResult<Monster> {
    config.validate()?;
    let seed = resolve_seed(config.seed);
    tracing::Span::current().record("seed", seed);
    let mut rng = rng_from_seed(seed);
    Ok(generate_with_rng(config, seed, &mut rng))
}

/// Run the pipeline on an already seeded stream. `config` must be valid.
pub fn generate_with_rng(config: &MonsterConfig, seed: u64, rng: &mut MonsterRng) -> Monster {
    let parts = MonsterParts::assemble(config, rng);
    let frames = animate(&parts, config.frame_count, config.animation_intensity);
    debug!(seed, frames = frames.len(), "monster generated");

    Monster {
        seed,
        config: config.clone(),
        parts,
        frames,
    }
}
