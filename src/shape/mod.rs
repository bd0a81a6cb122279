//! Silhouette synthesis.
//!
//! Builds the head and body masks for one sprite:
//!
//! 1. Primitive body (one of the [`Archetype`] templates) and head.
//! 2. Body variation: SDF noise displacement, segments, lobes, perforations,
//!    spikes, majority clean and optional extra dilate/erode.
//! 3. Recombination with the primitive head, perimeter noise, clean, organic
//!    symmetry, closing and margin enforcement.
//! 4. Head/body split, where cells of the primitive head stay head.

pub mod morphology;
pub mod presets;
pub mod primitives;
pub mod sdf;
pub mod symmetry;
pub mod variation;

use rand::Rng;
use tracing::{debug, warn};

use crate::grid::Mask;
use crate::random::RngExt;

pub use presets::{NoiseProfile, NoiseStyle};
pub use primitives::{Archetype, BodyLayout};

use morphology::{add_perimeter_noise, close, dilate, enforce_margin, erode, majority_clean};
use primitives::{create_body, create_head};
use sdf::signed_field;
use symmetry::apply_organic_symmetry;
use variation::{apply_lobes, apply_perforations, apply_segments, apply_spikes, displace_with_noise};

/// Perimeter noise applied to the recombined mask.
const PERIMETER_ADD_PROB: f64 = 0.10;
const PERIMETER_REMOVE_PROB: f64 = 0.05;
/// Jitter strength of the mirror pass.
const SYMMETRY_JITTER: f64 = 0.18;

/// Inputs of the shape stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParams {
    pub dimension: usize,
    pub margin: usize,
    pub noise_style: NoiseStyle,
}

/// Result of the shape stage.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterMasks {
    pub body: Mask,
    pub head: Mask,
    /// Head primitive before any edits, used for the split.
    pub base_head: Mask,
    pub archetype: Archetype,
    /// Concrete style the displacement noise was drawn with.
    pub noise_style: NoiseStyle,
}

impl MonsterMasks {
    /// Head and body together.
    pub fn combined(&self) -> Mask {
        self.body.union(&self.head)
    }
}

/// Run the full silhouette pipeline.
pub fn build_masks(params: &ShapeParams, rng: &mut impl Rng) -> MonsterMasks {
    let layout = BodyLayout::new(params.dimension, params.margin);

    let archetype = Archetype::random(rng);
    let mut base_body = layout.empty_mask();
    let mut base_head = layout.empty_mask();
    create_body(&mut base_body, archetype, &layout, rng);
    create_head(&mut base_head, &layout, rng);
    debug!(?archetype, body = base_body.count(), head = base_head.count(), "primitives placed");

    let noise_style = params.noise_style.resolve(rng);
    let varied = vary_body(&base_body, &layout, noise_style, rng);

    let mut combined = varied.union(&base_head);
    add_perimeter_noise(&mut combined, PERIMETER_ADD_PROB, PERIMETER_REMOVE_PROB, rng);
    majority_clean(&mut combined, 1);
    let mut combined = apply_organic_symmetry(&combined, SYMMETRY_JITTER, params.margin, rng);
    combined = close(&combined, 1);
    enforce_margin(&mut combined, params.margin);

    if combined.is_empty() {
        warn!(?archetype, "silhouette collapsed, falling back to primitives");
        combined = fallback_to_primitives(&base_body, &base_head, params.margin);
    }

    let (body, head) = split_head_body(&combined, &base_head);
    debug!(body = body.count(), head = head.count(), "masks split");

    MonsterMasks {
        body,
        head,
        base_head,
        archetype,
        noise_style,
    }
}

/// Body variation stages, in draw order.
fn vary_body(base_body: &Mask, layout: &BodyLayout, style: NoiseStyle, rng: &mut impl Rng) -> Mask {
    let signed = signed_field(base_body);
    let noise_seed: u32 = rng.gen();
    let profile = NoiseProfile::for_width(layout.dimension as usize, style, rng);
    debug!(%style, ?profile, "displacement profile");

    let mut mask = displace_with_noise(&signed, layout, &profile, noise_seed);

    let segments = apply_segments(&mut mask, layout, rng);

    // Lobes and holes are bounded by the shape as it stands after segments.
    let bbox = mask.bounding_box().or_else(|| base_body.bounding_box());
    if let Some(bbox) = bbox {
        let lobes = apply_lobes(&mut mask, &bbox, layout, rng);
        let holes = apply_perforations(&mut mask, &bbox, layout, rng);
        debug!(?segments, lobes, holes, "body edits");
    }

    apply_spikes(&mut mask, &signed, layout, rng);

    majority_clean(&mut mask, 1);
    if rng.chance(0.5) {
        mask = dilate(&mask);
    }
    if rng.chance(0.5) {
        mask = erode(&mask);
    }
    mask
}

/// Partition `combined` into (body, head). Cells of the untouched head
/// primitive are head, everything else that is set is body.
pub fn split_head_body(combined: &Mask, base_head: &Mask) -> (Mask, Mask) {
    let head = combined.intersection(base_head);
    let body = combined.map(|x, y, &v| v && !*base_head.get(x, y));
    (body, head)
}

/// Replacement silhouette for a run whose edits erased everything: the raw
/// primitives, margin enforced.
pub fn fallback_to_primitives(base_body: &Mask, base_head: &Mask, margin: usize) -> Mask {
    let mut mask = base_body.union(base_head);
    enforce_margin(&mut mask, margin);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::primitives::respects_margin;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(dimension: usize) -> ShapeParams {
        ShapeParams {
            dimension,
            margin: 3,
            noise_style: NoiseStyle::Detailed,
        }
    }

    #[test]
    fn test_same_seed_same_masks() {
        let a = build_masks(&params(64), &mut ChaCha8Rng::seed_from_u64(42));
        let b = build_masks(&params(64), &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_masks_are_disjoint_and_inside_margin() {
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let style = NoiseStyle::all()[seed as usize % 4];
            let masks = build_masks(&ShapeParams { noise_style: style, ..params(48) }, &mut rng);
            assert!(masks.body.intersection(&masks.head).is_empty());
            assert!(respects_margin(&masks.combined(), 3));
            assert!(!masks.combined().is_empty(), "seed {} produced nothing", seed);
            assert_ne!(masks.noise_style, NoiseStyle::Random);
        }
    }

    #[test]
    fn test_split_prefers_base_head() {
        let mut combined = Mask::square(8, false);
        let mut base_head = Mask::square(8, false);
        for x in 2..6 {
            combined.set(x, 2, true);
            combined.set(x, 5, true);
            base_head.set(x, 2, true);
        }
        // A head cell edited away does not come back.
        base_head.set(1, 1, true);

        let (body, head) = split_head_body(&combined, &base_head);
        assert_eq!(head.count(), 4);
        assert_eq!(body.count(), 4);
        assert!(!*head.get(1, 1));
        assert_eq!(body.union(&head), combined);
    }

    #[test]
    fn test_fallback_restores_primitives() {
        let layout = BodyLayout::new(32, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut body = layout.empty_mask();
        let mut head = layout.empty_mask();
        create_body(&mut body, Archetype::Wide, &layout, &mut rng);
        create_head(&mut head, &layout, &mut rng);
        let mask = fallback_to_primitives(&body, &head, 3);
        assert!(!mask.is_empty());
        assert!(respects_margin(&mask, 3));
        assert_eq!(mask.count(), body.union(&head).count());
    }
}
