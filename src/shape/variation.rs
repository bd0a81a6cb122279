//! Stochastic edits that turn a primitive body into a varied silhouette.
//!
//! Stages run in a fixed order: noise displacement, segment variant, lobes,
//! perforations, spikes. Each takes the mask by `&mut` and draws from the
//! run's stream in a fixed sequence.

use rand::Rng;
use tracing::debug;

use crate::grid::{BoundingBox, Mask, SignedField};
use crate::random::RngExt;
use crate::value_noise::ValueNoise;

use super::presets::NoiseProfile;
use super::primitives::{fill_ellipse, BodyLayout};
use super::sdf::outward_normal;

/// Probability of the segmented variant.
const SEGMENT_PROB: f64 = 0.5;
/// Given a segmented variant, probability of union (otherwise replace).
const SEGMENT_UNION_PROB: f64 = 0.6;
/// Probability that a lobe is added rather than carved out.
const LOBE_ADD_PROB: f64 = 0.72;
/// Probability of the perforation stage.
const PERFORATION_PROB: f64 = 0.45;
/// Probability of the spike stage.
const SPIKE_PROB: f64 = 0.55;
/// Upper bound on spikes per sprite.
const MAX_SPIKES: usize = 12;

/// Cubic smoothstep on `[0, 1]`.
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Weight of silhouette noise at row `y`: 0 at the neck, 1 toward the feet.
pub fn vertical_falloff(y: i32, layout: &BodyLayout) -> f32 {
    let v = (y - layout.body_start_y) as f32 / layout.body_height.max(1) as f32;
    smoothstep(v.clamp(0.0, 1.0)).clamp(0.0, 1.0)
}

/// Displace the body's signed field by fractal noise and re-threshold at zero.
pub fn displace_with_noise(
    signed: &SignedField,
    layout: &BodyLayout,
    profile: &NoiseProfile,
    noise_seed: u32,
) -> Mask {
    let noise = ValueNoise::new(noise_seed)
        .with_octaves(profile.octaves)
        .with_period(1.0)
        .with_persistence(profile.persistence as f64)
        .with_lacunarity(2.0);
    let scale = profile.base_scale as f64;

    signed.map(|x, y, &distance| {
        let falloff = vertical_falloff(y as i32, layout);
        let fbm = noise.sample(x as f64 * scale, y as f64 * scale) as f32;
        distance + fbm * profile.amplitude_px * falloff > 0.0
    })
}

/// Which branch the segment stage took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentOutcome {
    Skipped,
    Merged,
    Replaced,
}

/// Stack 2-5 ellipses down the body axis, then union them in or replace the mask.
pub fn apply_segments(mask: &mut Mask, layout: &BodyLayout, rng: &mut impl Rng) -> SegmentOutcome {
    if !rng.chance(SEGMENT_PROB) {
        return SegmentOutcome::Skipped;
    }

    let w = layout.dimension as f64;
    let bh = layout.body_height as f64;
    let mut segments_mask = layout.empty_mask();
    let segments = rng.range_i32(2, 6);
    let cx_base = layout.dimension / 2 + rng.range_i32(-3, 4);

    for i in 0..segments {
        let t = i as f64 / (segments - 1) as f64;
        let cy = layout.body_start_y + (t * bh) as i32 + rng.range_i32(-3, 4);
        // Segments are widest mid-body.
        let girth = 0.5 + rng.unit() * (1.0 - (0.5 - t).abs());
        let rx = ((w * (0.14 + 0.24 * girth)) as i32).max(2);
        let ry = ((bh * (0.10 + 0.18 * rng.unit())) as i32).max(2);
        let cx = cx_base + rng.range_i32(-6, 7);
        fill_ellipse(&mut segments_mask, cx, cy, rx, ry, layout.margin);
    }

    if rng.chance(SEGMENT_UNION_PROB) {
        mask.union_with(&segments_mask);
        SegmentOutcome::Merged
    } else {
        *mask = segments_mask;
        SegmentOutcome::Replaced
    }
}

/// Add or carve 0-4 lobes near the current shape.
///
/// Lobe centres are drawn from the bounding box dilated by four cells. Returns
/// the number of lobes stamped.
pub fn apply_lobes(mask: &mut Mask, bbox: &BoundingBox, layout: &BodyLayout, rng: &mut impl Rng) -> usize {
    let w = layout.dimension;
    let m = layout.margin;
    let count = rng.range_i32(0, 5);

    for _ in 0..count {
        let bx = rng.range_i32(m.max(bbox.left - 4), (w - m).min(bbox.right + 4));
        let by = rng.range_i32(m.max(bbox.top - 4), (w - m).min(bbox.bottom + 4));
        let brx = rng.range_i32((w / 24).max(2), (w / 8).max(2)).max(1);
        let bry = rng.range_i32((w / 32).max(2), (w / 10).max(2)).max(1);

        let mut lobe = layout.empty_mask();
        fill_ellipse(&mut lobe, bx, by, brx, bry, m);

        if rng.chance(LOBE_ADD_PROB) {
            mask.union_with(&lobe);
        } else {
            mask.subtract(&lobe);
        }
    }

    count as usize
}

/// With fixed probability, punch 0-3 small holes inside the bounding box.
/// Returns the number of holes punched.
pub fn apply_perforations(mask: &mut Mask, bbox: &BoundingBox, layout: &BodyLayout, rng: &mut impl Rng) -> usize {
    if !rng.chance(PERFORATION_PROB) {
        return 0;
    }
    let w = layout.dimension;
    let m = layout.margin;
    let holes = rng.range_i32(0, 4);

    for _ in 0..holes {
        let hx = rng.range_i32(m.max(bbox.left), (w - m).min(bbox.right));
        let hy = rng.range_i32(m.max(bbox.top), (w - m).min(bbox.bottom));
        let hrx = rng.range_i32(1, (w / 18).max(2)).max(1);
        let hry = rng.range_i32(1, (w / 20).max(2)).max(1);

        let mut hole = layout.empty_mask();
        fill_ellipse(&mut hole, hx, hy, hrx, hry, m);
        mask.subtract(&hole);
    }

    holes as usize
}

/// With fixed probability, grow tapering spikes outward from boundary cells.
///
/// Directions come from the signed field of the primitive body; where its
/// gradient vanishes the spike points away from the body centre. Returns the
/// number of spikes grown.
pub fn apply_spikes(mask: &mut Mask, signed: &SignedField, layout: &BodyLayout, rng: &mut impl Rng) -> usize {
    if !rng.chance(SPIKE_PROB) {
        return 0;
    }
    let edges = mask.edge_points();
    if edges.is_empty() {
        return 0;
    }

    let w = layout.dimension;
    let m = layout.margin;
    let spike_count = (edges.len() / 8 + rng.range_i32(0, 5) as usize).min(MAX_SPIKES);

    for _ in 0..spike_count {
        let p = edges[rng.gen_range(0..edges.len())];
        let (nx, ny) = outward_normal(signed, p.x, p.y).unwrap_or_else(|| {
            let dx = p.x as f32 - w as f32 / 2.0;
            let dy = p.y as f32 - layout.body_center_y();
            let len = (dx * dx + dy * dy).sqrt() + 1e-6;
            (dx / len, dy / len)
        });

        let length = rng.range_i32((w / 40).max(2), (w / 18).max(3));
        for step in 1..=length {
            let sx = p.x + (nx * step as f32).round() as i32;
            let sy = p.y + (ny * step as f32).round() as i32;
            let taper = 1.0 - step as f64 / length as f64;
            let half_width = (taper * (1 + rng.range_i32(0, 2)) as f64).round().max(0.0) as i32;

            for wy in -half_width..=half_width {
                for wx in -half_width..=half_width {
                    let (ax, ay) = (sx + wx, sy + wy);
                    if ax >= m && ay >= m && ax < w - m && ay < w - m {
                        mask.set_checked(ax, ay, true);
                    }
                }
            }
        }
    }

    debug!(spikes = spike_count, "grew spikes");
    spike_count
}
