//! Noise-driven surface shading of a mask onto a layer.

use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::color::{lerp_color, TRANSPARENT};
use crate::grid::Mask;
use crate::palette::Palette;
use crate::random::RngExt;
use crate::raster::{fill_circle_clipped, put_pixel_safe};
use crate::value_noise::ValueNoise;

/// Secondary-noise level above which a cell becomes an accent speckle.
const ACCENT_THRESHOLD: f64 = 0.9;
/// How far an accent speckle is pulled toward the accent colour.
const ACCENT_MIX: f64 = 0.75;
/// Contrast exponent applied to both noise samples.
const SHARPEN: f64 = 1.5;

/// Paints occupied cells with palette colours picked by two fractal noise
/// fields.
///
/// The x coordinate is folded around the vertical midline before sampling,
/// so the shading is mirror-symmetric. Open sides of a cell nudge the shade
/// as if lit from above.
pub struct SurfacePainter<'a> {
    pub palette: &'a Palette,
    /// Cells of this mask use the second palette instead.
    pub head: Option<(&'a Mask, &'a Palette)>,
    pub accent: Rgba<u8>,
    /// Clear the open neighbours of every painted cell.
    pub carve_edges: bool,
}

impl<'a> SurfacePainter<'a> {
    pub fn new(palette: &'a Palette, accent: Rgba<u8>) -> Self {
        Self {
            palette,
            head: None,
            accent,
            carve_edges: false,
        }
    }

    pub fn with_head(mut self, head_mask: &'a Mask, head_palette: &'a Palette) -> Self {
        self.head = Some((head_mask, head_palette));
        self
    }

    pub fn with_carved_edges(mut self, carve: bool) -> Self {
        self.carve_edges = carve;
        self
    }

    /// Paint every set cell of `mask` into `img`. Draws two noise seeds.
    pub fn paint(&self, img: &mut RgbaImage, mask: &Mask, rng: &mut impl Rng) {
        let shade = ValueNoise::new(rng.gen())
            .with_octaves(5)
            .with_period(30.0)
            .with_persistence(0.4)
            .with_lacunarity(3.0);
        let speckle = ValueNoise::new(rng.gen())
            .with_octaves(3)
            .with_period(40.0)
            .with_persistence(0.4)
            .with_lacunarity(3.0);

        let mid = (mask.width as f64 - 1.0) * 0.5;

        for (x, y, &set) in mask.iter() {
            if !set {
                continue;
            }
            let (x, y) = (x as i32, y as i32);
            let col_x = (x as f64 - mid).abs().ceil();

            let mut n = shade.sample(col_x, y as f64).abs().powf(SHARPEN) * 3.0;
            let n2 = speckle.sample(col_x, y as f64).abs().powf(SHARPEN) * 3.0;

            // (dx, dy, add, multiply): bottom darkens, top and sides brighten.
            for (dx, dy, add, mul) in [(0, 1, -0.45, 0.8), (1, 0, 0.2, 1.1), (0, -1, 0.45, 1.2), (-1, 0, 0.2, 1.1)] {
                if mask.occupied(x + dx, y + dy) {
                    continue;
                }
                n = (n + add) * mul;
                if self.carve_edges {
                    put_pixel_safe(img, x + dx, y + dy, TRANSPARENT);
                }
            }

            let n = n.clamp(0.0, 1.0);
            let n2 = n2.clamp(0.0, 1.0);

            let palette = match self.head {
                Some((head_mask, head_palette)) if head_mask.occupied(x, y) => head_palette,
                _ => self.palette,
            };

            let base = palette.sample(n);
            let color = if n2 > ACCENT_THRESHOLD && palette.len() > 1 {
                lerp_color(base, self.accent, ACCENT_MIX)
            } else {
                base
            };
            put_pixel_safe(img, x, y, color);
        }
    }
}

/// Decorative markings inside the mask: a few round spots or a set of
/// straight or slanted stripes.
pub fn add_internal_patterns(img: &mut RgbaImage, mask: &Mask, color: Rgba<u8>, rng: &mut impl Rng) {
    let w = mask.width as i32;
    let h = mask.height as i32;

    if rng.chance(0.5) {
        let spots = rng.range_i32(2, 6);
        for _ in 0..spots {
            let cx = rng.range_i32(0, w);
            let cy = rng.range_i32(0, h);
            let r = rng.range_i32(1, 3);
            if mask.occupied(cx, cy) {
                fill_circle_clipped(img, mask, cx, cy, r, color);
            }
        }
    } else {
        let horizontal = rng.chance(0.5);
        let lines = rng.range_i32(2, 5);
        for l in 0..lines {
            let offset = rng.range_i32(0, h);
            for x in 0..w {
                let y = if horizontal {
                    offset + l * 2
                } else {
                    (offset + x / 3 + l * 2) % h
                };
                if mask.occupied(x, y) {
                    put_pixel_safe(img, x, y, color);
                }
            }
        }
    }
}
