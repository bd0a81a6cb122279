//! Ordered colour gradients derived from one base colour.
//!
//! Each [`PaletteMode`] is one pure strategy over (hue, saturation, value) of
//! the base colour. Saturation and value are clamped so no entry ends up
//! unreadably dark, washed out or grey.

use image::Rgba;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{hsv_to_rgb, lerp_color, rgb_to_hsv, wrap_hue};
use crate::random::RngExt;

const SAT_MIN: f64 = 0.18;
const SAT_MAX: f64 = 0.95;
const VAL_MIN: f64 = 0.15;
const VAL_MAX: f64 = 0.98;

/// Strategy for spreading a base colour into a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteMode {
    #[default]
    Monochrome,
    Analogous,
    Complementary,
    SplitComplementary,
    Triadic,
    TwoToneRandom,
    SoftStripes,
    /// Resolves to one of the concrete modes per sprite
    Random,
}

impl PaletteMode {
    pub fn all() -> &'static [Self] {
        &[
            Self::Monochrome,
            Self::Analogous,
            Self::Complementary,
            Self::SplitComplementary,
            Self::Triadic,
            Self::TwoToneRandom,
            Self::SoftStripes,
            Self::Random,
        ]
    }

    /// The seven modes that build a palette directly.
    pub fn concrete() -> &'static [Self] {
        &Self::all()[..7]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Monochrome => "Single hue, value ramp with slight saturation drift",
            Self::Analogous => "Neighbouring hues spread over 40-60 degrees",
            Self::Complementary => "Base hue blending toward its complement",
            Self::SplitComplementary => "Base hue plus the two hues either side of its complement",
            Self::Triadic => "Three hue roots 120 degrees apart",
            Self::TwoToneRandom => "Base hue blending toward a random second hue 60-140 degrees away",
            Self::SoftStripes => "Small oscillating hue shifts for banded looks",
            Self::Random => "One of the above, chosen per sprite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "monochrome" | "mono" => Some(Self::Monochrome),
            "analogous" => Some(Self::Analogous),
            "complementary" => Some(Self::Complementary),
            "splitcomplementary" | "split" => Some(Self::SplitComplementary),
            "triadic" => Some(Self::Triadic),
            "twotonerandom" | "twotone" => Some(Self::TwoToneRandom),
            "softstripes" | "stripes" => Some(Self::SoftStripes),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    /// Resolve `Random` to a concrete mode; concrete modes draw nothing.
    pub fn resolve(self, rng: &mut impl Rng) -> Self {
        match self {
            Self::Random => Self::concrete()[rng.gen_range(0..7)],
            other => other,
        }
    }
}

impl std::fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Monochrome => "monochrome",
            Self::Analogous => "analogous",
            Self::Complementary => "complementary",
            Self::SplitComplementary => "split-complementary",
            Self::Triadic => "triadic",
            Self::TwoToneRandom => "two-tone-random",
            Self::SoftStripes => "soft-stripes",
            Self::Random => "random",
        };
        write!(f, "{}", name)
    }
}

/// Ordered, immutable colour gradient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
    mode: PaletteMode,
}

impl Palette {
    /// Build `n` colours from `base` (at least one).
    ///
    /// With `sub_seed` the strategy draws from its own stream and the result is
    /// a pure function of the arguments; without it, draws come from `rng`.
    /// `PaletteMode::Random` is resolved before building.
    pub fn build(base: Rgba<u8>, mode: PaletteMode, n: usize, sub_seed: Option<u64>, rng: &mut impl Rng) -> Self {
        match sub_seed {
            Some(seed) => Self::build_with(base, mode, n, &mut ChaCha8Rng::seed_from_u64(seed)),
            None => Self::build_with(base, mode, n, rng),
        }
    }

    fn build_with(base: Rgba<u8>, mode: PaletteMode, n: usize, rng: &mut impl Rng) -> Self {
        let n = n.max(1);
        let mode = mode.resolve(rng);
        let (h, s, v) = rgb_to_hsv(base);

        let colors = match mode {
            PaletteMode::Monochrome => monochrome(h, s, v, n),
            PaletteMode::Analogous => analogous(h, s, v, n, rng),
            PaletteMode::Complementary => complementary(h, v, n),
            PaletteMode::SplitComplementary => split_complementary(h, s, v, n, rng),
            PaletteMode::Triadic => triadic(h, s, v, n),
            PaletteMode::TwoToneRandom => two_tone(h, s, v, n, rng),
            PaletteMode::SoftStripes | PaletteMode::Random => soft_stripes(h, s, v, n),
        };
        debug!(%mode, n, "palette built");

        Self { colors, mode }
    }

    /// Wrap an explicit colour list.
    pub fn from_colors(colors: Vec<Rgba<u8>>) -> Self {
        Self { colors, mode: PaletteMode::Monochrome }
    }

    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Concrete mode the palette was built with.
    pub fn mode(&self) -> PaletteMode {
        self.mode
    }

    /// Piecewise-linear lookup at `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgba<u8> {
        match self.colors.len() {
            0 => Rgba([255, 0, 255, 255]),
            1 => self.colors[0],
            len => {
                let idx = t.clamp(0.0, 1.0) * (len - 1) as f64;
                let i0 = idx.floor() as usize;
                let i1 = (i0 + 1).min(len - 1);
                lerp_color(self.colors[i0], self.colors[i1], idx - i0 as f64)
            }
        }
    }

    /// `#rrggbb` strings, for metadata output.
    pub fn hex_colors(&self) -> Vec<String> {
        self.colors
            .iter()
            .map(|c| format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2]))
            .collect()
    }
}

/// Position of entry `i` along the ramp.
fn ramp(i: usize, n: usize) -> f64 {
    i as f64 / (n.max(2) - 1) as f64
}

fn clamp_s(s: f64) -> f64 {
    s.clamp(SAT_MIN, SAT_MAX)
}

fn clamp_v(v: f64) -> f64 {
    v.clamp(VAL_MIN, VAL_MAX)
}

fn monochrome(h: f64, s: f64, v: f64, n: usize) -> Vec<Rgba<u8>> {
    let v_min = VAL_MIN.max(v * 0.35);
    let v_max = VAL_MAX.min(v * 1.15 + 0.04);
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { ramp(i, n) };
            let vv = v_min + (v_max - v_min) * t;
            let ss = clamp_s(s * (1.0 - 0.12 * (t - 0.5)));
            hsv_to_rgb(h, ss, vv)
        })
        .collect()
}

fn analogous(h: f64, s: f64, v: f64, n: usize, rng: &mut impl Rng) -> Vec<Rgba<u8>> {
    let spread = 40.0 + rng.unit() * 20.0;
    let start = wrap_hue(h - spread * 0.5);
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { ramp(i, n) };
            let hh = wrap_hue(start + t * spread);
            let ss = clamp_s(s * (0.9 + rng.unit() * 0.2));
            let vv = clamp_v(v * (0.85 + (t - 0.5) * 0.2));
            hsv_to_rgb(hh, ss, vv)
        })
        .collect()
}

fn complementary(h: f64, v: f64, n: usize) -> Vec<Rgba<u8>> {
    let comp = wrap_hue(h + 180.0);
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { ramp(i, n) };
            let hh = if t < 0.5 {
                wrap_hue(h + (t * 2.0 - 1.0) * 25.0)
            } else {
                wrap_hue(comp + ((t - 0.5) * 2.0 - 1.0) * 25.0)
            };
            let ss = clamp_s(0.6 + 0.4 * (1.0 - (0.5 - t).abs()));
            let vv = clamp_v(v * (0.7 + 0.6 * t));
            hsv_to_rgb(hh, ss, vv)
        })
        .collect()
}

fn split_complementary(h: f64, s: f64, v: f64, n: usize, rng: &mut impl Rng) -> Vec<Rgba<u8>> {
    let comp = wrap_hue(h + 180.0);
    let offset = 22.0 + rng.unit() * 8.0;
    let (c1, c2) = (wrap_hue(comp - offset), wrap_hue(comp + offset));
    (0..n)
        .map(|i| {
            let t = ramp(i, n);
            let hh = if t < 0.5 {
                wrap_hue(h + (t - 0.25) * 40.0)
            } else if t < 0.75 {
                c1
            } else {
                c2
            };
            hsv_to_rgb(hh, clamp_s(s * 0.9), clamp_v(v * (0.85 + 0.2 * t)))
        })
        .collect()
}

fn triadic(h: f64, s: f64, v: f64, n: usize) -> Vec<Rgba<u8>> {
    let roots = [h, wrap_hue(h + 120.0), wrap_hue(h + 240.0)];
    (0..n)
        .map(|i| {
            let t = ramp(i, n);
            let which = t * roots.len() as f64;
            let r0 = (which.floor() as usize).min(roots.len() - 1);
            let local = which - r0 as f64;
            let hh = wrap_hue(roots[r0] + (local - 0.5) * 12.0);
            let ss = clamp_s(s * (0.9 + 0.2 * (r0 % 2) as f64));
            let vv = clamp_v(v * (0.8 + 0.25 * r0 as f64));
            hsv_to_rgb(hh, ss, vv)
        })
        .collect()
}

fn two_tone(h: f64, s: f64, v: f64, n: usize, rng: &mut impl Rng) -> Vec<Rgba<u8>> {
    let distance = rng.unit() * 80.0 + 60.0;
    let sign = if rng.chance(0.5) { 1.0 } else { -1.0 };
    let hue2 = wrap_hue(h + distance * sign);
    (0..n)
        .map(|i| {
            let t = ramp(i, n);
            let hh = wrap_hue((1.0 - t) * h + t * hue2);
            let ss = clamp_s(s * (0.7 + 0.6 * (1.0 - (0.5 - t).abs())));
            let vv = clamp_v(v * (0.6 + 0.8 * t));
            hsv_to_rgb(hh, ss, vv)
        })
        .collect()
}

fn soft_stripes(h: f64, s: f64, v: f64, n: usize) -> Vec<Rgba<u8>> {
    const SPREAD: f64 = 22.0;
    (0..n)
        .map(|i| {
            let t = ramp(i, n);
            let hh = wrap_hue(h + (i as f64 * 2.2).sin() * SPREAD);
            hsv_to_rgb(hh, clamp_s(s * 0.85), clamp_v(v * (0.7 + 0.3 * t)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsv_to_rgb;

    fn base() -> Rgba<u8> {
        hsv_to_rgb(200.0, 0.6, 0.65)
    }

    #[test]
    fn test_every_mode_returns_requested_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for &mode in PaletteMode::all() {
            for n in [1usize, 2, 6, 16] {
                let palette = Palette::build(base(), mode, n, None, &mut rng);
                assert_eq!(palette.len(), n, "{} with {}", mode, n);
                assert_ne!(palette.mode(), PaletteMode::Random);
            }
        }
    }

    #[test]
    fn test_zero_colours_still_yields_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(Palette::build(base(), PaletteMode::Triadic, 0, None, &mut rng).len(), 1);
    }

    #[test]
    fn test_sub_seed_makes_palette_pure() {
        let mut a = ChaCha8Rng::seed_from_u64(1);
        let mut b = ChaCha8Rng::seed_from_u64(2);
        let pa = Palette::build(base(), PaletteMode::Analogous, 6, Some(77), &mut a);
        let pb = Palette::build(base(), PaletteMode::Analogous, 6, Some(77), &mut b);
        assert_eq!(pa, pb);
        // The caller's stream is untouched.
        assert_eq!(a.gen::<u64>(), ChaCha8Rng::seed_from_u64(1).gen::<u64>());
    }

    #[test]
    fn test_monochrome_keeps_hue_and_ramps_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let palette = Palette::build(base(), PaletteMode::Monochrome, 6, None, &mut rng);
        let values: Vec<f64> = palette.colors().iter().map(|&c| rgb_to_hsv(c).2).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        for &c in palette.colors() {
            let (h, s, v) = rgb_to_hsv(c);
            assert!((h - 200.0).abs() < 4.0);
            assert!(s >= SAT_MIN - 0.02 && s <= SAT_MAX + 0.02);
            assert!(v >= VAL_MIN - 0.01);
        }
    }

    #[test]
    fn test_single_colour_palette_samples_constant() {
        let palette = Palette::from_colors(vec![Rgba([10, 20, 30, 255])]);
        for t in [0.0, 0.3, 1.0, 4.0] {
            assert_eq!(palette.sample(t), Rgba([10, 20, 30, 255]));
        }
    }

    #[test]
    fn test_sample_interpolates() {
        let palette = Palette::from_colors(vec![Rgba([0, 0, 0, 255]), Rgba([100, 200, 50, 255])]);
        assert_eq!(palette.sample(0.0), Rgba([0, 0, 0, 255]));
        assert_eq!(palette.sample(1.0), Rgba([100, 200, 50, 255]));
        assert_eq!(palette.sample(0.5), Rgba([50, 100, 25, 255]));
        assert_eq!(palette.hex_colors()[1], "#64c832");
    }

    #[test]
    fn test_mode_names_parse() {
        for mode in PaletteMode::all() {
            assert_eq!(PaletteMode::from_str(&mode.to_string()), Some(*mode));
        }
        assert_eq!(PaletteMode::from_str("SplitComplementary"), Some(PaletteMode::SplitComplementary));
    }
}
