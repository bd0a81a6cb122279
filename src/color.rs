//! Colour helpers and the per-sprite colour scheme.

use image::Rgba;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn to_byte(v: f64) -> u8 {
    (v as i32).clamp(0, 255) as u8
}

/// HSV to opaque RGBA. `hue` in degrees `[0, 360)`, `sat` and `val` in `[0, 1]`.
pub fn hsv_to_rgb(hue: f64, sat: f64, val: f64) -> Rgba<u8> {
    let c = val * sat;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = val - c;

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgba([
        to_byte((r + m) * 255.0),
        to_byte((g + m) * 255.0),
        to_byte((b + m) * 255.0),
        255,
    ])
}

/// RGBA to (hue degrees, saturation, value). Alpha is ignored.
pub fn rgb_to_hsv(color: Rgba<u8>) -> (f64, f64, f64) {
    let r = color[0] as f64 / 255.0;
    let g = color[1] as f64 / 255.0;
    let b = color[2] as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let s = if max == 0.0 { 0.0 } else { d / max };

    let mut h = if d == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / d) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }

    (h, s, max)
}

/// Wrap an angle into `[0, 360)`.
pub fn wrap_hue(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Scale RGB channels by `amount`, keeping alpha.
pub fn darken(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    let scale = |c: u8| to_byte(c as f64 * amount as f64);
    Rgba([scale(color[0]), scale(color[1]), scale(color[2]), color[3]])
}

/// Move RGB channels toward white by `amount`, keeping alpha.
pub fn lighten(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    let lift = |c: u8| to_byte((c as f64 + (255.0 - c as f64) * amount as f64).min(255.0));
    Rgba([lift(color[0]), lift(color[1]), lift(color[2]), color[3]])
}

/// Linear blend from `a` to `b`, rounded per channel, opaque result.
pub fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}

/// A random hue at the fixed saturation and value that read well as a body colour.
pub fn random_harmonious(rng: &mut impl Rng) -> Rgba<u8> {
    let hue = rng.gen_range(0..360);
    hsv_to_rgb(hue as f64, 0.6, 0.65)
}

/// Accent near `base`: hue shifted by up to 30 degrees either way, slightly
/// more saturated and brighter.
pub fn random_accent(base: Rgba<u8>, rng: &mut impl Rng) -> Rgba<u8> {
    let (h, s, v) = rgb_to_hsv(base);
    let shifted = (h + rng.gen::<f64>() * 60.0 - 30.0 + 360.0) % 360.0;
    hsv_to_rgb(shifted.trunc(), (s + 0.12).min(1.0), (v + 0.12).min(1.0))
}

/// How the accent, pattern and outline colours relate to the base colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorStyle {
    #[default]
    Harmonious,
    RandomAccent,
    RandomDarken,
    RandomOutline,
}

impl ColorStyle {
    pub fn all() -> &'static [Self] {
        &[Self::Harmonious, Self::RandomAccent, Self::RandomDarken, Self::RandomOutline]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Harmonious => "Accent, pattern and outline all derived from the base colour",
            Self::RandomAccent => "Independent accent, derived pattern and outline",
            Self::RandomDarken => "Independent accent and pattern, derived outline",
            Self::RandomOutline => "Every secondary colour drawn independently",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "harmonious" => Some(Self::Harmonious),
            "randomaccent" => Some(Self::RandomAccent),
            "randomdarken" => Some(Self::RandomDarken),
            "randomoutline" => Some(Self::RandomOutline),
            _ => None,
        }
    }
}

impl std::fmt::Display for ColorStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Harmonious => write!(f, "harmonious"),
            Self::RandomAccent => write!(f, "random-accent"),
            Self::RandomDarken => write!(f, "random-darken"),
            Self::RandomOutline => write!(f, "random-outline"),
        }
    }
}

/// The four colours one sprite is painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub base: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub pattern: Rgba<u8>,
    pub outline: Rgba<u8>,
}

impl ColorScheme {
    /// Draw a scheme. Base first, then accent, pattern and outline in that order.
    pub fn derive(style: ColorStyle, rng: &mut impl Rng) -> Self {
        let base = random_harmonious(rng);

        let accent = match style {
            ColorStyle::Harmonious => random_accent(base, rng),
            _ => random_harmonious(rng),
        };
        let pattern = match style {
            ColorStyle::Harmonious | ColorStyle::RandomAccent => darken(base, 0.55),
            _ => random_harmonious(rng),
        };
        let outline = match style {
            ColorStyle::RandomOutline => random_harmonious(rng),
            _ => darken(base, 0.34),
        };

        Self { base, accent, pattern, outline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgba([0, 0, 255, 255]));
        assert_eq!(hsv_to_rgb(0.0, 0.0, 0.0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_hsv_round_trip_is_close() {
        for hue in [10.0, 95.0, 200.0, 310.0] {
            let c = hsv_to_rgb(hue, 0.6, 0.65);
            let (h, s, v) = rgb_to_hsv(c);
            assert!((h - hue).abs() < 2.0, "hue {} came back as {}", hue, h);
            assert!((s - 0.6).abs() < 0.02);
            assert!((v - 0.65).abs() < 0.01);
        }
    }

    #[test]
    fn test_darken_lighten() {
        let c = Rgba([200, 100, 50, 128]);
        assert_eq!(darken(c, 0.5), Rgba([100, 50, 25, 128]));
        assert_eq!(lighten(c, 1.0), Rgba([255, 255, 255, 128]));
        assert_eq!(lighten(c, 0.0), c);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba([0, 0, 0, 255]);
        let b = Rgba([200, 100, 50, 255]);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn test_wrap_hue() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-30.0), 330.0);
    }

    #[test]
    fn test_harmonious_scheme_derives_from_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let scheme = ColorScheme::derive(ColorStyle::Harmonious, &mut rng);
        assert_eq!(scheme.pattern, darken(scheme.base, 0.55));
        assert_eq!(scheme.outline, darken(scheme.base, 0.34));
        let (bh, _, _) = rgb_to_hsv(scheme.base);
        let (ah, _, _) = rgb_to_hsv(scheme.accent);
        let diff = (bh - ah).abs();
        assert!(diff.min(360.0 - diff) <= 32.0);
    }

    #[test]
    fn test_random_outline_is_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let scheme = ColorScheme::derive(ColorStyle::RandomOutline, &mut rng);
        assert_eq!(scheme.outline[3], 255);
        assert_ne!(scheme.outline, darken(scheme.base, 0.34));
    }

    #[test]
    fn test_style_names_parse() {
        for style in ColorStyle::all() {
            assert_eq!(ColorStyle::from_str(&style.to_string()), Some(*style));
        }
        assert_eq!(ColorStyle::from_str("RandomAccent"), Some(ColorStyle::RandomAccent));
        assert_eq!(ColorStyle::from_str("neon"), None);
    }
}
