//! Sprite assembly: masks, colours and features combined into separate
//! layers plus named anchor points.

use image::imageops::overlay;
use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{darken, ColorScheme};
use crate::config::MonsterConfig;
use crate::features::{add_appendages, add_eyes, add_mouth, grow_limbs};
use crate::grid::{Mask, Point};
use crate::outline::draw_outline;
use crate::paint::{add_internal_patterns, SurfacePainter};
use crate::palette::Palette;
use crate::raster::blank_layer;
use crate::shape::{build_masks, Archetype, NoiseStyle, ShapeParams};

/// Offset between the body and head palette sub-seeds.
const HEAD_PALETTE_SEED_OFFSET: u64 = 12345;

/// Named pivot points, in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchors {
    pub head: Point,
    pub body: Point,
    pub left_hip: Point,
    pub right_hip: Point,
    pub feet_center: Point,
}

impl Anchors {
    pub const NAMES: [&'static str; 5] = ["head", "body", "leftHip", "rightHip", "feetCenter"];

    /// Compute every anchor from the final masks.
    pub fn from_masks(head: &Mask, body: &Mask) -> Self {
        let body_start_y = body.height / 3;
        Self {
            head: centroid_or_center(head),
            body: centroid_or_center(body),
            left_hip: attachment_point(body, Side::Left, body_start_y),
            right_hip: attachment_point(body, Side::Right, body_start_y),
            feet_center: lowest_center(body),
        }
    }

    pub fn get(&self, name: &str) -> Option<Point> {
        match name {
            "head" => Some(self.head),
            "body" => Some(self.body),
            "leftHip" => Some(self.left_hip),
            "rightHip" => Some(self.right_hip),
            "feetCenter" => Some(self.feet_center),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Point)> + '_ {
        Self::NAMES.into_iter().filter_map(move |name| self.get(name).map(|p| (name, p)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn centroid_or_center(mask: &Mask) -> Point {
    mask.centroid()
        .unwrap_or_else(|| Point::new(mask.width as i32 / 2, mask.height as i32 / 2))
}

/// Outermost cell on `side`, scanning rows bottom-up through the lower part
/// of the body (from a quarter of the way into the body region down).
fn attachment_point(mask: &Mask, side: Side, body_start_y: usize) -> Point {
    let h = mask.height;
    let start_y = body_start_y + (h - body_start_y) / 4;

    for y in (start_y..h).rev() {
        let hit = match side {
            Side::Left => (0..mask.width).find(|&x| *mask.get(x, y)),
            Side::Right => (0..mask.width).rev().find(|&x| *mask.get(x, y)),
        };
        if let Some(x) = hit {
            return Point::new(x as i32, y as i32);
        }
    }

    centroid_or_center(mask)
}

/// Mean x of the lowest occupied row.
fn lowest_center(mask: &Mask) -> Point {
    for y in (0..mask.height).rev() {
        let xs: Vec<usize> = (0..mask.width).filter(|&x| *mask.get(x, y)).collect();
        if !xs.is_empty() {
            let mean = xs.iter().sum::<usize>() / xs.len();
            return Point::new(mean as i32, y as i32);
        }
    }
    centroid_or_center(mask)
}

/// One monster, split into independently animatable layers.
#[derive(Clone, Debug)]
pub struct MonsterParts {
    pub body: RgbaImage,
    pub head: RgbaImage,
    pub limbs: RgbaImage,
    pub appendages: RgbaImage,
    pub anchors: Anchors,
    /// Body mask including cells added by limbs
    pub body_mask: Mask,
    pub head_mask: Mask,
    pub palette: Palette,
    pub head_palette: Palette,
    pub colors: ColorScheme,
    pub archetype: Archetype,
    pub noise_style: NoiseStyle,
}

impl MonsterParts {
    /// Build all layers for a validated configuration.
    ///
    /// Draw order: masks, colour scheme, palette mode and sub-seed, body
    /// layer, head layer, limbs, appendages.
    pub fn assemble(config: &MonsterConfig, rng: &mut impl Rng) -> Self {
        let dim = config.dimension;
        let masks = build_masks(
            &ShapeParams {
                dimension: dim,
                margin: config.margin,
                noise_style: config.noise_style,
            },
            rng,
        );

        let colors = ColorScheme::derive(config.color_style, rng);
        let mode = config.palette_mode.resolve(rng);
        let palette_seed: u64 = rng.gen();
        let n = config.number_of_colors;
        let palette = Palette::build(colors.base, mode, n, Some(palette_seed), rng);
        let head_palette = Palette::build(
            colors.base,
            mode,
            n,
            Some(palette_seed.wrapping_add(HEAD_PALETTE_SEED_OFFSET)),
            rng,
        );
        debug!(%mode, archetype = ?masks.archetype, "colours chosen");

        let painter = SurfacePainter::new(&palette, colors.accent)
            .with_head(&masks.head, &head_palette)
            .with_carved_edges(true);

        let mut body = blank_layer(dim);
        painter.paint(&mut body, &masks.body, rng);
        if config.draw_patterns {
            add_internal_patterns(&mut body, &masks.body, colors.pattern, rng);
        }
        if config.draw_outline {
            draw_outline(&mut body, &masks.body, colors.outline);
        }

        let mut head = blank_layer(dim);
        painter.paint(&mut head, &masks.head, rng);
        add_eyes(&mut head, &masks.head, colors.accent, rng);
        add_mouth(&mut head, &masks.head);
        if config.draw_outline {
            draw_outline(&mut head, &masks.head, colors.outline);
        }

        let limbs = grow_limbs(&masks.body, colors.accent, config.margin, rng);
        let appendages = add_appendages(&masks.body, darken(colors.accent, 0.8), config.margin, rng);

        // Limbs never claim head cells.
        let mut body_mask = limbs.mask;
        body_mask.subtract(&masks.head);
        let anchors = Anchors::from_masks(&masks.head, &body_mask);

        Self {
            body,
            head,
            limbs: limbs.layer,
            appendages,
            anchors,
            body_mask,
            head_mask: masks.head,
            palette,
            head_palette,
            colors,
            archetype: masks.archetype,
            noise_style: masks.noise_style,
        }
    }

    pub fn dimension(&self) -> u32 {
        self.body.width()
    }

    /// Flat still image: body, appendages, limbs, head.
    pub fn composite(&self) -> RgbaImage {
        let mut frame = RgbaImage::new(self.body.width(), self.body.height());
        for layer in [&self.body, &self.appendages, &self.limbs, &self.head] {
            overlay(&mut frame, layer, 0, 0);
        }
        frame
    }

    /// Layers with their file-friendly names.
    pub fn layers(&self) -> [(&'static str, &RgbaImage); 4] {
        [
            ("body", &self.body),
            ("head", &self.head),
            ("limbs", &self.limbs),
            ("appendages", &self.appendages),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rect(dim: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Mask {
        let mut mask = Mask::square(dim, false);
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_anchor_heuristics() {
        let head = rect(30, 12, 3, 16, 7);
        let body = rect(30, 8, 12, 20, 24);
        let anchors = Anchors::from_masks(&head, &body);
        assert_eq!(anchors.head, Point::new(14, 5));
        assert_eq!(anchors.body, Point::new(14, 18));
        assert_eq!(anchors.left_hip, Point::new(8, 24));
        assert_eq!(anchors.right_hip, Point::new(20, 24));
        assert_eq!(anchors.feet_center, Point::new(14, 24));
    }

    #[test]
    fn test_anchor_fallbacks() {
        let empty = Mask::square(20, false);
        let anchors = Anchors::from_masks(&empty, &empty);
        for (_, p) in anchors.iter() {
            assert_eq!(p, Point::new(10, 10));
        }

        // Body entirely above the hip search band: hips fall back to its centroid.
        let high = rect(30, 10, 10, 14, 12);
        let anchors = Anchors::from_masks(&empty, &high);
        assert_eq!(anchors.left_hip, Point::new(12, 11));
        assert_eq!(anchors.right_hip, Point::new(12, 11));
        assert_eq!(anchors.feet_center, Point::new(12, 12));
    }

    #[test]
    fn test_anchor_names() {
        let mask = rect(16, 4, 4, 10, 12);
        let anchors = Anchors::from_masks(&mask, &mask);
        assert_eq!(anchors.iter().count(), 5);
        assert!(anchors.get("tail").is_none());
        let json = serde_json::to_string(&anchors).unwrap();
        assert!(json.contains("\"leftHip\"") && json.contains("\"feetCenter\""));
    }

    #[test]
    fn test_assemble_layers_and_masks() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = MonsterConfig::default();
        let parts = MonsterParts::assemble(&config, &mut rng);
        assert_eq!(parts.dimension(), 64);
        assert_eq!(parts.palette.len(), 6);
        assert_eq!(parts.head_palette.len(), 6);
        assert!(parts.body_mask.intersection(&parts.head_mask).is_empty());
        for (_, layer) in parts.layers() {
            assert_eq!(layer.dimensions(), (64, 64));
        }
        let visible = parts.composite().pixels().filter(|p| p[3] != 0).count();
        assert!(visible > 0);
    }

    #[test]
    fn test_composite_puts_head_on_top() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut parts = MonsterParts::assemble(&MonsterConfig::default(), &mut rng);
        parts.body.put_pixel(10, 10, image::Rgba([1, 1, 1, 255]));
        parts.head.put_pixel(10, 10, image::Rgba([2, 2, 2, 255]));
        assert_eq!(*parts.composite().get_pixel(10, 10), image::Rgba([2, 2, 2, 255]));
    }
}
