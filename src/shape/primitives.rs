//! Ellipse primitives and the archetype templates built from them.

use rand::Rng;

use crate::grid::Mask;
use crate::random::RngExt;

/// Vertical split of the sprite: the head occupies the top third, the body the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyLayout {
    pub dimension: i32,
    pub margin: i32,
    pub body_start_y: i32,
    pub body_height: i32,
    pub head_height: i32,
}

impl BodyLayout {
    pub fn new(dimension: usize, margin: usize) -> Self {
        let dimension = dimension as i32;
        let body_start_y = dimension / 3;
        Self {
            dimension,
            margin: margin as i32,
            body_start_y,
            body_height: dimension - body_start_y,
            head_height: body_start_y,
        }
    }

    /// Vertical centre of the body region.
    pub fn body_center_y(&self) -> f32 {
        self.body_start_y as f32 + self.body_height as f32 / 2.0
    }

    pub fn empty_mask(&self) -> Mask {
        Mask::square(self.dimension as usize, false)
    }
}

/// Base silhouette templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    /// Single round belly
    Round,
    /// Tall trunk with a wide chest
    Chested,
    /// Flat, wide body
    Wide,
    /// Stack of shrinking segments
    Caterpillar,
    /// Chest, hips and a narrow waist
    Hourglass,
    /// Round body with two shoulder lobes
    Shouldered,
    /// Round body with one lobe off to the side
    Hunched,
    /// Off-centre body with a small tail lobe
    Lopsided,
}

impl Archetype {
    pub const COUNT: usize = 8;

    pub fn all() -> &'static [Self] {
        &[
            Self::Round,
            Self::Chested,
            Self::Wide,
            Self::Caterpillar,
            Self::Hourglass,
            Self::Shouldered,
            Self::Hunched,
            Self::Lopsided,
        ]
    }

    pub fn from_index(index: usize) -> Self {
        Self::all()[index % Self::COUNT]
    }

    /// Uniform pick among the templates.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_index(rng.gen_range(0..Self::COUNT))
    }
}

/// Ellipse actually stamped after fitting to the margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ellipse {
    pub cx: i32,
    pub cy: i32,
    pub rx: i32,
    pub ry: i32,
}

/// Stamp an ellipse into `mask`, fitted to `[margin, dimension - margin)`.
///
/// A radius that would cross the margin is clipped to the space available on
/// the tighter side. If nothing fits at the requested centre, the centre is
/// pulled inside the margin and the radius shrunk to the largest that fits.
/// Returns `None` only when the requested radii are not positive.
pub fn fill_ellipse(mask: &mut Mask, cx: i32, cy: i32, rx: i32, ry: i32, margin: i32) -> Option<Ellipse> {
    if rx <= 0 || ry <= 0 {
        return None;
    }
    let w = mask.width as i32;
    let h = mask.height as i32;
    let (mut cx, mut cy) = (cx, cy);

    let left_space = cx - margin;
    let right_space = (w - 1 - margin) - cx;
    let top_space = cy - margin;
    let bottom_space = (h - 1 - margin) - cy;

    let mut rx = rx.min(left_space.min(right_space).max(0));
    let mut ry = ry.min(top_space.min(bottom_space).max(0));

    if rx <= 0 {
        cx = recenter(cx, margin, w);
        rx = (cx - margin).min((w - 1 - margin) - cx).max(1);
    }
    if ry <= 0 {
        cy = recenter(cy, margin, h);
        ry = (cy - margin).min((h - 1 - margin) - cy).max(1);
    }

    let x_start = margin.max(cx - rx);
    let x_end = (w - 1 - margin).min(cx + rx);
    let y_start = margin.max(cy - ry);
    let y_end = (h - 1 - margin).min(cy + ry);

    for y in y_start..=y_end {
        for x in x_start..=x_end {
            let dx = (x - cx) as f64 / rx as f64;
            let dy = (y - cy) as f64 / ry as f64;
            if dx * dx + dy * dy <= 1.0 {
                mask.set_checked(x, y, true);
            }
        }
    }

    Some(Ellipse { cx, cy, rx, ry })
}

/// Pull a centre into `[margin + 1, extent - margin - 2]`.
fn recenter(c: i32, margin: i32, extent: i32) -> i32 {
    let lo = margin + 1;
    let hi = extent - margin - 2;
    if hi < lo {
        return extent / 2;
    }
    c.clamp(lo, hi)
}

/// Compose the raw body for an archetype from one to several ellipses.
pub fn create_body(mask: &mut Mask, archetype: Archetype, layout: &BodyLayout, rng: &mut impl Rng) {
    let w = layout.dimension as f64;
    let bh = layout.body_height;
    let bhf = bh as f64;
    let start = layout.body_start_y;
    let m = layout.margin;
    let cx = layout.dimension / 2 + rng.range_i32(-4, 5);
    let cy = start + bh / 2;

    let frac = |extent: f64, f: f64| (extent * f) as i32;

    match archetype {
        Archetype::Round => {
            fill_ellipse(mask, cx, cy, frac(w, 0.36), frac(bhf, 0.45), m);
        }
        Archetype::Chested => {
            fill_ellipse(mask, cx, cy, frac(w, 0.26), frac(bhf, 0.6), m);
            fill_ellipse(mask, cx, start + bh / 3, frac(w, 0.34), frac(bhf, 0.28), m);
        }
        Archetype::Wide => {
            fill_ellipse(mask, cx, cy, frac(w, 0.52), frac(bhf, 0.36), m);
        }
        Archetype::Caterpillar => {
            let segments = rng.range_i32(3, 6);
            let seg_w = layout.dimension / 4;
            for i in 0..segments {
                let r = (seg_w - i).max(1);
                fill_ellipse(mask, cx, start + (i + 1) * bh / (segments + 1), r, r, m);
            }
        }
        Archetype::Hourglass => {
            fill_ellipse(mask, cx, start + bh / 3, frac(w, 0.32), frac(bhf, 0.28), m);
            fill_ellipse(mask, cx, start + frac(bhf, 0.62), frac(w, 0.22), frac(bhf, 0.32), m);
            fill_ellipse(mask, cx, start + bh / 2, frac(w, 0.18), frac(bhf, 0.12), m);
        }
        Archetype::Shouldered => {
            let offset = frac(w, 0.25);
            fill_ellipse(mask, cx, cy, frac(w, 0.36), frac(bhf, 0.45), m);
            fill_ellipse(mask, cx - offset, start + bh / 3, frac(w, 0.18), frac(bhf, 0.28), m);
            fill_ellipse(mask, cx + offset, start + bh / 3, frac(w, 0.18), frac(bhf, 0.28), m);
        }
        Archetype::Hunched => {
            fill_ellipse(mask, cx, cy, frac(w, 0.34), frac(bhf, 0.44), m);
            fill_ellipse(mask, cx - frac(w, 0.12), start + bh / 3, frac(w, 0.22), frac(bhf, 0.2), m);
        }
        Archetype::Lopsided => {
            fill_ellipse(mask, cx - frac(w, 0.08), cy, frac(w, 0.36), frac(bhf, 0.4), m);
            fill_ellipse(mask, cx + frac(w, 0.18), start + frac(bhf, 0.6), frac(w, 0.18), frac(bhf, 0.12), m);
        }
    }
}

/// Head ellipse above the body, optionally with a pair of horns or a crest.
pub fn create_head(mask: &mut Mask, layout: &BodyLayout, rng: &mut impl Rng) {
    let m = layout.margin;
    let head_cx = layout.dimension / 2 + rng.range_i32(-3, 4);
    let head_cy = (m + 1).max(layout.body_start_y - layout.head_height / 3 + rng.range_i32(-2, 3));
    let head_rx = (layout.dimension as f64 * 0.22) as i32 + rng.range_i32(-2, 3);
    let head_ry = 3.max(layout.head_height / 2 + rng.range_i32(-2, 3));

    fill_ellipse(mask, head_cx, head_cy, head_rx, head_ry, m);

    if rng.chance(0.45) {
        let horn_y = head_cy - head_ry / 2;
        if rng.chance(0.5) {
            fill_ellipse(mask, head_cx - head_rx + 2, horn_y - 2, 3, 3, m);
            fill_ellipse(mask, head_cx + head_rx - 2, horn_y - 2, 3, 3, m);
        } else {
            fill_ellipse(mask, head_cx, horn_y - 3, 3, 4, m);
        }
    }
}

/// True when no set cell lies within `margin` of any border.
pub fn respects_margin(mask: &Mask, margin: usize) -> bool {
    mask.iter().all(|(x, y, &v)| {
        !v || (x >= margin && y >= margin && x < mask.width - margin && y < mask.height - margin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ellipse_that_fits_is_unchanged() {
        let mut mask = Mask::square(32, false);
        let placed = fill_ellipse(&mut mask, 16, 16, 5, 4, 3).unwrap();
        assert_eq!(placed, Ellipse { cx: 16, cy: 16, rx: 5, ry: 4 });
        assert!(*mask.get(16, 16));
        assert!(*mask.get(21, 16));
        assert!(!*mask.get(22, 16));
    }

    #[test]
    fn test_oversized_ellipse_is_clipped_to_margin() {
        let mut mask = Mask::square(32, false);
        let placed = fill_ellipse(&mut mask, 10, 16, 20, 20, 3).unwrap();
        assert_eq!(placed.rx, 7);
        assert!(respects_margin(&mask, 3));
        assert!(mask.count() > 0);
    }

    #[test]
    fn test_ellipse_outside_margin_is_recentred() {
        let mut mask = Mask::square(32, false);
        let placed = fill_ellipse(&mut mask, 1, 1, 4, 4, 3).unwrap();
        assert!(placed.cx >= 4 && placed.cy >= 4);
        assert!(placed.rx >= 1 && placed.ry >= 1);
        assert!(respects_margin(&mask, 3));
        assert!(!mask.is_empty());
    }

    #[test]
    fn test_non_positive_radius_is_skipped() {
        let mut mask = Mask::square(16, false);
        assert!(fill_ellipse(&mut mask, 8, 8, 0, 3, 2).is_none());
        assert!(mask.is_empty());
    }

    #[test]
    fn test_every_archetype_stays_inside_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for dim in [32usize, 64, 128] {
            let layout = BodyLayout::new(dim, 3);
            for &archetype in Archetype::all() {
                let mut body = layout.empty_mask();
                create_body(&mut body, archetype, &layout, &mut rng);
                assert!(!body.is_empty(), "{:?} empty at {}", archetype, dim);
                assert!(respects_margin(&body, 3), "{:?} crosses margin at {}", archetype, dim);
            }
            let mut head = layout.empty_mask();
            create_head(&mut head, &layout, &mut rng);
            assert!(!head.is_empty());
            assert!(respects_margin(&head, 3));
        }
    }

    #[test]
    fn test_layout_split() {
        let layout = BodyLayout::new(64, 3);
        assert_eq!(layout.body_start_y, 21);
        assert_eq!(layout.body_height, 43);
        assert_eq!(layout.head_height, 21);
    }
}
