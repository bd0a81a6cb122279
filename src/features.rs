//! Facial features, limbs and appendages.
//!
//! All placement is derived from masks: eyes and mouth hang off the head
//! centroid, limbs grow from the body boundary cells nearest four canonical
//! attachment targets, appendages sprout from random boundary cells.

use image::{Rgba, RgbaImage};
use rand::Rng;
use tracing::debug;

use crate::color::{darken, lighten, TRANSPARENT, WHITE};
use crate::grid::{nearest_edge, Mask, Point};
use crate::random::RngExt;
use crate::raster::{blank_layer, fill_circle, put_pixel_safe};

/// How far an eye may move to land on the head.
const EYE_SNAP_RADIUS: i32 = 6;

/// Fixed eye renderings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeStyle {
    /// White eye, punched pupil
    SolidPupil,
    /// Accent eye, punched pupil, white glint
    AccentHighlight,
    /// Accent eye with a vertical slit
    VerticalSlit,
    /// Accent eye with a horizontal slit
    HorizontalSlit,
    /// White eye with a grey brow sparkle
    Sparkle,
    /// Accent eye with a light cross around the pupil
    CrossHighlight,
}

impl EyeStyle {
    pub fn all() -> &'static [Self] {
        &[
            Self::SolidPupil,
            Self::AccentHighlight,
            Self::VerticalSlit,
            Self::HorizontalSlit,
            Self::Sparkle,
            Self::CrossHighlight,
        ]
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::all()[rng.gen_range(0..6)]
    }

    fn draw(self, img: &mut RgbaImage, mask: &Mask, ex: i32, ey: i32, r: i32, accent: Rgba<u8>) {
        match self {
            Self::SolidPupil => {
                fill_circle(img, ex, ey, r + 1, WHITE);
                put_pixel_safe(img, ex, ey, TRANSPARENT);
            }
            Self::AccentHighlight => {
                fill_circle(img, ex, ey, r + 1, accent);
                put_pixel_safe(img, ex, ey, TRANSPARENT);
                put_pixel_safe(img, ex - 1, ey - 1, WHITE);
            }
            Self::VerticalSlit => {
                fill_circle(img, ex, ey, r + 1, accent);
                for dy in -r..=r {
                    put_pixel_safe(img, ex, ey + dy, TRANSPARENT);
                }
            }
            Self::HorizontalSlit => {
                fill_circle(img, ex, ey, r + 1, accent);
                for dx in -r..=r {
                    put_pixel_safe(img, ex + dx, ey, TRANSPARENT);
                }
            }
            Self::Sparkle => {
                fill_circle(img, ex, ey, r + 1, WHITE);
                put_pixel_safe(img, ex, ey, TRANSPARENT);
                let glint = darken(WHITE, 0.6);
                put_pixel_safe(img, ex - 1, ey - 2, glint);
                put_pixel_safe(img, ex, ey - 2, glint);
            }
            Self::CrossHighlight => {
                fill_circle(img, ex, ey, r + 1, accent);
                put_pixel_safe(img, ex, ey, TRANSPARENT);
                let light = lighten(accent, 0.5);
                for (dx, dy) in crate::grid::NEIGHBORS_4 {
                    if mask.occupied(ex + dx, ey + dy) {
                        put_pixel_safe(img, ex + dx, ey + dy, light);
                    }
                }
            }
        }
    }
}

/// Truncated mean of set cells in rows `0..max_y`.
pub fn estimate_head_center(mask: &Mask, max_y: usize) -> Option<Point> {
    let (mut sx, mut sy, mut count) = (0i64, 0i64, 0i64);
    for (x, y, &v) in mask.iter() {
        if v && y < max_y {
            sx += x as i64;
            sy += y as i64;
            count += 1;
        }
    }
    (count > 0).then(|| Point::new((sx / count) as i32, (sy / count) as i32))
}

/// Draw 1-3 eyes in a row across the head centre. Returns how many landed.
///
/// Draws nothing from `rng` when the head has no cells in its top third.
pub fn add_eyes(img: &mut RgbaImage, head: &Mask, accent: Rgba<u8>, rng: &mut impl Rng) -> usize {
    let Some(center) = estimate_head_center(head, head.height / 3) else {
        return 0;
    };
    let w = head.width as i32;
    let count = rng.range_i32(1, 4);
    let style = EyeStyle::random(rng);
    let spacing = (w / 10).max(2);
    let start_x = center.x - spacing * (count - 1) / 2;
    let r = (w / 24).max(1);

    let mut placed = 0;
    for i in 0..count {
        let Some(eye) = head.nearest_occupied(start_x + i * spacing, center.y, EYE_SNAP_RADIUS) else {
            continue;
        };
        style.draw(img, head, eye.x, eye.y, r, accent);
        placed += 1;
    }

    debug!(?style, requested = count, placed, "eyes");
    placed
}

/// Punch a three-cell mouth below the head centre. False when the head has
/// nothing to anchor to.
pub fn add_mouth(img: &mut RgbaImage, head: &Mask) -> bool {
    let Some(center) = estimate_head_center(head, head.height / 3) else {
        return false;
    };
    let my = center.y + 3;
    for dx in -1..=1 {
        put_pixel_safe(img, center.x + dx, my, TRANSPARENT);
    }
    true
}

/// Limb layer plus the body mask extended by the limbs.
#[derive(Clone, Debug)]
pub struct LimbGrowth {
    pub layer: RgbaImage,
    pub mask: Mask,
}

/// Canonical limb attachments as (target x, target y, step x, step y) given
/// the grid size: two arms at shoulder height, two legs near the bottom.
fn limb_targets(w: i32, h: i32) -> [(i32, i32, i32, i32); 4] {
    let leg_y = (h as f64 * 0.85) as i32;
    [
        (w / 4, h / 3, -1, 1),
        (3 * w / 4, h / 3, 1, 1),
        (w / 4, leg_y, -1, 2),
        (3 * w / 4, leg_y, 1, 2),
    ]
}

/// Grow four straight limbs out of the body boundary.
///
/// Each limb steps 3-5 times along its direction, stopping at the margin.
/// Stepped cells join the returned mask; the painted stroke is one cell
/// thicker than the stepped path.
pub fn grow_limbs(body: &Mask, color: Rgba<u8>, margin: usize, rng: &mut impl Rng) -> LimbGrowth {
    let mut layer = blank_layer(body.width);
    let mut mask = body.clone();
    let edges = body.edge_points();
    if edges.is_empty() {
        return LimbGrowth { layer, mask };
    }

    let w = body.width as i32;
    let h = body.height as i32;
    let m = margin as i32;

    for (tx, ty, dir_x, dir_y) in limb_targets(w, h) {
        let Some(start) = nearest_edge(&edges, tx, ty) else {
            continue;
        };
        let length = rng.range_i32(3, 6);
        let (mut x, mut y) = (start.x, start.y);
        for _ in 0..length {
            x += dir_x;
            y += dir_y;
            if x < m || x >= w - m || y < m || y >= h - m {
                break;
            }
            mask.set_checked(x, y, true);
            put_pixel_safe(&mut layer, x, y, color);
            put_pixel_safe(&mut layer, x + i32::from(dir_x == 0), y, color);
            put_pixel_safe(&mut layer, x, y + 1, color);
        }
    }

    LimbGrowth { layer, mask }
}

/// Short tendrils sprouting outward from random boundary cells. The mask is
/// left as it is; the tendrils only exist on the returned layer.
pub fn add_appendages(body: &Mask, color: Rgba<u8>, margin: usize, rng: &mut impl Rng) -> RgbaImage {
    let mut layer = blank_layer(body.width);
    let edges = body.edge_points();
    let Some(center) = body.centroid() else {
        return layer;
    };
    if edges.is_empty() {
        return layer;
    }

    let w = body.width as i32;
    let h = body.height as i32;
    let m = margin as i32;
    let count = rng.range_i32(2, 6);

    for _ in 0..count {
        let root = edges[rng.gen_range(0..edges.len())];
        let length = rng.range_i32(1, 5);

        let dx = (root.x - center.x) as f32;
        let dy = (root.y - center.y) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if len > 1e-6 { (dx / len, dy / len) } else { (0.0, -1.0) };

        let mut curl = 0;
        for step in 1..=length {
            if rng.chance(0.25) {
                curl += if rng.chance(0.5) { 1 } else { -1 };
            }
            // Curl is applied across the growth direction.
            let x = root.x + (nx * step as f32).round() as i32 - (ny.round() as i32) * curl;
            let y = root.y + (ny * step as f32).round() as i32 + (nx.round() as i32) * curl;
            if x < m || x >= w - m || y < m || y >= h - m {
                break;
            }
            if !body.occupied(x, y) {
                put_pixel_safe(&mut layer, x, y, color);
            }
        }
    }

    layer
}
