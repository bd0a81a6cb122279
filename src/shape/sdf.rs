//! Chamfer distance transforms and the signed field built from them.

use crate::grid::{Grid, Mask, SignedField};

const FAR: f32 = 1e6;
const DIAGONAL: f32 = std::f32::consts::SQRT_2;

/// Distance from every cell to the nearest set cell (0 on set cells).
///
/// Two-pass 3x3 chamfer: a forward sweep from the top-left, then a backward
/// sweep from the bottom-right.
pub fn distance_transform(mask: &Mask) -> Grid<f32> {
    let w = mask.width;
    let h = mask.height;
    let mut dist = mask.map(|_, _, &v| if v { 0.0 } else { FAR });

    for y in 0..h {
        for x in 0..w {
            let mut v = *dist.get(x, y);
            if x > 0 {
                v = v.min(*dist.get(x - 1, y) + 1.0);
            }
            if y > 0 {
                v = v.min(*dist.get(x, y - 1) + 1.0);
            }
            if x > 0 && y > 0 {
                v = v.min(*dist.get(x - 1, y - 1) + DIAGONAL);
            }
            if x + 1 < w && y > 0 {
                v = v.min(*dist.get(x + 1, y - 1) + DIAGONAL);
            }
            dist.set(x, y, v);
        }
    }

    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let mut v = *dist.get(x, y);
            if x + 1 < w {
                v = v.min(*dist.get(x + 1, y) + 1.0);
            }
            if y + 1 < h {
                v = v.min(*dist.get(x, y + 1) + 1.0);
            }
            if x + 1 < w && y + 1 < h {
                v = v.min(*dist.get(x + 1, y + 1) + DIAGONAL);
            }
            if x > 0 && y + 1 < h {
                v = v.min(*dist.get(x - 1, y + 1) + DIAGONAL);
            }
            dist.set(x, y, v);
        }
    }

    dist
}

/// Signed field of a mask: distance to background inside, minus distance to
/// the shape outside. Positive inside, negative outside.
pub fn signed_field(mask: &Mask) -> SignedField {
    let inverse = mask.map(|_, _, &v| !v);
    let to_background = distance_transform(&inverse);
    let to_shape = distance_transform(mask);
    to_background.map(|x, y, &inside| inside - *to_shape.get(x, y))
}

/// Unit outward normal at a cell from central differences on the field.
///
/// The field grows toward the interior, so the outward direction is the
/// negated gradient. Returns `None` where the gradient vanishes.
pub fn outward_normal(field: &SignedField, x: i32, y: i32) -> Option<(f32, f32)> {
    let gx = field.sample_clamped(x + 1, y) - field.sample_clamped(x - 1, y);
    let gy = field.sample_clamped(x, y + 1) - field.sample_clamped(x, y - 1);
    let len = (gx * gx + gy * gy).sqrt();
    if len > 1e-6 {
        Some((-gx / len, -gy / len))
    } else {
        None
    }
}

/// Threshold a field at zero.
pub fn threshold(field: &SignedField) -> Mask {
    field.map(|_, _, &v| v > 0.0)
}
