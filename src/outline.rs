//! One-cell rim around a silhouette.

use image::{Rgba, RgbaImage};

use crate::color::darken;
use crate::grid::Mask;
use crate::raster::{pixel_at, put_pixel_safe};

/// Factor applied to boundary cells under the rim.
const EDGE_DARKEN: f32 = 0.75;

/// Paint every empty in-grid neighbour of a boundary cell with `color` and
/// darken the boundary cell itself. Occupied cells are never cleared.
/// Returns the number of boundary cells.
pub fn draw_outline(img: &mut RgbaImage, mask: &Mask, color: Rgba<u8>) -> usize {
    let edges = mask.edge_points();

    for p in &edges {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (p.x + dx, p.y + dy);
                if mask.in_bounds(nx, ny) && !mask.occupied(nx, ny) {
                    put_pixel_safe(img, nx, ny, color);
                }
            }
        }
        if let Some(current) = pixel_at(img, p.x, p.y) {
            put_pixel_safe(img, p.x, p.y, darken(current, EDGE_DARKEN));
        }
    }

    edges.len()
}
