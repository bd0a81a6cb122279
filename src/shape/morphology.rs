//! Binary morphology on masks. Off-grid cells count as unset throughout.

use rand::Rng;

use crate::grid::{Mask, Point};
use crate::random::RngExt;

/// Minimum number of set cells in a 3x3 neighbourhood (centre included)
/// for a cell to survive the majority clean.
const MAJORITY_THRESHOLD: usize = 3;

/// 3x3 majority filter, removes isolated speckle.
///
/// Every pass reads a snapshot of the previous state, so results do not
/// depend on scan order.
pub fn majority_clean(mask: &mut Mask, passes: usize) {
    for _ in 0..passes {
        let snapshot = mask.clone();
        for (x, y, v) in mask.iter_mut() {
            *v = snapshot.neighborhood_count(x as i32, y as i32) >= MAJORITY_THRESHOLD;
        }
    }
}

/// Set every cell with a set cell anywhere in its 3x3 neighbourhood.
pub fn dilate(mask: &Mask) -> Mask {
    mask.map(|x, y, _| mask.has_adjacent(x as i32, y as i32))
}

/// Keep only cells whose whole 3x3 neighbourhood is set.
pub fn erode(mask: &Mask) -> Mask {
    mask.map(|x, y, _| mask.neighborhood_count(x as i32, y as i32) == 9)
}

/// Morphological closing: dilate then erode, `iterations` times.
pub fn close(mask: &Mask, iterations: usize) -> Mask {
    let mut current = mask.clone();
    for _ in 0..iterations {
        current = erode(&dilate(&current));
    }
    current
}

/// Clear every cell within `margin` of any border.
pub fn enforce_margin(mask: &mut Mask, margin: usize) {
    let (w, h) = (mask.width, mask.height);
    for (x, y, v) in mask.iter_mut() {
        if x < margin || y < margin || x + margin >= w || y + margin >= h {
            *v = false;
        }
    }
}

/// Roughen the perimeter: boundary cells drop out with `remove_prob`, empty
/// cells touching the shape fill in with `add_prob`.
///
/// Decisions are taken against the unmodified mask and applied afterwards.
pub fn add_perimeter_noise(mask: &mut Mask, add_prob: f64, remove_prob: f64, rng: &mut impl Rng) {
    let mut to_add: Vec<Point> = Vec::new();
    let mut to_remove: Vec<Point> = Vec::new();

    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            if mask.occupied(x, y) {
                if mask.is_edge(x, y) && rng.chance(remove_prob) {
                    to_remove.push(Point::new(x, y));
                }
            } else if mask.has_adjacent(x, y) && rng.chance(add_prob) {
                to_add.push(Point::new(x, y));
            }
        }
    }

    for p in to_remove {
        mask.set_checked(p.x, p.y, false);
    }
    for p in to_add {
        mask.set_checked(p.x, p.y, true);
    }
}
