//! Organic bilateral symmetry.
//!
//! The left half is copied onto the right with small vertical jitter and
//! occasional dropouts, so sprites read as symmetric without looking stamped.

use rand::Rng;

use crate::grid::Mask;
use crate::random::RngExt;

/// Probability that a mirrored column gets a whole-column vertical shift.
const COLUMN_SHIFT_PROB: f64 = 0.35;
/// Probability that a single mirrored cell gets its own extra shift.
const CELL_JITTER_PROB: f64 = 0.28;
/// Probability that the odd centre column is set when either neighbour is.
const CENTER_FILL_BIAS: f64 = 0.9;

/// Mirror the left half of `mask` onto the right half.
///
/// `jitter_prob` scales the dropout rate (`jitter_prob * 0.18` per cell) and
/// the chance of a stray probe cell per column (`jitter_prob * 0.2`). Cells
/// that would land within `margin` of the border are discarded. The existing
/// right half is replaced entirely.
pub fn apply_organic_symmetry(mask: &Mask, jitter_prob: f64, margin: usize, rng: &mut impl Rng) -> Mask {
    let w = mask.width as i32;
    let h = mask.height as i32;
    let m = margin as i32;
    let half = w / 2;

    let mut result = Mask::new_with(mask.width, mask.height, false);
    for x in 0..half {
        for y in 0..h {
            if mask.occupied(x, y) {
                result.set_checked(x, y, true);
            }
        }
    }

    let column_shift: Vec<i32> = (0..half)
        .map(|_| {
            if rng.chance(COLUMN_SHIFT_PROB) {
                rng.range_i32(-1, 2)
            } else {
                0
            }
        })
        .collect();

    for x in 0..half {
        let mx = w - 1 - x;
        let mirror_column_ok = mx >= m && mx < w - m;

        for y in 0..h {
            if !mask.occupied(x, y) {
                continue;
            }
            let jitter = if rng.chance(CELL_JITTER_PROB) { rng.range_i32(-1, 2) } else { 0 };
            let ny = y + column_shift[x as usize] + jitter;
            if ny < m || ny >= h - m || !mirror_column_ok {
                continue;
            }
            if rng.chance(jitter_prob * 0.18) {
                continue;
            }
            result.set_checked(mx, ny, true);
        }

        if rng.chance(jitter_prob * 0.2) {
            let probe_y = rng.range_i32(m, h - m);
            if mirror_column_ok {
                result.set_checked(mx, probe_y, true);
            }
        }
    }

    if w % 2 == 1 {
        let c = half;
        for y in 0..h {
            let left = result.occupied(c - 1, y);
            let right = result.occupied(c + 1, y);
            if left || right {
                let fill = rng.chance(CENTER_FILL_BIAS) || (left && right);
                result.set_checked(c, y, fill);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_without_jitter_right_half_mirrors_left_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut mask = Mask::square(32, false);
        for y in 8..24 {
            for x in 6..16 {
                mask.set(x, y, true);
            }
        }
        let out = apply_organic_symmetry(&mask, 0.0, 3, &mut rng);
        let left = out.iter().filter(|&(x, _, &v)| v && x < 16).count();
        let right = out.iter().filter(|&(x, _, &v)| v && x >= 16).count();
        assert_eq!(left, 160);
        // Jittered cells may land on the same target, never on more than one.
        assert!(right <= left, "left {} right {}", left, right);
        assert!(right >= left / 2, "left {} right {}", left, right);
    }

    #[test]
    fn test_right_half_is_replaced() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut mask = Mask::square(32, false);
        mask.set(28, 20, true);
        let out = apply_organic_symmetry(&mask, 0.0, 3, &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn test_margin_respected() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut mask = Mask::square(33, false);
        for y in 3..30 {
            for x in 3..17 {
                mask.set(x, y, true);
            }
        }
        let out = apply_organic_symmetry(&mask, 1.0, 3, &mut rng);
        for (x, y, &v) in out.iter() {
            if v && x > 16 {
                assert!(y >= 3 && y < 30 && x < 30, "({}, {}) crosses margin", x, y);
            }
        }
    }

    #[test]
    fn test_odd_centre_column_follows_neighbours() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut mask = Mask::square(33, false);
        for y in 10..20 {
            for x in 8..16 {
                mask.set(x, y, true);
            }
        }
        let out = apply_organic_symmetry(&mask, 0.0, 3, &mut rng);
        // Rows where both neighbours are set always fill the centre.
        for y in 10..20 {
            if out.occupied(15, y) && out.occupied(17, y) {
                assert!(out.occupied(16, y));
            }
        }
        // Rows with no neighbours stay empty.
        assert!(!out.occupied(16, 2));
    }
}
