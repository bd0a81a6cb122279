//! Owned 2D grids used by every stage of the sprite pipeline.
//!
//! A [`Grid`] is a flat row-major store with bounds-checked access. Masks
//! (`Grid<bool>`) describe silhouettes, signed fields (`Grid<f32>`) hold
//! distances derived from a mask.

use serde::{Deserialize, Serialize};

/// 4-connected neighbour offsets (dx, dy): right, left, down, up.
pub const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 8-connected neighbour offsets (dx, dy), clockwise from north.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

/// A 2D grid with a flat backing store. Does not wrap at the edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// Boolean occupancy grid describing a silhouette.
pub type Mask = Grid<bool>;

/// Signed distance field: positive inside the shape, negative outside.
pub type SignedField = Grid<f32>;

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Square grid, the shape every sprite stage works on.
    pub fn square(dimension: usize, value: T) -> Self {
        Self::new_with(dimension, dimension, value)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "grid access ({}, {}) out of bounds for {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// True when signed coordinates fall inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Signed lookup; `None` when off-grid.
    pub fn get_checked(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed store; writes that fall off-grid are dropped.
    pub fn set_checked(&mut self, x: i32, y: i32, value: T) -> bool {
        if self.in_bounds(x, y) {
            self.set(x as usize, y as usize, value);
            true
        } else {
            false
        }
    }

    /// Fill the entire grid with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Build a new grid of the same size by mapping every cell.
    pub fn map<U, F: Fn(usize, usize, &T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.iter().map(|(x, y, v)| f(x, y, v)).collect(),
        }
    }
}

/// Integer cell coordinate. Signed so neighbourhood arithmetic can step off-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, x: i32, y: i32) -> i64 {
        let dx = (self.x - x) as i64;
        let dy = (self.y - y) as i64;
        dx * dx + dy * dy
    }
}

/// Inclusive bounding box of occupied cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl Grid<bool> {
    /// Occupancy test that treats off-grid cells as empty.
    pub fn occupied(&self, x: i32, y: i32) -> bool {
        self.get_checked(x, y).copied().unwrap_or(false)
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Set every cell that is set in `other`.
    pub fn union_with(&mut self, other: &Mask) {
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst = *dst || src;
        }
    }

    /// Clear every cell that is set in `other`.
    pub fn subtract(&mut self, other: &Mask) {
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            if src {
                *dst = false;
            }
        }
    }

    /// Cell-wise intersection.
    pub fn intersection(&self, other: &Mask) -> Mask {
        self.map(|x, y, &v| v && *other.get(x, y))
    }

    /// Boundary test: set, and at least one of the 8 neighbours is unset or off-grid.
    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        if !self.occupied(x, y) {
            return false;
        }
        NEIGHBORS_8
            .iter()
            .any(|&(dx, dy)| !self.occupied(x + dx, y + dy))
    }

    /// True when any of the 3x3 neighbourhood (including the cell) is set.
    pub fn has_adjacent(&self, x: i32, y: i32) -> bool {
        (-1..=1).any(|dy| (-1..=1).any(|dx| self.occupied(x + dx, y + dy)))
    }

    /// Number of set cells in the 3x3 neighbourhood, including the cell itself.
    pub fn neighborhood_count(&self, x: i32, y: i32) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.occupied(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// All boundary cells, in row-major order.
    pub fn edge_points(&self) -> Vec<Point> {
        let mut edges = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.is_edge(x, y) {
                    edges.push(Point::new(x, y));
                }
            }
        }
        edges
    }

    /// Bounding box of set cells, `None` for an empty mask.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        for (x, y, &v) in self.iter() {
            if !v {
                continue;
            }
            let (x, y) = (x as i32, y as i32);
            bbox = Some(match bbox {
                None => BoundingBox { left: x, top: y, right: x, bottom: y },
                Some(b) => BoundingBox {
                    left: b.left.min(x),
                    top: b.top.min(y),
                    right: b.right.max(x),
                    bottom: b.bottom.max(y),
                },
            });
        }
        bbox
    }

    /// Rounded mean of set cells, `None` for an empty mask.
    pub fn centroid(&self) -> Option<Point> {
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        let mut count = 0usize;
        for (x, y, &v) in self.iter() {
            if v {
                sx += x as f64;
                sy += y as f64;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(
            (sx / count as f64).round() as i32,
            (sy / count as f64).round() as i32,
        ))
    }

    /// Expanding-ring search for the nearest set cell within `max_radius`.
    ///
    /// Rings are scanned column-major (dx outer, dy inner), so ties resolve
    /// toward the upper-left.
    pub fn nearest_occupied(&self, x0: i32, y0: i32, max_radius: i32) -> Option<Point> {
        for r in 0..=max_radius {
            for dx in -r..=r {
                for dy in -r..=r {
                    if self.occupied(x0 + dx, y0 + dy) {
                        return Some(Point::new(x0 + dx, y0 + dy));
                    }
                }
            }
        }
        None
    }

    /// Cells that are set in either mask.
    pub fn union(&self, other: &Mask) -> Mask {
        let mut out = self.clone();
        out.union_with(other);
        out
    }
}

impl Grid<f32> {
    /// Lookup with coordinates clamped to the grid.
    pub fn sample_clamped(&self, x: i32, y: i32) -> f32 {
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cy = y.clamp(0, self.height as i32 - 1) as usize;
        *self.get(cx, cy)
    }
}

/// Boundary cell nearest to a target, first hit wins on ties.
pub fn nearest_edge(edges: &[Point], target_x: i32, target_y: i32) -> Option<Point> {
    let mut best: Option<(i64, Point)> = None;
    for &p in edges {
        let d = p.distance_squared(target_x, target_y);
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, p));
        }
    }
    best.map(|(_, p)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(dim: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Mask {
        let mut mask = Mask::square(dim, false);
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_checked_access_off_grid() {
        let mut grid = Grid::new_with(4, 3, 1u8);
        assert_eq!(grid.get_checked(-1, 0), None);
        assert_eq!(grid.get_checked(4, 0), None);
        assert_eq!(grid.get_checked(3, 2), Some(&1));
        assert!(!grid.set_checked(0, 3, 9));
        assert!(grid.set_checked(0, 2, 9));
        assert_eq!(*grid.get(0, 2), 9);
    }

    #[test]
    #[should_panic]
    fn test_unchecked_access_panics_out_of_bounds() {
        let grid = Grid::new_with(4, 4, 0u8);
        grid.get(4, 0);
    }

    #[test]
    fn test_edges_of_block() {
        let mask = square_mask(8, 2, 2, 4, 4);
        let edges = mask.edge_points();
        // 3x3 block: everything but the centre is boundary.
        assert_eq!(edges.len(), 8);
        assert!(!edges.contains(&Point::new(3, 3)));
        assert!(mask.is_edge(2, 2));
        assert!(!mask.is_edge(0, 0));
    }

    #[test]
    fn test_cell_on_border_is_edge() {
        let mask = Mask::square(3, true);
        assert!(mask.is_edge(0, 1));
        assert!(!mask.is_edge(1, 1));
    }

    #[test]
    fn test_bounding_box_and_centroid() {
        let mask = square_mask(10, 2, 3, 6, 5);
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { left: 2, top: 3, right: 6, bottom: 5 });
        assert_eq!(mask.centroid(), Some(Point::new(4, 4)));

        let empty = Mask::square(10, false);
        assert!(empty.bounding_box().is_none());
        assert!(empty.centroid().is_none());
    }

    #[test]
    fn test_nearest_occupied_ring_search() {
        let mask = square_mask(16, 10, 10, 11, 11);
        assert_eq!(mask.nearest_occupied(10, 10, 0), Some(Point::new(10, 10)));
        assert_eq!(mask.nearest_occupied(7, 10, 3), Some(Point::new(10, 10)));
        assert_eq!(mask.nearest_occupied(2, 2, 3), None);
    }

    #[test]
    fn test_union_subtract_intersection() {
        let a = square_mask(8, 0, 0, 3, 3);
        let b = square_mask(8, 2, 2, 5, 5);
        let union = a.union(&b);
        assert_eq!(union.count(), 16 + 16 - 4);
        assert_eq!(a.intersection(&b).count(), 4);

        let mut c = a.clone();
        c.subtract(&b);
        assert_eq!(c.count(), 12);
    }

    #[test]
    fn test_nearest_edge_prefers_first_on_tie() {
        let edges = vec![Point::new(0, 0), Point::new(2, 0)];
        assert_eq!(nearest_edge(&edges, 1, 0), Some(Point::new(0, 0)));
        assert_eq!(nearest_edge(&[], 1, 0), None);
    }

    #[test]
    fn test_sample_clamped() {
        let mut field = Grid::new_with(3, 3, 0.0f32);
        field.set(2, 2, 5.0);
        assert_eq!(field.sample_clamped(10, 10), 5.0);
        assert_eq!(field.sample_clamped(-3, 0), 0.0);
    }
}
