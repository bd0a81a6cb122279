//! Pixel-level drawing on sprite layers.

use image::{Rgba, RgbaImage};

use crate::grid::Mask;

/// A transparent layer the size of the sprite grid.
pub fn blank_layer(dimension: usize) -> RgbaImage {
    RgbaImage::new(dimension as u32, dimension as u32)
}

/// Write a pixel at signed coordinates; off-image writes are dropped.
pub fn put_pixel_safe(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Read a pixel at signed coordinates.
pub fn pixel_at(img: &RgbaImage, x: i32, y: i32) -> Option<Rgba<u8>> {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        Some(*img.get_pixel(x as u32, y as u32))
    } else {
        None
    }
}

/// Filled disc of radius `r`.
pub fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, color: Rgba<u8>) {
    for dx in -r..=r {
        for dy in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put_pixel_safe(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Filled disc restricted to set cells of `mask`.
pub fn fill_circle_clipped(img: &mut RgbaImage, mask: &Mask, cx: i32, cy: i32, r: i32, color: Rgba<u8>) {
    for dx in -r..=r {
        for dy in -r..=r {
            if dx * dx + dy * dy <= r * r && mask.occupied(cx + dx, cy + dy) {
                put_pixel_safe(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// True when any pixel of the layer is not fully transparent.
pub fn has_visible_pixels(img: &RgbaImage) -> bool {
    img.pixels().any(|p| p[3] != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    #[test]
    fn test_put_pixel_off_image_is_ignored() {
        let mut img = blank_layer(4);
        put_pixel_safe(&mut img, -1, 0, WHITE);
        put_pixel_safe(&mut img, 4, 4, WHITE);
        assert!(!has_visible_pixels(&img));
        put_pixel_safe(&mut img, 3, 3, WHITE);
        assert_eq!(pixel_at(&img, 3, 3), Some(WHITE));
        assert_eq!(pixel_at(&img, 3, 4), None);
    }

    #[test]
    fn test_circle_clipped_to_mask() {
        let mut img = blank_layer(9);
        let mut mask = Mask::square(9, false);
        for x in 0..9 {
            mask.set(x, 4, true);
        }
        fill_circle_clipped(&mut img, &mask, 4, 4, 2, WHITE);
        let painted = img.pixels().filter(|p| p[3] != 0).count();
        assert_eq!(painted, 5);

        let mut full = blank_layer(9);
        fill_circle(&mut full, 4, 4, 1, WHITE);
        assert_eq!(full.pixels().filter(|p| p[3] != 0).count(), 5);
    }
}
