//! Encoders for generated sprites: PNG layers and frames, animated GIF,
//! base64 data URLs, contact sheets and debug masks.

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use base64::Engine;
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};

use crate::error::{ExportError, ExportResult};
use crate::grid::Mask;
use crate::sprite::MonsterParts;

/// Save each layer as `{prefix}_{layer}.png` in `dir`.
pub fn save_layers(parts: &MonsterParts, dir: &Path, prefix: &str) -> ExportResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, layer) in parts.layers() {
        let path = dir.join(format!("{}_{}.png", prefix, name));
        layer.save(&path)?;
        written.push(path);
    }
    Ok(written)
}

/// Save frames as `{prefix}_00.png`, `{prefix}_01.png`, ...
pub fn save_frames_png(frames: &[RgbaImage], prefix: &str) -> ExportResult<Vec<PathBuf>> {
    if frames.is_empty() {
        return Err(ExportError::empty("no frames to save"));
    }
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = PathBuf::from(format!("{}_{:02}.png", prefix, i));
            frame.save(&path)?;
            Ok(path)
        })
        .collect()
}

/// Write an infinitely looping GIF with a fixed per-frame delay.
pub fn save_gif(frames: &[RgbaImage], delay_ms: u32, path: &Path) -> ExportResult<()> {
    if frames.is_empty() {
        return Err(ExportError::empty("no frames for gif"));
    }
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    encoder.encode_frames(
        frames
            .iter()
            .map(|f| Frame::from_parts(f.clone(), 0, 0, delay)),
    )?;
    Ok(())
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// `data:image/png;base64,...` string for embedding in HTML.
pub fn to_data_url(img: &RgbaImage) -> ExportResult<String> {
    let png = encode_png(img)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Save a mask as black and white, for debugging shapes.
pub fn export_mask(mask: &Mask, path: &Path) -> ExportResult<()> {
    let mut img = GrayImage::new(mask.width as u32, mask.height as u32);
    for (x, y, &v) in mask.iter() {
        img.put_pixel(x as u32, y as u32, Luma([if v { 255 } else { 0 }]));
    }
    img.save(path)?;
    Ok(())
}

/// Tile sprites into a grid, each upscaled by `scale` with nearest neighbour
/// and separated by `padding` pixels of `background`.
pub fn contact_sheet(tiles: &[RgbaImage], columns: usize, scale: u32, padding: u32, background: Rgba<u8>) -> RgbaImage {
    let columns = columns.max(1);
    let scale = scale.max(1);
    let rows = tiles.len().div_ceil(columns).max(1);
    let (tile_w, tile_h) = tiles
        .iter()
        .fold((0, 0), |(w, h), t| (w.max(t.width() * scale), h.max(t.height() * scale)));

    let sheet_w = columns as u32 * (tile_w + padding) + padding;
    let sheet_h = rows as u32 * (tile_h + padding) + padding;
    let mut sheet = RgbaImage::from_pixel(sheet_w, sheet_h, background);

    for (i, tile) in tiles.iter().enumerate() {
        let col = (i % columns) as u32;
        let row = (i / columns) as u32;
        let scaled = imageops::resize(tile, tile.width() * scale, tile.height() * scale, FilterType::Nearest);
        let x = padding + col * (tile_w + padding);
        let y = padding + row * (tile_h + padding);
        imageops::overlay(&mut sheet, &scaled, x as i64, y as i64);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<RgbaImage> {
        (0..3)
            .map(|i| RgbaImage::from_pixel(8, 8, Rgba([i * 80, 10, 10, 255])))
            .collect()
    }

    #[test]
    fn test_frames_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("idle");
        let paths = save_frames_png(&frames(), prefix.to_str().unwrap()).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[2].ends_with("idle_02.png"));
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_gif_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idle.gif");
        save_gif(&frames(), 100, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_empty_frames_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            save_gif(&[], 100, &dir.path().join("x.gif")),
            Err(ExportError::Empty(_))
        ));
        assert!(matches!(save_frames_png(&[], "x"), Err(ExportError::Empty(_))));
    }

    #[test]
    fn test_data_url_is_png() {
        let url = to_data_url(&frames()[0]).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_mask_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut mask = Mask::square(4, false);
        mask.set(1, 2, true);
        export_mask(&mask, &path).unwrap();
        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.get_pixel(1, 2)[0], 255);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_contact_sheet_layout() {
        let tiles = frames();
        let sheet = contact_sheet(&tiles, 2, 2, 1, Rgba([0, 0, 0, 0]));
        // Two columns of 16px tiles, two rows, 1px gutters.
        assert_eq!(sheet.dimensions(), (2 * 17 + 1, 2 * 17 + 1));
        assert_eq!(*sheet.get_pixel(1, 1), tiles[0].get_pixel(0, 0).to_owned());
        assert_eq!(*sheet.get_pixel(18, 1), *tiles[1].get_pixel(0, 0));
        assert_eq!(*sheet.get_pixel(1, 18), *tiles[2].get_pixel(0, 0));
        assert_eq!(sheet.get_pixel(18, 18)[3], 0);
    }
}
