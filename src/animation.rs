//! Idle-loop animation: squash-stretch breathing with bobbing head and limbs.
//!
//! The body's visible band is resampled vertically around its bottom row, so
//! the feet stay planted. Limbs follow the body's top edge plus their own bob,
//! the head does the same slightly out of phase.

use std::f64::consts::TAU;

use image::imageops::overlay;
use image::RgbaImage;

use crate::sprite::MonsterParts;

/// Peak vertical stretch at intensity 1.0.
const BASE_STRETCH: f64 = 0.06;
/// Head lags the body by this fraction of a cycle.
const HEAD_PHASE_OFFSET: f64 = 0.10;

/// Periodic breath signal in `[-1, 1]` for phase `t` in `[0, 1)`.
pub fn breath_signal(t: f64) -> f64 {
    (0.75 * (TAU * t).sin() + 0.25 * (2.0 * TAU * t).sin()).clamp(-1.0, 1.0)
}

/// Head variant: shifted phase and a weaker second harmonic.
fn head_signal(t: f64) -> f64 {
    let t = t + HEAD_PHASE_OFFSET;
    0.75 * (TAU * t).sin() + 0.25 * 0.25 * (2.0 * TAU * t).sin()
}

/// First and last rows holding any non-transparent pixel.
pub fn visible_rows(img: &RgbaImage) -> Option<(u32, u32)> {
    let rows: Vec<u32> = (0..img.height())
        .filter(|&y| (0..img.width()).any(|x| img.get_pixel(x, y)[3] != 0))
        .collect();
    Some((*rows.first()?, *rows.last()?))
}

/// Nearest-neighbour vertical resample of rows `top..top + content` to
/// `scaled` rows. The first and last rows map onto themselves.
pub fn resample_rows(img: &RgbaImage, top: u32, content: u32, scaled: u32) -> RgbaImage {
    let mut out = RgbaImage::new(img.width(), scaled);
    for dst in 0..scaled {
        let src = if scaled <= 1 || content <= 1 {
            0
        } else {
            (dst as f64 * (content - 1) as f64 / (scaled - 1) as f64).round() as u32
        };
        let src_y = top + src.min(content - 1);
        for x in 0..img.width() {
            out.put_pixel(x, dst, *img.get_pixel(x, src_y));
        }
    }
    out
}

/// Placement of every layer in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePose {
    pub breath: f64,
    /// Height of the resampled body band
    pub body_height: u32,
    /// Row the resampled band starts at
    pub body_y: i64,
    pub limb_offset: i64,
    pub head_offset: i64,
}

/// Body band and bob amplitudes shared by all frames.
struct Rig {
    height: u32,
    content_top: u32,
    content_bottom: u32,
    max_stretch: f64,
    head_bob: f64,
    limb_bob: f64,
}

impl Rig {
    fn new(parts: &MonsterParts, intensity: f32) -> Self {
        let w = parts.body.width();
        let height = parts.body.height();
        let (content_top, content_bottom) = visible_rows(&parts.body).unwrap_or((0, height.saturating_sub(1)));
        Self {
            height,
            content_top,
            content_bottom,
            max_stretch: BASE_STRETCH * intensity as f64,
            head_bob: (w / 40).max(1) as f64,
            limb_bob: (w / 60).max(1) as f64,
        }
    }

    fn content_height(&self) -> u32 {
        self.content_bottom - self.content_top + 1
    }

    fn pose(&self, frame: usize, frame_count: usize) -> FramePose {
        let t = frame as f64 / frame_count as f64;
        let breath = breath_signal(t);

        let content = self.content_height();
        let scale = 1.0 + breath * self.max_stretch;
        let scaled = ((content as f64 * scale).round().max(1.0) as u32).min(self.height);

        // May go negative for tall bodies; the top is clipped, the feet never move.
        let body_y = self.content_bottom as i64 - scaled as i64 + 1;
        let top_shift = body_y - self.content_top as i64;

        FramePose {
            breath,
            body_height: scaled,
            body_y,
            limb_offset: top_shift + (breath * self.limb_bob).round() as i64,
            head_offset: top_shift + (head_signal(t) * self.head_bob).round() as i64,
        }
    }
}

/// Pose of every frame, without rendering.
pub fn poses(parts: &MonsterParts, frame_count: usize, intensity: f32) -> Vec<FramePose> {
    let rig = Rig::new(parts, intensity);
    (0..frame_count).map(|f| rig.pose(f, frame_count)).collect()
}

/// Render `frame_count` frames of the idle loop. One frame is the static
/// composite; zero frames is an empty list.
pub fn animate(parts: &MonsterParts, frame_count: usize, intensity: f32) -> Vec<RgbaImage> {
    if frame_count <= 1 {
        return (0..frame_count).map(|_| parts.composite()).collect();
    }

    let rig = Rig::new(parts, intensity);
    let content = rig.content_height();

    (0..frame_count)
        .map(|f| {
            let pose = rig.pose(f, frame_count);
            let mut frame = RgbaImage::new(parts.body.width(), parts.body.height());

            if pose.body_height == content && pose.body_y == rig.content_top as i64 {
                overlay(&mut frame, &parts.body, 0, 0);
            } else {
                let band = resample_rows(&parts.body, rig.content_top, content, pose.body_height);
                overlay(&mut frame, &band, 0, pose.body_y);
            }
            overlay(&mut frame, &parts.appendages, 0, pose.limb_offset);
            overlay(&mut frame, &parts.limbs, 0, pose.limb_offset);
            overlay(&mut frame, &parts.head, 0, pose.head_offset);
            frame
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonsterConfig;
    use image::Rgba;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parts() -> MonsterParts {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        MonsterParts::assemble(&MonsterConfig::default(), &mut rng)
    }

    #[test]
    fn test_breath_signal_shape() {
        assert_eq!(breath_signal(0.0), 0.0);
        assert!(breath_signal(0.25) > 0.7);
        assert!(breath_signal(0.75) < -0.7);
        for i in 0..100 {
            let b = breath_signal(i as f64 / 100.0);
            assert!((-1.0..=1.0).contains(&b));
        }
    }

    #[test]
    fn test_visible_rows() {
        let mut img = RgbaImage::new(8, 8);
        assert_eq!(visible_rows(&img), None);
        img.put_pixel(3, 2, Rgba([1, 1, 1, 255]));
        img.put_pixel(5, 6, Rgba([1, 1, 1, 10]));
        assert_eq!(visible_rows(&img), Some((2, 6)));
    }

    #[test]
    fn test_resample_pins_endpoints() {
        let mut img = RgbaImage::new(2, 10);
        for y in 0..10 {
            img.put_pixel(0, y, Rgba([y as u8, 0, 0, 255]));
        }
        for scaled in [3u32, 7, 10, 13] {
            let out = resample_rows(&img, 2, 6, scaled);
            assert_eq!(out.height(), scaled);
            assert_eq!(out.get_pixel(0, 0)[0], 2);
            assert_eq!(out.get_pixel(0, scaled - 1)[0], 7);
        }
    }

    #[test]
    fn test_single_frame_is_static_composite() {
        let parts = parts();
        let frames = animate(&parts, 1, 1.0);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], parts.composite());
        assert!(animate(&parts, 0, 1.0).is_empty());
    }

    #[test]
    fn test_feet_stay_planted() {
        let parts = parts();
        let (_, bottom) = visible_rows(&parts.body).unwrap();
        for pose in poses(&parts, 12, 3.0) {
            assert_eq!(pose.body_y + pose.body_height as i64 - 1, bottom as i64);
        }
    }

    #[test]
    fn test_head_and_limbs_move() {
        let parts = parts();
        let poses = poses(&parts, 8, 1.0);
        let heads: Vec<i64> = poses.iter().map(|p| p.head_offset).collect();
        assert!(heads.iter().max() != heads.iter().min());
        assert_eq!(poses[0].breath, 0.0);
        // Head is out of phase with the body at t = 0.
        assert_ne!(poses[0].head_offset, poses[0].limb_offset);
    }

    #[test]
    fn test_frames_match_grid_size() {
        let parts = parts();
        let frames = animate(&parts, 6, 1.0);
        assert_eq!(frames.len(), 6);
        for frame in &frames {
            assert_eq!(frame.dimensions(), (64, 64));
        }
    }
}
