use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pixel_monsters::color::ColorStyle;
use pixel_monsters::config::MonsterConfig;
use pixel_monsters::export;
use pixel_monsters::generator::generate;
use pixel_monsters::palette::PaletteMode;
use pixel_monsters::shape::NoiseStyle;

#[derive(Parser, Debug)]
#[command(name = "pixel_monsters")]
#[command(about = "Generate procedural pixel-art monster sprites")]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid side length in pixels
    #[arg(short, long)]
    dimension: Option<usize>,

    /// Empty border width in pixels
    #[arg(short, long)]
    margin: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Silhouette noise: blobby, balanced, detailed, random
    #[arg(long, value_parser = parse_noise_style)]
    noise_style: Option<NoiseStyle>,

    /// Palette mode: monochrome, analogous, complementary, split-complementary,
    /// triadic, two-tone-random, soft-stripes, random
    #[arg(short, long, value_parser = parse_palette_mode)]
    palette: Option<PaletteMode>,

    /// Colour style: harmonious, random-accent, random-darken, random-outline
    #[arg(long, value_parser = parse_color_style)]
    color_style: Option<ColorStyle>,

    /// Number of palette colours
    #[arg(short = 'c', long)]
    colors: Option<usize>,

    /// Paint spots or stripes on the body
    #[arg(long)]
    patterns: bool,

    /// Skip the dark rim around the silhouette
    #[arg(long)]
    no_outline: bool,

    /// Animation frames (1 = still image)
    #[arg(short, long)]
    frames: Option<usize>,

    /// Breathing strength (1.0 = about 6% stretch)
    #[arg(long)]
    intensity: Option<f32>,

    /// Delay between animation frames in milliseconds
    #[arg(long)]
    delay: Option<u32>,

    /// Output path prefix
    #[arg(short, long, default_value = "monster")]
    output: String,

    /// Also save each layer (body, head, limbs, appendages) separately
    #[arg(long)]
    layers: bool,

    /// Also save the head and body masks
    #[arg(long)]
    masks: bool,

    /// Write a JSON summary (seed, palette, anchors) next to the image
    #[arg(long)]
    summary: bool,

    /// Print the still sprite as a data URL
    #[arg(long)]
    data_url: bool,
}

fn parse_noise_style(s: &str) -> Result<NoiseStyle, String> {
    NoiseStyle::from_str(s).ok_or_else(|| format!("unknown noise style '{}'", s))
}

fn parse_palette_mode(s: &str) -> Result<PaletteMode, String> {
    PaletteMode::from_str(s).ok_or_else(|| format!("unknown palette mode '{}'", s))
}

fn parse_color_style(s: &str) -> Result<ColorStyle, String> {
    ColorStyle::from_str(s).ok_or_else(|| format!("unknown colour style '{}'", s))
}

impl Args {
    /// Start from the config file (or defaults) and apply every flag given.
    fn to_config(&self) -> Result<MonsterConfig> {
        let mut config = match &self.config {
            Some(path) => MonsterConfig::load(path)?,
            None => MonsterConfig::default(),
        };

        if let Some(dimension) = self.dimension {
            config.dimension = dimension;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(style) = self.noise_style {
            config.noise_style = style;
        }
        if let Some(mode) = self.palette {
            config.palette_mode = mode;
        }
        if let Some(style) = self.color_style {
            config.color_style = style;
        }
        if let Some(colors) = self.colors {
            config.number_of_colors = colors;
        }
        if self.patterns {
            config.draw_patterns = true;
        }
        if self.no_outline {
            config.draw_outline = false;
        }
        if let Some(frames) = self.frames {
            config.frame_count = frames;
        }
        if let Some(intensity) = self.intensity {
            config.animation_intensity = intensity;
        }
        if let Some(delay) = self.delay {
            config.frame_delay_ms = delay;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    println!("Generating monster...");
    println!("Sprite size: {}x{} (margin {})", config.dimension, config.dimension, config.margin);
    let monster = generate(&config)?;
    let summary = monster.summary();
    println!("Seed: {}", monster.seed);
    println!(
        "Archetype: {}, noise: {}, palette: {} ({} colours)",
        summary.archetype,
        summary.noise_style,
        summary.palette_mode,
        summary.palette.len()
    );

    let prefix = args.output.as_str();

    if monster.frames.len() > 1 {
        let paths = export::save_frames_png(&monster.frames, prefix).context("failed to save frames")?;
        println!("Saved {} frames ({}_00.png ..)", paths.len(), prefix);

        let gif_path = PathBuf::from(format!("{}.gif", prefix));
        export::save_gif(&monster.frames, config.frame_delay_ms, &gif_path)
            .with_context(|| format!("failed to write {}", gif_path.display()))?;
        println!("Saved animation to: {}", gif_path.display());
    } else {
        let still_path = PathBuf::from(format!("{}.png", prefix));
        monster
            .still()
            .save(&still_path)
            .with_context(|| format!("failed to write {}", still_path.display()))?;
        println!("Saved sprite to: {}", still_path.display());
    }

    if args.layers {
        let (dir, stem) = split_prefix(prefix);
        let paths = export::save_layers(&monster.parts, &dir, &stem).context("failed to save layers")?;
        println!("Saved {} layers", paths.len());
    }

    if args.masks {
        export::export_mask(&monster.parts.body_mask, Path::new(&format!("{}_body_mask.png", prefix)))
            .context("failed to save body mask")?;
        export::export_mask(&monster.parts.head_mask, Path::new(&format!("{}_head_mask.png", prefix)))
            .context("failed to save head mask")?;
        println!("Saved masks");
    }

    if args.summary {
        let json_path = format!("{}.json", prefix);
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&json_path, json).with_context(|| format!("failed to write {}", json_path))?;
        println!("Saved summary to: {}", json_path);
    }

    if args.data_url {
        println!("{}", export::to_data_url(&monster.still())?);
    }

    Ok(())
}

/// Split an output prefix like `out/dragon` into (`out`, `dragon`).
fn split_prefix(prefix: &str) -> (PathBuf, String) {
    let path = Path::new(prefix);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let stem = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "monster".to_string());
    (dir, stem)
}
