//! Debug tool for comparing palette modes and noise styles visually
//! Generates a contact sheet: one row per palette mode, one column per seed

use image::Rgba;
use pixel_monsters::config::MonsterConfig;
use pixel_monsters::export::contact_sheet;
use pixel_monsters::generator::generate_with_rng;
use pixel_monsters::palette::PaletteMode;
use pixel_monsters::random::{derive_seed, rng_from_seed};
use pixel_monsters::shape::NoiseStyle;
use rayon::prelude::*;

const DIMENSION: usize = 48;
const SEED: u64 = 42;
const COLUMNS: usize = 8;
const SCALE: u32 = 4;
const OUTPUT: &str = "monster_sheet.png";

fn main() {
    println!("Generating monster comparison sheet...");

    let modes = PaletteMode::concrete();
    let styles = &NoiseStyle::all()[..3];

    // (row, column) -> config; the noise style cycles across columns
    let configs: Vec<(String, MonsterConfig)> = modes
        .iter()
        .enumerate()
        .flat_map(|(row, &mode)| {
            (0..COLUMNS).map(move |col| {
                let seed = derive_seed(SEED, (row * COLUMNS + col) as u64);
                let config = MonsterConfig {
                    dimension: DIMENSION,
                    margin: 3,
                    palette_mode: mode,
                    noise_style: styles[col % styles.len()],
                    number_of_colors: 5,
                    frame_count: 1,
                    ..Default::default()
                }
                .with_seed(seed);
                (format!("{} / {}", mode, config.noise_style), config)
            })
        })
        .collect();

    let tiles: Vec<_> = configs
        .par_iter()
        .map(|(_, config)| {
            let seed = config.seed.unwrap_or(SEED);
            let mut rng = rng_from_seed(seed);
            generate_with_rng(config, seed, &mut rng).still()
        })
        .collect();

    for (i, (label, config)) in configs.iter().enumerate().step_by(COLUMNS) {
        println!("  row {}: {} (first seed {:?})", i / COLUMNS, label, config.seed);
    }

    let sheet = contact_sheet(&tiles, COLUMNS, SCALE, 4, Rgba([24, 24, 32, 255]));
    match sheet.save(OUTPUT) {
        Ok(()) => println!("Saved {} sprites to {}", tiles.len(), OUTPUT),
        Err(e) => eprintln!("Failed to save {}: {}", OUTPUT, e),
    }
}
