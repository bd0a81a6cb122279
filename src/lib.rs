//! Procedural pixel-art monster generation library
//!
//! Re-exports modules for use by binaries and tools. The usual entry point is
//! [`generator::generate`], which turns a [`config::MonsterConfig`] into
//! layered sprite parts and animation frames.

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod generator;
pub mod grid;
pub mod outline;
pub mod paint;
pub mod palette;
pub mod random;
pub mod raster;
pub mod shape;
pub mod sprite;
pub mod value_noise;

pub use config::MonsterConfig;
pub use error::{ConfigError, ExportError};
pub use generator::{generate, generate_with_rng, Monster};
pub use sprite::{Anchors, MonsterParts};
