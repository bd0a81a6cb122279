//! Random stream for sprite generation.
//!
//! Every generation run owns one seeded [`MonsterRng`] and threads it by
//! `&mut` through each stochastic stage. Draws are positional: the same seed
//! and the same sequence of requests produce bit-identical output.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The stream type used for a generation run.
pub type MonsterRng = ChaCha8Rng;

/// Open a fresh stream for a run.
pub fn rng_from_seed(seed: u64) -> MonsterRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Use the explicit seed when present, otherwise draw one so the run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Derive an independent seed for sub-stream `stream` of `master`.
///
/// SplitMix64 finaliser, stable across platforms and toolchains. Used when
/// several sprites are generated in parallel and each worker needs its own
/// stream.
pub fn derive_seed(master: u64, stream: u64) -> u64 {
    let mut z = master
        .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Draw helpers shared by the pipeline stages.
pub trait RngExt: Rng {
    /// Integer in `[lo, hi)`; collapses to `lo` when the range is empty.
    fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi > lo {
            self.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    /// True with probability `p`. Values outside `[0, 1]` saturate.
    fn chance(&mut self, p: f64) -> bool {
        self.gen::<f64>() < p
    }
}

impl<R: Rng + ?Sized> RngExt for R {}
