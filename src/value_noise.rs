//! Multi-octave value noise over a hashed integer lattice.
//!
//! The lattice has no stored permutation table: corner values come from an
//! integer mixing hash of (x, y, seed), so the noise is a pure function of its
//! inputs. Plugs into the `noise` crate through [`NoiseFn`] and [`Seedable`].

use noise::{NoiseFn, Seedable};

/// Seed offset applied per octave so octaves are decorrelated.
const OCTAVE_SEED_STRIDE: i32 = 1009;

/// Fractal value noise. `sample` returns values in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueNoise {
    seed: u32,
    /// Number of octaves summed (at least one is always taken)
    pub octaves: u32,
    /// Lattice spacing of the first octave, in input units
    pub period: f64,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency growth per octave
    pub lacunarity: f64,
}

impl ValueNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            octaves: 4,
            period: 30.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    pub fn with_persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_lacunarity(mut self, lacunarity: f64) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    /// fBm sample normalised by the accumulated amplitude.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let period = self.period.max(1.0);
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for octave in 0..self.octaves.max(1) {
            let nx = x * frequency / period;
            let ny = y * frequency / period;
            let octave_seed = (self.seed as i32).wrapping_add((octave as i32).wrapping_mul(OCTAVE_SEED_STRIDE));
            total += lattice_noise(nx, ny, octave_seed) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if max_amplitude == 0.0 {
            return 0.0;
        }
        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 2> for ValueNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

impl Seedable for ValueNoise {
    fn set_seed(self, seed: u32) -> Self {
        Self { seed, ..self }
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

/// Single octave: smoothstep-weighted bilinear blend of the four lattice corners.
fn lattice_noise(x: f64, y: f64, seed: i32) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let sx = smoothstep(x - x0);
    let sy = smoothstep(y - y0);
    let (ix, iy) = (x0 as i32, y0 as i32);

    let v00 = hash_to_signed_unit(ix, iy, seed);
    let v10 = hash_to_signed_unit(ix.wrapping_add(1), iy, seed);
    let v01 = hash_to_signed_unit(ix, iy.wrapping_add(1), seed);
    let v11 = hash_to_signed_unit(ix.wrapping_add(1), iy.wrapping_add(1), seed);

    let top = lerp(v00, v10, sx);
    let bottom = lerp(v01, v11, sx);
    lerp(top, bottom, sy)
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Integer mixing hash mapped to `[-1, 1]`.
fn hash_to_signed_unit(x: i32, y: i32, seed: i32) -> f64 {
    let mut n = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(69_069));
    n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    let v = ((n as u32) & 0x7FFF_FFFF) as f64 / i32::MAX as f64;
    v * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        let a = ValueNoise::new(1234);
        let b = ValueNoise::new(1234);
        for i in 0..50 {
            let (x, y) = (i as f64 * 1.7, i as f64 * 0.3);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_sample_stays_in_range() {
        let noise = ValueNoise::new(99)
            .with_octaves(6)
            .with_period(4.0)
            .with_persistence(0.9)
            .with_lacunarity(3.0);
        for y in 0..64 {
            for x in 0..64 {
                let v = noise.sample(x as f64 * 0.77, y as f64 * 1.31);
                assert!((-1.0..=1.0).contains(&v), "out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_lattice_points_match_hash() {
        // At integer lattice points the single-octave sample is the corner value.
        let noise = ValueNoise::new(5).with_octaves(1).with_period(1.0);
        assert_eq!(noise.sample(3.0, 7.0), hash_to_signed_unit(3, 7, 5));
    }

    #[test]
    fn test_seed_changes_field() {
        let a = ValueNoise::new(1);
        let b = a.set_seed(2);
        assert_eq!(b.seed(), 2);
        let differs = (0..20).any(|i| a.sample(i as f64 * 3.3, 1.5) != b.sample(i as f64 * 3.3, 1.5));
        assert!(differs);
    }

    #[test]
    fn test_noise_fn_matches_sample() {
        let noise = ValueNoise::new(77);
        assert_eq!(noise.get([12.5, 3.25]), noise.sample(12.5, 3.25));
    }

    #[test]
    fn test_zero_octaves_still_samples_one() {
        let noise = ValueNoise::new(3).with_octaves(0).with_period(1.0);
        assert_eq!(noise.sample(2.0, 2.0), hash_to_signed_unit(2, 2, 3));
    }
}
