//! 2D Perlin noise
//!
//! Classic gradient noise over the plane with the standard Ken Perlin
//! permutation table, layered into fractal Brownian motion. Used by the
//! noise-driven island shape.

use glam::DVec2;

/// Configuration for Perlin noise generation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerlinConfig {
    /// Base frequency controls feature size (lower = larger features)
    pub base_frequency: f64,
    /// Number of octaves for fractal detail layers
    pub octaves: usize,
    /// Amplitude decay per octave (controls roughness)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            base_frequency: 2.0,
            octaves: 8,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

// Standard 256-element permutation table from Ken Perlin's reference
// implementation. Changing it changes every generated island.
const PERM: [u32; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Two-level permutation lookup salted with the seed
#[inline]
fn hash(x: i32, y: i32, seed: u32) -> u32 {
    let seed_hash = (seed.wrapping_mul(1103515245).wrapping_add(12345)) >> 16;
    let ix = ((x as u32) ^ seed_hash) & 255;
    let iy = ((y as u32) ^ (seed_hash >> 8)) & 255;
    let a = PERM[ix as usize];
    PERM[((a + iy) & 255) as usize]
}

/// Dot product with one of eight gradient directions picked by the hash
#[inline]
fn gradient(hash_value: u32, x: f64, y: f64) -> f64 {
    let h = hash_value & 7;
    let (u, v) = if h < 4 { (x, y) } else { (y, x) };
    let sign_u = if (h & 1) == 0 { -u } else { u };
    let sign_v = if (h & 2) == 0 { -v } else { v };
    sign_u + sign_v * 0.5
}

/// Quintic smoothstep: 6t⁵ - 15t⁴ + 10t³
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Raw gradient noise, roughly in `[-1, 1]`
fn perlin_2d(pos: DVec2, seed: u32) -> f64 {
    let x0 = pos.x.floor() as i32;
    let y0 = pos.y.floor() as i32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let xf = pos.x - pos.x.floor();
    let yf = pos.y - pos.y.floor();

    let u = fade(xf);
    let v = fade(yf);

    let g_aa = gradient(hash(x0, y0, seed), xf, yf);
    let g_ba = gradient(hash(x1, y0, seed), xf - 1.0, yf);
    let g_ab = gradient(hash(x0, y1, seed), xf, yf - 1.0);
    let g_bb = gradient(hash(x1, y1, seed), xf - 1.0, yf - 1.0);

    let x0_val = lerp(g_aa, g_ba, u);
    let x1_val = lerp(g_ab, g_bb, u);

    lerp(x0_val, x1_val, v)
}

/// Fractal Perlin noise normalized into `[0, 1]`
///
/// Octaves are accumulated at increasing frequency and decreasing
/// amplitude, then remapped from `[-1, 1]`.
pub fn sample_perlin_2d(position: DVec2, seed: u32, config: &PerlinConfig) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.base_frequency;
    let mut max_value = 0.0;

    for octave in 0..config.octaves {
        // Offset each octave so lattice points do not line up
        let shift = DVec2::splat(octave as f64 * 17.31);
        value += perlin_2d(position * frequency + shift, seed) * amplitude;
        max_value += amplitude;

        frequency *= config.lacunarity;
        amplitude *= config.persistence;
    }

    if max_value == 0.0 {
        return 0.5;
    }
    (((value / max_value) + 1.0) / 2.0).clamp(0.0, 1.0)
}
