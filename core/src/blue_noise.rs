//! Blue Noise Textures

use crate::geometry::*;
use crate::hash::mix_bits;
use crate::pbrt::*;

/// Number of distinct blue noise textures.
pub const NUM_BLUE_NOISE_TEXTURES: usize = 48;

/// Width and height of each texture.
pub const BLUE_NOISE_RESOLUTION: usize = 128;

lazy_static! {
    /// Texel values of every texture in row-major order.
    static ref BLUE_NOISE_TEXTURES: Vec<u16> = generate_textures();
}

/// Returns the blue noise value in `[0, 1)` for a pixel. Pixels and texture
/// indices outside the table wrap around.
///
/// * `texture_index` - Which texture to read; typically the sample dimension.
/// * `p`             - The pixel.
pub fn blue_noise(texture_index: usize, p: Point2i) -> Float {
    let texture = texture_index % NUM_BLUE_NOISE_TEXTURES;
    let res = BLUE_NOISE_RESOLUTION as Int;
    let x = rem(p.x, res) as usize;
    let y = rem(p.y, res) as usize;

    let offset = (texture * BLUE_NOISE_RESOLUTION + y) * BLUE_NOISE_RESOLUTION + x;
    BLUE_NOISE_TEXTURES[offset] as Float / 65536.0
}

/// Builds the textures from the R2 low-discrepancy dither, which has its
/// error concentrated at high frequencies. Each texture gets its own
/// toroidal shift and phase.
fn generate_textures() -> Vec<u16> {
    // Reciprocals of the plastic number and its square.
    const ALPHA_X: f64 = 0.754_877_666_246_692_7;
    const ALPHA_Y: f64 = 0.569_840_290_998_053_3;

    let n = BLUE_NOISE_RESOLUTION;
    let mut texels = Vec::with_capacity(NUM_BLUE_NOISE_TEXTURES * n * n);
    for texture in 0..NUM_BLUE_NOISE_TEXTURES {
        let h = mix_bits(texture as u64 + 1);
        let shift_x = (h & 0x7f) as usize;
        let shift_y = ((h >> 7) & 0x7f) as usize;
        let phase = ((h >> 32) as u32) as f64 / 4294967296.0;

        for y in 0..n {
            for x in 0..n {
                let sx = ((x + shift_x) % n) as f64;
                let sy = ((y + shift_y) % n) as f64;
                let v = (phase + sx * ALPHA_X + sy * ALPHA_Y).fract();
                texels.push((v * 65536.0).min(65535.0) as u16);
            }
        }
    }

    debug!(
        "Generated {} blue noise textures of {}x{}",
        NUM_BLUE_NOISE_TEXTURES, n, n
    );

    texels
}
