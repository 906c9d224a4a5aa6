//! Random per-texel rotations packed as signed (cos, sin) byte pairs

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::config::RotationConfig;
use crate::error::{Result, check_len};

/// Scale between a unit component and its packed byte
const PACK_SCALE: f32 = 127.0;

/// Fill `out` with `width * height` random rotations drawn from `rng`.
///
/// Each texel gets an angle uniform in `[-π, π]`, stored as
/// `[(cos * 127) as i8, (sin * 127) as i8]`. The cast truncates toward zero,
/// so decoded vectors are slightly shorter than unit length.
pub fn create_random_rotations<R: Rng + ?Sized>(
    out: &mut [i8],
    width: u32,
    height: u32,
    rng: &mut R,
) -> Result<()> {
    let texels = width as usize * height as usize;
    check_len("rotation", texels * 2, out.len())?;

    debug!("Generating {}x{} random rotations", width, height);

    let pairs: &mut [[i8; 2]] = bytemuck::cast_slice_mut(&mut out[..texels * 2]);
    for pair in pairs {
        *pair = pack_rotation(rng.random_range(-PI..=PI));
    }
    Ok(())
}

/// Pack one angle (radians) as signed (cos, sin) bytes
#[inline]
pub fn pack_rotation(angle: f32) -> [i8; 2] {
    let (sin, cos) = angle.sin_cos();
    [(cos * PACK_SCALE) as i8, (sin * PACK_SCALE) as i8]
}

/// Decode a packed pair back to a (cos, sin) vector, without renormalizing
#[inline]
pub fn unpack_rotation(packed: [i8; 2]) -> Vec2 {
    Vec2::new(packed[0] as f32, packed[1] as f32) / PACK_SCALE
}

impl RotationConfig {
    /// Deterministic generator seeded from this config
    pub fn rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// Fill `out` using the configured seed
    pub fn create_rotations(&self, out: &mut [i8], width: u32, height: u32) -> Result<()> {
        create_random_rotations(out, width, height, &mut self.rng())
    }
}
