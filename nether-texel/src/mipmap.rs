//! Box-filter mip chain generation
//!
//! Mip levels are stored back-to-back in one flat RGBA8 buffer, top level
//! first, in the order given by [`MipLayout`]. Each level is the 2×2 box
//! average of the previous one:
//!
//! ```text
//! dst(x, y) = (src(2x, 2y) + src(2x+1, 2y) + src(2x, 2y+1) + src(2x+1, 2y+1)) >> 2
//! ```
//!
//! The sum is truncated, never rounded. A trailing odd source row or column
//! falls outside every footprint and is dropped.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::MipConfig;
use crate::error::{Result, TexelError, check_extent, check_len};
use crate::geometry::{MipLayout, MipLevel, RGBA_BYTES, count_texture_mips};
use crate::view::{ImageLayout, ImageView, ImageViewMut};

const RGB_BYTES: usize = 3;

/// Expand an RGB image to RGBA and build its mip chain in `out`.
///
/// `out` must hold the whole chain (see [`crate::rgba_chain_bytes`]). Alpha is
/// 255 everywhere in the top level. `mips` is the total level count including
/// the top; 0 selects `count_texture_mips(width, height, 1)`.
pub fn generate_mips_rgb_to_rgba(
    out: &mut [u8],
    rgb: &[u8],
    width: u32,
    height: u32,
    mips: u32,
) -> Result<()> {
    generate_mips_rgb_to_rgba_with(out, rgb, width, height, &MipConfig::with_levels(mips))
}

/// [`generate_mips_rgb_to_rgba`] with explicit settings
pub fn generate_mips_rgb_to_rgba_with(
    out: &mut [u8],
    rgb: &[u8],
    width: u32,
    height: u32,
    config: &MipConfig,
) -> Result<()> {
    check_extent(width, height)?;
    check_len("RGB", width as usize * height as usize * RGB_BYTES, rgb.len())?;
    check_chain_len(out.len(), width, height, config.levels)?;
    let layout = MipLayout::new(width, height, config.levels);

    debug!(
        "Generating {} RGBA mips from {}x{} RGB",
        layout.level_count(),
        width,
        height
    );

    expand_rgb_to_rgba(out, rgb, layout.top(), config.parallel_min_texels);
    generate_chain(out, &layout, config.parallel_min_texels)
}

/// Build the mip chain of an RGBA image that already occupies the start of `buf`.
///
/// Sub-levels are written directly after the top level. `mips` has the same
/// meaning as in [`generate_mips_rgb_to_rgba`].
pub fn generate_mips_rgba_in_place(buf: &mut [u8], width: u32, height: u32, mips: u32) -> Result<()> {
    generate_mips_rgba_in_place_with(buf, width, height, &MipConfig::with_levels(mips))
}

/// [`generate_mips_rgba_in_place`] with explicit settings
pub fn generate_mips_rgba_in_place_with(
    buf: &mut [u8],
    width: u32,
    height: u32,
    config: &MipConfig,
) -> Result<()> {
    check_extent(width, height)?;
    check_chain_len(buf.len(), width, height, config.levels)?;
    let layout = MipLayout::new(width, height, config.levels);

    debug!(
        "Generating {} RGBA mips in place for {}x{}",
        layout.level_count(),
        width,
        height
    );

    generate_chain(buf, &layout, config.parallel_min_texels)
}

/// Check a flat buffer against the chain size before any level list is built
fn check_chain_len(actual: usize, width: u32, height: u32, levels: u32) -> Result<()> {
    let required = MipLayout::required_bytes(width, height, levels).unwrap_or(usize::MAX);
    check_len("RGBA", required, actual)
}

/// Reject level counts past the full chain for chains that allocate their own storage
fn check_owned_levels(width: u32, height: u32, levels: u32) -> Result<()> {
    let max = count_texture_mips(width, height, 1) + 1;
    if levels > max {
        return Err(TexelError::TooManyLevels {
            requested: levels,
            max,
        });
    }
    Ok(())
}

/// Copy RGB texels into the top level, forcing alpha to 255
fn expand_rgb_to_rgba(out: &mut [u8], rgb: &[u8], top: MipLevel, parallel_min_texels: usize) {
    let texels = top.texel_count();
    let src: &[[u8; 3]] = bytemuck::cast_slice(&rgb[..texels * RGB_BYTES]);
    let dst: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut out[top.offset..top.end()]);

    let expand = |(d, s): (&mut [u8; 4], &[u8; 3])| *d = [s[0], s[1], s[2], 255];
    if texels >= parallel_min_texels {
        dst.par_iter_mut().zip(src.par_iter()).for_each(expand);
    } else {
        dst.iter_mut().zip(src.iter()).for_each(expand);
    }
}

/// Produce levels 1.. of `layout` from level 0, strictly in order.
///
/// `buf` must already be at least `layout.total_bytes()` long.
fn generate_chain(buf: &mut [u8], layout: &MipLayout, parallel_min_texels: usize) -> Result<()> {
    for pair in layout.levels().windows(2) {
        let (src_level, dst_level) = (pair[0], pair[1]);

        // Everything before dst_level is read-only for this step
        let (head, tail) = buf.split_at_mut(dst_level.offset);
        let src = ImageView::new(
            "RGBA",
            &head[src_level.offset..],
            ImageLayout::packed(src_level.width, src_level.height, RGBA_BYTES),
        )?;
        let mut dst = ImageViewMut::new(
            "RGBA",
            &mut tail[..dst_level.len],
            ImageLayout::packed(dst_level.width, dst_level.height, RGBA_BYTES),
        )?;

        downsample_2x2(&src, &mut dst, dst_level.texel_count() >= parallel_min_texels);

        trace!(
            "mip {}: {}x{} -> {}x{}",
            dst_level.index,
            src_level.width,
            src_level.height,
            dst_level.width,
            dst_level.height
        );
    }
    Ok(())
}

/// Box-filter `src` into `dst`, which is half its size (floored, min 1)
fn downsample_2x2(src: &ImageView<'_, u8>, dst: &mut ImageViewMut<'_, u8>, parallel: bool) {
    if parallel {
        dst.par_rows_mut()
            .enumerate()
            .for_each(|(y, row)| downsample_row(src, y as u32, row));
    } else {
        for (y, row) in dst.rows_mut().enumerate() {
            downsample_row(src, y as u32, row);
        }
    }
}

/// Fill one destination row from source rows `2y` and `2y + 1`.
///
/// A source axis that is only one texel wide (a 1×N image, or degenerate
/// levels past the natural end of the chain) reuses its single texel for both
/// footprint taps. This intentionally departs from addressing the second tap
/// with a fixed `2 * dst_width` texel stride, which would read the next source
/// rows instead of staying inside the footprint.
fn downsample_row(src: &ImageView<'_, u8>, y: u32, row: &mut [u8]) {
    let last_x = src.width() - 1;
    let sy0 = 2 * y;
    let sy1 = (sy0 + 1).min(src.height() - 1);

    for (x, out) in row.chunks_exact_mut(RGBA_BYTES).enumerate() {
        let sx0 = 2 * x as u32;
        let sx1 = (sx0 + 1).min(last_x);

        let t00 = src.texel(sx0, sy0);
        let t10 = src.texel(sx1, sy0);
        let t01 = src.texel(sx0, sy1);
        let t11 = src.texel(sx1, sy1);

        for (c, value) in out.iter_mut().enumerate() {
            let sum = t00[c] as u32 + t10[c] as u32 + t01[c] as u32 + t11[c] as u32;
            *value = (sum >> 2) as u8;
        }
    }
}

/// An owned RGBA8 mip chain.
///
/// The level layout is computed once, up front; each level is addressed
/// through its [`MipLevel`] descriptor instead of by walking a pointer.
/// Level counts are limited to the full chain (down to 1×1); degenerate
/// trailing 1×1 levels are only produced into caller-provided buffers.
#[derive(Debug, Clone)]
pub struct MipChain {
    layout: MipLayout,
    data: Vec<u8>,
}

impl MipChain {
    /// Build a chain from a packed RGB image
    pub fn from_rgb(rgb: &[u8], width: u32, height: u32, mips: u32) -> Result<Self> {
        Self::from_rgb_with(rgb, width, height, &MipConfig::with_levels(mips))
    }

    /// Build a chain from a packed RGB image with explicit settings
    pub fn from_rgb_with(rgb: &[u8], width: u32, height: u32, config: &MipConfig) -> Result<Self> {
        check_extent(width, height)?;
        check_owned_levels(width, height, config.levels)?;
        let layout = MipLayout::new(width, height, config.levels);
        let mut data = vec![0u8; layout.total_bytes()];
        generate_mips_rgb_to_rgba_with(&mut data, rgb, width, height, config)?;
        Ok(Self { layout, data })
    }

    /// Build a chain from a packed RGBA top level
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32, mips: u32) -> Result<Self> {
        Self::from_rgba_with(rgba, width, height, &MipConfig::with_levels(mips))
    }

    /// Build a chain from a packed RGBA top level with explicit settings
    pub fn from_rgba_with(rgba: &[u8], width: u32, height: u32, config: &MipConfig) -> Result<Self> {
        check_extent(width, height)?;
        check_owned_levels(width, height, config.levels)?;
        let layout = MipLayout::new(width, height, config.levels);
        let top = layout.top();
        check_len("RGBA", top.len, rgba.len())?;

        let mut data = vec![0u8; layout.total_bytes()];
        data[..top.len].copy_from_slice(&rgba[..top.len]);
        generate_mips_rgba_in_place_with(&mut data, width, height, config)?;
        Ok(Self { layout, data })
    }

    pub fn width(&self) -> u32 {
        self.layout.top().width
    }

    pub fn height(&self) -> u32 {
        self.layout.top().height
    }

    pub fn layout(&self) -> &MipLayout {
        &self.layout
    }

    /// Level descriptors, top first
    pub fn levels(&self) -> &[MipLevel] {
        self.layout.levels()
    }

    /// View of level `index`, if it exists
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        let level = self.layout.levels().get(index)?;
        ImageView::new(
            "RGBA",
            &self.data[level.offset..level.end()],
            ImageLayout::packed(level.width, level.height, RGBA_BYTES),
        )
        .ok()
    }

    /// All levels as one flat buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
