//! Mip chain geometry
//!
//! Mip counts, cumulative texel counts, and the byte layout of an RGBA
//! mip chain stored back-to-back in one flat buffer.

/// Bytes per RGBA8 texel
pub const RGBA_BYTES: usize = 4;

/// Number of halvings needed to reduce an extent to 1×1×1.
///
/// The top level is not counted, so a single-texel input returns 0.
/// Zero-sized axes are treated as 1.
pub fn count_texture_mips(width: u32, height: u32, depth: u32) -> u32 {
    let (mut w, mut h, mut d) = (width.max(1), height.max(1), depth.max(1));
    let mut mips = 0;
    while w > 1 || h > 1 || d > 1 {
        w = (w >> 1).max(1);
        h = (h >> 1).max(1);
        d = (d >> 1).max(1);
        mips += 1;
    }
    mips
}

/// Sum of texel counts over the natural halving chain.
///
/// Each step adds the current extent's texel count *before* halving and the
/// loop stops once the extent reaches 1×1×1, so the sum covers the top level
/// and every level except the final 1×1×1. The mip count argument never
/// changes the result: the chain length always follows from the extent, exactly as
/// [`count_texture_mips`] counts it. Buffer sizing adds the top level on top
/// of this; see [`rgba_chain_bytes`].
pub fn count_texture_pixels(width: u32, height: u32, depth: u32, _mip_count: u32) -> u64 {
    let (mut w, mut h, mut d) = (width.max(1), height.max(1), depth.max(1));
    let mut texels = 0u64;
    while w > 1 || h > 1 || d > 1 {
        texels += w as u64 * h as u64 * d as u64;
        w = (w >> 1).max(1);
        h = (h >> 1).max(1);
        d = (d >> 1).max(1);
    }
    texels
}

/// Size of `dim` at mip `level`, never below 1.
#[inline]
pub fn mip_extent(dim: u32, level: u32) -> u32 {
    dim.max(1).checked_shr(level).unwrap_or(0).max(1)
}

/// Byte size of a flat RGBA buffer holding a top level plus its chain.
///
/// `4 * (width * height + count_texture_pixels(width, height, 1, mip_count))`
pub fn rgba_chain_bytes(width: u32, height: u32, mip_count: u32) -> usize {
    let top = width as u64 * height as u64;
    let chain = count_texture_pixels(width, height, 1, mip_count);
    (top + chain) as usize * RGBA_BYTES
}

/// One level of an RGBA mip chain inside a flat buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    /// Level index (0 = full resolution)
    pub index: u32,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Byte offset of the first texel
    pub offset: usize,
    /// Byte length of the level
    pub len: usize,
}

impl MipLevel {
    /// Number of texels in this level
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte offset one past the last texel
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Ordered level descriptors for an RGBA mip chain.
///
/// Levels are contiguous with no padding: level `k + 1` starts at the end of
/// level `k`. Each level after the first halves the previous extent, flooring
/// at 1, so requesting more levels than the natural chain yields trailing
/// 1×1 levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLayout {
    levels: Vec<MipLevel>,
}

impl MipLayout {
    /// Build the layout for `level_count` total levels (including level 0).
    ///
    /// A `level_count` of 0 selects `count_texture_mips(width, height, 1)`.
    pub fn new(width: u32, height: u32, level_count: u32) -> Self {
        let level_count = if level_count == 0 {
            count_texture_mips(width, height, 1)
        } else {
            level_count
        };

        // Level 0 always exists, even when the default count is 0 (1×1 input)
        let mut levels = Vec::with_capacity(level_count.max(1) as usize);
        let (mut w, mut h) = (width, height);
        let mut offset = 0;
        for index in 0..level_count.max(1) {
            if index > 0 {
                w = (w >> 1).max(1);
                h = (h >> 1).max(1);
            }
            let len = w as usize * h as usize * RGBA_BYTES;
            levels.push(MipLevel {
                index,
                width: w,
                height: h,
                offset,
                len,
            });
            offset += len;
        }

        Self { levels }
    }

    /// Bytes [`MipLayout::new`] would span, computed without building the
    /// level list.
    ///
    /// Levels past the natural chain are 1×1 and add [`RGBA_BYTES`] each.
    /// Returns `None` if the size does not fit in `usize`.
    pub fn required_bytes(width: u32, height: u32, level_count: u32) -> Option<usize> {
        let level_count = if level_count == 0 {
            count_texture_mips(width, height, 1)
        } else {
            level_count
        }
        .max(1);

        let (mut w, mut h) = (width, height);
        let mut bytes = 0usize;
        let mut index = 0;
        while index < level_count {
            if index > 0 {
                w = (w >> 1).max(1);
                h = (h >> 1).max(1);
            }
            let len = (w as usize).checked_mul(h as usize)?.checked_mul(RGBA_BYTES)?;
            bytes = bytes.checked_add(len)?;
            index += 1;
            if w == 1 && h == 1 {
                break;
            }
        }

        let unit_levels = (level_count - index) as usize;
        bytes.checked_add(unit_levels.checked_mul(RGBA_BYTES)?)
    }

    /// All levels, top first
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Number of levels including the top level
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The top (full resolution) level
    pub fn top(&self) -> MipLevel {
        self.levels[0]
    }

    /// Bytes needed to hold every level
    pub fn total_bytes(&self) -> usize {
        self.levels.last().map_or(0, MipLevel::end)
    }
}
