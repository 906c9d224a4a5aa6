//! Strided views over flat texel buffers
//!
//! A view pairs a slice with an [`ImageLayout`] and is only constructed after
//! the slice has been checked against the layout, so kernels can address
//! texels by coordinate without recomputing strides or re-validating.

use crate::error::{Result, check_len};
use rayon::prelude::*;

/// Shape of an interleaved, row-major image.
///
/// `row_stride` is measured in elements (not texels, not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub row_stride: usize,
}

impl ImageLayout {
    /// Tightly packed layout (no row padding)
    pub fn packed(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            row_stride: width as usize * channels,
        }
    }

    /// Number of texels
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Elements a backing slice must hold
    pub fn required_len(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        (self.height as usize - 1) * self.row_stride + self.width as usize * self.channels
    }

    /// Element offset of texel (x, y)
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_stride + x as usize * self.channels
    }

    /// Element range of row `y`
    #[inline]
    fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let start = y as usize * self.row_stride;
        start..start + self.width as usize * self.channels
    }
}

/// Read-only view of an image
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    layout: ImageLayout,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    /// Wrap `data`, failing if it is shorter than the layout requires
    pub fn new(what: &'static str, data: &'a [T], layout: ImageLayout) -> Result<Self> {
        check_len(what, layout.required_len(), data.len())?;
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> ImageLayout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Channel values of texel (x, y)
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> &'a [T] {
        let start = self.layout.offset(x, y);
        &self.data[start..start + self.layout.channels]
    }

    /// All channel values of row `y`
    #[inline]
    pub fn row(&self, y: u32) -> &'a [T] {
        &self.data[self.layout.row_range(y)]
    }
}

/// Mutable view of an image
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    layout: ImageLayout,
    data: &'a mut [T],
}

impl<'a, T> ImageViewMut<'a, T> {
    /// Wrap `data`, failing if it is shorter than the layout requires
    pub fn new(what: &'static str, data: &'a mut [T], layout: ImageLayout) -> Result<Self> {
        check_len(what, layout.required_len(), data.len())?;
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> ImageLayout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Rows as `row_stride`-sized chunks (the last row may omit its padding)
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, T> {
        let len = self.layout.required_len();
        self.data[..len].chunks_mut(self.layout.row_stride.max(1))
    }

    /// Parallel version of [`rows_mut`](Self::rows_mut)
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, T>
    where
        T: Send,
    {
        let len = self.layout.required_len();
        self.data[..len].par_chunks_mut(self.layout.row_stride.max(1))
    }
}
