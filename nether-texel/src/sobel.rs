//! Sobel gradient of a tileable height field
//!
//! The field is treated as a torus: neighbours past an edge wrap to the
//! opposite edge, so every texel has a full 3×3 neighbourhood.

use glam::Vec2;
use rayon::prelude::*;
use tracing::debug;

use crate::config::SobelConfig;
use crate::error::{Result, check_extent};
use crate::view::{ImageLayout, ImageView, ImageViewMut};

/// Compute a 2-channel gradient field from a height field.
///
/// Writes `(scale * dx / 8, scale * dy / 8)` per texel into `grad_out`
/// (`2 * width * height` floats), where
///
/// ```text
/// dx:  1 0 -1      dy:  1  2  1
///      2 0 -2           0  0  0
///      1 0 -1          -1 -2 -1
/// ```
///
/// and `height_in` holds `width * height` floats.
pub fn sobel_3x3(grad_out: &mut [f32], height_in: &[f32], scale: f32, width: u32, height: u32) -> Result<()> {
    let config = SobelConfig {
        scale,
        ..SobelConfig::default()
    };
    sobel_3x3_with(grad_out, height_in, width, height, &config)
}

/// [`sobel_3x3`] with explicit settings
pub fn sobel_3x3_with(
    grad_out: &mut [f32],
    height_in: &[f32],
    width: u32,
    height: u32,
    config: &SobelConfig,
) -> Result<()> {
    check_extent(width, height)?;
    let heights = ImageView::new("height", height_in, ImageLayout::packed(width, height, 1))?;
    let mut grads = ImageViewMut::new("gradient", grad_out, ImageLayout::packed(width, height, 2))?;

    debug!("Sobel 3x3 over {}x{} (scale {})", width, height, config.scale);

    let scale = config.scale;
    if heights.layout().texel_count() >= config.parallel_min_texels {
        grads
            .par_rows_mut()
            .enumerate()
            .for_each(|(y, row)| gradient_row(&heights, y as u32, scale, row));
    } else {
        for (y, row) in grads.rows_mut().enumerate() {
            gradient_row(&heights, y as u32, scale, row);
        }
    }
    Ok(())
}

impl SobelConfig {
    /// Run [`sobel_3x3`] with these settings
    pub fn apply(&self, grad_out: &mut [f32], height_in: &[f32], width: u32, height: u32) -> Result<()> {
        sobel_3x3_with(grad_out, height_in, width, height, self)
    }
}

/// Gradients for row `y`, written as interleaved (dx, dy) pairs
fn gradient_row(heights: &ImageView<'_, f32>, y: u32, scale: f32, row: &mut [f32]) {
    let (w, h) = (heights.width(), heights.height());
    let up = heights.row(wrap_prev(y, h));
    let mid = heights.row(y);
    let down = heights.row(wrap_next(y, h));

    for (x, out) in row.chunks_exact_mut(2).enumerate() {
        let x1 = x;
        let x0 = wrap_prev(x as u32, w) as usize;
        let x2 = wrap_next(x as u32, w) as usize;

        let dx = (up[x0] + 2.0 * mid[x0] + down[x0]) - (up[x2] + 2.0 * mid[x2] + down[x2]);
        let dy = (up[x0] + 2.0 * up[x1] + up[x2]) - (down[x0] + 2.0 * down[x1] + down[x2]);

        let grad = Vec2::new(dx, dy) * (scale / 8.0);
        out.copy_from_slice(&grad.to_array());
    }
}

/// `(i - 1) mod n`
#[inline]
fn wrap_prev(i: u32, n: u32) -> u32 {
    if i == 0 { n - 1 } else { i - 1 }
}

/// `(i + 1) mod n`
#[inline]
fn wrap_next(i: u32, n: u32) -> u32 {
    if i + 1 >= n { 0 } else { i + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TexelError;

    fn gradient_at(grad: &[f32], width: u32, x: u32, y: u32) -> (f32, f32) {
        let i = 2 * (y * width + x) as usize;
        (grad[i], grad[i + 1])
    }

    #[test]
    fn test_wrap_helpers() {
        assert_eq!(wrap_prev(0, 5), 4);
        assert_eq!(wrap_prev(3, 5), 2);
        assert_eq!(wrap_next(4, 5), 0);
        assert_eq!(wrap_next(1, 5), 2);
        assert_eq!(wrap_prev(0, 1), 0);
        assert_eq!(wrap_next(0, 1), 0);
    }

    #[test]
    fn test_constant_field_is_flat() {
        let heights = vec![3.25f32; 7 * 5];
        let mut grad = vec![1.0f32; 2 * 7 * 5];
        sobel_3x3(&mut grad, &heights, 10.0, 7, 5).unwrap();
        assert!(grad.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_horizontal_ramp() {
        // h = x on a 4-wide field, interior texel (1, 1): left column 0, right column 2
        let (w, h) = (4u32, 3u32);
        let heights: Vec<f32> = (0..w * h).map(|i| (i % w) as f32).collect();
        let mut grad = vec![0.0f32; (2 * w * h) as usize];
        sobel_3x3(&mut grad, &heights, 1.0, w, h).unwrap();

        // dx = (0 + 0 + 0) - (2 + 4 + 2) = -8
        let (dx, dy) = gradient_at(&grad, w, 1, 1);
        assert_eq!(dx, -1.0);
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn test_vertical_ramp_scaled() {
        // h = y on a 3-tall field, texel (0, 1): row above 0, row below 2
        let (w, h) = (3u32, 3u32);
        let heights: Vec<f32> = (0..w * h).map(|i| (i / w) as f32).collect();
        let mut grad = vec![0.0f32; (2 * w * h) as usize];
        sobel_3x3(&mut grad, &heights, 2.0, w, h).unwrap();

        // dy = (0 + 0 + 0) - (2 + 4 + 2) = -8, scaled by 2 / 8
        let (dx, dy) = gradient_at(&grad, w, 0, 1);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, -2.0);
    }

    #[test]
    fn test_edges_wrap_around() {
        // h = x on a 4-wide field; at x = 0 the left neighbour is column 3
        let (w, h) = (4u32, 2u32);
        let heights: Vec<f32> = (0..w * h).map(|i| (i % w) as f32).collect();
        let mut grad = vec![0.0f32; (2 * w * h) as usize];
        sobel_3x3(&mut grad, &heights, 1.0, w, h).unwrap();

        // dx = 4 * 3 - 4 * 1 = 8
        assert_eq!(gradient_at(&grad, w, 0, 0), (1.0, 0.0));
        // at x = 3 the right neighbour is column 0: dx = 4 * 2 - 4 * 0 = 8
        assert_eq!(gradient_at(&grad, w, 3, 1), (1.0, 0.0));
    }

    #[test]
    fn test_two_by_two_neighbours_coincide() {
        // On a 2-wide field, x - 1 and x + 1 both resolve to the other column,
        // so the horizontal kernel cancels; same for rows.
        let heights = [0.0f32, 5.0, 11.0, 17.0];
        let mut grad = vec![9.0f32; 8];
        sobel_3x3(&mut grad, &heights, 1.0, 2, 2).unwrap();
        assert!(grad.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_single_impulse() {
        // 3x3 field with a spike at (1, 1)
        let mut heights = [0.0f32; 9];
        heights[4] = 8.0;
        let mut grad = vec![0.0f32; 18];
        sobel_3x3(&mut grad, &heights, 1.0, 3, 3).unwrap();

        // Left of the spike: the spike is its x + 1 neighbour with weight -2
        assert_eq!(gradient_at(&grad, 3, 0, 1), (-2.0, 0.0));
        // Right of the spike: x - 1 neighbour with weight +2
        assert_eq!(gradient_at(&grad, 3, 2, 1), (2.0, 0.0));
        // Above the spike: y + 1 neighbour with weight -2
        assert_eq!(gradient_at(&grad, 3, 1, 0), (0.0, -2.0));
        // Diagonal (0, 0): spike is x + 1 and y + 1 with weight -1 each
        assert_eq!(gradient_at(&grad, 3, 0, 0), (-1.0, -1.0));
        // The spike's own texel has symmetric neighbours
        assert_eq!(gradient_at(&grad, 3, 1, 1), (0.0, 0.0));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let (w, h) = (37u32, 19u32);
        let heights: Vec<f32> = (0..w * h).map(|i| ((i * 7919) % 113) as f32 * 0.25).collect();

        let mut serial = vec![0.0f32; (2 * w * h) as usize];
        let mut parallel = serial.clone();
        SobelConfig {
            scale: 3.0,
            parallel_min_texels: usize::MAX,
        }
        .apply(&mut serial, &heights, w, h)
        .unwrap();
        SobelConfig {
            scale: 3.0,
            parallel_min_texels: 1,
        }
        .apply(&mut parallel, &heights, w, h)
        .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_short_buffers_rejected() {
        let heights = vec![0.0f32; 15];
        let mut grad = vec![0.0f32; 32];
        assert!(matches!(
            sobel_3x3(&mut grad, &heights, 1.0, 4, 4),
            Err(TexelError::BufferTooSmall { what: "height", .. })
        ));

        let heights = vec![0.0f32; 16];
        let mut grad = vec![0.0f32; 31];
        assert!(matches!(
            sobel_3x3(&mut grad, &heights, 1.0, 4, 4),
            Err(TexelError::BufferTooSmall { what: "gradient", .. })
        ));
    }
}
