//! CPU-side texel processing for Nethercore
//!
//! Small, stateless kernels over flat, row-major texel buffers:
//!
//! - mip chain geometry (level counts, texel counts, level layout)
//! - 2×2 box-filter mip generation (RGB→RGBA and in-place RGBA)
//! - 3×3 Sobel gradients over a wrap-around height field
//! - random rotation fields packed as signed (cos, sin) bytes
//!
//! Buffers carry no header. Dimensions are passed alongside and are checked
//! against the slice length once per call; the kernels then address texels
//! through bounds-checked views.
//!
//! # Mip Example
//! ```no_run
//! use nether_texel::*;
//!
//! let (w, h) = (256, 256);
//! let rgb = vec![128u8; (w * h * 3) as usize];
//!
//! // Flat buffer sized by the caller
//! let mut out = vec![0u8; rgba_chain_bytes(w, h, 0)];
//! generate_mips_rgb_to_rgba(&mut out, &rgb, w, h, 0)?;
//!
//! // Or let the chain own its storage
//! let chain = MipChain::from_rgb(&rgb, w, h, 0)?;
//! let level = chain.level(3).unwrap();
//! assert_eq!((level.width(), level.height()), (32, 32));
//! # Ok::<(), nether_texel::TexelError>(())
//! ```
//!
//! # Gradient Example
//! ```no_run
//! use nether_texel::*;
//!
//! let heights = vec![0.0f32; 64 * 64];
//! let mut grad = vec![0.0f32; 2 * 64 * 64];
//! sobel_3x3(&mut grad, &heights, 4.0, 64, 64)?;
//!
//! let mut rotations = vec![0i8; 2 * 64 * 64];
//! RotationConfig { seed: 42 }.create_rotations(&mut rotations, 64, 64)?;
//! # Ok::<(), nether_texel::TexelError>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod mipmap;
pub mod rotation;
pub mod sobel;
pub mod view;

pub use config::{MipConfig, RotationConfig, SobelConfig, TexelConfig};
pub use error::{Result, TexelError};
pub use geometry::{
    MipLayout, MipLevel, RGBA_BYTES, count_texture_mips, count_texture_pixels, mip_extent,
    rgba_chain_bytes,
};
pub use mipmap::{
    MipChain, generate_mips_rgb_to_rgba, generate_mips_rgb_to_rgba_with,
    generate_mips_rgba_in_place, generate_mips_rgba_in_place_with,
};
pub use rotation::{create_random_rotations, pack_rotation, unpack_rotation};
pub use sobel::{sobel_3x3, sobel_3x3_with};
pub use view::{ImageLayout, ImageView, ImageViewMut};
