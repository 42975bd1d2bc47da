//! Lorecraft Render - CPU raster surfaces and the tooltip frame.
//!
//! This crate provides:
//! - [`Color`], an 8-bit RGBA color
//! - [`RasterSurface`], canvas-style drawing on an [`image::RgbaImage`]
//! - [`FrameCompositor`], the framed output image with background and border
//! - PNG export
//!
//! # Example
//!
//! ```
//! use lorecraft_render::{FrameCompositor, SurfaceSizer};
//!
//! let mut frame = FrameCompositor::new(true);
//! frame.grow_to_fit(120);
//! assert_eq!(frame.drawable_width(), 120);
//! let png = frame.encode_png().unwrap();
//! assert!(!png.is_empty());
//! ```

mod color;
mod encode;
mod frame;
pub mod metrics;
mod surface;

pub use color::Color;
pub use encode::{EncodeError, encode_png, save_png};
pub use frame::{FrameCompositor, SurfaceSizer};
pub use surface::{RasterSurface, blend_over};

// Re-export image types used in the public API
pub use image::{Rgba, RgbaImage};
