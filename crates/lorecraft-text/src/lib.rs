//! Lorecraft Text - formatting codes to pixels.
//!
//! This crate turns `&`-code markup into styled glyph runs:
//! - [`parse`] splits input into lines of [`Segment`]s
//! - [`GlyphCatalog`] holds advance widths and lazily loaded glyph sheets
//! - [`reconcile`] places segments and works out what must be redrawn
//! - [`Rasterizer`] draws one segment onto any [`SurfaceSizer`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lorecraft_assets::FileReader;
//! use lorecraft_core::config::GlyphPaths;
//! use lorecraft_render::FrameCompositor;
//! use lorecraft_render::metrics::{LEFT_OFFSET, line_y};
//! use lorecraft_text::{GlyphCatalog, Rasterizer, parse, reconcile};
//!
//! # async fn run() -> Result<(), lorecraft_text::TextError> {
//! let mut catalog = GlyphCatalog::load(Arc::new(FileReader::new("assets")), GlyphPaths::default()).await?;
//! catalog.ensure_text_loaded(0, "&6Gold &lBold").await?;
//!
//! let mut document = parse("&6Gold &lBold");
//! let font = catalog.font(0)?;
//! reconcile(None, &mut document, &font);
//!
//! let mut frame = FrameCompositor::new(true);
//! let mut rasterizer = Rasterizer::new();
//! for segment in &document.lines[0].segments {
//!     rasterizer.draw_segment(segment, LEFT_OFFSET + segment.x, line_y(0, true), &font, &mut frame)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod glyph;
pub mod layout;
pub mod markup;
pub mod raster;

pub use error::{TextError, TextResult};
pub use format::{ChatColor, FORMAT_PREFIX, FormatCode, StyleCode, StyleSet};
pub use glyph::{FontView, GlyphCatalog, GlyphPage, GlyphSheet, split_codepoint};
pub use layout::{DrawOp, LinePlan, RedrawPlan, reconcile, relayout};
pub use markup::{Document, Line, Segment, parse};
pub use raster::Rasterizer;
