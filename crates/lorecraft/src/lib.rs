//! Lorecraft - Minecraft-style tooltip images from formatted text.
//!
//! Lorecraft turns `&`-code markup into a framed RGBA image drawn with the
//! game's bitmap font:
//!
//! - **Markup**: `&0`-`&f` colors, `&l` bold, `&m` strikethrough, `&n`
//!   underline, `&o` italic, `&r` reset
//! - **Glyphs**: per-page glyph sheets loaded on demand for every font version
//! - **Incremental redraw**: only segments whose text, style or position
//!   changed are redrawn
//! - **Export**: PNG bytes or files
//!
//! # Quick Start
//!
//! ```no_run
//! use lorecraft::Generator;
//!
//! # fn main() -> lorecraft::GeneratorResult<()> {
//! let mut generator = pollster::block_on(
//!     Generator::builder()
//!         .asset_root("assets")
//!         .text("&b&lDiamond Sword\n&7When in main hand:\n &22 Attack Speed")
//!         .build(),
//! )?;
//! pollster::block_on(generator.render())?;
//! generator.save_png(generator.suggested_file_name())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The workspace is split by concern and every crate is re-exported here:
//!
//! - [`core`] - settings snapshot, geometry, logging, profiling
//! - [`assets`] - byte readers the glyph data is fetched through
//! - [`render`] - raster surface, tooltip frame, PNG encoding
//! - [`text`] - markup parser, glyph catalog, layout, rasterizer
//!
//! [`Generator`] ties them together into render passes driven by edits,
//! settings changes and a periodic refresh timer.

pub mod export;
pub mod gate;
pub mod generator;
pub mod schedule;

pub use lorecraft_assets as assets;
pub use lorecraft_core as core;
pub use lorecraft_render as render;
pub use lorecraft_text as text;

pub use export::{DEFAULT_FILE_STEM, suggested_file_name};
pub use gate::{RenderGate, RenderTicket, RenderTrigger};
pub use generator::{
    Generator, GeneratorBuilder, GeneratorError, GeneratorResult, RedrawHint, RenderOutcome,
    RenderStats,
};
pub use schedule::RefreshSchedule;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::generator::{Generator, GeneratorError, RedrawHint, RenderOutcome};
    pub use crate::schedule::RefreshSchedule;

    pub use lorecraft_core::config::{GlyphPaths, RenderSettings, SettingKey};
    pub use lorecraft_render::{Color, FrameCompositor};
    pub use lorecraft_text::{ChatColor, Document, GlyphCatalog, StyleSet, parse};
}
