//! Test utilities for Lorecraft.
//!
//! This crate provides fixtures for exercising the renderer without real
//! game assets.
//!
//! # Overview
//!
//! The main components are:
//!
//! - [`glyphs`] - synthetic glyph sheets with known ink and width tables
//! - [`RecordingReader`] - a [`BytesReader`](lorecraft_assets::BytesReader)
//!   that records every read and can be told to fail
//! - [`MockSizer`] - a [`SurfaceSizer`](lorecraft_render::SurfaceSizer) that
//!   records growth requests
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use lorecraft_assets::BytesReader;
//! use lorecraft_core::config::GlyphPaths;
//! use lorecraft_test_utils::{RecordingReader, glyphs};
//!
//! let paths = GlyphPaths::default();
//! let reader = RecordingReader::new(glyphs::fixture_reader(1, &[0], 6, 4));
//! reader.fail(paths.sheet(0, 0));
//!
//! assert!(pollster::block_on(reader.read_bytes(&paths.sheet(0, 0))).is_err());
//! assert_eq!(reader.call_count(&paths.sheet(0, 0)), 1);
//! ```
//!
//! # Interior Mutability
//!
//! Readers are shared behind `Arc<dyn BytesReader>`, so the recording reader
//! takes `&self` everywhere and keeps its log in `parking_lot::Mutex`es.

pub mod glyphs;
pub mod reader;
pub mod sizer;

pub use reader::{ReadCall, RecordingReader};
pub use sizer::MockSizer;
