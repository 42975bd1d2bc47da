//! Lorecraft Core
//!
//! Shared building blocks for the Lorecraft renderer: fast hash collections,
//! integer geometry, the render settings snapshot, logging and profiling.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod profiling;
