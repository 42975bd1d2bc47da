//! Asset access for Lorecraft.
//!
//! Glyph width tables and glyph sheets are fetched through a [`BytesReader`],
//! which keeps the renderer independent of where the bytes come from (disk,
//! embedded data, or a network fetcher supplied by the host).

pub mod error;
pub mod io;
pub mod state;

pub use error::{AssetError, AssetResult};
pub use io::{BytesFuture, BytesReader, ExistsFuture, FileReader, MemoryReader};
pub use state::{AssetState, LoadState};
