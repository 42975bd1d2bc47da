//! Byte sources for glyph data.
//!
//! The renderer never touches the file system directly: the width table and
//! the glyph sheets are fetched through a [`BytesReader`]. Reads return
//! futures so that a host can plug in a fetcher that really suspends; the
//! bundled readers answer immediately.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use futures_lite::future;

use crate::error::{AssetError, AssetResult};

/// Pending result of [`BytesReader::read_bytes`].
pub type BytesFuture = Pin<Box<dyn Future<Output = AssetResult<Vec<u8>>> + Send + 'static>>;

/// Pending result of [`BytesReader::exists`].
pub type ExistsFuture = Pin<Box<dyn Future<Output = bool> + Send + 'static>>;

/// Somewhere asset bytes can be read from.
pub trait BytesReader: Send + Sync {
    /// Read the whole asset at `path`.
    fn read_bytes(&self, path: &Path) -> BytesFuture;

    fn exists(&self, path: &Path) -> ExistsFuture;
}

/// Normalized form of an asset path: forward slashes, no leading `./`.
///
/// ```
/// use std::path::Path;
/// use lorecraft_assets::io::path_key;
///
/// assert_eq!(path_key(Path::new("./glyphs/old/00.png")), "glyphs/old/00.png");
/// ```
pub fn path_key(path: &Path) -> String {
    let key = path.to_string_lossy().replace('\\', "/");
    match key.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => key,
    }
}

/// Reads assets from disk below a root directory, blocking the caller.
#[derive(Debug, Clone)]
pub struct FileReader {
    root: PathBuf,
}

impl FileReader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn read_bytes_sync(&self, path: &Path) -> AssetResult<Vec<u8>> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound {
                path: full.display().to_string(),
            },
            _ => AssetError::IoError { path: full, source },
        })
    }

    pub fn exists_sync(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }
}

impl BytesReader for FileReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        tracing::trace!("Reading {} from {}", path.display(), self.root.display());
        Box::pin(future::ready(self.read_bytes_sync(path)))
    }

    fn exists(&self, path: &Path) -> ExistsFuture {
        Box::pin(future::ready(self.exists_sync(path)))
    }
}

/// Assets held in memory, keyed by [`path_key`].
///
/// Used for embedded glyph data and as the base of test fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path`, replacing what was there.
    pub fn insert(&mut self, path: impl AsRef<Path>, bytes: Vec<u8>) {
        self.entries.insert(path_key(path.as_ref()), bytes);
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.entries.remove(&path_key(path.as_ref()))
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&path_key(path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BytesReader for MemoryReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        let key = path_key(path);
        let result = match self.entries.get(&key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(AssetError::NotFound { path: key }),
        };
        Box::pin(future::ready(result))
    }

    fn exists(&self, path: &Path) -> ExistsFuture {
        Box::pin(future::ready(self.contains(path)))
    }
}
