//! Recording bytes reader.

use std::path::{Path, PathBuf};

use futures_lite::future;
use lorecraft_assets::io::path_key;
use lorecraft_assets::{AssetError, BytesFuture, BytesReader, ExistsFuture, MemoryReader};
use parking_lot::Mutex;

/// One recorded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
    pub path: String,
    pub ok: bool,
}

/// Wraps a [`MemoryReader`], recording reads and failing on demand.
pub struct RecordingReader {
    inner: Mutex<MemoryReader>,
    /// Recorded calls for verification
    calls: Mutex<Vec<ReadCall>>,
    /// Paths that fail regardless of content
    failing: Mutex<Vec<String>>,
}

impl RecordingReader {
    pub fn new(inner: MemoryReader) -> Self {
        Self {
            inner: Mutex::new(inner),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    /// Make reads of `path` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, path: impl AsRef<Path>) {
        self.failing.lock().push(path_key(path.as_ref()));
    }

    pub fn heal(&self, path: impl AsRef<Path>) {
        let key = path_key(path.as_ref());
        self.failing.lock().retain(|p| *p != key);
    }

    /// Add or replace bytes after construction.
    pub fn insert(&self, path: impl AsRef<Path>, bytes: Vec<u8>) {
        self.inner.lock().insert(path, bytes);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<ReadCall> {
        self.calls.lock().clone()
    }

    /// Number of reads of `path`.
    pub fn call_count(&self, path: impl AsRef<Path>) -> usize {
        let key = path_key(path.as_ref());
        self.calls.lock().iter().filter(|c| c.path == key).count()
    }

    /// Total number of recorded calls.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        let key = path_key(path);
        let result = if self.failing.lock().contains(&key) {
            Err(AssetError::Rejected {
                path: key.clone(),
                reason: "injected failure".to_string(),
            })
        } else {
            future::block_on(self.inner.lock().read_bytes(&PathBuf::from(&key)))
        };
        self.calls.lock().push(ReadCall {
            path: key,
            ok: result.is_ok(),
        });
        result
    }
}

impl BytesReader for RecordingReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        Box::pin(future::ready(self.read(path)))
    }

    fn exists(&self, path: &Path) -> ExistsFuture {
        let exists = self.inner.lock().contains(path);
        Box::pin(future::ready(exists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_reads() {
        let mut inner = MemoryReader::new();
        inner.insert("a.bin", vec![1]);
        let reader = RecordingReader::new(inner);

        assert!(pollster::block_on(reader.read_bytes(Path::new("a.bin"))).is_ok());
        assert!(pollster::block_on(reader.read_bytes(Path::new("b.bin"))).is_err());
        assert_eq!(
            reader.calls(),
            vec![
                ReadCall { path: "a.bin".into(), ok: true },
                ReadCall { path: "b.bin".into(), ok: false },
            ]
        );
    }

    #[test]
    fn test_fail_and_heal() {
        let mut inner = MemoryReader::new();
        inner.insert("a.bin", vec![1]);
        let reader = RecordingReader::new(inner);

        reader.fail("a.bin");
        assert!(pollster::block_on(reader.read_bytes(Path::new("a.bin"))).is_err());
        reader.heal("./a.bin");
        assert!(pollster::block_on(reader.read_bytes(Path::new("a.bin"))).is_ok());
        assert_eq!(reader.call_count("a.bin"), 2);
    }
}
