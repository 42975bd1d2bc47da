//! Errors raised while fetching glyph data.

use std::fmt;
use std::path::PathBuf;

/// Why a read of asset bytes failed.
#[derive(Debug)]
pub enum AssetError {
    /// Nothing is stored under the path.
    NotFound { path: String },

    /// The file exists but reading it failed.
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source refused the read, e.g. a fetcher that is offline.
    Rejected { path: String, reason: String },
}

impl AssetError {
    /// The path the failed read was for.
    pub fn path(&self) -> String {
        match self {
            AssetError::NotFound { path } | AssetError::Rejected { path, .. } => path.clone(),
            AssetError::IoError { path, .. } => path.display().to_string(),
        }
    }

    /// Whether trying the same read again could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, AssetError::NotFound { .. })
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path } => write!(f, "No asset at '{}'", path),
            AssetError::IoError { path, source } => {
                write!(f, "Reading '{}' failed: {}", path.display(), source)
            }
            AssetError::Rejected { path, reason } => {
                write!(f, "Read of '{}' rejected: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AssetError::NotFound {
            path: "glyphs/old/00.png".to_string(),
        };
        assert_eq!(err.to_string(), "No asset at 'glyphs/old/00.png'");
        assert_eq!(err.path(), "glyphs/old/00.png");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err = AssetError::IoError {
            path: PathBuf::from("data/glyph_sizes.bin"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.is_transient());
        assert!(err.to_string().contains("data/glyph_sizes.bin"));
    }
}
