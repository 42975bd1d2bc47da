use lorecraft_assets::AssetError;

/// Errors that can occur while preparing or rasterizing text.
///
/// Malformed markup is never an error; it renders as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The width table is empty or not a whole number of font versions.
    InvalidWidthTable { len: usize },

    /// Font version index out of range.
    UnknownFontVersion { version: usize, available: usize },

    /// A glyph sheet could not be loaded.
    GlyphPageUnavailable { version: usize, page: u8 },

    /// A glyph sheet was needed for drawing but has not been loaded.
    GlyphPageNotLoaded { version: usize, page: u8 },

    /// A glyph sheet was read but is not a usable image.
    InvalidGlyphSheet { path: String, message: String },

    /// Reading asset bytes failed.
    Asset(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::InvalidWidthTable { len } => write!(
                f,
                "Invalid glyph width table: {} bytes is not a multiple of 65536",
                len
            ),
            TextError::UnknownFontVersion { version, available } => write!(
                f,
                "Unknown font version {} ({} available)",
                version, available
            ),
            TextError::GlyphPageUnavailable { version, page } => write!(
                f,
                "Glyph page {:02x} of font version {} could not be loaded",
                page, version
            ),
            TextError::GlyphPageNotLoaded { version, page } => write!(
                f,
                "Glyph page {:02x} of font version {} is not loaded",
                page, version
            ),
            TextError::InvalidGlyphSheet { path, message } => {
                write!(f, "Invalid glyph sheet '{}': {}", path, message)
            }
            TextError::Asset(msg) => write!(f, "Asset error: {}", msg),
        }
    }
}

impl std::error::Error for TextError {}

impl From<AssetError> for TextError {
    fn from(err: AssetError) -> Self {
        TextError::Asset(err.to_string())
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
