//! PNG export of rendered frames.

use std::path::Path;

use image::{ExtendedColorType, ImageEncoder, RgbaImage, codecs::png::PngEncoder};

/// Image export error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The image has a zero dimension
    InvalidDimensions,
    /// Image encoding failed
    EncodeFailed(String),
    /// IO error
    IoError(String),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions => write!(f, "Invalid dimensions for export"),
            Self::EncodeFailed(msg) => write!(f, "Image encoding failed: {}", msg),
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(EncodeError::InvalidDimensions);
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodeFailed(e.to_string()))?;

    tracing::trace!(
        "Encoded {}x{} frame into {} bytes",
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encode and write a PNG file.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes).map_err(|e| EncodeError::IoError(format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::EncodeFailed("test".to_string());
        assert!(format!("{}", err).contains("Image encoding failed"));

        let err = EncodeError::InvalidDimensions;
        assert!(format!("{}", err).contains("Invalid dimensions"));
    }

    #[test]
    fn test_encode_writes_png_signature() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([20, 3, 20, 255]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = RgbaImage::new(0, 4);
        assert_eq!(encode_png(&image), Err(EncodeError::InvalidDimensions));
    }
}
