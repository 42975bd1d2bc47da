//! Synthetic glyph assets.
//!
//! Every sprite of a synthetic sheet carries opaque white ink in the same
//! place: a block `ink_width` columns wide covering all 16 rows, starting at
//! the sprite's left edge. That makes drawn pixels easy to predict.

use image::{Rgba, RgbaImage};
use lorecraft_assets::MemoryReader;
use lorecraft_core::config::GlyphPaths;
use lorecraft_render::encode_png;

const SPRITE: u32 = 16;
const SHEET: u32 = SPRITE * 16;
const TABLE_STRIDE: usize = 256 * 256;

/// A 256 x 256 sheet with `ink_width` columns of ink per sprite.
pub fn solid_sheet(ink_width: u32) -> RgbaImage {
    sheet_with(|_| ink_width)
}

/// A sheet whose ink width is chosen per sprite index.
pub fn sheet_with(ink_width: impl Fn(u8) -> u32) -> RgbaImage {
    let mut image = RgbaImage::new(SHEET, SHEET);
    for index in 0..=255u8 {
        let ox = (index % 16) as u32 * SPRITE;
        let oy = (index / 16) as u32 * SPRITE;
        for y in 0..SPRITE {
            for x in 0..ink_width(index).min(SPRITE) {
                image.put_pixel(ox + x, oy + y, Rgba([255, 255, 255, 255]));
            }
        }
    }
    image
}

/// PNG bytes of [`solid_sheet`].
pub fn solid_sheet_png(ink_width: u32) -> Vec<u8> {
    png(&solid_sheet(ink_width))
}

pub fn png(image: &RgbaImage) -> Vec<u8> {
    match encode_png(image) {
        Ok(bytes) => bytes,
        Err(err) => panic!("fixture image failed to encode: {}", err),
    }
}

/// A width table where every glyph of every version advances `width`.
pub fn width_table(versions: usize, width: u8) -> Vec<u8> {
    vec![width; versions * TABLE_STRIDE]
}

/// A width table with per-codepoint widths.
pub fn width_table_with(versions: usize, width: impl Fn(usize, u16) -> u8) -> Vec<u8> {
    (0..versions * TABLE_STRIDE)
        .map(|i| width(i / TABLE_STRIDE, (i % TABLE_STRIDE) as u16))
        .collect()
}

/// A reader holding a uniform width table and solid sheets for `pages` of
/// every version, at the default [`GlyphPaths`].
pub fn fixture_reader(versions: usize, pages: &[u8], advance: u8, ink_width: u32) -> MemoryReader {
    let paths = GlyphPaths::default();
    let mut reader = MemoryReader::new();
    reader.insert(&paths.width_table, width_table(versions, advance));
    let sheet = solid_sheet_png(ink_width);
    for version in 0..versions {
        for &page in pages {
            reader.insert(paths.sheet(version, page), sheet.clone());
        }
    }
    reader
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_sheet_ink() {
        let sheet = solid_sheet(4);
        // sprite 0x41 sits at (16, 64)
        assert_eq!(sheet.get_pixel(16 + 3, 64 + 15).0[3], 255);
        assert_eq!(sheet.get_pixel(16 + 4, 64).0[3], 0);
    }

    #[test]
    fn test_width_table_layout() {
        let table = width_table_with(2, |version, code| if version == 1 && code == 0x41 { 9 } else { 5 });
        assert_eq!(table.len(), 2 * TABLE_STRIDE);
        assert_eq!(table[0x41], 5);
        assert_eq!(table[TABLE_STRIDE + 0x41], 9);
    }

    #[test]
    fn test_fixture_reader_contents() {
        let paths = GlyphPaths::default();
        let reader = fixture_reader(2, &[0, 0x27], 6, 4);
        assert!(reader.contains(&paths.width_table));
        assert!(reader.contains(paths.sheet(1, 0x27)));
        assert!(!reader.contains(paths.sheet(0, 1)));
        assert_eq!(reader.len(), 5);
    }
}
