//! Glyph catalog: advance widths and lazily loaded glyph sheets.
//!
//! Every font version has 256 codepoint pages. Advance widths for all pages
//! arrive in one table at startup; the sheet bitmap of a page is only read
//! the first time text on that page has to be drawn.

use std::sync::Arc;

use fxhash::FxHashSet;
use image::{ImageFormat, RgbaImage};
use lorecraft_assets::{AssetState, BytesReader, LoadState};
use lorecraft_core::config::GlyphPaths;
use lorecraft_core::geometry::Rect;
use lorecraft_core::profiling::profile_function;
use lorecraft_render::metrics::DPI;

use crate::error::{TextError, TextResult};
use crate::format::StyleSet;

/// Codepoints per page.
pub const GLYPHS_PER_PAGE: usize = 256;
/// Pages per font version.
pub const PAGES_PER_VERSION: usize = 256;
/// Width table bytes per font version.
pub const WIDTH_TABLE_STRIDE: usize = GLYPHS_PER_PAGE * PAGES_PER_VERSION;
/// Side of one glyph sprite.
pub const SPRITE_SIZE: u32 = 16;
/// Side of one glyph sheet: a 16 x 16 grid of sprites.
pub const SHEET_SIZE: u32 = SPRITE_SIZE * 16;
/// Drawn in place of codepoints the sheets cannot address.
pub const REPLACEMENT_CHAR: char = '?';

/// Map a character to the one actually drawn.
pub fn normalize(ch: char) -> char {
    if (ch as u32) > 0xFFFF {
        REPLACEMENT_CHAR
    } else {
        ch
    }
}

/// Split a character into `(page, index)`.
pub fn split_codepoint(ch: char) -> (u8, u8) {
    let code = normalize(ch) as u32;
    ((code >> 8) as u8, (code & 0xFF) as u8)
}

/// A decoded 256 x 256 glyph sheet.
#[derive(Debug, Clone)]
pub struct GlyphSheet {
    image: RgbaImage,
}

impl GlyphSheet {
    pub fn from_image(image: RgbaImage) -> Result<Self, String> {
        if image.width() != SHEET_SIZE || image.height() != SHEET_SIZE {
            return Err(format!(
                "expected {}x{} pixels, got {}x{}",
                SHEET_SIZE,
                SHEET_SIZE,
                image.width(),
                image.height()
            ));
        }
        Ok(Self { image })
    }

    /// Decode PNG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| e.to_string())?
            .to_rgba8();
        Self::from_image(image)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Source rectangle of the sprite at `index`.
    pub fn sprite_rect(index: u8) -> Rect<i32> {
        let size = SPRITE_SIZE as i32;
        Rect::new(
            (index % 16) as i32 * size,
            (index / 16) as i32 * size,
            size,
            size,
        )
    }
}

/// One codepoint page of one font version.
#[derive(Debug, Clone)]
pub struct GlyphPage {
    version: usize,
    page: u8,
    widths: [u8; GLYPHS_PER_PAGE],
    sheet: AssetState<GlyphSheet>,
}

impl GlyphPage {
    pub fn new(version: usize, page: u8, widths: [u8; GLYPHS_PER_PAGE]) -> Self {
        Self {
            version,
            page,
            widths,
            sheet: AssetState::Unloaded,
        }
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    /// Advance width of the glyph at `index`. Available before the sheet.
    pub fn glyph_width(&self, index: u8) -> u8 {
        self.widths[index as usize]
    }

    pub fn is_ready(&self) -> bool {
        self.sheet.is_ready()
    }

    pub fn load_state(&self) -> LoadState {
        LoadState::from(&self.sheet)
    }

    pub fn sheet(&self) -> Option<&Arc<GlyphSheet>> {
        self.sheet.get()
    }

    /// Message of the last failed load, if any.
    pub fn error(&self) -> Option<&str> {
        self.sheet.error()
    }

    /// Loads that failed in a row since the sheet was last available.
    pub fn failed_attempts(&self) -> u32 {
        self.sheet.failed_attempts()
    }
}

/// Advance widths and glyph sheets for every font version.
pub struct GlyphCatalog {
    versions: usize,
    pages: Vec<GlyphPage>,
    reader: Arc<dyn BytesReader>,
    paths: GlyphPaths,
}

impl std::fmt::Debug for GlyphCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCatalog")
            .field("versions", &self.versions)
            .field(
                "ready_pages",
                &self.pages.iter().filter(|p| p.is_ready()).count(),
            )
            .field("paths", &self.paths)
            .finish()
    }
}

impl GlyphCatalog {
    /// Build the catalog from a width table. No sheets are loaded.
    pub fn from_width_table(
        table: &[u8],
        reader: Arc<dyn BytesReader>,
        paths: GlyphPaths,
    ) -> TextResult<Self> {
        if table.is_empty() || table.len() % WIDTH_TABLE_STRIDE != 0 {
            return Err(TextError::InvalidWidthTable { len: table.len() });
        }
        let versions = table.len() / WIDTH_TABLE_STRIDE;

        let pages = table
            .chunks_exact(GLYPHS_PER_PAGE)
            .enumerate()
            .map(|(i, chunk)| {
                let mut widths = [0u8; GLYPHS_PER_PAGE];
                widths.copy_from_slice(chunk);
                GlyphPage::new(i / PAGES_PER_VERSION, (i % PAGES_PER_VERSION) as u8, widths)
            })
            .collect();

        tracing::debug!("Glyph catalog built with {} font version(s)", versions);
        Ok(Self {
            versions,
            pages,
            reader,
            paths,
        })
    }

    /// Read the width table and preload page 0 of every font version.
    ///
    /// A failed preload is logged and retried when text needs the page.
    pub async fn load(reader: Arc<dyn BytesReader>, paths: GlyphPaths) -> TextResult<Self> {
        let table = reader.read_bytes(&paths.width_table).await?;
        let mut catalog = Self::from_width_table(&table, reader, paths)?;
        for version in 0..catalog.versions {
            catalog.ensure_loaded(version, 0).await;
        }
        Ok(catalog)
    }

    pub fn version_count(&self) -> usize {
        self.versions
    }

    pub fn paths(&self) -> &GlyphPaths {
        &self.paths
    }

    fn check_version(&self, version: usize) -> TextResult<()> {
        if version < self.versions {
            Ok(())
        } else {
            Err(TextError::UnknownFontVersion {
                version,
                available: self.versions,
            })
        }
    }

    fn index(version: usize, page: u8) -> usize {
        version * PAGES_PER_VERSION + page as usize
    }

    pub fn page(&self, version: usize, page: u8) -> TextResult<&GlyphPage> {
        self.check_version(version)?;
        Ok(&self.pages[Self::index(version, page)])
    }

    /// Advance width of `ch` in font `version`.
    pub fn glyph_width(&self, version: usize, ch: char) -> TextResult<u8> {
        let (page, index) = split_codepoint(ch);
        Ok(self.page(version, page)?.glyph_width(index))
    }

    /// Load the sheet of one page unless it is already loaded.
    ///
    /// Returns whether the page is ready afterwards. Failed pages are tried
    /// again on the next call.
    pub async fn ensure_loaded(&mut self, version: usize, page: u8) -> bool {
        if version >= self.versions {
            tracing::warn!("Glyph page requested for unknown font version {}", version);
            return false;
        }
        let slot = Self::index(version, page);
        if self.pages[slot].is_ready() {
            return true;
        }

        let path = self.paths.sheet(version, page);
        let previous = std::mem::replace(&mut self.pages[slot].sheet, AssetState::Loading);
        let state = match self.reader.read_bytes(&path).await {
            Ok(bytes) => match GlyphSheet::decode(&bytes) {
                Ok(sheet) => AssetState::Ready(Arc::new(sheet)),
                Err(message) => {
                    let err = TextError::InvalidGlyphSheet {
                        path: path.display().to_string(),
                        message,
                    };
                    tracing::error!("{}", err);
                    previous.fail(err.to_string())
                }
            },
            Err(err) => {
                let state = previous.fail(err.to_string());
                tracing::error!(
                    "Couldn't load glyph sheet {} (attempt {}): {}",
                    path.display(),
                    state.failed_attempts(),
                    err
                );
                state
            }
        };

        let ready = state.is_ready();
        if ready {
            tracing::debug!("Loaded glyph page {:02x} of font version {}", page, version);
        }
        self.pages[slot].sheet = state;
        ready
    }

    /// Make sure every page referenced by `text` is loaded.
    ///
    /// Stops at the first page that fails to load.
    pub async fn ensure_text_loaded(&mut self, version: usize, text: &str) -> TextResult<()> {
        profile_function!();
        self.check_version(version)?;

        let mut seen = FxHashSet::default();
        for ch in text.chars() {
            let (page, _) = split_codepoint(ch);
            if !seen.insert(page) {
                continue;
            }
            if !self.ensure_loaded(version, page).await {
                return Err(TextError::GlyphPageUnavailable { version, page });
            }
        }
        Ok(())
    }

    /// Drop a loaded sheet so the next use reads it again.
    pub fn unload(&mut self, version: usize, page: u8) {
        if version < self.versions {
            self.pages[Self::index(version, page)].sheet = AssetState::Unloaded;
        }
    }

    /// Borrow one font version for measuring and drawing.
    pub fn font(&self, version: usize) -> TextResult<FontView<'_>> {
        self.check_version(version)?;
        Ok(FontView {
            catalog: self,
            version,
        })
    }

    /// Path a sheet is read from.
    pub fn sheet_path(&self, version: usize, page: u8) -> std::path::PathBuf {
        self.paths.sheet(version, page)
    }
}

/// One font version of a [`GlyphCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct FontView<'a> {
    catalog: &'a GlyphCatalog,
    version: usize,
}

impl<'a> FontView<'a> {
    pub fn version(&self) -> usize {
        self.version
    }

    fn page_of(&self, page: u8) -> &'a GlyphPage {
        &self.catalog.pages[GlyphCatalog::index(self.version, page)]
    }

    /// Table width of `ch`, without inter-glyph spacing.
    pub fn advance(&self, ch: char) -> u32 {
        let (page, index) = split_codepoint(ch);
        self.page_of(page).glyph_width(index) as u32
    }

    /// Sheet and source rectangle of the sprite for `ch`.
    pub fn sprite(&self, ch: char) -> TextResult<(&'a GlyphSheet, Rect<i32>)> {
        let (page, index) = split_codepoint(ch);
        let sheet = self
            .page_of(page)
            .sheet()
            .ok_or(TextError::GlyphPageNotLoaded {
                version: self.version,
                page,
            })?;
        Ok((sheet.as_ref(), GlyphSheet::sprite_rect(index)))
    }

    /// Advance width of `text` drawn with `style`.
    ///
    /// Every glyph advances by its table width plus `DPI`; bold adds another
    /// `DPI` between glyphs and italic one pixel overall. Empty text is 0.
    pub fn measure(&self, text: &str, style: StyleSet) -> u32 {
        let mut count = 0u32;
        let mut width = 0u32;
        for ch in text.chars() {
            width += self.advance(ch) + DPI as u32;
            count += 1;
        }
        if count == 0 {
            return 0;
        }
        if style.is_bold() {
            width += DPI as u32 * (count - 1);
        }
        if style.is_italic() {
            width += 1;
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorecraft_assets::MemoryReader;
    use lorecraft_test_utils::glyphs::{solid_sheet_png, width_table};

    fn catalog_with(reader: MemoryReader, versions: usize, width: u8) -> GlyphCatalog {
        GlyphCatalog::from_width_table(
            &width_table(versions, width),
            Arc::new(reader),
            GlyphPaths::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_codepoint() {
        assert_eq!(split_codepoint('A'), (0x00, 0x41));
        assert_eq!(split_codepoint('\u{2764}'), (0x27, 0x64));
        assert_eq!(split_codepoint('\u{1F600}'), (0x00, b'?'));
    }

    #[test]
    fn test_sprite_rect_grid() {
        assert_eq!(GlyphSheet::sprite_rect(0), Rect::new(0, 0, 16, 16));
        assert_eq!(GlyphSheet::sprite_rect(0x41), Rect::new(16, 64, 16, 16));
        assert_eq!(GlyphSheet::sprite_rect(0xff), Rect::new(240, 240, 16, 16));
    }

    #[test]
    fn test_width_table_length_is_validated() {
        let reader: Arc<dyn BytesReader> = Arc::new(MemoryReader::new());
        let err = GlyphCatalog::from_width_table(&[0; 100], reader.clone(), GlyphPaths::default())
            .unwrap_err();
        assert_eq!(err, TextError::InvalidWidthTable { len: 100 });
        assert!(GlyphCatalog::from_width_table(&[], reader, GlyphPaths::default()).is_err());
    }

    #[test]
    fn test_widths_per_version() {
        let mut table = width_table(2, 6);
        table[WIDTH_TABLE_STRIDE + 0x41] = 10;
        let catalog = GlyphCatalog::from_width_table(
            &table,
            Arc::new(MemoryReader::new()),
            GlyphPaths::default(),
        )
        .unwrap();
        assert_eq!(catalog.version_count(), 2);
        assert_eq!(catalog.glyph_width(0, 'A').unwrap(), 6);
        assert_eq!(catalog.glyph_width(1, 'A').unwrap(), 10);
        assert!(matches!(
            catalog.glyph_width(2, 'A'),
            Err(TextError::UnknownFontVersion { version: 2, available: 2 })
        ));
    }

    #[test]
    fn test_ensure_loaded_reads_sheet_once() {
        let paths = GlyphPaths::default();
        let mut reader = MemoryReader::new();
        reader.insert(paths.sheet(0, 0), solid_sheet_png(4));
        let mut catalog = catalog_with(reader, 1, 6);

        assert!(!catalog.page(0, 0).unwrap().is_ready());
        assert!(pollster::block_on(catalog.ensure_loaded(0, 0)));
        assert!(catalog.page(0, 0).unwrap().is_ready());
        assert_eq!(catalog.page(0, 0).unwrap().load_state(), LoadState::Loaded);
    }

    #[test]
    fn test_missing_sheet_fails_and_keeps_widths() {
        let mut catalog = catalog_with(MemoryReader::new(), 1, 6);
        assert!(!pollster::block_on(catalog.ensure_loaded(0, 0x27)));
        let page = catalog.page(0, 0x27).unwrap();
        assert_eq!(page.load_state(), LoadState::Failed);
        assert!(page.error().is_some());
        assert_eq!(page.failed_attempts(), 1);
        assert_eq!(page.glyph_width(0x64), 6);

        assert!(!pollster::block_on(catalog.ensure_loaded(0, 0x27)));
        assert_eq!(catalog.page(0, 0x27).unwrap().failed_attempts(), 2);
    }

    #[test]
    fn test_wrong_sheet_size_is_rejected() {
        let paths = GlyphPaths::default();
        let mut reader = MemoryReader::new();
        let small = lorecraft_render::encode_png(&RgbaImage::new(16, 16)).unwrap();
        reader.insert(paths.sheet(0, 0), small);
        let mut catalog = catalog_with(reader, 1, 6);
        assert!(!pollster::block_on(catalog.ensure_loaded(0, 0)));
        assert!(catalog.page(0, 0).unwrap().error().unwrap().contains("expected 256x256"));
    }

    #[test]
    fn test_ensure_text_loaded_reports_failing_page() {
        let paths = GlyphPaths::default();
        let mut reader = MemoryReader::new();
        reader.insert(paths.sheet(0, 0), solid_sheet_png(4));
        let mut catalog = catalog_with(reader, 1, 6);

        assert!(pollster::block_on(catalog.ensure_text_loaded(0, "plain")).is_ok());
        let err = pollster::block_on(catalog.ensure_text_loaded(0, "A\u{2764}")).unwrap_err();
        assert_eq!(err, TextError::GlyphPageUnavailable { version: 0, page: 0x27 });
    }

    #[test]
    fn test_measure() {
        let catalog = catalog_with(MemoryReader::new(), 1, 6);
        let font = catalog.font(0).unwrap();
        assert_eq!(font.measure("", StyleSet::BOLD | StyleSet::ITALIC), 0);
        assert_eq!(font.measure("abc", StyleSet::empty()), 3 * 8);
        assert_eq!(font.measure("abc", StyleSet::BOLD), 3 * 8 + 2 * 2);
        assert_eq!(font.measure("abc", StyleSet::ITALIC), 3 * 8 + 1);
        assert_eq!(font.measure("abc", StyleSet::UNDERLINE), 3 * 8);
    }

    #[test]
    fn test_sprite_requires_loaded_page() {
        let catalog = catalog_with(MemoryReader::new(), 1, 6);
        let font = catalog.font(0).unwrap();
        assert!(matches!(
            font.sprite('A'),
            Err(TextError::GlyphPageNotLoaded { version: 0, page: 0 })
        ));
    }
}
