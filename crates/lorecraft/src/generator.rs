//! Render pass orchestration.
//!
//! The [`Generator`] owns everything one tooltip image needs: the glyph
//! catalog, the current text and settings, the document whose pixels are on
//! the surface, and the framed surface itself. A render pass has two phases:
//!
//! 1. **Pre-flight** (async): load every glyph page the text refers to. A
//!    failure aborts the pass before any pixel is touched.
//! 2. **Draw** (sync): parse, reconcile against the previous document, and
//!    redraw only what changed. A full redraw happens on the first pass,
//!    after an output-affecting settings change, and when the text got
//!    narrower than the surface.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use lorecraft_assets::{BytesReader, FileReader};
use lorecraft_core::config::{GlyphPaths, RenderSettings, SettingKey};
use lorecraft_core::geometry::{Rect, Size};
use lorecraft_core::profiling::{self, profile_function};
use lorecraft_render::metrics::{LEFT_OFFSET, LINE_HEIGHT, MIN_WIDTH, frame_height, frame_width, line_y};
use lorecraft_render::{EncodeError, FrameCompositor, RgbaImage};
use lorecraft_text::{Document, GlyphCatalog, Rasterizer, TextError, parse, reconcile, relayout};

use crate::export::suggested_file_name;
use crate::gate::{RenderGate, RenderTrigger};
use crate::schedule::RefreshSchedule;

/// Errors that abort a render pass or an export.
///
/// A failed pass leaves the previous image untouched; calling
/// [`Generator::render`] again retries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    Text(TextError),
    Encode(EncodeError),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::Text(err) => write!(f, "Render failed: {}", err),
            GeneratorError::Encode(err) => write!(f, "Export failed: {}", err),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Text(err) => Some(err),
            GeneratorError::Encode(err) => Some(err),
        }
    }
}

impl From<TextError> for GeneratorError {
    fn from(err: TextError) -> Self {
        GeneratorError::Text(err)
    }
}

impl From<EncodeError> for GeneratorError {
    fn from(err: EncodeError) -> Self {
        GeneratorError::Encode(err)
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// What the caller should do after marking the output stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawHint {
    /// No refresh timer is running; render now.
    Immediate,
    /// The next timer tick will pick the change up.
    Deferred,
    /// Nothing visible changed.
    Unchanged,
}

/// Summary of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Whether the whole surface was repainted.
    pub full: bool,
    pub lines_touched: usize,
    pub draws: usize,
    pub size: Size<u32>,
}

/// Result of [`Generator::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The image already reflects the text and settings.
    UpToDate,
    /// Another pass is running; this request was folded into it.
    Coalesced,
    Rendered(RenderStats),
}

impl RenderOutcome {
    pub fn stats(&self) -> Option<&RenderStats> {
        match self {
            RenderOutcome::Rendered(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Settings the pixels of the previous pass were produced with. Any change
/// means the old document cannot be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameSignature {
    font_version: usize,
    first_line_gap: bool,
    render_background: bool,
}

impl FrameSignature {
    fn of(settings: &RenderSettings) -> Self {
        Self {
            font_version: settings.font_version,
            first_line_gap: settings.first_line_gap,
            render_background: settings.render_background,
        }
    }
}

/// Renders formatted text into a framed tooltip image.
///
/// # Example
///
/// ```no_run
/// use lorecraft::{Generator, RenderOutcome};
///
/// # async fn run() -> lorecraft::GeneratorResult<()> {
/// let mut generator = Generator::builder()
///     .asset_root("assets")
///     .text("&6&lExcalibur\n&7A legendary blade")
///     .build()
///     .await?;
///
/// if let RenderOutcome::Rendered(stats) = generator.render().await? {
///     println!("{}x{}", stats.size.width, stats.size.height);
/// }
/// std::fs::write(generator.suggested_file_name(), generator.encode_png()?).ok();
/// # Ok(())
/// # }
/// ```
pub struct Generator {
    catalog: GlyphCatalog,
    settings: RenderSettings,
    text: String,
    /// Document whose pixels are on the surface
    document: Option<Document>,
    signature: Option<FrameSignature>,
    frame: FrameCompositor,
    rasterizer: Rasterizer,
    trigger: RenderTrigger,
    gate: RenderGate,
    schedule: RefreshSchedule,
    passes: u64,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("settings", &self.settings)
            .field("text_len", &self.text.len())
            .field("size", &self.frame.size())
            .field("dirty", &self.trigger.is_dirty())
            .field("passes", &self.passes)
            .finish()
    }
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// A generator with empty text and a minimum-size frame. Nothing is
    /// drawn until the first [`render`](Self::render).
    pub fn new(catalog: GlyphCatalog, settings: RenderSettings) -> Self {
        Self::with_clock(catalog, settings, Instant::now())
    }

    /// Like [`new`](Self::new) with the refresh timer starting at `now`.
    pub fn with_clock(catalog: GlyphCatalog, settings: RenderSettings, now: Instant) -> Self {
        Self {
            catalog,
            settings,
            text: String::new(),
            document: None,
            signature: None,
            frame: FrameCompositor::new(settings.render_background),
            rasterizer: Rasterizer::new(),
            trigger: RenderTrigger::new(),
            gate: RenderGate::new(),
            schedule: RefreshSchedule::new(settings.update_period, now),
            passes: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut GlyphCatalog {
        &mut self.catalog
    }

    /// The document currently shown, `None` before the first pass.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn frame(&self) -> &FrameCompositor {
        &self.frame
    }

    pub fn image(&self) -> &RgbaImage {
        self.frame.image()
    }

    pub fn schedule(&self) -> &RefreshSchedule {
        &self.schedule
    }

    /// Handle for marking the output stale from elsewhere.
    pub fn trigger(&self) -> RenderTrigger {
        self.trigger.clone()
    }

    /// Handle for observing whether a pass is running.
    pub fn gate(&self) -> RenderGate {
        self.gate.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.trigger.is_dirty()
    }

    /// Number of completed passes.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    fn hint(&self) -> RedrawHint {
        if self.schedule.is_immediate() {
            RedrawHint::Immediate
        } else {
            RedrawHint::Deferred
        }
    }

    /// Replace the input text and mark the output stale.
    pub fn set_text(&mut self, text: impl Into<String>) -> RedrawHint {
        self.text = text.into();
        self.trigger.mark_dirty();
        self.hint()
    }

    /// Adopt a new settings snapshot.
    ///
    /// Changes that alter the pixels force a full redraw; a new update period
    /// restarts the refresh timer from `now`; the image scale only affects
    /// [`display_size`](Self::display_size).
    pub fn apply_settings(&mut self, settings: RenderSettings, now: Instant) -> RedrawHint {
        let changed = self.settings.diff(&settings);
        self.settings = settings;
        if changed.is_empty() {
            return RedrawHint::Unchanged;
        }
        tracing::debug!(
            "Settings changed: {}",
            changed
                .iter()
                .map(SettingKey::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        if changed.contains(&SettingKey::UpdatePeriod) {
            self.schedule.set_period(settings.update_period, now);
        }
        if changed.iter().any(SettingKey::affects_output) {
            self.trigger.mark_dirty();
            self.hint()
        } else {
            RedrawHint::Unchanged
        }
    }

    /// Advance the refresh timer. Returns whether a pass should run now.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.schedule.poll(now) && self.trigger.is_dirty()
    }

    /// [`tick`](Self::tick), then render if it says so.
    pub async fn refresh(&mut self, now: Instant) -> GeneratorResult<RenderOutcome> {
        if self.tick(now) {
            self.render().await
        } else {
            Ok(RenderOutcome::UpToDate)
        }
    }

    /// Bring the image up to date with the text and settings.
    pub async fn render(&mut self) -> GeneratorResult<RenderOutcome> {
        if !self.trigger.take() {
            return Ok(RenderOutcome::UpToDate);
        }
        let Some(_ticket) = self.gate.try_begin() else {
            tracing::trace!("Render requested during a pass, coalescing");
            self.trigger.mark_dirty();
            return Ok(RenderOutcome::Coalesced);
        };

        let version = self.settings.font_version;
        if let Err(err) = self.catalog.ensure_text_loaded(version, &self.text).await {
            tracing::warn!("Render pass aborted, keeping previous image: {}", err);
            self.trigger.mark_dirty();
            return Err(err.into());
        }

        let last_good = self.frame.clone();
        let stats = match self.draw_pass() {
            Ok(stats) => stats,
            Err(err) => {
                // `document` still describes the restored pixels.
                self.frame = last_good;
                self.trigger.mark_dirty();
                tracing::warn!("Render pass failed while drawing, keeping previous image: {}", err);
                return Err(err);
            }
        };

        self.passes += 1;
        profiling::finish_pass();
        tracing::debug!(
            "Render pass {} done: {}x{}, {} line(s), {} draw(s){}",
            self.passes,
            stats.size.width,
            stats.size.height,
            stats.lines_touched,
            stats.draws,
            if stats.full { ", full redraw" } else { "" }
        );
        Ok(RenderOutcome::Rendered(stats))
    }

    fn draw_pass(&mut self) -> GeneratorResult<RenderStats> {
        profile_function!();
        let gap = self.settings.first_line_gap;
        let signature = FrameSignature::of(&self.settings);
        let font = self.catalog.font(self.settings.font_version)?;

        let mut document = parse(&self.text);
        relayout(&mut document, &font);
        let height = frame_height(document.line_count(), gap);
        let full = self.document.is_none()
            || self.signature != Some(signature)
            || frame_width(LEFT_OFFSET + document.max_line_width()) < self.frame.width();

        let plan = if full {
            self.frame.set_render_background(signature.render_background);
            self.frame.resize(MIN_WIDTH, height, false);
            reconcile(None, &mut document, &font)
        } else {
            if height != self.frame.height() {
                self.frame.resize(self.frame.width(), height, true);
            }
            reconcile(self.document.as_ref(), &mut document, &font)
        };

        for line in &plan.lines {
            let y = line_y(line.line, gap);
            for range in &line.clear {
                self.frame
                    .clear_region(Rect::new(range.start, y, range.end - range.start, LINE_HEIGHT));
            }
            for op in &line.draws {
                let segment = &document.lines[line.line].segments[op.segment];
                self.rasterizer.draw_segment_clipped(
                    segment,
                    LEFT_OFFSET + segment.x,
                    y,
                    &font,
                    &mut self.frame,
                    op.clip.clone(),
                )?;
            }
        }

        document.mark_valid();
        self.document = Some(document);
        self.signature = Some(signature);

        Ok(RenderStats {
            full,
            lines_touched: plan.lines.len(),
            draws: plan.draw_count(),
            size: self.frame.size(),
        })
    }

    /// The current image as PNG bytes.
    pub fn encode_png(&self) -> GeneratorResult<Vec<u8>> {
        Ok(self.frame.encode_png()?)
    }

    /// Write the current image to `path` as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> GeneratorResult<()> {
        Ok(lorecraft_render::save_png(self.frame.image(), path)?)
    }

    /// Size at which the image should be displayed.
    pub fn display_size(&self) -> Size<f32> {
        self.frame.display_size(self.settings.image_scale)
    }

    /// File name to save the current text's image under.
    pub fn suggested_file_name(&self) -> String {
        suggested_file_name(&self.text)
    }
}

/// Builder for a [`Generator`] that loads its own glyph catalog.
pub struct GeneratorBuilder {
    reader: Option<Arc<dyn BytesReader>>,
    paths: GlyphPaths,
    settings: RenderSettings,
    text: String,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            reader: None,
            paths: GlyphPaths::default(),
            settings: RenderSettings::default(),
            text: String::new(),
        }
    }

    /// Read assets through `reader`.
    pub fn reader(mut self, reader: Arc<dyn BytesReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Read assets from files under `root`.
    pub fn asset_root(self, root: impl AsRef<Path>) -> Self {
        self.reader(Arc::new(FileReader::new(root)))
    }

    pub fn paths(mut self, paths: GlyphPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Load the glyph catalog and create the generator. Without a reader,
    /// assets are read relative to the working directory.
    pub async fn build(self) -> GeneratorResult<Generator> {
        let reader = self
            .reader
            .unwrap_or_else(|| Arc::new(FileReader::new(".")));
        let catalog = GlyphCatalog::load(reader, self.paths).await?;
        let mut generator = Generator::new(catalog, self.settings);
        generator.set_text(self.text);
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lorecraft_assets::MemoryReader;
    use lorecraft_render::metrics::{MIN_HEIGHT, TOP_OFFSET};
    use lorecraft_test_utils::glyphs::fixture_reader;

    fn setup(settings: RenderSettings) -> Generator {
        let reader = Arc::new(fixture_reader(2, &[0], 6, 4));
        pollster::block_on(
            Generator::builder()
                .reader(reader)
                .settings(settings)
                .build(),
        )
        .unwrap()
    }

    fn immediate() -> RenderSettings {
        RenderSettings {
            update_period: 0,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_first_pass_renders_minimum_frame() {
        let mut generator = setup(immediate());
        let outcome = pollster::block_on(generator.render()).unwrap();
        let stats = outcome.stats().copied().unwrap();
        assert!(stats.full);
        assert_eq!(stats.size, Size::new(MIN_WIDTH, MIN_HEIGHT));
        assert_eq!(
            pollster::block_on(generator.render()).unwrap(),
            RenderOutcome::UpToDate
        );
    }

    #[test]
    fn test_set_text_hint_follows_timer() {
        let mut generator = setup(immediate());
        assert_eq!(generator.set_text("a"), RedrawHint::Immediate);

        let mut generator = setup(RenderSettings::default());
        assert_eq!(generator.set_text("a"), RedrawHint::Deferred);
    }

    #[test]
    fn test_image_scale_only_changes_display_size() {
        let mut generator = setup(immediate());
        pollster::block_on(generator.render()).unwrap();

        let settings = RenderSettings {
            image_scale: 3.0,
            ..immediate()
        };
        assert_eq!(
            generator.apply_settings(settings, Instant::now()),
            RedrawHint::Unchanged
        );
        assert!(!generator.is_dirty());
        assert_eq!(
            generator.display_size(),
            Size::new(MIN_WIDTH as f32 * 3.0, MIN_HEIGHT as f32 * 3.0)
        );
    }

    #[test]
    fn test_output_settings_force_full_redraw() {
        let mut generator = setup(immediate());
        generator.set_text("abc\ndef");
        pollster::block_on(generator.render()).unwrap();

        let settings = RenderSettings {
            first_line_gap: false,
            ..immediate()
        };
        assert_eq!(
            generator.apply_settings(settings, Instant::now()),
            RedrawHint::Immediate
        );
        let stats = pollster::block_on(generator.render())
            .unwrap()
            .stats()
            .copied()
            .unwrap();
        assert!(stats.full);
        assert_eq!(stats.size.height, frame_height(2, false));
    }

    #[test]
    fn test_update_period_reschedules() {
        let start = Instant::now();
        let reader = Arc::new(fixture_reader(1, &[0], 6, 4));
        let catalog = pollster::block_on(GlyphCatalog::load(reader, GlyphPaths::default())).unwrap();
        let mut generator = Generator::with_clock(catalog, RenderSettings::default(), start);
        generator.set_text("x");

        assert!(!generator.tick(start + Duration::from_secs(1)));
        let settings = RenderSettings {
            update_period: 5,
            ..RenderSettings::default()
        };
        let later = start + Duration::from_secs(1);
        assert_eq!(generator.apply_settings(settings, later), RedrawHint::Unchanged);
        assert!(!generator.tick(start + Duration::from_secs(2)));
        assert!(generator.tick(later + Duration::from_secs(5)));
    }

    #[test]
    fn test_busy_gate_coalesces() {
        let mut generator = setup(immediate());
        let gate = generator.gate();
        let ticket = gate.try_begin().unwrap();

        assert_eq!(
            pollster::block_on(generator.render()).unwrap(),
            RenderOutcome::Coalesced
        );
        assert!(generator.is_dirty());

        drop(ticket);
        assert!(matches!(
            pollster::block_on(generator.render()).unwrap(),
            RenderOutcome::Rendered(_)
        ));
    }

    #[test]
    fn test_text_lands_below_top_offset() {
        let mut generator = setup(immediate());
        generator.set_text("&fa");
        pollster::block_on(generator.render()).unwrap();
        let image = generator.image();
        assert_eq!(image.get_pixel(LEFT_OFFSET as u32, TOP_OFFSET as u32).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_missing_table_fails_build() {
        let result = pollster::block_on(
            Generator::builder()
                .reader(Arc::new(MemoryReader::new()))
                .build(),
        );
        assert!(matches!(result, Err(GeneratorError::Text(TextError::Asset(_)))));
    }
}
