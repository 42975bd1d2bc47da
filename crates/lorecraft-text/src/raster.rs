//! Segment rasterizer.
//!
//! Glyph sprites are assembled in a scratch buffer where the synthetic
//! styles are applied, then the buffer is tinted and composited twice onto
//! the target: once in the shadow color, offset by one game pixel, and once
//! in the primary color.

use std::ops::Range;

use lorecraft_core::geometry::Rect;
use lorecraft_core::profiling::profile_function;
use lorecraft_render::metrics::{DPI, FONT_SIZE};
use lorecraft_render::{Color, RasterSurface, SurfaceSizer};

use crate::error::TextResult;
use crate::format::{ChatColor, StyleSet};
use crate::glyph::{FontView, SPRITE_SIZE};
use crate::markup::Segment;

/// Rows composited for the main pass.
const MAIN_HEIGHT: i32 = FONT_SIZE + 2;
/// Rows composited for the shadow pass.
const SHADOW_HEIGHT: i32 = FONT_SIZE + 4;
/// Extra scratch columns for italic shear and bold smear.
const SCRATCH_SLACK: u32 = 16;

/// Italic shear: `(first row, rows, shift)` from top to bottom.
const ITALIC_STRIPS: [(i32, i32, i32); 5] = [(0, 2, 4), (2, 4, 3), (6, 4, 2), (10, 4, 1), (14, 2, 0)];

/// Draws styled segments one at a time.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    scratch: RasterSurface,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            scratch: RasterSurface::new(256, SHADOW_HEIGHT as u32),
        }
    }

    /// Draw `segment` with its left edge at `(x, y)`; returns the advance.
    pub fn draw_segment(
        &mut self,
        segment: &Segment,
        x: i32,
        y: i32,
        font: &FontView<'_>,
        target: &mut dyn SurfaceSizer,
    ) -> TextResult<u32> {
        self.draw_segment_clipped(segment, x, y, font, target, None)
    }

    /// Like [`draw_segment`](Self::draw_segment), but only touches the
    /// target columns in `clip`.
    pub fn draw_segment_clipped(
        &mut self,
        segment: &Segment,
        x: i32,
        y: i32,
        font: &FontView<'_>,
        target: &mut dyn SurfaceSizer,
        clip: Option<Range<i32>>,
    ) -> TextResult<u32> {
        profile_function!();
        if segment.is_empty() {
            return Ok(0);
        }

        let draw_width = match self.compose(&segment.text, segment.style, font) {
            Ok(width) => width,
            Err(err) => {
                self.scratch.clear();
                return Err(err);
            }
        };
        let advance = if segment.style.is_italic() {
            draw_width - 2
        } else {
            draw_width
        };

        if x + advance > target.drawable_width() {
            tracing::debug!(
                "Segment at x={} with width {} overflows, growing surface",
                x,
                advance
            );
            target.grow_to_fit(x + advance);
        }

        let offset = style_offset(segment.style);
        let surface = target.surface_mut();

        self.scratch
            .recolor(Rect::new(0, 0, draw_width, MAIN_HEIGHT), segment.color.shadow());
        composite(
            surface,
            &self.scratch,
            Rect::new(0, 0, draw_width, SHADOW_HEIGHT),
            x + DPI + offset,
            y + DPI,
            clip.as_ref(),
        );

        self.scratch
            .recolor(Rect::new(0, 0, draw_width, MAIN_HEIGHT), segment.color.primary());
        composite(
            surface,
            &self.scratch,
            Rect::new(0, 0, draw_width, MAIN_HEIGHT),
            x + offset,
            y,
            clip.as_ref(),
        );

        self.scratch.clear();
        Ok(advance as u32)
    }

    /// Build the white ink of `text` in the scratch buffer.
    ///
    /// Returns the width of the composited area, which for italic text is
    /// two pixels wider than the advance.
    fn compose(&mut self, text: &str, style: StyleSet, font: &FontView<'_>) -> TextResult<i32> {
        let needed = font.measure(text, style) + SCRATCH_SLACK;
        if needed > self.scratch.width() {
            self.scratch = RasterSurface::new(needed.next_power_of_two(), SHADOW_HEIGHT as u32);
        }

        let bold_extra = if style.is_bold() { DPI } else { 0 };
        let mut width = 0;
        for ch in text.chars() {
            let (sheet, src) = font.sprite(ch)?;
            self.scratch.draw_image(sheet.image(), src, width, 0);
            width += font.advance(ch) as i32 + DPI + bold_extra;
        }
        width -= bold_extra;

        if style.is_bold() {
            let ink = self
                .scratch
                .get_region(Rect::new(0, 0, width * DPI, SPRITE_SIZE as i32));
            self.scratch.draw_image(
                &ink,
                Rect::new(0, 0, width * DPI, SPRITE_SIZE as i32),
                DPI,
                0,
            );
        }

        if style.is_italic() {
            width += DPI * 2 - 1;
            for (row, rows, shift) in ITALIC_STRIPS {
                let band = Rect::new(0, row, width, rows);
                let strip = self.scratch.get_region(band);
                self.scratch.clear_rect(band);
                self.scratch.put_region(&strip, shift, row);
            }
        }

        if style.is_strikethrough() {
            self.scratch
                .fill_rect(Rect::new(0, 6, width, DPI), Color::WHITE);
        }
        if style.is_underline() {
            self.scratch
                .fill_rect(Rect::new(0, FONT_SIZE, width, DPI), Color::WHITE);
        }

        Ok(width)
    }

    /// Ink of the last composed text, for inspection.
    pub fn scratch(&self) -> &RasterSurface {
        &self.scratch
    }
}

/// Horizontal correction of the main and shadow passes.
pub fn style_offset(style: StyleSet) -> i32 {
    if style.is_italic() {
        -1
    } else if style.is_strikethrough() {
        -DPI
    } else {
        0
    }
}

/// Composite `src_rect` of `src` at `(dx, dy)`, keeping to `clip` columns.
fn composite(
    target: &mut RasterSurface,
    src: &RasterSurface,
    src_rect: Rect<i32>,
    dx: i32,
    dy: i32,
    clip: Option<&Range<i32>>,
) {
    let (src_rect, dx) = match clip {
        None => (src_rect, dx),
        Some(clip) => {
            let start = dx.max(clip.start);
            let end = (dx + src_rect.width).min(clip.end);
            if start >= end {
                return;
            }
            (
                Rect::new(src_rect.x + start - dx, src_rect.y, end - start, src_rect.height),
                start,
            )
        }
    };
    target.draw_image(src.as_image(), src_rect, dx, dy);
}

/// Draw `text` in one color and style at `(x, y)` without a document.
pub fn draw_text(
    rasterizer: &mut Rasterizer,
    text: &str,
    color: ChatColor,
    style: StyleSet,
    (x, y): (i32, i32),
    font: &FontView<'_>,
    target: &mut dyn SurfaceSizer,
) -> TextResult<u32> {
    let segment = Segment::new(text, color, style);
    rasterizer.draw_segment(&segment, x, y, font, target)
}
