//! The tooltip frame: output surface, background and border.
//!
//! [`FrameCompositor`] owns the output surface. It knows how to size it,
//! paint the framed background, and restore background pixels under text
//! that is about to be redrawn. Text itself is drawn by the text crate through
//! the [`SurfaceSizer`] seam.

use image::RgbaImage;
use lorecraft_core::geometry::{Rect, Size};
use lorecraft_core::profiling::profile_function;

use crate::encode::{EncodeError, encode_png};
use crate::metrics::{
    BACKGROUND_COLOR, BORDER_COLOR, BORDER_INSET, CORNER_NOTCH, DPI, LEFT_OFFSET, MIN_HEIGHT,
    MIN_WIDTH, SPACING, frame_width,
};
use crate::{Color, RasterSurface};

/// A drawing target that can widen itself when text overflows it.
pub trait SurfaceSizer {
    /// X coordinate past which text no longer fits.
    fn drawable_width(&self) -> i32;

    /// Grow so that content ending at `right_edge` fits, keeping what has
    /// been drawn so far.
    fn grow_to_fit(&mut self, right_edge: i32);

    fn surface_mut(&mut self) -> &mut RasterSurface;
}

/// Owns the output image and its framed background.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    surface: RasterSurface,
    render_background: bool,
}

impl FrameCompositor {
    /// A minimum-size frame with its background already drawn.
    pub fn new(render_background: bool) -> Self {
        let mut frame = Self {
            surface: RasterSurface::new(MIN_WIDTH, MIN_HEIGHT),
            render_background,
        };
        frame.draw_background();
        frame
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width(), self.height())
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn image(&self) -> &RgbaImage {
        self.surface.as_image()
    }

    pub fn render_background(&self) -> bool {
        self.render_background
    }

    /// Takes effect the next time the background is painted.
    pub fn set_render_background(&mut self, render_background: bool) {
        self.render_background = render_background;
    }

    /// Size at which the image should be shown, scaled by `scale`.
    pub fn display_size(&self, scale: f32) -> Size<f32> {
        Size::new(self.width() as f32, self.height() as f32) * scale
    }

    /// Area text may paint into: everything inside the border stroke.
    pub fn interior(&self) -> Rect<i32> {
        interior_of(self.width(), self.height())
    }

    /// Replace the surface with a `width` x `height` one and repaint the
    /// background.
    ///
    /// With `preserve`, everything inside the old border (clipped to the
    /// smaller of the two sizes) is carried over unchanged, including shadow
    /// and italic spill next to the right edge.
    pub fn resize(&mut self, width: u32, height: u32, preserve: bool) {
        profile_function!();
        let width = width.max(MIN_WIDTH);
        let height = height.max(MIN_HEIGHT);

        let saved = preserve.then(|| {
            let keep = interior_of(self.width().min(width), self.height().min(height));
            self.surface.get_region(keep)
        });

        tracing::debug!(
            "Resizing frame {}x{} -> {}x{} (preserve: {})",
            self.width(),
            self.height(),
            width,
            height,
            preserve
        );

        self.surface = RasterSurface::new(width, height);
        self.draw_background();
        if let Some(saved) = saved {
            self.surface.put_region(&saved, INTERIOR_INSET, INTERIOR_INSET);
        }
    }

    /// Paint the background, corner notches and border. Does nothing when
    /// the background is disabled.
    pub fn draw_background(&mut self) {
        if !self.render_background {
            return;
        }
        let w = self.width() as i32;
        let h = self.height() as i32;

        self.surface.fill_rect(
            Rect::new(SPACING, SPACING, w - SPACING * 2, h - SPACING * 2),
            BACKGROUND_COLOR,
        );

        let corners = [
            (SPACING, SPACING),
            (w - SPACING * 2, SPACING),
            (w - SPACING * 2, h - SPACING * 2),
            (SPACING, h - SPACING * 2),
        ];
        for (x, y) in corners {
            self.surface
                .clear_rect(Rect::new(x, y, CORNER_NOTCH, CORNER_NOTCH));
        }

        self.surface.stroke_rect(
            Rect::new(
                BORDER_INSET,
                BORDER_INSET,
                w - BORDER_INSET * 2,
                h - BORDER_INSET * 2,
            ),
            DPI,
            BORDER_COLOR,
        );
    }

    /// Restore the background under `rect`, limited to the interior so the
    /// border is never touched.
    pub fn clear_region(&mut self, rect: Rect<i32>) {
        let Some(rect) = rect.intersect(&self.interior()) else {
            return;
        };
        let fill = if self.render_background {
            BACKGROUND_COLOR
        } else {
            Color::TRANSPARENT
        };
        self.surface.set_rect(rect, fill);
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, EncodeError> {
        encode_png(self.image())
    }
}

impl SurfaceSizer for FrameCompositor {
    fn drawable_width(&self) -> i32 {
        self.width() as i32 - LEFT_OFFSET
    }

    fn grow_to_fit(&mut self, right_edge: i32) {
        let width = frame_width(right_edge);
        if width > self.width() {
            self.resize(width, self.height(), true);
        }
    }

    fn surface_mut(&mut self) -> &mut RasterSurface {
        &mut self.surface
    }
}

const INTERIOR_INSET: i32 = BORDER_INSET + DPI / 2;

fn interior_of(width: u32, height: u32) -> Rect<i32> {
    Rect::new(
        INTERIOR_INSET,
        INTERIOR_INSET,
        width as i32 - INTERIOR_INSET * 2,
        height as i32 - INTERIOR_INSET * 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TOP_OFFSET;

    #[test]
    fn test_new_frame_is_minimum_size() {
        let frame = FrameCompositor::new(true);
        assert_eq!(frame.size(), Size::new(20, 36));
        assert_eq!(frame.drawable_width(), 10);
    }

    #[test]
    fn test_background_layout() {
        let mut frame = FrameCompositor::new(true);
        frame.resize(60, 56, false);
        let s = frame.surface();

        // outside the background
        assert_eq!(s.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(1, 20), Some(Color::TRANSPARENT));
        // corner notches
        assert_eq!(s.pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(57, 53), Some(Color::TRANSPARENT));
        // background between edge and border
        assert_eq!(s.pixel(2, 20), Some(BACKGROUND_COLOR));
        // border stroke
        assert_eq!(s.pixel(4, 20), Some(BORDER_COLOR));
        assert_eq!(s.pixel(5, 20), Some(BORDER_COLOR));
        assert_eq!(s.pixel(55, 20), Some(BORDER_COLOR));
        // interior
        assert_eq!(s.pixel(6, 20), Some(BACKGROUND_COLOR));
        assert_eq!(s.pixel(30, 30), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_disabled_background_is_transparent() {
        let mut frame = FrameCompositor::new(false);
        frame.resize(40, 40, false);
        assert!(frame.image().pixels().all(|px| px.0[3] == 0));
    }

    #[test]
    fn test_resize_preserves_text_area() {
        let mut frame = FrameCompositor::new(true);
        frame.resize(40, 36, false);
        frame
            .surface_mut()
            .set_rect(Rect::new(LEFT_OFFSET, TOP_OFFSET, 4, 4), Color::WHITE);

        frame.resize(80, 56, true);
        assert_eq!(frame.size(), Size::new(80, 56));
        assert_eq!(frame.surface().pixel(LEFT_OFFSET, TOP_OFFSET), Some(Color::WHITE));
        assert_eq!(frame.surface().pixel(70, 40), Some(BACKGROUND_COLOR));
        // the border is repainted at the new size
        assert_eq!(frame.surface().pixel(75, 40), Some(BORDER_COLOR));
    }

    #[test]
    fn test_resize_preserves_spill_next_to_border() {
        let mut frame = FrameCompositor::new(true);
        frame.resize(40, 36, false);
        // shadow ink two columns short of the old right border
        frame
            .surface_mut()
            .set_rect(Rect::new(32, 12, 2, 2), Color::WHITE);

        frame.resize(60, 56, true);
        assert_eq!(frame.surface().pixel(32, 12), Some(Color::WHITE));
        assert_eq!(frame.surface().pixel(33, 13), Some(Color::WHITE));
        // the old border columns become plain background
        assert_eq!(frame.surface().pixel(34, 12), Some(BACKGROUND_COLOR));
        assert_eq!(frame.surface().pixel(35, 12), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_resize_without_preserve_discards_text() {
        let mut frame = FrameCompositor::new(true);
        frame
            .surface_mut()
            .set_rect(Rect::new(LEFT_OFFSET, TOP_OFFSET, 2, 2), Color::WHITE);
        frame.resize(20, 36, false);
        assert_eq!(frame.surface().pixel(LEFT_OFFSET, TOP_OFFSET), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_grow_to_fit_only_grows() {
        let mut frame = FrameCompositor::new(true);
        frame.grow_to_fit(50);
        assert_eq!(frame.width(), 60);
        assert_eq!(frame.drawable_width(), 50);

        frame.grow_to_fit(30);
        assert_eq!(frame.width(), 60);
    }

    #[test]
    fn test_clear_region_stops_at_border() {
        let mut frame = FrameCompositor::new(true);
        frame.resize(60, 36, false);
        frame
            .surface_mut()
            .set_rect(Rect::new(6, 6, 48, 24), Color::WHITE);

        frame.clear_region(Rect::new(0, 0, 30, 36));
        assert_eq!(frame.surface().pixel(10, 10), Some(BACKGROUND_COLOR));
        assert_eq!(frame.surface().pixel(40, 10), Some(Color::WHITE));
        assert_eq!(frame.surface().pixel(4, 10), Some(BORDER_COLOR));
    }

    #[test]
    fn test_display_size_scales() {
        let frame = FrameCompositor::new(true);
        assert_eq!(frame.display_size(2.0), Size::new(40.0, 72.0));
    }
}
