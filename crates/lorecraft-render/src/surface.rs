//! CPU raster surface.
//!
//! A thin wrapper over an [`image::RgbaImage`] offering the handful of 2D
//! canvas operations the renderer needs. All operations clip silently to the
//! surface bounds.

use image::{Rgba, RgbaImage};
use lorecraft_core::geometry::Rect;

use crate::Color;

/// An RGBA pixel buffer with canvas-style drawing operations.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        self.image
            .get_pixel_checked(x as u32, y as u32)
            .map(|px| Color::from(*px))
    }

    /// Paint `rect` with `color`, blending over existing pixels.
    pub fn fill_rect(&mut self, rect: Rect<i32>, color: Color) {
        let Some(rect) = rect.clip_to(self.width(), self.height()) else {
            return;
        };
        let src: Rgba<u8> = color.into();
        for y in rect.y..rect.bottom() {
            for x in rect.columns() {
                blend_over(self.image.get_pixel_mut(x as u32, y as u32), src);
            }
        }
    }

    /// Overwrite `rect` with `color`, alpha included.
    pub fn set_rect(&mut self, rect: Rect<i32>, color: Color) {
        let Some(rect) = rect.clip_to(self.width(), self.height()) else {
            return;
        };
        let px: Rgba<u8> = color.into();
        for y in rect.y..rect.bottom() {
            for x in rect.columns() {
                self.image.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Make `rect` fully transparent.
    pub fn clear_rect(&mut self, rect: Rect<i32>) {
        self.set_rect(rect, Color::TRANSPARENT);
    }

    /// Clear the whole surface.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    /// Stroke the outline of `rect` with a line `line_width` wide, centered
    /// on the rectangle's edges.
    pub fn stroke_rect(&mut self, rect: Rect<i32>, line_width: i32, color: Color) {
        let half = line_width / 2;
        let outer = Rect::new(
            rect.x - half,
            rect.y - half,
            rect.width + line_width,
            rect.height + line_width,
        );
        let inner_height = outer.height - 2 * line_width;

        self.fill_rect(Rect::new(outer.x, outer.y, outer.width, line_width), color);
        self.fill_rect(
            Rect::new(outer.x, outer.bottom() - line_width, outer.width, line_width),
            color,
        );
        self.fill_rect(
            Rect::new(outer.x, outer.y + line_width, line_width, inner_height),
            color,
        );
        self.fill_rect(
            Rect::new(outer.right() - line_width, outer.y + line_width, line_width, inner_height),
            color,
        );
    }

    /// Copy out `rect`; parts outside the surface read as transparent.
    pub fn get_region(&self, rect: Rect<i32>) -> RgbaImage {
        let mut out = RgbaImage::new(rect.width.max(0) as u32, rect.height.max(0) as u32);
        if let Some(visible) = rect.clip_to(self.width(), self.height()) {
            for y in visible.y..visible.bottom() {
                for x in visible.columns() {
                    let px = *self.image.get_pixel(x as u32, y as u32);
                    out.put_pixel((x - rect.x) as u32, (y - rect.y) as u32, px);
                }
            }
        }
        out
    }

    /// Write `region` at `(dx, dy)`, replacing the pixels underneath.
    pub fn put_region(&mut self, region: &RgbaImage, dx: i32, dy: i32) {
        self.copy_pixels(region, full_rect(region), dx, dy, |dst, src| *dst = src);
    }

    /// Composite `src_rect` of `src` at `(dx, dy)` using source-over blending.
    pub fn draw_image(&mut self, src: &RgbaImage, src_rect: Rect<i32>, dx: i32, dy: i32) {
        self.copy_pixels(src, src_rect, dx, dy, blend_over);
    }

    /// Replace the color of every pixel in `rect` with `color`, keeping its
    /// coverage: the canvas `source-in` fill.
    pub fn recolor(&mut self, rect: Rect<i32>, color: Color) {
        let Some(rect) = rect.clip_to(self.width(), self.height()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.columns() {
                let px = self.image.get_pixel_mut(x as u32, y as u32);
                let alpha = (px.0[3] as u32 * color.a as u32 + 127) / 255;
                *px = Rgba([color.r, color.g, color.b, alpha as u8]);
            }
        }
    }

    fn copy_pixels(
        &mut self,
        src: &RgbaImage,
        src_rect: Rect<i32>,
        dx: i32,
        dy: i32,
        mut op: impl FnMut(&mut Rgba<u8>, Rgba<u8>),
    ) {
        let Some(src_rect) = src_rect.clip_to(src.width(), src.height()) else {
            return;
        };
        let dst_rect = Rect::new(dx, dy, src_rect.width, src_rect.height);
        let Some(visible) = dst_rect.clip_to(self.width(), self.height()) else {
            return;
        };
        for y in visible.y..visible.bottom() {
            for x in visible.columns() {
                let sx = (src_rect.x + x - dx) as u32;
                let sy = (src_rect.y + y - dy) as u32;
                op(self.image.get_pixel_mut(x as u32, y as u32), *src.get_pixel(sx, sy));
            }
        }
    }
}

fn full_rect(image: &RgbaImage) -> Rect<i32> {
    Rect::new(0, 0, image.width() as i32, image.height() as i32)
}

/// Straight-alpha source-over compositing of one pixel.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3] as u32;
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let da = dst.0[3] as u32;
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (src.0[c] as u32 * sa * 255 + dst.0[c] as u32 * da * (255 - sa)) / out_a;
        out[c] = value.min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    *dst = Rgba(out);
}
