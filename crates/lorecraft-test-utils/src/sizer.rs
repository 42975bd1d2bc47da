//! Mock drawing target.

use lorecraft_core::geometry::Rect;
use lorecraft_render::metrics::LEFT_OFFSET;
use lorecraft_render::{RasterSurface, SurfaceSizer};

/// A bare surface without frame decoration that records growth requests.
///
/// Like the real frame, text may extend to `LEFT_OFFSET` short of the right
/// edge, and growing keeps everything drawn so far.
#[derive(Debug, Clone)]
pub struct MockSizer {
    surface: RasterSurface,
    grows: Vec<i32>,
}

impl MockSizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RasterSurface::new(width, height),
            grows: Vec::new(),
        }
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Right edges passed to `grow_to_fit`, in call order.
    pub fn grows(&self) -> &[i32] {
        &self.grows
    }
}

impl SurfaceSizer for MockSizer {
    fn drawable_width(&self) -> i32 {
        self.surface.width() as i32 - LEFT_OFFSET
    }

    fn grow_to_fit(&mut self, right_edge: i32) {
        self.grows.push(right_edge);
        let width = (right_edge + LEFT_OFFSET).max(self.surface.width() as i32) as u32;
        let height = self.surface.height();
        let old = self
            .surface
            .get_region(Rect::new(0, 0, self.surface.width() as i32, height as i32));
        self.surface = RasterSurface::new(width, height);
        self.surface.put_region(&old, 0, 0);
    }

    fn surface_mut(&mut self) -> &mut RasterSurface {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorecraft_render::Color;

    #[test]
    fn test_grow_keeps_pixels() {
        let mut sizer = MockSizer::new(20, 10);
        sizer
            .surface_mut()
            .set_rect(Rect::new(0, 0, 2, 2), Color::WHITE);
        sizer.grow_to_fit(30);
        assert_eq!(sizer.grows(), &[30]);
        assert_eq!(sizer.surface().width(), 40);
        assert_eq!(sizer.drawable_width(), 30);
        assert_eq!(sizer.surface().pixel(1, 1), Some(Color::WHITE));
    }
}
