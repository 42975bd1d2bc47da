//! Fixed pixel metrics of the tooltip frame.
//!
//! Every value is expressed in output pixels; `DPI` is the number of output
//! pixels per in-game pixel.

use crate::Color;

/// Output pixels per in-game pixel.
pub const DPI: i32 = 2;
/// Gap between the image edge and the background.
pub const SPACING: i32 = 2;
/// Distance from the top edge to the first line of text.
pub const TOP_OFFSET: i32 = 4 * DPI + SPACING;
/// Distance from the left edge to the start of every line.
pub const LEFT_OFFSET: i32 = 4 * DPI + SPACING;
/// Height of one rendered glyph row.
pub const FONT_SIZE: i32 = 16 * DPI / 2;
/// Vertical distance between consecutive baselines.
pub const LINE_HEIGHT: i32 = FONT_SIZE + DPI * 2;
/// Extra space inserted after the first line when the gap option is on.
pub const FIRST_LINE_GAP: i32 = 2 * DPI;

/// Smallest frame: no text, one empty line.
pub const MIN_WIDTH: u32 = (LEFT_OFFSET * 2) as u32;
pub const MIN_HEIGHT: u32 = (TOP_OFFSET * 2 + FONT_SIZE) as u32;

pub const BACKGROUND_COLOR: Color = Color::rgb(20, 3, 20);
pub const BORDER_COLOR: Color = Color::from_hex(0x25005e);
/// Inset of the border stroke's center line.
pub const BORDER_INSET: i32 = SPACING + DPI * 3 / 2;
/// Side of the transparent notches punched into the background corners.
pub const CORNER_NOTCH: i32 = DPI;

/// Top y coordinate of line `index`.
pub fn line_y(index: usize, first_line_gap: bool) -> i32 {
    let gap = if index > 0 && first_line_gap {
        FIRST_LINE_GAP
    } else {
        0
    };
    TOP_OFFSET + index as i32 * LINE_HEIGHT + gap
}

/// Frame height that fits `line_count` lines (at least one).
pub fn frame_height(line_count: usize, first_line_gap: bool) -> u32 {
    let last = line_count.max(1) - 1;
    (line_y(last, first_line_gap) + FONT_SIZE + TOP_OFFSET) as u32
}

/// Frame width whose drawable area ends exactly at `right_edge`.
pub fn frame_width(right_edge: i32) -> u32 {
    (right_edge + LEFT_OFFSET).max(MIN_WIDTH as i32) as u32
}
