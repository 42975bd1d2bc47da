//! Segment placement and dirty tracking.
//!
//! [`reconcile`] lays out a freshly parsed document against the one whose
//! pixels are currently on the surface. A segment stays valid only when the
//! previous document had an identical, already drawn segment at the same
//! position on the same line; because positions are cumulative, a width
//! change invalidates everything after it on that line.
//!
//! Pixel upkeep works on cells: a segment's advance box widened by the
//! farthest its ink can spill (shadow and italic to the right, style offsets
//! to the left). Cells of invalid segments, old and new, are restored to the
//! background; invalid segments are drawn whole, and valid neighbours reaching
//! into a restored range are drawn again clipped to that range.

use std::ops::Range;

use lorecraft_core::profiling::profile_function;
use lorecraft_render::metrics::LEFT_OFFSET;

use crate::glyph::FontView;
use crate::markup::{Document, Segment};

/// How far ink can reach left of a segment's x.
pub const SPILL_LEFT: i32 = 2;
/// How far ink can reach right of a segment's advance.
pub const SPILL_RIGHT: i32 = 4;

/// Columns a segment's ink may cover, in surface coordinates.
pub fn cell(segment: &Segment) -> Range<i32> {
    let x = LEFT_OFFSET + segment.x;
    (x - SPILL_LEFT)..(x + segment.width as i32 + SPILL_RIGHT)
}

fn overlaps(a: &Range<i32>, b: &Range<i32>) -> bool {
    a.start < b.end && b.start < a.end
}

/// One segment to draw. `clip` limits drawing to those surface columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOp {
    pub segment: usize,
    pub clip: Option<Range<i32>>,
}

/// Work for one line, executed in order: clear, then draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePlan {
    pub line: usize,
    /// Disjoint, sorted column ranges to restore to the background.
    pub clear: Vec<Range<i32>>,
    /// Segments in line order.
    pub draws: Vec<DrawOp>,
}

/// Everything a render pass has to touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedrawPlan {
    pub lines: Vec<LinePlan>,
}

impl RedrawPlan {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of draw operations.
    pub fn draw_count(&self) -> usize {
        self.lines.iter().map(|l| l.draws.len()).sum()
    }
}

/// Assign x and width to every segment from the glyph widths.
pub fn relayout(document: &mut Document, font: &FontView<'_>) {
    for line in &mut document.lines {
        let mut x = 0;
        for segment in &mut line.segments {
            segment.x = x;
            segment.width = font.measure(&segment.text, segment.style);
            x += segment.width as i32;
        }
    }
}

/// Lay out `next`, decide which segments are valid against `prev`, and plan
/// the pixel work. With no `prev` everything is drawn.
pub fn reconcile(prev: Option<&Document>, next: &mut Document, font: &FontView<'_>) -> RedrawPlan {
    profile_function!();
    relayout(next, font);

    let mut plan = RedrawPlan::default();
    for (index, line) in next.lines.iter_mut().enumerate() {
        let old = prev.and_then(|doc| doc.lines.get(index));
        let mut dirty = Vec::new();

        for (i, segment) in line.segments.iter_mut().enumerate() {
            let before = old.and_then(|l| l.segments.get(i));
            segment.valid = before.is_some_and(|b| {
                b.valid && b.x == segment.x && b.width == segment.width && b.same_content(segment)
            });
            if !segment.valid && !segment.is_empty() {
                dirty.push(cell(segment));
            }
        }

        if let Some(old) = old {
            for (i, before) in old.segments.iter().enumerate() {
                let kept = line.segments.get(i).is_some_and(|s| s.valid);
                if !kept && before.valid && !before.is_empty() {
                    dirty.push(cell(before));
                }
            }
        }

        let clear = merge(dirty);
        let draws: Vec<DrawOp> = line
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .flat_map(|(i, segment)| {
                let ops: Vec<DrawOp> = if !segment.valid {
                    vec![DrawOp {
                        segment: i,
                        clip: None,
                    }]
                } else {
                    let own = cell(segment);
                    clear
                        .iter()
                        .filter(|r| overlaps(&own, r))
                        .map(|r| DrawOp {
                            segment: i,
                            clip: Some(r.clone()),
                        })
                        .collect()
                };
                ops
            })
            .collect();

        if !clear.is_empty() || !draws.is_empty() {
            plan.lines.push(LinePlan {
                line: index,
                clear,
                draws,
            });
        }
    }

    tracing::trace!(
        "Layout: {} line(s) to touch, {} draw(s)",
        plan.lines.len(),
        plan.draw_count()
    );
    plan
}

/// Sort and coalesce overlapping or touching ranges.
fn merge(mut ranges: Vec<Range<i32>>) -> Vec<Range<i32>> {
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<i32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lorecraft_assets::MemoryReader;
    use lorecraft_core::config::GlyphPaths;
    use lorecraft_test_utils::glyphs::width_table;

    use crate::glyph::GlyphCatalog;
    use crate::markup::parse;

    fn catalog() -> GlyphCatalog {
        GlyphCatalog::from_width_table(
            &width_table(1, 6),
            Arc::new(MemoryReader::new()),
            GlyphPaths::default(),
        )
        .unwrap()
    }

    fn drawn(text: &str, font: &FontView<'_>) -> Document {
        let mut doc = parse(text);
        reconcile(None, &mut doc, font);
        doc.mark_valid();
        doc
    }

    #[test]
    fn test_merge_ranges() {
        assert_eq!(merge(vec![10..20, 0..5, 18..30, 5..6]), vec![0..6, 10..30]);
        assert!(merge(vec![]).is_empty());
    }

    #[test]
    fn test_relayout_is_cumulative() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let mut doc = parse("ab&lcd&rx");
        relayout(&mut doc, &font);
        let segs = &doc.lines[0].segments;
        assert_eq!((segs[0].x, segs[0].width), (0, 16));
        assert_eq!((segs[1].x, segs[1].width), (16, 18));
        assert_eq!((segs[2].x, segs[2].width), (34, 8));
        assert_eq!(doc.lines[0].width(), 42);
    }

    #[test]
    fn test_everything_is_drawn_without_previous() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let mut doc = parse("&aA&bB\nC");
        let plan = reconcile(None, &mut doc, &font);
        assert!(!doc.is_fully_valid());
        assert_eq!(plan.lines.len(), 2);
        // the empty leading segment is not drawn
        assert_eq!(plan.draw_count(), 3);
    }

    #[test]
    fn test_unchanged_document_is_idempotent() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let prev = drawn("&6Gold &lbold\n&9next", &font);

        let mut again = prev.clone();
        let plan = reconcile(Some(&prev), &mut again, &font);
        assert!(plan.is_empty());
        assert_eq!(again, prev);

        let mut reparsed = parse("&6Gold &lbold\n&9next");
        let plan = reconcile(Some(&prev), &mut reparsed, &font);
        assert!(plan.is_empty());
        assert!(reparsed.is_fully_valid());
    }

    #[test]
    fn test_width_change_cascades_along_line_only() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let prev = drawn("&aAAA&bB&cC\n&dD", &font);

        let mut next = parse("&aAAAA&bB&cC\n&dD");
        let plan = reconcile(Some(&prev), &mut next, &font);

        let line = &next.lines[0];
        assert!(line.segments[0].valid);
        assert!(!line.segments[1].valid);
        assert!(!line.segments[2].valid);
        assert!(!line.segments[3].valid);
        assert_eq!(line.segments[2].x, prev.lines[0].segments[2].x + 8);
        assert_eq!(line.segments[3].x, prev.lines[0].segments[3].x + 8);

        assert!(next.lines[1].segments.iter().all(|s| s.valid));
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].line, 0);
    }

    #[test]
    fn test_same_width_edit_keeps_followers_valid() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let prev = drawn("&aAB&bCD&cEF", &font);

        let mut next = parse("&aXY&bCD&cEF");
        let plan = reconcile(Some(&prev), &mut next, &font);
        let segs = &next.lines[0].segments;
        assert!(!segs[1].valid);
        assert!(segs[2].valid);
        assert!(segs[3].valid);

        // the neighbour touching the restored range is drawn clipped, the
        // one beyond it is left alone
        let line = &plan.lines[0];
        assert_eq!(line.clear, vec![cell(&segs[1])]);
        assert_eq!(
            line.draws,
            vec![
                DrawOp { segment: 1, clip: None },
                DrawOp { segment: 2, clip: Some(cell(&segs[1])) },
            ]
        );
    }

    #[test]
    fn test_removed_segments_are_cleared() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let prev = drawn("A&cgone", &font);

        let mut next = parse("A");
        let plan = reconcile(Some(&prev), &mut next, &font);
        assert!(next.is_fully_valid());
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].clear, vec![cell(&prev.lines[0].segments[1])]);
        // segment 0 reaches into the cleared range and is touched up
        assert_eq!(
            plan.lines[0].draws,
            vec![DrawOp { segment: 0, clip: Some(cell(&prev.lines[0].segments[1])) }]
        );
    }

    #[test]
    fn test_new_lines_are_drawn() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let prev = drawn("one", &font);

        let mut next = parse("one\ntwo");
        let plan = reconcile(Some(&prev), &mut next, &font);
        assert!(next.lines[0].segments[0].valid);
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].line, 1);
    }

    #[test]
    fn test_undrawn_previous_segment_is_not_trusted() {
        let catalog = catalog();
        let font = catalog.font(0).unwrap();
        let mut prev = parse("same");
        reconcile(None, &mut prev, &font);

        let mut next = parse("same");
        let plan = reconcile(Some(&prev), &mut next, &font);
        assert!(!next.lines[0].segments[0].valid);
        assert_eq!(plan.draw_count(), 1);
    }
}
