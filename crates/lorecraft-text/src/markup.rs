//! Formatting-code markup parser.
//!
//! `&<c>` switches color (which also clears styles) or turns on a style;
//! anything else, including an unknown code or a trailing `&`, is literal
//! text. The active color carries over from one line to the next, styles do
//! not.
//!
//! ```
//! use lorecraft_text::{ChatColor, StyleSet, parse};
//!
//! let doc = parse("&c&lHi");
//! let seg = &doc.lines[0].segments[1];
//! assert_eq!(seg.text, "Hi");
//! assert_eq!(seg.color, ChatColor::Red);
//! assert_eq!(seg.style, StyleSet::BOLD);
//! ```

use lorecraft_core::profiling::profile_function;

use crate::format::{ChatColor, FORMAT_PREFIX, FormatCode, StyleSet};

/// A run of text sharing one color and one style set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: ChatColor,
    pub style: StyleSet,
    /// Offset from the line's left margin, assigned by layout.
    pub x: i32,
    /// Advance width, assigned by layout.
    pub width: u32,
    /// `false` while the pixels on the surface do not reflect this segment.
    pub valid: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, color: ChatColor, style: StyleSet) -> Self {
        Self {
            text: text.into(),
            color,
            style,
            x: 0,
            width: 0,
            valid: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Same text, color and style; position and validity are ignored.
    pub fn same_content(&self, other: &Segment) -> bool {
        self.text == other.text && self.color == other.color && self.style == other.style
    }

    /// Offset just past this segment.
    pub fn end(&self) -> i32 {
        self.x + self.width as i32
    }
}

/// One input line. Always holds at least one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Color in effect at the start of the line.
    pub color: ChatColor,
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new(color: ChatColor) -> Self {
        Self {
            color,
            segments: vec![Segment::new("", color, StyleSet::empty())],
        }
    }

    /// Width of the laid out line.
    pub fn width(&self) -> i32 {
        self.segments.iter().map(Segment::end).max().unwrap_or(0)
    }

    /// The segment new literal text is appended to.
    fn open_segment(&mut self) -> &mut Segment {
        if self.segments.is_empty() {
            self.segments
                .push(Segment::new("", self.color, StyleSet::empty()));
        }
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Concatenated text of all segments, without formatting codes.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Parsed input, one [`Line`] per input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Line>,
}

impl Document {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn segment_count(&self) -> usize {
        self.lines.iter().map(|l| l.segments.len()).sum()
    }

    /// Width of the widest laid out line.
    pub fn max_line_width(&self) -> i32 {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.lines.iter().flat_map(|l| l.segments.iter())
    }

    pub fn is_fully_valid(&self) -> bool {
        self.segments().all(|s| s.valid)
    }

    /// Mark every segment as reflected on the surface.
    pub fn mark_valid(&mut self) {
        for line in &mut self.lines {
            for segment in &mut line.segments {
                segment.valid = true;
            }
        }
    }
}

/// Parse markup into a [`Document`]. Never fails.
pub fn parse(text: &str) -> Document {
    profile_function!();
    let mut color = ChatColor::DEFAULT;
    let lines = text
        .split('\n')
        .map(|raw| {
            let (line, trailing) = parse_line(raw, color);
            color = trailing;
            line
        })
        .collect();
    Document { lines }
}

fn parse_line(raw: &str, start_color: ChatColor) -> (Line, ChatColor) {
    let mut line = Line::new(start_color);
    let mut color = start_color;
    let mut style = StyleSet::empty();

    for section in sections(raw) {
        let mut chars = section.chars();
        let token = match (chars.next(), chars.next()) {
            (Some(FORMAT_PREFIX), Some(code)) => FormatCode::from_char(code)
                .map(|format| (format, &section[FORMAT_PREFIX.len_utf8() + code.len_utf8()..])),
            _ => None,
        };

        match token {
            None => line.open_segment().text.push_str(section),
            Some((FormatCode::Color(next), rest)) => {
                color = next;
                style = StyleSet::empty();
                line.segments.push(Segment::new(rest, color, style));
            }
            Some((FormatCode::Style(code), rest)) => {
                if !line.open_segment().is_empty() {
                    line.segments.push(Segment::new("", color, style));
                }
                style = code.apply(style);
                let segment = line.open_segment();
                segment.style = style;
                segment.text.push_str(rest);
            }
        }
    }

    (line, color)
}

/// Split a line in front of every prefix character.
fn sections(raw: &str) -> Vec<&str> {
    let mut bounds: Vec<usize> = raw.match_indices(FORMAT_PREFIX).map(|(i, _)| i).collect();
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(raw.len());
    bounds
        .windows(2)
        .map(|w| &raw[w[0]..w[1]])
        .filter(|s| !s.is_empty())
        .collect()
}
