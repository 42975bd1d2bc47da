//! Formatting codes: the 16 chat colors and the style codes.
//!
//! Both registries are immutable. Lookups go through two static indexes per
//! registry, one keyed by code character and one by name.

use std::sync::LazyLock;

use bitflags::bitflags;
use lorecraft_core::alloc::HashMap;
use lorecraft_render::Color;

/// Character that introduces a formatting code.
pub const FORMAT_PREFIX: char = '&';

/// One of the 16 fixed chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

struct ColorEntry {
    code: char,
    name: &'static str,
    primary: Color,
    shadow: Color,
}

const fn entry(code: char, name: &'static str, primary: [u8; 3], shadow: [u8; 3]) -> ColorEntry {
    ColorEntry {
        code,
        name,
        primary: Color::rgb(primary[0], primary[1], primary[2]),
        shadow: Color::rgb(shadow[0], shadow[1], shadow[2]),
    }
}

const COLOR_TABLE: [ColorEntry; 16] = [
    entry('0', "BLACK", [0, 0, 0], [0, 0, 0]),
    entry('1', "DARK_BLUE", [0, 0, 170], [0, 0, 42]),
    entry('2', "DARK_GREEN", [0, 170, 0], [0, 42, 0]),
    entry('3', "DARK_AQUA", [0, 170, 170], [0, 42, 42]),
    entry('4', "DARK_RED", [170, 0, 0], [42, 0, 0]),
    entry('5', "DARK_PURPLE", [170, 0, 170], [42, 0, 42]),
    entry('6', "GOLD", [255, 170, 0], [42, 42, 0]),
    entry('7', "GRAY", [170, 170, 170], [42, 42, 42]),
    entry('8', "DARK_GRAY", [85, 85, 85], [21, 21, 21]),
    entry('9', "BLUE", [85, 85, 255], [21, 21, 63]),
    entry('a', "GREEN", [85, 255, 85], [21, 63, 21]),
    entry('b', "AQUA", [85, 255, 255], [21, 63, 63]),
    entry('c', "RED", [255, 85, 85], [63, 21, 21]),
    entry('d', "LIGHT_PURPLE", [255, 85, 255], [63, 21, 63]),
    entry('e', "YELLOW", [255, 255, 85], [63, 63, 21]),
    entry('f', "WHITE", [255, 255, 255], [63, 63, 63]),
];

static COLORS_BY_CODE: LazyLock<HashMap<char, ChatColor>> =
    LazyLock::new(|| ChatColor::ALL.iter().map(|c| (c.code(), *c)).collect());

static COLORS_BY_NAME: LazyLock<HashMap<&'static str, ChatColor>> =
    LazyLock::new(|| ChatColor::ALL.iter().map(|c| (c.name(), *c)).collect());

impl ChatColor {
    pub const ALL: [ChatColor; 16] = [
        ChatColor::Black,
        ChatColor::DarkBlue,
        ChatColor::DarkGreen,
        ChatColor::DarkAqua,
        ChatColor::DarkRed,
        ChatColor::DarkPurple,
        ChatColor::Gold,
        ChatColor::Gray,
        ChatColor::DarkGray,
        ChatColor::Blue,
        ChatColor::Green,
        ChatColor::Aqua,
        ChatColor::Red,
        ChatColor::LightPurple,
        ChatColor::Yellow,
        ChatColor::White,
    ];

    /// Color of text before any color code.
    pub const DEFAULT: ChatColor = ChatColor::Gray;

    fn entry(self) -> &'static ColorEntry {
        &COLOR_TABLE[self as usize]
    }

    pub fn code(self) -> char {
        self.entry().code
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn primary(self) -> Color {
        self.entry().primary
    }

    /// Drop-shadow variant, roughly a quarter of the primary.
    pub fn shadow(self) -> Color {
        self.entry().shadow
    }

    pub fn from_code(code: char) -> Option<ChatColor> {
        COLORS_BY_CODE.get(&code).copied()
    }

    /// Look up a color by its upper-case name, e.g. `"LIGHT_PURPLE"`.
    pub fn from_name(name: &str) -> Option<ChatColor> {
        COLORS_BY_NAME.get(name).copied()
    }
}

impl Default for ChatColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for ChatColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Active text decorations of a segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleSet: u8 {
        const BOLD          = 1 << 0;
        const STRIKETHROUGH = 1 << 1;
        const UNDERLINE     = 1 << 2;
        const ITALIC        = 1 << 3;
    }
}

impl StyleSet {
    pub fn is_bold(self) -> bool {
        self.contains(StyleSet::BOLD)
    }

    pub fn is_strikethrough(self) -> bool {
        self.contains(StyleSet::STRIKETHROUGH)
    }

    pub fn is_underline(self) -> bool {
        self.contains(StyleSet::UNDERLINE)
    }

    pub fn is_italic(self) -> bool {
        self.contains(StyleSet::ITALIC)
    }
}

/// A style formatting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCode {
    Bold,
    Strikethrough,
    Underline,
    Italic,
    /// Clears every style flag.
    Reset,
}

static STYLES_BY_CODE: LazyLock<HashMap<char, StyleCode>> =
    LazyLock::new(|| StyleCode::ALL.iter().map(|s| (s.code(), *s)).collect());

static STYLES_BY_NAME: LazyLock<HashMap<&'static str, StyleCode>> =
    LazyLock::new(|| StyleCode::ALL.iter().map(|s| (s.name(), *s)).collect());

impl StyleCode {
    pub const ALL: [StyleCode; 5] = [
        StyleCode::Bold,
        StyleCode::Strikethrough,
        StyleCode::Underline,
        StyleCode::Italic,
        StyleCode::Reset,
    ];

    pub fn code(self) -> char {
        match self {
            StyleCode::Bold => 'l',
            StyleCode::Strikethrough => 'm',
            StyleCode::Underline => 'n',
            StyleCode::Italic => 'o',
            StyleCode::Reset => 'r',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StyleCode::Bold => "BOLD",
            StyleCode::Strikethrough => "STRIKETHROUGH",
            StyleCode::Underline => "UNDERLINE",
            StyleCode::Italic => "ITALIC",
            StyleCode::Reset => "RESET",
        }
    }

    /// Bit position of the flag, `None` for reset.
    pub fn bit(self) -> Option<u8> {
        match self {
            StyleCode::Bold => Some(0),
            StyleCode::Strikethrough => Some(1),
            StyleCode::Underline => Some(2),
            StyleCode::Italic => Some(3),
            StyleCode::Reset => None,
        }
    }

    pub fn is_reset(self) -> bool {
        self == StyleCode::Reset
    }

    /// Style set after applying this code to `style`.
    ///
    /// Flags are only ever turned on; reset yields a fresh empty set.
    pub fn apply(self, style: StyleSet) -> StyleSet {
        match self.bit() {
            Some(bit) => style | StyleSet::from_bits_truncate(1 << bit),
            None => StyleSet::empty(),
        }
    }

    pub fn from_code(code: char) -> Option<StyleCode> {
        STYLES_BY_CODE.get(&code).copied()
    }

    pub fn from_name(name: &str) -> Option<StyleCode> {
        STYLES_BY_NAME.get(name).copied()
    }
}

impl std::fmt::Display for StyleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized `&<c>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    Color(ChatColor),
    Style(StyleCode),
}

impl FormatCode {
    /// Resolve the character following the prefix. Codes are case-sensitive.
    pub fn from_char(code: char) -> Option<FormatCode> {
        ChatColor::from_code(code)
            .map(FormatCode::Color)
            .or_else(|| StyleCode::from_code(code).map(FormatCode::Style))
    }
}
