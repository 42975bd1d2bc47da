//! Render settings consumed by the renderer.
//!
//! The settings store itself lives outside the renderer; each render pass
//! receives an immutable [`RenderSettings`] snapshot.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Snapshot of the user-facing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Insert an extra gap between the first line and the rest.
    pub first_line_gap: bool,
    /// Draw the framed tooltip background behind the text.
    pub render_background: bool,
    /// Index of the font version (0 = legacy glyphs).
    pub font_version: usize,
    /// Periodic refresh interval in whole seconds, 0 disables the timer.
    pub update_period: u32,
    /// Display-only scale factor for the rendered image.
    pub image_scale: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            first_line_gap: true,
            render_background: true,
            font_version: 0,
            update_period: 2,
            image_scale: 2.0,
        }
    }
}

impl RenderSettings {
    /// The refresh interval, or `None` when periodic refresh is disabled.
    pub fn update_interval(&self) -> Option<Duration> {
        (self.update_period > 0).then(|| Duration::from_secs(self.update_period as u64))
    }

    /// Keys whose values differ between `self` and `other`.
    pub fn diff(&self, other: &RenderSettings) -> Vec<SettingKey> {
        let mut changed = Vec::new();
        if self.first_line_gap != other.first_line_gap {
            changed.push(SettingKey::FirstLineGap);
        }
        if self.render_background != other.render_background {
            changed.push(SettingKey::RenderBackground);
        }
        if self.font_version != other.font_version {
            changed.push(SettingKey::FontVersion);
        }
        if self.update_period != other.update_period {
            changed.push(SettingKey::UpdatePeriod);
        }
        if self.image_scale != other.image_scale {
            changed.push(SettingKey::ImageScale);
        }
        changed
    }
}

/// Stable identifiers of the individual settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    FirstLineGap,
    RenderBackground,
    FontVersion,
    UpdatePeriod,
    ImageScale,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::FirstLineGap,
        SettingKey::RenderBackground,
        SettingKey::FontVersion,
        SettingKey::UpdatePeriod,
        SettingKey::ImageScale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::FirstLineGap => "first-line-gap",
            SettingKey::RenderBackground => "render-background",
            SettingKey::FontVersion => "font-version",
            SettingKey::UpdatePeriod => "update-period",
            SettingKey::ImageScale => "image-scale",
        }
    }

    /// Whether a change to this setting alters the rendered pixels.
    pub fn affects_output(&self) -> bool {
        matches!(
            self,
            SettingKey::FirstLineGap | SettingKey::RenderBackground | SettingKey::FontVersion
        )
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown setting name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSetting(pub String);

impl fmt::Display for UnknownSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown setting \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownSetting {}

impl FromStr for SettingKey {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

/// Where the glyph assets live, relative to the asset reader's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPaths {
    /// Flat table of advance widths, 65536 bytes per font version.
    pub width_table: PathBuf,
    /// Directory holding the per-version sheet directories.
    pub sheet_root: PathBuf,
    /// Sheet directory for font version 0.
    pub legacy_dir: String,
    /// Sheet directory for every later font version.
    pub modern_dir: String,
    /// Image file extension of the sheets.
    pub extension: String,
}

impl Default for GlyphPaths {
    fn default() -> Self {
        GlyphPaths {
            width_table: PathBuf::from("data/glyph_sizes.bin"),
            sheet_root: PathBuf::from("glyphs"),
            legacy_dir: "old".to_string(),
            modern_dir: "new".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl GlyphPaths {
    /// Path of the sheet for one codepoint page, e.g. `glyphs/old/0a.png`.
    pub fn sheet(&self, font_version: usize, page: u8) -> PathBuf {
        let dir = if font_version == 0 {
            &self.legacy_dir
        } else {
            &self.modern_dir
        };
        self.sheet_root
            .join(dir)
            .join(format!("{:02x}.{}", page, self.extension))
    }
}
