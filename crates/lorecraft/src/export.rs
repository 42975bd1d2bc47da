//! Helpers for saving rendered images.

/// Name used when the input has no separate title line.
pub const DEFAULT_FILE_STEM: &str = "GeneratedItem";

const STRIPPED: &[char] = &[
    '#', '%', '&', '{', '}', '<', '>', '*', '?', '/', '$', '!', '\'', '"', ':', '@', '+', '`',
    '|', '=', ' ',
];

/// File name for saving the image of `text`.
///
/// Multi-line input is named after its first line with characters that are
/// unsafe in file names removed; formatting codes lose their `&` but keep
/// the code character.
///
/// ```
/// use lorecraft::suggested_file_name;
///
/// assert_eq!(suggested_file_name("&6Sword of Doom\n&7Damage"), "6SwordofDoom.png");
/// assert_eq!(suggested_file_name("single line"), "GeneratedItem.png");
/// ```
pub fn suggested_file_name(text: &str) -> String {
    let mut lines = text.splitn(2, '\n');
    let first = lines.next().unwrap_or_default();
    let stem = match lines.next() {
        Some(_) => first.replace(STRIPPED, ""),
        None => String::new(),
    };
    if stem.is_empty() {
        format!("{}.png", DEFAULT_FILE_STEM)
    } else {
        format!("{}.png", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_unsafe_characters() {
        assert_eq!(
            suggested_file_name("a#b%c{d}e<f>g*h?i/j$k!l'm\"n:o@p+q`r|s=t u\nrest"),
            "abcdefghijklmnopqrstu.png"
        );
    }

    #[test]
    fn test_single_line_uses_default() {
        assert_eq!(suggested_file_name(""), "GeneratedItem.png");
        assert_eq!(suggested_file_name("&cName"), "GeneratedItem.png");
    }

    #[test]
    fn test_empty_title_uses_default() {
        assert_eq!(suggested_file_name("&&& ??\nlore"), "GeneratedItem.png");
    }

    #[test]
    fn test_keeps_non_ascii() {
        assert_eq!(suggested_file_name("\u{2764} Heart\nx"), "\u{2764}Heart.png");
    }
}
