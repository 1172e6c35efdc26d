use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns.
///
/// Appends `...` when text is cut. Widths of 3 or less have no room for the
/// ellipsis, so as many characters as fit are returned instead. Returns
/// `Cow::Borrowed` when the string already fits.
///
/// # Examples
///
/// ```
/// use newsdesk::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Markets rally", 20), "Markets rally");
/// assert_eq!(truncate_to_width("Markets rally", 10), "Markets...");
/// assert_eq!(truncate_to_width("News", 2), "Ne");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }
    let target_width = max_width - ELLIPSIS_WIDTH;

    let mut current_width = 0;
    let mut cut_point = None;

    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);

        if cut_point.is_none() && current_width + char_width > target_width {
            cut_point = Some(idx);
        }

        if current_width + char_width > max_width {
            let cut = cut_point.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS));
        }

        current_width += char_width;
    }

    Cow::Borrowed(s)
}

fn is_stripped_byte(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Headlines and bodies come from arbitrary publishers and are printed
/// straight into the terminal, so anything that could move the cursor or
/// retitle the window is removed. Tab, newline and carriage return survive.
///
/// Handles CSI (`ESC [` ... final byte), OSC (`ESC ]` ... BEL or `ESC \`)
/// and bare ESC.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    if !bytes.iter().any(|&b| is_stripped_byte(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < len {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < len {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_stripped_byte(b) {
            i += 1;
        } else {
            let start = i;
            i += 1;
            while i < len && !is_stripped_byte(bytes[i]) {
                i += 1;
            }
            // Only ASCII control bytes end a run, so the slice stays on char boundaries.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

/// Sanitize upstream text for storage and display: strip control sequences, trim.
pub fn clean_text(s: &str) -> String {
    strip_control_chars(s).trim().to_string()
}

/// Remove the `[+1234 chars]` suffix NewsAPI appends to truncated bodies.
pub fn strip_truncation_marker(content: &str) -> &str {
    let trimmed = content.trim_end();
    if let Some(open) = trimmed.rfind("[+") {
        let tail = &trimmed[open + 2..];
        if let Some(digits) = tail.strip_suffix(" chars]") {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return trimmed[..open].trim_end();
            }
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_truncation() {
        assert_eq!(truncate_to_width("Senate passes budget bill", 12), "Senate pa...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_wide_character_truncation() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_to_width("东京股市大涨", 7), "东京...");
        assert_eq!(truncate_to_width("东京", 10), "东京");
        assert_eq!(truncate_to_width("东京", 1), "");
        assert_eq!(truncate_to_width("东京", 3), "东");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("Hello"), 5);
        assert_eq!(display_width("东京"), 4);
    }

    #[test]
    fn test_clean_headline_is_borrowed() {
        let input = "Rates hold steady\nas inflation cools";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_escape_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mBreaking\x1b[0m"), "Breaking");
        assert_eq!(
            strip_control_chars("\x1b]0;pwned\x07Headline"),
            "Headline"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;pwned\x1b\\Headline"),
            "Headline"
        );
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
        assert_eq!(strip_control_chars("nu\x00ll\x7f"), "null");
    }

    #[test]
    fn test_clean_text_trims() {
        assert_eq!(clean_text("  \x1b[1mTitle\x1b[0m \n"), "Title");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_strip_truncation_marker() {
        assert_eq!(
            strip_truncation_marker("The vote was close… [+2154 chars]"),
            "The vote was close…"
        );
        assert_eq!(strip_truncation_marker("No marker here"), "No marker here");
        assert_eq!(strip_truncation_marker("Odd [+abc chars]"), "Odd [+abc chars]");
        assert_eq!(strip_truncation_marker(""), "");
    }
}
