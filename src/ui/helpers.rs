//! Shared rendering utilities and helpers.
//!
//! Components write ANSI output into a `String` frame rather than straight to
//! stdout so the whole frame can be inspected in tests and flushed with a
//! single `print!`.
//!
//! All width math operates on character counts, not bytes.
//!
//! # Example
//!
//! ```
//! use country_browser::ui::helpers::{fit, url_tail};
//!
//! assert_eq!(fit("Tirana", 4), "Tir…");
//! assert_eq!(fit("AL", 4), "AL  ");
//! assert_eq!(url_tail(Some("https://flags.example/al.png")), "al.png");
//! assert_eq!(url_tail(None), "-");
//! ```

use crate::domain::MISSING;
use crate::ui::theme::Theme;
use std::fmt::Write;

/// Moves the cursor to a 1-indexed `row`/`col`.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

/// Pads or truncates `text` to exactly `width` characters.
///
/// Truncated text ends in `…`.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return format!("{text:<width$}");
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

/// Last path segment of an image link, or `-` when there is none.
///
/// The terminal cannot show the image itself; the file name is enough to
/// tell rows apart.
#[must_use]
pub fn url_tail(url: Option<&str>) -> String {
    let Some(url) = url else {
        return MISSING.to_string();
    };

    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|tail| !tail.is_empty())
        .unwrap_or(url)
        .to_string()
}

/// Writes `text` with the character `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices, end exclusive, sorted and
/// non-overlapping. Highlighting is skipped on the selected row so the
/// selection colors stay intact.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}
