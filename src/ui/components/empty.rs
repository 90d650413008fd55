//! Empty state component renderer.
//!
//! Shown in place of the table before the record set is available: the
//! "Show all Countries" prompt, the loading notice, or the load failure.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Row of the message line; the subtitle goes right below it.
const MESSAGE_ROW: usize = 6;

/// Renders a centered two-line message.
///
/// ```text
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses `error_fg` for failures and `empty_state_fg` otherwise.
pub fn render_empty_state(out: &mut String, empty: &EmptyState, theme: &Theme, cols: usize) {
    let message_color = if empty.is_error {
        &theme.colors.error_fg
    } else {
        &theme.colors.empty_state_fg
    };

    position_cursor(out, MESSAGE_ROW, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(message_color));
    centered(out, &empty.message, cols);
    out.push_str(Theme::reset());

    position_cursor(out, MESSAGE_ROW + 1, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    centered(out, &empty.subtitle, cols);
    out.push_str(Theme::reset());
}

fn centered(out: &mut String, text: &str, cols: usize) {
    let len = text.chars().count().min(cols);
    let padding = cols.saturating_sub(len) / 2;

    out.push_str(&" ".repeat(padding));
    out.extend(text.chars().take(len));
    out.push_str(&" ".repeat(cols.saturating_sub(padding + len)));
}
