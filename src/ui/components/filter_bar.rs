//! Filter bar component renderer.
//!
//! A 3-line bordered box holding the search box and the population select:
//!
//! ```text
//!      ┌──────────────────────────────────────────────────────┐
//!      │ Search: alb█     Population: < 5M     Showing: by name │
//!      └──────────────────────────────────────────────────────┘
//! ```

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterBarInfo;

/// Horizontal margin for the box (spaces on left and right).
const FILTER_BAR_MARGIN: usize = 5;

const CURSOR: char = '█';

/// Renders the filter bar at `row`. Returns the row after the box.
pub fn render_filter_bar(out: &mut String, row: usize, bar: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(FILTER_BAR_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.filter_bar_border);

    position_cursor(out, row, 1);
    out.push_str(&" ".repeat(FILTER_BAR_MARGIN));
    out.push_str(&border);
    out.push('┌');
    out.push_str(&"─".repeat(inner_width));
    out.push('┐');
    out.push_str(Theme::reset());

    let mut search = format!(" Search: {}", bar.query);
    if bar.typing {
        search.push(CURSOR);
    }
    let controls = format!("Population: {}     Showing: {} ", bar.population, bar.showing);
    let gap = inner_width
        .saturating_sub(search.chars().count() + controls.chars().count())
        .max(1);
    let line = fit(&format!("{search}{}{controls}", " ".repeat(gap)), inner_width);

    position_cursor(out, row + 1, 1);
    out.push_str(&" ".repeat(FILTER_BAR_MARGIN));
    out.push_str(&border);
    out.push('│');
    out.push_str(&Theme::fg(if bar.typing {
        &theme.colors.text_normal
    } else {
        &theme.colors.text_dim
    }));
    out.push_str(&line);
    out.push_str(&border);
    out.push('│');
    out.push_str(Theme::reset());

    position_cursor(out, row + 2, 1);
    out.push_str(&" ".repeat(FILTER_BAR_MARGIN));
    out.push_str(&border);
    out.push('└');
    out.push_str(&"─".repeat(inner_width));
    out.push('┘');
    out.push_str(Theme::reset());

    row + 3
}
