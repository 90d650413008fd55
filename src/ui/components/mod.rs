//! Composable UI component renderers.
//!
//! Each component writes one part of the frame and returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with record counts
//! - [`footer`]: Keybinding hints
//! - [`filter_bar`]: Search box and population select
//! - [`table`]: Countries table
//! - [`empty`]: Prompt, loading notice or failure in place of the table
//!
//! # Layouts
//!
//! - [`render_prompt_mode`]: Header + Empty state + Footer
//! - [`render_table_mode`]: Header + Filter bar + Table + Footer

mod empty;
mod filter_bar;
mod footer;
mod header;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{EmptyState, FilterBarInfo, UIViewModel};

use empty::render_empty_state;
use filter_bar::render_filter_bar;
use footer::render_footer;
use header::render_header;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal rule at `row`. Returns the next free row.
fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Draws the bottom border and footer on the last two rows.
fn render_bottom(out: &mut String, vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows.max(2);
    render_border(out, footer_row - 1, &theme.colors.border, cols);
    render_footer(out, footer_row, &vm.footer, theme, cols);
}

/// Layout before the record set is available.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Empty state message + subtitle]
/// [Border]
/// [Footer]
/// ```
pub fn render_prompt_mode(out: &mut String, vm: &UIViewModel, empty: &EmptyState, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    render_border(out, current_row, &theme.colors.border, cols);
    render_empty_state(out, empty, theme, cols);

    render_bottom(out, vm, theme, cols, rows);
}

/// Layout once loaded.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Filter bar - 3 lines]
/// [Column headings]
/// [Table rows]
/// [Border]
/// [Footer]
/// ```
pub fn render_table_mode(out: &mut String, vm: &UIViewModel, bar: &FilterBarInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    current_row = render_filter_bar(out, current_row, bar, theme, cols);
    current_row = render_table_headers(out, current_row, theme, cols);
    let _current_row = render_table_rows(out, current_row, &vm.rows, theme, cols);

    render_bottom(out, vm, theme, cols, rows);
}
