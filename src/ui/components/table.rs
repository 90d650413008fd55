//! Table component renderer.
//!
//! Renders the countries table: a position column followed by Country Name,
//! Code, Capital, Ph Code, Population, Flag and Emblem. Flag and Emblem share
//! whatever width is left over.

use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::CountryRow;

const POSITION_WIDTH: usize = 4;
const NAME_WIDTH: usize = 24;
const CODE_WIDTH: usize = 5;
const CAPITAL_WIDTH: usize = 18;
const PHONE_WIDTH: usize = 8;
const POPULATION_WIDTH: usize = 11;
const MIN_IMAGE_WIDTH: usize = 8;

/// Width of everything left of the Flag column, separators included.
const FIXED_WIDTH: usize =
    POSITION_WIDTH + NAME_WIDTH + CODE_WIDTH + CAPITAL_WIDTH + PHONE_WIDTH + POPULATION_WIDTH + 6;

/// Width of each of the Flag and Emblem columns.
fn image_width(cols: usize) -> usize {
    (cols.saturating_sub(FIXED_WIDTH + 2) / 2).max(MIN_IMAGE_WIDTH)
}

/// Renders the column headings. Returns the next free row.
pub fn render_table_headers(out: &mut String, row: usize, theme: &Theme, cols: usize) -> usize {
    let image = image_width(cols);

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.column_header_fg));
    out.push_str(&format!(
        "{:>POSITION_WIDTH$} {:<NAME_WIDTH$} {:<CODE_WIDTH$} {:<CAPITAL_WIDTH$} {:<PHONE_WIDTH$} {:>POPULATION_WIDTH$} {:<image$} {:<image$}",
        "#", "Country Name", "Code", "Capital", "Ph Code", "Population", "Flag", "Emblem"
    ));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders every row in order. Returns the next free row.
pub fn render_table_rows(out: &mut String, row: usize, rows: &[CountryRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for country in rows {
        current_row = render_table_row(out, current_row, country, theme, cols);
    }
    current_row
}

/// Renders one country, padded to the full width so the selection background
/// covers the whole line.
fn render_table_row(out: &mut String, row: usize, country: &CountryRow, theme: &Theme, cols: usize) -> usize {
    let image = image_width(cols);

    position_cursor(out, row, 1);
    if country.is_selected {
        out.push_str(&Theme::fg(&theme.colors.selection_fg));
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
    }

    out.push_str(&format!("{:>POSITION_WIDTH$} ", country.position));
    helpers::render_highlighted_text(
        out,
        &fit(&country.name, NAME_WIDTH),
        &country.highlight_ranges,
        theme,
        country.is_selected,
    );

    let rest = format!(
        " {} {} {} {:>POPULATION_WIDTH$} {} {}",
        fit(&country.code, CODE_WIDTH),
        fit(&country.capital, CAPITAL_WIDTH),
        fit(&country.phone, PHONE_WIDTH),
        fit(&country.population, POPULATION_WIDTH).trim_end(),
        fit(&country.flag, image),
        fit(&country.emblem, image),
    );
    out.push_str(&rest);

    let line_len = FIXED_WIDTH + 2 * image + 1;
    out.push_str(&" ".repeat(cols.saturating_sub(line_len)));

    out.push_str(Theme::reset());
    row + 1
}
