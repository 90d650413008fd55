//! View model types representing renderable UI state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready strings,
//! so everything that decides *what* is shown can be tested without a
//! terminal.

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Table rows inside the visible window.
    pub rows: Vec<CountryRow>,

    /// Index of the selected row within `rows`.
    pub selected_index: usize,

    pub header: HeaderInfo,

    pub footer: FooterInfo,

    /// Replaces the table before the record set is available.
    pub empty_state: Option<EmptyState>,

    /// Search box and population select; present once loaded.
    pub filter_bar: Option<FilterBarInfo>,
}

/// One row of the countries table. Missing attributes are already rendered
/// as `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    /// 1-based position in the visible subset.
    pub position: usize,
    pub name: String,
    pub code: String,
    pub capital: String,
    pub phone: String,
    pub population: String,
    pub flag: String,
    pub emblem: String,
    pub is_selected: bool,

    /// Character ranges of `name` matching the applied search term.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

/// Centered message shown instead of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
    /// Rendered as an error notice rather than a prompt.
    pub is_error: bool,
}

/// State of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarInfo {
    /// Current search box contents.
    pub query: String,

    /// Whether keystrokes are going to the search box.
    pub typing: bool,

    /// Selected population option, e.g. `< 5M`, or `any`.
    pub population: String,

    /// Which filter currently determines the rows, e.g. `by name`.
    pub showing: String,
}
