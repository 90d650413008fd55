//! Application state management and view model computation.
//!
//! [`AppState`] is the single state struct the reducer mutates: the record
//! set, the filter controls, the derived visible subset, the loader, the
//! search debouncer and the selection cursor. Nothing else in the plugin holds
//! mutable UI state.
//!
//! # Derived State
//!
//! `visible` holds positions into `countries` and is always recomputed from
//! the full record set by [`AppState::refilter`]. It is never narrowed in
//! place, so the result of an evaluation depends only on its inputs.
//!
//! # Example
//!
//! ```
//! use country_browser::app::AppState;
//! use country_browser::Country;
//!
//! let mut state = AppState::default();
//! state.apply_loaded(vec![
//!     Country::named("Albania", Some(2_800_000)),
//!     Country::named("Algeria", Some(44_000_000)),
//! ]);
//! state.apply_search("alb");
//! assert_eq!(state.visible_countries().count(), 1);
//! ```

use super::modes::{InputMode, Phase};
use crate::debounce::Debouncer;
use crate::domain::Country;
use crate::filter::{filter_indices, parse_threshold, FilterPolicy, FilterTrigger, PopulationBucket};
use crate::loader::{DataLoader, LoadState, DEFAULT_ENDPOINT};
use crate::ui::helpers::url_tail;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    CountryRow, EmptyState, FilterBarInfo, FooterInfo, HeaderInfo, UIViewModel,
};

/// Rows taken by everything but the table body once loaded: blank line,
/// header, border, filter bar (3), column headings, border, footer.
const LOADED_CHROME_ROWS: usize = 9;

/// Values of the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Search box contents, updated on every keystroke.
    pub search_input: String,

    /// Term used by the last debounced search evaluation.
    pub applied_term: String,

    /// Population select value.
    pub population: Option<PopulationBucket>,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Full record set; empty until a load succeeds, never mutated after.
    pub countries: Vec<Country>,

    /// Positions into `countries` currently shown, in record order.
    pub visible: Vec<usize>,

    /// Zero-based index of the selected row within `visible`.
    pub selected_index: usize,

    pub input_mode: InputMode,

    pub filters: FilterState,

    /// How the search term and population threshold combine.
    pub policy: FilterPolicy,

    /// Control that produced the current `visible`; `None` when unfiltered.
    pub last_trigger: Option<FilterTrigger>,

    pub loader: DataLoader,

    pub debouncer: Debouncer,

    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            DataLoader::new(DEFAULT_ENDPOINT, None),
            Debouncer::default(),
            FilterPolicy::default(),
            Theme::default(),
        )
    }
}

impl AppState {
    /// Creates an empty, not-yet-loaded state.
    #[must_use]
    pub fn new(loader: DataLoader, debouncer: Debouncer, policy: FilterPolicy, theme: Theme) -> Self {
        Self {
            countries: vec![],
            visible: vec![],
            selected_index: 0,
            input_mode: InputMode::Normal,
            filters: FilterState::default(),
            policy,
            last_trigger: None,
            loader,
            debouncer,
            theme,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        Phase::from(self.loader.state())
    }

    /// Countries currently shown, in display order.
    pub fn visible_countries(&self) -> impl Iterator<Item = &Country> + '_ {
        self.visible.iter().filter_map(|&i| self.countries.get(i))
    }

    #[must_use]
    pub fn selected_country(&self) -> Option<&Country> {
        self.visible
            .get(self.selected_index)
            .and_then(|&i| self.countries.get(i))
    }

    /// Moves selection cursor down by one position, wrapping to top if at end.
    pub fn move_selection_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.visible.len();
    }

    /// Moves selection cursor up by one position, wrapping to bottom if at start.
    pub fn move_selection_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.visible.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Installs a freshly loaded record set.
    ///
    /// Shows every record and resets both filter controls; any search still
    /// waiting in the debouncer is dropped.
    pub fn apply_loaded(&mut self, countries: Vec<Country>) {
        self.countries = countries;
        self.reset_filters();
    }

    /// Runs the debounced name search with `term`.
    pub fn apply_search(&mut self, term: &str) {
        self.filters.applied_term = term.to_string();
        self.refilter(FilterTrigger::Search);
    }

    /// Changes the population select and re-evaluates immediately.
    pub fn set_population(&mut self, bucket: Option<PopulationBucket>) {
        self.filters.population = bucket;
        self.refilter(FilterTrigger::Population);
    }

    /// Changes the population select from a raw option value.
    ///
    /// The value is parsed leniently; no threshold selects "any". A threshold
    /// that is not one of the fixed buckets leaves the select unchanged.
    /// Returns `true` when the select was applied.
    pub fn set_population_value(&mut self, raw: &str) -> bool {
        let bucket = match parse_threshold(raw) {
            None => None,
            Some(threshold) => match PopulationBucket::from_threshold(threshold) {
                Some(bucket) => Some(bucket),
                None => {
                    tracing::warn!(
                        value = %raw,
                        threshold,
                        "not a population select option, ignoring"
                    );
                    return false;
                }
            },
        };
        self.set_population(bucket);
        true
    }

    /// Restores the full record set and empties both controls.
    pub fn clear_filters(&mut self) {
        tracing::debug!(
            query = %self.filters.search_input,
            population = ?self.filters.population,
            "clearing filters"
        );
        self.reset_filters();
    }

    fn reset_filters(&mut self) {
        self.debouncer.cancel();
        self.filters = FilterState::default();
        self.last_trigger = None;
        self.visible = (0..self.countries.len()).collect();
        self.selected_index = 0;
    }

    /// Recomputes `visible` from the full record set.
    ///
    /// Under [`FilterPolicy::Override`] only the control named by `trigger`
    /// is applied; under [`FilterPolicy::Composable`] both are.
    pub fn refilter(&mut self, trigger: FilterTrigger) {
        let criteria = self.policy.criteria(
            trigger,
            &self.filters.applied_term,
            self.filters.population,
        );

        self.visible = filter_indices(&self.countries, &criteria);
        self.last_trigger = (!criteria.is_unfiltered()).then_some(trigger);

        if self.visible.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.visible.len() - 1);
        }

        tracing::debug!(
            trigger = ?trigger,
            policy = ?self.policy,
            visible = self.visible.len(),
            total = self.countries.len(),
            "visible countries recomputed"
        );
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// Before the record set is available the table is replaced by an empty
    /// state message. Once loaded, the table is windowed around the selected
    /// row so the selection stays visible.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, _cols: usize) -> UIViewModel {
        let empty_state = match self.loader.state() {
            LoadState::Idle => Some(EmptyState {
                message: "Show all Countries".to_string(),
                subtitle: "Press Enter to load the list".to_string(),
                is_error: false,
            }),
            LoadState::Loading { .. } => Some(EmptyState {
                message: "Loading...".to_string(),
                subtitle: self.loader.endpoint().to_string(),
                is_error: false,
            }),
            LoadState::Failed { reason } => Some(EmptyState {
                message: "Countries could not be loaded".to_string(),
                subtitle: reason.clone(),
                is_error: true,
            }),
            LoadState::Loaded { .. } => None,
        };

        if empty_state.is_some() {
            return UIViewModel {
                rows: vec![],
                selected_index: 0,
                header: self.compute_header(),
                footer: self.compute_footer(),
                empty_state,
                filter_bar: None,
            };
        }

        let available_rows = rows.saturating_sub(LOADED_CHROME_ROWS);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(self.visible.len());
        if visible_end - visible_start < available_rows && self.visible.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let display_rows: Vec<CountryRow> = (visible_start..visible_end)
            .filter_map(|position| {
                let country = self.countries.get(*self.visible.get(position)?)?;
                Some(self.compute_row(country, position))
            })
            .collect();

        UIViewModel {
            rows: display_rows,
            selected_index: self.selected_index.saturating_sub(visible_start),
            header: self.compute_header(),
            footer: self.compute_footer(),
            empty_state: None,
            filter_bar: Some(self.compute_filter_bar()),
        }
    }

    fn compute_row(&self, country: &Country, position: usize) -> CountryRow {
        let highlight_ranges = if self.last_trigger == Some(FilterTrigger::Search)
            || (self.policy.is_composable() && self.last_trigger.is_some())
        {
            match_ranges(country.name_or_empty(), &self.filters.applied_term)
        } else {
            vec![]
        };

        CountryRow {
            position: position + 1,
            name: country.display_name().to_string(),
            code: country.display_code().to_string(),
            capital: country.display_capital().to_string(),
            phone: country.display_phone().to_string(),
            population: country.display_population(),
            flag: url_tail(country.flag_url()),
            emblem: url_tail(country.emblem_url()),
            is_selected: position == self.selected_index,
            highlight_ranges,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match self.loader.state() {
            LoadState::Loaded { fetched_at, .. } => format!(
                " Countries ({} of {}) · fetched {} ",
                self.visible.len(),
                self.countries.len(),
                fetched_at.format("%H:%M:%S")
            ),
            _ => " Countries ".to_string(),
        };
        HeaderInfo { title }
    }

    fn compute_filter_bar(&self) -> FilterBarInfo {
        let population = self
            .filters
            .population
            .map_or_else(|| "any".to_string(), |b| b.label().to_string());

        let showing = match (self.last_trigger, self.policy) {
            (None, _) => "all",
            (Some(_), FilterPolicy::Composable) => "name + population",
            (Some(FilterTrigger::Search), FilterPolicy::Override) => "by name",
            (Some(FilterTrigger::Population), FilterPolicy::Override) => "by population",
        };

        FilterBarInfo {
            query: self.filters.search_input.clone(),
            typing: self.input_mode == InputMode::Typing,
            population,
            showing: showing.to_string(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.phase(), self.input_mode) {
            (Phase::NotLoaded, _) => "Enter: show all countries  q: quit",
            (Phase::Loading | Phase::Failed, _) => "q: quit",
            (Phase::Loaded, InputMode::Typing) => {
                "ESC: stop typing  Backspace: delete  Ctrl+n/p: navigate  Type to search"
            }
            (Phase::Loaded, InputMode::Normal) => {
                "j/k: navigate  /: search  p or 1-3: population  0: any  c: clear  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

/// Character ranges in `text` where `term` occurs, ignoring case.
///
/// Returns no ranges when lowercasing changes the character count (a few
/// non-ASCII letters expand), since indices would no longer line up.
fn match_ranges(text: &str, term: &str) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return vec![];
    }

    let haystack: Vec<char> = text.to_lowercase().chars().collect();
    let needle: Vec<char> = term.to_lowercase().chars().collect();
    if haystack.len() != text.chars().count() || needle.len() > haystack.len() {
        return vec![];
    }

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == needle[..] {
            ranges.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}
