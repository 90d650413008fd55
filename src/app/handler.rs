//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place state changes. Every event is matched,
//! applied to [`AppState`], and answered with a render flag and a list of
//! [`Action`]s for the plugin runtime to execute.
//!
//! # Event Types
//!
//! - **Loading**: `ShowCountries`, `CountriesFetched`, `WebAccessDenied`
//! - **Timers**: `Tick` (debounced search and request timeout)
//! - **Navigation**: `KeyDown`, `KeyUp`
//! - **Search box**: `FocusSearch`, `LeaveSearch`, `Char`, `Backspace`
//! - **Population select**: `CyclePopulation`, `SelectPopulation`, `PopulationValue`
//! - **Lifecycle**: `ClearFilters`, `CloseFocus`, `Teardown`
//!
//! Events that carry `now` take it from the runtime so tests can drive the
//! clock.
//!
//! # Example
//!
//! ```
//! use country_browser::{handle_event, AppState, Event};
//! use std::time::Instant;
//!
//! let mut state = AppState::default();
//! let (_, actions) = handle_event(&mut state, &Event::ShowCountries { now: Instant::now() })?;
//! assert!(!actions.is_empty());
//! # Ok::<(), country_browser::BrowserError>(())
//! ```

use super::modes::{InputMode, Phase};
use crate::app::{Action, AppState};
use crate::debounce::Poll;
use crate::domain::error::{BrowserError, Result};
use crate::filter::PopulationBucket;
use crate::loader::FetchResponse;
use std::time::Instant;

/// Events triggered by user input, host timers, or request completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The "Show all Countries" trigger. Starts the one load of the session.
    ShowCountries { now: Instant },

    /// The host finished the countries request.
    CountriesFetched(FetchResponse),

    /// The host refused the `WebAccess` permission.
    WebAccessDenied,

    /// A host timer fired. Wake-ups carry no identity; the debouncer and the
    /// loader decide whether anything is due.
    Tick { now: Instant },

    /// Moves selection cursor down by one position (wraps to top).
    KeyDown,
    /// Moves selection cursor up by one position (wraps to bottom).
    KeyUp,

    /// Sends keystrokes to the search box.
    FocusSearch,
    /// Returns to navigation, keeping the typed term.
    LeaveSearch,
    /// Appends a character to the search box.
    Char { c: char, now: Instant },
    /// Removes the last character from the search box.
    Backspace { now: Instant },

    /// Steps the population select: any → < 1M → < 5M → < 10M → any.
    CyclePopulation,
    /// Sets the population select; `None` is the "any" option.
    SelectPopulation(Option<PopulationBucket>),
    /// Sets the population select from a raw option value such as
    /// `"5000000"`. Values that parse to no threshold select "any".
    PopulationValue(String),

    /// Empties both controls and shows every record.
    ClearFilters,

    /// Hides the plugin pane.
    CloseFocus,

    /// The plugin is being unloaded.
    Teardown,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns `(should_render, actions)`. Actions run in order.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for events whose handling
/// can fail without aborting the plugin.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match event {
        Event::ShowCountries { now } => {
            let Some(request) = state.loader.begin(*now) else {
                return Ok((false, vec![]));
            };

            let mut actions = vec![Action::Fetch(request)];
            if let Some(timeout) = state.loader.timeout() {
                actions.push(Action::ArmTimer(timeout));
            }
            Ok((true, actions))
        }
        Event::CountriesFetched(response) => match state.loader.complete(response) {
            None => Ok((false, vec![])),
            Some(Ok(countries)) => {
                state.apply_loaded(countries);
                Ok((true, vec![]))
            }
            Some(Err(_)) => Ok((true, vec![])),
        },
        Event::WebAccessDenied => {
            if state.phase() != Phase::NotLoaded {
                return Ok((false, vec![]));
            }
            state.loader.refuse(&BrowserError::AccessDenied);
            Ok((true, vec![]))
        }
        Event::Tick { now } => {
            let mut render = false;
            let mut actions = vec![];

            match state.debouncer.poll(*now) {
                Poll::Fire(term) => {
                    state.apply_search(&term);
                    render = true;
                }
                Poll::Waiting(left) => actions.push(Action::ArmTimer(left)),
                Poll::Idle => {}
            }

            if state.loader.check_timeout(*now) {
                render = true;
            } else if let Some(left) = state.loader.remaining(*now) {
                actions.push(Action::ArmTimer(left));
            }

            Ok((render, actions))
        }
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::FocusSearch => {
            if state.phase() != Phase::Loaded {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Typing;
            Ok((true, vec![]))
        }
        Event::LeaveSearch => {
            if state.input_mode == InputMode::Normal {
                return Ok((false, vec![]));
            }
            tracing::debug!(query = %state.filters.search_input, "leaving search box");
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::Char { c, now } => {
            if state.input_mode != InputMode::Typing {
                return Ok((false, vec![]));
            }

            state.filters.search_input.push(*c);
            tracing::trace!(query = %state.filters.search_input, char = %c, "search input updated");

            Ok((true, schedule_search(state, *now)))
        }
        Event::Backspace { now } => {
            if state.input_mode != InputMode::Typing
                || state.filters.search_input.pop().is_none()
            {
                return Ok((false, vec![]));
            }

            Ok((true, schedule_search(state, *now)))
        }
        Event::CyclePopulation => {
            if state.phase() != Phase::Loaded {
                return Ok((false, vec![]));
            }
            state.set_population(PopulationBucket::next(state.filters.population));
            Ok((true, vec![]))
        }
        Event::SelectPopulation(bucket) => {
            if state.phase() != Phase::Loaded {
                return Ok((false, vec![]));
            }
            state.set_population(*bucket);
            Ok((true, vec![]))
        }
        Event::PopulationValue(raw) => {
            if state.phase() != Phase::Loaded {
                return Ok((false, vec![]));
            }
            Ok((state.set_population_value(raw), vec![]))
        }
        Event::ClearFilters => {
            if state.phase() != Phase::Loaded {
                return Ok((false, vec![]));
            }
            state.clear_filters();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Teardown => {
            tracing::debug!("tearing down");
            state.debouncer.dispose();
            state.loader.abandon();
            Ok((false, vec![]))
        }
    }
}

fn schedule_search(state: &mut AppState, now: Instant) -> Vec<Action> {
    state
        .debouncer
        .keystroke(&state.filters.search_input, now)
        .map(Action::ArmTimer)
        .into_iter()
        .collect()
}

/// Short event label for span fields; response bodies are not logged.
const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::ShowCountries { .. } => "show_countries",
        Event::CountriesFetched(_) => "countries_fetched",
        Event::WebAccessDenied => "web_access_denied",
        Event::Tick { .. } => "tick",
        Event::KeyDown => "key_down",
        Event::KeyUp => "key_up",
        Event::FocusSearch => "focus_search",
        Event::LeaveSearch => "leave_search",
        Event::Char { .. } => "char",
        Event::Backspace { .. } => "backspace",
        Event::CyclePopulation => "cycle_population",
        Event::SelectPopulation(_) => "select_population",
        Event::PopulationValue(_) => "population_value",
        Event::ClearFilters => "clear_filters",
        Event::CloseFocus => "close_focus",
        Event::Teardown => "teardown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::Debouncer;
    use crate::domain::Country;
    use crate::filter::FilterPolicy;
    use crate::loader::{DataLoader, LoadState};
    use crate::ui::theme::Theme;
    use std::time::Duration;

    const PAYLOAD: &str = r#"[
        {"name": "Albania", "abbreviation": "AL", "capital": "Tirana", "phone": "355",
         "population": 2837743, "media": {"flag": "https://f/al.png", "emblem": "https://e/al.png"}},
        {"name": "Algeria", "abbreviation": "DZ", "capital": "Algiers", "phone": "213",
         "population": 44700000},
        {"name": "Andorra", "abbreviation": "AD", "population": 77265},
        {"name": "Brazil", "abbreviation": "BR", "population": 214300000},
        {"name": "Tuvalu", "abbreviation": "TV"}
    ]"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn new_state(policy: FilterPolicy) -> AppState {
        AppState::new(
            DataLoader::new("https://example.org/countries", Some(Duration::from_secs(30))),
            Debouncer::default(),
            policy,
            Theme::default(),
        )
    }

    fn fetch_request(actions: &[Action]) -> crate::loader::FetchRequest {
        actions
            .iter()
            .find_map(|a| match a {
                Action::Fetch(request) => Some(request.clone()),
                _ => None,
            })
            .expect("fetch action")
    }

    fn loaded(policy: FilterPolicy, t0: Instant) -> AppState {
        loaded_with(policy, t0, PAYLOAD)
    }

    fn loaded_with(policy: FilterPolicy, t0: Instant, payload: &str) -> AppState {
        let mut state = new_state(policy);
        let (_, actions) = handle_event(&mut state, &Event::ShowCountries { now: t0 }).unwrap();
        let request = fetch_request(&actions);
        let response = FetchResponse {
            status: 200,
            body: payload.as_bytes().to_vec(),
            context: request.context,
        };
        handle_event(&mut state, &Event::CountriesFetched(response)).unwrap();
        state
    }

    fn names(state: &AppState) -> Vec<&str> {
        state.visible_countries().map(Country::display_name).collect()
    }

    fn type_term(state: &mut AppState, term: &str, start: Instant) -> Instant {
        handle_event(state, &Event::FocusSearch).unwrap();
        let mut now = start;
        for c in term.chars() {
            handle_event(state, &Event::Char { c, now }).unwrap();
            now += ms(50);
        }
        now
    }

    #[test]
    fn show_countries_then_debounced_search() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(names(&state).len(), 5);

        let last = type_term(&mut state, "Al", t0);
        // Nothing is filtered until the quiet period elapses.
        assert_eq!(names(&state).len(), 5);

        handle_event(&mut state, &Event::Tick { now: last + ms(300) }).unwrap();
        assert_eq!(names(&state), vec!["Albania", "Algeria", "Tuvalu"]);

        type_term(&mut state, "b", last + ms(400));
        handle_event(&mut state, &Event::Tick { now: last + ms(800) }).unwrap();
        assert_eq!(names(&state), vec!["Albania"]);
    }

    #[test]
    fn burst_of_keystrokes_evaluates_once() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        let last = type_term(&mut state, "Alb", t0);

        let mut evaluations = 0;
        // One wake-up for every armed timer.
        for offset in [300, 350, 400] {
            let now = t0 + ms(offset);
            let before = state.filters.applied_term.clone();
            let (render, _) = handle_event(&mut state, &Event::Tick { now }).unwrap();
            if render && state.filters.applied_term != before {
                evaluations += 1;
            }
        }
        assert!(last <= t0 + ms(400));
        assert_eq!(evaluations, 1);
        assert_eq!(state.filters.applied_term, "Alb");
    }

    #[test]
    fn early_tick_re_arms_for_remaining_time() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        type_term(&mut state, "A", t0);

        let (render, actions) = handle_event(&mut state, &Event::Tick { now: t0 + ms(100) }).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::ArmTimer(ms(200))]);
    }

    #[test]
    fn override_policy_last_trigger_wins() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        let last = type_term(&mut state, "al", t0);
        handle_event(&mut state, &Event::Tick { now: last + ms(300) }).unwrap();

        handle_event(&mut state, &Event::SelectPopulation(Some(PopulationBucket::Under5M))).unwrap();
        assert_eq!(names(&state), vec!["Albania", "Andorra"]);
    }

    #[test]
    fn population_change_after_search_shows_only_small_matches() {
        let t0 = Instant::now();
        let mut state = loaded_with(
            FilterPolicy::Override,
            t0,
            r#"[{"name": "Albania", "population": 2800000},
                {"name": "Algeria", "population": 44000000}]"#,
        );

        let last = type_term(&mut state, "al", t0);
        handle_event(&mut state, &Event::Tick { now: last + ms(300) }).unwrap();
        assert_eq!(names(&state), vec!["Albania", "Algeria"]);

        handle_event(&mut state, &Event::SelectPopulation(Some(PopulationBucket::Under5M))).unwrap();
        assert_eq!(names(&state), vec!["Albania"]);
    }

    #[test]
    fn composable_policy_intersects_filters() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Composable, t0);
        let last = type_term(&mut state, "al", t0);
        handle_event(&mut state, &Event::Tick { now: last + ms(300) }).unwrap();

        handle_event(&mut state, &Event::SelectPopulation(Some(PopulationBucket::Under5M))).unwrap();
        assert_eq!(names(&state), vec!["Albania"]);
    }

    #[test]
    fn cycle_population_wraps_to_any() {
        let mut state = loaded(FilterPolicy::Override, Instant::now());
        for _ in 0..3 {
            handle_event(&mut state, &Event::CyclePopulation).unwrap();
        }
        assert_eq!(state.filters.population, Some(PopulationBucket::Under10M));

        handle_event(&mut state, &Event::CyclePopulation).unwrap();
        assert_eq!(state.filters.population, None);
        assert_eq!(names(&state).len(), 5);
    }

    #[test]
    fn population_value_is_parsed_into_a_bucket() {
        let mut state = loaded(FilterPolicy::Override, Instant::now());

        let (render, _) =
            handle_event(&mut state, &Event::PopulationValue(" 1000000".to_string())).unwrap();
        assert!(render);
        assert_eq!(state.filters.population, Some(PopulationBucket::Under1M));
        assert_eq!(names(&state), vec!["Andorra"]);

        for unset in ["", "0", "any"] {
            handle_event(&mut state, &Event::PopulationValue(unset.to_string())).unwrap();
            assert_eq!(state.filters.population, None);
            assert_eq!(names(&state).len(), 5);
        }
    }

    #[test]
    fn population_value_outside_the_select_is_ignored() {
        let mut state = loaded(FilterPolicy::Override, Instant::now());
        handle_event(&mut state, &Event::SelectPopulation(Some(PopulationBucket::Under10M))).unwrap();

        for odd in ["42", "-5"] {
            let (render, _) =
                handle_event(&mut state, &Event::PopulationValue(odd.to_string())).unwrap();
            assert!(!render);
            assert_eq!(state.filters.population, Some(PopulationBucket::Under10M));
        }
    }

    #[test]
    fn denied_web_access_fails_the_load() {
        let mut state = new_state(FilterPolicy::Override);

        let (render, _) = handle_event(&mut state, &Event::WebAccessDenied).unwrap();
        assert!(render);
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(
            state.loader.state(),
            &LoadState::Failed { reason: "Web access denied".to_string() }
        );

        let (_, actions) =
            handle_event(&mut state, &Event::ShowCountries { now: Instant::now() }).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn denied_web_access_after_load_changes_nothing() {
        let mut state = loaded(FilterPolicy::Override, Instant::now());
        let (render, _) = handle_event(&mut state, &Event::WebAccessDenied).unwrap();
        assert!(!render);
        assert_eq!(state.phase(), Phase::Loaded);
    }

    #[test]
    fn clear_restores_everything_and_drops_pending_search() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        handle_event(&mut state, &Event::SelectPopulation(Some(PopulationBucket::Under1M))).unwrap();
        let last = type_term(&mut state, "zz", t0);
        handle_event(&mut state, &Event::LeaveSearch).unwrap();

        handle_event(&mut state, &Event::ClearFilters).unwrap();
        assert_eq!(names(&state).len(), 5);
        assert!(state.filters.search_input.is_empty());
        assert_eq!(state.filters.population, None);

        let (render, _) = handle_event(&mut state, &Event::Tick { now: last + ms(300) }).unwrap();
        assert!(!render);
        assert_eq!(names(&state).len(), 5);
    }

    #[test]
    fn leave_search_keeps_the_term() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        type_term(&mut state, "bra", t0);
        handle_event(&mut state, &Event::LeaveSearch).unwrap();

        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.filters.search_input, "bra");

        let (render, actions) = handle_event(&mut state, &Event::Char { c: 'x', now: t0 }).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn load_failure_leaves_records_empty() {
        let mut state = new_state(FilterPolicy::Override);
        let (_, actions) =
            handle_event(&mut state, &Event::ShowCountries { now: Instant::now() }).unwrap();
        let request = fetch_request(&actions);

        let response = FetchResponse {
            status: 503,
            body: vec![],
            context: request.context,
        };
        let (render, _) = handle_event(&mut state, &Event::CountriesFetched(response)).unwrap();

        assert!(render);
        assert!(state.countries.is_empty());
        assert!(!state.loader.state().is_loading());
        assert_eq!(state.phase(), Phase::Failed);

        let (_, actions) =
            handle_event(&mut state, &Event::ShowCountries { now: Instant::now() }).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut state = new_state(FilterPolicy::Override);
        handle_event(&mut state, &Event::ShowCountries { now: Instant::now() }).unwrap();

        let stale = FetchResponse::for_request(99, 200, PAYLOAD.as_bytes());
        let (render, _) = handle_event(&mut state, &Event::CountriesFetched(stale)).unwrap();
        assert!(!render);
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn request_times_out_on_tick() {
        let t0 = Instant::now();
        let mut state = new_state(FilterPolicy::Override);
        let (_, actions) = handle_event(&mut state, &Event::ShowCountries { now: t0 }).unwrap();
        assert!(actions.contains(&Action::ArmTimer(Duration::from_secs(30))));

        let (render, actions) =
            handle_event(&mut state, &Event::Tick { now: t0 + Duration::from_secs(10) }).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::ArmTimer(Duration::from_secs(20))]);

        let (render, _) =
            handle_event(&mut state, &Event::Tick { now: t0 + Duration::from_secs(30) }).unwrap();
        assert!(render);
        assert!(matches!(state.loader.state(), LoadState::Failed { .. }));
    }

    #[test]
    fn controls_are_inert_before_load() {
        let mut state = new_state(FilterPolicy::Override);
        for event in [
            Event::FocusSearch,
            Event::CyclePopulation,
            Event::PopulationValue("5000000".to_string()),
            Event::ClearFilters,
        ] {
            let (render, actions) = handle_event(&mut state, &event).unwrap();
            assert!(!render);
            assert!(actions.is_empty());
        }
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn teardown_disposes_debouncer_and_abandons_load() {
        let t0 = Instant::now();
        let mut state = loaded(FilterPolicy::Override, t0);
        type_term(&mut state, "al", t0);

        handle_event(&mut state, &Event::Teardown).unwrap();
        assert!(state.debouncer.is_disposed());

        let (render, _) = handle_event(&mut state, &Event::Tick { now: t0 + ms(1000) }).unwrap();
        assert!(!render);
        assert!(state.filters.applied_term.is_empty());

        let mut loading = new_state(FilterPolicy::Override);
        handle_event(&mut loading, &Event::ShowCountries { now: t0 }).unwrap();
        handle_event(&mut loading, &Event::Teardown).unwrap();
        assert!(!loading.loader.state().is_loading());
    }
}
