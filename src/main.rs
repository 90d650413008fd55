//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the `country_browser` library and Zellij:
//! it translates host events into library [`Event`]s and library
//! [`Action`]s into host calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Key, `WebRequestResult`, `Timer`, `PermissionRequestResult`, `BeforeClose`
//! 3. **Permission**: `WebAccess` is required before the countries request can be issued
//! 4. **Update**: Handle events, delegate to the library, execute actions
//! 5. **Render**: Print the frame computed by the library
//!
//! # Event Mapping
//!
//! - `Key(..)` → navigation, search box and population events
//! - `WebRequestResult` → `Event::CountriesFetched`
//! - `Timer` → `Event::Tick`
//! - `BeforeClose` → `Event::Teardown`
//! - Denied `WebAccess` → `Event::WebAccessDenied`
//! - Pipe message `population` → `Event::PopulationValue` with the payload
//!
//! # Keybindings
//!
//! Global:
//! - `Ctrl+n` / `Down`: Move down
//! - `Ctrl+p` / `Up`: Move up
//!
//! Before loading:
//! - `Enter`: Show all Countries
//! - `q`: Close plugin
//!
//! Navigating the table:
//! - `j` / `k`: Move down / up
//! - `/`: Type in the search box
//! - `p`: Cycle the population select
//! - `1`, `2`, `3`: `< 1M`, `< 5M`, `< 10M`
//! - `0`: Any population
//! - `c`: Clear both filters
//! - `q`: Close plugin
//!
//! Typing in the search box:
//! - Characters: Edit the term (the search runs once typing pauses)
//! - `Backspace`: Delete a character
//! - `Esc` / `Enter`: Back to the table, keeping the term
//!
//! The population select also accepts a raw value over a pipe:
//! `zellij pipe --name population -- 5000000`.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::time::Instant;
use zellij_tile::prelude::*;

use country_browser::filter::PopulationBucket;
use country_browser::loader::FetchResponse;
use country_browser::{handle_event, Action, Config, Event, InputMode, Phase};

register_plugin!(State);

/// Pipe name that carries a raw population select value.
const POPULATION_PIPE: &str = "population";

/// Plugin state wrapper.
struct State {
    /// Core application state from library layer.
    app: country_browser::AppState,

    /// Whether the user granted `WebAccess`.
    web_access: bool,

    /// Load as soon as `WebAccess` is granted.
    auto_load: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: country_browser::initialize(&Config::default()),
            web_access: false,
            auto_load: false,
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        country_browser::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            endpoint = %config.endpoint,
            composable_filters = config.composable_filters,
            debounce_ms = config.debounce.as_millis(),
            "parsed configuration"
        );
        self.app = country_browser::initialize(&config);
        self.auto_load = config.auto_load;

        request_permission(&[PermissionType::WebAccess]);

        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::Timer,
            EventType::PermissionRequestResult,
            EventType::BeforeClose,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Translates the Zellij event, runs the reducer and executes the
    /// resulting actions. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Event::CountriesFetched(FetchResponse {
                    status,
                    body,
                    context,
                })
            }
            zellij_tile::prelude::Event::Timer(_elapsed) => Event::Tick {
                now: Instant::now(),
            },
            zellij_tile::prelude::Event::BeforeClose => Event::Teardown,
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                return self.handle_permission_result(status);
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn pipe(&mut self, pipe_message: PipeMessage) -> bool {
        let span = tracing::debug_span!("plugin_pipe", name = %pipe_message.name);
        let _guard = span.entered();

        if pipe_message.name != POPULATION_PIPE {
            tracing::trace!("ignoring unknown pipe message");
            return false;
        }
        let value = pipe_message.payload.unwrap_or_default();
        self.dispatch(&Event::PopulationValue(value))
    }

    fn render(&mut self, rows: usize, cols: usize) {
        country_browser::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::BeforeClose => "BeforeClose".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::trace!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        let now = Instant::now();
        match self.app.input_mode {
            InputMode::Typing => Some(match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Esc | BareKey::Enter => Event::LeaveSearch,
                BareKey::Backspace => Event::Backspace { now },
                BareKey::Char(c) => Event::Char { c, now },
                _ => return None,
            }),
            InputMode::Normal => Some(match key.bare_key {
                BareKey::Enter if self.app.phase() == Phase::NotLoaded => {
                    if !self.web_access {
                        tracing::warn!("web access not granted yet, ignoring load trigger");
                        return None;
                    }
                    Event::ShowCountries { now }
                }
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Char('/') => Event::FocusSearch,
                BareKey::Char('p') => Event::CyclePopulation,
                BareKey::Char('0') => Event::SelectPopulation(None),
                BareKey::Char(c @ '1'..='3') => {
                    let position = c.to_digit(10).map(|d| d as usize)?;
                    Event::SelectPopulation(PopulationBucket::from_position(position))
                }
                BareKey::Char('c') => Event::ClearFilters,
                BareKey::Char('q') => Event::CloseFocus,
                _ => return None,
            }),
        }
    }

    fn handle_permission_result(&mut self, status: PermissionStatus) -> bool {
        match status {
            PermissionStatus::Granted => {
                tracing::debug!("web access granted");
                self.web_access = true;
                if self.auto_load {
                    return self.dispatch(&Event::ShowCountries { now: Instant::now() });
                }
                true
            }
            PermissionStatus::Denied => {
                tracing::warn!("web access denied - countries cannot be loaded");
                self.dispatch(&Event::WebAccessDenied)
            }
        }
    }

    /// Translates library actions to Zellij API calls.
    #[tracing::instrument(level = "debug", skip_all)]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Fetch(request) => {
                tracing::debug!(request_id = request.request_id, url = %request.url, "issuing web request");
                web_request(
                    &request.url,
                    HttpVerb::Get,
                    request.headers.clone(),
                    vec![],
                    request.context.clone(),
                );
            }
            Action::ArmTimer(delay) => {
                tracing::trace!(delay_ms = delay.as_millis(), "arming timer");
                set_timeout(delay.as_secs_f64());
            }
        }
    }
}
