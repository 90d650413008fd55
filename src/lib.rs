//! Country browser: a Zellij plugin that loads a list of countries and lets
//! you search it by name and filter it by population.
//!
//! - One-shot load of the countries endpoint through Zellij's `web_request`
//! - Case-insensitive name search, debounced while typing
//! - Population select with `< 1M`, `< 5M` and `< 10M` thresholds
//! - Override (last control wins) or composable filter policy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Host calls
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Reducer
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Filter        │   │ Loader        │   │ Debounce      │
//! │ (filter/)     │   │ (loader/)     │   │ (debounce)    │
//! │ - Predicates  │   │ - Requests    │   │ - Quiet timer │
//! │ - Buckets     │   │ - Load states │   │               │
//! │ - Policy      │   │ - Timeouts    │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), UI (ui/), Infrastructure         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The library never calls into Zellij. Host interactions are expressed as
//! [`Action`]s and executed by the plugin binary, so everything here runs in
//! ordinary unit tests.
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/country-browser.wasm" {
//!         composable_filters "false"
//!         debounce_ms "300"
//!         request_timeout_secs "30"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use country_browser::{handle_event, initialize, Action, Config, Event};
//! use std::time::Instant;
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::ShowCountries { now: Instant::now() })?;
//! assert!(matches!(actions[0], Action::Fetch(_)));
//! # Ok::<(), country_browser::BrowserError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod debounce;
pub mod domain;
pub mod filter;
pub mod infrastructure;
pub mod loader;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Phase};
pub use domain::{BrowserError, Country, Result};
pub use ui::Theme;

use debounce::Debouncer;
use filter::FilterPolicy;
use loader::{DataLoader, DEFAULT_ENDPOINT};
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_DEBOUNCE_MS: u64 = 60_000;
const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL serving the countries JSON array.
    pub endpoint: String,

    /// Apply the search term and population threshold together instead of
    /// letting the last-changed control win. Default: `false`.
    pub composable_filters: bool,

    /// Quiet period before a search runs. Default: 300 ms.
    pub debounce: Duration,

    /// How long to wait for the countries response. `None` waits forever.
    /// Default: 30 s.
    pub request_timeout: Option<Duration>,

    /// Start loading as soon as web access is granted instead of waiting for
    /// the "Show all Countries" trigger.
    pub auto_load: bool,

    /// Built-in theme name: `catppuccin-mocha` or `catppuccin-latte`.
    /// Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` maps to the sandbox's `/host`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for exported spans. Default: `"info"`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            composable_filters: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            auto_load: false,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable values fall back to their defaults with a warning; loading
    /// never fails because of configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use country_browser::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("composable_filters".to_string(), "yes".to_string());
    /// map.insert("request_timeout_secs".to_string(), "0".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert!(config.composable_filters);
    /// assert_eq!(config.request_timeout, None);
    /// assert_eq!(config.debounce, Duration::from_millis(300));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let endpoint = config
            .get("endpoint")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.endpoint, String::from);

        let debounce = parse_number(config, "debounce_ms", MAX_DEBOUNCE_MS)
            .map_or(defaults.debounce, Duration::from_millis);

        let request_timeout = match parse_number(config, "request_timeout_secs", MAX_TIMEOUT_SECS) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        Self {
            endpoint,
            composable_filters: parse_flag(config, "composable_filters")
                .unwrap_or(defaults.composable_filters),
            debounce,
            request_timeout,
            auto_load: parse_flag(config, "auto_load").unwrap_or(defaults.auto_load),
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

fn parse_flag(config: &BTreeMap<String, String>, key: &str) -> Option<bool> {
    let raw = config.get(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring unrecognized boolean");
            None
        }
    }
}

fn parse_number(config: &BTreeMap<String, String>, key: &str, max: u64) -> Option<u64> {
    let raw = config.get(key)?;
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| tracing::warn!(key, value = %raw, error = %e, "ignoring invalid number"))
        .ok()?;

    if value > max {
        tracing::warn!(key, value, max, "ignoring out-of-range number");
        return None;
    }
    Some(value)
}

/// Builds the initial `AppState` from configuration.
///
/// The theme comes from `theme_file` if set, else `theme`, else the default;
/// a theme that fails to load falls back to the default with a warning.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(endpoint = %config.endpoint, "initializing country browser");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            let path = infrastructure::expand_tilde(theme_file);
            Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %path, error = %e, "failed to load theme, using default");
                Theme::default()
            })
        },
    );

    AppState::new(
        DataLoader::new(config.endpoint.clone(), config.request_timeout),
        Debouncer::new(config.debounce),
        FilterPolicy::from_flag(config.composable_filters),
        theme,
    )
}
