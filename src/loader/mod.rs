//! Data loader for the countries record set.
//!
//! The loader never talks to the network itself. It hands a [`FetchRequest`]
//! to the plugin runtime, which issues it through Zellij's `web_request`, and
//! later receives the matching [`FetchResponse`]. Keeping the host call out of
//! the library lets the whole state machine run in unit tests.
//!
//! # Modules
//!
//! - [`request`]: Request/response envelopes with trace context propagation
//! - [`state`]: The `Idle → Loading → Loaded | Failed` state machine

pub mod request;
pub mod state;

pub use request::{FetchRequest, FetchResponse, TraceContext};
pub use state::{DataLoader, LoadState};

/// Public endpoint serving the countries list.
pub const DEFAULT_ENDPOINT: &str = "https://api.sampleapis.com/countries/countries";
