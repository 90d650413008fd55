//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (`main.rs`) and the filter, loader and
//! debounce modules.
//!
//! ```text
//! Zellij Event → Event → handle_event → AppState mutations → Actions → host calls
//!                             ↑                                  ↓
//!                             └──── WebRequestResult / Timer ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input mode and page phase types
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Phase};
pub use state::{AppState, FilterState};
