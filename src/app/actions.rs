//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never calls into Zellij. It returns a `Vec<Action>` and
//! the runtime in `main.rs` turns each action into a host call, in order.
//!
//! # Example
//!
//! ```
//! use country_browser::Action;
//! use std::time::Duration;
//!
//! let actions = vec![Action::ArmTimer(Duration::from_millis(300))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::loader::FetchRequest;
use std::time::Duration;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Issues the countries GET through `web_request`.
    ///
    /// The request's context map must be passed through unchanged; the
    /// response is matched back to the request by it.
    Fetch(FetchRequest),

    /// Asks the host for a `Timer` event after the given delay.
    ///
    /// Host timers cannot be cancelled. Every wake-up is delivered as
    /// `Event::Tick` and the debouncer and loader decide whether it matters.
    ArmTimer(Duration),
}
