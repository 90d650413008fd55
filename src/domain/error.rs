//! Error types for the country browser.
//!
//! This module defines the centralized error type [`BrowserError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! Only one error kind reaches the user-facing state machine: a failed load.
//! [`BrowserError::AccessDenied`], [`BrowserError::Http`], [`BrowserError::Decode`]
//! and [`BrowserError::Timeout`] all collapse into `LoadState::Failed` at the
//! loader boundary. The remaining variant covers loading a custom theme.

use std::time::Duration;
use thiserror::Error;

/// The main error type for country browser operations.
///
/// # Examples
///
/// ```
/// use country_browser::BrowserError;
///
/// let err = BrowserError::Http { status: 503 };
/// assert_eq!(err.to_string(), "Unexpected HTTP status 503");
/// ```
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The host refused the `WebAccess` permission, so no request can be made.
    #[error("Web access denied")]
    AccessDenied,

    /// The countries endpoint answered with something other than `200 OK`.
    ///
    /// Zellij reports transport failures (DNS, TLS, refused connections) as a
    /// non-200 result as well, so this variant also covers those.
    #[error("Unexpected HTTP status {status}")]
    Http {
        /// Status code returned by the host.
        status: u16,
    },

    /// The response body was not a JSON array of country records.
    #[error("Failed to decode countries payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was still in flight when its deadline passed.
    #[error("Request timed out after {}s", after.as_secs())]
    Timeout {
        /// Configured timeout that elapsed.
        after: Duration,
    },

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

/// A specialized `Result` type for country browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;
