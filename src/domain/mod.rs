//! Domain layer for the country browser.
//!
//! This module contains the core data types, independent of Zellij-specific APIs
//! or rendering concerns.
//!
//! # Organization
//!
//! - [`country`]: Country record model and payload decoding
//! - [`error`]: Error types and result aliases

pub mod country;
pub mod error;

pub use country::{decode_countries, Country, DecodedCountries, Media, MISSING};
pub use error::{BrowserError, Result};
