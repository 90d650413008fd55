//! Input mode and page phase types.
//!
//! # State Machine
//!
//! The page moves through [`Phase`] exactly once:
//!
//! ```text
//! NotLoaded ──Enter──▶ Loading ──▶ Loaded
//!                          └─────▶ Failed
//! ```
//!
//! Inside `Loaded`, [`InputMode`] decides whether keys edit the search box or
//! drive navigation and the population select.

use crate::loader::LoadState;

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and filter commands.
    ///
    /// Available keybindings: j/k (navigate), / (search), p or 1-3 (population),
    /// 0 (no population filter), c (clear filters), q (quit).
    #[default]
    Normal,

    /// Characters edit the search box. Esc returns to `Normal` and keeps the
    /// typed term.
    Typing,
}

/// Coarse page state derived from the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the "Show all Countries" trigger.
    NotLoaded,
    Loading,
    /// Terminal; filters cycle freely from here.
    Loaded,
    /// Terminal; the record set stays empty.
    Failed,
}

impl From<&LoadState> for Phase {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::Idle => Self::NotLoaded,
            LoadState::Loading { .. } => Self::Loading,
            LoadState::Loaded { .. } => Self::Loaded,
            LoadState::Failed { .. } => Self::Failed,
        }
    }
}
