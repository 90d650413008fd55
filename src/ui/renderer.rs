//! Top-level rendering coordinator.
//!
//! Computes the view model, picks a layout, and writes the frame.
//!
//! # Example
//!
//! ```
//! use country_browser::{ui::render_frame, AppState};
//!
//! let state = AppState::default();
//! let frame = render_frame(&state, 24, 100);
//! assert!(frame.contains("Show all Countries"));
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders the plugin UI to stdout.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    print!("{}", render_frame(state, rows, cols));
}

/// Renders the plugin UI into a string of ANSI output.
#[must_use]
pub fn render_frame(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    let mut out = String::new();
    render_viewmodel(&mut out, &viewmodel, &state.theme, rows, cols);
    out
}

fn render_viewmodel(out: &mut String, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    if let Some(empty) = &vm.empty_state {
        components::render_prompt_mode(out, vm, empty, theme, cols, rows);
    } else if let Some(bar) = &vm.filter_bar {
        components::render_table_mode(out, vm, bar, theme, cols, rows);
    }
}
