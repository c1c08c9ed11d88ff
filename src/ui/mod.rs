// src/ui/mod.rs
pub mod action_bar;
pub mod charts;
pub mod dashboard;

use crate::state::{DashboardState, Locale};

/// What the user asked for during a frame. The app applies these after
/// drawing so no widget mutates state mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    PickFile,
    Analyze,
    SetLocale(Locale),
    Export,
}

/// Drops every action while the notice is waiting to be acknowledged.
pub fn admit_actions(state: &DashboardState, actions: Vec<UiAction>) -> Vec<UiAction> {
    if state.input_blocked() {
        Vec::new()
    } else {
        actions
    }
}
