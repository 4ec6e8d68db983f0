//! Open/close/expand state for overlays.
//!
//! Shared by the chat widget shell and the health details popover. The host
//! decides what counts as an interaction outside the panel and reports it via
//! [`DisclosureState::on_outside_interaction`]; nothing here knows about the UI
//! tree.

use serde::{Deserialize, Serialize};

/// Whether a panel is shown, and whether it is in its expanded variant.
///
/// Invariant: `is_expanded` implies `is_open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureState {
    is_open: bool,
    is_expanded: bool,
}

impl DisclosureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// Flips `is_open`. Closing also collapses the panel.
    pub fn toggle_open(&mut self) {
        if self.is_open {
            self.dismiss();
        } else {
            self.is_open = true;
        }
    }

    /// Flips `is_expanded`. Ignored while the panel is closed.
    pub fn toggle_expand(&mut self) {
        if self.is_open {
            self.is_expanded = !self.is_expanded;
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes and collapses the panel.
    pub fn dismiss(&mut self) {
        self.is_open = false;
        self.is_expanded = false;
    }

    /// Reports an interaction outside the panel's bounds.
    ///
    /// Returns `true` if the panel was open and is now dismissed.
    pub fn on_outside_interaction(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.dismiss();
        true
    }
}
