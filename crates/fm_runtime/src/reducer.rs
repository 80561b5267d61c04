//! Reducer actions, side-effect intents, and transition logic for both pages.
//!
//! Reducers never perform I/O. Each returns the effects the UI layer must run: request intents
//! for the executor, timers, focus moves, and confirmations.

pub mod admin;
pub mod directory;

pub use admin::{reduce_admin, AdminAction, AdminEffect, AdminError, AdminRequest};
pub use directory::{reduce_directory_view, ViewAction, ViewEffect, ViewError, ViewRequest};

use crate::{
    alerts::{AlertCategory, AlertId, AlertSlot},
    model::RuntimeSettings,
};

/// Shows an alert and returns the expiry timer to schedule, if its category auto-dismisses.
pub(crate) fn show_alert(
    slot: &mut AlertSlot,
    settings: &RuntimeSettings,
    category: AlertCategory,
    message: impl Into<String>,
) -> Option<(u32, AlertId)> {
    let id = slot.show(category, message);
    category
        .auto_dismisses()
        .then_some((settings.alert_dismiss_ms, id))
}

/// Server message, or `fallback` when the server sent none.
pub(crate) fn message_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
