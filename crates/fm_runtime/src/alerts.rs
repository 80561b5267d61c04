//! Single-slot alert banner shared by both pages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Visual category of an alert.
pub enum AlertCategory {
    /// Completed action; auto-dismissed.
    Success,
    /// Server-rejected or failed request.
    Danger,
    /// Client-side validation or degraded follow-up.
    Warning,
    /// Neutral information.
    Info,
}

impl AlertCategory {
    /// Token used for `data-ui-variant` and CSS hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Returns `true` for categories removed by a timer.
    pub const fn auto_dismisses(self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identity of one shown alert; expiry timers carry it.
pub struct AlertId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
/// The alert currently on screen.
pub struct Alert {
    /// Identity used by expiry timers.
    pub id: AlertId,
    /// Category.
    pub category: AlertCategory,
    /// Display text.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// At most one visible alert; showing a new one replaces the old.
pub struct AlertSlot {
    current: Option<Alert>,
    next_id: u64,
}

impl AlertSlot {
    /// The visible alert, if any.
    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Replaces the visible alert and returns the new alert's id.
    pub fn show(&mut self, category: AlertCategory, message: impl Into<String>) -> AlertId {
        self.next_id += 1;
        let id = AlertId(self.next_id);
        self.current = Some(Alert {
            id,
            category,
            message: message.into(),
        });
        id
    }

    /// Removes the visible alert.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Removes the visible alert only if it is still `id`.
    ///
    /// Returns `true` when something was removed.
    pub fn expire(&mut self, id: AlertId) -> bool {
        if self.current.as_ref().map(|alert| alert.id) == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_alert_replaces_and_survives_stale_expiry() {
        let mut slot = AlertSlot::default();
        let first = slot.show(AlertCategory::Success, "Folder created");
        let second = slot.show(AlertCategory::Danger, "Permission denied");

        assert!(!slot.expire(first));
        assert_eq!(slot.current().map(|a| a.id), Some(second));
        assert!(slot.expire(second));
        assert!(slot.current().is_none());
    }

    #[test]
    fn only_success_auto_dismisses() {
        assert!(AlertCategory::Success.auto_dismisses());
        assert!(!AlertCategory::Danger.auto_dismisses());
        assert!(!AlertCategory::Warning.auto_dismisses());
        assert!(!AlertCategory::Info.auto_dismisses());
    }
}
