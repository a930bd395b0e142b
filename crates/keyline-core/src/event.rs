#![forbid(unsafe_code)]

//! Keyboard lifecycle events and the frame record handed to callbacks.
//!
//! # Design
//!
//! The set of events is closed. Each [`EventKind`] owns one row of
//! [`EVENT_TABLE`], which ties it to the host notification it is posted
//! under and to a dense handler slot. Lookups in either direction go through
//! that table.
//!
//! ## Invariants
//! 1. `EVENT_TABLE[k.slot()].kind == k` for every kind.
//! 2. Notification names in the table are pairwise distinct.
//! 3. [`FrameOptions::from_user_info`] is total: missing or unreadable frames
//!    become [`Rect::ZERO`].

use std::fmt;

use crate::geometry::Rect;
use crate::notification::{
    FRAME_BEGIN_KEY, FRAME_END_KEY, Notification, NotificationName, UserInfo,
};

/// A keyboard lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Keyboard is about to appear.
    WillShow,
    /// Keyboard finished appearing.
    DidShow,
    /// Keyboard is about to disappear.
    WillHide,
    /// Keyboard finished disappearing.
    DidHide,
}

/// One row of the event table.
#[derive(Debug)]
pub struct EventEntry {
    pub kind: EventKind,
    /// Host notification identifier.
    pub notification: NotificationName,
    /// Short label used in logs and scripts.
    pub label: &'static str,
}

/// Kind ↔ notification ↔ slot table, indexed by [`EventKind::slot`].
pub static EVENT_TABLE: [EventEntry; EventKind::COUNT] = [
    EventEntry {
        kind: EventKind::WillShow,
        notification: NotificationName::from_static("UIKeyboardWillShowNotification"),
        label: "will_show",
    },
    EventEntry {
        kind: EventKind::DidShow,
        notification: NotificationName::from_static("UIKeyboardDidShowNotification"),
        label: "did_show",
    },
    EventEntry {
        kind: EventKind::WillHide,
        notification: NotificationName::from_static("UIKeyboardWillHideNotification"),
        label: "will_hide",
    },
    EventEntry {
        kind: EventKind::DidHide,
        notification: NotificationName::from_static("UIKeyboardDidHideNotification"),
        label: "did_hide",
    },
];

impl EventKind {
    /// Number of kinds (and handler slots).
    pub const COUNT: usize = 4;

    /// All kinds in slot order.
    pub const ALL: [Self; Self::COUNT] = [Self::WillShow, Self::DidShow, Self::WillHide, Self::DidHide];

    /// Dense handler slot index.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::WillShow => 0,
            Self::DidShow => 1,
            Self::WillHide => 2,
            Self::DidHide => 3,
        }
    }

    /// Kind stored in `slot`, if in range.
    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        EVENT_TABLE.get(slot).map(|entry| entry.kind)
    }

    #[inline]
    #[must_use]
    pub fn entry(self) -> &'static EventEntry {
        &EVENT_TABLE[self.slot()]
    }

    /// Host notification identifier for this kind.
    #[must_use]
    pub fn notification_name(self) -> &'static NotificationName {
        &self.entry().notification
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Kind posted under `name`, if any.
    #[must_use]
    pub fn from_notification_name(name: &NotificationName) -> Option<Self> {
        EVENT_TABLE
            .iter()
            .find(|entry| &entry.notification == name)
            .map(|entry| entry.kind)
    }

    /// Kind whose label (or notification identifier) is `text`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        EVENT_TABLE
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(text) || entry.notification.as_str() == text)
            .map(|entry| entry.kind)
    }

    /// True for the two show transitions.
    #[must_use]
    pub const fn is_show(self) -> bool {
        matches!(self, Self::WillShow | Self::DidShow)
    }

    /// Build a keyboard notification for this kind.
    ///
    /// `None` frames are left out of the payload entirely.
    #[must_use]
    pub fn notification(self, start: Option<Rect>, end: Option<Rect>) -> Notification {
        let mut info = UserInfo::new();
        if let Some(start) = start {
            info.insert(FRAME_BEGIN_KEY, start);
        }
        if let Some(end) = end {
            info.insert(FRAME_END_KEY, end);
        }
        Notification::new(self.notification_name().clone()).with_user_info(info)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyboard frames before and after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOptions {
    pub start_frame: Rect,
    pub end_frame: Rect,
}

impl FrameOptions {
    #[must_use]
    pub const fn new(start_frame: Rect, end_frame: Rect) -> Self {
        Self {
            start_frame,
            end_frame,
        }
    }

    /// Read both frames from a payload. Never fails.
    #[must_use]
    pub fn from_user_info(user_info: Option<&UserInfo>) -> Self {
        let Some(info) = user_info else {
            return Self::default();
        };
        Self {
            start_frame: frame_or_zero(info, FRAME_BEGIN_KEY),
            end_frame: frame_or_zero(info, FRAME_END_KEY),
        }
    }

    /// Read both frames from a notification's payload.
    #[must_use]
    pub fn from_notification(notification: &Notification) -> Self {
        Self::from_user_info(notification.user_info())
    }

    /// Change in keyboard height across the transition.
    #[must_use]
    pub fn height_delta(&self) -> f64 {
        self.end_frame.height - self.start_frame.height
    }
}

fn frame_or_zero(info: &UserInfo, key: &str) -> Rect {
    match info.rect(key) {
        Some(rect) => rect,
        None => {
            if info.get(key).is_some() {
                log_unreadable(key);
            }
            Rect::ZERO
        }
    }
}

#[cfg(feature = "tracing")]
fn log_unreadable(key: &str) {
    crate::logging::debug!(key, "unreadable keyboard frame, using zero rect");
}

#[cfg(not(feature = "tracing"))]
fn log_unreadable(_key: &str) {}
