#![forbid(unsafe_code)]

//! Deterministic stand-in for the host keyboard.
//!
//! [`SimulatedKeyboard`] posts the same notification pairs a real host does,
//! with frames computed from the screen bounds: the keyboard slides in from
//! below the bottom edge and docks flush with it. [`SimulatedWindow`] pairs it
//! with a text field so that focus changes (and [`FocusHost::end_editing`])
//! drive the keyboard the way user input would.

use std::cell::Cell;
use std::rc::Rc;

use keyline_core::notification::{ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_BEGIN_KEY, FRAME_END_KEY};
use keyline_core::{EventKind, Notification, Rect, UserInfo};
use tracing::debug;

use crate::center::NotificationCenter;
use crate::dismiss::FocusHost;

/// Default transition duration reported in payloads, in seconds.
pub const DEFAULT_ANIMATION_DURATION: f64 = 0.25;
/// Host animation curve identifier reported in payloads.
const ANIMATION_CURVE: f64 = 7.0;

/// Posts keyboard notifications for a fixed screen.
#[derive(Debug)]
pub struct SimulatedKeyboard {
    center: NotificationCenter,
    screen: Rect,
    height: Cell<f64>,
    shown: Cell<bool>,
    deliveries: Cell<usize>,
}

impl SimulatedKeyboard {
    #[must_use]
    pub fn new(center: NotificationCenter, screen: Rect, height: f64) -> Self {
        Self {
            center,
            screen,
            height: Cell::new(height.max(0.0)),
            shown: Cell::new(false),
            deliveries: Cell::new(0),
        }
    }

    /// Total observer calls made by this keyboard's posts.
    #[must_use]
    pub fn deliveries(&self) -> usize {
        self.deliveries.get()
    }

    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.shown.get()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height.get()
    }

    #[must_use]
    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Keyboard frame when docked at the bottom edge.
    #[must_use]
    pub fn docked_frame(&self) -> Rect {
        let height = self.height.get();
        Rect::new(
            self.screen.x,
            self.screen.max_y() - height,
            self.screen.width,
            height,
        )
    }

    /// Keyboard frame just below the bottom edge.
    #[must_use]
    pub fn offscreen_frame(&self) -> Rect {
        Rect::new(
            self.screen.x,
            self.screen.max_y(),
            self.screen.width,
            self.height.get(),
        )
    }

    /// Slide the keyboard in. Posts `WillShow` then `DidShow`.
    ///
    /// Does nothing when already shown. Returns the number of observer calls.
    pub fn show(&self) -> usize {
        if self.shown.replace(true) {
            return 0;
        }
        debug!(height = self.height.get(), "simulated keyboard show");
        let (start, end) = (self.offscreen_frame(), self.docked_frame());
        self.post_transition(EventKind::WillShow, start, end)
            + self.post_transition(EventKind::DidShow, start, end)
    }

    /// Slide the keyboard out. Posts `WillHide` then `DidHide`.
    ///
    /// Does nothing when already hidden.
    pub fn hide(&self) -> usize {
        if !self.shown.replace(false) {
            return 0;
        }
        debug!("simulated keyboard hide");
        let (start, end) = (self.docked_frame(), self.offscreen_frame());
        self.post_transition(EventKind::WillHide, start, end)
            + self.post_transition(EventKind::DidHide, start, end)
    }

    /// Change the keyboard height (e.g. an input-method switch).
    ///
    /// While shown, hosts report this as a fresh show transition between the
    /// two docked frames.
    pub fn set_height(&self, height: f64) -> usize {
        let start = self.docked_frame();
        self.height.set(height.max(0.0));
        if !self.shown.get() {
            return 0;
        }
        let end = self.docked_frame();
        self.post_transition(EventKind::WillShow, start, end)
            + self.post_transition(EventKind::DidShow, start, end)
    }

    /// Post `kind` with an arbitrary payload, bypassing show/hide state.
    pub fn post_raw(&self, kind: EventKind, user_info: Option<UserInfo>) -> usize {
        let mut notification = Notification::new(kind.notification_name().clone());
        if let Some(info) = user_info {
            notification = notification.with_user_info(info);
        }
        let delivered = self.center.post(&notification);
        self.deliveries.set(self.deliveries.get() + delivered);
        delivered
    }

    fn post_transition(&self, kind: EventKind, start: Rect, end: Rect) -> usize {
        let info = UserInfo::new()
            .with(FRAME_BEGIN_KEY, start)
            .with(FRAME_END_KEY, end)
            .with(ANIMATION_DURATION_KEY, DEFAULT_ANIMATION_DURATION)
            .with(ANIMATION_CURVE_KEY, ANIMATION_CURVE);
        self.post_raw(kind, Some(info))
    }
}

/// A window holding one text field, backed by a [`SimulatedKeyboard`].
#[derive(Debug)]
pub struct SimulatedWindow {
    keyboard: Rc<SimulatedKeyboard>,
    key: bool,
    editing: Cell<bool>,
}

impl SimulatedWindow {
    #[must_use]
    pub fn new(keyboard: Rc<SimulatedKeyboard>, key: bool) -> Self {
        Self {
            keyboard,
            key,
            editing: Cell::new(false),
        }
    }

    /// Focus the text field, bringing up the keyboard.
    pub fn focus_text_field(&self) -> usize {
        self.editing.set(true);
        self.keyboard.show()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.get()
    }

    #[must_use]
    pub fn keyboard(&self) -> &SimulatedKeyboard {
        &self.keyboard
    }
}

impl FocusHost for SimulatedWindow {
    fn is_key_window(&self) -> bool {
        self.key
    }

    fn end_editing(&self) -> bool {
        if !self.editing.replace(false) {
            return false;
        }
        self.keyboard.hide();
        true
    }
}
