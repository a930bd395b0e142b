#![forbid(unsafe_code)]

//! Password screen model: a submit button docked above the keyboard.
//!
//! The button sits `margin` above the bottom edge (or flush with the
//! safe-area bottom on notched devices). When the keyboard is about to show,
//! the button is lifted by the safe-area-adjusted keyboard height plus the
//! margin; when it is about to hide, the button returns to rest. The content
//! area fills the space between the top safe-area inset and the button.
//!
//! Listening follows the screen's visibility: `appear()` registers and
//! activates, `disappear()` deactivates.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use keyline_core::{EventKind, FrameOptions, Rect, SafeArea};
use keyline_runtime::{BrokerConfig, KeyboardEventBroker, NotificationCenter};
use serde::Serialize;
use tracing::debug;

/// Static geometry of the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub bounds: Rect,
    pub safe_area: SafeArea,
    /// Gap between the button and whatever it rests on.
    pub margin: f64,
    pub button_height: f64,
}

impl ScreenGeometry {
    pub const DEFAULT_MARGIN: f64 = 16.0;
    pub const DEFAULT_BUTTON_HEIGHT: f64 = 48.0;

    #[must_use]
    pub fn new(bounds: Rect, safe_area: SafeArea) -> Self {
        Self {
            bounds,
            safe_area,
            margin: Self::DEFAULT_MARGIN,
            button_height: Self::DEFAULT_BUTTON_HEIGHT,
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Y the button's bottom constraint is anchored to.
    fn anchor_y(&self) -> f64 {
        if self.safe_area.has_notch() {
            self.bounds.max_y() - self.safe_area.insets().bottom
        } else {
            self.bounds.max_y()
        }
    }

    /// Gap above the anchor while the keyboard is hidden.
    ///
    /// Notched devices rest flush with the safe-area bottom, so the margin is
    /// not reapplied there after a hide.
    fn rest_gap(&self) -> f64 {
        if self.safe_area.has_notch() {
            0.0
        } else {
            self.margin
        }
    }

    fn lifted_gap(&self, options: &FrameOptions) -> f64 {
        self.safe_area.keyboard_lift(options.end_frame.height) + self.margin
    }
}

/// Mutable layout state, shared with the keyboard callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutState {
    gap: f64,
    keyboard_visible: bool,
}

/// Resolved frames after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub button_x: f64,
    pub button_y: f64,
    pub button_width: f64,
    pub button_height: f64,
    pub content_top: f64,
    pub content_height: f64,
    pub keyboard_visible: bool,
    pub listening: bool,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn button_frame(&self) -> Rect {
        Rect::new(
            self.button_x,
            self.button_y,
            self.button_width,
            self.button_height,
        )
    }
}

/// The example screen.
#[derive(Debug)]
pub struct PasswordScreen {
    geometry: ScreenGeometry,
    state: Rc<RefCell<LayoutState>>,
    keyboard: KeyboardEventBroker,
}

impl PasswordScreen {
    #[must_use]
    pub fn new(geometry: ScreenGeometry, center: NotificationCenter, config: BrokerConfig) -> Self {
        let state = LayoutState {
            gap: geometry.rest_gap(),
            keyboard_visible: false,
        };
        Self {
            geometry,
            state: Rc::new(RefCell::new(state)),
            keyboard: KeyboardEventBroker::with_config(center, config),
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn broker(&self) -> &KeyboardEventBroker {
        &self.keyboard
    }

    /// Screen became visible: start following the keyboard.
    pub fn appear(&self) {
        let geometry = self.geometry;
        let show_state = Rc::downgrade(&self.state);
        let hide_state = Rc::downgrade(&self.state);
        self.keyboard
            .on(EventKind::WillShow, move |options| {
                update(&show_state, |state| {
                    state.gap = geometry.lifted_gap(options);
                    state.keyboard_visible = true;
                });
            })
            .on(EventKind::WillHide, move |_| {
                update(&hide_state, |state| {
                    state.gap = geometry.rest_gap();
                    state.keyboard_visible = false;
                });
            })
            .activate();
        debug!("password screen appeared");
    }

    /// Screen is going away: stop following the keyboard.
    ///
    /// Callbacks stay registered so a later `appear()` resumes cleanly.
    pub fn disappear(&self) {
        self.keyboard.deactivate();
        debug!("password screen disappeared");
    }

    /// Current frames.
    #[must_use]
    pub fn layout(&self) -> LayoutSnapshot {
        let state = *self.state.borrow();
        let g = &self.geometry;
        let button_bottom = g.anchor_y() - state.gap;
        let button_y = button_bottom - g.button_height;
        let content_top = g.bounds.y + g.safe_area.insets().top;
        LayoutSnapshot {
            button_x: g.bounds.x + g.margin,
            button_y,
            button_width: (g.bounds.width - 2.0 * g.margin).max(0.0),
            button_height: g.button_height,
            content_top,
            content_height: (button_y - content_top).max(0.0),
            keyboard_visible: state.keyboard_visible,
            listening: self.keyboard.is_active(),
        }
    }
}

fn update(state: &Weak<RefCell<LayoutState>>, f: impl FnOnce(&mut LayoutState)) {
    if let Some(state) = state.upgrade() {
        f(&mut state.borrow_mut());
    }
}
