#![forbid(unsafe_code)]

//! Tap-to-dismiss helper.
//!
//! Not part of the broker: a screen that wants the keyboard to go away when
//! the user taps its background binds a [`TapDismisser`] to the host's window
//! list and calls [`TapDismisser::on_tap`] from its tap handler. The key
//! window (or the first window, when none is key) is asked to end editing,
//! which makes the host hide the keyboard and post the hide notifications.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// A host window that can own keyboard focus.
pub trait FocusHost {
    /// True for the window currently receiving keyboard input.
    fn is_key_window(&self) -> bool;

    /// Resign keyboard focus anywhere in this window.
    ///
    /// Returns `true` when something was editing and has stopped.
    fn end_editing(&self) -> bool;
}

impl<T: FocusHost + ?Sized> FocusHost for Rc<T> {
    fn is_key_window(&self) -> bool {
        (**self).is_key_window()
    }

    fn end_editing(&self) -> bool {
        (**self).end_editing()
    }
}

/// Ask the key window (falling back to the first window) to end editing.
///
/// Returns `false` when there are no windows or nothing was editing.
pub fn dismiss_keyboard<W: FocusHost>(windows: &[W]) -> bool {
    let target = windows
        .iter()
        .find(|w| w.is_key_window())
        .or_else(|| windows.first());
    let Some(window) = target else {
        debug!("dismiss requested with no windows");
        return false;
    };
    let ended = window.end_editing();
    debug!(ended, "keyboard dismiss requested");
    ended
}

/// Binds a window list to a tap gesture.
pub struct TapDismisser<W> {
    windows: Vec<W>,
}

impl<W: FocusHost> TapDismisser<W> {
    #[must_use]
    pub fn new(windows: Vec<W>) -> Self {
        Self { windows }
    }

    /// Handle a background tap.
    pub fn on_tap(&self) -> bool {
        dismiss_keyboard(&self.windows)
    }

    #[must_use]
    pub fn windows(&self) -> &[W] {
        &self.windows
    }
}

impl<W> fmt::Debug for TapDismisser<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapDismisser")
            .field("windows", &self.windows.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Window {
        key: bool,
        editing: Cell<bool>,
        asked: Cell<u32>,
    }

    impl Window {
        fn new(key: bool, editing: bool) -> Self {
            Self {
                key,
                editing: Cell::new(editing),
                asked: Cell::new(0),
            }
        }
    }

    impl FocusHost for Window {
        fn is_key_window(&self) -> bool {
            self.key
        }

        fn end_editing(&self) -> bool {
            self.asked.set(self.asked.get() + 1);
            self.editing.replace(false)
        }
    }

    #[test]
    fn prefers_key_window() {
        let windows = [Window::new(false, true), Window::new(true, true)];
        assert!(dismiss_keyboard(&windows));
        assert_eq!(windows[0].asked.get(), 0);
        assert_eq!(windows[1].asked.get(), 1);
    }

    #[test]
    fn falls_back_to_first_window() {
        let windows = [Window::new(false, true), Window::new(false, false)];
        assert!(dismiss_keyboard(&windows));
        assert_eq!(windows[0].asked.get(), 1);
        assert_eq!(windows[1].asked.get(), 0);
    }

    #[test]
    fn no_windows_is_false() {
        let windows: [Window; 0] = [];
        assert!(!dismiss_keyboard(&windows));
    }

    #[test]
    fn tap_dismisser_reports_editing_state() {
        let window = Rc::new(Window::new(true, true));
        let dismisser = TapDismisser::new(vec![Rc::clone(&window)]);
        assert_eq!(dismisser.windows().len(), 1);
        assert!(Rc::ptr_eq(&dismisser.windows()[0], &window));
        assert!(dismisser.on_tap());
        assert!(!dismisser.on_tap());
        assert_eq!(window.asked.get(), 2);
    }
}
