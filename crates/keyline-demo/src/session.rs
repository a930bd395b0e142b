#![forbid(unsafe_code)]

//! Scripted sessions against the password screen.
//!
//! A [`Session`] wires one screen, one simulated keyboard, and one window
//! onto a shared notification center, then replays [`Step`]s and reports
//! the layout after each.

use std::fmt;
use std::io;
use std::path::Path;
use std::rc::Rc;

use keyline_core::host_json::{HostParseError, parse_host_script};
use keyline_core::{EdgeInsets, EventKind, Notification, Rect, SafeArea};
use keyline_runtime::{
    BrokerConfig, NotificationCenter, SimulatedKeyboard, SimulatedWindow, TapDismisser,
};
use serde::Serialize;
use tracing::info;

use crate::cli::Opts;
use crate::screen::{LayoutSnapshot, PasswordScreen, ScreenGeometry};

/// One user or host action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Screen becomes visible.
    Appear,
    /// User taps the password field.
    FocusField,
    /// User taps the background.
    TapBackground,
    /// Keyboard height changes (input method switch).
    ChangeKeyboardHeight(f64),
    /// Screen goes away.
    Disappear,
    /// Raw host notification.
    Host(Notification),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appear => f.write_str("appear"),
            Self::FocusField => f.write_str("focus_field"),
            Self::TapBackground => f.write_str("tap_background"),
            Self::ChangeKeyboardHeight(h) => write!(f, "keyboard_height={h}"),
            Self::Disappear => f.write_str("disappear"),
            Self::Host(n) => match EventKind::from_notification_name(n.name()) {
                Some(kind) => write!(f, "host:{kind}"),
                None => write!(f, "host:{}", n.name()),
            },
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: String,
    /// Observer calls made by notifications the step posted.
    pub delivered: usize,
    #[serde(flatten)]
    pub layout: LayoutSnapshot,
}

/// Errors loading a session script.
#[derive(Debug)]
pub enum SessionError {
    Io { path: String, source: io::Error },
    Script { line: usize, source: HostParseError },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Script { line, source } => write!(f, "script line {line}: {source}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Script { source, .. } => Some(source),
        }
    }
}

/// Built-in session: show, dismiss, show again, resize, leave, show unobserved.
#[must_use]
pub fn default_steps(keyboard_height: f64) -> Vec<Step> {
    vec![
        Step::Appear,
        Step::FocusField,
        Step::TapBackground,
        Step::FocusField,
        Step::ChangeKeyboardHeight(keyboard_height + 45.0),
        Step::Disappear,
        Step::TapBackground,
        Step::FocusField,
    ]
}

/// Session from JSONL host notifications, framed by appear/disappear.
pub fn script_steps(text: &str) -> Result<Vec<Step>, SessionError> {
    let notifications =
        parse_host_script(text).map_err(|(line, source)| SessionError::Script { line, source })?;
    let mut steps = Vec::with_capacity(notifications.len() + 2);
    steps.push(Step::Appear);
    steps.extend(notifications.into_iter().map(Step::Host));
    steps.push(Step::Disappear);
    Ok(steps)
}

/// Load [`script_steps`] from a file.
pub fn load_script(path: &Path) -> Result<Vec<Step>, SessionError> {
    let text = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    script_steps(&text)
}

/// A screen plus the simulated host around it.
#[derive(Debug)]
pub struct Session {
    center: NotificationCenter,
    keyboard: Rc<SimulatedKeyboard>,
    window: Rc<SimulatedWindow>,
    dismisser: TapDismisser<Rc<SimulatedWindow>>,
    screen: PasswordScreen,
}

impl Session {
    #[must_use]
    pub fn new(opts: &Opts, config: BrokerConfig) -> Self {
        let center = NotificationCenter::new();
        let bounds = Rect::new(0.0, 0.0, opts.screen_width, opts.screen_height);
        let safe_area = SafeArea::new(EdgeInsets::new(opts.safe_top, 0.0, opts.safe_bottom, 0.0));
        let geometry = ScreenGeometry::new(bounds, safe_area).with_margin(opts.margin);

        let keyboard = Rc::new(SimulatedKeyboard::new(
            center.clone(),
            bounds,
            opts.keyboard_height,
        ));
        let window = Rc::new(SimulatedWindow::new(Rc::clone(&keyboard), true));
        let dismisser = TapDismisser::new(vec![Rc::clone(&window)]);
        let screen = PasswordScreen::new(geometry, center.clone(), config);
        Self {
            center,
            keyboard,
            window,
            dismisser,
            screen,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &PasswordScreen {
        &self.screen
    }

    #[must_use]
    pub fn keyboard(&self) -> &SimulatedKeyboard {
        &self.keyboard
    }

    /// Apply one step and report the resulting layout.
    pub fn run_step(&self, step: &Step) -> StepReport {
        let delivered = match step {
            Step::Appear => {
                self.screen.appear();
                0
            }
            Step::Disappear => {
                self.screen.disappear();
                0
            }
            Step::FocusField => self.window.focus_text_field(),
            Step::TapBackground => {
                let before = self.keyboard.deliveries();
                self.dismisser.on_tap();
                self.keyboard.deliveries() - before
            }
            Step::ChangeKeyboardHeight(height) => self.keyboard.set_height(*height),
            Step::Host(notification) => self.center.post(notification),
        };
        let report = StepReport {
            step: step.to_string(),
            delivered,
            layout: self.screen.layout(),
        };
        info!(
            step = %report.step,
            delivered,
            button_y = report.layout.button_y,
            keyboard_visible = report.layout.keyboard_visible,
            "session step"
        );
        report
    }

    /// Apply every step in order.
    pub fn run(&self, steps: &[Step]) -> Vec<StepReport> {
        steps.iter().map(|step| self.run_step(step)).collect()
    }
}
