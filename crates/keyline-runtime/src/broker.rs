#![forbid(unsafe_code)]

//! Keyboard event broker: one callback slot per keyboard transition.
//!
//! # Design
//!
//! The broker keeps two independent pieces of state:
//!
//! - **Slots**: at most one [`KeyboardCallback`] per [`EventKind`], shared as
//!   `Rc<RefCell<..>>` so observers can reach them.
//! - **Subscriptions**: the [`ObserverToken`]s it currently holds on its
//!   [`NotificationCenter`], one per subscribed kind.
//!
//! Observers capture only a `Weak` reference to the slots. Once the broker
//! is gone nothing can dispatch into it, even if a token were leaked.
//!
//! # Invariants
//!
//! 1. Registering a callback replaces the slot's previous one; registering
//!    `None` empties it.
//! 2. `deactivate()` never touches slots; `clear()` never touches
//!    subscriptions.
//! 3. The broker never holds two subscriptions for the same kind.
//! 4. Dropping the broker releases every subscription.
//!
//! # Failure Modes
//!
//! - **Malformed payload**: frames degrade to zero rectangles; the callback
//!   still runs.
//! - **Re-entrant registration**: a callback that changes slots while being
//!   dispatched affects only later dispatches; the running dispatch already
//!   holds its own handle to the callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use keyline_core::{EventKind, FrameOptions, Notification};
use tracing::{debug, trace};

use crate::center::{NotificationCenter, ObserverToken};
use crate::config::{BrokerConfig, ReactivationPolicy};

/// Callback invoked with the frames of a keyboard transition.
pub type KeyboardCallback = Rc<dyn Fn(&FrameOptions)>;

const DEFAULT_LABEL: &str = "keyboard";

#[derive(Default)]
struct Slots {
    callbacks: [Option<KeyboardCallback>; EventKind::COUNT],
}

/// Routes keyboard notifications to per-event callbacks.
///
/// ```
/// use keyline_runtime::{KeyboardEventBroker, NotificationCenter};
/// use keyline_core::{EventKind, Rect};
///
/// let center = NotificationCenter::new();
/// let broker = KeyboardEventBroker::with_center(center.clone());
/// broker
///     .on(EventKind::WillShow, |opts| println!("keyboard ends at {}", opts.end_frame))
///     .on(EventKind::WillHide, |_| println!("keyboard hiding"))
///     .activate();
///
/// center.post(&EventKind::WillShow.notification(None, Some(Rect::new(0.0, 500.0, 320.0, 216.0))));
/// broker.deactivate();
/// ```
pub struct KeyboardEventBroker {
    center: NotificationCenter,
    config: BrokerConfig,
    label: Rc<str>,
    slots: Rc<RefCell<Slots>>,
    subscriptions: RefCell<Vec<(EventKind, ObserverToken)>>,
}

impl KeyboardEventBroker {
    /// Broker on the calling thread's default center.
    #[must_use]
    pub fn new() -> Self {
        Self::with_center(NotificationCenter::default_center())
    }

    /// Broker on `center` with default configuration.
    #[must_use]
    pub fn with_center(center: NotificationCenter) -> Self {
        Self::with_config(center, BrokerConfig::default())
    }

    #[must_use]
    pub fn with_config(center: NotificationCenter, config: BrokerConfig) -> Self {
        let label: Rc<str> = Rc::from(config.label.as_deref().unwrap_or(DEFAULT_LABEL));
        Self {
            center,
            config,
            label,
            slots: Rc::new(RefCell::new(Slots::default())),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Register `callback` for `event`, replacing any previous one.
    pub fn on(&self, event: EventKind, callback: impl Fn(&FrameOptions) + 'static) -> &Self {
        let callback: KeyboardCallback = Rc::new(callback);
        self.set(event, Some(callback))
    }

    /// Register or clear the callback for `event`.
    ///
    /// `None` empties the slot. Subscription state is not affected.
    pub fn set(&self, event: EventKind, callback: Option<KeyboardCallback>) -> &Self {
        trace!(
            broker = %self.label,
            event = %event,
            present = callback.is_some(),
            "callback slot updated"
        );
        self.slots.borrow_mut().callbacks[event.slot()] = callback;
        self
    }

    /// Clear the callback for `event`.
    pub fn off(&self, event: EventKind) -> &Self {
        self.set(event, None)
    }

    /// Callback currently registered for `event`.
    #[must_use]
    pub fn callback(&self, event: EventKind) -> Option<KeyboardCallback> {
        self.slots.borrow().callbacks[event.slot()].clone()
    }

    #[must_use]
    pub fn has_callback(&self, event: EventKind) -> bool {
        self.slots.borrow().callbacks[event.slot()].is_some()
    }

    /// Kinds with a registered callback, in slot order.
    #[must_use]
    pub fn registered_events(&self) -> Vec<EventKind> {
        let slots = self.slots.borrow();
        EventKind::ALL
            .into_iter()
            .filter(|kind| slots.callbacks[kind.slot()].is_some())
            .collect()
    }

    /// Start forwarding notifications for every kind with a callback.
    ///
    /// While already active the [`ReactivationPolicy`] decides: `Resubscribe`
    /// releases all held subscriptions and subscribes again for the current
    /// slots; `KeepExisting` does nothing.
    pub fn activate(&self) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        if !subscriptions.is_empty() {
            match self.config.reactivation {
                ReactivationPolicy::KeepExisting => {
                    debug!(broker = %self.label, "already active, keeping subscriptions");
                    return;
                }
                ReactivationPolicy::Resubscribe => {
                    debug!(
                        broker = %self.label,
                        released = subscriptions.len(),
                        "already active, resubscribing"
                    );
                    subscriptions.clear();
                }
            }
        }

        for kind in self.registered_events() {
            let slots = Rc::downgrade(&self.slots);
            let label = Rc::clone(&self.label);
            let token = self
                .center
                .add_observer(kind.notification_name().clone(), move |notification| {
                    dispatch(&slots, kind, notification, &label);
                });
            subscriptions.push((kind, token));
        }
        debug!(
            broker = %self.label,
            subscribed = subscriptions.len(),
            "keyboard broker activated"
        );
    }

    /// Activate and return a guard that deactivates when dropped.
    ///
    /// A scope opened on a broker that is already active leaves the outer
    /// activation in place when it drops.
    #[must_use = "dropping the scope deactivates the broker immediately"]
    pub fn activate_scoped(&self) -> ActiveScope<'_> {
        let nested = self.is_active();
        self.activate();
        ActiveScope {
            broker: self,
            nested,
        }
    }

    /// Release every subscription. Callbacks are kept. Idempotent.
    pub fn deactivate(&self) {
        let released = std::mem::take(&mut *self.subscriptions.borrow_mut());
        if released.is_empty() {
            return;
        }
        debug!(
            broker = %self.label,
            released = released.len(),
            "keyboard broker deactivated"
        );
        drop(released);
    }

    /// Remove every callback. Subscriptions are kept.
    pub fn clear(&self) {
        self.slots.borrow_mut().callbacks = Default::default();
        debug!(broker = %self.label, "callbacks cleared");
    }

    /// True while the broker holds at least one subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.subscriptions.borrow().is_empty()
    }

    /// Kinds currently subscribed on the center, in subscription order.
    #[must_use]
    pub fn subscribed_events(&self) -> Vec<EventKind> {
        self.subscriptions
            .borrow()
            .iter()
            .map(|(kind, _)| *kind)
            .collect()
    }

    #[must_use]
    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }
}

impl Default for KeyboardEventBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KeyboardEventBroker {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for KeyboardEventBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardEventBroker")
            .field("label", &self.label)
            .field("registered", &self.registered_events())
            .field("subscribed", &self.subscribed_events())
            .field("reactivation", &self.config.reactivation)
            .finish()
    }
}

fn dispatch(slots: &Weak<RefCell<Slots>>, kind: EventKind, notification: &Notification, label: &str) {
    let Some(slots) = slots.upgrade() else {
        return;
    };
    // Clone out of the cell so the callback may re-register freely.
    let callback = slots.borrow().callbacks[kind.slot()].clone();
    let Some(callback) = callback else {
        trace!(broker = label, event = %kind, "no callback registered");
        return;
    };
    let options = FrameOptions::from_notification(notification);
    trace!(
        broker = label,
        event = %kind,
        end_frame = %options.end_frame,
        "dispatching keyboard event"
    );
    callback(&options);
}

/// Guard returned by [`KeyboardEventBroker::activate_scoped`].
///
/// Deactivates the broker on drop, on every exit path, unless the broker
/// was already active when the scope opened.
pub struct ActiveScope<'a> {
    broker: &'a KeyboardEventBroker,
    nested: bool,
}

impl ActiveScope<'_> {
    #[must_use]
    pub fn broker(&self) -> &KeyboardEventBroker {
        self.broker
    }
}

impl Drop for ActiveScope<'_> {
    fn drop(&mut self) {
        if !self.nested {
            self.broker.deactivate();
        }
    }
}

impl fmt::Debug for ActiveScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveScope")
            .field("broker", self.broker)
            .field("nested", &self.nested)
            .finish()
    }
}
