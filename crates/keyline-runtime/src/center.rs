#![forbid(unsafe_code)]

//! Single-threaded notification center with RAII observer tokens.
//!
//! # Design
//!
//! [`NotificationCenter`] is a cheap, cloneable handle to shared
//! `Rc<RefCell<..>>` state. Observers are keyed by name and delivered in
//! registration order. Registering returns an [`ObserverToken`]; cancelling
//! or dropping the token removes exactly that observer, eagerly, so that no
//! later post reaches it.
//!
//! Each thread has one default center ([`NotificationCenter::default_center`])
//! standing in for the host's process-wide notification infrastructure.
//! Tests and embedders that want isolation create their own with
//! [`NotificationCenter::new`].
//!
//! # Invariants
//!
//! 1. Observer ids are unique for the lifetime of a center.
//! 2. A post delivers to the observers registered for the name when the post
//!    began; observers added or removed during delivery take effect on the
//!    next post.
//! 3. No `RefCell` borrow is held while an observer runs, so observers may
//!    post, subscribe, or cancel re-entrantly.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use keyline_core::{Notification, NotificationName};

type ObserverFn = Rc<dyn Fn(&Notification)>;

/// Opaque observer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct ObserverEntry {
    id: ObserverId,
    name: NotificationName,
    callback: ObserverFn,
}

#[derive(Default)]
struct CenterInner {
    next_id: u64,
    observers: Vec<ObserverEntry>,
}

impl CenterInner {
    fn remove(&mut self, id: ObserverId) -> Option<ObserverEntry> {
        let index = self.observers.iter().position(|entry| entry.id == id)?;
        Some(self.observers.remove(index))
    }
}

/// Shared, single-threaded notification center.
///
/// Cloning creates a new handle to the **same** center.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Rc<RefCell<CenterInner>>,
}

thread_local! {
    static DEFAULT_CENTER: NotificationCenter = NotificationCenter::new();
}

impl NotificationCenter {
    /// Create an isolated center with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The calling thread's shared center.
    #[must_use]
    pub fn default_center() -> Self {
        DEFAULT_CENTER.with(Clone::clone)
    }

    /// True when both handles refer to the same center.
    #[must_use]
    pub fn same_center(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register `callback` for notifications posted under `name`.
    ///
    /// The observer stays registered until the returned token is cancelled
    /// or dropped.
    #[must_use = "dropping the token removes the observer immediately"]
    pub fn add_observer(
        &self,
        name: impl Into<NotificationName>,
        callback: impl Fn(&Notification) + 'static,
    ) -> ObserverToken {
        let name = name.into();
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ObserverId(inner.next_id);
        tracing::trace!(observer = id.0, name = %name, "observer added");
        inner.observers.push(ObserverEntry {
            id,
            name,
            callback: Rc::new(callback),
        });
        ObserverToken {
            id,
            center: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `notification` to every observer of its name.
    ///
    /// Returns the number of observers called.
    pub fn post(&self, notification: &Notification) -> usize {
        let targets: Vec<ObserverFn> = {
            let inner = self.inner.borrow();
            inner
                .observers
                .iter()
                .filter(|entry| &entry.name == notification.name())
                .map(|entry| Rc::clone(&entry.callback))
                .collect()
        };
        tracing::trace!(
            name = %notification.name(),
            observers = targets.len(),
            "posting notification"
        );
        for callback in &targets {
            callback(notification);
        }
        targets.len()
    }

    /// Total registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Observers registered under `name`.
    #[must_use]
    pub fn observer_count_for(&self, name: &NotificationName) -> usize {
        self.inner
            .borrow()
            .observers
            .iter()
            .filter(|entry| &entry.name == name)
            .count()
    }
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

/// RAII handle for one registered observer.
///
/// Dropping the token removes the observer from its center. A token that
/// outlives its center is inert.
pub struct ObserverToken {
    id: ObserverId,
    center: Weak<RefCell<CenterInner>>,
}

impl ObserverToken {
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// True while the observer is still registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.center.upgrade().is_some_and(|inner| {
            inner
                .borrow()
                .observers
                .iter()
                .any(|entry| entry.id == self.id)
        })
    }

    /// Remove the observer now. Equivalent to dropping the token.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ObserverToken {
    fn drop(&mut self) {
        let Some(inner) = self.center.upgrade() else {
            return;
        };
        let removed = inner.borrow_mut().remove(self.id);
        // Entry drops outside the borrow; its callback may own tokens.
        if let Some(entry) = removed {
            tracing::trace!(observer = self.id.0, name = %entry.name, "observer removed");
        }
    }
}

impl fmt::Debug for ObserverToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverToken")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
