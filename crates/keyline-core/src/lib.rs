#![forbid(unsafe_code)]

//! Core: keyboard lifecycle events, frame geometry, and notification payloads.
//!
//! # Role in keyline
//! `keyline-core` is the data layer. It owns the closed set of keyboard
//! lifecycle events, the table that ties each event to its host notification
//! identifier, and the geometry record ([`FrameOptions`]) handed to
//! application callbacks.
//!
//! # Primary responsibilities
//! - **EventKind**: the four keyboard transitions and their static lookup table.
//! - **Notification / UserInfo**: host notification shape and payload values.
//! - **FrameOptions**: start/end keyboard frames, degrading to zero rectangles.
//! - **SafeArea**: bottom-inset adjustment for notched devices.
//!
//! # How it fits in the system
//! The runtime (`keyline-runtime`) owns the notification center and the
//! broker that turns `Notification` values into `FrameOptions` callbacks.
//! Nothing in this crate holds state or subscribes to anything.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod notification;
pub mod safe_area;

#[cfg(feature = "host-json")]
pub mod host_json;

pub use event::{EVENT_TABLE, EventEntry, EventKind, FrameOptions};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use notification::{Notification, NotificationName, PayloadValue, UserInfo};
pub use safe_area::SafeArea;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
