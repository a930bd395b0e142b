#![forbid(unsafe_code)]

//! Runtime: notification center and keyboard event broker.
//!
//! # Role in keyline
//! `keyline-runtime` owns the moving parts. [`NotificationCenter`] is the
//! shared channel hosts post keyboard notifications to; a
//! [`KeyboardEventBroker`] subscribes to it on behalf of one screen and turns
//! each notification into a [`FrameOptions`](keyline_core::FrameOptions)
//! callback.
//!
//! # Lifecycle
//! ```text
//! new() ──on()/set()──▶ activate() ──▶ notifications dispatch
//!                           │
//!                deactivate() / drop / ActiveScope drop
//! ```
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and expected to run
//! on the UI thread.

pub mod broker;
pub mod center;
pub mod config;
pub mod dismiss;
pub mod simulator;

pub use broker::{ActiveScope, KeyboardCallback, KeyboardEventBroker};
pub use center::{NotificationCenter, ObserverId, ObserverToken};
pub use config::{BrokerConfig, BrokerConfigError, BrokerConfigParse, ReactivationPolicy};
pub use dismiss::{FocusHost, TapDismisser, dismiss_keyboard};
pub use simulator::{SimulatedKeyboard, SimulatedWindow};
