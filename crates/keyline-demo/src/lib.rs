#![forbid(unsafe_code)]

//! keyline demo: a password screen whose submit button follows the keyboard.
//!
//! The screen listens for `WillShow`/`WillHide` while visible and lifts its
//! button above the keyboard, accounting for the bottom safe-area inset on
//! notched devices. Sessions run against a simulated host so every layout
//! transition can be printed and tested.

pub mod cli;
pub mod screen;
pub mod session;
