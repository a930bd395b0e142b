#![forbid(unsafe_code)]

//! Host notifications and their payload.
//!
//! A [`Notification`] is a name plus an optional, loosely typed payload
//! ([`UserInfo`]). The payload is opaque to everything except the two frame
//! lookups in [`FrameOptions::from_user_info`](crate::FrameOptions::from_user_info);
//! hosts are free to carry extra keys (animation duration, curve, ...).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Rect;

/// Payload key for the keyboard frame at the start of a transition.
pub const FRAME_BEGIN_KEY: &str = "UIKeyboardFrameBeginUserInfoKey";
/// Payload key for the keyboard frame at the end of a transition.
pub const FRAME_END_KEY: &str = "UIKeyboardFrameEndUserInfoKey";
/// Payload key for the transition duration in seconds. Not read by the broker.
pub const ANIMATION_DURATION_KEY: &str = "UIKeyboardAnimationDurationUserInfoKey";
/// Payload key for the transition curve. Not read by the broker.
pub const ANIMATION_CURVE_KEY: &str = "UIKeyboardAnimationCurveUserInfoKey";

/// Identifier a notification is posted and observed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationName(Cow<'static, str>);

impl NotificationName {
    /// Name backed by a static string (usable in `const` tables).
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for NotificationName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for NotificationName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for NotificationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Rect(Rect),
    /// Free text; rectangles may arrive as `{{x, y}, {w, h}}`.
    Text(String),
    Number(f64),
    Bool(bool),
}

impl PayloadValue {
    /// Interpret the value as a rectangle.
    ///
    /// Accepts a finite [`Rect`] or text in the host string form. Everything
    /// else is `None`.
    #[must_use]
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(rect) if rect.is_finite() => Some(*rect),
            Self::Text(text) => Rect::parse_host(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Rect> for PayloadValue {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<f64> for PayloadValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for PayloadValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for PayloadValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for PayloadValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// String-keyed notification payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserInfo {
    entries: BTreeMap<String, PayloadValue>,
}

impl UserInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PayloadValue>,
    ) -> Option<PayloadValue> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries.get(key)
    }

    /// Rectangle stored under `key`, if present and readable.
    #[must_use]
    pub fn rect(&self, key: &str) -> Option<Rect> {
        self.get(key).and_then(PayloadValue::as_rect)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<PayloadValue>> FromIterator<(K, V)> for UserInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = Self::new();
        for (k, v) in iter {
            info.insert(k, v);
        }
        info
    }
}

/// A posted notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    name: NotificationName,
    user_info: Option<UserInfo>,
}

impl Notification {
    /// Notification without a payload.
    #[must_use]
    pub fn new(name: impl Into<NotificationName>) -> Self {
        Self {
            name: name.into(),
            user_info: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_user_info(mut self, user_info: UserInfo) -> Self {
        self.user_info = Some(user_info);
        self
    }

    #[must_use]
    pub fn name(&self) -> &NotificationName {
        &self.name
    }

    #[must_use]
    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_lookup_accepts_rect_and_text() {
        let info = UserInfo::new()
            .with(FRAME_END_KEY, Rect::new(0.0, 500.0, 320.0, 216.0))
            .with(FRAME_BEGIN_KEY, "{{0, 716}, {320, 216}}");
        assert_eq!(
            info.rect(FRAME_END_KEY),
            Some(Rect::new(0.0, 500.0, 320.0, 216.0))
        );
        assert_eq!(
            info.rect(FRAME_BEGIN_KEY),
            Some(Rect::new(0.0, 716.0, 320.0, 216.0))
        );
    }

    #[test]
    fn rect_lookup_rejects_other_types() {
        let info = UserInfo::new()
            .with("n", 3.0)
            .with("b", true)
            .with("t", "not a rect")
            .with("nan", Rect::new(f64::NAN, 0.0, 1.0, 1.0));
        for key in ["n", "b", "t", "nan", "missing"] {
            assert_eq!(info.rect(key), None, "key: {key}");
        }
    }

    #[test]
    fn insert_replaces() {
        let mut info = UserInfo::new();
        assert!(info.insert("k", 1.0).is_none());
        assert_eq!(info.insert("k", 2.0), Some(PayloadValue::Number(1.0)));
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("k").and_then(PayloadValue::as_number), Some(2.0));
    }

    #[test]
    fn name_equality_ignores_ownership() {
        let a = NotificationName::from_static("X");
        let b = NotificationName::from(String::from("X"));
        assert_eq!(a, b);
        assert_eq!(b.to_string(), "X");
    }

    #[test]
    fn notification_payload_is_optional() {
        let n = Notification::new("X");
        assert!(n.user_info().is_none());
        let n = n.with_user_info(UserInfo::new().with("k", false));
        assert_eq!(n.user_info().map(UserInfo::len), Some(1));
    }
}
