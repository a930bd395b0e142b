#![forbid(unsafe_code)]

//! JSON bridge for host-encoded keyboard notifications.
//!
//! Hosts that cannot hand us native values (web views, test scripts, a
//! recorded session) encode each notification as one JSON object:
//!
//! ```json
//! {"name":"UIKeyboardWillShowNotification",
//!  "user_info":{"UIKeyboardFrameEndUserInfoKey":{"x":0,"y":500,"width":320,"height":216},
//!               "UIKeyboardFrameBeginUserInfoKey":"{{0, 716}, {320, 216}}",
//!               "UIKeyboardAnimationDurationUserInfoKey":0.25}}
//! ```
//!
//! `name` may also be an event label such as `will_show`. Notifications that
//! are not keyboard events return `Ok(None)`.

use serde::Deserialize;
use serde_json::Value;

use crate::event::EventKind;
use crate::geometry::Rect;
use crate::notification::{Notification, PayloadValue, UserInfo};

/// Errors from parsing host JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
}

impl core::fmt::Display for HostParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for HostParseError {}

#[derive(Debug, Deserialize)]
struct RawNotification {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_info: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Parse one host-encoded notification.
///
/// Returns `Ok(None)` for names that are not keyboard events, and `Err` for
/// malformed JSON or a missing `name`.
pub fn parse_host_notification(json: &str) -> Result<Option<Notification>, HostParseError> {
    let raw: RawNotification =
        serde_json::from_str(json).map_err(|e| HostParseError::Json(e.to_string()))?;
    let name = raw.name.ok_or(HostParseError::MissingField("name"))?;

    let Some(kind) = EventKind::parse(&name) else {
        return Ok(None);
    };

    let mut notification = Notification::new(kind.notification_name().clone());
    if let Some(map) = raw.user_info {
        let info: UserInfo = map
            .into_iter()
            .filter_map(|(key, value)| payload_value(value).map(|v| (key, v)))
            .collect();
        notification = notification.with_user_info(info);
    }
    Ok(Some(notification))
}

/// Parse a JSONL script, skipping blank lines and `#` comments.
///
/// Errors carry the 1-based line number.
pub fn parse_host_script(text: &str) -> Result<Vec<Notification>, (usize, HostParseError)> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(n) = parse_host_notification(line).map_err(|e| (idx + 1, e))? {
            out.push(n);
        }
    }
    Ok(out)
}

fn payload_value(value: Value) -> Option<PayloadValue> {
    match value {
        Value::Bool(b) => Some(PayloadValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(PayloadValue::Number),
        Value::String(s) => Some(PayloadValue::Text(s)),
        obj @ Value::Object(_) => serde_json::from_value::<RawRect>(obj)
            .ok()
            .map(|r| PayloadValue::Rect(Rect::new(r.x, r.y, r.width, r.height))),
        Value::Null | Value::Array(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::FrameOptions;
    use crate::notification::{ANIMATION_DURATION_KEY, FRAME_END_KEY};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_object_and_string_frames() {
        let json = r#"{"name":"UIKeyboardWillShowNotification","user_info":{
            "UIKeyboardFrameEndUserInfoKey":{"x":0,"y":500,"width":320,"height":216},
            "UIKeyboardFrameBeginUserInfoKey":"{{0, 716}, {320, 216}}",
            "UIKeyboardAnimationDurationUserInfoKey":0.25}}"#;
        let n = parse_host_notification(json).unwrap().unwrap();
        assert_eq!(EventKind::from_notification_name(n.name()), Some(EventKind::WillShow));
        let opts = FrameOptions::from_notification(&n);
        assert_eq!(opts.start_frame, Rect::new(0.0, 716.0, 320.0, 216.0));
        assert_eq!(opts.end_frame, Rect::new(0.0, 500.0, 320.0, 216.0));
        let info = n.user_info().unwrap();
        assert_eq!(
            info.get(ANIMATION_DURATION_KEY).and_then(PayloadValue::as_number),
            Some(0.25)
        );
    }

    #[test]
    fn label_names_are_accepted() {
        let n = parse_host_notification(r#"{"name":"did_hide"}"#).unwrap().unwrap();
        assert_eq!(n.name(), EventKind::DidHide.notification_name());
        assert!(n.user_info().is_none());
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(
            parse_host_notification(r#"{"name":"UIApplicationWillResignActive"}"#),
            Ok(None)
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_host_notification("{not json"),
            Err(HostParseError::Json(_))
        ));
        assert_eq!(
            parse_host_notification(r#"{"user_info":{}}"#),
            Err(HostParseError::MissingField("name"))
        );
    }

    #[test]
    fn unusable_values_are_dropped() {
        let json = r#"{"name":"will_show","user_info":{
            "UIKeyboardFrameEndUserInfoKey":{"x":0,"y":500},
            "list":[1,2],
            "nothing":null}}"#;
        let n = parse_host_notification(json).unwrap().unwrap();
        let info = n.user_info().unwrap();
        assert!(info.is_empty());
        assert_eq!(info.rect(FRAME_END_KEY), None);
    }

    #[test]
    fn script_skips_comments_and_reports_lines() {
        let script = "# session\n{\"name\":\"will_show\"}\n\n{\"name\":\"other\"}\n{\"name\":\"did_show\"}\n";
        let ns = parse_host_script(script).unwrap();
        assert_eq!(ns.len(), 2);

        let err = parse_host_script("{\"name\":\"will_show\"}\n{oops").unwrap_err();
        assert_eq!(err.0, 2);
    }
}
