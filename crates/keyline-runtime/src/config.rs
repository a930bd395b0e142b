#![forbid(unsafe_code)]

//! Broker configuration and environment overrides.
//!
//! | Variable                | Values                 | Default       |
//! |-------------------------|------------------------|---------------|
//! | `KEYLINE_REACTIVATION`  | `resubscribe` / `keep` | `resubscribe` |
//! | `KEYLINE_BROKER_LABEL`  | any non-empty text     | unset         |
//!
//! Invalid values are reported through [`BrokerConfigParse::errors`] and
//! leave the default in place.

use std::env;
use std::fmt;

pub const ENV_REACTIVATION: &str = "KEYLINE_REACTIVATION";
pub const ENV_BROKER_LABEL: &str = "KEYLINE_BROKER_LABEL";

/// What [`activate`](crate::KeyboardEventBroker::activate) does when the
/// broker already holds subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactivationPolicy {
    /// Drop every held subscription, then subscribe again for the slots
    /// registered right now.
    #[default]
    Resubscribe,
    /// Leave existing subscriptions untouched.
    KeepExisting,
}

impl ReactivationPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resubscribe" | "reset" => Some(Self::Resubscribe),
            "keep" | "keep-existing" | "noop" => Some(Self::KeepExisting),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resubscribe => "resubscribe",
            Self::KeepExisting => "keep",
        }
    }
}

impl fmt::Display for ReactivationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrokerConfig {
    /// Behaviour of `activate()` while active.
    pub reactivation: ReactivationPolicy,
    /// Name attached to the broker's log records.
    pub label: Option<String>,
}

impl BrokerConfig {
    /// Set the reactivation policy.
    #[must_use]
    pub fn with_reactivation(mut self, policy: ReactivationPolicy) -> Self {
        self.reactivation = policy;
        self
    }

    /// Set the log label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> BrokerConfigParse {
        from_env_with(|key| env::var(key).ok())
    }
}

/// Configuration parse diagnostics.
#[derive(Debug, Clone)]
pub struct BrokerConfigParse {
    pub config: BrokerConfig,
    pub errors: Vec<BrokerConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: &'static str,
}

impl fmt::Display for BrokerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for BrokerConfigError {}

pub(crate) fn from_env_with<F>(mut get: F) -> BrokerConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = BrokerConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_REACTIVATION) {
        match ReactivationPolicy::parse(&value) {
            Some(policy) => config.reactivation = policy,
            None => errors.push(BrokerConfigError {
                field: "reactivation",
                value,
                message: "expected resubscribe|keep",
            }),
        }
    }

    if let Some(value) = get(ENV_BROKER_LABEL) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(BrokerConfigError {
                field: "label",
                value,
                message: "expected non-empty text",
            });
        } else {
            config.label = Some(trimmed.to_owned());
        }
    }

    BrokerConfigParse { config, errors }
}
