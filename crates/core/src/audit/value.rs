//! Printable encoding of audit `old_value` / `new_value` payloads.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// A before/after value attached to an audit entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditValue {
    /// Structured data, encoded as canonical JSON (object keys sorted).
    Structured(serde_json::Value),
    /// A point in time, encoded as RFC 3339 with microsecond precision.
    Timestamp(DateTime<Utc>),
    /// Anything else, kept in its printable form.
    Text(String),
}

impl AuditValue {
    /// Builds a structured value from any serializable type.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn structured<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Structured)
    }

    /// Returns the printable encoding stored in the audit log.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Structured(value) => value.to_string(),
            Self::Timestamp(at) => at.to_rfc3339_opts(SecondsFormat::Micros, true),
            Self::Text(text) => text.clone(),
        }
    }

    /// Renders an optional value; `None` stays `None`.
    #[must_use]
    pub fn render_opt(value: Option<&Self>) -> Option<String> {
        value.map(Self::render)
    }
}

impl From<serde_json::Value> for AuditValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

impl From<DateTime<Utc>> for AuditValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

impl From<String> for AuditValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AuditValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
