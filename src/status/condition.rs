//! Condition value types shared by all source kinds.
//!
//! A [`Condition`] is the latest observation of one aspect of a resource's
//! state ("has the adapter subscribed?", "is the sink resolved?"). Conditions
//! carry no history; only the most recent value of each type is kept.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Status of a condition ("True", "False", "Unknown").
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// Whether this status is `True`.
    pub fn is_true(self) -> bool {
        self == ConditionStatus::True
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Severity of a condition.
///
/// Only `Error`-severity dependents block the aggregate readiness condition;
/// `Warning` and `Info` conditions are advisory.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize, JsonSchema)]
pub enum ConditionSeverity {
    #[default]
    Error,
    Warning,
    Info,
}

impl ConditionSeverity {
    fn is_error(&self) -> bool {
        *self == ConditionSeverity::Error
    }
}

/// Condition describes the state of one aspect of a resource at a certain
/// point in time.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition, unique within a resource's condition list.
    pub r#type: String,

    /// Status of the condition.
    pub status: ConditionStatus,

    /// Severity with which to treat failures of this condition.
    /// Omitted from output for the default (`Error`).
    #[serde(default, skip_serializing_if = "ConditionSeverity::is_error")]
    pub severity: ConditionSeverity,

    /// Machine-readable reason for the condition's last transition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Human-readable message indicating details about the last transition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Last time the condition transitioned from one status to another.
    /// Not updated when only reason or message change.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_transition_time: String,
}

impl Condition {
    /// Create a new condition stamped with the current time.
    pub fn new(
        condition_type: &str,
        status: ConditionStatus,
        severity: ConditionSeverity,
        reason: &str,
        message: &str,
    ) -> Self {
        Self {
            r#type: condition_type.to_string(),
            status,
            severity,
            reason: reason.to_string(),
            message: message.to_string(),
            last_transition_time: Timestamp::now().to_string(),
        }
    }

    /// Create an `Unknown` condition with empty reason and message.
    pub fn unknown(condition_type: &str, severity: ConditionSeverity) -> Self {
        Self::new(condition_type, ConditionStatus::Unknown, severity, "", "")
    }

    /// Whether the condition's status is `True`.
    pub fn is_true(&self) -> bool {
        self.status.is_true()
    }

    /// Whether the condition's status is `False`.
    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }

    /// Whether the condition's status is `Unknown`.
    pub fn is_unknown(&self) -> bool {
        self.status == ConditionStatus::Unknown
    }

    /// Whether `other` carries the same observable state, ignoring the
    /// transition timestamp. Used to detect no-op updates.
    pub fn same_state(&self, other: &Condition) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.severity == other.severity
            && self.reason == other.reason
            && self.message == other.message
    }
}
