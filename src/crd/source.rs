//! The capability contract every source kind implements, plus the duck types
//! shared by their specs.
//!
//! The generic reconciler is written once against [`EventSource`] and never
//! against concrete kinds: it resolves the sink, deploys the adapter, and
//! marks conditions through the [`StatusManager`] handle each kind exposes.

use std::collections::BTreeMap;

use kube::core::GroupVersionKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::{ConditionSet, SourceStatus, StatusManager};

/// Error returned by kind-specific spec validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field or combination of fields is invalid.
    #[error("invalid spec: {0}")]
    Invalid(String),
}

/// Reference to a Kubernetes object that can receive events, in the
/// apiVersion/kind/name form used by addressable resolvers.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KReference {
    /// API version of the referent.
    pub api_version: String,
    /// Kind of the referent.
    pub kind: String,
    /// Name of the referent.
    pub name: String,
    /// Namespace of the referent. Defaults to the source's namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Destination of the events emitted by a source: either an addressable
/// object reference or a literal URI.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Reference to an addressable object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#ref: Option<KReference>,

    /// Literal sink URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Destination {
    /// Whether the destination names anything at all.
    pub fn is_empty(&self) -> bool {
        self.r#ref.is_none() && self.uri.is_none()
    }
}

/// A name/value environment variable passed to the receive adapter.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

/// User overrides applied to the receive adapter the reconciler deploys for
/// a source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterOverrides {
    /// Expose the adapter outside the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,

    /// Number of adapter replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Additional labels for the adapter workload.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Additional annotations for the adapter workload.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Extra environment variables for the adapter container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// Uniform capability set implemented by every source kind and consumed by
/// the generic reconciler.
pub trait EventSource {
    /// Group/version/kind of this source, for owner references and events.
    fn group_version_kind() -> GroupVersionKind;

    /// The kind's registered condition set.
    fn condition_set() -> &'static ConditionSet;

    /// The resource's generic status holder, created empty on first access.
    fn source_status(&mut self) -> &mut SourceStatus;

    /// A status manager bound to this resource.
    fn status_manager(&mut self) -> StatusManager<'_> {
        StatusManager {
            condition_set: Self::condition_set(),
            status: self.source_status(),
        }
    }

    /// The destination events are delivered to.
    fn sink(&self) -> &Destination;

    /// Human-readable identifier of the upstream system this source connects
    /// to, stamped as the CloudEvent `source` attribute.
    fn as_event_source(&self) -> String;

    /// The CloudEvent types this source can emit.
    fn event_types(&self) -> Vec<String>;

    /// Optional adapter configuration overrides.
    fn adapter_overrides(&self) -> Option<&AdapterOverrides>;

    /// Apply kind-specific defaults to the spec. Most kinds need none.
    fn set_defaults(&mut self) {}

    /// Validate the kind-specific spec. Most kinds accept any well-typed
    /// spec, so the default accepts everything.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_empty() {
        assert!(Destination::default().is_empty());

        let dest = Destination {
            uri: Some("http://broker.default.svc/".to_string()),
            r#ref: None,
        };
        assert!(!dest.is_empty());
    }

    #[test]
    fn test_destination_serialization() {
        let dest = Destination {
            r#ref: Some(KReference {
                api_version: "eventing.knative.dev/v1".to_string(),
                kind: "Broker".to_string(),
                name: "default".to_string(),
                namespace: None,
            }),
            uri: None,
        };
        let json = serde_json::to_value(&dest).expect("serialization should succeed");
        assert_eq!(json["ref"]["kind"], "Broker");
        assert!(json.get("uri").is_none());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingField("sink");
        assert_eq!(err.to_string(), "missing required field: sink");
    }
}
