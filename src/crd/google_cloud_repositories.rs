//! GoogleCloudSourceRepositoriesSource Custom Resource Definition.
//!
//! Watches a Google Cloud Source Repositories repository for notifications,
//! delivered through a Pub/Sub topic the reconciler provisions. The names of
//! the provisioned topic and subscription are cached on the status and
//! cleared again whenever the subscription is lost.

use std::sync::LazyLock;

use kube::core::GroupVersionKind;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::source::{AdapterOverrides, Destination, EventSource};
use crate::status::{new_source_condition_set, ConditionSet, DependentCondition, SourceStatus};

/// Condition tracking the Pub/Sub subscription backing the source.
pub const GOOGLE_CLOUD_REPO_CONDITION_SUBSCRIBED: &str = "Subscribed";

/// CloudEvent type emitted for repository notifications.
pub const GOOGLE_CLOUD_REPO_EVENT_TYPE: &str = "com.google.cloud.sourcerepo.notification";

static CONDITION_SET: LazyLock<ConditionSet> = LazyLock::new(|| {
    new_source_condition_set([DependentCondition::new(
        GOOGLE_CLOUD_REPO_CONDITION_SUBSCRIBED,
    )])
});

/// GoogleCloudSourceRepositoriesSource receives change notifications from a
/// Cloud Source Repositories repository and delivers them to an event sink.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sources.eventmesh.dev",
    version = "v1alpha1",
    kind = "GoogleCloudSourceRepositoriesSource",
    plural = "googlecloudsourcerepositoriessources",
    status = "GoogleCloudSourceRepositoriesSourceStatus",
    namespaced,
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"Reason", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].reason"}"#,
    printcolumn = r#"{"name":"Sink", "type":"string", "jsonPath":".status.sinkUri"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudSourceRepositoriesSourceSpec {
    /// Full resource name of the repository to watch, e.g.
    /// `projects/my-project/repos/my-repo`.
    pub repository: String,

    /// Destination the notifications are delivered to.
    pub sink: Destination,

    /// Overrides applied to the receive adapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_overrides: Option<AdapterOverrides>,
}

/// Status of a GoogleCloudSourceRepositoriesSource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudSourceRepositoriesSourceStatus {
    /// Generic source status: conditions, observed generation, sink URI.
    #[serde(flatten)]
    pub source: SourceStatus,

    /// Name of the Pub/Sub topic provisioned for repository notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Name of the Pub/Sub subscription the adapter consumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

impl GoogleCloudSourceRepositoriesSourceStatus {
    /// Mark the Subscribed condition True.
    pub fn mark_subscribed(&mut self) -> bool {
        CONDITION_SET
            .manage(&mut self.source)
            .mark_true(GOOGLE_CLOUD_REPO_CONDITION_SUBSCRIBED)
    }

    /// Mark the Subscribed condition False with the given reason and message,
    /// discarding the cached topic and subscription names.
    pub fn mark_not_subscribed(&mut self, reason: &str, message: &str) -> bool {
        self.topic = None;
        self.subscription = None;
        CONDITION_SET.manage(&mut self.source).mark_false(
            GOOGLE_CLOUD_REPO_CONDITION_SUBSCRIBED,
            reason,
            message,
        )
    }
}

impl EventSource for GoogleCloudSourceRepositoriesSource {
    fn group_version_kind() -> GroupVersionKind {
        GroupVersionKind::gvk(
            "sources.eventmesh.dev",
            "v1alpha1",
            "GoogleCloudSourceRepositoriesSource",
        )
    }

    fn condition_set() -> &'static ConditionSet {
        &CONDITION_SET
    }

    fn source_status(&mut self) -> &mut SourceStatus {
        &mut self.status.get_or_insert_with(Default::default).source
    }

    fn sink(&self) -> &Destination {
        &self.spec.sink
    }

    fn as_event_source(&self) -> String {
        self.spec.repository.clone()
    }

    fn event_types(&self) -> Vec<String> {
        vec![GOOGLE_CLOUD_REPO_EVENT_TYPE.to_string()]
    }

    fn adapter_overrides(&self) -> Option<&AdapterOverrides> {
        self.spec.adapter_overrides.as_ref()
    }
}
