//! AzureServiceBusSource Custom Resource Definition.
//!
//! Connects an Azure Service Bus queue or topic to an event sink. The source
//! is ready once the sink is resolved, the receive adapter is deployed, and
//! the adapter has subscribed to the upstream entity.

use std::sync::LazyLock;

use kube::core::GroupVersionKind;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::source::{AdapterOverrides, Destination, EventSource, ValidationError};
use crate::status::{new_source_condition_set, ConditionSet, DependentCondition, SourceStatus};

/// Condition tracking the adapter's subscription to the queue or topic.
pub const AZURE_SERVICE_BUS_CONDITION_SUBSCRIBED: &str = "Subscribed";

/// CloudEvent type emitted for received Service Bus messages.
pub const AZURE_SERVICE_BUS_EVENT_TYPE: &str = "com.microsoft.azure.servicebus.message";

static CONDITION_SET: LazyLock<ConditionSet> = LazyLock::new(|| {
    new_source_condition_set([DependentCondition::new(
        AZURE_SERVICE_BUS_CONDITION_SUBSCRIBED,
    )])
});

/// AzureServiceBusSource subscribes to messages from an Azure Service Bus
/// queue or topic and delivers them to an event sink.
///
/// Example:
/// ```yaml
/// apiVersion: sources.eventmesh.dev/v1alpha1
/// kind: AzureServiceBusSource
/// metadata:
///   name: orders
/// spec:
///   queueId: /subscriptions/s/resourceGroups/rg/providers/Microsoft.ServiceBus/namespaces/ns/queues/orders
///   sink:
///     ref:
///       apiVersion: eventing.knative.dev/v1
///       kind: Broker
///       name: default
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sources.eventmesh.dev",
    version = "v1alpha1",
    kind = "AzureServiceBusSource",
    plural = "azureservicebussources",
    status = "AzureServiceBusSourceStatus",
    namespaced,
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"Reason", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].reason"}"#,
    printcolumn = r#"{"name":"Sink", "type":"string", "jsonPath":".status.sinkUri"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AzureServiceBusSourceSpec {
    /// Resource ID of the Service Bus topic to subscribe to.
    /// Exactly one of topicId or queueId must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,

    /// Resource ID of the Service Bus queue to subscribe to.
    /// Exactly one of topicId or queueId must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<String>,

    /// Destination the received events are delivered to.
    pub sink: Destination,

    /// Overrides applied to the receive adapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_overrides: Option<AdapterOverrides>,
}

/// Status of an AzureServiceBusSource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureServiceBusSourceStatus {
    /// Generic source status: conditions, observed generation, sink URI.
    #[serde(flatten)]
    pub source: SourceStatus,
}

impl AzureServiceBusSourceStatus {
    /// Mark the Subscribed condition True.
    pub fn mark_subscribed(&mut self) -> bool {
        CONDITION_SET
            .manage(&mut self.source)
            .mark_true(AZURE_SERVICE_BUS_CONDITION_SUBSCRIBED)
    }

    /// Mark the Subscribed condition True while recording a noteworthy
    /// reason, e.g. when an existing subscription was adopted.
    pub fn mark_subscribed_with_reason(&mut self, reason: &str, message: &str) -> bool {
        CONDITION_SET.manage(&mut self.source).mark_true_with_reason(
            AZURE_SERVICE_BUS_CONDITION_SUBSCRIBED,
            reason,
            message,
        )
    }

    /// Mark the Subscribed condition False with the given reason and message.
    pub fn mark_not_subscribed(&mut self, reason: &str, message: &str) -> bool {
        CONDITION_SET.manage(&mut self.source).mark_false(
            AZURE_SERVICE_BUS_CONDITION_SUBSCRIBED,
            reason,
            message,
        )
    }
}

impl EventSource for AzureServiceBusSource {
    fn group_version_kind() -> GroupVersionKind {
        GroupVersionKind::gvk("sources.eventmesh.dev", "v1alpha1", "AzureServiceBusSource")
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
        self.spec
            .topic_id
            .as_deref()
            .or(self.spec.queue_id.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    fn event_types(&self) -> Vec<String> {
        vec![AZURE_SERVICE_BUS_EVENT_TYPE.to_string()]
    }

    fn adapter_overrides(&self) -> Option<&AdapterOverrides> {
        self.spec.adapter_overrides.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match (&self.spec.topic_id, &self.spec.queue_id) {
            (None, None) => Err(ValidationError::MissingField("topicId or queueId")),
            (Some(_), Some(_)) => Err(ValidationError::Invalid(
                "topicId and queueId are mutually exclusive".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
