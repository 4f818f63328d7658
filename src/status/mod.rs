//! Status machinery shared by every source kind.
//!
//! Each source CRD embeds a [`SourceStatus`] (flattened into its own status
//! struct) and registers a [`ConditionSet`] describing which conditions must
//! hold for the resource to be `Ready`. A [`StatusManager`] ties the two
//! together so the generic reconciler can mark conditions without knowing the
//! concrete kind.

mod condition;
mod condition_set;

pub use condition::{Condition, ConditionSeverity, ConditionStatus};
pub use condition_set::{ConditionManager, ConditionSet, DependentCondition};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The happy condition type shared by all source kinds.
pub const CONDITION_READY: &str = "Ready";

/// Condition tracking whether the event sink was resolved to a URI.
pub const CONDITION_SINK_PROVIDED: &str = "SinkProvided";

/// Condition tracking whether the receive adapter is deployed and available.
pub const CONDITION_DEPLOYED: &str = "Deployed";

/// Build the condition set for a source kind: `Ready` derived from
/// `SinkProvided`, `Deployed`, and any kind-specific dependents appended in
/// the given order.
pub fn new_source_condition_set(
    extra: impl IntoIterator<Item = DependentCondition>,
) -> ConditionSet {
    let mut dependents = vec![
        DependentCondition::new(CONDITION_SINK_PROVIDED),
        DependentCondition::new(CONDITION_DEPLOYED),
    ];
    dependents.extend(extra);
    ConditionSet::new(CONDITION_READY, dependents)
}

/// A CloudEvent attribute pair advertised by a source: the event type it can
/// emit and the source string stamped on those events.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudEventAttribute {
    /// CloudEvent `type` attribute.
    pub r#type: String,
    /// CloudEvent `source` attribute.
    pub source: String,
}

/// Generic status holder embedded by every source kind's status struct.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    /// Conditions describing the current state, sorted by type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// The generation most recently observed by the controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// URI of the resolved event sink, set while `SinkProvided` is True.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_uri: Option<String>,

    /// CloudEvent attributes this source can emit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cloud_event_attributes: Vec<CloudEventAttribute>,
}

/// Per-resource adapter binding a source's generic status holder to its
/// kind's condition set.
///
/// Holds no logic of its own beyond the common mark helpers; its purpose is
/// to give the generic reconciler one handle that works for every kind.
pub struct StatusManager<'a> {
    /// The kind's registered condition set.
    pub condition_set: &'static ConditionSet,
    /// The resource's live generic status.
    pub status: &'a mut SourceStatus,
}

impl StatusManager<'_> {
    /// Bind a [`ConditionManager`] to the resource's conditions.
    pub fn manager(&mut self) -> ConditionManager<'_> {
        self.condition_set.manage(self.status)
    }

    /// Materialize all declared conditions as `Unknown`.
    pub fn initialize_conditions(&mut self) {
        self.manager().initialize_conditions();
    }

    /// Whether the resource's happy condition is `True`.
    pub fn is_happy(&self) -> bool {
        self.status
            .conditions
            .iter()
            .find(|c| c.r#type == self.condition_set.happy_type())
            .is_some_and(Condition::is_true)
    }

    /// Record the resolved sink URI and mark `SinkProvided` True.
    pub fn mark_sink(&mut self, uri: &str) -> bool {
        self.status.sink_uri = Some(uri.to_string());
        self.manager().mark_true(CONDITION_SINK_PROVIDED)
    }

    /// Clear the cached sink URI and mark `SinkProvided` False.
    pub fn mark_no_sink(&mut self, reason: &str, message: &str) -> bool {
        self.status.sink_uri = None;
        self.manager()
            .mark_false(CONDITION_SINK_PROVIDED, reason, message)
    }

    /// Mark the receive adapter as deployed and available.
    pub fn mark_deployed(&mut self) -> bool {
        self.manager().mark_true(CONDITION_DEPLOYED)
    }

    /// Mark the receive adapter as unavailable.
    pub fn mark_not_deployed(&mut self, reason: &str, message: &str) -> bool {
        self.manager().mark_false(CONDITION_DEPLOYED, reason, message)
    }

    /// Replace the advertised CloudEvent attributes with one entry per event
    /// type, all stamped with the given source string.
    pub fn set_cloud_event_attributes(&mut self, source: &str, event_types: &[String]) {
        self.status.cloud_event_attributes = event_types
            .iter()
            .map(|t| CloudEventAttribute {
                r#type: t.clone(),
                source: source.to_string(),
            })
            .collect();
    }
}
