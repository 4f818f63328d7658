//! Custom Resource Definitions for eventsource-operator.
//!
//! - `AzureServiceBusSource`: events from an Azure Service Bus queue or topic
//! - `GoogleCloudSourceRepositoriesSource`: repository change notifications
//!
//! Every kind registers its condition set here once at process start; the
//! registry is immutable for the lifetime of the process.

mod azure_service_bus;
mod google_cloud_repositories;
mod source;

pub use azure_service_bus::*;
pub use google_cloud_repositories::*;
pub use source::*;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::status::ConditionSet;

static CONDITION_SETS: LazyLock<BTreeMap<&'static str, &'static ConditionSet>> =
    LazyLock::new(|| {
        BTreeMap::from([
            (
                "AzureServiceBusSource",
                <AzureServiceBusSource as EventSource>::condition_set(),
            ),
            (
                "GoogleCloudSourceRepositoriesSource",
                <GoogleCloudSourceRepositoriesSource as EventSource>::condition_set(),
            ),
        ])
    });

/// Look up the condition set registered for a source kind.
pub fn condition_set_for(kind: &str) -> Option<&'static ConditionSet> {
    CONDITION_SETS.get(kind).copied()
}
