//! Status persistence for source resources.
//!
//! The condition machinery mutates status in memory and reports whether
//! anything changed; this module is the seam through which a reconciler hands
//! the updated status back to the API server.

use kube::api::{Patch, PatchParams};
use kube::Api;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::Result;

/// Field manager name for the operator
pub const FIELD_MANAGER: &str = "eventsource-operator";

/// Patch a source's status subresource with a merge patch.
///
/// `changed` is the flag returned by the mark operations; when nothing
/// changed the patch is skipped entirely to avoid no-op writes.
pub async fn patch_source_status<K, S>(
    api: &Api<K>,
    name: &str,
    status: &S,
    changed: bool,
) -> Result<()>
where
    K: Clone + DeserializeOwned + std::fmt::Debug,
    S: Serialize,
{
    if !changed {
        debug!(name = %name, "Status unchanged, skipping patch");
        return Ok(());
    }

    let patch = serde_json::json!({ "status": status });
    debug!(name = %name, "Patching source status");
    api.patch_status(
        name,
        &PatchParams::apply(FIELD_MANAGER),
        &Patch::Merge(&patch),
    )
    .await?;

    Ok(())
}
