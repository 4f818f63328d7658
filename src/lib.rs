//! eventsource-operator library crate
//!
//! Manages the lifecycle status of event source custom resources: each kind
//! connects an external event-producing system (an Azure Service Bus queue, a
//! Cloud Source Repositories repository) to an event sink, and all kinds
//! report readiness through the same condition machinery.
//!
//! The crate is organized around three layers:
//!
//! - [`status`]: the condition-set state machine. A per-kind
//!   [`status::ConditionSet`] declares which conditions must be `True` for a
//!   resource to be `Ready`; a [`status::ConditionManager`] mutates one
//!   resource's conditions and recomputes readiness after every change.
//! - [`crd`]: the source kinds themselves, each implementing the
//!   [`crd::EventSource`] capability trait the generic reconciler consumes.
//! - [`controller`]: the error taxonomy and the status persistence seam used
//!   by the reconcile loop in the operator binary.

pub mod controller;
pub mod crd;
pub mod status;

pub use crd::{condition_set_for, EventSource};
pub use status::{Condition, ConditionManager, ConditionSet, ConditionStatus, StatusManager};
