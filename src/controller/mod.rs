//! Controller-facing pieces: the error taxonomy and the status persistence
//! seam. The reconcile loop itself lives in the operator binary; it drives
//! the condition machinery through [`crate::crd::EventSource`].

pub mod error;
pub mod status;

pub use error::{Error, Result};
pub use status::{patch_source_status, FIELD_MANAGER};
