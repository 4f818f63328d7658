//! Error types for source reconcilers.
//!
//! Classifies errors for retry behavior. Domain failures (a subscription
//! attempt that fails, a sink that cannot be resolved) are not errors at this
//! level: the reconciler records them on the resource via `mark_false` and
//! the condition machinery surfaces them upstream.

use std::time::Duration;

use thiserror::Error;

use crate::crd::ValidationError;

/// Error type for source reconciler operations
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The source spec failed kind-specific validation
    #[error("invalid source: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error indicates a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(e)) if e.code == 404)
    }

    /// Check if this error should be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Kube(e) => {
                matches!(
                    e,
                    kube::Error::Api(api_err) if api_err.code >= 500 || api_err.code == 429
                ) || matches!(e, kube::Error::Service(_))
            }
            // A spec that fails validation stays invalid until edited.
            Error::Validation(_) => false,
            Error::Serialization(_) => false,
        }
    }

    /// Get the recommended requeue duration for this error
    pub fn requeue_after(&self) -> Duration {
        if self.is_retryable() {
            Duration::from_secs(30)
        } else {
            Duration::from_secs(3600)
        }
    }
}

/// Result type alias for source reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_not_retryable() {
        let err = Error::Validation(ValidationError::MissingField("sink"));
        assert!(!err.is_retryable());
        assert!(!err.is_not_found());
        assert_eq!(err.requeue_after(), Duration::from_secs(3600));
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation(ValidationError::Invalid(
            "topicId and queueId are mutually exclusive".to_string(),
        ));
        assert!(err.to_string().contains("mutually exclusive"));
    }
}
