//! Submission of the finished application to the loan-processing backend.
//!
//! The controller only sees the [`SubmissionAdapter`] trait; [`HttpSubmissionAdapter`]
//! is the production implementation and [`LoanApplicationPayload`] is its wire format.

pub mod http;
pub mod payload;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::ApplicationRecord;

pub use http::HttpSubmissionAdapter;
pub use payload::LoanApplicationPayload;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Everything an adapter needs to send one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Wizard session id, sent as the application guid
    pub session_id: String,
    pub record: ApplicationRecord,
}

/// Backend acknowledgement of an accepted application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The backend answered but refused the application
    #[error("Application rejected by backend: {}", .errors.join("; "))]
    Rejected { errors: Vec<String> },

    /// Network, HTTP status or decoding failure
    #[error("Submission transport failed: {message}")]
    Transport { message: String },
}

impl SubmissionFailure {
    pub fn rejected(error: impl Into<String>) -> Self {
        SubmissionFailure::Rejected {
            errors: vec![error.into()],
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SubmissionFailure::Transport {
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SubmissionFailure::Transport { .. })
    }

    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionFailure::Rejected { .. } => "rejected",
            SubmissionFailure::Transport { .. } => "transport",
        }
    }
}

/// Sends the accumulated record to the backend
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SubmissionAdapter: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmissionFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let rejected = SubmissionFailure::rejected("INN mismatch");
        assert!(!rejected.is_transport());
        assert_eq!(rejected.kind(), "rejected");
        assert_eq!(rejected.to_string(), "Application rejected by backend: INN mismatch");

        let transport = SubmissionFailure::transport("connection refused");
        assert!(transport.is_transport());
        assert_eq!(transport.kind(), "transport");
    }

    #[tokio::test]
    async fn test_mock_adapter_returns_receipt() {
        let mut adapter = MockSubmissionAdapter::new();
        adapter.expect_submit().times(1).returning(|_| {
            Ok(SubmissionReceipt {
                request_id: Some("X".to_string()),
            })
        });

        let request = SubmissionRequest {
            session_id: "s-1".to_string(),
            record: ApplicationRecord::new(),
        };
        let receipt = adapter.submit(&request).await.unwrap();
        assert_eq!(receipt.request_id.as_deref(), Some("X"));
    }
}
