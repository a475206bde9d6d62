// Session and analytics notifications emitted by the wizard controller

use serde::Serialize;
use tracing::{error, info, warn};

use crate::submission::{SubmissionFailure, SubmissionReceipt};
use crate::validation::format::{remove_mask, split_full_name};
use crate::wizard::WizardStep;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Contact data pushed to the session once the first step is completed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    /// Digits only
    pub phone: String,
    pub email: String,
}

impl ContactDetails {
    pub fn new(full_name: &str, phone: &str, email: &str) -> Self {
        let parts = split_full_name(full_name);
        Self {
            surname: parts.surname,
            name: parts.name,
            patronymic: parts.patronymic,
            phone: remove_mask(phone),
            email: email.trim().to_string(),
        }
    }
}

/// Fire-and-forget session tracking.
///
/// Implementations must not block; the controller ignores whatever they do.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait SessionEvents: Send + Sync {
    fn wizard_mounted(&self, session_id: &str);
    fn interaction_started(&self, session_id: &str);
    fn step_completed(&self, session_id: &str, step: WizardStep);
    fn validation_failed(&self, session_id: &str, step: WizardStep);
    fn contact_updated(&self, session_id: &str, contact: &ContactDetails);
    fn submitted(&self, session_id: &str, receipt: &SubmissionReceipt);
    fn submission_failed(&self, session_id: &str, failure: &SubmissionFailure);
}

/// Reports session events as structured log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSessionEvents;

impl SessionEvents for TracingSessionEvents {
    fn wizard_mounted(&self, session_id: &str) {
        info!(session_id, "Loan wizard mounted");
    }

    fn interaction_started(&self, session_id: &str) {
        info!(session_id, "Form interaction started");
    }

    fn step_completed(&self, session_id: &str, step: WizardStep) {
        info!(session_id, step = %step, "Step completed");
    }

    fn validation_failed(&self, session_id: &str, step: WizardStep) {
        info!(session_id, step = %step, "Step submitted with validation errors");
    }

    fn contact_updated(&self, session_id: &str, contact: &ContactDetails) {
        info!(session_id, surname = %contact.surname, "Session contact updated");
    }

    fn submitted(&self, session_id: &str, receipt: &SubmissionReceipt) {
        info!(session_id, request_id = ?receipt.request_id, "Loan application accepted");
    }

    fn submission_failed(&self, session_id: &str, failure: &SubmissionFailure) {
        match failure {
            SubmissionFailure::Rejected { errors } => {
                warn!(session_id, errors = ?errors, "Loan application rejected")
            }
            SubmissionFailure::Transport { message } => {
                error!(session_id, error = %message, "Loan application could not be sent")
            }
        }
    }
}
