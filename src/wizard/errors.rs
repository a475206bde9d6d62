use thiserror::Error;

use super::types::WizardStep;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Cannot jump from {from} to {to}: only earlier steps can be revisited")]
    InvalidJump { from: WizardStep, to: WizardStep },

    #[error("A submission is pending; navigation is locked until it settles")]
    SubmissionPending,

    #[error("The application has already been submitted")]
    Completed,
}
