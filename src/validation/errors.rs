use thiserror::Error;

use crate::wizard::WizardStep;

/// Malformed field input handed to a step from outside the wizard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input for step {step} must be an object of field values")]
    NotAnObject { step: WizardStep },

    #[error("Field '{field}' is not collected by step {step}")]
    UnknownField { step: WizardStep, field: String },

    #[error("Field '{field}' has an unsupported value: {reason}")]
    InvalidValue { field: String, reason: String },
}
