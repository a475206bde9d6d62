// Loan Wizard Library - multi-step loan application orchestration
// This exposes the core components for testing and integration

pub mod config;
pub mod merge;
pub mod observability;
pub mod record;
pub mod resume;
pub mod session;
pub mod steps;
pub mod submission;
pub mod telemetry;
pub mod validation;
pub mod wizard;

// Re-export key types for easy access
pub use config::{config, init_config, WizardConfig};
pub use merge::{merge, StepOutput};
pub use observability::{wizard_metrics, OperationTimer, WizardMetrics};
pub use record::{ApplicationRecord, FieldValue, SelectedOffice};
pub use resume::{MemoryResumeStore, ResumeStore};
pub use session::{ContactDetails, SessionEvents, TracingSessionEvents};
pub use steps::{FormSettings, StepForm, StepSubmission};
pub use submission::{
    HttpSubmissionAdapter, LoanApplicationPayload, SubmissionAdapter, SubmissionFailure,
    SubmissionReceipt, SubmissionRequest,
};
pub use telemetry::{create_wizard_span, generate_correlation_id, init_telemetry};
pub use validation::{validate, ValidationError, ValidationReport};
pub use wizard::{
    StepOutcome, StepTransition, WizardController, WizardDeps, WizardError, WizardEvent,
    WizardStateMachine, WizardStep,
};
