// Wizard orchestration: step graph, transitions and the controller that owns the record

pub mod controller;
pub mod errors;
pub mod state_machine;
pub mod types;

pub use controller::{ActiveStep, StepOutcome, WizardController, WizardDeps};
pub use errors::WizardError;
pub use state_machine::{WizardContext, WizardStateMachine};
pub use types::{EventOutcome, ProgressItem, StepTransition, WizardEvent, WizardStep};
