use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;

use loan_wizard::observability::wizard_metrics;
use loan_wizard::resume::MemoryResumeStore;
use loan_wizard::session::TracingSessionEvents;
use loan_wizard::submission::HttpSubmissionAdapter;
use loan_wizard::wizard::{StepOutcome, WizardController, WizardDeps, WizardStep};
use loan_wizard::WizardConfig;

use super::ApplicationInput;

pub struct ApplyCommand {
    input: PathBuf,
    config: WizardConfig,
}

impl ApplyCommand {
    pub fn new(input: PathBuf, config: WizardConfig) -> Self {
        Self { input, config }
    }

    pub async fn execute(&self) -> Result<()> {
        let input = ApplicationInput::from_file(&self.input)?;
        let adapter = HttpSubmissionAdapter::new(self.config.clone())?;
        let deps = WizardDeps::new(
            self.config.clone(),
            Arc::new(adapter),
            Arc::new(TracingSessionEvents),
        )
        .with_resume_store(Arc::new(MemoryResumeStore::from_config(&self.config.resume)));

        let controller = WizardController::mount(deps).await;
        controller.start_interaction().await;
        println!("🚀 Loan application session {}", controller.session_id());

        loop {
            let mut form = controller.open_step().await;
            let step = form.step();
            if step == WizardStep::Success {
                break;
            }

            form.enter(&input.step(step));

            match controller.submit_step(form.submit()).await {
                StepOutcome::Advanced(transition) => {
                    println!("  ✅ {} → {}", transition.from, transition.to);
                }
                StepOutcome::Submitted(receipt) => {
                    println!("  ✅ {step} submitted");
                    println!();
                    println!(
                        "🎉 Application accepted, request id: {}",
                        receipt.request_id.as_deref().unwrap_or("(none)")
                    );
                }
                StepOutcome::Invalid => {
                    println!("  ❌ {step} has invalid fields:");
                    for (field, message) in form.report().errors() {
                        println!("     {field}: {message}");
                    }
                    bail!("Fix the input for {step} and try again");
                }
                StepOutcome::Failed(failure) => {
                    println!("  ❌ Submission failed: {failure}");
                    bail!(failure);
                }
                StepOutcome::Ignored | StepOutcome::Pending => {
                    bail!("Wizard did not accept the {step} submission");
                }
            }
        }

        wizard_metrics().log_stats();
        Ok(())
    }
}
