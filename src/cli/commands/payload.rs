use anyhow::Result;
use std::path::PathBuf;

use loan_wizard::submission::{LoanApplicationPayload, SubmissionRequest};
use loan_wizard::telemetry::generate_correlation_id;
use loan_wizard::wizard::WizardStep;
use loan_wizard::WizardConfig;

use super::{record_before, today, ApplicationInput};

pub struct PayloadCommand {
    input: PathBuf,
    config: WizardConfig,
}

impl PayloadCommand {
    pub fn new(input: PathBuf, config: WizardConfig) -> Self {
        Self { input, config }
    }

    pub async fn execute(&self) -> Result<()> {
        let input = ApplicationInput::from_file(&self.input)?;
        // Every form step lies before the success screen
        let record = record_before(WizardStep::Success, &input, &self.config, today());

        let request = SubmissionRequest {
            session_id: generate_correlation_id(),
            record,
        };
        let payload = LoanApplicationPayload::from_record(&request, &self.config);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }
}
