use anyhow::{bail, Result};
use std::path::PathBuf;

use loan_wizard::steps::FormSettings;
use loan_wizard::wizard::WizardStep;
use loan_wizard::WizardConfig;

use super::{fill_form, record_before, today, ApplicationInput};

pub struct ValidateCommand {
    step: WizardStep,
    input: PathBuf,
    config: WizardConfig,
}

impl ValidateCommand {
    pub fn new(step: &str, input: PathBuf, config: WizardConfig) -> Result<Self> {
        let step: WizardStep = step.parse().map_err(anyhow::Error::msg)?;
        if step == WizardStep::Success {
            bail!("The success screen has no fields to validate");
        }
        Ok(Self { step, input, config })
    }

    pub async fn execute(&self) -> Result<()> {
        let input = ApplicationInput::from_file(&self.input)?;
        let today = today();
        let seed = record_before(self.step, &input, &self.config, today);

        let mut form = fill_form(self.step, &seed, &input, &FormSettings::from(&self.config), today);
        let submission = form.submit();

        if submission.valid {
            println!("✅ {} is valid", self.step);
            return Ok(());
        }

        println!("❌ {} has invalid fields:", self.step);
        let errors: Vec<_> = form.report().errors().collect();
        for (field, message) in &errors {
            println!("   {field}: {message}");
        }
        bail!("{} invalid field(s) in {}", errors.len(), self.step)
    }
}
