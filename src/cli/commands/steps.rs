use anyhow::Result;

use loan_wizard::steps::step_fields;
use loan_wizard::wizard::WizardStep;

#[derive(Default)]
pub struct StepsCommand;

impl StepsCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&self) -> Result<()> {
        println!("📋 Loan application steps");
        println!();
        for step in WizardStep::FORM_STEPS {
            let number = step.number().unwrap_or_default();
            let forward = if step.is_final_form_step() {
                "submit → success".to_string()
            } else {
                format!("ADVANCE → {}", WizardStep::FORM_STEPS[usize::from(number)])
            };
            let back = step
                .previous()
                .map(|previous| format!("BACK → {previous}"))
                .unwrap_or_else(|| "no back".to_string());

            println!("  {number}. {:<18} {}", step.as_str(), step.label());
            println!("     {forward}; {back}; {} fields", step_fields(step).len());
        }
        println!();
        println!("  ✅ {}  terminal", WizardStep::Success);
        Ok(())
    }
}
