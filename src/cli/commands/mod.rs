use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

use loan_wizard::merge::{merge, StepOutput};
use loan_wizard::record::ApplicationRecord;
use loan_wizard::steps::{parse_step_input, FormSettings, StepForm};
use loan_wizard::wizard::WizardStep;
use loan_wizard::WizardConfig;

pub mod apply;
pub mod payload;
pub mod steps;
pub mod validate;

/// Application input read from a JSON file, one object per step
#[derive(Debug, Clone, Default)]
pub struct ApplicationInput {
    steps: BTreeMap<WizardStep, StepOutput>,
}

impl ApplicationInput {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Input file {} is not valid JSON", path.display()))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json
            .as_object()
            .context("Input must be a JSON object keyed by step name")?;

        let mut steps = BTreeMap::new();
        for (name, values) in object {
            let step: WizardStep = name.parse().map_err(anyhow::Error::msg)?;
            steps.insert(step, parse_step_input(step, values)?);
        }
        Ok(Self { steps })
    }

    pub fn step(&self, step: WizardStep) -> StepOutput {
        self.steps.get(&step).cloned().unwrap_or_default()
    }
}

/// Form of `step` after typing the input values into it, as a user would
pub fn fill_form(
    step: WizardStep,
    seed: &ApplicationRecord,
    input: &ApplicationInput,
    settings: &FormSettings,
    today: NaiveDate,
) -> StepForm {
    let mut form = StepForm::open(step, seed, settings.clone(), today);
    form.enter(&input.step(step));
    form
}

/// Record accumulated from every step before `until`
pub fn record_before(
    until: WizardStep,
    input: &ApplicationInput,
    config: &WizardConfig,
    today: NaiveDate,
) -> ApplicationRecord {
    let settings = FormSettings::from(config);
    let mut record = ApplicationRecord::with_defaults(config.credit.default_amount);
    for step in WizardStep::FORM_STEPS.into_iter().filter(|s| *s < until) {
        let form = fill_form(step, &record, input, &settings, today);
        record = merge(&record, &form.output());
    }
    record
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
