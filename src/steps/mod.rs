//! Step-local form state.
//!
//! Each step works on a private copy of the application record. Edits,
//! touched-field tracking and validation live on the [`StepForm`] instance,
//! so two wizards never share form state. The step proposes its output to the
//! controller only on submit or backward navigation.

pub mod credit;
pub mod income;
pub mod passport;
pub mod personal;

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::config::CreditConfig;
use crate::merge::StepOutput;
use crate::record::{fields, ApplicationRecord, FieldValue, SelectedOffice};
use crate::validation::{validate, RuleSet, ValidationError, ValidationReport};
use crate::wizard::WizardStep;

/// Settings the step rules and derived fields depend on
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub credit: CreditConfig,
}

impl From<&crate::config::WizardConfig> for FormSettings {
    fn from(config: &crate::config::WizardConfig) -> Self {
        Self {
            credit: config.credit.clone(),
        }
    }
}

/// What a step hands to the controller when the user presses "next"
#[derive(Debug, Clone, PartialEq)]
pub struct StepSubmission {
    pub step: WizardStep,
    pub output: StepOutput,
    /// Result of the step's own validation; the controller trusts it
    pub valid: bool,
}

/// Fields collected by a step
pub fn step_fields(step: WizardStep) -> &'static [&'static str] {
    match step {
        WizardStep::PersonalInfo => personal::FIELDS,
        WizardStep::CreditParameters => credit::FIELDS,
        WizardStep::PassportInfo => passport::FIELDS,
        WizardStep::IncomeInfo => income::FIELDS,
        WizardStep::Success => &[],
    }
}

/// Parse externally supplied values of one step, e.g. from a JSON input file
pub fn parse_step_input(step: WizardStep, input: &serde_json::Value) -> Result<StepOutput, ValidationError> {
    let object = input
        .as_object()
        .ok_or(ValidationError::NotAnObject { step })?;
    let allowed = step_fields(step);

    object
        .iter()
        .map(|(field, value)| {
            if !allowed.contains(&field.as_str()) {
                return Err(ValidationError::UnknownField {
                    step,
                    field: field.clone(),
                });
            }
            let value = match value {
                serde_json::Value::Bool(flag) => FieldValue::Flag(*flag),
                serde_json::Value::String(text) => FieldValue::Text(text.clone()),
                serde_json::Value::Number(number) => FieldValue::Text(number.to_string()),
                serde_json::Value::Null => FieldValue::empty(),
                serde_json::Value::Object(_) if field == fields::SELECTED_OFFICE => {
                    let office: SelectedOffice = serde_json::from_value(value.clone()).map_err(|e| {
                        ValidationError::InvalidValue {
                            field: field.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    FieldValue::Office(office)
                }
                _ => {
                    return Err(ValidationError::InvalidValue {
                        field: field.clone(),
                        reason: "expected text, number or boolean".to_string(),
                    })
                }
            };
            Ok((field.clone(), value))
        })
        .collect()
}

/// Rule set of a step
pub fn step_rules(step: WizardStep, settings: &FormSettings) -> RuleSet {
    match step {
        WizardStep::PersonalInfo => personal::rules(),
        WizardStep::CreditParameters => credit::rules(settings),
        WizardStep::PassportInfo => passport::rules(),
        WizardStep::IncomeInfo => income::rules(),
        WizardStep::Success => RuleSet::new(),
    }
}

/// Local working state of the active step
#[derive(Debug, Clone)]
pub struct StepForm {
    step: WizardStep,
    values: ApplicationRecord,
    touched: BTreeSet<String>,
    rules: RuleSet,
    settings: FormSettings,
    report: ValidationReport,
    today: NaiveDate,
}

impl StepForm {
    /// Open a step seeded with a copy of the accumulated record
    pub fn open(
        step: WizardStep,
        seed: &ApplicationRecord,
        settings: FormSettings,
        today: NaiveDate,
    ) -> Self {
        let rules = step_rules(step, &settings);
        let mut values = seed.clone();
        if step == WizardStep::CreditParameters {
            credit::recalculate(&mut values, &settings.credit);
        }
        let report = validate(&values, &rules, today);

        // Fields already answered on earlier visits show their state right away;
        // an unset flag counts as unanswered
        let touched = rules
            .fields()
            .filter(|field| is_answered(seed.get(field)))
            .map(str::to_string)
            .collect();

        Self {
            step,
            values,
            touched,
            rules,
            settings,
            report,
            today,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn values(&self) -> &ApplicationRecord {
        &self.values
    }

    pub fn text(&self, field: &str) -> &str {
        self.values.text(field)
    }

    pub fn flag(&self, field: &str) -> bool {
        self.values.flag(field)
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Error shown next to a field; hidden until the field has been touched
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if !self.is_touched(field) {
            return None;
        }
        self.report.message(field)
    }

    /// Change a field as the user would, applying the step's dependent updates
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.apply(field, value.into());
        self.touch(field);
        self.revalidate();
    }

    /// Set several fields at once, as an autocomplete selection does
    pub fn set_many<I, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<FieldValue>,
    {
        for (field, value) in entries {
            self.apply(field, value.into());
            self.touched.insert(field.to_string());
        }
        self.revalidate();
    }

    /// Type a batch of values in the step's field order, so dependent
    /// updates run the way they do for a user filling the form top to bottom
    pub fn enter(&mut self, values: &StepOutput) {
        for field in step_fields(self.step) {
            if let Some(value) = values.get(field) {
                self.set(field, value.clone());
            }
        }
    }

    pub fn touch(&mut self, field: &str) {
        self.touched.insert(field.to_string());
    }

    /// Values this step proposes, including explicitly cleared fields
    pub fn output(&self) -> StepOutput {
        step_fields(self.step)
            .iter()
            .filter_map(|field| {
                self.values
                    .get(field)
                    .map(|value| ((*field).to_string(), value.clone()))
            })
            .collect()
    }

    /// Submit attempt: touches every field, validates, and packages the output
    pub fn submit(&mut self) -> StepSubmission {
        let fields: Vec<String> = self.rules.fields().map(str::to_string).collect();
        self.touched.extend(fields);
        self.revalidate();

        if !self.report.is_valid() {
            tracing::debug!(
                step = %self.step,
                errors = self.report.errors().count(),
                "Step validation failed on submit"
            );
        }

        StepSubmission {
            step: self.step,
            output: self.output(),
            valid: self.report.is_valid(),
        }
    }

    fn apply(&mut self, field: &str, value: FieldValue) {
        self.values.set(field, value);
        match self.step {
            WizardStep::PersonalInfo => {}
            WizardStep::CreditParameters => credit::react(&mut self.values, field, &self.settings.credit),
            WizardStep::PassportInfo => passport::react(&mut self.values, field),
            WizardStep::IncomeInfo => income::react(&mut self.values, field),
            WizardStep::Success => {}
        }
    }

    fn revalidate(&mut self) {
        self.report = validate(&self.values, &self.rules, self.today);
    }
}

fn is_answered(value: Option<&FieldValue>) -> bool {
    match value {
        Some(FieldValue::Flag(flag)) => *flag,
        Some(other) => !other.is_empty(),
        None => false,
    }
}

/// Write explicit empty values for every listed field
pub(crate) fn clear_fields(values: &mut ApplicationRecord, fields: &[&str]) {
    for field in fields {
        values.set(field, FieldValue::empty());
    }
}
