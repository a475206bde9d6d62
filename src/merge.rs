// Step data merging - folds a step's output into the accumulated record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::{ApplicationRecord, FieldValue};

/// Values proposed by a step, either on submit or on backward navigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepOutput {
    values: BTreeMap<String, FieldValue>,
}

impl StepOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.values.insert(field.to_string(), value.into());
    }

    /// Write explicit empty values so stale dependent fields are overwritten on merge
    pub fn clear(&mut self, fields: &[&str]) {
        for field in fields {
            self.values.insert((*field).to_string(), FieldValue::empty());
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for StepOutput {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Shallow overlay of `output` onto `record`.
///
/// Keys present in the output overwrite, absent keys are kept. The input
/// record is never touched, so a discarded edit cannot corrupt saved state.
pub fn merge(record: &ApplicationRecord, output: &StepOutput) -> ApplicationRecord {
    let mut merged = record.clone();
    for (field, value) in output.iter() {
        merged.set(field, value.clone());
    }
    tracing::debug!(
        fields_written = output.len(),
        record_size = merged.len(),
        "Merged step output into application record"
    );
    merged
}
