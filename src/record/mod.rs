// Accumulated application record shared by every wizard step

pub mod fields;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Office picked on the credit parameters step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOffice {
    /// Branch code used by the loan-processing backend
    pub code: String,
    pub region_code: String,
    pub city: String,
    pub short_address: String,
}

/// A single value held by the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Office(SelectedOffice),
}

impl FieldValue {
    /// Explicitly empty value, used when a step clears a dependent field
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Flag(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Office(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<SelectedOffice> for FieldValue {
    fn from(value: SelectedOffice) -> Self {
        FieldValue::Office(value)
    }
}

/// Union of all fields collected across the wizard.
///
/// The controller holds the only authoritative copy and replaces it wholesale
/// with the result of a merge; steps work on clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord {
    values: BTreeMap<String, FieldValue>,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly mounted wizard starts from
    pub fn with_defaults(default_credit_amount: u64) -> Self {
        let mut record = Self::new();
        record.set(fields::CREDIT_AMOUNT, default_credit_amount.to_string());
        record.set(fields::CREDIT_PERIOD, "36");
        record.set(fields::CREDIT_PURPOSE, "22");
        record.set(fields::GENDER, "M");
        record.set(fields::INSURANCE, false);
        record.set(fields::AGREEMENT, false);
        record.set(fields::SURNAME_CHANGED, false);
        record.set(fields::REGISTRATION_AND_LIVING_SAME, false);
        record.set(fields::EXTRA_INCOME, false);
        record
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of a field, empty when unset or not text
    pub fn text(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    /// Flag value of a field, false when unset or not a flag
    pub fn flag(&self, field: &str) -> bool {
        self.values
            .get(field)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    pub fn office(&self) -> Option<&SelectedOffice> {
        match self.values.get(fields::SELECTED_OFFICE) {
            Some(FieldValue::Office(office)) => Some(office),
            _ => None,
        }
    }

    /// True when the field is absent or holds an empty text value
    pub fn is_blank(&self, field: &str) -> bool {
        self.values.get(field).map_or(true, FieldValue::is_empty)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.values.insert(field.to_string(), value.into());
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

impl FromIterator<(String, FieldValue)> for ApplicationRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
