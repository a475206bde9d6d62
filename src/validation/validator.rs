use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::format;
use super::rules::{Check, Rule, RuleSet};
use crate::record::{ApplicationRecord, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatus {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldStatus {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            valid: false,
            message: Some(message),
        }
    }
}

/// Outcome of validating a step's values against its rule set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    fields: BTreeMap<String, FieldStatus>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|s| s.valid)
    }

    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.fields.get(field)
    }

    pub fn is_field_valid(&self, field: &str) -> bool {
        self.fields.get(field).map_or(true, |s| s.valid)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|s| s.message.as_deref())
    }

    /// Failing fields with their messages
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|(field, status)| {
            status
                .message
                .as_deref()
                .filter(|_| !status.valid)
                .map(|m| (field.as_str(), m))
        })
    }
}

/// Validate every field of `rules` against `values`.
///
/// Pure: the same values, rules and date always yield the same report.
pub fn validate(values: &ApplicationRecord, rules: &RuleSet, today: NaiveDate) -> ValidationReport {
    let fields = rules
        .rules()
        .iter()
        .map(|field_rule| {
            let rule = field_rule.effective(values);
            (
                field_rule.field.to_string(),
                validate_field(field_rule.field, rule, values, today),
            )
        })
        .collect();
    ValidationReport { fields }
}

fn validate_field(
    field: &str,
    rule: &Rule,
    values: &ApplicationRecord,
    today: NaiveDate,
) -> FieldStatus {
    let value = values.get(field);
    let blank = value.map_or(true, FieldValue::is_empty);
    let text = values.text(field);

    for rule_check in &rule.checks {
        let passed = match &rule_check.check {
            Check::Required => !blank,
            Check::MustBeTrue => values.flag(field),
            // Remaining checks only constrain values that are present
            _ if blank => true,
            check => passes(check, text, values, today),
        };
        if !passed {
            let message = rule_check
                .message
                .clone()
                .unwrap_or_else(|| rule_check.check.default_message());
            return FieldStatus::failed(message);
        }
    }
    FieldStatus::ok()
}

fn passes(check: &Check, text: &str, values: &ApplicationRecord, today: NaiveDate) -> bool {
    match check {
        Check::Required | Check::MustBeTrue => true,
        Check::MinLength(n) => text.trim().chars().count() >= *n,
        Check::MaxLength(n) => text.chars().count() <= *n,
        Check::Email => format::is_email(text),
        Check::Phone => format::is_phone(text),
        Check::FullName => format::is_full_name(text),
        Check::Date => format::parse_date(text).is_some(),
        Check::DateNotAfter(bound) => match (format::parse_date(text), bound.resolve(values, today)) {
            (Some(date), Some(limit)) => date <= limit,
            (None, _) => false,
            (_, None) => true,
        },
        Check::DateNotBefore(bound) => match (format::parse_date(text), bound.resolve(values, today)) {
            (Some(date), Some(limit)) => date >= limit,
            (None, _) => false,
            (_, None) => true,
        },
        Check::OneOf(options) => options.contains(&text),
        Check::NotOneOf(options) => !options.contains(&text),
        Check::NotEqualToField(other) => {
            let other = values.text(other);
            other.is_empty() || format::remove_mask(text) != format::remove_mask(other)
        }
        Check::NoLatin => !format::has_latin(text),
        Check::MinAmount(min) => format::parse_amount(text).is_some_and(|amount| amount >= *min),
        Check::AmountRange { min, max } => {
            format::parse_amount(text).is_some_and(|amount| (*min..=*max).contains(&amount))
        }
        Check::Digits(n) => {
            let digits = format::remove_mask(text);
            digits.len() == *n && text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
        }
        Check::DivisionCode => format::is_division_code(text),
        Check::InnLength => {
            let len = text.trim().len();
            (len == 10 || len == 12) && text.trim().chars().all(|c| c.is_ascii_digit())
        }
        Check::InnChecksum => format::is_valid_inn(text),
    }
}
