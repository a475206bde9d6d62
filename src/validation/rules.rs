// Declarative field rules: a base rule per field plus ordered conditional overrides

use chrono::{Days, Months, NaiveDate};

use crate::record::ApplicationRecord;

/// Where a date bound is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAnchor {
    Today,
    /// Another date field of the working values
    Field(&'static str),
}

/// An anchor shifted by a number of months and days (negative values go back in time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound {
    pub anchor: DateAnchor,
    pub months: i32,
    pub days: i64,
}

impl DateBound {
    pub fn today() -> Self {
        Self {
            anchor: DateAnchor::Today,
            months: 0,
            days: 0,
        }
    }

    pub fn field(field: &'static str) -> Self {
        Self {
            anchor: DateAnchor::Field(field),
            months: 0,
            days: 0,
        }
    }

    pub fn years(mut self, years: i32) -> Self {
        self.months += years * 12;
        self
    }

    pub fn months(mut self, months: i32) -> Self {
        self.months += months;
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days += days;
        self
    }

    /// Concrete date of the bound, `None` when the anchor field is missing or malformed
    pub fn resolve(&self, values: &ApplicationRecord, today: NaiveDate) -> Option<NaiveDate> {
        let anchor = match self.anchor {
            DateAnchor::Today => today,
            DateAnchor::Field(field) => super::format::parse_date(values.text(field))?,
        };
        let shifted = if self.months >= 0 {
            anchor.checked_add_months(Months::new(self.months.unsigned_abs()))?
        } else {
            anchor.checked_sub_months(Months::new(self.months.unsigned_abs()))?
        };
        if self.days >= 0 {
            shifted.checked_add_days(Days::new(self.days.unsigned_abs()))
        } else {
            shifted.checked_sub_days(Days::new(self.days.unsigned_abs()))
        }
    }
}

/// A single check applied to a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Phone,
    FullName,
    /// dd.mm.yyyy
    Date,
    DateNotAfter(DateBound),
    DateNotBefore(DateBound),
    MustBeTrue,
    OneOf(&'static [&'static str]),
    NotOneOf(&'static [&'static str]),
    NotEqualToField(&'static str),
    NoLatin,
    MinAmount(u64),
    AmountRange { min: u64, max: u64 },
    Digits(usize),
    DivisionCode,
    /// 10 or 12 digits
    InnLength,
    InnChecksum,
}

impl Check {
    pub fn default_message(&self) -> String {
        match self {
            Check::Required => "This field is required".to_string(),
            Check::MinLength(n) => format!("Enter at least {n} characters"),
            Check::MaxLength(n) => format!("Enter no more than {n} characters"),
            Check::Email => "Enter a valid email address".to_string(),
            Check::Phone => "Enter a valid phone number".to_string(),
            Check::FullName => "Enter surname, name and patronymic".to_string(),
            Check::Date => "Enter a date as dd.mm.yyyy".to_string(),
            Check::DateNotAfter(_) => "Date is too late".to_string(),
            Check::DateNotBefore(_) => "Date is too early".to_string(),
            Check::MustBeTrue => "Confirmation is required".to_string(),
            Check::OneOf(_) => "Select one of the offered values".to_string(),
            Check::NotOneOf(_) => "This value is not allowed".to_string(),
            Check::NotEqualToField(_) => "Value must differ".to_string(),
            Check::NoLatin => "Use Cyrillic letters only".to_string(),
            Check::MinAmount(min) => format!("Amount must be at least {min}"),
            Check::AmountRange { min, max } => format!("Amount must be between {min} and {max}"),
            Check::Digits(n) => format!("Enter exactly {n} digits"),
            Check::DivisionCode => "Enter the division code as 000-000".to_string(),
            Check::InnLength => "INN must have 10 or 12 digits".to_string(),
            Check::InnChecksum => "INN is not valid".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCheck {
    pub check: Check,
    pub message: Option<String>,
}

/// Ordered checks for a field; the first failing check reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub checks: Vec<RuleCheck>,
}

impl Rule {
    /// No checks at all
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self::optional().check(Check::Required)
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(RuleCheck {
            check,
            message: None,
        });
        self
    }

    /// Replace the message of the most recently added check
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            last.message = Some(message.into());
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.checks.iter().any(|c| c.check == Check::Required)
    }
}

/// Predicate over the working values of a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    FlagIs(&'static str, bool),
    Equals(&'static str, &'static str),
    OneOf(&'static str, &'static [&'static str]),
    LengthIs(&'static str, usize),
}

impl Condition {
    pub fn matches(&self, values: &ApplicationRecord) -> bool {
        match self {
            Condition::FlagIs(field, expected) => values.flag(field) == *expected,
            Condition::Equals(field, expected) => values.text(field) == *expected,
            Condition::OneOf(field, options) => options.contains(&values.text(field)),
            Condition::LengthIs(field, len) => values.text(field).trim().chars().count() == *len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub base: Rule,
    pub overrides: Vec<(Condition, Rule)>,
}

impl FieldRule {
    pub fn new(field: &'static str, base: Rule) -> Self {
        Self {
            field,
            base,
            overrides: Vec::new(),
        }
    }

    pub fn when(mut self, condition: Condition, rule: Rule) -> Self {
        self.overrides.push((condition, rule));
        self
    }

    /// Rule in effect for the given values: first matching override, otherwise the base
    pub fn effective(&self, values: &ApplicationRecord) -> &Rule {
        self.overrides
            .iter()
            .find(|(condition, _)| condition.matches(values))
            .map(|(_, rule)| rule)
            .unwrap_or(&self.base)
    }
}

/// All field rules of one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }
}
