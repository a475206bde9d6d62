// Step 1: applicant contact details

use crate::record::fields::*;
use crate::validation::{Check, DateBound, FieldRule, Rule, RuleSet};

pub const MIN_AGE_YEARS: i32 = 21;
pub const MAX_AGE_YEARS: i32 = 75;

pub const FIELDS: &[&str] = &[FULL_NAME, PHONE, EMAIL, BIRTH_DATE, GENDER, AGREEMENT];

pub fn rules() -> RuleSet {
    RuleSet::new()
        .field(FieldRule::new(
            FULL_NAME,
            Rule::required()
                .message("Enter your full name")
                .check(Check::FullName)
                .check(Check::MaxLength(150)),
        ))
        .field(FieldRule::new(PHONE, Rule::required().check(Check::Phone)))
        .field(FieldRule::new(EMAIL, Rule::required().check(Check::Email)))
        .field(FieldRule::new(
            BIRTH_DATE,
            Rule::required()
                .message("Enter a date")
                .check(Check::Date)
                .check(Check::DateNotAfter(
                    DateBound::today().years(-MIN_AGE_YEARS).days(-1),
                ))
                .message(format!(
                    "Applicants must be at least {MIN_AGE_YEARS} years old. Younger applicants can apply at a bank office."
                ))
                // The loan must end before the applicant turns 75; the shortest term is 13 months
                .check(Check::DateNotBefore(
                    DateBound::today().years(-MAX_AGE_YEARS).months(13),
                ))
                .message(format!(
                    "The applicant must be no older than {MAX_AGE_YEARS} when the loan ends"
                )),
        ))
        .field(FieldRule::new(GENDER, Rule::optional().check(Check::OneOf(&["M", "F"]))))
        .field(FieldRule::new(
            AGREEMENT,
            Rule::optional()
                .check(Check::MustBeTrue)
                .message("Consent to the data transfer terms is required to continue"),
        ))
}
