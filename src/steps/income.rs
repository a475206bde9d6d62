// Step 4: occupation, income and employer details

use crate::record::fields::*;
use crate::record::ApplicationRecord;
use crate::validation::format::remove_mask;
use crate::validation::{Check, Condition, DateBound, FieldRule, Rule, RuleSet};

use super::clear_fields;

pub mod occupation {
    pub const EMPLOYEE: &str = "employee";
    pub const BUSINESS_OWNER: &str = "business_owner";
    pub const ENTREPRENEUR: &str = "entrepreneur";
    pub const RETIREE: &str = "retiree";

    pub const ALL: &[&str] = &[EMPLOYEE, BUSINESS_OWNER, ENTREPRENEUR, RETIREE];
}

pub mod income_source {
    pub const SALARY: &str = "salary";
    pub const ENTREPRENEURSHIP: &str = "entrepreneurship";
    pub const PENSION: &str = "pension";
}

pub mod company_type {
    /// Sole proprietor
    pub const IP: &str = "ip";
    pub const OOO: &str = "ooo";
    pub const AO: &str = "ao";
    pub const STATE: &str = "state";
    pub const OTHER: &str = "other";

    pub const SOLE_PROPRIETOR: &[&str] = &[IP];
}

pub const FIELDS: &[&str] = &[
    OCCUPATION,
    INCOME_SOURCE,
    INCOME_AMOUNT,
    MARITAL_STATUS,
    EXTRA_INCOME,
    EXTRA_INCOME_SOURCE,
    EXTRA_INCOME_AMOUNT,
    COMPANY_NAME,
    INN,
    COMPANY_TYPE,
    EMPLOYEE_AMOUNT,
    POSITION,
    EMPLOYMENT_START_DATE,
    COMPANY_PHONE,
    COMPANY_PHONE_EXTENSION,
    COMPANY_ADDRESS,
    COMPANY_REGION,
    COMPANY_CITY,
    COMPANY_STREET,
    COMPANY_BUILDING,
    COMPANY_KORPUS,
    COMPANY_POSTAL_CODE,
];

const IS_RETIREE: Condition = Condition::Equals(OCCUPATION, occupation::RETIREE);

/// Required for everyone except retirees
fn employer(field: &'static str, rule: Rule) -> FieldRule {
    FieldRule::new(field, rule).when(IS_RETIREE, Rule::optional())
}

pub fn rules() -> RuleSet {
    RuleSet::new()
        .field(FieldRule::new(
            OCCUPATION,
            Rule::required().check(Check::OneOf(occupation::ALL)),
        ))
        .field(FieldRule::new(INCOME_SOURCE, Rule::required()))
        .field(FieldRule::new(
            INCOME_AMOUNT,
            Rule::required().check(Check::MinAmount(1)),
        ))
        .field(FieldRule::new(MARITAL_STATUS, Rule::required()))
        .field(employer(COMPANY_NAME, Rule::required().check(Check::MaxLength(250))))
        .field(employer(
            INN,
            Rule::required()
                .check(Check::InnLength)
                .check(Check::InnChecksum),
        ))
        .field(
            // Only a 10-digit INN identifies an organisation
            FieldRule::new(
                COMPANY_TYPE,
                Rule::required()
                    .check(Check::OneOf(company_type::SOLE_PROPRIETOR))
                    .message("Only a 10-digit INN belongs to an organisation"),
            )
            .when(IS_RETIREE, Rule::optional())
            .when(
                Condition::LengthIs(INN, 10),
                Rule::required()
                    .check(Check::NotOneOf(company_type::SOLE_PROPRIETOR))
                    .message("A 10-digit INN belongs to an organisation, not a sole proprietor"),
            ),
        )
        .field(employer(EMPLOYEE_AMOUNT, Rule::required()))
        .field(
            FieldRule::new(POSITION, Rule::optional()).when(
                Condition::OneOf(OCCUPATION, &[occupation::EMPLOYEE, occupation::BUSINESS_OWNER]),
                Rule::required().check(Check::MaxLength(250)),
            ),
        )
        .field(employer(
            EMPLOYMENT_START_DATE,
            Rule::required()
                .check(Check::Date)
                .check(Check::DateNotBefore(DateBound::field(BIRTH_DATE).years(14)))
                .message("Employment cannot start before the age of 14")
                .check(Check::DateNotAfter(DateBound::today().months(-3)))
                .message("At least three months at the current job are required"),
        ))
        .field(employer(
            COMPANY_PHONE,
            Rule::required()
                .check(Check::Phone)
                .check(Check::NotEqualToField(PHONE))
                .message("The work phone must differ from the mobile phone"),
        ))
        .field(employer(
            COMPANY_ADDRESS,
            Rule::required().message("Enter the employer address"),
        ))
        .field(employer(COMPANY_BUILDING, Rule::required()))
        .field(
            FieldRule::new(EXTRA_INCOME_SOURCE, Rule::optional())
                .when(Condition::FlagIs(EXTRA_INCOME, true), Rule::required()),
        )
        .field(
            FieldRule::new(EXTRA_INCOME_AMOUNT, Rule::optional()).when(
                Condition::FlagIs(EXTRA_INCOME, true),
                Rule::required().check(Check::MinAmount(1)),
            ),
        )
}

/// Income source implied by an occupation
pub fn income_source_for(occupation: &str) -> Option<&'static str> {
    match occupation {
        occupation::EMPLOYEE | occupation::BUSINESS_OWNER => Some(income_source::SALARY),
        occupation::ENTREPRENEUR => Some(income_source::ENTREPRENEURSHIP),
        occupation::RETIREE => Some(income_source::PENSION),
        _ => None,
    }
}

pub fn react(values: &mut ApplicationRecord, field: &str) {
    match field {
        OCCUPATION => {
            let occupation = values.text(OCCUPATION).to_string();
            if let Some(source) = income_source_for(&occupation) {
                values.set(INCOME_SOURCE, source);
            }
            if occupation == occupation::RETIREE {
                clear_fields(values, EMPLOYER_FIELDS);
            }
        }
        INN => {
            if remove_mask(values.text(INN)).len() == 12 {
                values.set(COMPANY_TYPE, company_type::IP);
            }
        }
        EXTRA_INCOME if !values.flag(EXTRA_INCOME) => clear_fields(values, EXTRA_INCOME_FIELDS),
        _ => {}
    }
}
