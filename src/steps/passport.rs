// Step 3: passport details, registration and living address

use serde::{Deserialize, Serialize};

use crate::record::fields::*;
use crate::record::{ApplicationRecord, FieldValue};
use crate::validation::{Check, Condition, DateBound, FieldRule, Rule, RuleSet};

use super::clear_fields;

/// Street and area names are cut to what the backend stores
pub const ADDRESS_PART_MAX_CHARS: usize = 50;

pub const FIELDS: &[&str] = &[
    PASSPORT_SERIES,
    PASSPORT_NUMBER,
    PASSPORT_DIVISION_CODE,
    PASSPORT_ISSUER,
    PASSPORT_DATE,
    BIRTH_PLACE,
    SURNAME_CHANGED,
    PREVIOUS_SURNAME,
    REGISTER_FULL_ADDRESS,
    REGISTER_REGION,
    REGISTER_CITY,
    REGISTER_STREET,
    REGISTER_BUILDING,
    REGISTER_KORPUS,
    REGISTER_FLAT,
    REGISTER_LOCALITY,
    REGISTER_POSTAL_CODE,
    REGISTER_AREA,
    REGISTRATION_AND_LIVING_SAME,
    LIVING_FULL_ADDRESS,
    LIVING_REGION,
    LIVING_CITY,
    LIVING_STREET,
    LIVING_BUILDING,
    LIVING_KORPUS,
    LIVING_FLAT,
    LIVING_LOCALITY,
    LIVING_POSTAL_CODE,
    LIVING_AREA,
];

fn living_required(field: &'static str) -> FieldRule {
    FieldRule::new(field, Rule::optional()).when(
        Condition::FlagIs(REGISTRATION_AND_LIVING_SAME, false),
        Rule::required(),
    )
}

pub fn rules() -> RuleSet {
    RuleSet::new()
        .field(FieldRule::new(
            PASSPORT_SERIES,
            Rule::required().check(Check::Digits(4)),
        ))
        .field(FieldRule::new(
            PASSPORT_NUMBER,
            Rule::required().check(Check::Digits(6)),
        ))
        .field(FieldRule::new(
            PASSPORT_DIVISION_CODE,
            Rule::required().check(Check::DivisionCode),
        ))
        .field(FieldRule::new(
            PASSPORT_ISSUER,
            Rule::required()
                .check(Check::NoLatin)
                .check(Check::MaxLength(250)),
        ))
        .field(FieldRule::new(
            PASSPORT_DATE,
            Rule::required()
                .check(Check::Date)
                .check(Check::DateNotAfter(DateBound::today()))
                .message("Issue date cannot be in the future")
                .check(Check::DateNotBefore(DateBound::field(BIRTH_DATE).years(14)))
                .message("Passports are issued from the age of 14"),
        ))
        .field(FieldRule::new(
            BIRTH_PLACE,
            Rule::required()
                .check(Check::NoLatin)
                .check(Check::MaxLength(100)),
        ))
        .field(
            FieldRule::new(PREVIOUS_SURNAME, Rule::optional()).when(
                Condition::FlagIs(SURNAME_CHANGED, true),
                Rule::required()
                    .check(Check::MinLength(2))
                    .message("Not enough information"),
            ),
        )
        .field(FieldRule::new(
            REGISTER_FULL_ADDRESS,
            Rule::required().message("Enter the registration address"),
        ))
        .field(FieldRule::new(REGISTER_BUILDING, Rule::required()))
        .field(FieldRule::new(REGISTER_CITY, Rule::required()))
        .field(FieldRule::new(REGISTER_REGION, Rule::required()))
        .field(living_required(LIVING_FULL_ADDRESS))
        .field(living_required(LIVING_BUILDING))
        .field(living_required(LIVING_CITY))
        .field(living_required(LIVING_REGION))
}

pub fn react(values: &mut ApplicationRecord, field: &str) {
    match field {
        REGISTRATION_AND_LIVING_SAME if values.flag(REGISTRATION_AND_LIVING_SAME) => {
            clear_fields(values, LIVING_ADDRESS_FIELDS)
        }
        SURNAME_CHANGED if !values.flag(SURNAME_CHANGED) => clear_fields(values, &[PREVIOUS_SURNAME]),
        _ => {}
    }
}

/// Which address block an address suggestion fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Registration,
    Living,
}

/// Structured address picked from the address autocomplete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSuggestion {
    pub full_address: String,
    pub region: String,
    pub city: String,
    pub street: String,
    pub building: String,
    pub korpus: String,
    pub flat: String,
    pub locality: String,
    pub postal_code: String,
    pub area: String,
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Field assignments for a picked address
pub fn address_fields(
    kind: AddressKind,
    address: &AddressSuggestion,
) -> Vec<(&'static str, FieldValue)> {
    let names: [&'static str; 10] = match kind {
        AddressKind::Registration => [
            REGISTER_FULL_ADDRESS,
            REGISTER_REGION,
            REGISTER_CITY,
            REGISTER_STREET,
            REGISTER_BUILDING,
            REGISTER_KORPUS,
            REGISTER_FLAT,
            REGISTER_LOCALITY,
            REGISTER_POSTAL_CODE,
            REGISTER_AREA,
        ],
        AddressKind::Living => [
            LIVING_FULL_ADDRESS,
            LIVING_REGION,
            LIVING_CITY,
            LIVING_STREET,
            LIVING_BUILDING,
            LIVING_KORPUS,
            LIVING_FLAT,
            LIVING_LOCALITY,
            LIVING_POSTAL_CODE,
            LIVING_AREA,
        ],
    };
    let parts = [
        address.full_address.clone(),
        address.region.clone(),
        address.city.clone(),
        truncate(&address.street, ADDRESS_PART_MAX_CHARS),
        address.building.clone(),
        address.korpus.clone(),
        address.flat.clone(),
        address.locality.clone(),
        address.postal_code.clone(),
        truncate(&address.area, ADDRESS_PART_MAX_CHARS),
    ];
    names
        .into_iter()
        .zip(parts)
        .map(|(name, value)| (name, FieldValue::from(value)))
        .collect()
}

impl super::StepForm {
    pub fn select_address(&mut self, kind: AddressKind, address: &AddressSuggestion) {
        self.set_many(address_fields(kind, address));
    }
}
