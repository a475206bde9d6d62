// Parsing helpers shared by validation and the wire payload

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const DATE_FORMAT: &str = "%d.%m.%Y";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static FULL_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zА-Яа-яЁё\-]+(\s+[A-Za-zА-Яа-яЁё\-]+)+$").expect("valid full name regex")
});

static DIVISION_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{3}$").expect("valid division code regex"));

static LATIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid latin regex"));

/// Strip input mask characters, keeping digits only
pub fn remove_mask(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Amount typed with group separators and a currency sign, e.g. `"150 000 ₽"`
pub fn parse_amount(value: &str) -> Option<u64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '₽')
        .collect();
    let integer_part = cleaned.split(['.', ',']).next().unwrap_or("");
    if integer_part.is_empty() || !integer_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    integer_part.parse().ok()
}

/// Amount with whitespace and currency sign removed, as the backend expects it
pub fn strip_amount(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '₽')
        .collect()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Russian mobile or landline number: 11 digits starting with 7
pub fn is_phone(value: &str) -> bool {
    let digits = remove_mask(value);
    digits.len() == 11 && digits.starts_with('7')
}

pub fn is_full_name(value: &str) -> bool {
    FULL_NAME_PATTERN.is_match(value.trim())
}

pub fn is_division_code(value: &str) -> bool {
    DIVISION_CODE_PATTERN.is_match(value.trim())
}

pub fn has_latin(value: &str) -> bool {
    LATIN_PATTERN.is_match(value)
}

/// Taxpayer number check digits for 10-digit (organisation) and 12-digit (individual) INNs
pub fn is_valid_inn(value: &str) -> bool {
    let digits: Vec<u32> = match value
        .trim()
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
    {
        Some(digits) => digits,
        None => return false,
    };

    let check = |weights: &[u32], position: usize| -> bool {
        let sum: u32 = weights.iter().zip(&digits).map(|(w, d)| w * d).sum();
        sum % 11 % 10 == digits[position]
    };

    match digits.len() {
        10 => check(&[2, 4, 10, 3, 5, 9, 4, 6, 8], 9),
        12 => {
            check(&[7, 2, 4, 10, 3, 5, 9, 4, 6, 8], 10)
                && check(&[3, 7, 2, 4, 10, 3, 5, 9, 4, 6, 8], 11)
        }
        _ => false,
    }
}

/// Surname, name and patronymic parts of a full name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

/// Split "Surname Name Patronymic"; anything after the third word belongs to the patronymic
pub fn split_full_name(full_name: &str) -> NameParts {
    let mut words = full_name.split_whitespace();
    let surname = words.next().unwrap_or("").to_string();
    let name = words.next().unwrap_or("").to_string();
    let patronymic = words.collect::<Vec<_>>().join(" ");
    NameParts {
        surname,
        name,
        patronymic,
    }
}
