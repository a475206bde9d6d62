//! Field names of the application record, grouped by the step that collects them.

// Personal info
pub const FULL_NAME: &str = "full_name";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const BIRTH_DATE: &str = "birth_date";
pub const GENDER: &str = "gender";
pub const AGREEMENT: &str = "agreement";

// Credit parameters
pub const CREDIT_AMOUNT: &str = "credit_amount";
pub const CREDIT_PERIOD: &str = "credit_period";
pub const INSURANCE: &str = "insurance";
pub const CREDIT_TOTAL_AMOUNT: &str = "credit_total_amount";
pub const MONTHLY_PAYMENT: &str = "monthly_payment";
pub const CREDIT_PURPOSE: &str = "credit_purpose";
pub const OFFICE_REGION: &str = "office_region";
pub const OFFICE_CITY: &str = "office_city";
pub const OFFICE_BRANCH: &str = "office_branch";
pub const FILIAL_CODE: &str = "filial_code";
pub const SELECTED_OFFICE: &str = "selected_office";

// Passport info
pub const PASSPORT_SERIES: &str = "passport_series";
pub const PASSPORT_NUMBER: &str = "passport_number";
pub const PASSPORT_DIVISION_CODE: &str = "passport_division_code";
pub const PASSPORT_ISSUER: &str = "passport_issuer";
pub const PASSPORT_DATE: &str = "passport_date";
pub const BIRTH_PLACE: &str = "birth_place";
pub const SURNAME_CHANGED: &str = "surname_changed";
pub const PREVIOUS_SURNAME: &str = "previous_surname";

pub const REGISTER_FULL_ADDRESS: &str = "register_full_address";
pub const REGISTER_REGION: &str = "register_region";
pub const REGISTER_CITY: &str = "register_city";
pub const REGISTER_STREET: &str = "register_street";
pub const REGISTER_BUILDING: &str = "register_building";
pub const REGISTER_KORPUS: &str = "register_korpus";
pub const REGISTER_FLAT: &str = "register_flat";
pub const REGISTER_LOCALITY: &str = "register_locality";
pub const REGISTER_POSTAL_CODE: &str = "register_postal_code";
pub const REGISTER_AREA: &str = "register_area";

pub const REGISTRATION_AND_LIVING_SAME: &str = "registration_and_living_same";

pub const LIVING_FULL_ADDRESS: &str = "living_full_address";
pub const LIVING_REGION: &str = "living_region";
pub const LIVING_CITY: &str = "living_city";
pub const LIVING_STREET: &str = "living_street";
pub const LIVING_BUILDING: &str = "living_building";
pub const LIVING_KORPUS: &str = "living_korpus";
pub const LIVING_FLAT: &str = "living_flat";
pub const LIVING_LOCALITY: &str = "living_locality";
pub const LIVING_POSTAL_CODE: &str = "living_postal_code";
pub const LIVING_AREA: &str = "living_area";

/// Every field that depends on `registration_and_living_same` being false.
pub const LIVING_ADDRESS_FIELDS: &[&str] = &[
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

// Income info
pub const OCCUPATION: &str = "occupation";
pub const INCOME_SOURCE: &str = "income_source";
pub const INCOME_AMOUNT: &str = "income_amount";
pub const MARITAL_STATUS: &str = "marital_status";
pub const EXTRA_INCOME: &str = "extra_income";
pub const EXTRA_INCOME_SOURCE: &str = "extra_income_source";
pub const EXTRA_INCOME_AMOUNT: &str = "extra_income_amount";
pub const COMPANY_NAME: &str = "company_name";
pub const INN: &str = "inn";
pub const COMPANY_TYPE: &str = "company_type";
pub const EMPLOYEE_AMOUNT: &str = "employee_amount";
pub const POSITION: &str = "position";
pub const EMPLOYMENT_START_DATE: &str = "employment_start_date";
pub const COMPANY_PHONE: &str = "company_phone";
pub const COMPANY_PHONE_EXTENSION: &str = "company_phone_extension";
pub const COMPANY_ADDRESS: &str = "company_address";
pub const COMPANY_REGION: &str = "company_region";
pub const COMPANY_CITY: &str = "company_city";
pub const COMPANY_STREET: &str = "company_street";
pub const COMPANY_BUILDING: &str = "company_building";
pub const COMPANY_KORPUS: &str = "company_korpus";
pub const COMPANY_POSTAL_CODE: &str = "company_postal_code";

/// Employer fields a retiree does not fill in.
pub const EMPLOYER_FIELDS: &[&str] = &[
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

pub const EXTRA_INCOME_FIELDS: &[&str] = &[EXTRA_INCOME_SOURCE, EXTRA_INCOME_AMOUNT];
