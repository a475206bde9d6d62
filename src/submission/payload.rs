use serde::Serialize;

use crate::config::WizardConfig;
use crate::record::fields::*;
use crate::record::ApplicationRecord;
use crate::steps::credit::rate_for;
use crate::steps::income::occupation;
use crate::validation::format::{parse_amount, remove_mask, split_full_name, strip_amount};

use super::SubmissionRequest;

const NAME_PART_MAX_CHARS: usize = 50;
const ORGANIZATION_MAX_CHARS: usize = 100;
const PRODUCT_TITLE: &str = "Потребительский кредит";

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn without_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraIncomeBlock {
    pub is_extra_income: &'static str,
    pub source_of_extra_income: String,
    pub extra_income_sum: String,
}

/// Wire format of the personal loan form accepted by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanApplicationPayload {
    pub redirect: String,
    #[serde(rename = "credit_rate-ins")]
    pub credit_rate_ins: f64,
    pub credit_rate: f64,
    pub product_title: &'static str,
    pub cvm_cycle_code: &'static str,
    pub test: bool,

    pub surname: String,
    pub name: String,
    pub second_name: String,
    pub sex: String,
    pub birthd_date: String,
    pub email: String,
    pub terms: &'static str,
    pub service_phone_confirmed: String,

    pub place_birth: String,
    pub passport_serial: String,
    pub passport_number: String,
    pub passport_date: String,
    pub passport_data: String,
    pub passport_code: String,
    pub last_surname: String,

    pub area_type: &'static str,
    pub office_region: String,
    pub office_city_name_test: String,
    pub street_type: &'static str,
    pub street: String,
    pub home: String,
    pub building: String,
    pub build: &'static str,
    pub apartment: String,
    pub region: String,
    pub city_name_test: String,
    pub postal_code: String,
    #[serde(rename = "RegistrationAddressArea")]
    pub registration_address_area: String,

    pub live_area_type: &'static str,
    pub live_street_type: &'static str,
    pub live_street: String,
    pub live_build: String,
    pub live_build_part2: String,
    pub live_build_part: &'static str,
    pub live_flat: String,
    pub live_region: String,
    pub live_area_name: String,
    pub live_postal_code: String,
    #[serde(rename = "LivingAddressArea")]
    pub living_address_area: String,
    /// "1" only when the applicant lives at the registration address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_registration: Option<&'static str>,

    pub family: String,
    pub income: String,
    pub profit: String,
    #[serde(flatten)]
    pub extra_income: Option<ExtraIncomeBlock>,

    pub occupation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_area_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_street_type: Option<&'static str>,
    pub last_work_date_start: String,
    pub organization: String,
    pub inn: String,
    pub organization_form: String,
    pub employee_number: String,
    pub job_type_1: &'static str,
    pub job_type: String,
    pub organization_phone: String,
    pub organization_phone_2: String,
    pub job_street: String,
    pub job_home: String,
    pub job_build: &'static str,
    pub job_building: String,
    pub job_office: &'static str,
    pub job_region: String,
    pub job_area_name_test: String,
    pub job_postal_code: String,

    pub credit_sum: String,
    pub credit_period: String,
    pub credit_insurance: &'static str,
    pub credit_pay_sum_result: String,
    pub credt_pay_sum_month: String,
    pub loan_purpose: String,
    pub office_test: String,
    pub is_draft: &'static str,
    pub guid: String,
}

impl LoanApplicationPayload {
    pub fn from_record(request: &SubmissionRequest, config: &WizardConfig) -> Self {
        let record: &ApplicationRecord = &request.record;
        let text = |field: &str| record.text(field).trim().to_string();

        let names = split_full_name(record.text(FULL_NAME));
        let insurance = record.flag(INSURANCE);
        let amount = parse_amount(record.text(CREDIT_AMOUNT)).unwrap_or_default();
        let retiree = record.text(OCCUPATION) == occupation::RETIREE;

        let extra_income = record.flag(EXTRA_INCOME).then(|| ExtraIncomeBlock {
            is_extra_income: "1",
            source_of_extra_income: text(EXTRA_INCOME_SOURCE),
            extra_income_sum: strip_amount(record.text(EXTRA_INCOME_AMOUNT)),
        });

        let live_area_name = if record.is_blank(LIVING_CITY) {
            text(LIVING_LOCALITY)
        } else {
            text(LIVING_CITY)
        };

        Self {
            redirect: config.backend.redirect_url.clone(),
            credit_rate_ins: rate_for(amount, true, &config.credit),
            credit_rate: rate_for(amount, insurance, &config.credit),
            product_title: PRODUCT_TITLE,
            cvm_cycle_code: "",
            test: config.backend.test_mode,

            surname: truncate(&names.surname, NAME_PART_MAX_CHARS),
            name: truncate(&names.name, NAME_PART_MAX_CHARS),
            second_name: truncate(&names.patronymic, NAME_PART_MAX_CHARS),
            sex: text(GENDER),
            birthd_date: text(BIRTH_DATE),
            email: text(EMAIL),
            terms: "1",
            service_phone_confirmed: remove_mask(record.text(PHONE)),

            place_birth: text(BIRTH_PLACE),
            passport_serial: remove_mask(record.text(PASSPORT_SERIES)),
            passport_number: remove_mask(record.text(PASSPORT_NUMBER)),
            passport_date: text(PASSPORT_DATE),
            passport_data: text(PASSPORT_ISSUER),
            passport_code: remove_mask(record.text(PASSPORT_DIVISION_CODE)),
            last_surname: text(PREVIOUS_SURNAME),

            area_type: "1",
            office_region: text(OFFICE_REGION),
            office_city_name_test: text(OFFICE_CITY),
            street_type: "01",
            street: text(REGISTER_STREET),
            home: without_spaces(record.text(REGISTER_BUILDING)),
            building: text(REGISTER_KORPUS),
            build: "",
            apartment: without_spaces(record.text(REGISTER_FLAT)),
            region: text(REGISTER_REGION),
            city_name_test: text(REGISTER_CITY),
            postal_code: text(REGISTER_POSTAL_CODE),
            registration_address_area: text(REGISTER_AREA),

            live_area_type: "1",
            live_street_type: "01",
            live_street: text(LIVING_STREET),
            live_build: without_spaces(record.text(LIVING_BUILDING)),
            live_build_part2: without_spaces(record.text(LIVING_KORPUS)),
            live_build_part: "",
            live_flat: without_spaces(record.text(LIVING_FLAT)),
            live_region: text(LIVING_REGION),
            live_area_name,
            live_postal_code: text(LIVING_POSTAL_CODE),
            living_address_area: text(LIVING_AREA),
            live_registration: record.flag(REGISTRATION_AND_LIVING_SAME).then_some("1"),

            family: text(MARITAL_STATUS),
            income: strip_amount(record.text(INCOME_AMOUNT)),
            profit: text(INCOME_SOURCE),
            extra_income,

            occupation: text(OCCUPATION),
            job_area_type: (!retiree).then_some("1"),
            job_street_type: (!retiree).then_some("01"),
            last_work_date_start: text(EMPLOYMENT_START_DATE),
            organization: truncate(record.text(COMPANY_NAME), ORGANIZATION_MAX_CHARS),
            inn: text(INN),
            organization_form: text(COMPANY_TYPE),
            employee_number: text(EMPLOYEE_AMOUNT),
            job_type_1: "",
            job_type: text(POSITION),
            organization_phone: remove_mask(record.text(COMPANY_PHONE)),
            organization_phone_2: text(COMPANY_PHONE_EXTENSION),
            job_street: text(COMPANY_STREET),
            job_home: text(COMPANY_BUILDING),
            job_build: "",
            job_building: text(COMPANY_KORPUS),
            job_office: "",
            job_region: text(COMPANY_REGION),
            job_area_name_test: text(COMPANY_CITY),
            job_postal_code: text(COMPANY_POSTAL_CODE),

            credit_sum: strip_amount(record.text(CREDIT_AMOUNT)),
            credit_period: text(CREDIT_PERIOD),
            credit_insurance: if insurance { "1" } else { "0" },
            credit_pay_sum_result: strip_amount(record.text(CREDIT_TOTAL_AMOUNT)),
            credt_pay_sum_month: strip_amount(record.text(MONTHLY_PAYMENT)),
            loan_purpose: text(CREDIT_PURPOSE),
            office_test: text(FILIAL_CODE),
            is_draft: "R",
            guid: request.session_id.clone(),
        }
    }
}
