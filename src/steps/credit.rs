// Step 2: credit parameters, calculator-derived fields and office selection

use crate::config::CreditConfig;
use crate::record::fields::*;
use crate::record::{ApplicationRecord, SelectedOffice};
use crate::validation::format::parse_amount;
use crate::validation::{Check, FieldRule, Rule, RuleSet};

use super::clear_fields;

pub const FIELDS: &[&str] = &[
    CREDIT_AMOUNT,
    CREDIT_PERIOD,
    INSURANCE,
    CREDIT_TOTAL_AMOUNT,
    MONTHLY_PAYMENT,
    CREDIT_PURPOSE,
    OFFICE_REGION,
    OFFICE_CITY,
    OFFICE_BRANCH,
    FILIAL_CODE,
    SELECTED_OFFICE,
];

/// Loan purpose codes understood by the backend
pub mod purpose {
    pub const REFINANCING: &str = "20";
    pub const OTHER: &str = "22";
}

pub fn rules(settings: &super::FormSettings) -> RuleSet {
    let credit = &settings.credit;
    RuleSet::new()
        .field(FieldRule::new(OFFICE_REGION, Rule::required()))
        .field(FieldRule::new(
            OFFICE_CITY,
            Rule::required().message("Select a city"),
        ))
        .field(FieldRule::new(
            OFFICE_BRANCH,
            Rule::required().message("Select a branch"),
        ))
        .field(FieldRule::new(
            CREDIT_AMOUNT,
            Rule::required().check(Check::AmountRange {
                min: credit.min_amount,
                max: credit.max_amount,
            }),
        ))
        .field(FieldRule::new(
            CREDIT_PERIOD,
            Rule::required()
                .check(Check::AmountRange {
                    min: u64::from(credit.min_period_months),
                    max: u64::from(credit.max_period_months),
                })
                .message(format!(
                    "Term must be between {} and {} months",
                    credit.min_period_months, credit.max_period_months
                )),
        ))
        .field(FieldRule::new(CREDIT_TOTAL_AMOUNT, Rule::required()))
        .field(FieldRule::new(MONTHLY_PAYMENT, Rule::required()))
        .field(FieldRule::new(
            CREDIT_PURPOSE,
            Rule::required().check(Check::OneOf(&[purpose::REFINANCING, purpose::OTHER])),
        ))
}

/// Annual rate in percent for the amount and insurance choice
pub fn rate_for(amount: u64, insurance: bool, credit: &CreditConfig) -> f64 {
    let big = amount > credit.big_amount_threshold;
    match (insurance, big) {
        (true, true) => credit.rates.with_insurance_big,
        (true, false) => credit.rates.with_insurance,
        (false, true) => credit.rates.without_insurance_big,
        (false, false) => credit.rates.without_insurance,
    }
}

/// Annuity payment for `amount` over `months` at `annual_rate` percent
pub fn monthly_payment(amount: u64, months: u32, annual_rate: f64) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let principal = amount as f64;
    let monthly_rate = annual_rate / 12.0 / 100.0;
    if monthly_rate <= 0.0 {
        return principal / f64::from(months);
    }
    let factor = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * factor / (factor - 1.0)
}

/// Refresh monthly payment and total amount from amount, term and insurance
pub fn recalculate(values: &mut ApplicationRecord, credit: &CreditConfig) {
    let amount = parse_amount(values.text(CREDIT_AMOUNT));
    let months = parse_amount(values.text(CREDIT_PERIOD)).and_then(|m| u32::try_from(m).ok());

    match (amount, months) {
        (Some(amount), Some(months)) if months > 0 => {
            let rate = rate_for(amount, values.flag(INSURANCE), credit);
            let payment = monthly_payment(amount, months, rate);
            let total = payment * f64::from(months);
            values.set(MONTHLY_PAYMENT, format!("{:.0}", payment.round()));
            values.set(CREDIT_TOTAL_AMOUNT, format!("{:.0}", total.round()));
        }
        _ => clear_fields(values, &[MONTHLY_PAYMENT, CREDIT_TOTAL_AMOUNT]),
    }
}

/// Dependent updates after a field of this step changed
pub fn react(values: &mut ApplicationRecord, field: &str, credit: &CreditConfig) {
    match field {
        CREDIT_AMOUNT | CREDIT_PERIOD | INSURANCE => recalculate(values, credit),
        // A different city invalidates the chosen branch
        OFFICE_CITY => clear_fields(values, &[OFFICE_BRANCH, FILIAL_CODE, SELECTED_OFFICE]),
        _ => {}
    }
}

/// Fields written when an office is picked on the map or from the branch list
pub fn office_fields(office: &SelectedOffice) -> Vec<(&'static str, crate::record::FieldValue)> {
    vec![
        (OFFICE_REGION, office.region_code.clone().into()),
        (OFFICE_CITY, office.city.clone().into()),
        (OFFICE_BRANCH, office.short_address.clone().into()),
        (FILIAL_CODE, office.code.clone().into()),
        (SELECTED_OFFICE, office.clone().into()),
    ]
}

impl super::StepForm {
    /// Pick an office; sets region, city, branch and branch code together
    pub fn select_office(&mut self, office: &SelectedOffice) {
        self.set_many(office_fields(office));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::steps::{FormSettings, StepForm};
    use crate::validation::validate;
    use crate::wizard::WizardStep;
    use chrono::NaiveDate;

    fn settings() -> FormSettings {
        FormSettings::from(&WizardConfig::default())
    }

    fn office() -> SelectedOffice {
        SelectedOffice {
            code: "0412".to_string(),
            region_code: "77".to_string(),
            city: "Moscow".to_string(),
            short_address: "Tverskaya 1".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_rate_selection() {
        let credit = WizardConfig::default().credit;
        assert_eq!(rate_for(300_000, true, &credit), credit.rates.with_insurance);
        assert_eq!(rate_for(300_001, true, &credit), credit.rates.with_insurance_big);
        assert_eq!(rate_for(100_000, false, &credit), credit.rates.without_insurance);
        assert_eq!(rate_for(1_000_000, false, &credit), credit.rates.without_insurance_big);
    }

    #[test]
    fn test_monthly_payment_annuity() {
        let payment = monthly_payment(120_000, 12, 0.0);
        assert!((payment - 10_000.0).abs() < 1e-9);

        // 100 000 over 12 months at 12% a year is about 8 884.88
        let payment = monthly_payment(100_000, 12, 12.0);
        assert!((payment - 8_884.88).abs() < 0.01);
    }

    #[test]
    fn test_opening_derives_payment_from_defaults() {
        let form = StepForm::open(
            WizardStep::CreditParameters,
            &ApplicationRecord::with_defaults(300_000),
            settings(),
            today(),
        );
        assert!(!form.text(MONTHLY_PAYMENT).is_empty());
        assert!(!form.text(CREDIT_TOTAL_AMOUNT).is_empty());
    }

    #[test]
    fn test_insurance_toggle_recalculates_payment() {
        let mut form = StepForm::open(
            WizardStep::CreditParameters,
            &ApplicationRecord::with_defaults(300_000),
            settings(),
            today(),
        );
        let without = form.text(MONTHLY_PAYMENT).to_string();
        form.set(INSURANCE, true);
        assert_ne!(form.text(MONTHLY_PAYMENT), without);
    }

    #[test]
    fn test_city_change_clears_branch() {
        let mut form = StepForm::open(
            WizardStep::CreditParameters,
            &ApplicationRecord::with_defaults(300_000),
            settings(),
            today(),
        );
        form.select_office(&office());
        assert!(form.is_valid(), "{:?}", form.report().errors().collect::<Vec<_>>());

        form.set(OFFICE_CITY, "Kazan");
        assert_eq!(form.text(OFFICE_BRANCH), "");
        assert_eq!(form.text(FILIAL_CODE), "");
        assert!(form.values().office().is_none());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_amount_outside_range_is_invalid() {
        let mut values = ApplicationRecord::with_defaults(300_000);
        values.set(CREDIT_AMOUNT, "50000");
        let report = validate(&values, &rules(&settings()), today());
        assert!(!report.is_field_valid(CREDIT_AMOUNT));
    }
}
