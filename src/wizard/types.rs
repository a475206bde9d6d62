use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screens of the wizard plus the terminal success screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    PersonalInfo,
    CreditParameters,
    PassportInfo,
    IncomeInfo,
    Success,
}

impl WizardStep {
    /// The four data-collecting steps in order
    pub const FORM_STEPS: [WizardStep; 4] = [
        WizardStep::PersonalInfo,
        WizardStep::CreditParameters,
        WizardStep::PassportInfo,
        WizardStep::IncomeInfo,
    ];

    /// 1-based position on the progress indicator, `None` for success
    pub fn number(&self) -> Option<u8> {
        match self {
            WizardStep::PersonalInfo => Some(1),
            WizardStep::CreditParameters => Some(2),
            WizardStep::PassportInfo => Some(3),
            WizardStep::IncomeInfo => Some(4),
            WizardStep::Success => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal details",
            WizardStep::CreditParameters => "Credit parameters",
            WizardStep::PassportInfo => "Passport details",
            WizardStep::IncomeInfo => "Income information",
            WizardStep::Success => "Application sent",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "personal_info",
            WizardStep::CreditParameters => "credit_parameters",
            WizardStep::PassportInfo => "passport_info",
            WizardStep::IncomeInfo => "income_info",
            WizardStep::Success => "success",
        }
    }

    /// Step reached by `BACK`
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::CreditParameters => Some(WizardStep::PersonalInfo),
            WizardStep::PassportInfo => Some(WizardStep::CreditParameters),
            WizardStep::IncomeInfo => Some(WizardStep::PassportInfo),
            WizardStep::PersonalInfo | WizardStep::Success => None,
        }
    }

    /// True for the step whose forward action is the submission
    pub fn is_final_form_step(&self) -> bool {
        *self == WizardStep::IncomeInfo
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "personal_info" | "personal" | "1" => Ok(WizardStep::PersonalInfo),
            "credit_parameters" | "credit" | "2" => Ok(WizardStep::CreditParameters),
            "passport_info" | "passport" | "3" => Ok(WizardStep::PassportInfo),
            "income_info" | "income" | "4" => Ok(WizardStep::IncomeInfo),
            "success" => Ok(WizardStep::Success),
            other => Err(format!("unknown wizard step '{other}'")),
        }
    }
}

/// Named triggers accepted by the wizard state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// First real interaction with the form
    Start,
    Advance,
    Back,
    SubmitSuccess { request_id: Option<String> },
    SubmitFailure,
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::Start => "START",
            WizardEvent::Advance => "ADVANCE",
            WizardEvent::Back => "BACK",
            WizardEvent::SubmitSuccess { .. } => "SUBMIT_SUCCESS",
            WizardEvent::SubmitFailure => "SUBMIT_FAILURE",
        }
    }
}

/// Record of one accepted state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub from: WizardStep,
    pub to: WizardStep,
    pub event: WizardEvent,
}

/// What the machine did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Transitioned(StepTransition),
    /// Accepted without changing state (`START`, `SUBMIT_FAILURE`)
    Stayed,
    /// Not legal in the current state
    Ignored,
}

impl EventOutcome {
    pub fn transition(&self) -> Option<&StepTransition> {
        match self {
            EventOutcome::Transitioned(transition) => Some(transition),
            _ => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored)
    }
}

/// One entry of the progress indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressItem {
    pub step: WizardStep,
    pub number: u8,
    pub label: &'static str,
    pub active: bool,
    pub completed: bool,
}
