use serde::{Deserialize, Serialize};
use statig::prelude::*;

use super::types::{EventOutcome, ProgressItem, StepTransition, WizardEvent, WizardStep};

/// Context that survives every transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardContext {
    pub interaction_started: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Disposition {
    #[default]
    Ignored,
    Stayed,
    Moved,
}

/// Shared storage of the statig machine
#[derive(Debug, Default)]
pub struct WizardMachine {
    step: WizardStep,
    context: WizardContext,
    disposition: Disposition,
    request_id: Option<String>,
    completions_logged: u32,
}

#[state_machine(initial = "State::personal_info()")]
impl WizardMachine {
    #[state]
    fn personal_info(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Start => {
                if !self.context.interaction_started {
                    self.context.interaction_started = true;
                    tracing::info!("Form interaction started");
                }
                self.stay()
            }
            WizardEvent::Advance => {
                self.moved(WizardStep::CreditParameters);
                Transition(State::credit_parameters())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn credit_parameters(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Advance => {
                self.moved(WizardStep::PassportInfo);
                Transition(State::passport_info())
            }
            WizardEvent::Back => {
                self.moved(WizardStep::PersonalInfo);
                Transition(State::personal_info())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn passport_info(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Advance => {
                self.moved(WizardStep::IncomeInfo);
                Transition(State::income_info())
            }
            WizardEvent::Back => {
                self.moved(WizardStep::CreditParameters);
                Transition(State::credit_parameters())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn income_info(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SubmitSuccess { request_id } => {
                self.request_id = request_id.clone();
                self.moved(WizardStep::Success);
                Transition(State::success())
            }
            WizardEvent::SubmitFailure => {
                tracing::warn!("Submission failed, staying on income step");
                self.stay()
            }
            WizardEvent::Back => {
                self.moved(WizardStep::PassportInfo);
                Transition(State::passport_info())
            }
            _ => self.ignore(event),
        }
    }

    #[state(entry_action = "enter_success")]
    fn success(&mut self, event: &WizardEvent) -> Outcome<State> {
        self.ignore(event)
    }

    #[action]
    fn enter_success(&mut self) {
        self.completions_logged += 1;
        tracing::info!(
            request_id = ?self.request_id,
            interaction_started = self.context.interaction_started,
            "Loan application submitted"
        );
    }
}

impl WizardMachine {
    fn moved(&mut self, to: WizardStep) {
        self.step = to;
        self.disposition = Disposition::Moved;
    }

    fn stay(&mut self) -> Outcome<State> {
        self.disposition = Disposition::Stayed;
        Handled
    }

    fn ignore(&mut self, event: &WizardEvent) -> Outcome<State> {
        tracing::debug!(step = %self.step, event = event.name(), "Ignoring event not legal in current step");
        self.disposition = Disposition::Ignored;
        Handled
    }
}

/// Transition table of the wizard.
///
/// Illegal events are ignored without side effects; every accepted state
/// change is reported exactly once through [`EventOutcome::Transitioned`].
pub struct WizardStateMachine {
    machine: StateMachine<WizardMachine>,
}

impl Default for WizardStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardStateMachine {
    pub fn new() -> Self {
        Self {
            machine: WizardMachine::default().state_machine(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.machine.inner().step
    }

    pub fn context(&self) -> &WizardContext {
        &self.machine.inner().context
    }

    /// Backend request id recorded on `SUBMIT_SUCCESS`
    pub fn request_id(&self) -> Option<&str> {
        self.machine.inner().request_id.as_deref()
    }

    /// How many times the success entry action has run
    pub fn completions_logged(&self) -> u32 {
        self.machine.inner().completions_logged
    }

    pub fn is_terminal(&self) -> bool {
        self.step() == WizardStep::Success
    }

    pub fn can_go_back(&self) -> bool {
        self.step().previous().is_some()
    }

    pub fn handle(&mut self, event: &WizardEvent) -> EventOutcome {
        let from = self.step();
        self.machine.handle(event);
        let inner = self.machine.inner();

        match inner.disposition {
            Disposition::Moved => {
                let transition = StepTransition {
                    from,
                    to: inner.step,
                    event: event.clone(),
                };
                tracing::info!(
                    from = %transition.from,
                    to = %transition.to,
                    event = event.name(),
                    "Wizard step transition"
                );
                EventOutcome::Transitioned(transition)
            }
            Disposition::Stayed => EventOutcome::Stayed,
            Disposition::Ignored => EventOutcome::Ignored,
        }
    }

    /// Progress indicator entries for the four form steps
    pub fn progress(&self) -> Vec<ProgressItem> {
        let current = self.step();
        WizardStep::FORM_STEPS
            .iter()
            .filter_map(|step| {
                step.number().map(|number| ProgressItem {
                    step: *step,
                    number,
                    label: step.label(),
                    active: *step == current,
                    completed: *step < current,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> WizardEvent {
        WizardEvent::SubmitSuccess {
            request_id: Some("REQ-1".to_string()),
        }
    }

    #[test]
    fn test_forward_path_reaches_success() {
        let mut sm = WizardStateMachine::new();
        assert_eq!(sm.step(), WizardStep::PersonalInfo);

        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Advance);
        assert_eq!(sm.step(), WizardStep::IncomeInfo);

        let outcome = sm.handle(&success());
        assert_eq!(
            outcome.transition().map(|t| (t.from, t.to)),
            Some((WizardStep::IncomeInfo, WizardStep::Success))
        );
        assert!(sm.is_terminal());
        assert_eq!(sm.request_id(), Some("REQ-1"));
        assert_eq!(sm.completions_logged(), 1);
    }

    #[test]
    fn test_back_from_first_step_is_ignored() {
        let mut sm = WizardStateMachine::new();
        assert_eq!(sm.handle(&WizardEvent::Back), EventOutcome::Ignored);
        assert_eq!(sm.step(), WizardStep::PersonalInfo);
        assert!(!sm.can_go_back());
    }

    #[test]
    fn test_advance_on_income_step_does_not_skip_submission() {
        let mut sm = WizardStateMachine::new();
        for _ in 0..3 {
            sm.handle(&WizardEvent::Advance);
        }
        assert_eq!(sm.handle(&WizardEvent::Advance), EventOutcome::Ignored);
        assert_eq!(sm.step(), WizardStep::IncomeInfo);
    }

    #[test]
    fn test_submit_failure_stays_on_income_step() {
        let mut sm = WizardStateMachine::new();
        for _ in 0..3 {
            sm.handle(&WizardEvent::Advance);
        }
        assert_eq!(sm.handle(&WizardEvent::SubmitFailure), EventOutcome::Stayed);
        assert_eq!(sm.step(), WizardStep::IncomeInfo);
        assert_eq!(sm.completions_logged(), 0);
    }

    #[test]
    fn test_submit_success_outside_income_step_is_ignored() {
        let mut sm = WizardStateMachine::new();
        sm.handle(&WizardEvent::Advance);
        assert!(sm.handle(&success()).is_ignored());
        assert_eq!(sm.step(), WizardStep::CreditParameters);
    }

    #[test]
    fn test_start_marks_context_once_and_persists() {
        let mut sm = WizardStateMachine::new();
        assert_eq!(sm.handle(&WizardEvent::Start), EventOutcome::Stayed);
        assert!(sm.context().interaction_started);

        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Back);
        assert!(sm.context().interaction_started);
    }

    #[test]
    fn test_success_is_terminal_and_logs_once() {
        let mut sm = WizardStateMachine::new();
        for _ in 0..3 {
            sm.handle(&WizardEvent::Advance);
        }
        sm.handle(&success());
        for event in [WizardEvent::Back, WizardEvent::Advance, success(), WizardEvent::SubmitFailure] {
            assert!(sm.handle(&event).is_ignored());
        }
        assert_eq!(sm.completions_logged(), 1);
    }

    #[test]
    fn test_progress_marks_earlier_steps_completed() {
        let mut sm = WizardStateMachine::new();
        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Advance);

        let progress = sm.progress();
        assert_eq!(progress.len(), 4);
        assert!(progress[0].completed && progress[1].completed);
        assert!(progress[2].active && !progress[2].completed);
        assert!(!progress[3].completed);
    }
}
