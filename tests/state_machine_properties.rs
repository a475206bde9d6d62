// Property-based tests for the wizard state machine
// Arbitrary event sequences must never break the step graph invariants

use loan_wizard::merge::{merge, StepOutput};
use loan_wizard::wizard::{EventOutcome, WizardEvent, WizardStateMachine, WizardStep};
use loan_wizard::{ApplicationRecord, FieldValue};
use proptest::prelude::*;

fn event_strategy() -> impl Strategy<Value = WizardEvent> {
    prop_oneof![
        Just(WizardEvent::Start),
        Just(WizardEvent::Advance),
        Just(WizardEvent::Back),
        Just(WizardEvent::SubmitFailure),
        proptest::option::of("[A-Z]{3}-[0-9]{1,4}")
            .prop_map(|request_id| WizardEvent::SubmitSuccess { request_id }),
    ]
}

fn field_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("full_name"),
        Just("email"),
        Just("credit_amount"),
        Just("inn"),
        Just("living_city"),
    ]
}

fn output_strategy() -> impl Strategy<Value = StepOutput> {
    proptest::collection::vec((field_strategy(), "[a-z0-9 ]{0,8}"), 0..5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(field, value)| (field.to_string(), FieldValue::from(value)))
            .collect::<StepOutput>()
    })
}

proptest! {
    #[test]
    fn test_transitions_follow_the_step_graph(events in proptest::collection::vec(event_strategy(), 0..40)) {
        let mut sm = WizardStateMachine::new();

        for event in &events {
            let before = sm.step();
            let outcome = sm.handle(event);
            let after = sm.step();

            match &outcome {
                EventOutcome::Transitioned(transition) => {
                    prop_assert_eq!(transition.from, before);
                    prop_assert_eq!(transition.to, after);
                    prop_assert_ne!(before, after);
                    match event {
                        WizardEvent::Advance => {
                            prop_assert!(before < WizardStep::IncomeInfo);
                            prop_assert_eq!(after.previous(), Some(before));
                        }
                        WizardEvent::Back => {
                            prop_assert_eq!(before.previous(), Some(after));
                        }
                        WizardEvent::SubmitSuccess { .. } => {
                            prop_assert_eq!(before, WizardStep::IncomeInfo);
                            prop_assert_eq!(after, WizardStep::Success);
                        }
                        other => {
                            prop_assert!(false, "{:?} must not change the step", other);
                        }
                    }
                }
                EventOutcome::Stayed | EventOutcome::Ignored => {
                    prop_assert_eq!(before, after);
                }
            }

            // Success is terminal
            if before == WizardStep::Success {
                prop_assert!(outcome.is_ignored());
            }
        }

        prop_assert!(sm.completions_logged() <= 1);
        prop_assert_eq!(sm.completions_logged() == 1, sm.is_terminal());
    }

    #[test]
    fn test_interaction_flag_never_resets(events in proptest::collection::vec(event_strategy(), 1..30)) {
        let mut sm = WizardStateMachine::new();
        let mut started = false;

        for event in &events {
            let before = sm.step();
            sm.handle(event);
            // START is only accepted on the first step
            if *event == WizardEvent::Start && before == WizardStep::PersonalInfo {
                started = true;
            }
            prop_assert_eq!(sm.context().interaction_started, started);
        }
    }

    #[test]
    fn test_progress_has_one_active_step_before_success(events in proptest::collection::vec(event_strategy(), 0..30)) {
        let mut sm = WizardStateMachine::new();
        for event in &events {
            sm.handle(event);
        }

        let progress = sm.progress();
        prop_assert_eq!(progress.len(), 4);
        let active = progress.iter().filter(|item| item.active).count();
        prop_assert_eq!(active, if sm.is_terminal() { 0 } else { 1 });
        for item in &progress {
            prop_assert!(!(item.active && item.completed));
        }
    }

    #[test]
    fn test_merge_is_idempotent(first in output_strategy(), second in output_strategy()) {
        let record = merge(&ApplicationRecord::with_defaults(300_000), &first);
        let once = merge(&record, &second);
        let twice = merge(&once, &second);
        prop_assert_eq!(&once, &twice);

        for (field, value) in second.iter() {
            prop_assert_eq!(once.get(field), Some(value));
        }
    }
}
