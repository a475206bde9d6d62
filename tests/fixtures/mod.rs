//! Shared fixtures for the wizard integration tests
//!
//! A complete, valid application lives in `application.json`, keyed by step.
//! The recorders below stand in for the session tracker and the backend.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use loan_wizard::session::{ContactDetails, SessionEvents};
use loan_wizard::steps::parse_step_input;
use loan_wizard::submission::{
    SubmissionAdapter, SubmissionFailure, SubmissionReceipt, SubmissionRequest,
};
use loan_wizard::wizard::{StepOutcome, WizardController, WizardDeps, WizardStep};
use loan_wizard::{StepOutput, WizardConfig, WizardMetrics};

pub const APPLICATION_JSON: &str = include_str!("application.json");

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn application() -> serde_json::Value {
    serde_json::from_str(APPLICATION_JSON).unwrap()
}

/// Fixture values of one step
pub fn step_values(step: WizardStep) -> StepOutput {
    let json = application();
    match json.get(step.as_str()) {
        Some(values) => parse_step_input(step, values).unwrap(),
        None => StepOutput::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Mounted,
    InteractionStarted,
    StepCompleted(WizardStep),
    ValidationFailed(WizardStep),
    ContactUpdated(ContactDetails),
    Submitted(Option<String>),
    SubmissionFailed(String),
}

/// Session tracker that remembers everything it was told
#[derive(Debug, Default)]
pub struct RecordingSession {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSession {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SessionEvents for RecordingSession {
    fn wizard_mounted(&self, _session_id: &str) {
        self.push(SessionEvent::Mounted);
    }

    fn interaction_started(&self, _session_id: &str) {
        self.push(SessionEvent::InteractionStarted);
    }

    fn step_completed(&self, _session_id: &str, step: WizardStep) {
        self.push(SessionEvent::StepCompleted(step));
    }

    fn validation_failed(&self, _session_id: &str, step: WizardStep) {
        self.push(SessionEvent::ValidationFailed(step));
    }

    fn contact_updated(&self, _session_id: &str, contact: &ContactDetails) {
        self.push(SessionEvent::ContactUpdated(contact.clone()));
    }

    fn submitted(&self, _session_id: &str, receipt: &SubmissionReceipt) {
        self.push(SessionEvent::Submitted(receipt.request_id.clone()));
    }

    fn submission_failed(&self, _session_id: &str, failure: &SubmissionFailure) {
        self.push(SessionEvent::SubmissionFailed(failure.kind().to_string()));
    }
}

/// Backend stand-in answering from a script; accepts once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    script: Mutex<VecDeque<Result<SubmissionReceipt, SubmissionFailure>>>,
    requests: Mutex<Vec<SubmissionRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedAdapter {
    pub fn new(script: Vec<Result<SubmissionReceipt, SubmissionFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn accepting(request_id: &str) -> Self {
        Self::new(vec![Ok(receipt(request_id))])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionAdapter for ScriptedAdapter {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmissionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| Ok(SubmissionReceipt::default()))
    }
}

pub fn receipt(request_id: &str) -> SubmissionReceipt {
    SubmissionReceipt {
        request_id: Some(request_id.to_string()),
    }
}

pub fn deps(adapter: Arc<ScriptedAdapter>, session: Arc<RecordingSession>) -> WizardDeps {
    WizardDeps::new(WizardConfig::default(), adapter, session)
        .with_metrics(Arc::new(WizardMetrics::new()))
        .with_today(today())
}

/// Fill the active step with its fixture values and press "next"
pub async fn fill_and_submit(controller: &WizardController) -> StepOutcome {
    let mut form = controller.open_step().await;
    form.enter(&step_values(form.step()));
    controller.submit_step(form.submit()).await
}

/// Complete the first three steps, leaving the wizard on the income step
pub async fn reach_income_step(controller: &WizardController) {
    for _ in 0..3 {
        let outcome = fill_and_submit(controller).await;
        assert!(matches!(outcome, StepOutcome::Advanced(_)), "{outcome:?}");
    }
    assert_eq!(controller.step().await, WizardStep::IncomeInfo);
}
