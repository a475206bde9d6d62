//! Top-level coordinator of a loan application session.
//!
//! The controller owns the accumulated [`ApplicationRecord`] and the
//! [`WizardStateMachine`]. Steps never write to the record directly: they hand
//! back a [`StepSubmission`] (or their unsubmitted values on backward
//! navigation) and the controller merges it strictly before the transition
//! derived from it.

use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn, Instrument};

use super::errors::WizardError;
use super::state_machine::WizardStateMachine;
use super::types::{ProgressItem, StepTransition, WizardEvent, WizardStep};
use crate::config::WizardConfig;
use crate::merge::{merge, StepOutput};
use crate::observability::{wizard_metrics, OperationTimer, WizardMetrics};
use crate::record::{fields, ApplicationRecord};
use crate::resume::ResumeStore;
use crate::session::{ContactDetails, SessionEvents};
use crate::steps::{FormSettings, StepForm, StepSubmission};
use crate::submission::{SubmissionAdapter, SubmissionFailure, SubmissionReceipt, SubmissionRequest};
use crate::telemetry::{create_wizard_span, generate_correlation_id};

/// Calculator fields a stored preset may seed on the credit step
const CREDIT_PRESET_FIELDS: &[&str] = &[fields::CREDIT_AMOUNT, fields::CREDIT_PERIOD, fields::INSURANCE];

/// Collaborators and settings handed to [`WizardController::mount`]
#[derive(Clone)]
pub struct WizardDeps {
    pub config: WizardConfig,
    pub adapter: Arc<dyn SubmissionAdapter>,
    pub session: Arc<dyn SessionEvents>,
    pub resume: Option<Arc<dyn ResumeStore>>,
    pub metrics: Arc<WizardMetrics>,
    /// Fixed date for validation; the local date when unset
    pub today: Option<NaiveDate>,
}

impl WizardDeps {
    pub fn new(
        config: WizardConfig,
        adapter: Arc<dyn SubmissionAdapter>,
        session: Arc<dyn SessionEvents>,
    ) -> Self {
        Self {
            config,
            adapter,
            session,
            resume: None,
            metrics: wizard_metrics(),
            today: None,
        }
    }

    pub fn with_resume_store(mut self, store: Arc<dyn ResumeStore>) -> Self {
        self.resume = Some(store);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<WizardMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

/// The active step together with a read copy of the record to seed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStep {
    pub step: WizardStep,
    pub seed: ApplicationRecord,
}

/// What happened to a step submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stale submission from a step that is no longer active, or an
    /// acceptance the wizard could not apply
    Ignored,
    /// The step reported invalid values; nothing was merged
    Invalid,
    Advanced(StepTransition),
    Submitted(SubmissionReceipt),
    /// Submission failed; the wizard stays on the final step
    Failed(SubmissionFailure),
    /// A submission is already in flight; this trigger was suppressed
    Pending,
}

struct WizardState {
    machine: WizardStateMachine,
    record: ApplicationRecord,
    /// Consumed the first time the credit step opens
    credit_presets: Option<ApplicationRecord>,
}

pub struct WizardController {
    session_id: String,
    state: Mutex<WizardState>,
    submitting: AtomicBool,
    deps: WizardDeps,
}

impl WizardController {
    /// Start a session: fresh machine, default record, resume cache read once
    pub async fn mount(deps: WizardDeps) -> Self {
        let session_id = generate_correlation_id();
        let mut record = ApplicationRecord::with_defaults(deps.config.credit.default_amount);
        let mut credit_presets = None;

        if let (true, Some(store)) = (deps.config.resume.enabled, deps.resume.as_ref()) {
            if let Some(saved) = store.load(&deps.config.resume.product_key).await {
                info!(session_id = %session_id, fields = saved.len(), "Resuming saved application");
                record = merge(&record, &as_output(&saved, None));
            }
            credit_presets = store.load(&deps.config.resume.credit_preset_key).await;
        }

        deps.session.wizard_mounted(&session_id);
        info!(session_id = %session_id, "Loan wizard mounted");

        Self {
            session_id,
            state: Mutex::new(WizardState {
                machine: WizardStateMachine::new(),
                record,
                credit_presets,
            }),
            submitting: AtomicBool::new(false),
            deps,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub async fn step(&self) -> WizardStep {
        self.state.lock().await.machine.step()
    }

    /// Read copy of the accumulated record
    pub async fn record(&self) -> ApplicationRecord {
        self.state.lock().await.record.clone()
    }

    pub async fn progress(&self) -> Vec<ProgressItem> {
        self.state.lock().await.machine.progress()
    }

    /// Backend request id once the application was accepted
    pub async fn request_id(&self) -> Option<String> {
        self.state.lock().await.machine.request_id().map(str::to_string)
    }

    /// Number of times the completion was logged; at most one
    pub async fn completions_logged(&self) -> u32 {
        self.state.lock().await.machine.completions_logged()
    }

    pub async fn active_step(&self) -> ActiveStep {
        let state = self.state.lock().await;
        ActiveStep {
            step: state.machine.step(),
            seed: state.record.clone(),
        }
    }

    /// Step-local form for the active step, seeded from the record
    pub async fn open_step(&self) -> StepForm {
        let mut state = self.state.lock().await;
        let step = state.machine.step();
        let mut seed = state.record.clone();

        if step == WizardStep::CreditParameters {
            if let Some(presets) = state.credit_presets.take() {
                debug!(session_id = %self.session_id, "Seeding credit step from calculator presets");
                seed = merge(&seed, &as_output(&presets, Some(CREDIT_PRESET_FIELDS)));
            }
        }

        StepForm::open(step, &seed, FormSettings::from(&self.deps.config), self.today())
    }

    /// Emit `START`; the session hears about it only the first time
    pub async fn start_interaction(&self) -> bool {
        let mut state = self.state.lock().await;
        let first = !state.machine.context().interaction_started;
        state.machine.handle(&WizardEvent::Start);
        if first && state.machine.context().interaction_started {
            self.deps.session.interaction_started(&self.session_id);
            return true;
        }
        false
    }

    pub async fn submit_step(&self, submission: StepSubmission) -> StepOutcome {
        let state = self.state.lock().await;
        let step = state.machine.step();

        if submission.step != step {
            debug!(
                session_id = %self.session_id,
                active = %step,
                submitted = %submission.step,
                "Ignoring submission from inactive step"
            );
            return StepOutcome::Ignored;
        }

        if !submission.valid {
            self.deps.metrics.record_validation_failure();
            self.deps.session.validation_failed(&self.session_id, step);
            return StepOutcome::Invalid;
        }

        if !step.is_final_form_step() {
            return self.advance(state, step, &submission.output).await;
        }

        if self.submitting.swap(true, Ordering::SeqCst) {
            self.deps.metrics.record_suppressed_submit();
            debug!(session_id = %self.session_id, "Submission already pending, trigger suppressed");
            return StepOutcome::Pending;
        }

        let request = SubmissionRequest {
            session_id: self.session_id.clone(),
            record: merge(&state.record, &submission.output),
        };
        drop(state);

        let timer = OperationTimer::new("submit_application");
        let result = self
            .deps
            .adapter
            .submit(&request)
            .instrument(create_wizard_span("submit", &self.session_id, Some(step.as_str())))
            .await;
        timer.finish();

        let mut state = self.state.lock().await;
        let outcome = match result {
            Ok(receipt) => {
                let accepted = state.machine.handle(&WizardEvent::SubmitSuccess {
                    request_id: receipt.request_id.clone(),
                });
                if accepted.transition().is_none() {
                    // Navigation is locked while pending, so the income step must still be active
                    error!(
                        session_id = %self.session_id,
                        step = %state.machine.step(),
                        request_id = ?receipt.request_id,
                        "Accepted submission arrived outside the income step"
                    );
                    self.submitting.store(false, Ordering::SeqCst);
                    return StepOutcome::Ignored;
                }
                state.record = request.record;
                self.deps.metrics.record_submission_accepted();
                self.deps.session.submitted(&self.session_id, &receipt);
                if let Some(store) = self.resume_store() {
                    store.remove(&self.deps.config.resume.product_key).await;
                }
                StepOutcome::Submitted(receipt)
            }
            Err(failure) => {
                state.machine.handle(&WizardEvent::SubmitFailure);
                if failure.is_transport() {
                    self.deps.metrics.record_transport_failure();
                } else {
                    self.deps.metrics.record_submission_rejected();
                }
                warn!(session_id = %self.session_id, kind = failure.kind(), error = %failure, "Submission failed");
                self.deps.session.submission_failed(&self.session_id, &failure);
                StepOutcome::Failed(failure)
            }
        };
        self.submitting.store(false, Ordering::SeqCst);
        outcome
    }

    async fn advance(
        &self,
        mut state: tokio::sync::MutexGuard<'_, WizardState>,
        step: WizardStep,
        output: &StepOutput,
    ) -> StepOutcome {
        state.record = merge(&state.record, output);

        let Some(transition) = state.machine.handle(&WizardEvent::Advance).transition().cloned() else {
            return StepOutcome::Ignored;
        };

        self.deps.metrics.record_step_completed();
        self.deps.session.step_completed(&self.session_id, step);

        if step == WizardStep::PersonalInfo {
            let contact = ContactDetails::new(
                state.record.text(fields::FULL_NAME),
                state.record.text(fields::PHONE),
                state.record.text(fields::EMAIL),
            );
            self.deps.session.contact_updated(&self.session_id, &contact);
        }

        let snapshot = state.record.clone();
        drop(state);

        if let Some(store) = self.resume_store() {
            store.save(&self.deps.config.resume.product_key, &snapshot).await;
        }

        StepOutcome::Advanced(transition)
    }

    /// Keep the step's unsubmitted values, then go one step back.
    ///
    /// Ignored entirely when the active step has no predecessor or a
    /// submission is pending.
    pub async fn go_back(&self, current_values: StepOutput) -> Option<StepTransition> {
        if self.is_submitting() {
            return None;
        }
        let mut state = self.state.lock().await;
        // A submission may have started while this call waited for the lock
        if self.is_submitting() || !state.machine.can_go_back() {
            return None;
        }
        state.record = merge(&state.record, &current_values);
        state.machine.handle(&WizardEvent::Back).transition().cloned()
    }

    /// Revisit an earlier step by going back one step at a time
    pub async fn jump_to(
        &self,
        target: WizardStep,
        current_values: StepOutput,
    ) -> Result<Vec<StepTransition>, WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionPending);
        }
        let mut state = self.state.lock().await;
        if self.is_submitting() {
            return Err(WizardError::SubmissionPending);
        }
        let from = state.machine.step();

        if state.machine.is_terminal() {
            return Err(WizardError::Completed);
        }
        if target == from {
            return Ok(Vec::new());
        }
        if target > from {
            return Err(WizardError::InvalidJump { from, to: target });
        }

        state.record = merge(&state.record, &current_values);

        let mut transitions = Vec::new();
        while state.machine.step() != target {
            match state.machine.handle(&WizardEvent::Back).transition().cloned() {
                Some(transition) => transitions.push(transition),
                None => break,
            }
        }
        Ok(transitions)
    }

    fn resume_store(&self) -> Option<&Arc<dyn ResumeStore>> {
        self.deps.resume.as_ref().filter(|_| self.deps.config.resume.enabled)
    }

    fn today(&self) -> NaiveDate {
        self.deps.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Record values as a step output, optionally limited to some fields
fn as_output(record: &ApplicationRecord, only: Option<&[&str]>) -> StepOutput {
    record
        .iter()
        .filter(|(field, _)| only.map_or(true, |allowed| allowed.contains(field)))
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::MockResumeStore;
    use crate::session::MockSessionEvents;
    use crate::submission::MockSubmissionAdapter;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn quiet_session() -> MockSessionEvents {
        let mut session = MockSessionEvents::new();
        session.expect_wizard_mounted().return_const(());
        session.expect_interaction_started().return_const(());
        session.expect_step_completed().return_const(());
        session.expect_validation_failed().return_const(());
        session.expect_contact_updated().return_const(());
        session.expect_submitted().return_const(());
        session.expect_submission_failed().return_const(());
        session
    }

    fn deps(adapter: MockSubmissionAdapter, session: MockSessionEvents) -> WizardDeps {
        WizardDeps::new(WizardConfig::default(), Arc::new(adapter), Arc::new(session))
            .with_metrics(Arc::new(WizardMetrics::new()))
            .with_today(today())
    }

    fn submission(step: WizardStep, valid: bool) -> StepSubmission {
        StepSubmission {
            step,
            output: StepOutput::new().with(fields::EMAIL, "ivan@example.com"),
            valid,
        }
    }

    #[tokio::test]
    async fn test_mount_starts_on_personal_info_with_defaults() {
        let mut session = MockSessionEvents::new();
        session.expect_wizard_mounted().times(1).return_const(());

        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), session)).await;
        let active = controller.active_step().await;

        assert_eq!(active.step, WizardStep::PersonalInfo);
        assert_eq!(active.seed.text(fields::CREDIT_PERIOD), "36");
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_invalid_submission_notifies_and_stays() {
        let mut session = MockSessionEvents::new();
        session.expect_wizard_mounted().return_const(());
        session
            .expect_validation_failed()
            .withf(|_, step| *step == WizardStep::PersonalInfo)
            .times(1)
            .return_const(());

        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), session)).await;
        let outcome = controller.submit_step(submission(WizardStep::PersonalInfo, false)).await;

        assert_eq!(outcome, StepOutcome::Invalid);
        assert_eq!(controller.step().await, WizardStep::PersonalInfo);
        assert!(controller.record().await.is_blank(fields::EMAIL));
    }

    #[tokio::test]
    async fn test_stale_submission_is_ignored() {
        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), quiet_session())).await;
        let outcome = controller.submit_step(submission(WizardStep::PassportInfo, true)).await;
        assert_eq!(outcome, StepOutcome::Ignored);
        assert!(controller.record().await.is_blank(fields::EMAIL));
    }

    #[tokio::test]
    async fn test_navigation_waiting_on_lock_sees_pending_submission() {
        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), quiet_session())).await;
        controller.submit_step(submission(WizardStep::PersonalInfo, true)).await;
        assert_eq!(controller.step().await, WizardStep::CreditParameters);

        // Both calls pass the early flag check, then queue behind the held lock
        // while a submission marks itself pending
        let guard = controller.state.lock().await;
        let submitting = &controller.submitting;
        let start_submission = async move {
            tokio::task::yield_now().await;
            submitting.store(true, Ordering::SeqCst);
            drop(guard);
        };
        let (back, jump, ()) = tokio::join!(
            controller.go_back(StepOutput::new().with(fields::CREDIT_AMOUNT, "900000")),
            controller.jump_to(WizardStep::PersonalInfo, StepOutput::new()),
            start_submission,
        );

        assert_eq!(back, None);
        assert_eq!(jump, Err(WizardError::SubmissionPending));
        assert_eq!(controller.step().await, WizardStep::CreditParameters);
        assert_ne!(controller.record().await.text(fields::CREDIT_AMOUNT), "900000");
    }

    #[tokio::test]
    async fn test_interaction_started_reported_once() {
        let mut session = MockSessionEvents::new();
        session.expect_wizard_mounted().return_const(());
        session.expect_interaction_started().times(1).return_const(());

        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), session)).await;
        assert!(controller.start_interaction().await);
        assert!(!controller.start_interaction().await);
    }

    #[tokio::test]
    async fn test_personal_completion_updates_contact() {
        let mut session = MockSessionEvents::new();
        session.expect_wizard_mounted().return_const(());
        session.expect_step_completed().times(1).return_const(());
        session
            .expect_contact_updated()
            .withf(|_, contact| contact.surname == "Иванов" && contact.phone == "79001234567")
            .times(1)
            .return_const(());

        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), session)).await;
        let output = StepOutput::new()
            .with(fields::FULL_NAME, "Иванов Иван Иванович")
            .with(fields::PHONE, "+7 (900) 123-45-67");
        let outcome = controller
            .submit_step(StepSubmission {
                step: WizardStep::PersonalInfo,
                output,
                valid: true,
            })
            .await;

        assert!(matches!(outcome, StepOutcome::Advanced(_)));
        assert_eq!(controller.step().await, WizardStep::CreditParameters);
    }

    #[tokio::test]
    async fn test_resume_store_seeds_record_and_mirrors_progress() {
        let mut saved = ApplicationRecord::new();
        saved.set(fields::FULL_NAME, "Петров Пётр Петрович");

        let mut presets = ApplicationRecord::new();
        presets.set(fields::CREDIT_AMOUNT, "750000");
        presets.set(fields::EMAIL, "ignored@example.com");

        let mut store = MockResumeStore::new();
        store
            .expect_load()
            .withf(|key| key == "personal-loan")
            .times(1)
            .returning(move |_| Some(saved.clone()));
        store
            .expect_load()
            .withf(|key| key == "credit_params")
            .times(1)
            .returning(move |_| Some(presets.clone()));
        store.expect_save().times(1).return_const(());

        let deps = deps(MockSubmissionAdapter::new(), quiet_session()).with_resume_store(Arc::new(store));
        let controller = WizardController::mount(deps).await;
        assert_eq!(controller.record().await.text(fields::FULL_NAME), "Петров Пётр Петрович");

        controller.submit_step(submission(WizardStep::PersonalInfo, true)).await;
        let credit = controller.open_step().await;
        assert_eq!(credit.text(fields::CREDIT_AMOUNT), "750000");
        assert_eq!(credit.text(fields::EMAIL), "ivan@example.com");
    }

    #[tokio::test]
    async fn test_jump_forward_is_rejected() {
        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), quiet_session())).await;
        let result = controller.jump_to(WizardStep::IncomeInfo, StepOutput::new()).await;
        assert_eq!(
            result,
            Err(WizardError::InvalidJump {
                from: WizardStep::PersonalInfo,
                to: WizardStep::IncomeInfo
            })
        );
    }

    #[tokio::test]
    async fn test_go_back_on_first_step_does_not_merge() {
        let controller = WizardController::mount(deps(MockSubmissionAdapter::new(), quiet_session())).await;
        let transition = controller
            .go_back(StepOutput::new().with(fields::EMAIL, "draft@example.com"))
            .await;
        assert!(transition.is_none());
        assert!(controller.record().await.is_blank(fields::EMAIL));
    }
}
