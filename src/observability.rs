use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Counters for wizard activity
#[derive(Debug, Default)]
pub struct WizardMetrics {
    pub steps_completed: AtomicU64,
    pub validation_failures: AtomicU64,
    pub submissions_accepted: AtomicU64,
    pub submissions_rejected: AtomicU64,
    pub transport_failures: AtomicU64,
    pub suppressed_submits: AtomicU64,
}

impl WizardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step_completed(&self) {
        self.steps_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission_accepted(&self) {
        self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A forward trigger arrived while a submission was already pending
    pub fn record_suppressed_submit(&self) {
        self.suppressed_submits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> WizardStats {
        WizardStats {
            steps_completed: self.steps_completed.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            submissions_accepted: self.submissions_accepted.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            suppressed_submits: self.suppressed_submits.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            steps_completed = stats.steps_completed,
            validation_failures = stats.validation_failures,
            accepted = stats.submissions_accepted,
            rejected = stats.submissions_rejected,
            transport_failures = stats.transport_failures,
            suppressed_submits = stats.suppressed_submits,
            "Wizard metrics"
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardStats {
    pub steps_completed: u64,
    pub validation_failures: u64,
    pub submissions_accepted: u64,
    pub submissions_rejected: u64,
    pub transport_failures: u64,
    pub suppressed_submits: u64,
}

/// Global metrics instance
static WIZARD_METRICS: std::sync::LazyLock<Arc<WizardMetrics>> =
    std::sync::LazyLock::new(|| Arc::new(WizardMetrics::new()));

/// Process-wide counters shared by every controller that does not bring its own
pub fn wizard_metrics() -> Arc<WizardMetrics> {
    Arc::clone(&WIZARD_METRICS)
}

/// Time an operation and log its duration
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();
        info!(
            operation = %self.operation,
            duration_ms,
            "Operation completed"
        );
        duration_ms
    }
}
