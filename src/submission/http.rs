use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::payload::LoanApplicationPayload;
use super::{SubmissionAdapter, SubmissionFailure, SubmissionReceipt, SubmissionRequest};
use crate::config::WizardConfig;

const FORM_PATH: &str = "forms/personal-loan";

/// Body of the form endpoint and of the session close endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormResponse {
    status: Option<String>,
    success: Option<bool>,
    #[serde(
        alias = "fc_request_id",
        alias = "requestId",
        alias = "id",
        deserialize_with = "text_or_number"
    )]
    request_id: Option<String>,
    errors: Option<serde_json::Value>,
}

impl FormResponse {
    fn is_accepted(&self) -> bool {
        self.status.as_deref() == Some("success") || self.success == Some(true)
    }

    fn error_messages(&self) -> Vec<String> {
        let messages: Vec<String> = match &self.errors {
            Some(serde_json::Value::Array(items)) => items.iter().map(value_text).collect(),
            Some(serde_json::Value::Object(map)) => map
                .iter()
                .map(|(field, error)| format!("{field}: {}", value_text(error)))
                .collect(),
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(other) => vec![value_text(other)],
        };
        if messages.is_empty() {
            vec!["Application was not accepted".to_string()]
        } else {
            messages
        }
    }
}

/// Request ids arrive as strings or as bare numbers
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) if text.is_empty() => None,
        Some(other) => Some(value_text(&other)),
    })
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Sends applications to the form backend over HTTP.
///
/// An application counts as accepted only after the backend accepted the form
/// and the form session was closed.
#[derive(Debug, Clone)]
pub struct HttpSubmissionAdapter {
    client: Client,
    config: WizardConfig,
}

impl HttpSubmissionAdapter {
    pub fn new(config: WizardConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.backend.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<FormResponse, SubmissionFailure> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| SubmissionFailure::transport(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmissionFailure::transport(format!(
                "POST {url} returned {status}: {body}"
            )));
        }

        response
            .json::<FormResponse>()
            .await
            .map_err(|e| SubmissionFailure::transport(format!("Invalid response from {url}: {e}")))
    }

    async fn close_session(&self) -> Result<(), SubmissionFailure> {
        let url = self.url(&format!("sessions/{}/submit", self.config.backend.form_alias));
        let response = self.post(&url, &serde_json::json!({})).await?;
        if response.success == Some(true) {
            debug!(alias = %self.config.backend.form_alias, "Form session closed");
            Ok(())
        } else {
            warn!(alias = %self.config.backend.form_alias, "Form session close was not confirmed");
            Err(SubmissionFailure::Rejected {
                errors: vec!["Form session could not be closed".to_string()],
            })
        }
    }
}

#[async_trait]
impl SubmissionAdapter for HttpSubmissionAdapter {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmissionFailure> {
        let payload = LoanApplicationPayload::from_record(request, &self.config);
        let url = self.url(FORM_PATH);

        info!(session_id = %request.session_id, url = %url, test = payload.test, "Submitting loan application");
        let response = self.post(&url, &payload).await?;

        if !response.is_accepted() {
            let errors = response.error_messages();
            warn!(session_id = %request.session_id, errors = ?errors, "Loan application rejected");
            return Err(SubmissionFailure::Rejected { errors });
        }

        self.close_session().await?;

        Ok(SubmissionReceipt {
            request_id: response.request_id,
        })
    }
}
