//! Boundary to the hosted text-classification and summarization service.
//!
//! Callers never see these errors directly: the classifier and the insight
//! aggregator treat every [`ServiceUnavailable`] the same way and switch to
//! their keyword rules.

mod huggingface;

pub use huggingface::HuggingFaceClient;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::InferenceConfig;

/// One candidate label with the score the model assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Any reason the external service could not produce a usable answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceUnavailable {
    #[error("no inference credential configured")]
    MissingCredential,
    #[error("inference call timed out after {0:?}")]
    Timeout(Duration),
    #[error("inference transport failed: {0}")]
    Transport(String),
    #[error("inference service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed inference response: {0}")]
    Malformed(String),
}

/// Client for the zero-shot classification and summarization capabilities.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn zero_shot(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable>;

    async fn summarize(&self, text: &str) -> Result<String, ServiceUnavailable>;
}

/// Stand-in used when no credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInference;

#[async_trait]
impl InferenceClient for DisabledInference {
    async fn zero_shot(
        &self,
        _text: &str,
        _labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        Err(ServiceUnavailable::MissingCredential)
    }

    async fn summarize(&self, _text: &str) -> Result<String, ServiceUnavailable> {
        Err(ServiceUnavailable::MissingCredential)
    }
}

/// Builds the configured client, degrading to [`DisabledInference`] when the
/// credential is missing or the HTTP client cannot be constructed.
pub fn client_from_config(config: &InferenceConfig) -> Arc<dyn InferenceClient> {
    if config.api_key.is_none() {
        warn!("HUGGINGFACE_API_KEY not set; claim triage and insights use keyword rules only");
        return Arc::new(DisabledInference);
    }

    match HuggingFaceClient::new(config) {
        Ok(client) => {
            info!(
                base_url = %config.base_url,
                zero_shot_model = %config.zero_shot_model,
                summary_model = %config.summary_model,
                "inference client initialized"
            );
            Arc::new(client)
        }
        Err(err) => {
            warn!(error = %err, "inference client unavailable; using keyword rules only");
            Arc::new(DisabledInference)
        }
    }
}

/// Caps an outbound call at `timeout` regardless of how the client behaves.
pub(crate) async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, ServiceUnavailable>
where
    F: Future<Output = Result<T, ServiceUnavailable>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceUnavailable::Timeout(timeout)),
    }
}

/// Highest scoring entry, validated against the labels that were offered.
/// Ties keep the first entry returned by the service.
pub(crate) fn top_label<'a>(
    scores: &'a [LabelScore],
    candidates: &[String],
) -> Result<&'a LabelScore, ServiceUnavailable> {
    let mut best: Option<&LabelScore> = None;
    for entry in scores {
        if !entry.score.is_finite() {
            return Err(ServiceUnavailable::Malformed(format!(
                "non-finite score for label '{}'",
                entry.label
            )));
        }
        if !candidates.iter().any(|candidate| candidate == &entry.label) {
            return Err(ServiceUnavailable::Malformed(format!(
                "unexpected label '{}'",
                entry.label
            )));
        }
        if best.map_or(true, |current| entry.score > current.score) {
            best = Some(entry);
        }
    }

    best.ok_or_else(|| ServiceUnavailable::Malformed("no labels returned".to_string()))
}
