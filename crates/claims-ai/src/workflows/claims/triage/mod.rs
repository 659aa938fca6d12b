//! Claim priority triage: zero-shot model first, keyword tiers as the fallback.

mod config;

pub use config::{PriorityLabel, TriagePolicy};

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::Priority;
use crate::inference::{bounded, top_label, InferenceClient, ServiceUnavailable};
use crate::workflows::text::{first_keyword, normalize_text};

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Ai,
    Fallback,
}

/// Priority decision with a reviewer-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub priority: Priority,
    pub reason: String,
    pub source: ClassificationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Input problems; external failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("claim description must not be empty")]
    EmptyDescription,
}

/// Request-scoped priority classifier with an injected inference client.
pub struct PriorityClassifier {
    client: Arc<dyn InferenceClient>,
    policy: TriagePolicy,
    timeout: Duration,
}

impl PriorityClassifier {
    pub fn new(client: Arc<dyn InferenceClient>, policy: TriagePolicy, timeout: Duration) -> Self {
        Self {
            client,
            policy,
            timeout,
        }
    }

    pub fn policy(&self) -> &TriagePolicy {
        &self.policy
    }

    pub async fn classify(&self, description: &str) -> Result<Classification, ClassificationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClassificationError::EmptyDescription);
        }

        match self.classify_with_model(description).await {
            Ok(classification) => {
                info!(
                    priority = classification.priority.label(),
                    confidence = classification.confidence,
                    "zero-shot priority classification"
                );
                Ok(classification)
            }
            Err(err) => {
                warn!(error = %err, "priority model unavailable; using keyword tiers");
                Ok(keyword_classification(description, &self.policy))
            }
        }
    }

    async fn classify_with_model(
        &self,
        description: &str,
    ) -> Result<Classification, ServiceUnavailable> {
        let labels = self.policy.candidate_labels();
        let scores = bounded(self.timeout, self.client.zero_shot(description, &labels)).await?;
        let best = top_label(&scores, &labels)?;
        let priority = self
            .policy
            .priority_for_label(&best.label)
            .ok_or_else(|| {
                ServiceUnavailable::Malformed(format!("unmapped label '{}'", best.label))
            })?;

        Ok(Classification {
            priority,
            reason: format!(
                "AI classified the description as '{}' ({:.0}% confidence)",
                best.label,
                best.score * 100.0
            ),
            source: ClassificationSource::Ai,
            confidence: Some(best.score),
        })
    }
}

/// Deterministic tiering: High keywords, then Medium, otherwise Low.
pub fn keyword_classification(description: &str, policy: &TriagePolicy) -> Classification {
    let normalized = normalize_text(description);
    let high = first_keyword(&normalized, &policy.high_keywords);

    let (priority, reason) = if let Some(keyword) = high {
        (
            Priority::High,
            format!("Safety or urgency keyword '{keyword}' found in description"),
        )
    } else if let Some(keyword) = first_keyword(&normalized, &policy.medium_keywords) {
        (
            Priority::Medium,
            format!("Functional fault keyword '{keyword}' found in description"),
        )
    } else if let Some(keyword) = first_keyword(&normalized, &policy.low_keywords) {
        (
            Priority::Low,
            format!("Cosmetic or minor keyword '{keyword}' found in description"),
        )
    } else {
        (
            Priority::Low,
            "No urgency or fault keywords found in description".to_string(),
        )
    };

    info!(priority = priority.label(), reason = %reason, "keyword priority classification");

    Classification {
        priority,
        reason,
        source: ClassificationSource::Fallback,
        confidence: None,
    }
}
