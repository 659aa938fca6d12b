use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::domain::{
    Claim, ClaimDecision, ClaimNote, ClaimNumber, ClaimStatus, ClaimSubmission, Priority,
};
use super::repository::{ClaimRepository, RepositoryError};
use super::triage::{Classification, ClassificationError, PriorityClassifier};

/// Reviewer decision payload for an open claim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resolution {
    pub decision: ClaimDecision,
    pub actor: String,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Service composing the priority classifier with claim storage.
pub struct ClaimService<R> {
    repository: Arc<R>,
    classifier: PriorityClassifier,
    sequence: AtomicU64,
}

impl<R> ClaimService<R>
where
    R: ClaimRepository + 'static,
{
    pub fn new(repository: Arc<R>, classifier: PriorityClassifier) -> Self {
        Self {
            repository,
            classifier,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Classify a description without creating a claim.
    pub async fn classify(&self, description: &str) -> Result<Classification, ClaimServiceError> {
        Ok(self.classifier.classify(description).await?)
    }

    /// Validate, triage and persist a new claim in review.
    pub async fn create(
        &self,
        submission: ClaimSubmission,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimServiceError> {
        if submission.product.product_name.trim().is_empty() {
            return Err(ClaimServiceError::MissingProduct);
        }

        let triage = self.classifier.classify(&submission.description).await?;

        let mut claim = Claim {
            claim_number: self.next_number(now),
            store_id: submission.store_id,
            product: submission.product,
            issue_summary: submission.issue_summary.trim().to_string(),
            description: submission.description.trim().to_string(),
            category: submission.category,
            priority: triage.priority,
            triage,
            priority_overridden: false,
            status: ClaimStatus::InReview,
            submitted_at: now,
            resolved_at: None,
            estimated_cost: submission.estimated_cost,
            actual_cost: None,
            notes: Vec::new(),
        };

        // Numbers already taken by imported or persisted claims are skipped.
        let stored = loop {
            match self.repository.insert(claim.clone()) {
                Ok(stored) => break stored,
                Err(RepositoryError::Conflict) => {
                    debug!(claim = %claim.claim_number.0, "claim number taken");
                    claim.claim_number = self.next_number(now);
                }
                Err(err) => return Err(err.into()),
            }
        };
        info!(
            claim = %stored.claim_number.0,
            priority = stored.priority.label(),
            "claim submitted"
        );
        Ok(stored)
    }

    fn next_number(&self, now: DateTime<Utc>) -> ClaimNumber {
        ClaimNumber::new(now.year(), self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self, number: &ClaimNumber) -> Result<Claim, ClaimServiceError> {
        let claim = self
            .repository
            .fetch(number)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(claim)
    }

    /// Staff override of the triaged priority, recorded as a system note.
    pub fn override_priority(
        &self,
        number: &ClaimNumber,
        priority: Priority,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimServiceError> {
        let mut claim = self.get(number)?;
        let previous = claim.priority;
        claim.priority = priority;
        claim.priority_overridden = true;
        claim.notes.push(ClaimNote::system(
            actor,
            format!(
                "Priority changed from {} to {}",
                previous.label(),
                priority.label()
            ),
            now,
        ));

        self.repository.update(claim.clone())?;
        info!(
            claim = %number.0,
            from = previous.label(),
            to = priority.label(),
            "priority overridden"
        );
        Ok(claim)
    }

    /// Record the terminal decision. Only claims still in review can be resolved.
    pub fn resolve(
        &self,
        number: &ClaimNumber,
        resolution: Resolution,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimServiceError> {
        let mut claim = self.get(number)?;
        if claim.status.is_terminal() {
            return Err(ClaimServiceError::InvalidTransition {
                claim: number.clone(),
                from: claim.status,
            });
        }

        claim.status = resolution.decision.into();
        claim.resolved_at = Some(now);
        if resolution.actual_cost.is_some() {
            claim.actual_cost = resolution.actual_cost;
        }
        if let Some(note) = resolution.note.filter(|note| !note.trim().is_empty()) {
            claim
                .notes
                .push(ClaimNote::reviewer(&resolution.actor, note.trim(), now));
        }

        self.repository.update(claim.clone())?;
        info!(claim = %number.0, status = claim.status.label(), "claim resolved");
        Ok(claim)
    }

    pub fn add_note(
        &self,
        number: &ClaimNumber,
        author: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClaimServiceError::EmptyNote);
        }

        let mut claim = self.get(number)?;
        claim.notes.push(ClaimNote::reviewer(author, content, now));
        self.repository.update(claim.clone())?;
        Ok(claim)
    }
}

/// Error raised by the claim service.
#[derive(Debug, thiserror::Error)]
pub enum ClaimServiceError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    #[error("claim must reference a product")]
    MissingProduct,
    #[error("note content must not be empty")]
    EmptyNote,
    #[error("claim {} is already {}", .claim.0, .from.label())]
    InvalidTransition { claim: ClaimNumber, from: ClaimStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
