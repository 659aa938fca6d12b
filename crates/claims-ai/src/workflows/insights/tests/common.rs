use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::inference::{InferenceClient, LabelScore, ServiceUnavailable};
use crate::workflows::claims::domain::{
    Claim, ClaimCategory, ClaimNote, ClaimNumber, ClaimStatus, Priority, ProductRef, StoreId,
};
use crate::workflows::claims::repository::{ClaimRepository, RepositoryError};
use crate::workflows::claims::triage::{Classification, ClassificationSource};
use crate::workflows::insights::{InsightAggregator, InsightPolicy};

pub(super) const TIMEOUT: Duration = Duration::from_millis(100);
pub(super) const STORE: &str = "store-12";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Builder for historical claims relative to [`now`].
pub(super) struct ClaimFixture {
    claim: Claim,
}

impl ClaimFixture {
    pub(super) fn new(sequence: u64, product: &str, description: &str) -> Self {
        let submitted_at = now() - chrono::Duration::days(10);
        Self {
            claim: Claim {
                claim_number: ClaimNumber::new(2025, sequence),
                store_id: StoreId(STORE.to_string()),
                product: ProductRef {
                    product_name: product.to_string(),
                    model: None,
                },
                issue_summary: String::new(),
                description: description.to_string(),
                category: ClaimCategory::Other,
                priority: Priority::Medium,
                triage: Classification {
                    priority: Priority::Medium,
                    reason: "seeded".to_string(),
                    source: ClassificationSource::Fallback,
                    confidence: None,
                },
                priority_overridden: false,
                status: ClaimStatus::InReview,
                submitted_at,
                resolved_at: None,
                estimated_cost: None,
                actual_cost: None,
                notes: Vec::new(),
            },
        }
    }

    pub(super) fn submitted_days_ago(mut self, days: i64) -> Self {
        self.claim.submitted_at = now() - chrono::Duration::days(days);
        self
    }

    pub(super) fn approved_after(mut self, days: i64) -> Self {
        self.claim.status = ClaimStatus::Approved;
        self.claim.resolved_at = Some(self.claim.submitted_at + chrono::Duration::days(days));
        self
    }

    pub(super) fn rejected_after(mut self, days: i64, note: &str) -> Self {
        self.claim.status = ClaimStatus::Rejected;
        self.claim.resolved_at = Some(self.claim.submitted_at + chrono::Duration::days(days));
        if !note.is_empty() {
            self.claim
                .notes
                .push(ClaimNote::reviewer("reviewer", note, now()));
        }
        self
    }

    pub(super) fn overridden_to(mut self, priority: Priority) -> Self {
        let content = format!(
            "Priority changed from {} to {}",
            self.claim.priority.label(),
            priority.label()
        );
        self.claim.priority = priority;
        self.claim.priority_overridden = true;
        self.claim
            .notes
            .push(ClaimNote::system("staff", content, now()));
        self
    }

    pub(super) fn build(self) -> Claim {
        self.claim
    }
}

/// Seven approved, two rejected and one open claim across three products.
pub(super) fn mixed_history() -> Vec<Claim> {
    let mut claims = Vec::new();
    for sequence in 1..=4 {
        claims.push(
            ClaimFixture::new(sequence, "Galaxy S23", "Battery drains overnight")
                .approved_after(2)
                .build(),
        );
    }
    for sequence in 5..=7 {
        claims.push(
            ClaimFixture::new(sequence, "iPad Air", "Screen cracked after a week")
                .approved_after(4)
                .build(),
        );
    }
    claims.push(
        ClaimFixture::new(8, "Galaxy S23", "Dropped in water")
            .rejected_after(1, "Liquid damage is not covered")
            .build(),
    );
    claims.push(
        ClaimFixture::new(9, "Pixel 8", "Dent on the corner")
            .rejected_after(1, "Accidental physical damage not covered")
            .build(),
    );
    claims.push(ClaimFixture::new(10, "Pixel 8", "Camera app crashes").build());
    claims
}

pub(super) struct StaticRepository {
    claims: Vec<Claim>,
}

impl StaticRepository {
    pub(super) fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }
}

impl ClaimRepository for StaticRepository {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError> {
        Ok(claim)
    }

    fn update(&self, _claim: Claim) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn fetch(&self, number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError> {
        Ok(self
            .claims
            .iter()
            .find(|claim| &claim.claim_number == number)
            .cloned())
    }

    fn for_store(&self, store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError> {
        Ok(self
            .claims
            .iter()
            .filter(|claim| &claim.store_id == store_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ClaimRepository for UnavailableRepository {
    fn insert(&self, _claim: Claim) -> Result<Claim, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _claim: Claim) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn for_store(&self, _store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

/// Always picks the first offered label and returns a fixed summary.
#[derive(Default)]
pub(super) struct FirstLabelInference {
    pub(super) zero_shot_calls: Mutex<usize>,
    pub(super) texts: Mutex<Vec<String>>,
    pub(super) prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl InferenceClient for FirstLabelInference {
    async fn zero_shot(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        *self.zero_shot_calls.lock().expect("lock") += 1;
        self.texts.lock().expect("lock").push(text.to_string());
        Ok(labels
            .iter()
            .enumerate()
            .map(|(index, label)| LabelScore {
                label: label.clone(),
                score: if index == 0 { 0.9 } else { 0.01 },
            })
            .collect())
    }

    async fn summarize(&self, text: &str) -> Result<String, ServiceUnavailable> {
        self.prompts.lock().expect("lock").push(text.to_string());
        Ok("  Claims were mostly approved this period.  ".to_string())
    }
}

/// Fails every call, counting how often it was asked.
#[derive(Default)]
pub(super) struct FailingInference {
    pub(super) calls: Mutex<usize>,
}

#[async_trait]
impl InferenceClient for FailingInference {
    async fn zero_shot(
        &self,
        _text: &str,
        _labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        *self.calls.lock().expect("lock") += 1;
        Err(ServiceUnavailable::Status {
            status: 503,
            body: "model loading".to_string(),
        })
    }

    async fn summarize(&self, _text: &str) -> Result<String, ServiceUnavailable> {
        *self.calls.lock().expect("lock") += 1;
        Err(ServiceUnavailable::Transport("connection reset".to_string()))
    }
}

/// Answers every call correctly, but only after `delay`.
pub(super) struct SlowInference {
    pub(super) delay: Duration,
    pub(super) calls: Mutex<usize>,
}

impl SlowInference {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl InferenceClient for SlowInference {
    async fn zero_shot(
        &self,
        _text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        *self.calls.lock().expect("lock") += 1;
        tokio::time::sleep(self.delay).await;
        Ok(labels
            .iter()
            .map(|label| LabelScore {
                label: label.clone(),
                score: 0.5,
            })
            .collect())
    }

    async fn summarize(&self, _text: &str) -> Result<String, ServiceUnavailable> {
        Ok("Slow but steady.".to_string())
    }
}

pub(super) struct HangingInference;

#[async_trait]
impl InferenceClient for HangingInference {
    async fn zero_shot(
        &self,
        _text: &str,
        _labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        std::future::pending().await
    }

    async fn summarize(&self, _text: &str) -> Result<String, ServiceUnavailable> {
        std::future::pending().await
    }
}

pub(super) fn aggregator<R: ClaimRepository + 'static>(
    repository: R,
    client: Arc<dyn InferenceClient>,
) -> InsightAggregator<R> {
    aggregator_with_policy(repository, client, InsightPolicy::default())
}

pub(super) fn aggregator_with_policy<R: ClaimRepository + 'static>(
    repository: R,
    client: Arc<dyn InferenceClient>,
    policy: InsightPolicy,
) -> InsightAggregator<R> {
    InsightAggregator::new(Arc::new(repository), client, policy, TIMEOUT)
}

pub(super) fn offline_aggregator(claims: Vec<Claim>) -> InsightAggregator<StaticRepository> {
    aggregator(
        StaticRepository::new(claims),
        Arc::new(FailingInference::default()),
    )
}
