use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::inference::{InferenceClient, LabelScore, ServiceUnavailable};
use crate::workflows::claims::domain::{
    Claim, ClaimCategory, ClaimNumber, ClaimSubmission, ProductRef, StoreId,
};
use crate::workflows::claims::repository::{ClaimRepository, RepositoryError};
use crate::workflows::claims::triage::{PriorityClassifier, TriagePolicy};
use crate::workflows::claims::{claim_router, ClaimService};

pub(super) const TIMEOUT: Duration = Duration::from_millis(200);

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn submission(description: &str) -> ClaimSubmission {
    ClaimSubmission {
        store_id: StoreId("store-7".to_string()),
        product: ProductRef {
            product_name: "Pixel 8".to_string(),
            model: Some("GKWS6".to_string()),
        },
        issue_summary: "Phone problem".to_string(),
        description: description.to_string(),
        category: ClaimCategory::Malfunction,
        estimated_cost: Some(180.0),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    claims: Mutex<BTreeMap<ClaimNumber, Claim>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, number: &ClaimNumber) -> Option<Claim> {
        self.claims.lock().expect("lock").get(number).cloned()
    }
}

impl ClaimRepository for MemoryRepository {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError> {
        let mut guard = self.claims.lock().expect("lock");
        if guard.contains_key(&claim.claim_number) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(claim.claim_number.clone(), claim.clone());
        Ok(claim)
    }

    fn update(&self, claim: Claim) -> Result<(), RepositoryError> {
        let mut guard = self.claims.lock().expect("lock");
        match guard.get_mut(&claim.claim_number) {
            Some(existing) => {
                *existing = claim;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError> {
        Ok(self.claims.lock().expect("lock").get(number).cloned())
    }

    fn for_store(&self, store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError> {
        Ok(self
            .claims
            .lock()
            .expect("lock")
            .values()
            .filter(|claim| &claim.store_id == store_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ClaimRepository for UnavailableRepository {
    fn insert(&self, _claim: Claim) -> Result<Claim, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _claim: Claim) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_store(&self, _store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Inference double that answers every zero-shot call with fixed scores.
pub(super) struct ScriptedInference {
    scores: Result<Vec<LabelScore>, ServiceUnavailable>,
    pub(super) calls: Mutex<Vec<String>>,
}

impl ScriptedInference {
    pub(super) fn scoring(label: &str, score: f32) -> Self {
        let policy = TriagePolicy::default();
        let scores = policy
            .candidate_labels()
            .into_iter()
            .map(|candidate| {
                let value = if candidate == label { score } else { (1.0 - score) / 2.0 };
                LabelScore {
                    label: candidate,
                    score: value,
                }
            })
            .collect();
        Self {
            scores: Ok(scores),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn raw(scores: Vec<LabelScore>) -> Self {
        Self {
            scores: Ok(scores),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(error: ServiceUnavailable) -> Self {
        Self {
            scores: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl InferenceClient for ScriptedInference {
    async fn zero_shot(
        &self,
        text: &str,
        _labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        self.calls.lock().expect("lock").push(text.to_string());
        self.scores.clone()
    }

    async fn summarize(&self, _text: &str) -> Result<String, ServiceUnavailable> {
        Err(ServiceUnavailable::MissingCredential)
    }
}

/// Inference double that never answers.
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

pub(super) fn high_label() -> String {
    TriagePolicy::default().labels[0].label.clone()
}

pub(super) fn low_label() -> String {
    TriagePolicy::default().labels[2].label.clone()
}

pub(super) fn classifier(client: Arc<dyn InferenceClient>) -> PriorityClassifier {
    PriorityClassifier::new(client, TriagePolicy::default(), TIMEOUT)
}

pub(super) fn keyword_classifier() -> PriorityClassifier {
    classifier(Arc::new(ScriptedInference::failing(
        ServiceUnavailable::MissingCredential,
    )))
}

pub(super) fn build_service() -> (ClaimService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ClaimService::new(repository.clone(), keyword_classifier());
    (service, repository)
}

pub(super) fn claim_router_with_service(service: ClaimService<MemoryRepository>) -> axum::Router {
    claim_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
