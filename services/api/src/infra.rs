use chrono::{DateTime, Utc};
use claims_ai::config::AppConfig;
use claims_ai::inference::client_from_config;
use claims_ai::workflows::claims::{
    parse_datetime, Claim, ClaimNumber, ClaimRepository, ClaimService, PriorityClassifier,
    RepositoryError, StoreId,
};
use claims_ai::workflows::insights::InsightAggregator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryClaimRepository {
    claims: Arc<Mutex<HashMap<ClaimNumber, Claim>>>,
}

impl InMemoryClaimRepository {
    /// Repository preloaded with imported history; later rows win on duplicate numbers.
    pub(crate) fn with_claims(claims: Vec<Claim>) -> Self {
        let map = claims
            .into_iter()
            .map(|claim| (claim.claim_number.clone(), claim))
            .collect();
        Self {
            claims: Arc::new(Mutex::new(map)),
        }
    }
}

impl ClaimRepository for InMemoryClaimRepository {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError> {
        let mut guard = self
            .claims
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&claim.claim_number) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(claim.claim_number.clone(), claim.clone());
        Ok(claim)
    }

    fn update(&self, claim: Claim) -> Result<(), RepositoryError> {
        let mut guard = self
            .claims
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&claim.claim_number) {
            guard.insert(claim.claim_number.clone(), claim);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError> {
        let guard = self
            .claims
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(number).cloned())
    }

    fn for_store(&self, store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError> {
        let guard = self
            .claims
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut claims: Vec<Claim> = guard
            .values()
            .filter(|claim| &claim.store_id == store_id)
            .cloned()
            .collect();
        claims.sort_by(|a, b| a.claim_number.cmp(&b.claim_number));
        Ok(claims)
    }
}

/// Wires one inference client into both the claim service and the aggregator.
pub(crate) fn build_workflows(
    config: &AppConfig,
    repository: Arc<InMemoryClaimRepository>,
) -> (
    Arc<ClaimService<InMemoryClaimRepository>>,
    Arc<InsightAggregator<InMemoryClaimRepository>>,
) {
    let client = client_from_config(&config.inference);
    let timeout = config.inference.timeout;

    let classifier =
        PriorityClassifier::new(client.clone(), config.policy.triage.clone(), timeout);
    let claims = Arc::new(ClaimService::new(repository.clone(), classifier));
    let insights = Arc::new(InsightAggregator::new(
        repository,
        client,
        config.policy.insights.clone(),
        timeout,
    ));
    (claims, insights)
}

/// Clap value parser over the importer's timestamp rules.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(raw).ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
