use serde::Serialize;

use super::domain::{Claim, ClaimNumber, StoreId};

/// Storage abstraction; persistence lives behind the web layer.
pub trait ClaimRepository: Send + Sync {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError>;
    fn update(&self, claim: Claim) -> Result<(), RepositoryError>;
    fn fetch(&self, number: &ClaimNumber) -> Result<Option<Claim>, RepositoryError>;
    fn for_store(&self, store_id: &StoreId) -> Result<Vec<Claim>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("claim already exists")]
    Conflict,
    #[error("claim not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact status view returned to the claim list and detail screens.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimStatusView {
    pub claim_number: ClaimNumber,
    pub store_id: StoreId,
    pub product_name: String,
    pub status: &'static str,
    pub priority: &'static str,
    pub priority_reason: String,
    pub priority_overridden: bool,
    pub note_count: usize,
}

impl Claim {
    pub fn status_view(&self) -> ClaimStatusView {
        ClaimStatusView {
            claim_number: self.claim_number.clone(),
            store_id: self.store_id.clone(),
            product_name: self.product.product_name.clone(),
            status: self.status.label(),
            priority: self.priority.label(),
            priority_reason: self.triage.reason.clone(),
            priority_overridden: self.priority_overridden,
            note_count: self.notes.len(),
        }
    }
}
