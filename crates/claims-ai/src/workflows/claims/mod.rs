//! Warranty claim intake, triage and review.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod triage;

#[cfg(test)]
mod tests;

pub use domain::{
    Claim, ClaimCategory, ClaimDecision, ClaimNote, ClaimNumber, ClaimStatus, ClaimSubmission,
    NoteKind, Priority, ProductRef, StoreId,
};
pub use import::{parse_datetime, ClaimCsvImporter, ClaimImportError};
pub use repository::{ClaimRepository, ClaimStatusView, RepositoryError};
pub use router::claim_router;
pub use service::{ClaimService, ClaimServiceError, Resolution};
pub use triage::{
    keyword_classification, Classification, ClassificationError, ClassificationSource,
    PriorityClassifier, PriorityLabel, TriagePolicy,
};
