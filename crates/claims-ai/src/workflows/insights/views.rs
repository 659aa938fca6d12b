use chrono::{DateTime, Utc};
use serde::Serialize;

use super::period::ReportingPeriod;
use crate::workflows::claims::domain::ClaimNumber;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub total_claims: usize,
    pub approved_claims: usize,
    pub rejected_claims: usize,
    pub pending_claims: usize,
    pub approval_rate: f64,
    pub rejection_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductClaimEntry {
    pub product_name: String,
    pub model: String,
    pub claim_count: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowProcessingEntry {
    pub product_name: String,
    pub model: String,
    pub avg_processing_days: f64,
    pub claim_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    pub product: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
    /// Most claimed products within this category.
    pub top_products: Vec<ProductCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimReasons {
    pub ai_powered: bool,
    pub total_claims_analyzed: usize,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionExample {
    pub claim_number: ClaimNumber,
    pub product: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionShare {
    pub reason: String,
    pub count: usize,
    pub percentage: f64,
    pub examples: Vec<RejectionExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionReasons {
    pub ai_powered: bool,
    pub total_rejections_analyzed: usize,
    pub rejection_reasons: Vec<RejectionShare>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ApprovalRate,
    ProductQuality,
    ProcessingTime,
    ClaimPattern,
    RejectionPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: RecommendationPriority,
    pub title: String,
    pub description: String,
    pub action: String,
}

/// Retailer insight report. Recomputed on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub period: ReportingPeriod,
    pub generated_at: DateTime<Utc>,
    pub overall_statistics: OverallStatistics,
    pub top_claimed_products: Vec<ProductClaimEntry>,
    pub slow_processing_claims: Vec<SlowProcessingEntry>,
    pub claim_reasons: ClaimReasons,
    pub rejection_reasons: RejectionReasons,
    pub recommendations: Vec<Recommendation>,
    pub ai_summary: String,
}
