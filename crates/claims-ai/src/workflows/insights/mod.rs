//! Retailer insight aggregation over a store's claim history.

mod config;
mod period;
mod reasons;
mod recommendations;
pub mod router;
mod statistics;
mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use config::{InsightPolicy, RecommendationThresholds};
pub use period::{PeriodParseError, ReportingPeriod};
pub use router::insight_router;
pub use views::{
    CategoryShare, ClaimReasons, InsightReport, OverallStatistics, ProductClaimEntry,
    ProductCount, Recommendation, RecommendationKind, RecommendationPriority, RejectionExample,
    RejectionReasons, RejectionShare, SlowProcessingEntry,
};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::inference::InferenceClient;
use crate::workflows::claims::domain::{Claim, StoreId};
use crate::workflows::claims::repository::{ClaimRepository, RepositoryError};
use recommendations::{recommend, RecommendationInputs};
use summary::{ai_summary, SummaryInputs};

/// Builds [`InsightReport`]s. Holds no state between requests.
pub struct InsightAggregator<R> {
    repository: Arc<R>,
    client: Arc<dyn InferenceClient>,
    policy: InsightPolicy,
    timeout: Duration,
}

impl<R> InsightAggregator<R>
where
    R: ClaimRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        client: Arc<dyn InferenceClient>,
        policy: InsightPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            client,
            policy,
            timeout,
        }
    }

    /// Load the store's claims and aggregate them for `period`.
    pub async fn build_insights(
        &self,
        store_id: &StoreId,
        period: ReportingPeriod,
        now: DateTime<Utc>,
    ) -> Result<InsightReport, InsightError> {
        let claims = self.repository.for_store(store_id)?;
        let report = self.aggregate(&claims, period, now).await;
        info!(
            store = %store_id.0,
            period = period.token(),
            total_claims = report.overall_statistics.total_claims,
            recommendations = report.recommendations.len(),
            "insight report generated"
        );
        Ok(report)
    }

    /// Aggregate an already-loaded claim set. Claims are only read.
    pub async fn aggregate(
        &self,
        claims: &[Claim],
        period: ReportingPeriod,
        now: DateTime<Utc>,
    ) -> InsightReport {
        let in_period: Vec<&Claim> = claims
            .iter()
            .filter(|claim| period.contains(claim.submitted_at, now))
            .collect();

        let overall = statistics::overall(&in_period);
        let mut products = statistics::top_products(&in_period);
        let mut slow_processing = statistics::slow_processing(&in_period);

        let client = self.client.as_ref();
        let claim_reasons =
            reasons::claim_reasons(client, self.timeout, &in_period, &self.policy).await;
        let rejection_reasons =
            reasons::rejection_reasons(client, self.timeout, &in_period, &self.policy).await;

        let recommendations = recommend(
            &RecommendationInputs {
                overall: &overall,
                products: &products,
                slow_processing: &slow_processing,
                claim_reasons: &claim_reasons,
                rejection_reasons: &rejection_reasons,
            },
            &self.policy.thresholds,
        );

        products.truncate(self.policy.top_products_limit);
        slow_processing.truncate(self.policy.slow_processing_limit);

        let ai_summary = ai_summary(
            client,
            self.timeout,
            &SummaryInputs {
                overall: &overall,
                top_products: &products,
                slow_processing: &slow_processing,
                claim_reasons: &claim_reasons,
                rejection_reasons: &rejection_reasons,
            },
        )
        .await;

        InsightReport {
            period,
            generated_at: now,
            overall_statistics: overall,
            top_claimed_products: products,
            slow_processing_claims: slow_processing,
            claim_reasons,
            rejection_reasons,
            recommendations,
            ai_summary,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
