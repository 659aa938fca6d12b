use std::time::Duration;

use tracing::warn;

use super::views::{
    ClaimReasons, OverallStatistics, ProductClaimEntry, RejectionReasons, SlowProcessingEntry,
};
use crate::inference::{bounded, InferenceClient};

pub(crate) const NO_CLAIMS_SUMMARY: &str = "No claims were found for the selected period.";

pub(crate) struct SummaryInputs<'a> {
    pub overall: &'a OverallStatistics,
    pub top_products: &'a [ProductClaimEntry],
    pub slow_processing: &'a [SlowProcessingEntry],
    pub claim_reasons: &'a ClaimReasons,
    pub rejection_reasons: &'a RejectionReasons,
}

/// Plain-text digest handed to the summarization model.
pub(crate) fn summary_prompt(inputs: &SummaryInputs<'_>) -> String {
    let mut parts = vec![format!(
        "There were {} warranty claims: {} approved, {} rejected and {} still in review, an approval rate of {:.1}%",
        inputs.overall.total_claims,
        inputs.overall.approved_claims,
        inputs.overall.rejected_claims,
        inputs.overall.pending_claims,
        inputs.overall.approval_rate
    )];

    if !inputs.top_products.is_empty() {
        let products = inputs
            .top_products
            .iter()
            .take(3)
            .map(|product| format!("{} with {} claims", product.product_name, product.claim_count))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("The most claimed products are: {products}"));
    }

    if !inputs.slow_processing.is_empty() {
        let slow = inputs
            .slow_processing
            .iter()
            .take(2)
            .map(|entry| {
                format!(
                    "{} averaging {:.1} days",
                    entry.product_name, entry.avg_processing_days
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Claims taking longest to process: {slow}"));
    }

    if !inputs.claim_reasons.categories.is_empty() {
        let reasons = inputs
            .claim_reasons
            .categories
            .iter()
            .take(3)
            .map(|share| format!("{} ({:.1}%)", share.category, share.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Main claim reasons: {reasons}"));
    }

    if !inputs.rejection_reasons.rejection_reasons.is_empty() {
        let rejections = inputs
            .rejection_reasons
            .rejection_reasons
            .iter()
            .take(3)
            .map(|share| format!("{} ({:.1}%)", share.reason, share.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Top rejection reasons: {rejections}"));
    }

    format!("{}.", parts.join(". "))
}

/// Templated sentence built straight from the statistics.
pub(crate) fn fallback_summary(inputs: &SummaryInputs<'_>) -> String {
    let overall = inputs.overall;
    if overall.total_claims == 0 {
        return NO_CLAIMS_SUMMARY.to_string();
    }

    let mut summary = format!(
        "Out of {} claims, {:.1}% were approved and {:.1}% were rejected",
        overall.total_claims, overall.approval_rate, overall.rejection_rate
    );

    if let Some(top) = inputs.top_products.first() {
        summary.push_str(&format!(
            "; {} was the most claimed product with {} claim{}",
            top.product_name,
            top.claim_count,
            if top.claim_count == 1 { "" } else { "s" }
        ));
    }
    summary.push('.');

    if overall.pending_claims > 0 {
        summary.push_str(&format!(
            " {} claim{} still in review.",
            overall.pending_claims,
            if overall.pending_claims == 1 { " is" } else { "s are" }
        ));
    }

    summary
}

/// Always returns a non-empty summary.
pub(crate) async fn ai_summary(
    client: &dyn InferenceClient,
    timeout: Duration,
    inputs: &SummaryInputs<'_>,
) -> String {
    if inputs.overall.total_claims == 0 {
        return NO_CLAIMS_SUMMARY.to_string();
    }

    let prompt = summary_prompt(inputs);
    match bounded(timeout, client.summarize(&prompt)).await {
        Ok(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
        Ok(_) => {
            warn!("summarization returned empty text; using templated summary");
            fallback_summary(inputs)
        }
        Err(err) => {
            warn!(error = %err, "summarization unavailable; using templated summary");
            fallback_summary(inputs)
        }
    }
}
