use super::config::RecommendationThresholds;
use super::views::{
    ClaimReasons, OverallStatistics, ProductClaimEntry, Recommendation, RecommendationKind,
    RecommendationPriority, RejectionReasons, SlowProcessingEntry,
};

pub(crate) struct RecommendationInputs<'a> {
    pub overall: &'a OverallStatistics,
    /// Every product group for the period, busiest first.
    pub products: &'a [ProductClaimEntry],
    /// Slowest first.
    pub slow_processing: &'a [SlowProcessingEntry],
    pub claim_reasons: &'a ClaimReasons,
    pub rejection_reasons: &'a RejectionReasons,
}

/// Each rule is evaluated on its own; any number of them may fire.
pub(crate) fn recommend(
    inputs: &RecommendationInputs<'_>,
    thresholds: &RecommendationThresholds,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let overall = inputs.overall;

    if overall.total_claims > 0 && overall.approval_rate < thresholds.minimum_approval_rate {
        recommendations.push(Recommendation {
            kind: RecommendationKind::ApprovalRate,
            priority: RecommendationPriority::High,
            title: "Review rejection criteria".to_string(),
            description: format!(
                "Only {:.1}% of {} claims were approved in this period.",
                overall.approval_rate, overall.total_claims
            ),
            action: "Audit recent rejections and clarify warranty terms at point of sale"
                .to_string(),
        });
    }

    if let Some(top) = inputs.products.first() {
        if top.claim_count > thresholds.high_volume_claims {
            recommendations.push(Recommendation {
                kind: RecommendationKind::ProductQuality,
                priority: RecommendationPriority::High,
                title: format!("High claim rate for {}", top.product_name),
                description: format!(
                    "This product has {} claims. Consider reviewing product quality or supplier.",
                    top.claim_count
                ),
                action: "Review supplier quality or consider alternative products".to_string(),
            });
        }
    }

    for product in inputs.products.iter().filter(|product| {
        product.claim_count >= thresholds.product_minimum_claims
            && product.approval_rate < thresholds.product_approval_rate
    }) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::ProductQuality,
            priority: RecommendationPriority::Medium,
            title: format!("Quality concern for {} ({})", product.product_name, product.model),
            description: format!(
                "{:.1}% of {} claims were approved; {} rejected.",
                product.approval_rate, product.claim_count, product.rejected
            ),
            action: "Inspect returned units and raise a quality report with the manufacturer"
                .to_string(),
        });
    }

    if let Some(slowest) = inputs.slow_processing.first() {
        if slowest.avg_processing_days > thresholds.slow_processing_days {
            recommendations.push(Recommendation {
                kind: RecommendationKind::ProcessingTime,
                priority: RecommendationPriority::Medium,
                title: format!("Slow processing for {}", slowest.product_name),
                description: format!(
                    "Average processing time is {:.1} days.",
                    slowest.avg_processing_days
                ),
                action: "Streamline claim processing workflow".to_string(),
            });
        }
    }

    if let Some(top_reason) = inputs.claim_reasons.categories.first() {
        if top_reason.percentage > thresholds.dominant_reason_share {
            recommendations.push(Recommendation {
                kind: RecommendationKind::ClaimPattern,
                priority: RecommendationPriority::High,
                title: format!("High incidence of {}", top_reason.category),
                description: format!(
                    "{:.1}% of claims are related to {}.",
                    top_reason.percentage, top_reason.category
                ),
                action: "Investigate root cause and implement preventive measures".to_string(),
            });
        }
    }

    if let Some(top_rejection) = inputs.rejection_reasons.rejection_reasons.first() {
        if top_rejection.percentage > thresholds.dominant_rejection_share {
            recommendations.push(Recommendation {
                kind: RecommendationKind::RejectionPattern,
                priority: RecommendationPriority::Medium,
                title: format!("Common rejection: {}", top_rejection.reason),
                description: format!("{:.1}% of rejections.", top_rejection.percentage),
                action: "Improve customer education about warranty terms".to_string(),
            });
        }
    }

    recommendations
}
