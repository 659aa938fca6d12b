use std::collections::BTreeMap;

use super::views::{OverallStatistics, ProductClaimEntry, SlowProcessingEntry};
use crate::workflows::claims::domain::{Claim, ClaimStatus};

/// Share of `total`, rounded to one decimal; zero when there is nothing to divide.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusCounts {
    approved: usize,
    rejected: usize,
    pending: usize,
}

impl StatusCounts {
    fn record(&mut self, status: ClaimStatus) {
        match status {
            ClaimStatus::Approved => self.approved += 1,
            ClaimStatus::Rejected => self.rejected += 1,
            ClaimStatus::InReview => self.pending += 1,
        }
    }

    fn total(&self) -> usize {
        self.approved + self.rejected + self.pending
    }
}

pub(crate) fn overall(claims: &[&Claim]) -> OverallStatistics {
    let mut counts = StatusCounts::default();
    for claim in claims {
        counts.record(claim.status);
    }
    let total = counts.total();

    OverallStatistics {
        total_claims: total,
        approved_claims: counts.approved,
        rejected_claims: counts.rejected,
        pending_claims: counts.pending,
        approval_rate: percentage(counts.approved, total),
        rejection_rate: percentage(counts.rejected, total),
    }
}

type ProductKey = (String, String);

fn product_key(claim: &Claim) -> ProductKey {
    (
        claim.product.product_name.clone(),
        claim.product.model_label().to_string(),
    )
}

/// Claim volume per product, busiest first. Ties break on product name then model.
pub(crate) fn top_products(claims: &[&Claim]) -> Vec<ProductClaimEntry> {
    let mut groups: BTreeMap<ProductKey, StatusCounts> = BTreeMap::new();
    for claim in claims {
        groups.entry(product_key(claim)).or_default().record(claim.status);
    }

    let mut entries: Vec<ProductClaimEntry> = groups
        .into_iter()
        .map(|((product_name, model), counts)| ProductClaimEntry {
            product_name,
            model,
            claim_count: counts.total(),
            approved: counts.approved,
            rejected: counts.rejected,
            pending: counts.pending,
            approval_rate: percentage(counts.approved, counts.total()),
        })
        .collect();

    // BTreeMap order is already name/model ascending, so a stable sort keeps the tie-break.
    entries.sort_by(|a, b| b.claim_count.cmp(&a.claim_count));
    entries
}

/// Average resolution time per product, slowest first.
pub(crate) fn slow_processing(claims: &[&Claim]) -> Vec<SlowProcessingEntry> {
    let mut groups: BTreeMap<ProductKey, (f64, usize)> = BTreeMap::new();
    for claim in claims {
        if let Some(days) = claim.processing_days() {
            let entry = groups.entry(product_key(claim)).or_insert((0.0, 0));
            entry.0 += days;
            entry.1 += 1;
        }
    }

    let mut entries: Vec<SlowProcessingEntry> = groups
        .into_iter()
        .map(|((product_name, model), (total_days, count))| SlowProcessingEntry {
            product_name,
            model,
            avg_processing_days: round1(total_days / count as f64),
            claim_count: count,
        })
        .collect();

    entries.sort_by(|a, b| b.avg_processing_days.total_cmp(&a.avg_processing_days));
    entries
}
