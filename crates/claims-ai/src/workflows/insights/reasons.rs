use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};

use super::config::InsightPolicy;
use super::statistics::percentage;
use super::views::{
    CategoryShare, ClaimReasons, ProductCount, RejectionExample, RejectionReasons, RejectionShare,
};
use crate::inference::{bounded, top_label, InferenceClient, ServiceUnavailable};
use crate::workflows::claims::domain::{Claim, ClaimStatus};
use crate::workflows::text::{categorize, KeywordCategory};

/// Products listed per claim-reason bucket and examples per rejection reason.
const BUCKET_DETAIL: usize = 3;

struct Bucketing<'a> {
    labels: &'a [String],
    keywords: &'a [KeywordCategory],
    fallback: &'a str,
}

/// Assigns every text a bucket. The model is used for the whole batch or not
/// at all: the first failed call, or the batch outliving `deadline`, switches
/// every text to the keyword buckets. Texts that are `None` go straight to the
/// fallback bucket.
async fn assign_buckets(
    client: &dyn InferenceClient,
    timeout: Duration,
    deadline: Duration,
    texts: &[Option<String>],
    bucketing: &Bucketing<'_>,
) -> (bool, Vec<String>) {
    if bucketing.labels.is_empty() || texts.iter().all(Option::is_none) {
        return (false, keyword_buckets(texts, bucketing));
    }

    match bounded(deadline, model_buckets(client, timeout, texts, bucketing)).await {
        Ok(assigned) => (true, assigned),
        Err(err) => {
            warn!(error = %err, "reason model unavailable; using keyword buckets");
            (false, keyword_buckets(texts, bucketing))
        }
    }
}

async fn model_buckets(
    client: &dyn InferenceClient,
    timeout: Duration,
    texts: &[Option<String>],
    bucketing: &Bucketing<'_>,
) -> Result<Vec<String>, ServiceUnavailable> {
    let mut assigned = Vec::with_capacity(texts.len());
    for text in texts {
        let label = match text {
            Some(text) => model_bucket(client, timeout, text, bucketing.labels).await?,
            None => bucketing.fallback.to_string(),
        };
        assigned.push(label);
    }
    Ok(assigned)
}

async fn model_bucket(
    client: &dyn InferenceClient,
    timeout: Duration,
    text: &str,
    labels: &[String],
) -> Result<String, ServiceUnavailable> {
    let scores = bounded(timeout, client.zero_shot(text, labels)).await?;
    let best = top_label(&scores, labels)?;
    debug!(label = %best.label, score = best.score, "zero-shot reason");
    Ok(best.label.clone())
}

fn keyword_buckets(texts: &[Option<String>], bucketing: &Bucketing<'_>) -> Vec<String> {
    texts
        .iter()
        .map(|text| {
            text.as_deref()
                .and_then(|text| categorize(text, bucketing.keywords))
                .unwrap_or(bucketing.fallback)
                .to_string()
        })
        .collect()
}

/// Claims grouped by bucket, largest first; equal sizes order by bucket name.
/// Members keep the order they were analysed in.
fn group<'a>(claims: &[&'a Claim], assigned: Vec<String>) -> Vec<(String, Vec<&'a Claim>)> {
    let mut groups: BTreeMap<String, Vec<&'a Claim>> = BTreeMap::new();
    for (claim, bucket) in claims.iter().zip(assigned) {
        groups.entry(bucket).or_default().push(*claim);
    }

    let mut ordered: Vec<(String, Vec<&'a Claim>)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    ordered
}

fn top_products(members: &[&Claim]) -> Vec<ProductCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for claim in members {
        *counts.entry(claim.product.product_name.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<ProductCount> = counts
        .into_iter()
        .map(|(product, count)| ProductCount {
            product: product.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(BUCKET_DETAIL);
    ranked
}

fn examples(members: &[&Claim]) -> Vec<RejectionExample> {
    members
        .iter()
        .take(BUCKET_DETAIL)
        .map(|claim| RejectionExample {
            claim_number: claim.claim_number.clone(),
            product: claim.product.product_name.clone(),
        })
        .collect()
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub(crate) async fn claim_reasons(
    client: &dyn InferenceClient,
    timeout: Duration,
    claims: &[&Claim],
    policy: &InsightPolicy,
) -> ClaimReasons {
    let texts: Vec<Option<String>> = claims
        .iter()
        .map(|claim| non_empty(claim.analysis_text()))
        .collect();
    let bucketing = Bucketing {
        labels: &policy.claim_reason_labels,
        keywords: &policy.claim_reason_keywords,
        fallback: &policy.fallback_category,
    };

    let deadline = policy.reason_batch_timeout();
    let (ai_powered, assigned) =
        assign_buckets(client, timeout, deadline, &texts, &bucketing).await;
    let total = claims.len();
    let categories = group(claims, assigned)
        .into_iter()
        .map(|(category, members)| CategoryShare {
            category,
            count: members.len(),
            percentage: percentage(members.len(), total),
            top_products: top_products(&members),
        })
        .collect();

    ClaimReasons {
        ai_powered,
        total_claims_analyzed: total,
        categories,
    }
}

/// Rejection patterns from the reviewer notes left on rejected claims.
pub(crate) async fn rejection_reasons(
    client: &dyn InferenceClient,
    timeout: Duration,
    claims: &[&Claim],
    policy: &InsightPolicy,
) -> RejectionReasons {
    let rejected: Vec<&Claim> = claims
        .iter()
        .copied()
        .filter(|claim| claim.status == ClaimStatus::Rejected)
        .collect();
    let texts: Vec<Option<String>> = rejected
        .iter()
        .map(|claim| non_empty(claim.notes_text()))
        .collect();
    let bucketing = Bucketing {
        labels: &policy.rejection_reason_labels,
        keywords: &policy.rejection_reason_keywords,
        fallback: &policy.fallback_category,
    };

    let deadline = policy.reason_batch_timeout();
    let (ai_powered, assigned) =
        assign_buckets(client, timeout, deadline, &texts, &bucketing).await;
    let total = rejected.len();
    let rejection_reasons = group(&rejected, assigned)
        .into_iter()
        .map(|(reason, members)| RejectionShare {
            reason,
            count: members.len(),
            percentage: percentage(members.len(), total),
            examples: examples(&members),
        })
        .collect();

    RejectionReasons {
        ai_powered,
        total_rejections_analyzed: total,
        rejection_reasons,
    }
}
