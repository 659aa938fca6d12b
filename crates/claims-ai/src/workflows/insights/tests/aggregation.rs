use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::workflows::claims::domain::{ClaimNumber, Priority, StoreId};
use crate::workflows::insights::summary::NO_CLAIMS_SUMMARY;
use crate::workflows::insights::{
    InsightError, InsightPolicy, ProductCount, RejectionExample, ReportingPeriod,
};

fn product_count(product: &str, count: usize) -> ProductCount {
    ProductCount {
        product: product.to_string(),
        count,
    }
}

fn example(sequence: u64, product: &str) -> RejectionExample {
    RejectionExample {
        claim_number: ClaimNumber::new(2025, sequence),
        product: product.to_string(),
    }
}

#[tokio::test]
async fn overall_statistics_use_one_decimal_rates() {
    let report = offline_aggregator(Vec::new())
        .aggregate(&mixed_history(), ReportingPeriod::Last6Months, now())
        .await;

    let overall = &report.overall_statistics;
    assert_eq!(overall.total_claims, 10);
    assert_eq!(overall.approved_claims, 7);
    assert_eq!(overall.rejected_claims, 2);
    assert_eq!(overall.pending_claims, 1);
    assert_eq!(overall.approval_rate, 70.0);
    assert_eq!(overall.rejection_rate, 20.0);
}

#[tokio::test]
async fn products_and_processing_times_are_ranked() {
    let report = offline_aggregator(Vec::new())
        .aggregate(&mixed_history(), ReportingPeriod::AllTime, now())
        .await;

    let names: Vec<&str> = report
        .top_claimed_products
        .iter()
        .map(|entry| entry.product_name.as_str())
        .collect();
    assert_eq!(names, vec!["Galaxy S23", "iPad Air", "Pixel 8"]);

    let galaxy = &report.top_claimed_products[0];
    assert_eq!(galaxy.claim_count, 5);
    assert_eq!(galaxy.approved, 4);
    assert_eq!(galaxy.rejected, 1);
    assert_eq!(galaxy.approval_rate, 80.0);
    assert_eq!(galaxy.model, "N/A");

    let slow: Vec<(&str, f64)> = report
        .slow_processing_claims
        .iter()
        .map(|entry| (entry.product_name.as_str(), entry.avg_processing_days))
        .collect();
    assert_eq!(
        slow,
        vec![("iPad Air", 4.0), ("Galaxy S23", 1.8), ("Pixel 8", 1.0)]
    );
}

#[tokio::test]
async fn thirty_day_period_excludes_older_claims() {
    let mut claims = mixed_history();
    claims.push(
        ClaimFixture::new(11, "Galaxy S23", "Battery swelling")
            .submitted_days_ago(45)
            .approved_after(3)
            .build(),
    );
    let aggregator = offline_aggregator(Vec::new());

    let recent = aggregator
        .aggregate(&claims, ReportingPeriod::Last30Days, now())
        .await;
    assert_eq!(recent.overall_statistics.total_claims, 10);
    assert_eq!(recent.period, ReportingPeriod::Last30Days);

    let quarter = aggregator
        .aggregate(&claims, ReportingPeriod::Last90Days, now())
        .await;
    assert_eq!(quarter.overall_statistics.total_claims, 11);
}

#[tokio::test]
async fn empty_period_yields_zeroed_report_without_calls() {
    let client = Arc::new(FailingInference::default());
    let aggregator = aggregator(StaticRepository::new(Vec::new()), client.clone());

    let report = aggregator
        .aggregate(&[], ReportingPeriod::Last6Months, now())
        .await;

    assert_eq!(report.overall_statistics.total_claims, 0);
    assert_eq!(report.overall_statistics.approval_rate, 0.0);
    assert_eq!(report.overall_statistics.rejection_rate, 0.0);
    assert!(report.top_claimed_products.is_empty());
    assert!(report.slow_processing_claims.is_empty());
    assert!(report.claim_reasons.categories.is_empty());
    assert!(!report.claim_reasons.ai_powered);
    assert_eq!(report.rejection_reasons.total_rejections_analyzed, 0);
    assert!(report.recommendations.is_empty());
    assert_eq!(report.ai_summary, NO_CLAIMS_SUMMARY);
    assert_eq!(*client.calls.lock().expect("lock"), 0);
}

#[tokio::test]
async fn failing_service_degrades_to_keyword_reasons_and_templated_summary() {
    let client = Arc::new(FailingInference::default());
    let aggregator = aggregator(StaticRepository::new(Vec::new()), client.clone());

    let report = aggregator
        .aggregate(&mixed_history(), ReportingPeriod::Last6Months, now())
        .await;

    assert!(!report.claim_reasons.ai_powered);
    let reasons: Vec<(&str, usize, f64)> = report
        .claim_reasons
        .categories
        .iter()
        .map(|share| (share.category.as_str(), share.count, share.percentage))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("Battery issue", 4, 40.0),
            ("Screen damage", 3, 30.0),
            ("Hardware malfunction", 1, 10.0),
            ("Physical damage", 1, 10.0),
            ("Water damage", 1, 10.0),
        ]
    );

    assert!(!report.rejection_reasons.ai_powered);
    assert_eq!(report.rejection_reasons.total_rejections_analyzed, 2);
    let rejection = &report.rejection_reasons.rejection_reasons[0];
    assert_eq!(rejection.reason, "Physical damage not covered");
    assert_eq!(rejection.count, 2);
    assert_eq!(rejection.percentage, 100.0);
    assert_eq!(
        rejection.examples,
        vec![example(8, "Galaxy S23"), example(9, "Pixel 8")]
    );

    let battery = &report.claim_reasons.categories[0];
    assert_eq!(battery.top_products, vec![product_count("Galaxy S23", 4)]);
    let screen = &report.claim_reasons.categories[1];
    assert_eq!(screen.top_products, vec![product_count("iPad Air", 3)]);

    assert_eq!(
        report.ai_summary,
        "Out of 10 claims, 70.0% were approved and 20.0% were rejected; \
         Galaxy S23 was the most claimed product with 5 claims. 1 claim is still in review."
    );

    // One failed call per reason batch plus the summary attempt.
    assert_eq!(*client.calls.lock().expect("lock"), 3);
}

#[tokio::test]
async fn available_service_labels_reasons_and_writes_summary() {
    let client = Arc::new(FirstLabelInference::default());
    let aggregator = aggregator(StaticRepository::new(Vec::new()), client.clone());

    let report = aggregator
        .aggregate(&mixed_history(), ReportingPeriod::Last6Months, now())
        .await;

    assert!(report.claim_reasons.ai_powered);
    assert_eq!(report.claim_reasons.total_claims_analyzed, 10);
    assert_eq!(report.claim_reasons.categories.len(), 1);
    assert_eq!(report.claim_reasons.categories[0].category, "Battery issue");
    assert_eq!(report.claim_reasons.categories[0].percentage, 100.0);

    assert!(report.rejection_reasons.ai_powered);
    assert_eq!(
        report.rejection_reasons.rejection_reasons[0].reason,
        "Physical damage not covered"
    );

    assert_eq!(report.ai_summary, "Claims were mostly approved this period.");
    assert_eq!(*client.zero_shot_calls.lock().expect("lock"), 12);
    let prompts = client.prompts.lock().expect("lock");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("There were 10 warranty claims"));
    assert!(prompts[0].contains("Galaxy S23 with 5 claims"));
}

#[tokio::test]
async fn hanging_service_is_bounded_by_timeout() {
    let aggregator = aggregator(StaticRepository::new(Vec::new()), Arc::new(HangingInference));

    let report = tokio::time::timeout(
        TIMEOUT * 20,
        aggregator.aggregate(&mixed_history(), ReportingPeriod::Last6Months, now()),
    )
    .await
    .expect("aggregation finishes despite a hanging service");

    assert!(!report.claim_reasons.ai_powered);
    assert!(!report.rejection_reasons.ai_powered);
    assert!(report.ai_summary.starts_with("Out of 10 claims"));
}

#[tokio::test]
async fn repeated_aggregation_is_identical() {
    let aggregator = offline_aggregator(Vec::new());
    let claims = mixed_history();

    let first = aggregator
        .aggregate(&claims, ReportingPeriod::Last12Months, now())
        .await;
    let second = aggregator
        .aggregate(&claims, ReportingPeriod::Last12Months, now())
        .await;

    assert_eq!(first, second);
    assert_eq!(first.generated_at, now());
}

#[tokio::test]
async fn top_products_are_limited() {
    let claims: Vec<_> = (1..=7)
        .map(|sequence| {
            ClaimFixture::new(sequence, &format!("Product {sequence}"), "Stopped charging")
                .approved_after(1)
                .build()
        })
        .collect();

    let report = offline_aggregator(Vec::new())
        .aggregate(&claims, ReportingPeriod::AllTime, now())
        .await;

    assert_eq!(report.overall_statistics.total_claims, 7);
    assert_eq!(report.top_claimed_products.len(), 5);
    assert_eq!(report.slow_processing_claims.len(), 5);
    assert_eq!(report.top_claimed_products[0].product_name, "Product 1");
}

#[tokio::test]
async fn build_insights_reads_store_history() {
    let aggregator = offline_aggregator(mixed_history());

    let report = aggregator
        .build_insights(&StoreId(STORE.to_string()), ReportingPeriod::Last6Months, now())
        .await
        .expect("report builds");
    assert_eq!(report.overall_statistics.total_claims, 10);

    let other = aggregator
        .build_insights(&StoreId("store-99".to_string()), ReportingPeriod::Last6Months, now())
        .await
        .expect("report builds");
    assert_eq!(other.overall_statistics.total_claims, 0);
}

#[tokio::test]
async fn build_insights_surfaces_repository_failure() {
    let aggregator = aggregator(UnavailableRepository, Arc::new(FailingInference::default()));

    let err = aggregator
        .build_insights(&StoreId(STORE.to_string()), ReportingPeriod::AllTime, now())
        .await
        .expect_err("repository offline");
    assert!(matches!(err, InsightError::Repository(_)));
}

#[tokio::test]
async fn status_shares_account_for_every_claim() {
    let report = offline_aggregator(Vec::new())
        .aggregate(&mixed_history(), ReportingPeriod::AllTime, now())
        .await;

    let overall = &report.overall_statistics;
    let pending_share = overall.pending_claims as f64 / overall.total_claims as f64 * 100.0;
    let total = overall.approval_rate + overall.rejection_rate + pending_share;
    assert!((total - 100.0).abs() < 0.2, "shares sum to {total}");
}

#[tokio::test]
async fn reason_buckets_list_top_products_and_capped_examples() {
    let products = ["Kobo", "Kindle", "Kindle", "Nook", "Kobo", "Kindle"];
    let claims: Vec<_> = products
        .iter()
        .zip(1..)
        .map(|(product, sequence)| {
            ClaimFixture::new(sequence, product, "Battery will not hold a charge")
                .rejected_after(2, "Warranty expired before purchase was registered")
                .build()
        })
        .collect();

    let report = offline_aggregator(Vec::new())
        .aggregate(&claims, ReportingPeriod::AllTime, now())
        .await;

    let battery = &report.claim_reasons.categories[0];
    assert_eq!(battery.category, "Battery issue");
    assert_eq!(
        battery.top_products,
        vec![
            product_count("Kindle", 3),
            product_count("Kobo", 2),
            product_count("Nook", 1),
        ]
    );

    let expired = &report.rejection_reasons.rejection_reasons[0];
    assert_eq!(expired.reason, "Warranty expired");
    assert_eq!(expired.count, 6);
    assert_eq!(
        expired.examples,
        vec![example(1, "Kobo"), example(2, "Kindle"), example(3, "Kindle")]
    );
}

#[tokio::test]
async fn priority_override_notes_are_not_rejection_reasons() {
    let client = Arc::new(FirstLabelInference::default());
    let claims = vec![ClaimFixture::new(1, "Pixel 8", "Screen flicker")
        .overridden_to(Priority::High)
        .rejected_after(1, "")
        .build()];

    let report = aggregator(StaticRepository::new(Vec::new()), client.clone())
        .aggregate(&claims, ReportingPeriod::AllTime, now())
        .await;

    let texts = client.texts.lock().expect("lock");
    assert_eq!(*texts, vec!["Screen flicker".to_string()]);

    let rejections = &report.rejection_reasons;
    assert_eq!(rejections.total_rejections_analyzed, 1);
    assert_eq!(rejections.rejection_reasons[0].reason, "Other");
    assert_eq!(rejections.rejection_reasons[0].count, 1);
}

#[tokio::test]
async fn slow_reason_batch_falls_back_after_overall_deadline() {
    let client = Arc::new(SlowInference::new(Duration::from_millis(40)));
    let policy = InsightPolicy {
        reason_batch_timeout_ms: 150,
        ..InsightPolicy::default()
    };
    let aggregator = aggregator_with_policy(StaticRepository::new(Vec::new()), client, policy);

    let report = aggregator
        .aggregate(&mixed_history(), ReportingPeriod::AllTime, now())
        .await;

    // Ten claims at 40ms each outlive the deadline; two rejections do not.
    assert!(!report.claim_reasons.ai_powered);
    assert_eq!(report.claim_reasons.categories[0].category, "Battery issue");
    assert_eq!(report.claim_reasons.categories[0].count, 4);
    assert!(report.rejection_reasons.ai_powered);
    assert_eq!(report.rejection_reasons.total_rejections_analyzed, 2);
}
