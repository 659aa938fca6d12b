use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workflows::text::{owned, KeywordCategory};

/// Thresholds that decide which recommendations fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Overall approval rate (percent) below which rejection criteria get reviewed.
    pub minimum_approval_rate: f64,
    /// Product approval rate (percent) below which a product is a quality concern.
    pub product_approval_rate: f64,
    pub product_minimum_claims: usize,
    /// Claim count above which the busiest product is flagged.
    pub high_volume_claims: usize,
    pub slow_processing_days: f64,
    pub dominant_reason_share: f64,
    pub dominant_rejection_share: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            minimum_approval_rate: 50.0,
            product_approval_rate: 70.0,
            product_minimum_claims: 3,
            high_volume_claims: 5,
            slow_processing_days: 7.0,
            dominant_reason_share: 30.0,
            dominant_rejection_share: 25.0,
        }
    }
}

/// Label sets, keyword buckets and list sizes for the insight report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightPolicy {
    pub top_products_limit: usize,
    pub slow_processing_limit: usize,
    pub claim_reason_labels: Vec<String>,
    pub claim_reason_keywords: Vec<KeywordCategory>,
    pub rejection_reason_labels: Vec<String>,
    pub rejection_reason_keywords: Vec<KeywordCategory>,
    pub fallback_category: String,
    /// Overall deadline for one batch of zero-shot reason calls.
    pub reason_batch_timeout_ms: u64,
    pub thresholds: RecommendationThresholds,
}

impl InsightPolicy {
    pub fn reason_batch_timeout(&self) -> Duration {
        Duration::from_millis(self.reason_batch_timeout_ms)
    }
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            top_products_limit: 5,
            slow_processing_limit: 5,
            claim_reason_labels: owned(&[
                "Battery issue",
                "Screen damage",
                "Hardware malfunction",
                "Software problem",
                "Water damage",
                "Charging issue",
                "Audio problem",
                "Performance issue",
                "Overheating",
                "Physical damage",
                "Other",
            ]),
            claim_reason_keywords: vec![
                KeywordCategory::new("Battery issue", &["battery", "charging", "power", "drain"]),
                KeywordCategory::new(
                    "Screen damage",
                    &["screen", "display", "crack", "broken", "shatter"],
                ),
                KeywordCategory::new(
                    "Hardware malfunction",
                    &["hardware", "button", "port", "camera", "speaker"],
                ),
                KeywordCategory::new(
                    "Software problem",
                    &["software", "freeze", "crash", "app", "update", "bug"],
                ),
                KeywordCategory::new("Water damage", &["water", "liquid", "wet", "moisture"]),
                KeywordCategory::new("Overheating", &["heat", "hot", "overheat", "temperature"]),
                KeywordCategory::new(
                    "Physical damage",
                    &["drop", "damage", "dent", "scratch", "physical"],
                ),
            ],
            rejection_reason_labels: owned(&[
                "Physical damage not covered",
                "Warranty expired",
                "Misuse or abuse",
                "Missing documentation",
                "Normal wear and tear",
                "Unauthorized repairs",
                "Liquid damage",
                "User error",
                "Cosmetic damage",
                "Insufficient evidence",
                "Other",
            ]),
            rejection_reason_keywords: vec![
                KeywordCategory::new(
                    "Physical damage not covered",
                    &["physical damage", "not covered", "accidental"],
                ),
                KeywordCategory::new("Warranty expired", &["expired", "expiry", "warranty period"]),
                KeywordCategory::new("Misuse or abuse", &["misuse", "abuse", "improper"]),
                KeywordCategory::new(
                    "Missing documentation",
                    &["documentation", "proof", "missing", "evidence"],
                ),
                KeywordCategory::new(
                    "Unauthorized repairs",
                    &["unauthorized", "third party", "repair"],
                ),
            ],
            fallback_category: "Other".to_string(),
            reason_batch_timeout_ms: 30_000,
            thresholds: RecommendationThresholds::default(),
        }
    }
}
