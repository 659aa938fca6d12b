use crate::infra::{build_workflows, InMemoryClaimRepository};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use claims_ai::config::AppConfig;
use claims_ai::error::AppError;
use claims_ai::telemetry::{self, LogTarget};
use claims_ai::workflows::claims::{
    ClaimCategory, ClaimCsvImporter, ClaimDecision, ClaimRepository, ClaimService,
    ClaimServiceError, ClaimSubmission, ClassificationSource, Priority, ProductRef, Resolution,
    StoreId,
};
use claims_ai::workflows::insights::{InsightReport, ReportingPeriod};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Free-text claim description
    pub(crate) description: String,
}

#[derive(Args, Debug)]
pub(crate) struct InsightsArgs {
    /// Store whose claims are aggregated
    #[arg(long)]
    pub(crate) store: String,
    /// Reporting window: 30days, 90days, 6months, 12months or all
    #[arg(long, default_value = "6months")]
    pub(crate) period: ReportingPeriod,
    /// Claim history export to aggregate
    #[arg(long)]
    pub(crate) claims_csv: Option<PathBuf>,
    /// Reference time for the period window (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Store identifier used for the seeded claims
    #[arg(long, default_value = "demo-store")]
    pub(crate) store: String,
    /// Optional claim export to load in place of the built-in sample
    #[arg(long)]
    pub(crate) claims_csv: Option<PathBuf>,
    /// Reference time for the demo (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

fn load_cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_target(&config.telemetry, LogTarget::Stderr)?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = load_cli_config()?;
    let repository = Arc::new(InMemoryClaimRepository::default());
    let (claims, _) = build_workflows(&config, repository);

    let classification = claims.classify(&args.description).await?;
    print_json(&classification)
}

pub(crate) async fn run_insights(args: InsightsArgs) -> Result<(), AppError> {
    let config = load_cli_config()?;
    let history = match &args.claims_csv {
        Some(path) => ClaimCsvImporter::from_path(path, &config.policy.triage)?,
        None => Vec::new(),
    };
    let repository = Arc::new(InMemoryClaimRepository::with_claims(history));
    let (_, insights) = build_workflows(&config, repository);

    let now = args.now.unwrap_or_else(Utc::now);
    let report = insights
        .build_insights(&StoreId(args.store), args.period, now)
        .await?;
    print_json(&report)
}

struct SampleClaim {
    product: &'static str,
    model: &'static str,
    description: &'static str,
    category: ClaimCategory,
    age_days: i64,
    outcome: Option<(ClaimDecision, i64, &'static str)>,
}

fn sample_claims() -> Vec<SampleClaim> {
    vec![
        SampleClaim {
            product: "Galaxy S23",
            model: "SM-S911",
            description: "Battery drains from full to empty in three hours",
            category: ClaimCategory::ManufacturingDefect,
            age_days: 40,
            outcome: Some((ClaimDecision::Approved, 3, "Battery replaced under warranty")),
        },
        SampleClaim {
            product: "Galaxy S23",
            model: "SM-S911",
            description: "Phone gets hot and the battery is swelling",
            category: ClaimCategory::Malfunction,
            age_days: 32,
            outcome: Some((ClaimDecision::Approved, 2, "Unit swapped")),
        },
        SampleClaim {
            product: "Galaxy S23",
            model: "SM-S911",
            description: "Screen cracked after a drop onto tile",
            category: ClaimCategory::AccidentalDamage,
            age_days: 25,
            outcome: Some((
                ClaimDecision::Rejected,
                9,
                "Accidental physical damage is not covered",
            )),
        },
        SampleClaim {
            product: "iPad Air",
            model: "A2588",
            description: "Charging port stopped working",
            category: ClaimCategory::Malfunction,
            age_days: 20,
            outcome: Some((ClaimDecision::Approved, 12, "Logic board repaired")),
        },
        SampleClaim {
            product: "iPad Air",
            model: "A2588",
            description: "Device was left in the rain and will not power on",
            category: ClaimCategory::Other,
            age_days: 14,
            outcome: Some((
                ClaimDecision::Rejected,
                4,
                "Liquid damage indicator triggered; misuse",
            )),
        },
        SampleClaim {
            product: "Pixel 8",
            model: "GKWS6",
            description: "Charger sparked and there was smoke coming from the port",
            category: ClaimCategory::ManufacturingDefect,
            age_days: 3,
            outcome: None,
        },
        SampleClaim {
            product: "Pixel 8",
            model: "GKWS6",
            description: "Minor scratch on the camera bar",
            category: ClaimCategory::NormalWear,
            age_days: 1,
            outcome: None,
        },
    ]
}

async fn seed_sample_store(
    service: &ClaimService<InMemoryClaimRepository>,
    store: &StoreId,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    for sample in sample_claims() {
        let submitted = now - Duration::days(sample.age_days);
        let claim = service
            .create(
                ClaimSubmission {
                    store_id: store.clone(),
                    product: ProductRef {
                        product_name: sample.product.to_string(),
                        model: Some(sample.model.to_string()),
                    },
                    issue_summary: String::new(),
                    description: sample.description.to_string(),
                    category: sample.category,
                    estimated_cost: None,
                },
                submitted,
            )
            .await?;
        println!(
            "- {} {} ({}) -> {} priority [{}]: {}",
            claim.claim_number.0,
            claim.product.product_name,
            claim.category.label(),
            claim.priority.label(),
            match claim.triage.source {
                ClassificationSource::Ai => "ai",
                ClassificationSource::Fallback => "fallback",
            },
            claim.triage.reason
        );

        if let Some((decision, after_days, note)) = sample.outcome {
            let resolved = service.resolve(
                &claim.claim_number,
                Resolution {
                    decision,
                    actor: "demo-reviewer".to_string(),
                    actual_cost: None,
                    note: Some(note.to_string()),
                },
                submitted + Duration::days(after_days),
            )?;
            println!(
                "    resolved {} after {} days",
                resolved.status.label(),
                after_days
            );
        } else if claim.priority == Priority::Low {
            let bumped =
                service.override_priority(&claim.claim_number, Priority::Medium, "demo-lead", now)?;
            println!(
                "    priority overridden to {} by demo-lead",
                bumped.priority.label()
            );
        }
    }
    Ok(())
}

fn render_report(report: &InsightReport) {
    let overall = &report.overall_statistics;
    println!(
        "\nInsight report ({} as of {})",
        report.period,
        report.generated_at.format("%Y-%m-%d")
    );
    println!(
        "- {} claims | {:.1}% approved | {:.1}% rejected | {} in review",
        overall.total_claims, overall.approval_rate, overall.rejection_rate, overall.pending_claims
    );

    println!("Top claimed products:");
    for product in &report.top_claimed_products {
        println!(
            "  - {} ({}): {} claims, {:.1}% approved",
            product.product_name, product.model, product.claim_count, product.approval_rate
        );
    }

    println!("Slowest processing:");
    for entry in &report.slow_processing_claims {
        println!(
            "  - {} ({}): {:.1} days over {} claims",
            entry.product_name, entry.model, entry.avg_processing_days, entry.claim_count
        );
    }

    println!(
        "Claim reasons ({}):",
        if report.claim_reasons.ai_powered { "ai" } else { "keyword" }
    );
    for share in &report.claim_reasons.categories {
        println!("  - {}: {} ({:.1}%)", share.category, share.count, share.percentage);
    }

    println!(
        "Rejection reasons ({}):",
        if report.rejection_reasons.ai_powered { "ai" } else { "keyword" }
    );
    for share in &report.rejection_reasons.rejection_reasons {
        println!("  - {}: {} ({:.1}%)", share.reason, share.count, share.percentage);
    }

    if report.recommendations.is_empty() {
        println!("Recommendations: none");
    } else {
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!(
                "  - [{:?}] {}: {}",
                recommendation.priority, recommendation.title, recommendation.action
            );
        }
    }

    println!("\nSummary: {}", report.ai_summary);
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        store,
        claims_csv,
        now,
    } = args;

    let config = load_cli_config()?;
    let now = now.unwrap_or_else(Utc::now);
    let store = StoreId(store);

    println!("Warranty claims demo for {}", store.0);
    let repository = match claims_csv {
        Some(path) => {
            let history = ClaimCsvImporter::from_path(&path, &config.policy.triage)?;
            println!("Loaded {} claims from {}", history.len(), path.display());
            Arc::new(InMemoryClaimRepository::with_claims(history))
        }
        None => Arc::new(InMemoryClaimRepository::default()),
    };
    let (claims, insights) = build_workflows(&config, repository);

    let existing = claims
        .repository()
        .for_store(&store)
        .map_err(ClaimServiceError::from)?;
    if existing.is_empty() {
        println!("\nSubmitting sample claims");
        seed_sample_store(&claims, &store, now).await?;
    }

    let report = insights
        .build_insights(&store, ReportingPeriod::Last6Months, now)
        .await?;
    render_report(&report);
    Ok(())
}
