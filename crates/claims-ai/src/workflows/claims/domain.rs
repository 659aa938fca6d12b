use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::triage::Classification;

/// Human-facing claim identifier in the `CLM-{year}-{sequence}` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimNumber(pub String);

impl ClaimNumber {
    pub fn new(year: i32, sequence: u64) -> Self {
        Self(format!("CLM-{year}-{sequence:03}"))
    }
}

/// Retail store that sold the product and handles the claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub String);

/// Urgency tier assigned at intake and optionally overridden by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Review state. `InReview` moves once to a terminal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InReview => "In Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InReview)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value
            .trim()
            .to_ascii_lowercase()
            .replace(['_', '-'], " ")
            .as_str()
        {
            "in review" | "inreview" | "pending" => Some(Self::InReview),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Terminal decision a reviewer can record against an open claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimDecision {
    Approved,
    Rejected,
}

impl From<ClaimDecision> for ClaimStatus {
    fn from(value: ClaimDecision) -> Self {
        match value {
            ClaimDecision::Approved => ClaimStatus::Approved,
            ClaimDecision::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Customer-selected category recorded on the claim form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClaimCategory {
    #[serde(rename = "Accidental Damage")]
    AccidentalDamage,
    #[serde(rename = "Manufacturing Defect")]
    ManufacturingDefect,
    #[serde(rename = "Normal Wear")]
    NormalWear,
    Malfunction,
    #[default]
    Other,
}

impl ClaimCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccidentalDamage => "Accidental Damage",
            Self::ManufacturingDefect => "Manufacturing Defect",
            Self::NormalWear => "Normal Wear",
            Self::Malfunction => "Malfunction",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "accidental damage" => Self::AccidentalDamage,
            "manufacturing defect" => Self::ManufacturingDefect,
            "normal wear" => Self::NormalWear,
            "malfunction" => Self::Malfunction,
            _ => Self::Other,
        }
    }
}

/// The purchased item a claim is raised against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_name: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl ProductRef {
    pub fn model_label(&self) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or("N/A")
    }
}

/// Who wrote a note. System notes record workflow events such as priority
/// overrides and are never read as reviewer reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    #[default]
    Reviewer,
    System,
}

/// Internal note left on a claim while it is reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimNote {
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: NoteKind,
}

impl ClaimNote {
    pub fn reviewer(author: &str, content: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            author: author.to_string(),
            content: content.to_string(),
            created_at,
            kind: NoteKind::Reviewer,
        }
    }

    pub fn system(author: &str, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            author: author.to_string(),
            content,
            created_at,
            kind: NoteKind::System,
        }
    }
}

/// Intake payload captured from the customer claim form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub store_id: StoreId,
    pub product: ProductRef,
    #[serde(default)]
    pub issue_summary: String,
    pub description: String,
    #[serde(default)]
    pub category: ClaimCategory,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

/// Persisted warranty claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_number: ClaimNumber,
    pub store_id: StoreId,
    pub product: ProductRef,
    pub issue_summary: String,
    pub description: String,
    pub category: ClaimCategory,
    pub priority: Priority,
    pub triage: Classification,
    #[serde(default)]
    pub priority_overridden: bool,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub notes: Vec<ClaimNote>,
}

impl Claim {
    /// Summary and description joined, which is what reason analysis looks at.
    pub fn analysis_text(&self) -> String {
        let summary = self.issue_summary.trim();
        let description = self.description.trim();
        match (summary.is_empty(), description.is_empty()) {
            (true, _) => description.to_string(),
            (false, true) => summary.to_string(),
            (false, false) => format!("{summary} {description}"),
        }
    }

    /// Reviewer notes joined; system notes are skipped.
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .filter(|note| note.kind == NoteKind::Reviewer)
            .map(|note| note.content.trim())
            .filter(|content| !content.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fractional days between submission and resolution, if resolved.
    pub fn processing_days(&self) -> Option<f64> {
        let resolved_at = self.resolved_at?;
        let seconds = (resolved_at - self.submitted_at).num_seconds().max(0);
        Some(seconds as f64 / 86_400.0)
    }
}
