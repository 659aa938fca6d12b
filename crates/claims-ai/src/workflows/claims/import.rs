//! Claim history import from the retailer CSV export.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::{
    Claim, ClaimCategory, ClaimNote, ClaimNumber, ClaimStatus, Priority, ProductRef, StoreId,
};
use super::triage::{keyword_classification, Classification, ClassificationSource, TriagePolicy};

#[derive(Debug)]
pub enum ClaimImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, message: String },
}

impl std::fmt::Display for ClaimImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimImportError::Io(err) => write!(f, "failed to read claim export: {}", err),
            ClaimImportError::Csv(err) => write!(f, "invalid claim CSV data: {}", err),
            ClaimImportError::InvalidRow { line, message } => {
                write!(f, "claim export row {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for ClaimImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClaimImportError::Io(err) => Some(err),
            ClaimImportError::Csv(err) => Some(err),
            ClaimImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ClaimImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ClaimImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimRow {
    #[serde(rename = "Claim Number")]
    claim_number: String,
    #[serde(rename = "Store")]
    store: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Model", default, deserialize_with = "empty_string_as_none")]
    model: Option<String>,
    #[serde(rename = "Summary", default)]
    summary: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Priority", default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Submitted At")]
    submitted_at: String,
    #[serde(rename = "Resolved At", default, deserialize_with = "empty_string_as_none")]
    resolved_at: Option<String>,
    #[serde(rename = "Notes", default)]
    notes: String,
}

/// Loads historical claims so insights can be produced outside the web app.
pub struct ClaimCsvImporter;

impl ClaimCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        policy: &TriagePolicy,
    ) -> Result<Vec<Claim>, ClaimImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, policy)
    }

    /// Rows without a priority are tiered with the keyword rules.
    pub fn from_reader<R: Read>(
        reader: R,
        policy: &TriagePolicy,
    ) -> Result<Vec<Claim>, ClaimImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut claims = Vec::new();

        for (index, record) in csv_reader.deserialize::<ClaimRow>().enumerate() {
            // header occupies line 1
            let line = index + 2;
            let row = record?;
            claims.push(row.into_claim(line, policy)?);
        }

        Ok(claims)
    }
}

impl ClaimRow {
    fn into_claim(self, line: usize, policy: &TriagePolicy) -> Result<Claim, ClaimImportError> {
        let invalid = |message: String| ClaimImportError::InvalidRow { line, message };

        if self.claim_number.is_empty() {
            return Err(invalid("missing claim number".to_string()));
        }
        if self.product.is_empty() {
            return Err(invalid("missing product".to_string()));
        }

        let status = ClaimStatus::parse(&self.status)
            .ok_or_else(|| invalid(format!("unknown status '{}'", self.status)))?;
        let submitted_at = parse_datetime(&self.submitted_at)
            .ok_or_else(|| invalid(format!("invalid submitted date '{}'", self.submitted_at)))?;
        let resolved_at = match self.resolved_at.as_deref() {
            Some(raw) => Some(
                parse_datetime(raw)
                    .ok_or_else(|| invalid(format!("invalid resolved date '{raw}'")))?,
            ),
            None => None,
        };

        let triage = match self.priority.as_deref() {
            Some(raw) => {
                let priority = Priority::parse(raw)
                    .ok_or_else(|| invalid(format!("unknown priority '{raw}'")))?;
                Classification {
                    priority,
                    reason: "Imported from claim export".to_string(),
                    source: ClassificationSource::Fallback,
                    confidence: None,
                }
            }
            None => {
                let text = format!("{} {}", self.summary, self.description);
                keyword_classification(&text, policy)
            }
        };

        let notes = self
            .notes
            .split('|')
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(|content| {
                ClaimNote::reviewer("import", content, resolved_at.unwrap_or(submitted_at))
            })
            .collect();

        Ok(Claim {
            claim_number: ClaimNumber(self.claim_number),
            store_id: StoreId(self.store),
            product: ProductRef {
                product_name: self.product,
                model: self.model,
            },
            issue_summary: self.summary,
            description: self.description,
            category: ClaimCategory::parse(&self.category),
            priority: triage.priority,
            triage,
            priority_overridden: false,
            status,
            submitted_at,
            resolved_at,
            estimated_cost: None,
            actual_cost: None,
            notes,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339 timestamps or bare `YYYY-MM-DD` dates, read as UTC midnight.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
