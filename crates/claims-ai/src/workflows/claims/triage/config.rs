use serde::{Deserialize, Serialize};

use crate::workflows::claims::domain::Priority;
use crate::workflows::text::owned;

/// Candidate label offered to the zero-shot model and the tier it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLabel {
    pub priority: Priority,
    pub label: String,
}

/// Label set and keyword tiers used to triage claim descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriagePolicy {
    pub labels: Vec<PriorityLabel>,
    pub high_keywords: Vec<String>,
    pub medium_keywords: Vec<String>,
    pub low_keywords: Vec<String>,
}

impl TriagePolicy {
    pub fn candidate_labels(&self) -> Vec<String> {
        self.labels.iter().map(|entry| entry.label.clone()).collect()
    }

    pub fn priority_for_label(&self, label: &str) -> Option<Priority> {
        self.labels
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.priority)
    }
}

impl Default for TriagePolicy {
    fn default() -> Self {
        Self {
            labels: vec![
                PriorityLabel {
                    priority: Priority::High,
                    label: "High priority - severe issue, complete failure, urgent, dangerous, safety concern".to_string(),
                },
                PriorityLabel {
                    priority: Priority::Medium,
                    label: "Medium priority - moderate issue, affects functionality but not critical".to_string(),
                },
                PriorityLabel {
                    priority: Priority::Low,
                    label: "Low priority - minor issue, cosmetic damage, can wait".to_string(),
                },
            ],
            high_keywords: owned(&[
                "urgent",
                "emergency",
                "immediately",
                "asap",
                "critical",
                "severe",
                "dangerous",
                "unsafe",
                "hazard",
                "fire",
                "smoke",
                "burning",
                "explosion",
                "explode",
                "spark",
                "electric shock",
                "injury",
                "injured",
                "hurt",
                "safety",
                "completely broken",
                "not working at all",
                "won't turn on",
                "completely failed",
                "unusable",
                "can't use",
            ]),
            medium_keywords: owned(&[
                "malfunction",
                "defect",
                "stopped working",
                "not working",
                "broken",
                "damaged",
                "battery",
                "charging",
                "overheating",
                "cracked",
                "display",
                "camera",
                "audio",
                "connectivity",
                "performance",
                "slow",
                "freezing",
                "crashing",
                "error",
                "problem",
                "issue",
            ]),
            low_keywords: owned(&[
                "cosmetic",
                "scratch",
                "scuff",
                "minor",
                "small",
                "slight",
                "tiny",
                "discoloration",
                "aesthetic",
                "appearance",
            ]),
        }
    }
}
