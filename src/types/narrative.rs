//! Narrative types: station character, generated draft, persisted record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::NarrativeReason;

/// Primary character of a station, chosen by the rule cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    Academic,
    Nightlife,
    Corporate,
    #[serde(rename = "Mixed-Use")]
    MixedUse,
    Commuter,
    Residential,
    Standard,
}

impl Character {
    pub fn label(&self) -> &'static str {
        match self {
            Character::Academic => "Academic",
            Character::Nightlife => "Nightlife",
            Character::Corporate => "Corporate",
            Character::MixedUse => "Mixed-Use",
            Character::Commuter => "Commuter",
            Character::Residential => "Residential",
            Character::Standard => "Standard",
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Deterministic output of the rule-based generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeDraft {
    pub character: Character,
    pub persona: String,
    pub description: String,
}

/// Persisted narrative, returned verbatim on every later request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRecord {
    pub persona: String,
    pub description: String,
    #[serde(default)]
    pub vitality_score: Option<f64>,
    #[serde(default)]
    pub office_score: Option<f64>,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl NarrativeRecord {
    /// Sentinel for stations absent from the feature table. Never persisted.
    pub fn unknown_station() -> Self {
        Self {
            persona: "Unknown Station".to_string(),
            description: "Data unavailable.".to_string(),
            vitality_score: None,
            office_score: None,
            is_ai_generated: false,
            generated_at: None,
        }
    }

    /// Baseline record from a draft and its scores
    pub fn from_draft(draft: NarrativeDraft, vitality: f64, office: f64) -> Self {
        Self {
            persona: draft.persona,
            description: draft.description,
            vitality_score: Some(vitality),
            office_score: Some(office),
            is_ai_generated: false,
            generated_at: Some(Utc::now()),
        }
    }
}

/// Outcome of a narrative lookup
#[derive(Debug, Clone)]
pub struct NarrativeResult {
    pub record: NarrativeRecord,
    pub reason: NarrativeReason,
}

impl NarrativeResult {
    pub fn new(record: NarrativeRecord, reason: NarrativeReason) -> Self {
        Self { record, reason }
    }

    pub fn not_found() -> Self {
        Self::new(
            NarrativeRecord::unknown_station(),
            NarrativeReason::R104_STATION_NOT_FOUND,
        )
    }

    /// Was the record served from the persisted store?
    pub fn is_cached(&self) -> bool {
        self.reason == NarrativeReason::R101_CACHE_HIT
    }
}
