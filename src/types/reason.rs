//! Reason codes for narrative lookups

use serde::{Deserialize, Serialize};

/// Why a narrative lookup returned what it returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum NarrativeReason {
    /// Served verbatim from the persisted store
    R101_CACHE_HIT,
    /// Deterministic baseline generated and persisted
    R102_GENERATED,
    /// Baseline generated, description replaced by polish, persisted
    R103_GENERATED_POLISHED,
    /// Station absent from the feature table, sentinel returned
    R104_STATION_NOT_FOUND,
    /// Generated but the cache write failed; regenerated on next request
    R105_PERSIST_FAILED,
}

impl NarrativeReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_CACHE_HIT => "R101_CACHE_HIT",
            Self::R102_GENERATED => "R102_GENERATED",
            Self::R103_GENERATED_POLISHED => "R103_GENERATED_POLISHED",
            Self::R104_STATION_NOT_FOUND => "R104_STATION_NOT_FOUND",
            Self::R105_PERSIST_FAILED => "R105_PERSIST_FAILED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_CACHE_HIT => "Served from narrative cache",
            Self::R102_GENERATED => "Generated deterministic narrative",
            Self::R103_GENERATED_POLISHED => "Generated and polished narrative",
            Self::R104_STATION_NOT_FOUND => "Station not in feature table",
            Self::R105_PERSIST_FAILED => "Generated, cache write failed",
        }
    }
}

impl std::fmt::Display for NarrativeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
