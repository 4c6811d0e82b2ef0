//! Exposed output records

use serde::{Deserialize, Serialize};

use crate::types::{Borough, Persona, TimeDna};

/// Full per-station profile including the narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub identity: String,
    pub borough: Borough,
    pub time_dna: TimeDna,
    pub vitality_score: f64,
    pub office_score: f64,
    pub retail_gap: f64,
    pub persona: String,
    pub description: String,
    pub is_ai_generated: bool,
}

/// Metrics block of a station overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetrics {
    /// Vitality percentile as a 0..1 fraction
    pub weekend_vitality: f64,
    pub borough: Borough,
    pub office_density: f64,
    pub retail_gap: f64,
}

/// Narrative-free summary of one station, for listing every station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationOverview {
    pub station: String,
    pub cluster_id: u32,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub n_bars: Option<u32>,
    pub n_offices: Option<u32>,
    pub n_universities: Option<u32>,
    pub persona_name: String,
    pub time_dna: TimeDna,
    pub metrics: StationMetrics,
}

/// Per-cluster aggregate with archetype chart data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: u32,
    pub persona: Persona,
    pub station_count: usize,
    pub avg_bars: f64,
    pub example_station: String,
    /// First 24 archetype values
    pub chart_data: Vec<f64>,
}
