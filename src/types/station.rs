//! Startup inputs produced by the offline pipeline
//!
//! Field aliases accept the upstream column names so exported tables load as-is.

use serde::{Deserialize, Serialize};

/// One row of the station feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Display name, the exact identity used by narrative lookups
    #[serde(alias = "STATION")]
    pub name: String,
    pub cluster_id: u32,
    #[serde(default, alias = "GTFS Latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "GTFS Longitude")]
    pub lon: Option<f64>,
    #[serde(default, alias = "n_bars")]
    pub bars: Option<u32>,
    #[serde(default, alias = "n_offices")]
    pub offices: Option<u32>,
    #[serde(default, alias = "n_universities")]
    pub universities: Option<u32>,
}

impl StationRecord {
    pub fn new(name: impl Into<String>, cluster_id: u32) -> Self {
        Self {
            name: name.into(),
            cluster_id,
            lat: None,
            lon: None,
            bars: None,
            offices: None,
            universities: None,
        }
    }

    pub fn with_coords(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    pub fn with_amenities(mut self, bars: u32, offices: u32, universities: u32) -> Self {
        self.bars = Some(bars);
        self.offices = Some(offices);
        self.universities = Some(universities);
        self
    }
}

/// Average ridership for one station at one hour of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyVolume {
    #[serde(alias = "STATION")]
    pub station: String,
    #[serde(alias = "hr")]
    pub hour: i64,
    #[serde(default, alias = "vol")]
    pub volume: Option<f64>,
}

impl HourlyVolume {
    pub fn new(station: impl Into<String>, hour: i64, volume: f64) -> Self {
        Self {
            station: station.into(),
            hour,
            volume: Some(volume),
        }
    }
}

/// Archetype weekly shape of one cluster, raw as exported by the clustering step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterArchetype {
    pub cluster_id: u32,
    #[serde(default)]
    pub hourly_profile: Vec<f64>,
}

/// Cluster label from the offline labeling step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Persona {
    /// Placeholder for clusters without a label
    pub fn unlabeled(cluster_id: u32) -> Self {
        Self {
            name: format!("Cluster {}", cluster_id),
            description: String::new(),
            tags: Vec::new(),
        }
    }
}
