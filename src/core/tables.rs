//! Startup tables read from JSON exports of the offline pipeline
//!
//! A missing table is not fatal: the engine falls back to flat-20 TimeDNA and
//! zero percentiles for whatever is absent.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

use crate::types::{ClusterArchetype, HourlyVolume, Persona, StationRecord, TableLoadError};

pub const STATIONS_FILE: &str = "stations.json";
pub const HOURLY_FILE: &str = "hourly_ridership.json";
pub const CLUSTER_PROFILES_FILE: &str = "cluster_profiles.json";
pub const PERSONAS_FILE: &str = "personas.json";

/// Immutable inputs built once at startup
#[derive(Debug, Clone, Default)]
pub struct StartupTables {
    pub stations: Vec<StationRecord>,
    pub hourly: Vec<HourlyVolume>,
    pub archetypes: Vec<ClusterArchetype>,
    pub personas: HashMap<u32, Persona>,
}

impl StartupTables {
    /// Read every table from `data_dir`, substituting empty tables on failure
    pub fn load(data_dir: &Path) -> Self {
        let raw_personas: HashMap<String, Persona> =
            load_or_empty(&data_dir.join(PERSONAS_FILE));

        let tables = Self {
            stations: load_or_empty(&data_dir.join(STATIONS_FILE)),
            hourly: load_or_empty(&data_dir.join(HOURLY_FILE)),
            archetypes: load_or_empty(&data_dir.join(CLUSTER_PROFILES_FILE)),
            personas: personas_by_cluster(raw_personas),
        };

        info!(
            stations = tables.stations.len(),
            hourly_rows = tables.hourly.len(),
            clusters = tables.archetypes.len(),
            personas = tables.personas.len(),
            "Startup tables loaded"
        );
        tables
    }
}

/// Parse one JSON table
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T, TableLoadError> {
    let display = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TableLoadError::Missing(display.clone())
        } else {
            TableLoadError::Io {
                path: display.clone(),
                source,
            }
        }
    })?;
    serde_json::from_str(&json).map_err(|source| TableLoadError::Parse {
        path: display,
        source,
    })
}

fn load_or_empty<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_table(path) {
        Ok(table) => table,
        Err(e @ TableLoadError::Missing(_)) => {
            warn!(error = %e, "Startup table missing, using empty table");
            T::default()
        }
        Err(e) => {
            error!(error = %e, "Startup table load failed, using empty table");
            T::default()
        }
    }
}

fn personas_by_cluster(raw: HashMap<String, Persona>) -> HashMap<u32, Persona> {
    raw.into_iter()
        .filter_map(|(key, persona)| match key.trim().parse::<u32>() {
            Ok(cluster_id) => Some((cluster_id, persona)),
            Err(_) => {
                warn!(key = %key, "Ignoring persona with non-numeric cluster id");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_yields_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = StartupTables::load(&dir.path().join("nope"));
        assert!(tables.stations.is_empty());
        assert!(tables.personas.is_empty());
    }

    #[test]
    fn test_loads_exports() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(STATIONS_FILE),
            r#"[{"STATION": "Court Sq", "cluster_id": 1, "n_bars": 4}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(PERSONAS_FILE),
            r#"{"1": {"name": "The Commuters", "description": "9-5 Warriors.", "tags": ["Corporate"]},
                "x": {"name": "Bad"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(HOURLY_FILE), "{ broken").unwrap();

        let tables = StartupTables::load(dir.path());
        assert_eq!(tables.stations.len(), 1);
        assert_eq!(tables.personas[&1].name, "The Commuters");
        assert_eq!(tables.personas.len(), 1);
        assert!(tables.hourly.is_empty());
    }

    #[test]
    fn test_read_table_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = read_table::<Vec<StationRecord>>(&dir.path().join("x.json"));
        assert!(matches!(missing, Err(TableLoadError::Missing(_))));
    }
}
