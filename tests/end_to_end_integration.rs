//! End-to-end: JSON tables on disk → Engine → report, listings and persisted store

use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;

use metropulse::core::{Engine, NarrativeCache, StartupTables};
use metropulse::types::{Borough, NarrativeReason, TimeDna};

const TARGET: &str = "Christopher St-Sheridan Sq";

/// Raw hourly volume for the target: min at 5am, max at 10am, so the
/// normalized pulse equals the raw numbers
fn target_volume(hour: i64) -> f64 {
    match hour {
        5 => 0.0,
        10 => 100.0,
        6..=9 => 30.0,
        11..=13 => 20.0,
        16..=19 => 45.0,
        22 | 23 | 0..=3 => 55.0,
        _ => 50.0,
    }
}

/// Ten stations, station k has k bars and (k + 3) % 10 offices; the last one is the target
fn write_tables(dir: &Path) {
    let stations: Vec<_> = (0..10u32)
        .map(|k| {
            let (name, lat, lon) = if k == 9 {
                (TARGET.to_string(), Some(40.739), Some(-74.002))
            } else {
                (format!("Station {}", k), None, None)
            };
            json!({
                "STATION": name,
                "cluster_id": k % 2,
                "GTFS Latitude": lat,
                "GTFS Longitude": lon,
                "n_bars": k,
                "n_offices": (k + 3) % 10,
                "n_universities": 0,
            })
        })
        .collect();

    // upstream export spells the station differently; matched by normalized name
    let hourly: Vec<_> = (0..24i64)
        .map(|hr| json!({ "STATION": "CHRISTOPHER ST - SHERIDAN SQ", "hr": hr, "vol": target_volume(hr) }))
        .collect();

    let archetypes = json!([
        { "cluster_id": 0, "hourly_profile": (0..24).map(|h| h as f64).collect::<Vec<_>>() },
        { "cluster_id": 1, "hourly_profile": [7.0, 7.0, 7.0] },
    ]);

    let personas = json!({
        "0": { "name": "Rising Commuters", "description": "Climbs all day", "tags": ["commute"] },
        "1": { "name": "Flatliners" },
    });

    for (file, value) in [
        ("stations.json", json!(stations)),
        ("hourly_ridership.json", json!(hourly)),
        ("cluster_profiles.json", archetypes),
        ("personas.json", personas),
    ] {
        std::fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }
}

fn engine(dir: &Path) -> Engine {
    Engine::deterministic(
        StartupTables::load(dir),
        NarrativeCache::load(dir.join("narratives.json")),
    )
}

#[tokio::test]
async fn test_full_report_for_nightlife_station() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let engine = engine(dir.path());

    let report = engine.report(TARGET).await.unwrap();

    assert_eq!(report.borough, Borough::Manhattan);
    assert_eq!(report.time_dna, TimeDna::new(30, 20, 45, 55));
    assert!((report.vitality_score - 90.0).abs() < 1e-9);
    assert!((report.office_score - 20.0).abs() < 1e-9);
    assert_eq!(report.retail_gap, 0.1);
    assert_eq!(report.persona, "Manhattan Nightlife District");
    assert_eq!(
        report.description,
        "A high-energy area (Vitality: 90%) bustling with evening social activity. \
         Unusually high Late Night (10pm-4am) ridership signals a destination for after-hours entertainment."
    );
    assert!(!report.is_ai_generated);
}

#[tokio::test]
async fn test_narrative_persisted_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());

    let generated = engine(dir.path()).narrative(TARGET).await;
    assert_eq!(generated.reason, NarrativeReason::R102_GENERATED);

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("narratives.json")).unwrap())
            .unwrap();
    let entry = &stored[TARGET];
    assert_eq!(entry["persona"], "Manhattan Nightlife District");
    assert_eq!(entry["is_ai_generated"], false);
    assert!(entry["vitality_score"].as_f64().is_some());

    let reloaded = engine(dir.path()).narrative(TARGET).await;
    assert_eq!(reloaded.reason, NarrativeReason::R101_CACHE_HIT);
    assert_eq!(reloaded.record, generated.record);
}

#[test]
fn test_station_overviews() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let overviews = engine(dir.path()).station_overviews();

    assert_eq!(overviews.len(), 10);
    let target = &overviews[9];
    assert_eq!(target.station, TARGET);
    assert_eq!(target.persona_name, "Flatliners");
    assert_eq!(target.metrics.borough, Borough::Manhattan);
    assert!((target.metrics.weekend_vitality - 0.9).abs() < 1e-9);

    // no coordinates → Unknown; no hourly rows → cluster archetype
    let first = &overviews[0];
    assert_eq!(first.metrics.borough, Borough::Unknown);
    assert_eq!(first.persona_name, "Rising Commuters");
    assert_eq!(first.time_dna.evening, 76);
}

#[test]
fn test_cluster_summaries() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let summaries = engine(dir.path()).cluster_summaries();

    assert_eq!(summaries.len(), 2);

    let rising = &summaries[0];
    assert_eq!(rising.cluster_id, 0);
    assert_eq!(rising.persona.name, "Rising Commuters");
    assert_eq!(rising.persona.tags, vec!["commute".to_string()]);
    assert_eq!(rising.station_count, 5);
    assert_eq!(rising.avg_bars, 4.0);
    assert_eq!(rising.example_station, "Station 0");
    assert_eq!(rising.chart_data.len(), 24);
    assert_eq!(rising.chart_data[0], 0.0);
    assert_eq!(rising.chart_data[23], 100.0);

    // flat archetype shorter than a day: scaled to 20s, chart keeps its length
    let flat = &summaries[1];
    assert_eq!(flat.persona.name, "Flatliners");
    assert_eq!(flat.avg_bars, 5.0);
    assert_eq!(flat.chart_data, vec![20.0, 20.0, 20.0]);
}

#[test]
fn test_missing_data_dir_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir.path().join("absent"));

    assert!(engine.stations().is_empty());
    assert!(engine.station_overviews().is_empty());
    assert_eq!(engine.time_dna(TARGET, 0), TimeDna::new(20, 20, 20, 20));
}
