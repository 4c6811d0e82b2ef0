//! Engine: immutable startup tables plus the one mutable narrative cache
//!
//! Built once and shared by reference. Every scoring call is synchronous and
//! read-only; only `narrative` and `report` touch I/O.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_POLISH_TIMEOUT_SECS;
use crate::core::narrative::{NarrativeGenerator, NarrativeInputs};
use crate::core::polish::{NoopPolisher, PolishRequest, Polisher};
use crate::core::pulse::{ClusterProfiles, PulseCache, TimeDnaExtractor};
use crate::core::scoring::{retail_gap, Dimension, DistributionRegistry};
use crate::core::tables::StartupTables;
use crate::core::{classify_borough, NarrativeCache};
use crate::types::{
    ClusterSummary, NarrativeReason, NarrativeRecord, NarrativeResult, Persona, PolishError, StationMetrics,
    StationOverview, StationRecord, StationReport, TimeDna,
};
use crate::HOURS_PER_DAY;

pub struct Engine {
    /// Table order preserved for listings
    stations: Vec<StationRecord>,
    /// Exact name → first row with that name
    index: HashMap<String, usize>,
    personas: HashMap<u32, Persona>,
    extractor: TimeDnaExtractor,
    registry: DistributionRegistry,
    generator: NarrativeGenerator,
    cache: NarrativeCache,
    polisher: Arc<dyn Polisher>,
    polish_timeout: Duration,
}

impl Engine {
    pub fn new(tables: StartupTables, cache: NarrativeCache, polisher: Arc<dyn Polisher>) -> Self {
        let StartupTables {
            stations,
            hourly,
            archetypes,
            personas,
        } = tables;

        let mut index = HashMap::with_capacity(stations.len());
        for (i, station) in stations.iter().enumerate() {
            index.entry(station.name.clone()).or_insert(i);
        }
        if index.len() < stations.len() {
            warn!(
                rows = stations.len(),
                unique = index.len(),
                "Duplicate station names, first row wins"
            );
        }

        let pulses = PulseCache::build(&hourly);
        let clusters = ClusterProfiles::from_archetypes(&archetypes);
        let registry = DistributionRegistry::from_stations(&stations);

        if pulses.is_empty() && clusters.is_empty() {
            warn!("No pulse or cluster tables, TimeDNA falls back to flat profiles");
        }
        if registry.is_empty() {
            warn!("No station table, percentiles are zero");
        }
        info!(
            stations = stations.len(),
            pulses = pulses.len(),
            clusters = clusters.len(),
            polisher = polisher.name(),
            "Engine ready"
        );

        Self {
            stations,
            index,
            personas,
            extractor: TimeDnaExtractor::new(pulses, clusters),
            registry,
            generator: NarrativeGenerator::new(),
            cache,
            polisher,
            polish_timeout: Duration::from_secs(DEFAULT_POLISH_TIMEOUT_SECS),
        }
    }

    /// Engine with no polish collaborator
    pub fn deterministic(tables: StartupTables, cache: NarrativeCache) -> Self {
        Self::new(tables, cache, Arc::new(NoopPolisher))
    }

    pub fn with_polish_timeout(mut self, timeout: Duration) -> Self {
        self.polish_timeout = timeout;
        self
    }

    pub fn station(&self, identity: &str) -> Option<&StationRecord> {
        self.index.get(identity).map(|&i| &self.stations[i])
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    pub fn cache(&self) -> &NarrativeCache {
        &self.cache
    }

    pub fn time_dna(&self, identity: &str, cluster_id: u32) -> TimeDna {
        self.extractor.extract(identity, cluster_id)
    }

    pub fn percentile(&self, dim: Dimension, value: Option<u32>) -> f64 {
        self.registry.percentile(dim, value)
    }

    fn inputs_for(&self, station: &StationRecord) -> NarrativeInputs {
        NarrativeInputs {
            borough: classify_borough(station.lat, station.lon),
            vitality: self.percentile(Dimension::Bars, station.bars),
            office: self.percentile(Dimension::Offices, station.offices),
            universities: station.universities.unwrap_or(0),
            time_dna: self.time_dna(&station.name, station.cluster_id),
        }
    }

    /// Stored narrative for `identity`, generating and persisting it on first request.
    /// Unknown stations get the non-persisted sentinel.
    pub async fn narrative(&self, identity: &str) -> NarrativeResult {
        if let Some(record) = self.cache.get(identity).await {
            debug!(station = %identity, "Narrative cache hit");
            return NarrativeResult::new(record, NarrativeReason::R101_CACHE_HIT);
        }

        let station = match self.station(identity) {
            Some(station) => station,
            None => {
                debug!(station = %identity, "Unknown station, returning sentinel");
                return NarrativeResult::not_found();
            }
        };

        self.cache
            .get_or_generate(identity, || self.generate(identity, station))
            .await
    }

    async fn generate(&self, identity: &str, station: &StationRecord) -> NarrativeRecord {
        let inputs = self.inputs_for(station);
        let draft = self.generator.generate(&inputs);
        info!(
            station = %identity,
            borough = %inputs.borough,
            character = %draft.character,
            "Generated baseline narrative"
        );

        let request = PolishRequest {
            station: identity.to_string(),
            borough: inputs.borough,
            persona: draft.persona.clone(),
            baseline_description: draft.description.clone(),
            vitality_score: inputs.vitality,
            peak: inputs.time_dna.dominant(),
        };
        let mut record = NarrativeRecord::from_draft(draft, inputs.vitality, inputs.office);

        match tokio::time::timeout(self.polish_timeout, self.polisher.polish(&request)).await {
            Ok(Ok(polished)) => {
                info!(station = %identity, polisher = self.polisher.name(), "Narrative polished");
                record.description = polished.description;
                record.is_ai_generated = true;
            }
            Ok(Err(PolishError::Unconfigured)) => {}
            Ok(Err(e)) => {
                warn!(station = %identity, error = %e, "Polish failed, keeping baseline");
            }
            Err(_) => {
                warn!(station = %identity, timeout = ?self.polish_timeout, "Polish timed out, keeping baseline");
            }
        }
        record
    }

    /// Full exposed record: fresh scores plus the stored narrative
    pub async fn report(&self, identity: &str) -> Option<StationReport> {
        let station = self.station(identity)?;
        let inputs = self.inputs_for(station);
        let narrative = self.narrative(identity).await.record;

        Some(StationReport {
            identity: identity.to_string(),
            borough: inputs.borough,
            time_dna: inputs.time_dna,
            vitality_score: inputs.vitality,
            office_score: inputs.office,
            retail_gap: retail_gap(inputs.office, inputs.vitality),
            persona: narrative.persona,
            description: narrative.description,
            is_ai_generated: narrative.is_ai_generated,
        })
    }

    /// Every station with scores, in table order. No narrative generation.
    pub fn station_overviews(&self) -> Vec<StationOverview> {
        self.stations
            .iter()
            .map(|station| {
                let inputs = self.inputs_for(station);
                StationOverview {
                    station: station.name.clone(),
                    cluster_id: station.cluster_id,
                    lat: station.lat,
                    lon: station.lon,
                    n_bars: station.bars,
                    n_offices: station.offices,
                    n_universities: station.universities,
                    persona_name: self
                        .personas
                        .get(&station.cluster_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    time_dna: inputs.time_dna,
                    metrics: StationMetrics {
                        weekend_vitality: inputs.vitality / 100.0,
                        borough: inputs.borough,
                        office_density: inputs.office,
                        retail_gap: retail_gap(inputs.office, inputs.vitality),
                    },
                }
            })
            .collect()
    }

    /// Per-cluster aggregates ordered by cluster id
    pub fn cluster_summaries(&self) -> Vec<ClusterSummary> {
        let mut groups: BTreeMap<u32, Vec<&StationRecord>> = BTreeMap::new();
        for station in &self.stations {
            groups.entry(station.cluster_id).or_default().push(station);
        }

        groups
            .into_iter()
            .map(|(cluster_id, members)| {
                let bars: Vec<u32> = members.iter().filter_map(|s| s.bars).collect();
                let avg_bars = if bars.is_empty() {
                    0.0
                } else {
                    bars.iter().map(|&b| b as f64).sum::<f64>() / bars.len() as f64
                };
                let chart_data = match self.extractor.clusters().get(cluster_id) {
                    Some(profile) => profile.iter().take(HOURS_PER_DAY).copied().collect(),
                    None => vec![0.0; HOURS_PER_DAY],
                };

                ClusterSummary {
                    cluster_id,
                    persona: self
                        .personas
                        .get(&cluster_id)
                        .cloned()
                        .unwrap_or_else(|| Persona::unlabeled(cluster_id)),
                    station_count: members.len(),
                    avg_bars,
                    example_station: members[0].name.clone(),
                    chart_data,
                }
            })
            .collect()
    }
}
