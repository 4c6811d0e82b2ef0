//! Pulse cache and TimeDNA extraction
//!
//! Pulse profiles are built once at startup from per-hour averages and
//! min-max normalized to [0, 100]. A request resolves the station's own
//! pulse first, then falls back to its cluster archetype.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::core::normalize_key;
use crate::types::{ClusterArchetype, HourlyVolume, TimeDna};
use crate::{
    CLUSTER_FALLBACK_VALUE, EARLY_NIGHT_HOURS, EVENING_HOURS, HOURS_PER_DAY, LATE_NIGHT_HOURS,
    LUNCH_HOURS, MORNING_HOURS, PULSE_FLAT_ACTIVE, PULSE_FLAT_IDLE,
};

/// 24 normalized hourly values for one station
pub type PulseProfile = [f64; HOURS_PER_DAY];

/// Station pulses keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct PulseCache {
    pulses: HashMap<String, PulseProfile>,
}

impl PulseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate raw hourly rows per normalized station and normalize each profile.
    /// Null or NaN volumes count as 0, out-of-range hours are skipped.
    pub fn build(rows: &[HourlyVolume]) -> Self {
        let mut raw: HashMap<String, PulseProfile> = HashMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let key = normalize_key(Some(&row.station));
            let slot = raw.entry(key).or_insert([0.0; HOURS_PER_DAY]);
            if !(0..HOURS_PER_DAY as i64).contains(&row.hour) {
                skipped += 1;
                continue;
            }
            slot[row.hour as usize] = sanitize(row.volume.unwrap_or(0.0));
        }

        if skipped > 0 {
            warn!(skipped, "Ignored hourly rows with out-of-range hour");
        }

        let pulses = raw
            .into_iter()
            .map(|(key, values)| (key, normalize_pulse(values)))
            .collect();
        Self { pulses }
    }

    pub fn get(&self, key: &str) -> Option<&PulseProfile> {
        self.pulses.get(key)
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}

/// Min-max normalize to [0, 100]. Constant nonzero → 50, constant zero → 5.
pub fn normalize_pulse(values: PulseProfile) -> PulseProfile {
    let (min, max) = min_max(&values);
    let range = max - min;

    if range > 0.0 {
        values.map(|v| (v - min) * 100.0 / range)
    } else if max > 0.0 {
        [PULSE_FLAT_ACTIVE; HOURS_PER_DAY]
    } else {
        [PULSE_FLAT_IDLE; HOURS_PER_DAY]
    }
}

/// Cluster archetype profiles, scaled to [0, 100] on load
#[derive(Debug, Clone, Default)]
pub struct ClusterProfiles {
    profiles: HashMap<u32, Vec<f64>>,
}

impl ClusterProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale each archetype to [0, 100]; a flat archetype becomes all 20
    pub fn from_archetypes(archetypes: &[ClusterArchetype]) -> Self {
        let profiles = archetypes
            .iter()
            .map(|a| (a.cluster_id, scale_archetype(&a.hourly_profile)))
            .collect();
        Self { profiles }
    }

    pub fn get(&self, cluster_id: u32) -> Option<&[f64]> {
        self.profiles.get(&cluster_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// First day of the archetype, padded with the fallback value
    pub fn daily(&self, cluster_id: u32) -> PulseProfile {
        let mut day = [CLUSTER_FALLBACK_VALUE; HOURS_PER_DAY];
        if let Some(profile) = self.get(cluster_id) {
            for (slot, v) in day.iter_mut().zip(profile.iter()) {
                *slot = *v;
            }
        }
        day
    }
}

fn scale_archetype(raw: &[f64]) -> Vec<f64> {
    let clean: Vec<f64> = raw.iter().map(|v| sanitize(*v)).collect();
    let (min, max) = min_max(&clean);
    if max > min {
        clean.iter().map(|v| (v - min) * 100.0 / (max - min)).collect()
    } else {
        vec![CLUSTER_FALLBACK_VALUE; clean.len()]
    }
}

/// Resolves a pulse per request and reduces it to TimeDNA
#[derive(Debug, Clone, Default)]
pub struct TimeDnaExtractor {
    pulses: PulseCache,
    clusters: ClusterProfiles,
}

impl TimeDnaExtractor {
    pub fn new(pulses: PulseCache, clusters: ClusterProfiles) -> Self {
        Self { pulses, clusters }
    }

    pub fn clusters(&self) -> &ClusterProfiles {
        &self.clusters
    }

    /// Station pulse if known, else the cluster archetype's first day
    pub fn resolve_pulse(&self, identity: &str, cluster_id: u32) -> PulseProfile {
        let key = normalize_key(Some(identity));
        match self.pulses.get(&key) {
            Some(pulse) => *pulse,
            None => {
                debug!(station = %identity, cluster_id, "No station pulse, using cluster archetype");
                self.clusters.daily(cluster_id)
            }
        }
    }

    pub fn extract(&self, identity: &str, cluster_id: u32) -> TimeDna {
        time_dna_from_pulse(&self.resolve_pulse(identity, cluster_id))
    }
}

/// Bucket a pulse over the fixed windows. NaN is treated as 0, results truncate.
pub fn time_dna_from_pulse(pulse: &PulseProfile) -> TimeDna {
    let day = (*pulse).map(sanitize);
    let night = (window_mean(&day, LATE_NIGHT_HOURS) + window_mean(&day, EARLY_NIGHT_HOURS)) / 2.0;

    TimeDna {
        morning: truncate(window_mean(&day, MORNING_HOURS)),
        lunch: truncate(window_mean(&day, LUNCH_HOURS)),
        evening: truncate(window_mean(&day, EVENING_HOURS)),
        night: truncate(night),
    }
}

fn window_mean(day: &PulseProfile, hours: std::ops::Range<usize>) -> f64 {
    let len = hours.len() as f64;
    day[hours].iter().sum::<f64>() / len
}

fn truncate(v: f64) -> u32 {
    // saturating cast: negatives and NaN land on 0
    v.trunc() as u32
}

fn sanitize(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}
