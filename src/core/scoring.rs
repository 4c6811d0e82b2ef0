//! Global Distribution Registry and Percentile Scorer
//!
//! Built once from the full station table, read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::types::StationRecord;
use crate::{RETAIL_GAP_MODERATE, RETAIL_GAP_PRIME, RETAIL_GAP_SATURATED};

/// Amenity dimension scored against all stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Bars,
    Offices,
    Universities,
}

/// Per-dimension amenity counts spanning every known station
#[derive(Debug, Clone, Default)]
pub struct DistributionRegistry {
    bars: Vec<u32>,
    offices: Vec<u32>,
    universities: Vec<u32>,
}

impl DistributionRegistry {
    /// Empty registry: every percentile is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the station table. Null counts enter as 0.
    pub fn from_stations(stations: &[StationRecord]) -> Self {
        Self {
            bars: stations.iter().map(|s| s.bars.unwrap_or(0)).collect(),
            offices: stations.iter().map(|s| s.offices.unwrap_or(0)).collect(),
            universities: stations.iter().map(|s| s.universities.unwrap_or(0)).collect(),
        }
    }

    pub fn distribution(&self, dim: Dimension) -> &[u32] {
        match dim {
            Dimension::Bars => &self.bars,
            Dimension::Offices => &self.offices,
            Dimension::Universities => &self.universities,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Strict rank: share of the distribution strictly below `value`, in [0, 100)
    pub fn percentile(&self, dim: Dimension, value: Option<u32>) -> f64 {
        let data = self.distribution(dim);
        if data.is_empty() {
            return 0.0;
        }
        let value = value.unwrap_or(0);
        let below = data.iter().filter(|&&x| x < value).count();
        below as f64 / data.len() as f64 * 100.0
    }
}

/// Retail opportunity from office and vitality percentiles
pub fn retail_gap(office: f64, vitality: f64) -> f64 {
    if office > 60.0 && vitality < 40.0 {
        RETAIL_GAP_PRIME
    } else if office > 40.0 && vitality < 50.0 {
        RETAIL_GAP_MODERATE
    } else if vitality > 80.0 {
        RETAIL_GAP_SATURATED
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(bars: &[u32]) -> DistributionRegistry {
        let stations: Vec<StationRecord> = bars
            .iter()
            .enumerate()
            .map(|(i, &b)| StationRecord::new(format!("S{}", i), 0).with_amenities(b, 0, 0))
            .collect();
        DistributionRegistry::from_stations(&stations)
    }

    #[test]
    fn test_empty_distribution_is_zero() {
        let reg = DistributionRegistry::new();
        assert_eq!(reg.percentile(Dimension::Bars, Some(100)), 0.0);
        assert_eq!(reg.percentile(Dimension::Offices, None), 0.0);
    }

    #[test]
    fn test_strict_rank() {
        let reg = registry(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(reg.percentile(Dimension::Bars, Some(9)), 90.0);
        assert_eq!(reg.percentile(Dimension::Bars, Some(2)), 20.0);
        assert_eq!(reg.percentile(Dimension::Bars, Some(0)), 0.0);
        // a value outside the table ranks above every sample
        assert_eq!(reg.percentile(Dimension::Bars, Some(50)), 100.0);
    }

    #[test]
    fn test_ties_do_not_split() {
        let reg = registry(&[5, 5, 5, 5]);
        assert_eq!(reg.percentile(Dimension::Bars, Some(5)), 0.0);
        assert_eq!(reg.percentile(Dimension::Bars, Some(6)), 100.0);
    }

    #[test]
    fn test_null_value_scores_as_zero() {
        let reg = registry(&[0, 3, 7]);
        assert_eq!(
            reg.percentile(Dimension::Bars, None),
            reg.percentile(Dimension::Bars, Some(0))
        );
    }

    #[test]
    fn test_minimum_scores_zero() {
        let reg = registry(&[4, 8, 15, 16, 23, 42]);
        assert_eq!(reg.percentile(Dimension::Bars, Some(4)), 0.0);
    }

    #[test]
    fn test_monotonic() {
        let reg = registry(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3]);
        let mut last = 0.0;
        for v in 0..12 {
            let p = reg.percentile(Dimension::Bars, Some(v));
            assert!(p >= last, "percentile dropped at {}", v);
            last = p;
        }
    }

    #[test]
    fn test_retail_gap_bands() {
        assert_eq!(retail_gap(70.0, 30.0), RETAIL_GAP_PRIME);
        assert_eq!(retail_gap(45.0, 45.0), RETAIL_GAP_MODERATE);
        assert_eq!(retail_gap(10.0, 85.0), RETAIL_GAP_SATURATED);
        assert_eq!(retail_gap(10.0, 60.0), 0.0);
        // prime wins over moderate
        assert_eq!(retail_gap(61.0, 39.0), RETAIL_GAP_PRIME);
    }
}
