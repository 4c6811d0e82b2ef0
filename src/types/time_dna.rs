//! TimeDNA: four-bucket summary of a station's daily ridership shape

use serde::{Deserialize, Serialize};

/// The four fixed time-of-day buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Lunch,
    Evening,
    Night,
}

impl TimeBucket {
    pub fn name(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Lunch => "lunch",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Bucket averages of a normalized pulse, truncated to integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeDna {
    pub morning: u32,
    pub lunch: u32,
    pub evening: u32,
    pub night: u32,
}

impl TimeDna {
    pub fn new(morning: u32, lunch: u32, evening: u32, night: u32) -> Self {
        Self { morning, lunch, evening, night }
    }

    /// Buckets in tie-break order
    pub fn buckets(&self) -> [(TimeBucket, u32); 4] {
        [
            (TimeBucket::Morning, self.morning),
            (TimeBucket::Lunch, self.lunch),
            (TimeBucket::Evening, self.evening),
            (TimeBucket::Night, self.night),
        ]
    }

    /// Bucket with the highest value. Ties resolve morning > lunch > evening > night.
    /// None when all four buckets are equal.
    pub fn dominant(&self) -> Option<TimeBucket> {
        let buckets = self.buckets();
        if buckets.iter().all(|(_, v)| *v == self.morning) {
            return None;
        }

        let mut best = buckets[0];
        for candidate in &buckets[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        Some(best.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_picks_max() {
        let dna = TimeDna::new(30, 20, 45, 55);
        assert_eq!(dna.dominant(), Some(TimeBucket::Night));
    }

    #[test]
    fn test_dominant_tie_order() {
        assert_eq!(TimeDna::new(50, 50, 10, 10).dominant(), Some(TimeBucket::Morning));
        assert_eq!(TimeDna::new(10, 60, 60, 60).dominant(), Some(TimeBucket::Lunch));
        assert_eq!(TimeDna::new(10, 20, 70, 70).dominant(), Some(TimeBucket::Evening));
    }

    #[test]
    fn test_flat_has_no_dominant() {
        assert_eq!(TimeDna::new(20, 20, 20, 20).dominant(), None);
        assert_eq!(TimeDna::default().dominant(), None);
    }
}
