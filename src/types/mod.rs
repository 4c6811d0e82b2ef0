//! Core types for MetroPulse

mod borough;
mod error;
mod narrative;
mod reason;
mod report;
mod station;
mod time_dna;

pub use borough::Borough;
pub use error::{CacheError, PolishError, TableLoadError};
pub use narrative::{Character, NarrativeDraft, NarrativeRecord, NarrativeResult};
pub use reason::NarrativeReason;
pub use report::{ClusterSummary, StationMetrics, StationOverview, StationReport};
pub use station::{ClusterArchetype, HourlyVolume, Persona, StationRecord};
pub use time_dna::{TimeBucket, TimeDna};
