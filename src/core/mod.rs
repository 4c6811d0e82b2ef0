//! Core modules for MetroPulse

pub mod cache;
pub mod engine;
pub mod geo;
pub mod narrative;
pub mod normalize;
pub mod polish;
pub mod pulse;
pub mod scoring;
pub mod tables;

pub use cache::NarrativeCache;
pub use engine::Engine;
pub use geo::classify_borough;
pub use narrative::{persona_title, NarrativeGenerator, NarrativeInputs};
pub use normalize::normalize_key;
pub use polish::{build_polisher, GeminiPolisher, NoopPolisher, PolishRequest, PolishedText, Polisher};
pub use pulse::{normalize_pulse, time_dna_from_pulse, ClusterProfiles, PulseCache, PulseProfile, TimeDnaExtractor};
pub use scoring::{retail_gap, Dimension, DistributionRegistry};
pub use tables::StartupTables;
