//! MetroPulse: per-station semantic profiles for the NYC subway
//!
//! Pipeline: identity → pulse (station or cluster fallback) → TimeDNA →
//! percentile scores → rule-based narrative → narrative cache → optional polish

pub mod config;
pub mod core;
pub mod types;

// =============================================================================
// BOROUGH CLASSIFIER [C] - hand-tuned calibration, reproduce exactly
// =============================================================================

/// North of the Harlem River
pub const BRONX_MIN_LAT: f64 = 40.835;

/// West of the Kill Van Kull
pub const STATEN_ISLAND_MAX_LON: f64 = -74.05;

/// East of Flushing Bay
pub const DEEP_QUEENS_MIN_LON: f64 = -73.85;

/// East River zone A (Upper East Side vs Astoria)
pub const EAST_RIVER_ZONE_A_MIN_LAT: f64 = 40.76;
pub const EAST_RIVER_ZONE_A_LON: f64 = -73.935;

/// East River zone B (Midtown vs LIC)
pub const EAST_RIVER_ZONE_B_MIN_LAT: f64 = 40.74;
pub const EAST_RIVER_ZONE_B_LON: f64 = -73.96;

/// East River zone C (Lower Manhattan vs Brooklyn): border = base + (lat - origin) * slope
pub const EAST_RIVER_ZONE_C_BASE_LON: f64 = -74.01;
pub const EAST_RIVER_ZONE_C_ORIGIN_LAT: f64 = 40.68;
pub const EAST_RIVER_ZONE_C_SLOPE: f64 = 0.8;

/// Marble Hill / Inwood override
pub const MANHATTAN_NORTH_TIP_LAT: f64 = 40.88;

/// Rockaways vs Coney Island
pub const ROCKAWAY_MAX_LAT: f64 = 40.60;
pub const ROCKAWAY_MIN_LON: f64 = -73.90;

/// Newtown Creek divide
pub const NEWTOWN_CREEK_LAT: f64 = 40.70;
pub const RIDGEWOOD_MIN_LON: f64 = -73.91;
pub const LIC_MIN_LAT: f64 = 40.735;

/// Ozone Park pocket
pub const OZONE_PARK_MIN_LON: f64 = -73.86;

// =============================================================================
// PULSE + TimeDNA [C]
// =============================================================================

/// Hours in a daily pulse profile
pub const HOURS_PER_DAY: usize = 24;

/// Pulse value when a station's raw volume is constant and nonzero
pub const PULSE_FLAT_ACTIVE: f64 = 50.0;

/// Pulse value when a station's raw volume is constant zero
pub const PULSE_FLAT_IDLE: f64 = 5.0;

/// Fill value for missing or flat cluster archetypes
pub const CLUSTER_FALLBACK_VALUE: f64 = 20.0;

/// Bucket windows, half-open hour ranges
pub const MORNING_HOURS: std::ops::Range<usize> = 6..10;
pub const LUNCH_HOURS: std::ops::Range<usize> = 11..14;
pub const EVENING_HOURS: std::ops::Range<usize> = 16..20;
pub const LATE_NIGHT_HOURS: std::ops::Range<usize> = 22..24;
pub const EARLY_NIGHT_HOURS: std::ops::Range<usize> = 0..4;

// =============================================================================
// NARRATIVE CASCADE [C] - first match wins
// =============================================================================

pub const ACADEMIC_MIN_UNIVERSITIES: u32 = 2;
pub const NIGHTLIFE_MIN_VITALITY: f64 = 75.0;
pub const NIGHTLIFE_MIN_NIGHT: u32 = 40;
pub const CORPORATE_MIN_OFFICE: f64 = 70.0;
pub const MIXED_USE_MIN_OFFICE: f64 = 50.0;
pub const MIXED_USE_MIN_VITALITY: f64 = 50.0;
pub const COMMUTER_MIN_MORNING: u32 = 60;
pub const RESIDENTIAL_MAX_VITALITY: f64 = 20.0;
pub const RESIDENTIAL_MAX_OFFICE: f64 = 20.0;

// =============================================================================
// RETAIL GAP [C]
// =============================================================================

/// Prime opportunity: many workers, little food/bev
pub const RETAIL_GAP_PRIME: f64 = 0.9;
/// Moderate opportunity
pub const RETAIL_GAP_MODERATE: f64 = 0.6;
/// Saturated
pub const RETAIL_GAP_SATURATED: f64 = 0.1;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
