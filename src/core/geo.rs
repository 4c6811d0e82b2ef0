//! Borough Geo-Classifier
//!
//! Ordered cascade, first match wins:
//! 1. Bronx north of the Harlem River
//! 2. Staten Island far west
//! 3. Deep Queens far east
//! 4. East River diagonal decides Manhattan, with the Marble Hill override
//! 5. Newtown Creek divide resolves Brooklyn vs Queens
//!
//! The thresholds are calibration constants, not geography. This is an
//! approximate heuristic, not a polygon geocoder.

use crate::types::Borough;
use crate::{
    BRONX_MIN_LAT, DEEP_QUEENS_MIN_LON, EAST_RIVER_ZONE_A_LON, EAST_RIVER_ZONE_A_MIN_LAT,
    EAST_RIVER_ZONE_B_LON, EAST_RIVER_ZONE_B_MIN_LAT, EAST_RIVER_ZONE_C_BASE_LON,
    EAST_RIVER_ZONE_C_ORIGIN_LAT, EAST_RIVER_ZONE_C_SLOPE, LIC_MIN_LAT,
    MANHATTAN_NORTH_TIP_LAT, NEWTOWN_CREEK_LAT, OZONE_PARK_MIN_LON, RIDGEWOOD_MIN_LON,
    ROCKAWAY_MAX_LAT, ROCKAWAY_MIN_LON, STATEN_ISLAND_MAX_LON,
};

/// Classify a coordinate pair. Missing coordinates yield Unknown.
pub fn classify_borough(lat: Option<f64>, lon: Option<f64>) -> Borough {
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Borough::Unknown,
    };

    if lat > BRONX_MIN_LAT {
        return Borough::Bronx;
    }
    if lon < STATEN_ISLAND_MAX_LON {
        return Borough::StatenIsland;
    }
    if lon > DEEP_QUEENS_MIN_LON {
        return Borough::Queens;
    }

    if west_of_east_river(lat, lon) {
        // Marble Hill sits north of the river but belongs to the Bronx side
        if lat > MANHATTAN_NORTH_TIP_LAT {
            return Borough::Bronx;
        }
        return Borough::Manhattan;
    }

    brooklyn_or_queens(lat, lon)
}

/// Three-zone piecewise-linear East River boundary
fn west_of_east_river(lat: f64, lon: f64) -> bool {
    if lat > EAST_RIVER_ZONE_A_MIN_LAT {
        lon < EAST_RIVER_ZONE_A_LON
    } else if lat > EAST_RIVER_ZONE_B_MIN_LAT {
        lon < EAST_RIVER_ZONE_B_LON
    } else {
        let border = EAST_RIVER_ZONE_C_BASE_LON
            + (lat - EAST_RIVER_ZONE_C_ORIGIN_LAT) * EAST_RIVER_ZONE_C_SLOPE;
        lon < border
    }
}

fn brooklyn_or_queens(lat: f64, lon: f64) -> Borough {
    // Rockaways vs Coney Island / Brighton
    if lat < ROCKAWAY_MAX_LAT {
        return if lon > ROCKAWAY_MIN_LON {
            Borough::Queens
        } else {
            Borough::Brooklyn
        };
    }

    // Ridgewood dips south, LIC/Sunnyside sit north
    if lat > NEWTOWN_CREEK_LAT {
        if lon > RIDGEWOOD_MIN_LON || lat > LIC_MIN_LAT {
            return Borough::Queens;
        }
        return Borough::Brooklyn;
    }

    // Ozone Park pocket
    if lat < NEWTOWN_CREEK_LAT && lon > OZONE_PARK_MIN_LON {
        return Borough::Queens;
    }

    Borough::Brooklyn
}
