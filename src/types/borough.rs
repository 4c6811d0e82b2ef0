//! Borough labels

use serde::{Deserialize, Serialize};

/// One of the five NYC boroughs, or Unknown when coordinates are missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
    Queens,
    Manhattan,
    Brooklyn,
    Unknown,
}

impl Borough {
    /// Display label, also used inside persona titles
    pub fn label(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
            Borough::Queens => "Queens",
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Borough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
