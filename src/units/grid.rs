//! Grid carbon intensity reference values.

use serde::{Deserialize, Serialize};

use super::gpu::normalize;

/// Carbon intensity of one electricity grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRegion {
    /// Region identifier (e.g., "us-average")
    pub id: String,
    /// Grams of CO2-equivalent emitted per kWh consumed
    pub grams_co2_per_kwh: f64,
}

impl GridRegion {
    /// Create a region entry.
    pub fn new(id: impl Into<String>, grams_co2_per_kwh: f64) -> Self {
        Self {
            id: id.into(),
            grams_co2_per_kwh,
        }
    }
}

/// Approximate annual-average intensities for common training locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTable {
    regions: Vec<GridRegion>,
}

impl Default for GridTable {
    fn default() -> Self {
        Self {
            regions: vec![
                GridRegion::new("us-average", 386.0),
                GridRegion::new("world-average", 475.0),
                GridRegion::new("eu-average", 250.0),
                GridRegion::new("germany", 380.0),
                GridRegion::new("france", 55.0),
                GridRegion::new("sweden", 40.0),
                GridRegion::new("china", 580.0),
                GridRegion::new("india", 710.0),
            ],
        }
    }
}

impl GridTable {
    /// Intensity used when the caller names no region.
    pub const DEFAULT_REGION: &'static str = "us-average";

    /// Look up a region, ignoring case and separators.
    pub fn get(&self, id: &str) -> Option<&GridRegion> {
        let wanted = normalize(id);
        self.regions.iter().find(|r| normalize(&r.id) == wanted)
    }

    /// All regions.
    pub fn all(&self) -> &[GridRegion] {
        &self.regions
    }

    /// Region identifiers.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.id.as_str())
    }

    /// Intensity of the default region.
    pub fn default_intensity(&self) -> f64 {
        self.get(Self::DEFAULT_REGION)
            .map_or(386.0, |r| r.grams_co2_per_kwh)
    }
}
