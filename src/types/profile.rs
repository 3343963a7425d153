use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::climb::Climb;
use crate::types::gradient::BandSegment;

/// One point of an elevation profile: cumulative distance from the track start
/// and the elevation at that distance, both in meters.
///
/// Smoothed profiles reuse this shape; only `elevation` differs from the raw
/// sample at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub distance: f64,
    pub elevation: f64,
}

impl ElevationSample {
    pub fn new(distance: f64, elevation: f64) -> Self {
        Self {
            distance,
            elevation,
        }
    }
}

/// A GeoJSON-style `[lon, lat, ele]` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct RouteCoordinate {
    pub lon: f64,
    pub lat: f64,
    pub elevation: f64,
}

impl From<[f64; 3]> for RouteCoordinate {
    fn from([lon, lat, elevation]: [f64; 3]) -> Self {
        Self {
            lon,
            lat,
            elevation,
        }
    }
}

impl From<RouteCoordinate> for [f64; 3] {
    fn from(coord: RouteCoordinate) -> Self {
        [coord.lon, coord.lat, coord.elevation]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub total_distance_m: f64,
    pub elevation_gained_m: f64,
    pub elevation_lost_m: f64,
    pub min_elevation_m: f64,
    pub max_elevation_m: f64,
    pub point_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedProfile {
    pub stats: ProfileStats,
    pub climbs: Vec<Climb>,
    pub bands: Vec<BandSegment>,
    /// Raw samples, downsampled for chart payloads.
    pub profile: Vec<ElevationSample>,
    pub analyzed_at: DateTime<Utc>,
}
