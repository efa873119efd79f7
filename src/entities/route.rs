use serde::{Deserialize, Serialize};

/// Distance and driving time between two points, as reported by a routing service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteEstimate {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TripSource {
    Measured {
        distance_km: f64,
        duration_min: f64,
    },
    GooglePlaces {
        origin_place_id: String,
        destination_place_id: String,
    },
}
