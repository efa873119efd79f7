use serde::{Deserialize, Serialize};

use crate::pricing::VehicleRate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub class: String,
    pub display_name: String,
    pub base_fare: f64,
    pub min_fare: f64,
    pub per_mile: f64,
    pub per_minute: f64,
}

impl VehicleSummary {
    pub fn new(class: &str, rate: &VehicleRate) -> Self {
        Self {
            class: class.into(),
            display_name: rate.display_name.clone(),
            base_fare: rate.base_fare,
            min_fare: rate.min_fare,
            per_mile: rate.per_mile,
            per_minute: rate.per_minute,
        }
    }
}
