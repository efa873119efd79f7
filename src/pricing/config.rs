use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::pricing::coupon::Coupon;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read pricing config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse pricing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pricing config: {message}")]
    Invalid { message: String },
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

/// Rate card for one vehicle class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleRate {
    pub display_name: String,
    pub base_fare: f64,
    pub min_fare: f64,
    pub per_mile: f64,
    pub per_minute: f64,
    #[serde(default)]
    pub included_miles: f64,
    #[serde(default)]
    pub included_minutes: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeBand {
    pub max_hours: f64,
    pub multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourMultiplier {
    pub hour: u32,
    pub multiplier: f64,
}

/// Demand multipliers keyed by local hour of pickup.
///
/// Written in config files as a list of `{ hour, multiplier }` entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HourMultiplier>", into = "Vec<HourMultiplier>")]
pub struct HourMultipliers(BTreeMap<u32, f64>);

impl HourMultipliers {
    pub fn get(&self, hour: u32) -> f64 {
        self.0.get(&hour).copied().unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(hour, multiplier)| (*hour, *multiplier))
    }
}

impl TryFrom<Vec<HourMultiplier>> for HourMultipliers {
    type Error = String;

    fn try_from(entries: Vec<HourMultiplier>) -> Result<Self, Self::Error> {
        let mut table = BTreeMap::new();

        for entry in entries {
            if entry.hour > 23 {
                return Err(format!("pickup hour {} is out of range", entry.hour));
            }

            if table.insert(entry.hour, entry.multiplier).is_some() {
                return Err(format!("pickup hour {} is listed twice", entry.hour));
            }
        }

        Ok(Self(table))
    }
}

impl From<HourMultipliers> for Vec<HourMultiplier> {
    fn from(table: HourMultipliers) -> Self {
        table
            .0
            .into_iter()
            .map(|(hour, multiplier)| HourMultiplier { hour, multiplier })
            .collect()
    }
}

impl<const N: usize> From<[(u32, f64); N]> for HourMultipliers {
    fn from(entries: [(u32, f64); N]) -> Self {
        Self(BTreeMap::from(entries))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency: String,
    pub tax_rate: f64,
    pub airport_fee: f64,
    pub free_wait_minutes: f64,
    pub wait_per_minute: f64,
    #[serde(default)]
    pub pickup_hour_multipliers: HourMultipliers,
    pub lead_time_multipliers: Vec<LeadTimeBand>,
    pub vehicles: BTreeMap<String, VehicleRate>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

impl PricingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    #[tracing::instrument(name = "PricingConfig::load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;

        tracing::info!(
            vehicles = config.vehicles.len(),
            coupons = config.coupons.len(),
            "loaded pricing config"
        );

        Ok(config)
    }

    pub fn vehicle(&self, class: &str) -> Option<&VehicleRate> {
        self.vehicles.get(class)
    }

    /// First band whose `max_hours` covers the lead time.
    pub fn lead_time_band(&self, lead_time_hours: f64) -> Option<&LeadTimeBand> {
        self.lead_time_multipliers
            .iter()
            .find(|band| band.max_hours >= lead_time_hours)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().is_empty() {
            return Err(invalid("currency is empty"));
        }

        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(invalid(format!("tax rate {} is not a fraction", self.tax_rate)));
        }

        for (name, value) in [
            ("airport_fee", self.airport_fee),
            ("free_wait_minutes", self.free_wait_minutes),
            ("wait_per_minute", self.wait_per_minute),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(format!("{} must be non-negative", name)));
            }
        }

        for (hour, multiplier) in self.pickup_hour_multipliers.iter() {
            if !(multiplier > 0.0) {
                return Err(invalid(format!("multiplier for hour {} must be positive", hour)));
            }
        }

        self.validate_lead_time_bands()?;

        if self.vehicles.is_empty() {
            return Err(invalid("no vehicles configured"));
        }

        for (class, rate) in &self.vehicles {
            let amounts = [
                rate.base_fare,
                rate.min_fare,
                rate.per_mile,
                rate.per_minute,
                rate.included_miles,
                rate.included_minutes,
            ];

            if amounts.iter().any(|amount| !(*amount >= 0.0)) {
                return Err(invalid(format!("vehicle {} has a negative rate", class)));
            }
        }

        for coupon in &self.coupons {
            coupon.validate().map_err(invalid)?;
        }

        Ok(())
    }

    fn validate_lead_time_bands(&self) -> Result<(), ConfigError> {
        let last = self
            .lead_time_multipliers
            .last()
            .ok_or_else(|| invalid("no lead time bands configured"))?;

        if last.max_hours != f64::INFINITY {
            return Err(invalid(
                "last lead time band must catch every lead time (max_hours = inf)",
            ));
        }

        for pair in self.lead_time_multipliers.windows(2) {
            if !(pair[0].max_hours < pair[1].max_hours) {
                return Err(invalid("lead time bands must be sorted by max_hours"));
            }
        }

        if let Some(band) = self
            .lead_time_multipliers
            .iter()
            .find(|band| !(band.multiplier > 0.0))
        {
            return Err(invalid(format!(
                "lead time multiplier for band up to {}h must be positive",
                band.max_hours
            )));
        }

        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let vehicles = BTreeMap::from([
            (
                "sedan".to_string(),
                VehicleRate {
                    display_name: "Sedan".into(),
                    base_fare: 10.0,
                    min_fare: 40.0,
                    per_mile: 3.25,
                    per_minute: 0.70,
                    included_miles: 0.0,
                    included_minutes: 0.0,
                },
            ),
            (
                "suv".to_string(),
                VehicleRate {
                    display_name: "SUV".into(),
                    base_fare: 15.0,
                    min_fare: 60.0,
                    per_mile: 4.25,
                    per_minute: 0.85,
                    included_miles: 0.0,
                    included_minutes: 0.0,
                },
            ),
            (
                "sprinter".to_string(),
                VehicleRate {
                    display_name: "Sprinter Van".into(),
                    base_fare: 25.0,
                    min_fare: 90.0,
                    per_mile: 5.50,
                    per_minute: 1.10,
                    included_miles: 0.0,
                    included_minutes: 0.0,
                },
            ),
        ]);

        Self {
            currency: "USD".into(),
            tax_rate: 0.10,
            airport_fee: 15.0,
            free_wait_minutes: 15.0,
            wait_per_minute: 0.75,
            pickup_hour_multipliers: HourMultipliers::from([
                (0, 1.10),
                (1, 1.10),
                (7, 1.15),
                (8, 1.15),
                (16, 1.15),
                (17, 1.20),
                (18, 1.20),
                (23, 1.10),
            ]),
            lead_time_multipliers: vec![
                LeadTimeBand {
                    max_hours: 2.0,
                    multiplier: 1.20,
                },
                LeadTimeBand {
                    max_hours: 6.0,
                    multiplier: 1.10,
                },
                LeadTimeBand {
                    max_hours: 24.0,
                    multiplier: 1.05,
                },
                LeadTimeBand {
                    max_hours: f64::INFINITY,
                    multiplier: 1.0,
                },
            ],
            vehicles,
            coupons: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../config/pricing.toml");

    #[test]
    fn default_config_is_valid() {
        PricingConfig::default().validate().unwrap();
    }

    #[test]
    fn shipped_toml_matches_builtin_rates() {
        let config = PricingConfig::from_toml_str(SHIPPED).unwrap();
        let default = PricingConfig::default();

        assert_eq!(config.currency, default.currency);
        assert_eq!(config.tax_rate, default.tax_rate);
        assert_eq!(config.vehicles, default.vehicles);
        assert_eq!(config.lead_time_multipliers, default.lead_time_multipliers);
        assert_eq!(config.pickup_hour_multipliers, default.pickup_hour_multipliers);
        assert_eq!(config.coupons.len(), 2);
    }

    #[test]
    fn unlisted_hours_default_to_one() {
        let config = PricingConfig::default();

        assert_eq!(config.pickup_hour_multipliers.get(17), 1.20);
        assert_eq!(config.pickup_hour_multipliers.get(11), 1.0);
    }

    #[test]
    fn first_matching_band_wins() {
        let config = PricingConfig::default();

        assert_eq!(config.lead_time_band(0.0).unwrap().multiplier, 1.20);
        assert_eq!(config.lead_time_band(2.0).unwrap().multiplier, 1.20);
        assert_eq!(config.lead_time_band(2.5).unwrap().multiplier, 1.10);
        assert_eq!(config.lead_time_band(10_000.0).unwrap().multiplier, 1.0);
    }

    #[test]
    fn rejects_bands_without_catch_all() {
        let mut config = PricingConfig::default();
        config.lead_time_multipliers.pop();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_unsorted_bands() {
        let mut config = PricingConfig::default();
        config.lead_time_multipliers.swap(0, 1);

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let source = SHIPPED.replacen("hour = 17", "hour = 24", 1);

        let err = PricingConfig::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_empty_vehicle_table() {
        let mut config = PricingConfig::default();
        config.vehicles.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PricingConfig::load("/nonexistent/pricing.toml").unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
    }
}
