//! Fare calculation.
//!
//! [`compute_price`] turns a trip description into an itemized quote. It is a
//! pure function over a [`PricingConfig`]; every monetary step is rounded to
//! the cent as it is produced, so intermediate rounding is part of the result.

pub mod config;
pub mod coupon;
pub mod receipt;

use chrono::{DateTime, FixedOffset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, LeadTimeBand, PricingConfig, VehicleRate};
pub use coupon::{validate_coupon, Coupon, CouponApplication, CouponError, Discount};
pub use receipt::{LineItem, Receipt};

pub const MILES_PER_KM: f64 = 0.621371;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("unknown vehicle type: {0}")]
    UnknownVehicle(String),

    #[error("no lead time band covers {0} hours")]
    UncoveredLeadTime(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub vehicle: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub pickup_at: DateTime<FixedOffset>,
    pub lead_time_hours: f64,
    #[serde(default)]
    pub tolls: Option<f64>,
    #[serde(default)]
    pub wait_minutes: Option<f64>,
    #[serde(default)]
    pub tip_percent: Option<f64>,
    #[serde(default)]
    pub airport: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub currency: String,
    pub vehicle_name: String,
    pub base_fare: f64,
    pub distance_fee: f64,
    pub time_fee: f64,
    pub pickup_hour_multiplier: f64,
    pub lead_time_multiplier: f64,
    pub wait_fee: f64,
    pub tolls: f64,
    pub airport_fee: f64,
    pub subtotal_pre_tax: f64,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
    pub min_fare_applied: bool,
    pub notes: Vec<String>,
}

/// Round half away from zero to two decimal places.
///
/// The value is first scaled away from zero by one relative epsilon, so a
/// half cent stored one ulp short of its decimal (`10.075`, `2.675`) still
/// rounds up.
pub fn round2(value: f64) -> f64 {
    (value * (1.0 + f64::EPSILON) * 100.0).round() / 100.0
}

/// Hours from `quoted_at` until `pickup_at`, never negative.
pub fn lead_time_hours<Tz: TimeZone>(quoted_at: DateTime<Utc>, pickup_at: &DateTime<Tz>) -> f64 {
    let lead = pickup_at.with_timezone(&Utc) - quoted_at;

    (lead.num_seconds() as f64 / 3600.0).max(0.0)
}

pub fn compute_price(
    input: &PricingInput,
    config: &PricingConfig,
) -> Result<PricingBreakdown, PricingError> {
    let rate = config
        .vehicle(&input.vehicle)
        .ok_or_else(|| PricingError::UnknownVehicle(input.vehicle.clone()))?;

    let miles = input.distance_km * MILES_PER_KM;
    let billable_miles = (miles - rate.included_miles).max(0.0);
    let billable_minutes = (input.duration_min - rate.included_minutes).max(0.0);

    let distance_fee = round2(billable_miles * rate.per_mile);
    let time_fee = round2(billable_minutes * rate.per_minute);

    let pickup_hour_multiplier = config.pickup_hour_multipliers.get(input.pickup_at.hour());
    let lead_time_multiplier = config
        .lead_time_band(input.lead_time_hours)
        .ok_or(PricingError::UncoveredLeadTime(input.lead_time_hours))?
        .multiplier;

    let subtotal = rate.base_fare + distance_fee + time_fee;
    let subtotal = round2(subtotal * pickup_hour_multiplier * lead_time_multiplier);

    let extra_wait = (input.wait_minutes.unwrap_or(0.0) - config.free_wait_minutes).max(0.0);
    let wait_fee = round2(extra_wait * config.wait_per_minute);
    let tolls = round2(input.tolls.unwrap_or(0.0).max(0.0));
    let airport_fee = match input.airport {
        true => round2(config.airport_fee),
        false => 0.0,
    };

    // sums of cent amounts; rounding only strips float noise
    let mut subtotal_pre_tax = round2(subtotal + wait_fee + tolls + airport_fee);
    let min_fare_applied = subtotal_pre_tax < rate.min_fare;

    if min_fare_applied {
        subtotal_pre_tax = rate.min_fare;
    }

    let tax = round2(subtotal_pre_tax * config.tax_rate);
    let tip_percent = input.tip_percent.unwrap_or(0.0).max(0.0);
    let tip = round2(tip_percent / 100.0 * subtotal_pre_tax);
    let total = round2(subtotal_pre_tax + tax + tip);

    tracing::debug!(
        vehicle = %input.vehicle,
        pickup_hour_multiplier,
        lead_time_multiplier,
        min_fare_applied,
        total,
        "computed fare"
    );

    Ok(PricingBreakdown {
        currency: config.currency.clone(),
        vehicle_name: rate.display_name.clone(),
        base_fare: rate.base_fare,
        distance_fee,
        time_fee,
        pickup_hour_multiplier,
        lead_time_multiplier,
        wait_fee,
        tolls,
        airport_fee,
        subtotal_pre_tax,
        tax,
        tip,
        total,
        min_fare_applied,
        notes: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn sedan_trip() -> PricingInput {
        PricingInput {
            vehicle: "sedan".into(),
            distance_km: 10.0,
            duration_min: 20.0,
            pickup_at: pickup("2026-10-15T17:30:00-07:00"),
            lead_time_hours: 1.0,
            tolls: None,
            wait_minutes: None,
            tip_percent: None,
            airport: false,
        }
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(20.1945575), 20.19);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn half_cents_round_up_at_any_magnitude() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(10.075), 10.08);
        assert_eq!(round2(16.345), 16.35);
        assert_eq!(round2(-10.075), -10.08);
        assert_eq!(round2(10.074), 10.07);
    }

    #[test]
    fn evening_rush_sedan() {
        let breakdown = compute_price(&sedan_trip(), &PricingConfig::default()).unwrap();

        assert_eq!(breakdown.currency, "USD");
        assert_eq!(breakdown.vehicle_name, "Sedan");
        assert_eq!(breakdown.distance_fee, 20.19);
        assert_eq!(breakdown.time_fee, 14.0);
        assert_eq!(breakdown.pickup_hour_multiplier, 1.20);
        assert_eq!(breakdown.lead_time_multiplier, 1.20);
        assert_eq!(breakdown.subtotal_pre_tax, 63.63);
        assert_eq!(breakdown.tax, 6.36);
        assert_eq!(breakdown.tip, 0.0);
        assert_eq!(breakdown.total, 69.99);
        assert!(!breakdown.min_fare_applied);
        assert!(breakdown.notes.is_empty());
    }

    #[test]
    fn hour_comes_from_pickup_offset() {
        // 17:30 in Los Angeles is 00:30 UTC the next day
        let mut input = sedan_trip();
        input.pickup_at = pickup("2026-10-16T00:30:00+00:00");

        let breakdown = compute_price(&input, &PricingConfig::default()).unwrap();

        assert_eq!(breakdown.pickup_hour_multiplier, 1.10);
    }

    #[test]
    fn unknown_vehicle() {
        let mut input = sedan_trip();
        input.vehicle = "limousine".into();

        assert_eq!(
            compute_price(&input, &PricingConfig::default()),
            Err(PricingError::UnknownVehicle("limousine".into()))
        );
    }

    #[test]
    fn uncovered_lead_time_fails_loudly() {
        let mut config = PricingConfig::default();
        config.lead_time_multipliers.truncate(1);

        let mut input = sedan_trip();
        input.lead_time_hours = 5.0;

        assert_eq!(
            compute_price(&input, &config),
            Err(PricingError::UncoveredLeadTime(5.0))
        );
    }

    #[test]
    fn included_bundle_is_free() {
        let mut config = PricingConfig::default();
        let sedan = config.vehicles.get_mut("sedan").unwrap();
        sedan.included_miles = 5.0;
        sedan.included_minutes = 30.0;

        let breakdown = compute_price(&sedan_trip(), &config).unwrap();

        // 1.21371 billable miles, no billable minutes
        assert_eq!(breakdown.distance_fee, 3.94);
        assert_eq!(breakdown.time_fee, 0.0);
    }

    #[test]
    fn negative_extras_are_clamped() {
        let mut input = sedan_trip();
        input.distance_km = -4.0;
        input.wait_minutes = Some(-30.0);
        input.tolls = Some(-3.0);
        input.tip_percent = Some(-15.0);

        let breakdown = compute_price(&input, &PricingConfig::default()).unwrap();

        assert_eq!(breakdown.distance_fee, 0.0);
        assert_eq!(breakdown.wait_fee, 0.0);
        assert_eq!(breakdown.tolls, 0.0);
        assert_eq!(breakdown.tip, 0.0);
    }

    #[test]
    fn negative_lead_time_uses_first_band() {
        let mut input = sedan_trip();
        input.lead_time_hours = -3.0;

        let breakdown = compute_price(&input, &PricingConfig::default()).unwrap();

        assert_eq!(breakdown.lead_time_multiplier, 1.20);
    }

    #[test]
    fn lead_time_between_timestamps() {
        let quoted_at = Utc.with_ymd_and_hms(2026, 10, 15, 22, 0, 0).unwrap();

        assert_eq!(
            lead_time_hours(quoted_at, &pickup("2026-10-15T17:30:00-07:00")),
            2.5
        );
        assert_eq!(
            lead_time_hours(quoted_at, &pickup("2026-10-15T12:00:00-07:00")),
            0.0
        );
    }
}
