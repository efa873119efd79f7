use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ridefare::api::{CouponAPI, QuoteAPI, VehicleAPI};
use ridefare::engine::Engine;
use ridefare::entities::{QuoteRequest, TripSource};
use ridefare::pricing::PricingConfig;
use uuid::Uuid;

const PRICING: &str = include_str!("../config/pricing.toml");

fn engine() -> Engine {
    Engine::new(PricingConfig::from_toml_str(PRICING).unwrap()).unwrap()
}

fn quoted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()
}

fn request(vehicle: &str) -> QuoteRequest {
    QuoteRequest {
        vehicle: vehicle.into(),
        trip: TripSource::Measured {
            distance_km: 10.0,
            duration_min: 20.0,
        },
        // half an hour after quoted_at
        pickup_at: DateTime::parse_from_rfc3339("2026-10-15T17:30:00-07:00").unwrap(),
        quoted_at: Some(quoted_at()),
        wait_minutes: None,
        tolls: None,
        tip_percent: None,
        airport: false,
        coupon_code: None,
    }
}

#[test]
fn issues_and_finds_a_quote() {
    let engine = engine();

    tokio_test::block_on(async {
        let quote = engine.create_quote(request("sedan")).await.unwrap();

        assert_eq!(quote.lead_time_hours, 0.5);
        assert_eq!(quote.created_at, quoted_at());
        assert_eq!(quote.breakdown.total, 69.99);
        assert_eq!(quote.amount_due, 69.99);
        assert!(quote.coupon.is_none());

        let found = engine.find_quote(quote.token).await.unwrap();
        assert_eq!(found, quote);
    });
}

#[tokio::test]
async fn unknown_token_is_invalid_input() {
    let err = engine().find_quote(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(err.code, 101);
}

#[tokio::test]
async fn unknown_vehicle_issues_nothing() {
    let engine = engine();

    let err = engine.create_quote(request("limousine")).await.unwrap_err();

    assert_eq!(err.code, 102);
    assert_eq!(err.message, "unknown vehicle type: limousine");
}

#[tokio::test]
async fn coupon_reduces_amount_due() {
    let engine = engine();
    let mut request = request("sedan");
    request.coupon_code = Some("welcome10".into());

    let quote = engine.create_quote(request).await.unwrap();

    assert_eq!(quote.breakdown.total, 69.99);
    assert_eq!(quote.coupon.as_ref().unwrap().discount, 7.0);
    assert_eq!(quote.amount_due, 62.99);

    let receipt = quote.receipt();
    let last = receipt.items.last().unwrap();
    assert_eq!(last.label, "Amount due");
    assert_eq!(last.amount, Some(62.99));
    assert_eq!(receipt.total(), Some(69.99));
}

#[tokio::test]
async fn rejected_coupon_fails_the_quote() {
    let engine = engine();
    let mut request = request("sedan");
    request.coupon_code = Some("AIRPORT20".into());

    let err = engine.create_quote(request).await.unwrap_err();

    assert_eq!(err.code, 103);
    assert_eq!(err.message, "coupon AIRPORT20 requires a total of at least 75.00");
}

#[tokio::test]
async fn validates_coupons_directly() {
    let applied = engine()
        .validate_coupon("AIRPORT20".into(), 120.0, quoted_at())
        .await
        .unwrap();

    assert_eq!(applied.discount, 20.0);
    assert_eq!(applied.total, 100.0);
}

#[tokio::test]
async fn lists_vehicles_by_class() {
    let vehicles = engine().list_vehicles().await.unwrap();
    let classes: Vec<&str> = vehicles.iter().map(|v| v.class.as_str()).collect();

    assert_eq!(classes, vec!["sedan", "sprinter", "suv"]);
    assert_eq!(vehicles[0].display_name, "Sedan");
    assert_eq!(vehicles[0].min_fare, 40.0);
}

fn later_request(vehicle: &str, hours_after: i64) -> QuoteRequest {
    QuoteRequest {
        pickup_at: DateTime::parse_from_rfc3339("2026-10-20T10:00:00-04:00").unwrap(),
        quoted_at: Some(quoted_at() + Duration::hours(hours_after)),
        ..request(vehicle)
    }
}

#[tokio::test]
async fn quotes_older_than_ttl_are_evicted() {
    let config = PricingConfig::from_toml_str(PRICING).unwrap();
    let engine = Engine::with_quote_ttl(config, Duration::minutes(30)).unwrap();

    let stale = engine.create_quote(later_request("sedan", 0)).await.unwrap();
    let fresh = engine.create_quote(later_request("suv", 2)).await.unwrap();

    let err = engine.find_quote(stale.token).await.unwrap_err();
    assert_eq!(err.code, 101);

    let found = engine.find_quote(fresh.token).await.unwrap();
    assert_eq!(found, fresh);
}

#[tokio::test]
async fn quotes_past_pickup_are_evicted() {
    let engine = engine();

    // pickup is half an hour after quoted_at, well inside the default ttl
    let departed = engine.create_quote(request("sedan")).await.unwrap();
    let upcoming = engine.create_quote(later_request("sedan", 1)).await.unwrap();

    assert_eq!(engine.find_quote(departed.token).await.unwrap_err().code, 101);
    assert!(engine.find_quote(upcoming.token).await.is_ok());
}

#[test]
fn rejects_config_without_catch_all_band() {
    let mut config = PricingConfig::default();
    config.lead_time_multipliers.pop();

    let err = Engine::new(config).err().unwrap();

    assert_eq!(err.code, 2);
}

#[tokio::test]
async fn concurrent_quotes_are_all_stored() {
    let engine = Arc::new(engine());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let mut request = request("suv");
                request.tolls = Some(i as f64);
                engine.create_quote(request).await.unwrap()
            })
        })
        .collect();

    for handle in handles {
        let quote = handle.await.unwrap();
        let found = engine.find_quote(quote.token).await.unwrap();

        assert_eq!(found.breakdown.tolls, quote.breakdown.tolls);
    }
}
