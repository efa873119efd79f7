use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Quote, QuoteRequest, RouteEstimate, VehicleSummary};
use crate::error::Error;
use crate::pricing::CouponApplication;

#[async_trait]
pub trait QuoteAPI {
    async fn create_quote(&self, request: QuoteRequest) -> Result<Quote, Error>;
    async fn find_quote(&self, token: Uuid) -> Result<Quote, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn estimate_route(
        &self,
        origin_place_id: String,
        destination_place_id: String,
    ) -> Result<RouteEstimate, Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn list_vehicles(&self) -> Result<Vec<VehicleSummary>, Error>;
}

#[async_trait]
pub trait CouponAPI {
    async fn validate_coupon(
        &self,
        code: String,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<CouponApplication, Error>;
}

pub trait API: QuoteAPI + RouteAPI + VehicleAPI + CouponAPI {}
