use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{RouteEstimate, TripSource};
use crate::pricing::{CouponApplication, PricingBreakdown, Receipt};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub vehicle: String,
    pub trip: TripSource,
    pub pickup_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub quoted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wait_minutes: Option<f64>,
    #[serde(default)]
    pub tolls: Option<f64>,
    #[serde(default)]
    pub tip_percent: Option<f64>,
    #[serde(default)]
    pub airport: bool,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    pub vehicle: String,
    pub pickup_at: DateTime<FixedOffset>,
    pub lead_time_hours: f64,
    pub route: RouteEstimate,
    pub breakdown: PricingBreakdown,
    pub coupon: Option<CouponApplication>,
    pub amount_due: f64,
}

impl Quote {
    pub fn new(
        vehicle: String,
        pickup_at: DateTime<FixedOffset>,
        created_at: DateTime<Utc>,
        lead_time_hours: f64,
        route: RouteEstimate,
        breakdown: PricingBreakdown,
        coupon: Option<CouponApplication>,
    ) -> Self {
        let amount_due = match &coupon {
            Some(applied) => applied.total,
            None => breakdown.total,
        };

        Self {
            token: Uuid::new_v4(),
            created_at,
            vehicle,
            pickup_at,
            lead_time_hours,
            route,
            breakdown,
            coupon,
            amount_due,
        }
    }

    pub fn receipt(&self) -> Receipt {
        let mut receipt = Receipt::from_breakdown(&self.breakdown);

        if let Some(applied) = &self.coupon {
            receipt.push_discount(&applied.code, applied.discount, self.amount_due);
        }

        receipt
    }
}
