use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{CouponAPI, QuoteAPI, RouteAPI},
    entities::{Quote, QuoteRequest, RouteEstimate, TripSource},
    error::{invalid_input_error, Error},
    pricing::{compute_price, lead_time_hours, PricingInput},
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_quote(&self, request: QuoteRequest) -> Result<Quote, Error> {
        let route = match request.trip {
            TripSource::Measured {
                distance_km,
                duration_min,
            } => RouteEstimate::new(distance_km, duration_min),
            TripSource::GooglePlaces {
                origin_place_id,
                destination_place_id,
            } => {
                self.estimate_route(origin_place_id, destination_place_id)
                    .await?
            }
        };

        let quoted_at = request.quoted_at.unwrap_or_else(Utc::now);
        let lead_time_hours = lead_time_hours(quoted_at, &request.pickup_at);

        let input = PricingInput {
            vehicle: request.vehicle,
            distance_km: route.distance_km,
            duration_min: route.duration_min,
            pickup_at: request.pickup_at,
            lead_time_hours,
            tolls: request.tolls,
            wait_minutes: request.wait_minutes,
            tip_percent: request.tip_percent,
            airport: request.airport,
        };

        let breakdown = compute_price(&input, &self.pricing)?;

        let coupon = match request.coupon_code {
            Some(code) => Some(
                self.validate_coupon(code, breakdown.total, quoted_at)
                    .await?,
            ),
            None => None,
        };

        let quote = Quote::new(
            input.vehicle,
            input.pickup_at,
            quoted_at,
            lead_time_hours,
            route,
            breakdown,
            coupon,
        );

        self.store_quote(quote.clone(), quoted_at).await;

        tracing::info!(token = %quote.token, amount_due = quote.amount_due, "issued quote");

        Ok(quote)
    }

    #[tracing::instrument(skip(self))]
    async fn find_quote(&self, token: Uuid) -> Result<Quote, Error> {
        let quotes = self.quotes.read().await;

        let quote = quotes.get(&token).ok_or_else(|| invalid_input_error())?;

        Ok(quote.clone())
    }
}
