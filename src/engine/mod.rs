mod coupon_api;
mod quote_api;
mod route_api;
mod vehicle_api;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{api::API, entities::Quote, error::Error, pricing::PricingConfig};

pub const DEFAULT_QUOTE_TTL_MINUTES: i64 = 120;

pub struct Engine {
    pricing: PricingConfig,
    // quote service (in-memory KV store)
    quotes: RwLock<HashMap<Uuid, Quote>>,
    quote_ttl: Duration,
}

impl Engine {
    pub fn new(pricing: PricingConfig) -> Result<Self, Error> {
        Self::with_quote_ttl(pricing, Duration::minutes(DEFAULT_QUOTE_TTL_MINUTES))
    }

    #[tracing::instrument(name = "Engine::new", skip(pricing))]
    pub fn with_quote_ttl(pricing: PricingConfig, quote_ttl: Duration) -> Result<Self, Error> {
        pricing.validate()?;

        tracing::info!(
            currency = %pricing.currency,
            vehicles = pricing.vehicles.len(),
            "pricing engine ready"
        );

        Ok(Self {
            pricing,
            quotes: RwLock::new(HashMap::new()),
            quote_ttl,
        })
    }

    /// Store `quote`, dropping every quote that is older than the TTL or
    /// whose pickup has already passed as of `now`.
    async fn store_quote(&self, quote: Quote, now: DateTime<Utc>) {
        let mut quotes = self.quotes.write().await;
        let before = quotes.len();

        quotes.retain(|_, stored| {
            stored.created_at + self.quote_ttl > now && stored.pickup_at.with_timezone(&Utc) > now
        });

        let evicted = before - quotes.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired quotes");
        }

        quotes.insert(quote.token, quote);
    }
}

impl API for Engine {}
