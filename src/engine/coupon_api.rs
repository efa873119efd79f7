use super::Engine;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{api::CouponAPI, error::Error, pricing::CouponApplication};

#[async_trait]
impl CouponAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn validate_coupon(
        &self,
        code: String,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<CouponApplication, Error> {
        crate::pricing::validate_coupon(&self.pricing.coupons, &code, amount, now).map_err(|err| {
            tracing::warn!("rejected coupon: {}", err);
            err.into()
        })
    }
}
