use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::round2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponError {
    #[error("unknown coupon code {0}")]
    UnknownCoupon(String),

    #[error("coupon {0} is no longer active")]
    InactiveCoupon(String),

    #[error("coupon {0} has expired")]
    ExpiredCoupon(String),

    #[error("coupon {code} requires a total of at least {min_total:.2}")]
    BelowMinimum { code: String, min_total: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    Percent(f64),
    Fixed(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub discount: Discount,
    #[serde(default)]
    pub min_total: f64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouponApplication {
    pub code: String,
    pub discount: f64,
    pub total: f64,
}

impl Coupon {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("coupon code is empty".into());
        }

        match self.discount {
            Discount::Percent(percent) if !(0.0..=100.0).contains(&percent) => Err(format!(
                "coupon {} percent must be between 0 and 100",
                self.code
            )),
            Discount::Fixed(amount) if !(amount >= 0.0) => {
                Err(format!("coupon {} amount must be non-negative", self.code))
            }
            _ => Ok(()),
        }
    }

    fn discount_on(&self, amount: f64) -> f64 {
        let discount = match self.discount {
            Discount::Percent(percent) => round2(percent / 100.0 * amount),
            Discount::Fixed(fixed) => round2(fixed),
        };

        discount.min(amount).max(0.0)
    }
}

/// Look up `code` (case-insensitively) and apply it to `amount`.
pub fn validate_coupon(
    coupons: &[Coupon],
    code: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> Result<CouponApplication, CouponError> {
    let coupon = coupons
        .iter()
        .find(|coupon| coupon.code.eq_ignore_ascii_case(code.trim()))
        .ok_or_else(|| CouponError::UnknownCoupon(code.to_string()))?;

    if !coupon.active {
        return Err(CouponError::InactiveCoupon(coupon.code.clone()));
    }

    if let Some(expires_at) = coupon.expires_at {
        if now >= expires_at {
            return Err(CouponError::ExpiredCoupon(coupon.code.clone()));
        }
    }

    if amount < coupon.min_total {
        return Err(CouponError::BelowMinimum {
            code: coupon.code.clone(),
            min_total: coupon.min_total,
        });
    }

    let discount = coupon.discount_on(amount);

    Ok(CouponApplication {
        code: coupon.code.clone(),
        discount,
        total: round2(amount - discount),
    })
}
