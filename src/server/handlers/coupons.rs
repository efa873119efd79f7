use axum::extract::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pricing::CouponApplication;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ValidateParams {
    code: String,
    amount: f64,
}

pub async fn validate(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<ValidateParams>,
) -> Result<Json<CouponApplication>, Error> {
    let applied = api
        .validate_coupon(params.code, params.amount, Utc::now())
        .await?;

    Ok(applied.into())
}
