use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::RouteEstimate;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct EstimateParams {
    origin_place_id: String,
    destination_place_id: String,
}

pub async fn estimate(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<EstimateParams>,
) -> Result<Json<RouteEstimate>, Error> {
    let route = api
        .estimate_route(params.origin_place_id, params.destination_place_id)
        .await?;

    Ok(route.into())
}
