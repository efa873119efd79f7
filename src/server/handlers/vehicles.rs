use axum::extract::{Extension, Json};

use crate::entities::VehicleSummary;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<VehicleSummary>>, Error> {
    let vehicles = api.list_vehicles().await?;

    Ok(vehicles.into())
}
