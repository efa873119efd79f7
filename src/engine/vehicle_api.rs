use super::Engine;

use async_trait::async_trait;

use crate::{api::VehicleAPI, entities::VehicleSummary, error::Error};

#[async_trait]
impl VehicleAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<VehicleSummary>, Error> {
        let vehicles = self
            .pricing
            .vehicles
            .iter()
            .map(|(class, rate)| VehicleSummary::new(class, rate))
            .collect();

        Ok(vehicles)
    }
}
