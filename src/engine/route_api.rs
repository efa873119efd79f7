use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteAPI, entities::RouteEstimate, error::Error, external::google_maps,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn estimate_route(
        &self,
        origin_place_id: String,
        destination_place_id: String,
    ) -> Result<RouteEstimate, Error> {
        google_maps::estimate_route(origin_place_id, destination_place_id).await
    }
}
