use serde::{Deserialize, Serialize};
use std::env;

use crate::{
    entities::RouteEstimate,
    error::{invalid_input_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Measure {
    value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Element {
    status: String,
    distance: Option<Measure>,
    duration: Option<Measure>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Row {
    elements: Vec<Element>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    rows: Vec<Row>,
}

#[tracing::instrument]
pub async fn estimate_route(
    origin_place_id: String,
    destination_place_id: String,
) -> Result<RouteEstimate, Error> {
    let api_base = env::var("GOOGLE_MAPS_API_BASE")?;
    let url = format!("https://{}/maps/api/distancematrix/json", api_base);
    let key = env::var("GOOGLE_MAPS_API_KEY")?;

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("key", key)])
        .query(&[("origins", format!("place_id:{}", origin_place_id))])
        .query(&[("destinations", format!("place_id:{}", destination_place_id))])
        .query(&[("units", "metric")])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        tracing::warn!("distance matrix returned http {}", status_code);
        return Err(upstream_error());
    }

    let data: Response = res.json().await?;

    route_from_response(data)
}

fn route_from_response(data: Response) -> Result<RouteEstimate, Error> {
    if data.status != "OK" {
        tracing::warn!("distance matrix status {}", data.status);
        return Err(upstream_error());
    }

    let element = data
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| upstream_error())?;

    // NOT_FOUND / ZERO_RESULTS mean the places themselves are unusable
    if element.status != "OK" {
        return Err(invalid_input_error());
    }

    let meters = element.distance.ok_or_else(|| upstream_error())?.value;
    let seconds = element.duration.ok_or_else(|| upstream_error())?.value;

    Ok(RouteEstimate::new(meters / 1000.0, seconds / 60.0))
}
