use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::entities::{Quote, QuoteRequest};
use crate::error::Error;
use crate::pricing::Receipt;
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<QuoteRequest>,
) -> Result<Json<Quote>, Error> {
    let quote = api.create_quote(params).await?;

    Ok(quote.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Quote>, Error> {
    let quote = api.find_quote(token).await?;

    Ok(quote.into())
}

pub async fn receipt(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Receipt>, Error> {
    let quote = api.find_quote(token).await?;

    Ok(quote.receipt().into())
}
