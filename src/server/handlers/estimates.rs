use axum::extract::{Extension, Json};

use crate::api::EstimateRequest;
use crate::entities::Estimate;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<EstimateRequest>,
) -> Result<Json<Estimate>, Error> {
    let estimate = api.create_estimate(params).await?;

    Ok(estimate.into())
}
