use axum::extract::{Extension, Json, Query};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::TariffWindow;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CurrentParams {
    at: Option<DateTime<FixedOffset>>,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<TariffWindow>> {
    api.pricing().tariffs.windows().to_vec().into()
}

pub async fn current(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<CurrentParams>,
) -> Result<Json<TariffWindow>, Error> {
    let at = params
        .at
        .unwrap_or_else(|| api.pricing().now());

    let window = api.find_tariff(&at)?;

    Ok(window.into())
}
