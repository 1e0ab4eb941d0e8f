use axum::extract::{Extension, Json};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::{FareRequest, FareResult, VehicleClass};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    distance: f64,
    duration: f64,
    passenger_count: i64,
    #[serde(default)]
    is_return_leg: bool,
    ride_date_time: Option<DateTime<FixedOffset>>,
    vehicle_type: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<FareResult>, Error> {
    let vehicle_type: VehicleClass = params.vehicle_type.parse()?;
    let ride_date_time = params
        .ride_date_time
        .unwrap_or_else(|| api.pricing().now());

    let request = FareRequest {
        distance: params.distance,
        duration: params.duration,
        passenger_count: params.passenger_count,
        is_return_leg: params.is_return_leg,
        ride_date_time,
        vehicle_type,
    };

    let fare = api.calculate_fare(&request)?;

    Ok(fare.into())
}
