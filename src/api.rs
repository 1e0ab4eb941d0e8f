use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Estimate, FareRequest, FareResult, PricingConfig, TariffWindow};
use crate::error::Error;

pub trait FareAPI {
    fn pricing(&self) -> &PricingConfig;

    fn calculate_fare(&self, request: &FareRequest) -> Result<FareResult, Error>;

    fn find_tariff(&self, at: &DateTime<FixedOffset>) -> Result<TariffWindow, Error>;
}

/// Trip to be priced from coordinates. Vehicle type stays a string so an unknown class
/// surfaces as a validation error rather than a body rejection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    #[serde(default)]
    pub stops: Vec<Coordinates>,
    pub passenger_count: i64,
    pub pickup_time: Option<DateTime<FixedOffset>>,
    pub vehicle_type: String,
    pub return_pickup_time: Option<DateTime<FixedOffset>>,
}

#[async_trait]
pub trait EstimateAPI {
    async fn create_estimate(&self, request: EstimateRequest) -> Result<Estimate, Error>;
}

pub trait API: FareAPI + EstimateAPI {}
