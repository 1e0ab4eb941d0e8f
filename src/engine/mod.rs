mod estimate_api;
mod fare_api;

pub use fare_api::calculate_fare;

use std::sync::Arc;

use crate::{api::API, entities::PricingConfig, error::Error, external::Directions};

pub type DynDirections = Arc<dyn Directions + Send + Sync>;

pub struct Engine {
    pricing: Arc<PricingConfig>,
    directions: DynDirections,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(pricing: PricingConfig, directions: DynDirections) -> Result<Self, Error> {
        pricing.validate()?;

        tracing::info!(
            currency = pricing.currency.as_str(),
            windows = pricing.tariffs.windows().len(),
            timezone = pricing.timezone.name(),
            "pricing configuration loaded"
        );

        Ok(Self {
            pricing: Arc::new(pricing),
            directions,
        })
    }
}

impl API for Engine {}
