pub mod mapbox;

use async_trait::async_trait;

use crate::entities::{Coordinates, RouteMetrics};
use crate::error::Error;

/// Routing service returning the driven distance and duration through ordered waypoints.
#[async_trait]
pub trait Directions {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteMetrics, Error>;
}
