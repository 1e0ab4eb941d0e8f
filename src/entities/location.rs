use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks the pair is a real position, reporting `field` on failure.
    pub fn validate(&self, field: &str) -> Result<(), Error> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(validation_error(field, "latitude must be between -90 and 90"));
        }

        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(validation_error(
                field,
                "longitude must be between -180 and 180",
            ));
        }

        Ok(())
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.longitude, coordinates.latitude)
    }
}

/// Distance and duration of a driven path as reported by the routing service.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}
