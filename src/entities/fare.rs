use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::{Money, TariffWindow, VehicleClass};

/// Trip metrics and context for a single fare calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareRequest {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    /// Signed so a negative count reaches validation instead of failing to parse.
    pub passenger_count: i64,
    #[serde(default)]
    pub is_return_leg: bool,
    pub ride_date_time: DateTime<FixedOffset>,
    pub vehicle_type: VehicleClass,
}

/// Itemised fare. Every component is already rounded to a whole minor unit and the
/// components add up to the fare exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base_fare: Money,
    pub distance_charge: Money,
    pub duration_charge: Money,
    pub surcharge: Money,
    pub hourly_charge: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billed_hours: Option<u32>,
}

impl FareBreakdown {
    /// Sum of every component, `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        [
            self.base_fare,
            self.distance_charge,
            self.duration_charge,
            self.surcharge,
            self.hourly_charge,
        ]
        .into_iter()
        .try_fold(Money::ZERO, Money::checked_add)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareResult {
    pub fare: Money,
    pub currency: String,
    /// Matched window, absent for luxury fares.
    pub tariff: Option<TariffWindow>,
    pub is_luxury: bool,
    pub is_multiseater: bool,
    pub is_return_leg: bool,
    pub breakdown: FareBreakdown,
}
