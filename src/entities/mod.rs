mod estimate;
mod fare;
mod location;
mod money;
mod pricing;
mod tariff;
mod tariff_table;
mod vehicle;

pub use estimate::{Estimate, EstimateLeg};
pub use fare::{FareBreakdown, FareRequest, FareResult};
pub use location::{Coordinates, RouteMetrics};
pub use money::{div_round_half_up, Money};
pub use pricing::{Capacity, DistanceUnit, MultiseaterAdjustment, PricingConfig};
pub use tariff::{day_number, TariffWindow, TimeOfDay, MINUTES_PER_DAY};
pub use tariff_table::{week_minute_of, TariffTable, WeekMinute};
pub use vehicle::VehicleClass;
