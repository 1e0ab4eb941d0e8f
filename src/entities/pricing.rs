use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::entities::{Money, TariffTable, TariffWindow, TimeOfDay, VehicleClass};
use crate::error::{configuration_error, Error};

/// Upper bound for any configured amount, 1,000,000.00 in major units.
const MAX_RATE: Money = Money::from_minor(100_000_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Mile,
    Kilometer,
}

impl DistanceUnit {
    /// Length of one unit in millimetres, exact for both units.
    pub fn millimeters(&self) -> i128 {
        match self {
            Self::Mile => 1_609_344,
            Self::Kilometer => 1_000_000,
        }
    }
}

/// Adjustment applied to the tariff subtotal for multi-seater vehicles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiseaterAdjustment {
    /// 150 charges one and a half times the subtotal.
    pub multiplier_percent: u32,
    #[serde(default)]
    pub flat_surcharge: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub standard: u32,
    pub multiseater: u32,
    pub luxury: u32,
}

impl Capacity {
    pub fn of(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::Standard => self.standard,
            VehicleClass::Multiseater => self.multiseater,
            VehicleClass::Luxury => self.luxury,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            standard: 4,
            multiseater: 8,
            luxury: 4,
        }
    }
}

/// Immutable pricing configuration shared by every fare calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency: String,
    pub distance_unit: DistanceUnit,
    /// IANA zone of the operating area, e.g. `Europe/London`. Tariff windows are matched
    /// against wall-clock time in this zone, daylight saving included.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    pub luxury_hourly_rate: Money,
    pub multiseater: MultiseaterAdjustment,
    #[serde(default)]
    pub capacity: Capacity,
    pub tariffs: TariffTable,
}

impl PricingConfig {
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Current instant, carrying the operating zone's offset in effect right now.
    pub fn now(&self) -> DateTime<FixedOffset> {
        let local = Utc::now().with_timezone(&self.timezone);

        local.with_timezone(&local.offset().fix())
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.currency.trim().is_empty() {
            return Err(configuration_error("currency must be set"));
        }

        if self.luxury_hourly_rate.is_negative() {
            return Err(configuration_error("luxury_hourly_rate must not be negative"));
        }

        if self.luxury_hourly_rate > MAX_RATE {
            return Err(configuration_error(format!(
                "luxury_hourly_rate must not exceed {}",
                MAX_RATE
            )));
        }

        if self.multiseater.multiplier_percent < 100 {
            return Err(configuration_error(
                "multiseater.multiplier_percent must be at least 100",
            ));
        }

        if self.multiseater.flat_surcharge.is_negative() {
            return Err(configuration_error(
                "multiseater.flat_surcharge must not be negative",
            ));
        }

        if self.multiseater.flat_surcharge > MAX_RATE {
            return Err(configuration_error(format!(
                "multiseater.flat_surcharge must not exceed {}",
                MAX_RATE
            )));
        }

        let capacity = &self.capacity;
        if capacity.standard == 0 || capacity.multiseater == 0 || capacity.luxury == 0 {
            return Err(configuration_error("vehicle capacities must be positive"));
        }

        if self.tariffs.is_empty() {
            return Err(configuration_error("at least one tariff window is required"));
        }

        for window in self.tariffs.windows() {
            validate_window(window)?;
        }

        let gaps = self.tariffs.coverage_gaps();
        if let Some(first) = gaps.first() {
            return Err(configuration_error(format!(
                "tariff windows leave {} minutes of the week uncovered, first at day {} {}",
                gaps.len(),
                first.day,
                first.time
            )));
        }

        let overlaps = self.tariffs.overlaps();
        if let Some(first) = overlaps.first() {
            tracing::warn!(
                minutes = overlaps.len(),
                day = first.day,
                time = %first.time,
                "tariff windows overlap, the earlier window takes precedence"
            );
        }

        Ok(())
    }
}

fn validate_window(window: &TariffWindow) -> Result<(), Error> {
    if window.name.trim().is_empty() {
        return Err(configuration_error("tariff window name must be set"));
    }

    if window.days_of_week.is_empty() {
        return Err(configuration_error(format!(
            "tariff window {:?} has no days",
            window.name
        )));
    }

    if let Some(day) = window.days_of_week.iter().find(|day| **day > 6) {
        return Err(configuration_error(format!(
            "tariff window {:?} has day {} outside 0-6",
            window.name, day
        )));
    }

    if window.base_fare.is_negative()
        || window.per_distance_unit.is_negative()
        || window.per_duration_unit.is_negative()
    {
        return Err(configuration_error(format!(
            "tariff window {:?} has a negative rate",
            window.name
        )));
    }

    if window.base_fare > MAX_RATE
        || window.per_distance_unit > MAX_RATE
        || window.per_duration_unit > MAX_RATE
    {
        return Err(configuration_error(format!(
            "tariff window {:?} has a rate above {}",
            window.name, MAX_RATE
        )));
    }

    Ok(())
}

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_window(
    name: &str,
    days: &[u8],
    start: (u16, u16),
    end: (u16, u16),
    rates: (i64, i64, i64),
) -> TariffWindow {
    TariffWindow {
        name: name.into(),
        days_of_week: days.iter().copied().collect(),
        start_time: TimeOfDay::new(start.0, start.1).unwrap_or(TimeOfDay::MIDNIGHT),
        end_time: TimeOfDay::new(end.0, end.1).unwrap_or(TimeOfDay::MIDNIGHT),
        base_fare: Money::from_minor(rates.0),
        per_distance_unit: Money::from_minor(rates.1),
        per_duration_unit: Money::from_minor(rates.2),
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let weekdays = [1, 2, 3, 4, 5];
        let weekend = [0, 6];
        let every_day = [0, 1, 2, 3, 4, 5, 6];

        Self {
            currency: "GBP".into(),
            distance_unit: DistanceUnit::Mile,
            timezone: chrono_tz::Europe::London,
            luxury_hourly_rate: Money::from_minor(6500),
            multiseater: MultiseaterAdjustment {
                multiplier_percent: 150,
                flat_surcharge: Money::ZERO,
            },
            capacity: Capacity::default(),
            tariffs: TariffTable::new(vec![
                default_window("Weekday Daytime", &weekdays, (6, 0), (20, 0), (350, 250, 30)),
                default_window("Weekday Evening", &weekdays, (20, 0), (23, 0), (400, 280, 35)),
                default_window("Weekend", &weekend, (6, 0), (23, 0), (450, 300, 35)),
                default_window("Night Rate", &every_day, (23, 0), (6, 0), (550, 340, 40)),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = PricingConfig::default();

        assert!(config.validate().is_ok());
        assert!(config.tariffs.coverage_gaps().is_empty());
        assert!(config.tariffs.overlaps().is_empty());
    }

    #[test]
    fn loads_json_configuration() {
        let json = r#"{
            "currency": "EUR",
            "distance_unit": "kilometer",
            "timezone": "Europe/Paris",
            "luxury_hourly_rate": 80.0,
            "multiseater": { "multiplier_percent": 125, "flat_surcharge": 2.5 },
            "tariffs": [
                {
                    "name": "Day",
                    "days_of_week": [0, 1, 2, 3, 4, 5, 6],
                    "start_time": "07:00",
                    "end_time": "22:00",
                    "base_fare": 4.0,
                    "per_distance_unit": 1.8,
                    "per_duration_unit": 0.25
                },
                {
                    "name": "Night",
                    "days_of_week": [0, 1, 2, 3, 4, 5, 6],
                    "start_time": "22:00",
                    "end_time": "07:00",
                    "base_fare": 5.0,
                    "per_distance_unit": 2.2,
                    "per_duration_unit": 0.3
                }
            ]
        }"#;

        let config = PricingConfig::from_json(json).unwrap();

        assert_eq!(config.distance_unit, DistanceUnit::Kilometer);
        assert_eq!(config.luxury_hourly_rate, Money::from_minor(8000));
        assert_eq!(config.multiseater.flat_surcharge, Money::from_minor(250));
        assert_eq!(config.capacity, Capacity::default());
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(config.tariffs.windows()[1].per_distance_unit, Money::from_minor(220));
    }

    #[test]
    fn example_file_matches_built_in_pricing() {
        let config = PricingConfig::from_json(include_str!("../../pricing.example.json")).unwrap();

        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn rejects_gaps() {
        let mut config = PricingConfig::default();
        config.tariffs = TariffTable::new(config.tariffs.windows()[..3].to_vec());

        let err = config.validate().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.message.contains("uncovered"));
    }

    #[test]
    fn rejects_out_of_range_day() {
        let mut config = PricingConfig::default();
        let mut windows = config.tariffs.windows().to_vec();
        windows[0].days_of_week.insert(7);
        config.tariffs = TariffTable::new(windows);

        assert!(config.validate().unwrap_err().message.contains("outside 0-6"));
    }

    #[test]
    fn rejects_discounting_multiplier() {
        let mut config = PricingConfig::default();
        config.multiseater.multiplier_percent = 90;

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = PricingConfig::from_json("{ \"currency\": ").unwrap_err();

        assert!(err.is_configuration_error());
    }

    #[test]
    fn accepts_overlaps() {
        let mut config = PricingConfig::default();
        let mut windows = config.tariffs.windows().to_vec();
        windows.push(default_window("Catch-all", &[0, 1, 2, 3, 4, 5, 6], (0, 0), (0, 0), (1, 1, 1)));
        config.tariffs = TariffTable::new(windows);

        assert!(config.validate().is_ok());
        assert!(!config.tariffs.overlaps().is_empty());
    }

    #[test]
    fn timezone_defaults_to_utc_when_omitted() {
        let mut value = serde_json::to_value(PricingConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("timezone");

        let config = PricingConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut value = serde_json::to_value(PricingConfig::default()).unwrap();
        value["timezone"] = "Mars/Olympus_Mons".into();

        let err = PricingConfig::from_json(&value.to_string()).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn rejects_rates_beyond_bound() {
        let mut config = PricingConfig::default();
        config.luxury_hourly_rate = Money::from_major(1e17).unwrap();
        assert!(config.validate().unwrap_err().message.contains("luxury_hourly_rate"));

        let mut config = PricingConfig::default();
        let mut windows = config.tariffs.windows().to_vec();
        windows[2].per_distance_unit = Money::from_minor(i64::MAX);
        config.tariffs = TariffTable::new(windows);
        assert!(config.validate().unwrap_err().message.contains("rate above"));
    }
}
