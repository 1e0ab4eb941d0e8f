use super::Engine;

use chrono::{DateTime, FixedOffset};

use crate::{
    api::FareAPI,
    entities::{
        div_round_half_up, FareBreakdown, FareRequest, FareResult, Money, PricingConfig,
        TariffWindow, VehicleClass,
    },
    error::{configuration_error, validation_error, Error},
};

const MAX_DISTANCE_METERS: f64 = 10_000_000.0;
const MAX_DURATION_SECONDS: f64 = 10_000_000.0;
const MILLIS_PER_MINUTE: i128 = 60_000;
const MILLIS_PER_HOUR: i128 = 3_600_000;

impl FareAPI for Engine {
    fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    #[tracing::instrument(skip(self))]
    fn calculate_fare(&self, request: &FareRequest) -> Result<FareResult, Error> {
        calculate_fare(&self.pricing, request)
    }

    #[tracing::instrument(skip(self))]
    fn find_tariff(&self, at: &DateTime<FixedOffset>) -> Result<TariffWindow, Error> {
        let window = self.pricing.tariffs.find_tariff(at, &self.pricing.timezone)?;

        Ok(window.clone())
    }
}

/// Prices a trip against `pricing`.
///
/// Distance and duration are converted to whole millimetres and milliseconds, and every
/// charge is rounded half up to a whole minor unit on its own. The fare is the sum of those
/// rounded charges, so the breakdown always adds up to it exactly. A charge too large for
/// `Money` is a configuration error.
pub fn calculate_fare(pricing: &PricingConfig, request: &FareRequest) -> Result<FareResult, Error> {
    validate(pricing, request)?;

    let duration_ms = (request.duration * 1000.0).round() as i128;

    if request.vehicle_type == VehicleClass::Luxury {
        let hours = ((duration_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR).max(1);
        let breakdown = FareBreakdown {
            hourly_charge: minor_units(pricing.luxury_hourly_rate.minor() as i128 * hours)?,
            billed_hours: Some(hours as u32),
            ..FareBreakdown::default()
        };
        let fare = breakdown.total().ok_or_else(fare_overflow)?;

        tracing::debug!(hours = hours as u64, fare = %fare, "luxury fare calculated");

        return Ok(FareResult {
            fare,
            currency: pricing.currency.clone(),
            tariff: None,
            is_luxury: true,
            is_multiseater: false,
            is_return_leg: request.is_return_leg,
            breakdown,
        });
    }

    let tariff = pricing
        .tariffs
        .find_tariff(&request.ride_date_time, &pricing.timezone)?;

    let distance_mm = (request.distance * 1000.0).round() as i128;

    let distance_charge = div_round_half_up(
        tariff.per_distance_unit.minor() as i128 * distance_mm,
        pricing.distance_unit.millimeters(),
    );
    let duration_charge = div_round_half_up(
        tariff.per_duration_unit.minor() as i128 * duration_ms,
        MILLIS_PER_MINUTE,
    );

    let mut breakdown = FareBreakdown {
        base_fare: tariff.base_fare,
        distance_charge: minor_units(distance_charge)?,
        duration_charge: minor_units(duration_charge)?,
        ..FareBreakdown::default()
    };

    let is_multiseater = request.vehicle_type == VehicleClass::Multiseater;

    if is_multiseater {
        let adjustment = &pricing.multiseater;
        let subtotal = tariff.base_fare.minor() as i128 + distance_charge + duration_charge;
        let uplift = div_round_half_up(
            subtotal * (adjustment.multiplier_percent as i128 - 100),
            100,
        );

        breakdown.surcharge = minor_units(uplift + adjustment.flat_surcharge.minor() as i128)?;
    }

    let fare = breakdown.total().ok_or_else(fare_overflow)?;

    tracing::debug!(
        tariff = tariff.name.as_str(),
        vehicle_type = %request.vehicle_type,
        fare = %fare,
        "fare calculated"
    );

    Ok(FareResult {
        fare,
        currency: pricing.currency.clone(),
        tariff: Some(tariff.clone()),
        is_luxury: false,
        is_multiseater,
        is_return_leg: request.is_return_leg,
        breakdown,
    })
}

fn fare_overflow() -> Error {
    configuration_error("fare exceeds the representable amount, check the configured rates")
}

fn minor_units(amount: i128) -> Result<Money, Error> {
    i64::try_from(amount)
        .map(Money::from_minor)
        .map_err(|_| fare_overflow())
}

fn validate(pricing: &PricingConfig, request: &FareRequest) -> Result<(), Error> {
    if !request.distance.is_finite() || request.distance < 0.0 {
        return Err(validation_error("distance", "must be a non-negative number of meters"));
    }

    if request.distance > MAX_DISTANCE_METERS {
        return Err(validation_error("distance", "is out of range"));
    }

    if !request.duration.is_finite() || request.duration < 0.0 {
        return Err(validation_error("duration", "must be a non-negative number of seconds"));
    }

    if request.duration > MAX_DURATION_SECONDS {
        return Err(validation_error("duration", "is out of range"));
    }

    validate_passengers(pricing, request.passenger_count, request.vehicle_type)
}

pub(super) fn validate_passengers(
    pricing: &PricingConfig,
    passenger_count: i64,
    vehicle_type: VehicleClass,
) -> Result<(), Error> {
    if passenger_count < 1 {
        return Err(validation_error("passenger_count", "must be at least 1"));
    }

    let capacity = pricing.capacity.of(vehicle_type);
    if passenger_count > i64::from(capacity) {
        return Err(validation_error(
            "passenger_count",
            &format!(
                "a {} vehicle seats at most {} passengers",
                vehicle_type, capacity
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TariffTable;
    use chrono::{NaiveDate, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .unwrap()
    }

    // 2024-01-01 was a Monday, 2024-01-06 a Saturday
    fn monday_afternoon() -> DateTime<FixedOffset> {
        at(2024, 1, 1, 14, 0)
    }

    fn request(distance: f64, duration: f64, vehicle_type: VehicleClass) -> FareRequest {
        FareRequest {
            distance,
            duration,
            passenger_count: 2,
            is_return_leg: false,
            ride_date_time: monday_afternoon(),
            vehicle_type,
        }
    }

    #[test]
    fn standard_fare_uses_weekday_daytime_tariff() {
        let pricing = PricingConfig::default();
        let result = calculate_fare(&pricing, &request(8047.0, 900.0, VehicleClass::Standard)).unwrap();

        let tariff = result.tariff.clone().unwrap();
        assert_eq!(tariff.name, "Weekday Daytime");

        let expected = tariff.base_fare.minor()
            + tariff.per_distance_unit.minor() * 5
            + tariff.per_duration_unit.minor() * 15;
        assert_eq!(result.fare, Money::from_minor(expected));
        assert_eq!(result.fare, Money::from_minor(2050));
        assert_eq!(result.breakdown.total(), Some(result.fare));
        assert!(!result.is_luxury);
        assert!(!result.is_multiseater);
    }

    #[test]
    fn saturday_late_evening_uses_night_tariff() {
        let pricing = PricingConfig::default();
        let weekday = calculate_fare(&pricing, &request(8047.0, 900.0, VehicleClass::Standard)).unwrap();

        let mut late = request(8047.0, 900.0, VehicleClass::Standard);
        late.ride_date_time = at(2024, 1, 6, 23, 30);
        let night = calculate_fare(&pricing, &late).unwrap();

        assert_eq!(night.tariff.as_ref().unwrap().name, "Night Rate");
        assert_eq!(night.fare, Money::from_minor(550 + 5 * 340 + 15 * 40));
        assert!(night.fare > weekday.fare);
    }

    #[test]
    fn tariff_is_selected_in_operational_time() {
        let mut pricing = PricingConfig::default();
        pricing.timezone = chrono_tz::Europe::Helsinki;

        // 21:30 UTC on a Monday in January is 23:30 in Helsinki
        let mut late = request(1000.0, 60.0, VehicleClass::Standard);
        late.ride_date_time = at(2024, 1, 1, 21, 30);

        let result = calculate_fare(&pricing, &late).unwrap();
        assert_eq!(result.tariff.unwrap().name, "Night Rate");
    }

    #[test]
    fn zero_trip_costs_base_fare() {
        let pricing = PricingConfig::default();
        let result = calculate_fare(&pricing, &request(0.0, 0.0, VehicleClass::Standard)).unwrap();

        assert_eq!(result.fare, Money::from_minor(350));
        assert_eq!(result.breakdown.distance_charge, Money::ZERO);
        assert_eq!(result.breakdown.duration_charge, Money::ZERO);
    }

    #[test]
    fn luxury_bills_minimum_hour() {
        let pricing = PricingConfig::default();
        let result = calculate_fare(&pricing, &request(20_000.0, 1800.0, VehicleClass::Luxury)).unwrap();

        assert_eq!(result.fare, pricing.luxury_hourly_rate);
        assert!(result.is_luxury);
        assert!(result.tariff.is_none());
        assert_eq!(result.breakdown.billed_hours, Some(1));
    }

    #[test]
    fn luxury_rounds_up_to_next_hour() {
        let pricing = PricingConfig::default();

        let result = calculate_fare(&pricing, &request(0.0, 5400.0, VehicleClass::Luxury)).unwrap();
        assert_eq!(result.fare, Money::from_minor(pricing.luxury_hourly_rate.minor() * 2));

        let result = calculate_fare(&pricing, &request(0.0, 3600.0, VehicleClass::Luxury)).unwrap();
        assert_eq!(result.fare, pricing.luxury_hourly_rate);

        let result = calculate_fare(&pricing, &request(0.0, 3601.0, VehicleClass::Luxury)).unwrap();
        assert_eq!(result.fare, Money::from_minor(pricing.luxury_hourly_rate.minor() * 2));

        let result = calculate_fare(&pricing, &request(0.0, 0.0, VehicleClass::Luxury)).unwrap();
        assert_eq!(result.fare, pricing.luxury_hourly_rate);
    }

    #[test]
    fn multiseater_adjustment_applies_after_tariff() {
        let mut pricing = PricingConfig::default();
        pricing.multiseater.flat_surcharge = Money::from_minor(200);

        let mut trip = request(8047.0, 900.0, VehicleClass::Multiseater);
        trip.passenger_count = 6;
        let result = calculate_fare(&pricing, &trip).unwrap();

        // subtotal 20.50, +50% = 10.25, + 2.00 flat
        assert_eq!(result.breakdown.surcharge, Money::from_minor(1025 + 200));
        assert_eq!(result.fare, Money::from_minor(3275));
        assert!(result.is_multiseater);
    }

    #[test]
    fn charges_round_half_up() {
        let mut pricing = PricingConfig::default();
        pricing.distance_unit = crate::entities::DistanceUnit::Kilometer;

        // 250 per km over 1.002 km is 250.5, 30 per minute over 1 s is 0.5
        let result = calculate_fare(&pricing, &request(1002.0, 1.0, VehicleClass::Standard)).unwrap();

        assert_eq!(result.breakdown.distance_charge, Money::from_minor(251));
        assert_eq!(result.breakdown.duration_charge, Money::from_minor(1));
        assert_eq!(result.breakdown.total(), Some(result.fare));
    }

    #[test]
    fn negative_distance_is_rejected() {
        let pricing = PricingConfig::default();
        let err = calculate_fare(&pricing, &request(-1.0, 900.0, VehicleClass::Standard)).unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(err.field.as_deref(), Some("distance"));
    }

    #[test]
    fn negative_duration_is_rejected_for_every_class() {
        let pricing = PricingConfig::default();

        for class in [VehicleClass::Standard, VehicleClass::Multiseater, VehicleClass::Luxury] {
            let err = calculate_fare(&pricing, &request(100.0, -0.5, class)).unwrap_err();
            assert_eq!(err.field.as_deref(), Some("duration"));
        }
    }

    #[test]
    fn non_finite_metrics_are_rejected() {
        let pricing = PricingConfig::default();

        let err = calculate_fare(&pricing, &request(f64::NAN, 0.0, VehicleClass::Standard)).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("distance"));

        let err = calculate_fare(&pricing, &request(0.0, f64::INFINITY, VehicleClass::Standard)).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("duration"));
    }

    #[test]
    fn passenger_count_is_validated() {
        let pricing = PricingConfig::default();

        let mut trip = request(100.0, 60.0, VehicleClass::Standard);
        trip.passenger_count = 0;
        let err = calculate_fare(&pricing, &trip).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("passenger_count"));

        trip.passenger_count = -2;
        let err = calculate_fare(&pricing, &trip).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.field.as_deref(), Some("passenger_count"));

        trip.passenger_count = 5;
        let err = calculate_fare(&pricing, &trip).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("passenger_count"));

        trip.vehicle_type = VehicleClass::Multiseater;
        assert!(calculate_fare(&pricing, &trip).is_ok());
    }

    #[test]
    fn uncovered_time_is_configuration_error() {
        let mut pricing = PricingConfig::default();
        let weekday_only: Vec<_> = pricing.tariffs.windows()[..2].to_vec();
        pricing.tariffs = TariffTable::new(weekday_only);

        let mut trip = request(100.0, 60.0, VehicleClass::Standard);
        trip.ride_date_time = at(2024, 1, 6, 12, 0);

        let err = calculate_fare(&pricing, &trip).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn luxury_ignores_tariff_table() {
        let mut pricing = PricingConfig::default();
        pricing.tariffs = TariffTable::new(vec![]);

        let result = calculate_fare(&pricing, &request(100.0, 60.0, VehicleClass::Luxury)).unwrap();
        assert!(result.tariff.is_none());
    }

    #[test]
    fn return_leg_flag_is_carried_through() {
        let pricing = PricingConfig::default();
        let mut trip = request(8047.0, 900.0, VehicleClass::Standard);
        let outbound = calculate_fare(&pricing, &trip).unwrap();

        trip.is_return_leg = true;
        let inbound = calculate_fare(&pricing, &trip).unwrap();

        assert!(inbound.is_return_leg);
        assert_eq!(inbound.fare, outbound.fare);
    }

    #[test]
    fn boundary_minutes_switch_tariff() {
        let pricing = PricingConfig::default();
        let cases = [
            (at(2024, 1, 1, 5, 59), "Night Rate"),
            (at(2024, 1, 1, 6, 0), "Weekday Daytime"),
            (at(2024, 1, 1, 19, 59), "Weekday Daytime"),
            (at(2024, 1, 1, 20, 0), "Weekday Evening"),
            (at(2024, 1, 1, 23, 59), "Night Rate"),
            (at(2024, 1, 2, 0, 0), "Night Rate"),
            (at(2024, 1, 2, 0, 1), "Night Rate"),
            (at(2024, 1, 6, 6, 0), "Weekend"),
        ];

        for (instant, expected) in cases {
            let mut trip = request(0.0, 0.0, VehicleClass::Standard);
            trip.ride_date_time = instant;

            let result = calculate_fare(&pricing, &trip).unwrap();
            assert_eq!(result.tariff.unwrap().name, expected, "at {}", instant);
        }
    }

    #[test]
    fn summer_time_shifts_tariff_boundaries() {
        let pricing = PricingConfig::default();
        let bst = FixedOffset::east_opt(3600).unwrap();
        let monday_july = |h, min| {
            bst.from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 7, 1)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .unwrap()
        };

        let cases = [
            (monday_july(5, 59), "Night Rate"),
            (monday_july(6, 0), "Weekday Daytime"),
            (monday_july(6, 30), "Weekday Daytime"),
            (monday_july(20, 0), "Weekday Evening"),
            (monday_july(23, 0), "Night Rate"),
            // 05:30 UTC is 06:30 on London clocks
            (at(2024, 7, 1, 5, 30), "Weekday Daytime"),
        ];

        for (instant, expected) in cases {
            let mut trip = request(0.0, 0.0, VehicleClass::Standard);
            trip.ride_date_time = instant;

            let result = calculate_fare(&pricing, &trip).unwrap();
            assert_eq!(result.tariff.unwrap().name, expected, "at {}", instant);
        }
    }

    #[test]
    fn oversized_rates_are_configuration_errors() {
        let mut pricing = PricingConfig::default();
        pricing.luxury_hourly_rate = Money::from_minor(i64::MAX);

        let err = calculate_fare(&pricing, &request(0.0, 7200.0, VehicleClass::Luxury)).unwrap_err();
        assert!(err.is_configuration_error());

        let mut pricing = PricingConfig::default();
        let mut windows = pricing.tariffs.windows().to_vec();
        windows[0].per_distance_unit = Money::from_minor(i64::MAX);
        pricing.tariffs = TariffTable::new(windows);

        let err = calculate_fare(&pricing, &request(10_000.0, 60.0, VehicleClass::Standard)).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn multiseater_surcharge_overflow_is_configuration_error() {
        let mut pricing = PricingConfig::default();
        pricing.multiseater.flat_surcharge = Money::from_minor(i64::MAX);

        let mut trip = request(8047.0, 900.0, VehicleClass::Multiseater);
        trip.passenger_count = 6;

        let err = calculate_fare(&pricing, &trip).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
