use super::fare_api::{calculate_fare, validate_passengers};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{EstimateAPI, EstimateRequest},
    entities::{Estimate, EstimateLeg, FareRequest, VehicleClass},
    error::{validation_error, Error},
};

#[async_trait]
impl EstimateAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_estimate(&self, request: EstimateRequest) -> Result<Estimate, Error> {
        let vehicle_type: VehicleClass = request.vehicle_type.parse()?;

        request.pickup.validate("pickup")?;
        request.dropoff.validate("dropoff")?;
        for stop in request.stops.iter() {
            stop.validate("stops")?;
        }

        // reject before spending a directions call
        validate_passengers(&self.pricing, request.passenger_count, vehicle_type)?;

        let pickup_time = request
            .pickup_time
            .unwrap_or_else(|| self.pricing.now());

        if let Some(return_time) = request.return_pickup_time {
            if return_time < pickup_time {
                return Err(validation_error(
                    "return_pickup_time",
                    "must not be before pickup_time",
                ));
            }
        }

        let mut waypoints = Vec::with_capacity(request.stops.len() + 2);
        waypoints.push(request.pickup);
        waypoints.extend(request.stops.iter().copied());
        waypoints.push(request.dropoff);

        let (outbound_route, inbound_route) = match request.return_pickup_time {
            Some(_) => {
                let reversed: Vec<_> = waypoints.iter().rev().copied().collect();

                tracing::info!("routing outbound and return legs");
                let (outbound, inbound) = tokio::try_join!(
                    self.directions.route(&waypoints),
                    self.directions.route(&reversed)
                )?;

                (outbound, Some(inbound))
            }
            None => {
                tracing::info!("routing outbound leg");
                (self.directions.route(&waypoints).await?, None)
            }
        };

        let outbound = EstimateLeg {
            route: outbound_route,
            fare: calculate_fare(
                &self.pricing,
                &FareRequest {
                    distance: outbound_route.distance,
                    duration: outbound_route.duration,
                    passenger_count: request.passenger_count,
                    is_return_leg: false,
                    ride_date_time: pickup_time,
                    vehicle_type,
                },
            )?,
        };

        let inbound = match (inbound_route, request.return_pickup_time) {
            (Some(route), Some(return_time)) => Some(EstimateLeg {
                route,
                fare: calculate_fare(
                    &self.pricing,
                    &FareRequest {
                        distance: route.distance,
                        duration: route.duration,
                        passenger_count: request.passenger_count,
                        is_return_leg: true,
                        ride_date_time: return_time,
                        vehicle_type,
                    },
                )?,
            }),
            _ => None,
        };

        let estimate = Estimate::new(outbound, inbound)?;

        tracing::info!(
            token = %estimate.token,
            total = %estimate.total,
            return_trip = estimate.inbound.is_some(),
            "estimate created"
        );

        Ok(estimate)
    }
}
