use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{FareResult, Money, RouteMetrics};
use crate::error::{configuration_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimateLeg {
    pub route: RouteMetrics,
    pub fare: FareResult,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub token: Uuid,
    pub outbound: EstimateLeg,
    pub inbound: Option<EstimateLeg>,
    pub total: Money,
    pub currency: String,
}

impl Estimate {
    pub fn new(outbound: EstimateLeg, inbound: Option<EstimateLeg>) -> Result<Self, Error> {
        let inbound_fare = inbound
            .as_ref()
            .map(|leg| leg.fare.fare)
            .unwrap_or(Money::ZERO);
        let total = outbound
            .fare
            .fare
            .checked_add(inbound_fare)
            .ok_or_else(|| configuration_error("estimate total exceeds the representable amount"))?;
        let currency = outbound.fare.currency.clone();

        Ok(Self {
            token: Uuid::new_v4(),
            outbound,
            inbound,
            total,
            currency,
        })
    }
}
