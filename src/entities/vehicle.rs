use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Standard,
    Multiseater,
    Luxury,
}

impl VehicleClass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Multiseater => "multiseater",
            Self::Luxury => "luxury",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VehicleClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "multiseater" => Ok(Self::Multiseater),
            "luxury" => Ok(Self::Luxury),
            _ => Err(validation_error(
                "vehicle_type",
                "expected one of standard, multiseater, luxury",
            )),
        }
    }
}
