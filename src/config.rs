use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::entities::PricingConfig;
use crate::error::{configuration_error, Error};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Process settings read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub addr: SocketAddr,
    pub pricing_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        let addr = env::var("TAXIFARE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());
        let addr: SocketAddr = addr.parse().map_err(|_| {
            configuration_error(format!("TAXIFARE_ADDR {:?} is not a socket address", addr))
        })?;

        let pricing_path = env::var("TAXIFARE_PRICING_PATH").ok().map(PathBuf::from);

        Ok(Self { addr, pricing_path })
    }

    /// Reads the pricing file when one is configured, otherwise the built-in tariffs.
    pub fn pricing(&self) -> Result<PricingConfig, Error> {
        match &self.pricing_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading pricing configuration");
                PricingConfig::load(path)
            }
            None => {
                tracing::info!("using built-in pricing configuration");
                Ok(PricingConfig::default())
            }
        }
    }
}
