use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use crate::engine::DEFAULT_QUOTE_TTL_MINUTES;
use crate::error::{config_error, Error};
use crate::pricing::PricingConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const MAX_QUOTE_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Process settings, read from the environment (and `.env` when present).
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub pricing_config: Option<PathBuf>,
    pub quote_ttl: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_vars(
            env::var("BIND_ADDR").ok(),
            env::var("PRICING_CONFIG").ok(),
            env::var("QUOTE_TTL_MINUTES").ok(),
        )
    }

    pub fn from_vars(
        bind_addr: Option<String>,
        pricing_config: Option<String>,
        quote_ttl_minutes: Option<String>,
    ) -> Result<Self, Error> {
        let bind_addr = bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|err| config_error(format!("BIND_ADDR: {}", err)))?;

        let pricing_config = pricing_config
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let quote_ttl_minutes = match quote_ttl_minutes {
            Some(minutes) => minutes
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|value| (1..=MAX_QUOTE_TTL_MINUTES).contains(value))
                .ok_or_else(|| config_error(format!("QUOTE_TTL_MINUTES: {:?}", minutes)))?,
            None => DEFAULT_QUOTE_TTL_MINUTES,
        };

        Ok(Self {
            bind_addr,
            pricing_config,
            quote_ttl: Duration::minutes(quote_ttl_minutes),
        })
    }

    /// The configured rate table, or the built-in one when no file is set.
    pub fn load_pricing(&self) -> Result<PricingConfig, Error> {
        match &self.pricing_config {
            Some(path) => Ok(PricingConfig::load(path)?),
            None => {
                tracing::info!("PRICING_CONFIG not set, using built-in rates");
                Ok(PricingConfig::default())
            }
        }
    }
}
