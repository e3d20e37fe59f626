//! Engine configuration.
//!
//! Loaded by the application from an optional file plus `RAPID_ROUTE_*`
//! environment variables, or constructed directly in tests.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum age of the cached network before it is rebuilt on the next
    /// access.  Default: 3600 (1 hour).
    pub network_ttl_secs: u64,

    /// Congestion refresh cadence.  Default: 30 000 ms.
    pub refresh_interval_ms: u64,

    /// Average emergency-vehicle speed on an uncongested road.  Default: 40.
    pub assumed_speed_kmh: f64,

    /// Seed for the synthetic congestion generator.
    pub congestion_seed: u64,

    /// Prepend/append the exact query coordinates to a route's path when
    /// they differ from the snapped nodes.
    pub append_endpoints: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_ttl_secs:    3_600,
            refresh_interval_ms: 30_000,
            assumed_speed_kmh:   40.0,
            congestion_seed:     42,
            append_endpoints:    true,
        }
    }
}

impl EngineConfig {
    /// Layer `path` (if it exists) and `RAPID_ROUTE_*` environment variables
    /// over the defaults, then validate.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut builder = Config::builder();
        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(false));
        }
        let cfg: EngineConfig = builder
            .add_source(Environment::with_prefix("RAPID_ROUTE").try_parsing(true))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.refresh_interval_ms == 0 {
            return Err(CoreError::Config("refresh_interval_ms must be > 0".into()));
        }
        if !(self.assumed_speed_kmh.is_finite() && self.assumed_speed_kmh > 0.0) {
            return Err(CoreError::Config(format!(
                "assumed_speed_kmh must be positive, got {}",
                self.assumed_speed_kmh
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn network_ttl(&self) -> Duration {
        Duration::from_secs(self.network_ttl_secs)
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
