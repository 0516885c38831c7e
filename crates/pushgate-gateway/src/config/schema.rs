use serde::Deserialize;
use pushgate_core::error::{Result, PushgateError};

/// Lower bound of `eviction.stale_factor`. Anything at or below the render
/// staleness multiplier would evict records a scrape still shows.
const MIN_EVICTION_FACTOR: f64 = 2.0;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    pub version: u32,

    #[serde(default)]
    pub bridge: BridgeSection,

    #[serde(default)]
    pub eviction: EvictionSection,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            bridge: BridgeSection::default(),
            eviction: EvictionSection::default(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PushgateError::UnsupportedVersion);
        }
        self.bridge.validate()?;
        self.eviction.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Largest accepted push body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl BridgeSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(PushgateError::BadRequest(format!(
                "bridge.listen must be a valid socket address, got {:?}",
                self.listen
            )));
        }
        if !(1024..=64 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(PushgateError::BadRequest(
                "bridge.max_body_bytes must be between 1024 and 67108864".into(),
            ));
        }
        Ok(())
    }
}

/// Optional sweep of identities that stopped reporting.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvictionSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Records older than `time + stale_factor * interval` are removed.
    #[serde(default = "default_stale_factor")]
    pub stale_factor: f64,
}

impl Default for EvictionSection {
    fn default() -> Self {
        Self {
            enabled: false,
            sweep_interval_ms: default_sweep_interval_ms(),
            stale_factor: default_stale_factor(),
        }
    }
}

impl EvictionSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=3_600_000).contains(&self.sweep_interval_ms) {
            return Err(PushgateError::BadRequest(
                "eviction.sweep_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if !(self.stale_factor.is_finite() && self.stale_factor > MIN_EVICTION_FACTOR) {
            return Err(PushgateError::BadRequest(
                "eviction.stale_factor must be greater than 2".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9105".into()
}
fn default_max_body_bytes() -> usize {
    4 * 1024 * 1024
}
fn default_sweep_interval_ms() -> u64 {
    60000
}
fn default_stale_factor() -> f64 {
    10.0
}
