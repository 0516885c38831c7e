//! Bridge config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use pushgate_core::error::{Result, PushgateError};

pub use schema::{BridgeConfig, BridgeSection, EvictionSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "PUSHGATE_CONFIG";

/// Used when `PUSHGATE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "pushgate.yaml";

pub fn load_from_file(path: &str) -> Result<BridgeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PushgateError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BridgeConfig> {
    let cfg: BridgeConfig = serde_yaml::from_str(s)
        .map_err(|e| PushgateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the startup config.
///
/// An explicit `PUSHGATE_CONFIG` must point at a readable file. Without it,
/// `pushgate.yaml` is used when present and built-in defaults otherwise.
pub fn load_startup() -> Result<BridgeConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return load_from_file(&path);
    }
    match fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
            Ok(BridgeConfig::default())
        }
        Err(e) => Err(PushgateError::Internal(format!(
            "read config failed ({DEFAULT_CONFIG_PATH}): {e}"
        ))),
    }
}
