//! Persisted scan threshold.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::cache::TtlCache;
use crate::error::Result;
use crate::scanner::{GB, MB};
use crate::store::Store;

/// Cache name of the scan result.
pub const SCAN_CACHE_KEY: &str = "large_files";

const VALUE_KEY: &str = "threshold_value";
const UNIT_KEY: &str = "threshold_unit";

/// Unit of the scan threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdUnit {
    #[default]
    #[serde(rename = "MB")]
    Mb,
    #[serde(rename = "GB")]
    Gb,
}

impl ThresholdUnit {
    /// Whitelist `s`; anything but exactly `MB` or `GB` becomes `MB`.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "GB" => ThresholdUnit::Gb,
            "MB" => ThresholdUnit::Mb,
            other => {
                tracing::debug!(unit = other, "Unknown threshold unit, using MB");
                ThresholdUnit::Mb
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdUnit::Mb => "MB",
            ThresholdUnit::Gb => "GB",
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            ThresholdUnit::Mb => MB,
            ThresholdUnit::Gb => GB,
        }
    }
}

impl fmt::Display for ThresholdUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen size threshold. `threshold_value` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub threshold_value: u64,
    pub threshold_unit: ThresholdUnit,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threshold_value: 10,
            threshold_unit: ThresholdUnit::Mb,
        }
    }
}

impl ScanConfig {
    pub fn threshold_bytes(&self) -> u64 {
        self.threshold_value.saturating_mul(self.threshold_unit.bytes())
    }
}

impl fmt::Display for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.threshold_value, self.threshold_unit)
    }
}

/// Reads and writes the [`ScanConfig`], invalidating the cached scan on
/// every save.
pub struct ConfigStore {
    store: Arc<dyn Store>,
    cache: Arc<TtlCache>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn Store>, cache: Arc<TtlCache>) -> Self {
        Self { store, cache }
    }

    /// Current threshold. Missing or unreadable values fall back to the
    /// defaults key by key.
    pub fn get(&self) -> ScanConfig {
        let defaults = ScanConfig::default();

        let threshold_value = self
            .read(VALUE_KEY)
            .and_then(|v| v.as_u64())
            .filter(|v| *v >= 1)
            .unwrap_or(defaults.threshold_value);

        let threshold_unit = self
            .read(UNIT_KEY)
            .and_then(|v| v.as_str().map(ThresholdUnit::from_str_or_default))
            .unwrap_or(defaults.threshold_unit);

        ScanConfig {
            threshold_value,
            threshold_unit,
        }
    }

    /// Normalise and persist a new threshold.
    ///
    /// Values below 1 become 1 and unknown units become `MB`; only storage
    /// failures are errors.
    pub fn set(&self, value: i64, unit: &str) -> Result<ScanConfig> {
        let config = ScanConfig {
            threshold_value: value.max(1) as u64,
            threshold_unit: ThresholdUnit::from_str_or_default(unit),
        };

        self.store
            .put(VALUE_KEY, &Value::from(config.threshold_value))?;
        self.store
            .put(UNIT_KEY, &Value::from(config.threshold_unit.as_str()))?;

        self.cache.invalidate(SCAN_CACHE_KEY)?;

        tracing::info!(threshold = %config, "Saved scan threshold");
        Ok(config)
    }

    fn read(&self, key: &str) -> Option<Value> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, "Failed to read setting, using default: {}", err);
                None
            }
        }
    }
}
