use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::scanner::ScanOptions;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub display: DisplayConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory to scan when none is given on the command line
    pub root: PathBuf,
    /// Path patterns to skip, matched against whole path components
    pub exclude_patterns: Vec<String>,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Stay on the root's filesystem
    pub one_file_system: bool,
    /// Abort a scan after this many seconds (0 = unlimited)
    pub max_scan_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Files shown per page
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Scan result TTL in seconds
    pub scan_ttl: u64,
    /// Reputation lookup TTL in seconds
    pub reputation_ttl: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where settings and cache entries live (None = XDG state dir)
    pub state_dir: Option<PathBuf>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude_patterns: crate::scanner::DEFAULT_EXCLUDES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            follow_symlinks: false,
            one_file_system: false,
            max_scan_secs: 300,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { page_size: 5 }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scan_ttl: 60 * 60,
            reputation_ttl: 12 * 60 * 60,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::Malformed {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/bigfile-sweep/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bigfile-sweep").join("config.toml"))
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.display.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "display.page_size",
                reason: "must be at least 1",
            });
        }
        if self.cache.scan_ttl == 0 {
            return Err(ConfigError::Invalid {
                key: "cache.scan_ttl",
                reason: "must be at least 1 second",
            });
        }
        if self.scanner.exclude_patterns.iter().any(|p| p.trim_matches('/').is_empty()) {
            return Err(ConfigError::Invalid {
                key: "scanner.exclude_patterns",
                reason: "must not contain empty patterns",
            });
        }
        Ok(())
    }

    /// Resolve the state directory, preferring an explicit override.
    pub fn state_dir(&self, overridden: Option<&Path>) -> PathBuf {
        if let Some(dir) = overridden {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.storage.state_dir {
            return dir.clone();
        }
        dirs::state_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("bigfile-sweep")
    }

    pub fn scan_options(&self) -> ScanOptions {
        let options = ScanOptions::new()
            .with_exclude(self.scanner.exclude_patterns.clone())
            .with_follow_symlinks(self.scanner.follow_symlinks)
            .with_one_file_system(self.scanner.one_file_system);

        if self.scanner.max_scan_secs > 0 {
            options.with_max_duration(Duration::from_secs(self.scanner.max_scan_secs))
        } else {
            options
        }
    }

    pub fn scan_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.scan_ttl)
    }

    pub fn reputation_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.reputation_ttl)
    }
}
