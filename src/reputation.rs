//! IP reputation lookups with a stored API key and per-address caching.
//!
//! The transport to the scoring service is supplied by the caller through
//! [`ReputationClient`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::error::{Result, SweepError};
use crate::store::Store;

const API_KEY: &str = "reputation_api_key";

/// Only reports newer than this are considered by the scoring service.
pub const MAX_AGE_DAYS: u32 = 90;

/// Scores above this are shown as suspicious.
pub const SUSPICIOUS_SCORE: u8 = 50;

/// Reputation data for one address, in the scoring service's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationReport {
    pub ip_address: String,
    pub country_code: Option<String>,
    pub isp: Option<String>,
    /// 0-100
    pub abuse_confidence_score: u8,
    pub last_reported_at: Option<String>,
}

impl ReputationReport {
    pub fn is_suspicious(&self) -> bool {
        self.abuse_confidence_score > SUSPICIOUS_SCORE
    }
}

/// Failures reported by a [`ReputationClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status, e.g. a rejected key
    /// or an exhausted quota.
    #[error("service returned {status}: {detail}")]
    Api { status: u16, detail: String },
}

/// Transport to the reputation service.
pub trait ReputationClient {
    fn check(
        &self,
        api_key: &str,
        ip: IpAddr,
        max_age_days: u32,
    ) -> std::result::Result<ReputationReport, ClientError>;
}

/// API key storage and cached lookups. The transport is supplied per call.
pub struct ReputationService {
    store: Arc<dyn Store>,
    cache: Arc<TtlCache>,
    ttl: Duration,
}

impl ReputationService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<TtlCache>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(API_KEY)?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|k| !k.is_empty()))
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SweepError::MissingApiKey);
        }
        self.store.put(API_KEY, &Value::from(key))?;
        tracing::info!("Reputation API key saved");
        Ok(())
    }

    pub fn reset_api_key(&self) -> Result<()> {
        self.store.remove(API_KEY)?;
        tracing::info!("Reputation API key removed");
        Ok(())
    }

    /// Look up `ip` through `client`, returning the report and whether it
    /// came from cache.
    pub fn check<C>(&self, client: &C, ip: &str) -> Result<(ReputationReport, bool)>
    where
        C: ReputationClient + ?Sized,
    {
        let ip = parse_ip(ip)?;
        let api_key = self.api_key()?.ok_or(SweepError::MissingApiKey)?;

        self.cache.try_get_or_compute(&cache_name(ip), self.ttl, || {
            client
                .check(&api_key, ip, MAX_AGE_DAYS)
                .map_err(|err| match err {
                    ClientError::Transport(detail) => {
                        // Transport details stay in the log
                        tracing::warn!(%ip, detail = %detail, "Reputation service unreachable");
                        SweepError::Reputation("could not reach the reputation service".into())
                    }
                    ClientError::Api { status, detail } => {
                        tracing::warn!(%ip, status, "Reputation service rejected the request");
                        SweepError::Reputation(detail)
                    }
                })
        })
    }

    /// The cached report for `ip` and how long it stays valid, if any.
    pub fn cached(&self, ip: &str) -> Result<Option<(ReputationReport, Duration)>> {
        let name = cache_name(parse_ip(ip)?);
        let report = self.cache.get::<ReputationReport>(&name);
        let remaining = self.cache.remaining(&name);
        Ok(report.zip(remaining))
    }

    /// Drop the cached report for `ip`.
    pub fn forget(&self, ip: &str) -> Result<()> {
        self.cache.invalidate(&cache_name(parse_ip(ip)?))
    }
}

fn parse_ip(ip: &str) -> Result<IpAddr> {
    ip.trim()
        .parse()
        .map_err(|_| SweepError::InvalidIp(ip.to_string()))
}

fn cache_name(ip: IpAddr) -> String {
    format!("reputation_{}", ip)
}
