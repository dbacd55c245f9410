//! The large-file view: threshold → cached scan → one page.

mod formatter;

pub use formatter::{format_json, format_text};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::error::{Result, SweepError};
use crate::paginate::{paginate, Page};
use crate::scanner::{scan_large_files_with_progress, FileEntry, ScanOptions, ScanResult};
use crate::settings::{ConfigStore, ScanConfig, SCAN_CACHE_KEY};

/// Everything that decides which files a scan returns.
///
/// The deadline is left out: it only decides whether a scan finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ScanQuery {
    root: PathBuf,
    threshold: u64,
    exclude_patterns: Vec<String>,
    follow_symlinks: bool,
    one_file_system: bool,
}

impl ScanQuery {
    fn new(root: PathBuf, threshold: u64, options: &ScanOptions) -> Self {
        // Pattern order and repeats don't change what gets pruned
        let mut exclude_patterns = options.exclude_patterns.clone();
        exclude_patterns.sort();
        exclude_patterns.dedup();

        Self {
            root,
            threshold,
            exclude_patterns,
            follow_symlinks: options.follow_symlinks,
            one_file_system: options.one_file_system,
        }
    }
}

/// What gets cached: the files plus the question they answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedScan {
    query: ScanQuery,
    files: ScanResult,
}

/// Everything needed to render one page of results.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub root: PathBuf,
    pub config: ScanConfig,
    pub from_cache: bool,
    pub files: ScanResult,
    pub requested_page: usize,
    pub page_size: usize,
}

impl DashboardView {
    pub fn page(&self) -> Page<'_, FileEntry> {
        paginate(&self.files, self.requested_page, self.page_size)
    }
}

pub struct Dashboard {
    root: PathBuf,
    options: ScanOptions,
    settings: ConfigStore,
    cache: Arc<TtlCache>,
    ttl: Duration,
    page_size: usize,
}

impl Dashboard {
    pub fn new(
        root: impl Into<PathBuf>,
        options: ScanOptions,
        settings: ConfigStore,
        cache: Arc<TtlCache>,
        ttl: Duration,
        page_size: usize,
    ) -> Self {
        Self {
            root: root.into(),
            options,
            settings,
            cache,
            ttl,
            page_size,
        }
    }

    /// Render inputs for `page_number`, scanning only on a cache miss.
    pub fn view(&self, page_number: usize) -> Result<DashboardView> {
        self.view_with_progress(page_number, |_| {})
    }

    pub fn view_with_progress<F>(&self, page_number: usize, mut progress: F) -> Result<DashboardView>
    where
        F: FnMut(u64),
    {
        let config = self.settings.get();
        let threshold = config.threshold_bytes();
        let root = self.root.canonicalize().map_err(|e| SweepError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let query = ScanQuery::new(root, threshold, &self.options);

        let (mut scan, mut from_cache) = self.cached_scan(&query, &mut progress)?;

        if scan.query != query {
            tracing::debug!(
                cached = ?scan.query,
                requested = ?query,
                "Cached scan answers a different question, rescanning"
            );
            self.cache.invalidate(SCAN_CACHE_KEY)?;
            (scan, from_cache) = self.cached_scan(&query, &mut progress)?;
        }

        Ok(DashboardView {
            root: query.root,
            config,
            from_cache,
            files: scan.files,
            requested_page: page_number,
            page_size: self.page_size,
        })
    }

    /// Save a new threshold; the next view rescans.
    pub fn save_threshold(&self, value: i64, unit: &str) -> Result<ScanConfig> {
        self.settings.set(value, unit)
    }

    /// Drop the cached scan so the next view rescans.
    pub fn refresh(&self) -> Result<()> {
        self.cache.invalidate(SCAN_CACHE_KEY)
    }

    fn cached_scan<F>(&self, query: &ScanQuery, progress: &mut F) -> Result<(CachedScan, bool)>
    where
        F: FnMut(u64),
    {
        self.cache.try_get_or_compute(SCAN_CACHE_KEY, self.ttl, || {
            let files = scan_large_files_with_progress(
                &query.root,
                query.threshold,
                &self.options,
                &mut *progress,
            )?;
            Ok(CachedScan {
                query: query.clone(),
                files,
            })
        })
    }
}
