use std::path::{Component, Path};
use std::time::Duration;

/// Paths skipped by default: version-control metadata, dependency caches
/// and site page caches.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", ".svn", ".hg", "node_modules", "wp-content/cache"];

/// Configuration options for threshold scans.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path patterns to exclude. Each pattern is one or more `/`-separated
    /// components and matches a contiguous run of components.
    pub exclude_patterns: Vec<String>,

    /// Follow symbolic links
    pub follow_symlinks: bool,

    /// Stay on the same filesystem (don't cross mount points)
    pub one_file_system: bool,

    /// Give up after this long (None = unlimited)
    pub max_duration: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect(),
            follow_symlinks: false,
            one_file_system: false,
            max_duration: None,
        }
    }
}

impl ScanOptions {
    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set exclusion patterns
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether to stay on the same filesystem
    pub fn with_one_file_system(mut self, enabled: bool) -> Self {
        self.one_file_system = enabled;
        self
    }

    /// Set the scan deadline
    pub fn with_max_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }

    /// Check whether `relative` (a path below the scan root) is excluded.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let components: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect();

        self.exclude_patterns.iter().any(|pattern| {
            let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();
            !parts.is_empty()
                && components
                    .windows(parts.len())
                    .any(|window| window.iter().zip(&parts).all(|(c, p)| c == p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ScanOptions::default();
        assert_eq!(opts.exclude_patterns.len(), DEFAULT_EXCLUDES.len());
        assert!(!opts.follow_symlinks);
        assert!(!opts.one_file_system);
        assert!(opts.max_duration.is_none());
    }

    #[test]
    fn test_scan_options_chaining() {
        let opts = ScanOptions::new()
            .with_follow_symlinks(true)
            .with_one_file_system(true)
            .with_max_duration(Duration::from_secs(30))
            .with_exclude(vec!["*.log".to_string()]);

        assert!(opts.follow_symlinks);
        assert!(opts.one_file_system);
        assert_eq!(opts.max_duration, Some(Duration::from_secs(30)));
        assert_eq!(opts.exclude_patterns, vec!["*.log".to_string()]);
    }

    #[test]
    fn test_single_component_exclusion() {
        let opts = ScanOptions::default();
        assert!(opts.is_excluded(Path::new(".git")));
        assert!(opts.is_excluded(Path::new("plugins/foo/.git/objects/pack")));
        assert!(opts.is_excluded(Path::new("theme/node_modules/lib.js")));
    }

    #[test]
    fn test_exclusion_matches_whole_components() {
        let opts = ScanOptions::default();
        assert!(!opts.is_excluded(Path::new(".github/workflows/ci.yml")));
        assert!(!opts.is_excluded(Path::new("src/.gitignore")));
        assert!(!opts.is_excluded(Path::new("my_node_modules/a.bin")));
    }

    #[test]
    fn test_multi_component_exclusion() {
        let opts = ScanOptions::default();
        assert!(opts.is_excluded(Path::new("wp-content/cache")));
        assert!(opts.is_excluded(Path::new("site/wp-content/cache/page.html")));
        assert!(!opts.is_excluded(Path::new("wp-content/uploads/cache.zip")));
        assert!(!opts.is_excluded(Path::new("cache/wp-content/a")));
    }

    #[test]
    fn test_empty_pattern_list_excludes_nothing() {
        let opts = ScanOptions::new().with_exclude(vec![]);
        assert!(!opts.is_excluded(Path::new(".git/HEAD")));
    }
}
