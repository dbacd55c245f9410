use std::collections::HashSet;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

use crate::error::{Result, SweepError};

use super::entry::{FileEntry, ScanResult};
use super::options::ScanOptions;

/// How often the progress callback fires, in visited files.
const PROGRESS_INTERVAL: u64 = 256;

/// Scan `root` for regular files strictly larger than `threshold` bytes.
///
/// Returns the matches sorted by size, largest first; equal sizes keep
/// traversal order.
pub fn scan_large_files(root: &Path, threshold: u64, options: &ScanOptions) -> Result<ScanResult> {
    scan_large_files_with_progress(root, threshold, options, |_| {})
}

/// Like [`scan_large_files`], reporting the number of files visited so far
/// every few hundred files.
pub fn scan_large_files_with_progress<F>(
    root: &Path,
    threshold: u64,
    options: &ScanOptions,
    mut progress: F,
) -> Result<ScanResult>
where
    F: FnMut(u64),
{
    let root = root.canonicalize().map_err(|e| SweepError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    if !root.is_dir() {
        return Err(SweepError::NotADirectory(root));
    }

    let started = Instant::now();
    let walker = WalkDir::new(&root)
        .follow_links(options.follow_symlinks)
        .same_file_system(options.one_file_system)
        .into_iter()
        // Pruning here keeps excluded directories from being descended into
        .filter_entry(|e| match e.path().strip_prefix(&root) {
            Ok(rel) => !options.is_excluded(rel),
            Err(_) => true,
        });

    // Physical identities of multiply-reachable files
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut results: ScanResult = Vec::new();
    let mut visited: u64 = 0;
    let mut errors: u64 = 0;

    for result in walker {
        if let Some(limit) = options.max_duration {
            if started.elapsed() >= limit {
                tracing::warn!(root = %root.display(), ?limit, visited, "Scan deadline exceeded");
                return Err(SweepError::ScanTimeout(limit));
            }
        }

        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                errors += 1;
                tracing::warn!(path = ?err.path(), "Skipping unreadable entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                errors += 1;
                tracing::warn!(path = %entry.path().display(), "Failed to read metadata: {}", err);
                continue;
            }
        };

        if (options.follow_symlinks || metadata.nlink() > 1)
            && !seen.insert((metadata.dev(), metadata.ino()))
        {
            continue;
        }

        visited += 1;
        if visited % PROGRESS_INTERVAL == 0 {
            progress(visited);
        }

        let size = metadata.len();
        if size > threshold {
            results.push(FileEntry::new(entry.into_path(), size));
        }
    }

    // sort_by is stable, so ties stay in traversal order
    results.sort_by(|a, b| b.size.cmp(&a.size));

    tracing::info!(
        root = %root.display(),
        threshold,
        visited,
        matches = results.len(),
        errors,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Scan complete"
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::size::MB;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn sized_file(path: &Path, size: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        // Sparse files keep the fixtures cheap
        File::create(path).unwrap().set_len(size).unwrap();
    }

    fn sizes(result: &ScanResult) -> Vec<u64> {
        result.iter().map(|e| e.size).collect()
    }

    #[test]
    fn test_threshold_filter_and_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        sized_file(&root.join("small.log"), 500 * 1024);
        sized_file(&root.join("medium.bin"), 2 * MB);
        sized_file(&root.join("a/large.zip"), 15 * MB);
        sized_file(&root.join("b/c/huge.sql"), 30 * MB);

        let result = scan_large_files(root, 10 * MB, &ScanOptions::default()).unwrap();

        assert_eq!(sizes(&result), vec![30 * MB, 15 * MB]);
        assert!(result[0].path.ends_with("b/c/huge.sql"));
        assert!(result[1].path.ends_with("a/large.zip"));
        assert!(result.iter().all(|e| e.path.is_absolute()));
    }

    #[test]
    fn test_threshold_is_strict() {
        let dir = TempDir::new().unwrap();
        sized_file(&dir.path().join("exact.bin"), MB);
        sized_file(&dir.path().join("over.bin"), MB + 1);

        let result = scan_large_files(dir.path(), MB, &ScanOptions::default()).unwrap();

        assert_eq!(sizes(&result), vec![MB + 1]);
    }

    #[test]
    fn test_zero_threshold_skips_empty_files() {
        let dir = TempDir::new().unwrap();
        sized_file(&dir.path().join("empty"), 0);
        sized_file(&dir.path().join("one"), 1);

        let result = scan_large_files(dir.path(), 0, &ScanOptions::default()).unwrap();

        assert_eq!(sizes(&result), vec![1]);
    }

    #[test]
    fn test_equal_sizes_keep_traversal_order() {
        let dir = TempDir::new().unwrap();
        for name in ["a", "b", "c", "d"] {
            sized_file(&dir.path().join(name), 4096);
        }

        let result = scan_large_files(dir.path(), 0, &ScanOptions::default()).unwrap();

        let scanned: Vec<_> = walkdir::WalkDir::new(dir.path().canonicalize().unwrap())
            .into_iter()
            .flatten()
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        let returned: Vec<_> = result.into_iter().map(|e| e.path).collect();
        assert_eq!(returned, scanned);
    }

    #[test]
    fn test_default_exclusions_are_pruned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        sized_file(&root.join(".git/objects/pack/pack-1.pack"), 20 * MB);
        sized_file(&root.join("theme/node_modules/big.js"), 20 * MB);
        sized_file(&root.join("wp-content/cache/page.html"), 20 * MB);
        sized_file(&root.join("wp-content/uploads/video.mp4"), 20 * MB);

        let result = scan_large_files(root, MB, &ScanOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].path.ends_with("wp-content/uploads/video.mp4"));
    }

    #[test]
    fn test_custom_exclusions_replace_defaults() {
        let dir = TempDir::new().unwrap();
        sized_file(&dir.path().join(".git/big"), 2 * MB);
        sized_file(&dir.path().join("backups/db.sql"), 2 * MB);

        let options = ScanOptions::new().with_exclude(vec!["backups".to_string()]);
        let result = scan_large_files(dir.path(), MB, &options).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].path.ends_with(".git/big"));
    }

    #[test]
    fn test_symlinks_not_followed_by_default() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        sized_file(&root.join("data/real.bin"), 2 * MB);
        std::os::unix::fs::symlink(root.join("data"), root.join("alias")).unwrap();
        std::os::unix::fs::symlink(root.join("data/real.bin"), root.join("link.bin")).unwrap();

        let result = scan_large_files(root, MB, &ScanOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].path.ends_with("data/real.bin"));
    }

    #[test]
    fn test_followed_symlinks_count_each_file_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        sized_file(&root.join("data/real.bin"), 2 * MB);
        std::os::unix::fs::symlink(root.join("data"), root.join("alias")).unwrap();
        // Cycle back to the root
        std::os::unix::fs::symlink(root, root.join("data/loop")).unwrap();

        let options = ScanOptions::default().with_follow_symlinks(true);
        let result = scan_large_files(root, MB, &options).unwrap();

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_hard_links_count_once() {
        let dir = TempDir::new().unwrap();
        sized_file(&dir.path().join("original.bin"), 2 * MB);
        fs::hard_link(dir.path().join("original.bin"), dir.path().join("copy.bin")).unwrap();

        let result = scan_large_files(dir.path(), MB, &ScanOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let result = scan_large_files(
            Path::new("/nonexistent/path/12345"),
            MB,
            &ScanOptions::default(),
        );
        assert!(matches!(result, Err(SweepError::Io { .. })));
    }

    #[test]
    fn test_file_root_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        sized_file(&file, 10);

        let result = scan_large_files(&file, 0, &ScanOptions::default());
        assert!(matches!(result, Err(SweepError::NotADirectory(_))));
    }

    #[test]
    fn test_deadline_aborts_scan() {
        let dir = TempDir::new().unwrap();
        sized_file(&dir.path().join("a.bin"), 2 * MB);

        let options = ScanOptions::default().with_max_duration(Duration::ZERO);
        let result = scan_large_files(dir.path(), MB, &options);

        assert!(matches!(result, Err(SweepError::ScanTimeout(_))));
    }

    #[test]
    fn test_progress_reports_visited_files() {
        let dir = TempDir::new().unwrap();
        for i in 0..300 {
            sized_file(&dir.path().join(format!("f{i}")), 1);
        }

        let mut reports = Vec::new();
        scan_large_files_with_progress(dir.path(), 0, &ScanOptions::default(), |n| {
            reports.push(n)
        })
        .unwrap();

        assert_eq!(reports, vec![256]);
    }

    #[test]
    fn test_unreadable_directory_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        sized_file(&root.join("locked/secret.bin"), 2 * MB);
        sized_file(&root.join("open/visible.bin"), 2 * MB);
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        let result = scan_large_files(root, MB, &ScanOptions::default());

        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
        let result = result.unwrap();
        // root bypasses permission bits, so the locked file may still appear
        assert!(result.iter().any(|e| e.path.ends_with("open/visible.bin")));
    }
}
