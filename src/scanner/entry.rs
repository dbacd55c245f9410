use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A regular file that exceeded the scan threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Apparent size in bytes
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    /// Path shown to users: `root` is replaced by a leading `/`.
    pub fn display_path(&self, root: &Path) -> String {
        match self.path.strip_prefix(root) {
            Ok(rel) => format!("/{}", rel.display()),
            Err(_) => self.path.display().to_string(),
        }
    }
}

/// Files over the threshold, largest first.
pub type ScanResult = Vec<FileEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_is_relative_to_root() {
        let entry = FileEntry::new(PathBuf::from("/srv/www/backups/db.sql"), 42);
        assert_eq!(entry.display_path(Path::new("/srv/www")), "/backups/db.sql");
    }

    #[test]
    fn display_path_outside_root_is_absolute() {
        let entry = FileEntry::new(PathBuf::from("/opt/big.iso"), 42);
        assert_eq!(entry.display_path(Path::new("/srv/www")), "/opt/big.iso");
    }
}
