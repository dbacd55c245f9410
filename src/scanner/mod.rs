mod entry;
mod options;
mod size;
mod walker;

pub use entry::{FileEntry, ScanResult};
pub use options::{ScanOptions, DEFAULT_EXCLUDES};
pub use size::{format_size, GB, MB};
pub use walker::{scan_large_files, scan_large_files_with_progress};
