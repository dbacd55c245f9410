/// Bytes per megabyte as used by thresholds.
pub const MB: u64 = 1024 * 1024;

/// Bytes per gigabyte as used by thresholds.
pub const GB: u64 = 1024 * 1024 * 1024;

/// Format size in human-readable format.
///
/// Picks the largest unit up to TB that keeps the value at or above one,
/// rounds to two decimals and drops trailing zeros: `30 MB`, `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_zero() {
        assert_eq!(format_size(0), "0 B");
    }

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(500 * 1024), "500 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(format_size(30 * MB), "30 MB");
        assert_eq!(format_size(MB + MB / 4), "1.25 MB");
    }

    #[test]
    fn test_format_size_rounds_to_two_decimals() {
        // 3.4512 GB
        let bytes = (3.4512 * GB as f64) as u64;
        assert_eq!(format_size(bytes), "3.45 GB");
        // 1.999 MB rounds up
        let bytes = (1.999 * MB as f64) as u64;
        assert_eq!(format_size(bytes), "2 MB");
    }

    #[test]
    fn test_format_size_caps_at_terabytes() {
        assert_eq!(format_size(1024 * GB), "1 TB");
        assert_eq!(format_size(1024 * 1024 * GB), "1024 TB");
    }

    #[test]
    fn test_formatted_value_scales_back_to_input() {
        for bytes in [1u64, 999, 1024, 123_456, 7 * MB + 3, 5 * GB + 17, 3 * 1024 * GB] {
            let formatted = format_size(bytes);
            let (number, unit) = formatted.split_once(' ').unwrap();
            let exp = ["B", "KB", "MB", "GB", "TB"]
                .iter()
                .position(|u| *u == unit)
                .unwrap();
            let scaled = number.parse::<f64>().unwrap() * 1024f64.powi(exp as i32);
            let tolerance = 0.005 * 1024f64.powi(exp as i32);
            assert!((scaled - bytes as f64).abs() <= tolerance, "{formatted} vs {bytes}");
        }
    }
}
