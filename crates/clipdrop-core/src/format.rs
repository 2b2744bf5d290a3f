//! Human-readable byte sizes for user-facing messages.

const UNITS: [&str; 3] = ["B", "KB", "MB"];

/// Format a byte count as B/KB/MB with one decimal place, stepping at 1024.
///
/// MB is the largest unit, so multi-gigabyte values read as e.g. `"2048.0 MB"`.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Bytes expressed as (fractional) mebibytes, rounded to two decimals.
pub fn mebibytes(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(0), "0.0 B");
        assert_eq!(human_size(512), "512.0 B");
        assert_eq!(human_size(1023), "1023.0 B");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_human_size_limit_values() {
        assert_eq!(human_size(100 * 1024 * 1024), "100.0 MB");
        assert_eq!(human_size(150 * 1024 * 1024), "150.0 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3072.0 MB");
    }

    #[test]
    fn test_mebibytes_rounding() {
        assert_eq!(mebibytes(0), 0.0);
        assert_eq!(mebibytes(1024 * 1024), 1.0);
        assert_eq!(mebibytes(1024 * 1024 + 1024 * 512), 1.5);
    }
}
