/// Human-readable file size, e.g. 1536 -> "1.5 KB"
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];
    const K: f64 = 1024.0;

    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let i = ((bytes as f64).ln() / K.ln()).floor() as usize;
    let i = i.min(UNITS.len() - 1);
    let size = bytes as f64 / K.powi(i as i32);

    // Trim trailing zeros the way the frontend expects ("1.5 KB", "2 MB")
    let rounded = (size * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as i64, UNITS[i])
    } else {
        format!("{} {}", rounded, UNITS[i])
    }
}

/// Format a duration in seconds as "m:ss"
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_format_file_size_negative() {
        assert_eq!(format_file_size(-10), "0 Bytes");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(9.9), "0:09");
        assert_eq!(format_duration(75.0), "1:15");
        assert_eq!(format_duration(150.4), "2:30");
        assert_eq!(format_duration(3601.0), "60:01");
    }
}
