const UNITS: [&str; 4] = ["B", "kB", "MB", "GB"];

/// Formats a byte count with 1024-based units and one decimal.
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}
