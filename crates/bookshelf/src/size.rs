//! Human-readable byte sizes for display metadata.

const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const STEP: u64 = 1024;

/// Formats a byte count using binary multiples and at most two decimals,
/// dropping trailing zeros (`1024` -> `"1 KB"`, `1500000` -> `"1.43 MB"`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut remaining = bytes;
    while remaining >= STEP && exponent < UNITS.len() - 1 {
        remaining /= STEP;
        exponent += 1;
    }

    let value = bytes as f64 / (STEP as f64).powi(exponent as i32);
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    format!("{trimmed} {}", UNITS[exponent])
}
