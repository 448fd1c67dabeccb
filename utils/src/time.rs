//! Time formatting helpers.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a duration in seconds as its two largest non-zero units, e.g.
/// `"3d"`, `"1h 30m"`, `"2d 15s"`.
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let parts: Vec<String> = UNITS
        .iter()
        .filter_map(|&(size, suffix)| {
            let count = rest / size;
            rest %= size;
            (count > 0).then(|| format!("{count}{suffix}"))
        })
        .take(2)
        .collect();
    parts.join(" ")
}
