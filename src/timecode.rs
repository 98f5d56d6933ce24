/// Whole seconds of a seek position, clamping negatives and NaN to zero
pub fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

/// Short display form: `M:SS`, or `H:MM:SS` past the first hour
pub fn format_short(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Player form: always `HH:MM:SS`
pub fn format_widget(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
