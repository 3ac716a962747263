//! Elapsed time formatting

use std::time::Duration;

/// Render a duration as `M minute(s) S second(s)`, dropping the minutes part
/// when it is zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;

    if minutes == 0 {
        plural(seconds, "second")
    } else {
        format!("{} {}", plural(minutes, "minute"), plural(seconds, "second"))
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
