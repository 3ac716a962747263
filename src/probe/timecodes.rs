//! Audio delay from an `mkvextract timestamps_v2` export

use crate::domain::model::SyncOffset;

/// The delay is the second line of the export (the first timestamp after the
/// format header). A missing second line means no delay.
pub fn delay_from_timecodes(export: &str) -> Option<SyncOffset> {
    export
        .lines()
        .nth(1)
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(SyncOffset::new)
}
