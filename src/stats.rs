//! Pure display aggregates over already-fetched collections. Recomputed on
//! every render from current state; every ratio is zero-guarded so an empty
//! backend never renders as NaN.

use crate::models::{ClassificationStats, ClickStats, IncidentRecord};
use std::collections::HashSet;

/// Share of classified requests attributed to bots, in percent.
/// `0` when no requests have been classified yet.
pub fn detection_rate(stats: &ClassificationStats) -> f64 {
    if stats.total_requests == 0 {
        return 0.0;
    }
    stats.bot_requests as f64 / stats.total_requests as f64 * 100.0
}

/// Detection rate rendered to one decimal place.
pub fn detection_rate_label(stats: &ClassificationStats) -> String {
    format!("{:.1}", detection_rate(stats))
}

/// Distinct-count of target hostnames over the currently held collection.
/// This is a client-side count over whatever window is loaded in memory,
/// which may undercount the true global cardinality.
pub fn unique_hostnames(records: &[IncidentRecord]) -> usize {
    records.iter().map(|r| r.hostname()).collect::<HashSet<_>>().len()
}

/// Mean click-to-submit delta in milliseconds, rounded to the nearest
/// integer. `0` for an empty collection.
pub fn average_click_time_diff(records: &[IncidentRecord]) -> i64 {
    if records.is_empty() {
        return 0;
    }
    let total: i64 = records.iter().map(|r| r.click_time_diff_ms.unwrap_or(0)).sum();
    (total as f64 / records.len() as f64).round() as i64
}

/// Legitimate and suspicious click shares in percent, `(0, 0)` when no
/// clicks have been recorded.
pub fn click_share(stats: &ClickStats) -> (f64, f64) {
    let total = stats.legitimate_clicks + stats.suspicious_clicks;
    if total == 0 {
        return (0.0, 0.0);
    }
    (
        stats.legitimate_clicks as f64 / total as f64 * 100.0,
        stats.suspicious_clicks as f64 / total as f64 * 100.0,
    )
}
