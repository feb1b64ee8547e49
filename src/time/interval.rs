/// Bar interval to clock span, used to advance simulated time per bar
use std::collections::BTreeMap;

use chrono::Duration;

use crate::types::Interval;

pub fn interval_delta(interval: Interval) -> Duration {
    match interval {
        Interval::Minute => Duration::minutes(1),
        Interval::Hour => Duration::hours(1),
        Interval::Daily => Duration::days(1),
    }
}

/// One entry per interval
pub fn interval_delta_map() -> BTreeMap<Interval, Duration> {
    Interval::ALL
        .into_iter()
        .map(|interval| (interval, interval_delta(interval)))
        .collect()
}
