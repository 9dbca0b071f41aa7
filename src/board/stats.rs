use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use super::model::{Status, Target};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub today: usize,
}

/// Aggregates over the whole collection, counting "today" in local time.
pub fn statistics(targets: &[Target]) -> Statistics {
    statistics_at(targets, &Local::now())
}

/// Same as [`statistics`] with an explicit clock; the day boundary is taken
/// from `now`'s time zone.
pub fn statistics_at<Tz: TimeZone>(targets: &[Target], now: &DateTime<Tz>) -> Statistics {
    let tz = now.timezone();
    let today = now.date_naive();
    targets.iter().fold(Statistics::default(), |mut acc, t| {
        acc.total += 1;
        match t.status {
            Status::Active => acc.active += 1,
            Status::Completed => acc.completed += 1,
            Status::Other(_) => {}
        }
        if t
            .date_added
            .map(|d| d.with_timezone(&tz).date_naive() == today)
            .unwrap_or(false)
        {
            acc.today += 1;
        }
        acc
    })
}
