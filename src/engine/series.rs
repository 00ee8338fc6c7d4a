//! Daily and weekly bucketing of listen timestamps.

use chrono::NaiveDate;
use std::collections::HashMap;

/// A gap-filled count series: one count per bucket label, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountSeries {
    pub dates: Vec<NaiveDate>,
    pub counts: Vec<u64>,
}

impl CountSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate over (label, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.dates.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Bucket listen timestamps by calendar day.
///
/// The result covers every day in `[min, max]` inclusive, with zero
/// counts for days without listens; a bar chart over the series needs
/// the gaps present. Timestamps whose date portion does not parse are
/// skipped. Empty input yields an empty series.
pub fn bucket_by_day<'a, I>(timestamps: I) -> CountSeries
where
    I: IntoIterator<Item = &'a str>,
{
    let days: Vec<NaiveDate> = timestamps
        .into_iter()
        .filter_map(|ts| {
            let date = ts.split(' ').next().unwrap_or(ts);
            NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
        })
        .collect();

    let (Some(&min), Some(&max)) = (days.iter().min(), days.iter().max()) else {
        return CountSeries::default();
    };

    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for day in &days {
        *per_day.entry(*day).or_default() += 1;
    }

    let mut series = CountSeries::default();
    let mut day = min;
    loop {
        series.dates.push(day);
        series.counts.push(per_day.get(&day).copied().unwrap_or(0));
        if day >= max {
            break;
        }
        let Some(next) = day.succ_opt() else { break };
        day = next;
    }
    series
}

/// Roll a daily series up into consecutive 7-day chunks.
///
/// Chunks start from the first day of the series, not calendar-aligned
/// weeks; each is labeled by its first day. The final chunk may cover
/// fewer than 7 days.
pub fn bucket_by_week(daily: &CountSeries) -> CountSeries {
    let mut weekly = CountSeries::default();
    for (dates, counts) in daily.dates.chunks(7).zip(daily.counts.chunks(7)) {
        if let Some(&first) = dates.first() {
            weekly.dates.push(first);
            weekly.counts.push(counts.iter().sum());
        }
    }
    weekly
}
