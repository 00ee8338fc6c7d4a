//! Time-range filtering over the dataset.
//!
//! Two layers: [`TimeFilter`] is the date-range predicate the engine
//! evaluates, and [`MonthRange`] models the month/year pickers the host
//! edits, expanding to a full-day-covering `TimeFilter`.

use crate::model::Listen;

/// Inclusive date-range filter, or a disabled pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFilter {
    /// When false, every record is included.
    pub enabled: bool,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub begin_date: String,
    /// Inclusive upper bound, `YYYY-MM-DD`. Invariant when enabled:
    /// `begin_date <= end_date`.
    pub end_date: String,
}

impl TimeFilter {
    /// The identity filter.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            begin_date: String::new(),
            end_date: String::new(),
        }
    }

    /// Whether a listen timestamp falls inside the range.
    ///
    /// Compares the date portion lexicographically, which is valid for
    /// the zero-padded `YYYY-MM-DD` format.
    pub fn includes(&self, end_time: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let date = end_time.split(' ').next().unwrap_or(end_time);
        self.begin_date.as_str() <= date && date <= self.end_date.as_str()
    }

    /// Filter a dataset into a new sequence, preserving relative order.
    pub fn apply(&self, dataset: &[Listen]) -> Vec<Listen> {
        dataset
            .iter()
            .filter(|l| self.includes(&l.end_time))
            .cloned()
            .collect()
    }
}

/// Month-granularity range as edited through the host's pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub enabled: bool,
    /// 1-12
    pub begin_month: u32,
    pub begin_year: i32,
    /// 1-12
    pub end_month: u32,
    pub end_year: i32,
}

impl MonthRange {
    /// Snap the end forward to the begin whenever the end precedes it.
    /// Applied on every range edit, before the filter is derived.
    pub fn corrected(mut self) -> Self {
        if self.end_year < self.begin_year {
            self.end_year = self.begin_year;
            self.end_month = self.begin_month;
        } else if self.end_year == self.begin_year && self.end_month < self.begin_month {
            self.end_month = self.begin_month;
        }
        self
    }

    /// Expand to a day-resolution filter: first day of the begin month
    /// through the last day of the end month.
    pub fn time_filter(&self) -> TimeFilter {
        TimeFilter {
            enabled: self.enabled,
            begin_date: format!("{:04}-{:02}-01", self.begin_year, self.begin_month),
            end_date: format!(
                "{:04}-{:02}-{:02}",
                self.end_year,
                self.end_month,
                days_in_month(self.end_year, self.end_month)
            ),
        }
    }

    /// The full span of a dataset: min/max year, and min/max month within
    /// the boundary years. This is the initial range on dataset load,
    /// inactive until the host enables it. `None` for an empty dataset.
    pub fn full_span(dataset: &[Listen]) -> Option<Self> {
        let months: Vec<(i32, u32)> = dataset
            .iter()
            .filter_map(|l| parse_year_month(l.date()))
            .collect();
        let begin_year = months.iter().map(|&(y, _)| y).min()?;
        let end_year = months.iter().map(|&(y, _)| y).max()?;
        let begin_month = months
            .iter()
            .filter(|&&(y, _)| y == begin_year)
            .map(|&(_, m)| m)
            .min()?;
        let end_month = months
            .iter()
            .filter(|&&(y, _)| y == end_year)
            .map(|&(_, m)| m)
            .max()?;
        Some(Self {
            enabled: false,
            begin_month,
            begin_year,
            end_month,
            end_year,
        })
    }
}

fn parse_year_month(date: &str) -> Option<(i32, u32)> {
    let mut parts = date.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    Some((year, month))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
