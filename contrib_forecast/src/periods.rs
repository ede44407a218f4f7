//! Period aggregation over a contribution calendar

use crate::calendar::DayRecord;
use chrono::{Datelike, NaiveDate};

/// Accumulated contributions of one week or month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTotal {
    /// First calendar day accumulated into the period
    pub reference_date: NaiveDate,
    /// Sum of the daily counts
    pub total: u64,
}

/// Result of a chronological period scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodAggregation {
    /// Finished periods with a non-zero total, in order
    pub completed: Vec<PeriodTotal>,
    /// The period still open when the calendar ended
    pub in_progress: Option<PeriodTotal>,
}

impl PeriodAggregation {
    /// Largest completed total
    pub fn max_total(&self) -> Option<u64> {
        self.completed.iter().map(|p| p.total).max()
    }
}

/// Scan `days` in order, closing a period whenever `key` changes.
///
/// A closed period is kept only if its total is non-zero. The last period is
/// never closed, since the calendar may end part-way through it.
pub fn aggregate_by<K, F>(days: &[DayRecord], key: F) -> PeriodAggregation
where
    K: PartialEq,
    F: Fn(NaiveDate) -> K,
{
    let mut aggregation = PeriodAggregation::default();
    let Some(first) = days.first() else {
        return aggregation;
    };

    let mut current_key = key(first.date);
    let mut current = PeriodTotal {
        reference_date: first.date,
        total: 0,
    };

    for day in days {
        let day_key = key(day.date);
        if day_key != current_key {
            if current.total != 0 {
                aggregation.completed.push(current);
            }
            current_key = day_key;
            current = PeriodTotal {
                reference_date: day.date,
                total: 0,
            };
        }
        current.total += u64::from(day.contribution_count);
    }

    aggregation.in_progress = Some(current);
    aggregation
}

/// Aggregate by ISO week number
pub fn weekly_totals(days: &[DayRecord]) -> PeriodAggregation {
    aggregate_by(days, |d| d.iso_week().week())
}

/// Aggregate by calendar month
pub fn monthly_totals(days: &[DayRecord]) -> PeriodAggregation {
    aggregate_by(days, |d| d.month())
}

/// Week of the month, counting the partial first week as week 1
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let offset = first.weekday().num_days_from_monday();
    (date.day() + offset).div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_from(start: NaiveDate, counts: &[u32]) -> Vec<DayRecord> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| DayRecord::new(start + chrono::Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn test_week_of_month() {
        // May 2024 starts on a Wednesday
        assert_eq!(week_of_month(date(2024, 5, 1)), 1);
        assert_eq!(week_of_month(date(2024, 5, 5)), 1);
        assert_eq!(week_of_month(date(2024, 5, 6)), 2);
        assert_eq!(week_of_month(date(2024, 5, 31)), 5);
        // April 2024 starts on a Monday
        assert_eq!(week_of_month(date(2024, 4, 7)), 1);
        assert_eq!(week_of_month(date(2024, 4, 8)), 2);
        // September 2024 starts on a Sunday
        assert_eq!(week_of_month(date(2024, 9, 1)), 1);
        assert_eq!(week_of_month(date(2024, 9, 2)), 2);
        assert_eq!(week_of_month(date(2024, 9, 30)), 6);
    }

    #[test]
    fn test_weekly_totals_skip_zero_weeks_and_open_week() {
        // 2024-01-01 is a Monday: three full weeks plus two days
        let mut counts = vec![1; 7];
        counts.extend([0; 7]);
        counts.extend([2; 7]);
        counts.extend([5, 5]);
        let days = days_from(date(2024, 1, 1), &counts);

        let aggregation = weekly_totals(&days);
        assert_eq!(
            aggregation.completed,
            vec![
                PeriodTotal { reference_date: date(2024, 1, 1), total: 7 },
                PeriodTotal { reference_date: date(2024, 1, 15), total: 14 },
            ]
        );
        assert_eq!(
            aggregation.in_progress,
            Some(PeriodTotal { reference_date: date(2024, 1, 22), total: 10 })
        );
        assert_eq!(aggregation.max_total(), Some(14));
    }

    #[test]
    fn test_weekly_reference_is_first_day_seen() {
        // starts on a Thursday, so the first week is partial
        let days = days_from(date(2024, 1, 4), &[1; 10]);
        let aggregation = weekly_totals(&days);
        assert_eq!(aggregation.completed[0].reference_date, date(2024, 1, 4));
        assert_eq!(aggregation.completed[0].total, 4);
    }

    #[test]
    fn test_monthly_totals() {
        let days = days_from(date(2024, 1, 30), &[3; 35]);
        let aggregation = monthly_totals(&days);

        assert_eq!(
            aggregation.completed,
            vec![
                PeriodTotal { reference_date: date(2024, 1, 30), total: 6 },
                PeriodTotal { reference_date: date(2024, 2, 1), total: 87 },
            ]
        );
        assert_eq!(aggregation.in_progress.map(|p| p.total), Some(12));
    }

    #[test]
    fn test_empty_days() {
        assert_eq!(monthly_totals(&[]), PeriodAggregation::default());
    }
}
