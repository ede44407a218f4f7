//! Contribution calendar snapshots
//!
//! A calendar is the ordered list of daily contribution counts supplied by the
//! calendar-data collaborator. It can be read from the GraphQL snapshot
//! (`data.user.contributionsCollection.contributionCalendar.weeks[].contributionDays[]`),
//! from a `date,contributionCount` CSV, or built directly from records.
//! Every constructor validates the records, so the pipelines can rely on a
//! strictly increasing sequence of dates.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Contribution count for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Calendar date
    pub date: NaiveDate,
    /// Number of contributions made that day
    pub contribution_count: u32,
    /// Day of the week as reported by the snapshot (Sunday = 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u32>,
    /// Heatmap color as reported by the snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl DayRecord {
    /// Create a record with only a date and a count
    pub fn new(date: NaiveDate, contribution_count: u32) -> Self {
        Self {
            date,
            contribution_count,
            weekday: None,
            color: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    data: Option<SnapshotData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SnapshotData {
    user: Option<SnapshotUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: CalendarPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarPayload {
    total_contributions: Option<u64>,
    weeks: Vec<WeekPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekPayload {
    contribution_days: Vec<DayRecord>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(rename = "contributionCount", alias = "contribution_count", alias = "contribution")]
    contribution_count: u32,
}

/// A validated, chronologically ordered contribution calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionCalendar {
    days: Vec<DayRecord>,
    reported_total: Option<u64>,
}

impl ContributionCalendar {
    /// Build a calendar from day records
    pub fn from_days(days: Vec<DayRecord>) -> Result<Self> {
        Self::validate_days(&days)?;
        Ok(Self {
            days,
            reported_total: None,
        })
    }

    /// Parse a GraphQL calendar snapshot
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Parse a GraphQL calendar snapshot from a reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    /// Load a GraphQL calendar snapshot from a file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_value(value).map_err(|e| {
            ForecastError::ValidationError(format!("Malformed calendar snapshot: {}", e))
        })?;

        if !snapshot.errors.is_empty() {
            let messages: Vec<&str> = snapshot.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ForecastError::DataError(format!(
                "Calendar source reported errors: {}",
                messages.join("; ")
            )));
        }

        let user = snapshot
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| ForecastError::DataError("Snapshot contains no user".to_string()))?;
        let payload = user.contributions_collection.contribution_calendar;

        let days: Vec<DayRecord> = payload
            .weeks
            .into_iter()
            .flat_map(|w| w.contribution_days)
            .collect();
        Self::validate_days(&days)?;

        Ok(Self {
            days,
            reported_total: payload.total_contributions,
        })
    }

    /// Read a `date,contributionCount` CSV
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut days = Vec::new();

        for (line, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| {
                ForecastError::ValidationError(format!("Row {}: {}", line + 1, e))
            })?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|e| {
                ForecastError::ValidationError(format!(
                    "Row {}: invalid date '{}': {}",
                    line + 1,
                    row.date,
                    e
                ))
            })?;
            days.push(DayRecord::new(date, row.contribution_count));
        }

        Self::from_days(days)
    }

    /// Load a `date,contributionCount` CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Load a calendar, choosing the format from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::from_csv(path),
            _ => Self::from_json_file(path),
        }
    }

    fn validate_days(days: &[DayRecord]) -> Result<()> {
        for (i, day) in days.iter().enumerate() {
            if let Some(weekday) = day.weekday {
                let actual = day.date.weekday().num_days_from_sunday();
                if weekday != actual {
                    return Err(ForecastError::ValidationError(format!(
                        "Day {} ({}) reports weekday {}, expected {}",
                        i, day.date, weekday, actual
                    )));
                }
            }
        }

        for pair in days.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ForecastError::ValidationError(format!(
                    "Calendar dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        Ok(())
    }

    /// Sub-calendar with dates in `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "Range end {} is before start {}",
                end, start
            )));
        }

        Ok(Self {
            days: self
                .days
                .iter()
                .filter(|d| d.date >= start && d.date <= end)
                .cloned()
                .collect(),
            reported_total: None,
        })
    }

    /// Day records in chronological order
    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    /// Number of days
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the calendar has no days
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First date, if any
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    /// Last date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// Sum of the daily counts
    pub fn total_contributions(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.contribution_count)).sum()
    }

    /// Total as reported by the snapshot, when it carried one
    pub fn reported_total(&self) -> Option<u64> {
        self.reported_total
    }
}
