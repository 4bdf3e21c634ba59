use chrono::NaiveDate;
use sd_schemas::Appointment;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ViewMode / Direction
// ---------------------------------------------------------------------------

/// Granularity of a calendar query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Some(ViewMode::Day),
            "week" | "w" => Some(ViewMode::Week),
            "month" | "m" => Some(ViewMode::Month),
            _ => None,
        }
    }
}

/// Navigation step for `prev` / `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// One calendar day and the appointments whose local date falls on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u32,
    pub is_today: bool,
    pub appointments: Vec<Appointment>,
}

/// A cell in the month grid: either a leading placeholder before day 1 or a
/// real day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "snake_case")]
pub enum MonthCell {
    Blank,
    Day(DayBucket),
}

impl MonthCell {
    pub fn as_day(&self) -> Option<&DayBucket> {
        match self {
            MonthCell::Blank => None,
            MonthCell::Day(d) => Some(d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    pub title: String,
    /// Day-of-week of the 1st, 0 = Sunday.
    pub first_weekday: u32,
    pub days_in_month: u32,
    /// `first_weekday` blanks followed by `days_in_month` day cells. The last
    /// row is not padded.
    pub cells: Vec<MonthCell>,
}

impl MonthView {
    /// Cells grouped into 7-wide rows, Sunday first.
    pub fn rows(&self) -> impl Iterator<Item = &[MonthCell]> {
        self.cells.chunks(7)
    }

    /// Day cells only, in date order.
    pub fn days(&self) -> impl Iterator<Item = &DayBucket> {
        self.cells.iter().filter_map(MonthCell::as_day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub title: String,
    /// Always a Sunday.
    pub start: NaiveDate,
    /// Seven consecutive days starting at `start`.
    pub days: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayView {
    pub title: String,
    /// Appointments sorted ascending by timestamp.
    pub day: DayBucket,
}
