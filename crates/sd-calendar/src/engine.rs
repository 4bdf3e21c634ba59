use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use sd_schemas::Appointment;

use crate::types::{DayBucket, DayView, Direction, MonthCell, MonthView, ViewMode, WeekView};

const DAY_MILLIS: i64 = 86_400_000;

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Bucketing engine bound to the time zone that defines "local date".
///
/// Appointment timestamps are stored in UTC; a shoot at 23:30 in São Paulo
/// belongs to that local day even though its UTC date is the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Local calendar date of a UTC timestamp.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.tz).date_naive()
    }

    /// Local "today" for a given instant.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date(now)
    }

    /// Appointments whose local (year, month, day) equals `date`, in input
    /// order.
    pub fn appointments_on(
        &self,
        appointments: &[Appointment],
        date: NaiveDate,
    ) -> Vec<Appointment> {
        appointments
            .iter()
            .filter(|a| self.local_date(a.date) == date)
            .cloned()
            .collect()
    }

    fn bucket(&self, appointments: &[Appointment], date: NaiveDate, today: NaiveDate) -> DayBucket {
        DayBucket {
            date,
            weekday: date.weekday().num_days_from_sunday(),
            is_today: date == today,
            appointments: self.appointments_on(appointments, date),
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Month grid for (`year`, `month`).
    ///
    /// Returns `None` when `month` is not in `1..=12` or the year is outside
    /// chrono's supported range.
    pub fn month_view(
        &self,
        appointments: &[Appointment],
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Option<MonthView> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let first_weekday = first_weekday(year, month)?;
        let n = days_in_month(year, month)?;

        let mut cells = Vec::with_capacity((first_weekday + n) as usize);
        cells.extend((0..first_weekday).map(|_| MonthCell::Blank));
        cells.extend(
            first
                .iter_days()
                .take(n as usize)
                .map(|d| MonthCell::Day(self.bucket(appointments, d, today))),
        );

        Some(MonthView {
            year,
            month,
            title: title(first, ViewMode::Month),
            first_weekday,
            days_in_month: n,
            cells,
        })
    }

    /// Sunday-to-Saturday strip containing `reference`.
    pub fn week_view(
        &self,
        appointments: &[Appointment],
        reference: NaiveDate,
        today: NaiveDate,
    ) -> WeekView {
        let start = start_of_week(reference);
        let days = start
            .iter_days()
            .take(7)
            .map(|d| self.bucket(appointments, d, today))
            .collect();

        WeekView {
            title: title(start, ViewMode::Week),
            start,
            days,
        }
    }

    /// Single-day agenda, sorted ascending by timestamp.
    pub fn day_view(
        &self,
        appointments: &[Appointment],
        reference: NaiveDate,
        today: NaiveDate,
    ) -> DayView {
        let mut day = self.bucket(appointments, reference, today);
        day.appointments.sort_by_key(|a| a.date);
        DayView {
            title: title(reference, ViewMode::Day),
            day,
        }
    }
}

// ---------------------------------------------------------------------------
// Upcoming window
// ---------------------------------------------------------------------------

/// `ceil((date - now) / 1 day)` computed on millisecond precision.
///
/// An appointment a few hours in the past rounds up to day 0.
pub fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = (date - now).num_milliseconds();
    let whole = diff.div_euclid(DAY_MILLIS);
    if diff.rem_euclid(DAY_MILLIS) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Appointments with `days_until` in `[0, window_days]`, ascending by
/// timestamp, truncated to `limit` when given.
pub fn upcoming(
    appointments: &[Appointment],
    now: DateTime<Utc>,
    window_days: i64,
    limit: Option<usize>,
) -> Vec<Appointment> {
    let mut out: Vec<Appointment> = appointments
        .iter()
        .filter(|a| (0..=window_days).contains(&days_until(a.date, now)))
        .cloned()
        .collect();
    out.sort_by_key(|a| a.date);
    if let Some(n) = limit {
        out.truncate(n);
    }
    out
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Move `reference` one unit of `mode` in `dir`: ±1 month, ±7 days, ±1 day.
///
/// Month steps clamp to the last day of the target month (Jan 31 + 1 month
/// = Feb 28/29). At the edges of chrono's date range the reference is
/// returned unchanged.
pub fn navigate(reference: NaiveDate, mode: ViewMode, dir: Direction) -> NaiveDate {
    let stepped = match (mode, dir) {
        (ViewMode::Month, Direction::Next) => reference.checked_add_months(Months::new(1)),
        (ViewMode::Month, Direction::Prev) => reference.checked_sub_months(Months::new(1)),
        (ViewMode::Week, Direction::Next) => reference.checked_add_days(Days::new(7)),
        (ViewMode::Week, Direction::Prev) => reference.checked_sub_days(Days::new(7)),
        (ViewMode::Day, Direction::Next) => reference.checked_add_days(Days::new(1)),
        (ViewMode::Day, Direction::Prev) => reference.checked_sub_days(Days::new(1)),
    };
    stepped.unwrap_or(reference)
}

/// Period title shown above a view.
pub fn title(reference: NaiveDate, mode: ViewMode) -> String {
    match mode {
        ViewMode::Month => reference.format("%B %Y").to_string(),
        ViewMode::Week => format!("Week of {}", reference.format("%-d %B %Y")),
        ViewMode::Day => reference.format("%-d %B %Y").to_string(),
    }
}

// ---------------------------------------------------------------------------
// Civil calendar helpers
// ---------------------------------------------------------------------------

/// Number of days in (`year`, `month`).
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}

/// Day-of-week of the 1st of (`year`, `month`), 0 = Sunday.
pub fn first_weekday(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
}

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
