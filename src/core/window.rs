//! Recurring inclusion window.
//!
//! A run on a weekday collects the messages sent between the start hour of
//! the previous business day and the end hour of today. Mondays reach back to
//! Friday so that the weekend is covered; weekend runs do nothing.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// Half-open interval `[start, end)` in the configured civil timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    /// `true` when `t` falls inside `[start, end)`, whatever its offset.
    pub fn contains<O: TimeZone>(&self, t: &DateTime<O>) -> bool {
        let local = t.with_timezone(&self.start.timezone());
        self.start <= local && local < self.end
    }

    /// Calendar date handed to the coarse fetch.
    pub fn since_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn duration(&self) -> TimeDelta {
        self.end.clone() - self.start.clone()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%a %Y-%m-%d %H:%M %Z"),
            self.end.format("%a %Y-%m-%d %H:%M %Z")
        )
    }
}

/// Outcome of the window calculation, consumed before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowResult {
    Applicable(TimeWindow),
    NotApplicable(Weekday),
}

/// Local hours bounding the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WindowHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 9,
        }
    }
}

/// Compute the window for a run happening at `now`.
pub fn compute_window(now: &DateTime<Tz>, hours: WindowHours) -> WindowResult {
    let today = now.date_naive();
    let weekday = today.weekday();

    let days_back = match weekday {
        Weekday::Sat | Weekday::Sun => return WindowResult::NotApplicable(weekday),
        Weekday::Mon => 3,
        _ => 1,
    };

    let tz = now.timezone();
    let start_day = today - Days::new(days_back);

    WindowResult::Applicable(TimeWindow {
        start: local_instant(&tz, start_day, hours.start_hour),
        end: local_instant(&tz, today, hours.end_hour),
    })
}

/// Resolve `day` at `hour:00` local time.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times skipped by
/// a DST gap move forward to the first minute that exists.
fn local_instant(tz: &Tz, day: NaiveDate, hour: u32) -> DateTime<Tz> {
    let mut naive: NaiveDateTime = day.and_time(NaiveTime::MIN) + TimeDelta::hours(hour as i64);

    for _ in 0..=24 * 60 {
        if let Some(t) = tz.from_local_datetime(&naive).earliest() {
            return t;
        }
        naive += TimeDelta::minutes(1);
    }

    tz.from_utc_datetime(&naive)
}

/// Serializable view of a window result for `window --json`.
#[derive(Debug, Serialize)]
pub struct WindowView {
    pub applicable: bool,
    pub weekday: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub hours: Option<f64>,
}

impl WindowView {
    pub fn new(now: &DateTime<Tz>, result: &WindowResult) -> Self {
        match result {
            WindowResult::Applicable(w) => Self {
                applicable: true,
                weekday: now.weekday().to_string(),
                start: Some(w.start.to_rfc3339()),
                end: Some(w.end.to_rfc3339()),
                hours: Some(w.duration().num_seconds() as f64 / 3600.0),
            },
            WindowResult::NotApplicable(day) => Self {
                applicable: false,
                weekday: day.to_string(),
                start: None,
                end: None,
                hours: None,
            },
        }
    }
}
