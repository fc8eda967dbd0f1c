use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Model steps per forecast day (hourly granularity).
pub const STEPS_PER_DAY: usize = 24;
/// Days covered by one forecast, inclusive of both window ends.
pub const HORIZON_DAYS: usize = 6;
/// Steps requested from the model on every run.
pub const HORIZON_STEPS: usize = STEPS_PER_DAY * HORIZON_DAYS;

/// Inclusive date range a single forecast covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ForecastWindow {
    /// Window starting the day after `last_date`.
    ///
    /// Returns `None` only when the dates leave chrono's representable range.
    pub fn following(last_date: NaiveDate) -> Option<Self> {
        let start = last_date.checked_add_days(Days::new(1))?;
        let end = start.checked_add_days(Days::new(HORIZON_DAYS as u64 - 1))?;
        Some(Self { start, end })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A forecast that has not been written yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewForecast {
    pub window: ForecastWindow,
    pub predicted_total_kwh: f64,
}

/// A persisted forecast row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub id: i64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub predicted_total_kwh: f64,
    pub created_at: DateTime<Utc>,
}

impl ForecastResult {
    pub fn window(&self) -> ForecastWindow {
        ForecastWindow {
            start: self.window_start,
            end: self.window_end,
        }
    }
}
