use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One reading of the inverter's lifetime generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measured_at: DateTime<Utc>,
    /// Total energy generated to date (kWh)
    pub cumulative_kwh: f64,
}

impl Measurement {
    pub fn new(measured_at: DateTime<Utc>, cumulative_kwh: f64) -> Self {
        Self {
            measured_at,
            cumulative_kwh,
        }
    }

    /// Calendar date of the reading at the site.
    pub fn local_date(&self, tz: &Tz) -> NaiveDate {
        self.measured_at.with_timezone(tz).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Seoul;

    #[test]
    fn test_local_date_crosses_midnight_in_site_timezone() {
        // 20:00 UTC is 05:00 the next day in Seoul (UTC+9)
        let m = Measurement::new(Utc.with_ymd_and_hms(2025, 6, 10, 20, 0, 0).unwrap(), 1.0);
        assert_eq!(m.local_date(&Seoul), NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(
            m.local_date(&chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
    }
}
