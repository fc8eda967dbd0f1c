use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::{ForecastWriter, MeasurementReader, StorageError, StorageProbe};
use crate::domain::{ForecastResult, Measurement, NewForecast};

#[derive(Debug, Default)]
struct MemoryState {
    /// Raw rows, `None` mirrors a NULL `cumulative_kwh`.
    measurements: Vec<(DateTime<Utc>, Option<f64>)>,
    forecasts: Vec<ForecastResult>,
}

/// Process-local storage used when the service is built without `db`.
#[derive(Debug, Default)]
pub struct MemoryRepo {
    state: Mutex<MemoryState>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measurements<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, Option<f64>)>,
    {
        let repo = Self::default();
        repo.state.lock().measurements.extend(rows);
        repo
    }

    pub fn insert_measurement(&self, measured_at: DateTime<Utc>, cumulative_kwh: Option<f64>) {
        self.state
            .lock()
            .measurements
            .push((measured_at, cumulative_kwh));
    }

    /// Forecast rows in insertion order.
    pub fn forecasts(&self) -> Vec<ForecastResult> {
        self.state.lock().forecasts.clone()
    }
}

#[async_trait]
impl MeasurementReader for MemoryRepo {
    async fn load_measurements(&self) -> Result<Vec<Measurement>, StorageError> {
        let mut rows: Vec<Measurement> = self
            .state
            .lock()
            .measurements
            .iter()
            .filter_map(|(at, kwh)| kwh.map(|kwh| Measurement::new(*at, kwh)))
            .collect();
        rows.sort_by_key(|m| m.measured_at);
        Ok(rows)
    }
}

#[async_trait]
impl ForecastWriter for MemoryRepo {
    async fn save_forecast(&self, forecast: &NewForecast) -> Result<ForecastResult, StorageError> {
        let mut state = self.state.lock();

        // Keep created_at strictly increasing like a serial insert would.
        let mut created_at = Utc::now();
        if let Some(last) = state.forecasts.last() {
            if created_at <= last.created_at {
                created_at = last.created_at + Duration::microseconds(1);
            }
        }

        let row = ForecastResult {
            id: state.forecasts.len() as i64 + 1,
            window_start: forecast.window.start,
            window_end: forecast.window.end,
            predicted_total_kwh: forecast.predicted_total_kwh,
            created_at,
        };
        state.forecasts.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl StorageProbe for MemoryRepo {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
