use std::sync::Arc;
use std::time::Instant;

use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use super::ForecastError;
use crate::domain::{ForecastResult, ForecastWindow, NewForecast, HORIZON_STEPS};
use crate::ml::{ModelAdapter, ModelLoader};
use crate::repo::{ForecastWriter, MeasurementReader};

/// Runs one forecast end to end: read history, predict, sum, persist.
///
/// Holds no state between runs. Every call reloads the model and inserts a new
/// row, so two calls against the same history produce two identical forecasts.
pub struct ForecastOrchestrator {
    reader: Arc<dyn MeasurementReader>,
    model: ModelAdapter,
    writer: Arc<dyn ForecastWriter>,
    tz: Tz,
}

impl ForecastOrchestrator {
    pub fn new(
        reader: Arc<dyn MeasurementReader>,
        loader: Arc<dyn ModelLoader>,
        writer: Arc<dyn ForecastWriter>,
        tz: Tz,
    ) -> Self {
        Self {
            reader,
            model: ModelAdapter::new(loader),
            writer,
            tz,
        }
    }

    pub async fn run_forecast(&self) -> Result<ForecastResult, ForecastError> {
        let started = Instant::now();
        info!("forecast run started");
        let result = self.execute().await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(forecast) => info!(
                id = forecast.id,
                window_start = %forecast.window_start,
                window_end = %forecast.window_end,
                predicted_total_kwh = forecast.predicted_total_kwh,
                duration_ms,
                "forecast stored"
            ),
            Err(e) if e.is_domain_failure() => {
                warn!(error = %e, kind = e.kind(), duration_ms, "forecast run failed")
            }
            Err(e) => error!(error = %e, kind = e.kind(), duration_ms, "forecast run failed"),
        }
        result
    }

    async fn execute(&self) -> Result<ForecastResult, ForecastError> {
        let measurements = self.reader.load_measurements().await?;
        let last = measurements.last().ok_or(ForecastError::NoMeasurementData)?;

        let last_date = last.local_date(&self.tz);
        let window = ForecastWindow::following(last_date).ok_or_else(|| {
            ForecastError::StorageFailure(format!(
                "last measurement at {} is outside the supported date range",
                last.measured_at
            ))
        })?;
        debug!(
            measurements = measurements.len(),
            %last_date,
            window_start = %window.start,
            "forecast window derived"
        );

        let increments = self.model.predict(HORIZON_STEPS).await?;
        let draft = NewForecast {
            window,
            predicted_total_kwh: sum_increments(&increments),
        };

        Ok(self.writer.save_forecast(&draft).await?)
    }
}

/// Plain sum of predicted increments.
///
/// Negative increments are physically implausible for a generation counter but
/// are kept as-is; they are only reported.
pub fn sum_increments(increments: &[f64]) -> f64 {
    let negative = increments.iter().filter(|v| **v < 0.0).count();
    if negative > 0 {
        warn!(negative, total = increments.len(), "model predicted negative increments");
    }
    increments.iter().sum()
}
