use std::time::Instant;

use axum::{extract::State, routing::get, Router};

use super::{error::ApiError, response::ApiResponse};
use crate::{app::AppState, domain::ForecastResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/forecast", get(get_forecast))
}

/// GET /api/v1/forecast - Run a forecast and return the stored row
pub async fn get_forecast(
    State(st): State<AppState>,
) -> Result<ApiResponse<ForecastResult>, ApiError> {
    let start = Instant::now();
    let forecast = st.orchestrator.run_forecast().await?;
    Ok(ApiResponse::success(forecast).with_duration(start.elapsed().as_millis() as u64))
}
