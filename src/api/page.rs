//! HTML pages for the forecast endpoint.

use std::any::Any;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::app::AppState;
use crate::domain::ForecastResult;
use crate::forecast::ForecastError;

#[derive(Template)]
#[template(path = "forecast.html")]
struct ForecastTemplate {
    id: i64,
    window_start: String,
    window_end: String,
    total_kwh: String,
    created_at: String,
}

impl From<&ForecastResult> for ForecastTemplate {
    fn from(forecast: &ForecastResult) -> Self {
        Self {
            id: forecast.id,
            window_start: forecast.window_start.to_string(),
            window_end: forecast.window_end.to_string(),
            total_kwh: format!("{:.2}", forecast.predicted_total_kwh),
            created_at: forecast.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: &'a str,
    summary: &'a str,
    detail: &'a str,
}

/// GET / - Run a forecast and render it
pub async fn forecast_page(State(state): State<AppState>) -> Response {
    match state.orchestrator.run_forecast().await {
        Ok(forecast) => render_forecast(&forecast),
        Err(e) => render_failure(&e),
    }
}

pub fn render_forecast(forecast: &ForecastResult) -> Response {
    match ForecastTemplate::from(forecast).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
            "The forecast was stored but the page could not be rendered.",
            &e.to_string(),
        ),
    }
}

pub fn render_failure(err: &ForecastError) -> Response {
    if err.is_domain_failure() {
        render_error(
            StatusCode::BAD_REQUEST,
            "Forecast unavailable",
            "A forecast could not be produced from the current data.",
            &err.to_string(),
        )
    } else {
        render_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
            "The forecast service failed.",
            &err.to_string(),
        )
    }
}

fn render_error(status: StatusCode, title: &str, summary: &str, detail: &str) -> Response {
    let page = ErrorTemplate {
        title,
        summary,
        detail,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render error page");
            (status, format!("{title}: {detail}")).into_response()
        }
    }
}

/// Response for a handler that panicked, used by `CatchPanicLayer`.
pub fn panic_page(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "request handler panicked");

    render_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error",
        "The request handler crashed.",
        &detail,
    )
}
