mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono_tz::Asia::Seoul;
use common::{seoul, FixedLoader, PanickingStore, SlowLoader, UnreachableStore};
use solar_forecast::api;
use solar_forecast::app::AppState;
use solar_forecast::ml::ModelLoader;
use solar_forecast::repo::{MemoryRepo, Repositories};
use tower::ServiceExt;

fn app(repos: Repositories, loader: Arc<dyn ModelLoader>) -> Router {
    api::router(AppState::new(repos, loader, Seoul))
}

fn seeded_repo() -> Arc<MemoryRepo> {
    Arc::new(MemoryRepo::with_measurements([
        (seoul(2025, 6, 9, 12), Some(4_200.0)),
        (seoul(2025, 6, 10, 18), Some(4_260.0)),
    ]))
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_renders_forecast() {
    let repo = seeded_repo();
    let router = app(Repositories::from_store(repo.clone()), FixedLoader::scenario());

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("2025-06-11"));
    assert!(body.contains("2025-06-16"));
    assert!(body.contains("523.40"));
    assert_eq!(repo.forecasts().len(), 1);
}

#[tokio::test]
async fn test_slow_model_run_completes_and_stores() {
    let repo = seeded_repo();
    let loader = Arc::new(SlowLoader {
        delay: Duration::from_millis(1500),
        value: 1.0,
    });
    let router = app(Repositories::from_store(repo.clone()), loader);

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("144.00"));
    assert_eq!(repo.forecasts().len(), 1);
}

#[tokio::test]
async fn test_each_request_stores_a_new_forecast() {
    let repo = seeded_repo();
    let router = app(Repositories::from_store(repo.clone()), FixedLoader::constant(1.0));

    get(router.clone(), "/").await;
    get(router, "/").await;
    assert_eq!(repo.forecasts().len(), 2);
}

#[tokio::test]
async fn test_index_without_measurements_is_bad_request() {
    let repo = Arc::new(MemoryRepo::new());
    let router = app(Repositories::from_store(repo.clone()), FixedLoader::constant(1.0));

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no measurement data available"));
    assert!(repo.forecasts().is_empty());
}

#[tokio::test]
async fn test_index_with_broken_model_is_bad_request() {
    let router = app(Repositories::from_store(seeded_repo()), FixedLoader::broken("bad weights"));

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("bad weights"));
}

#[tokio::test]
async fn test_index_with_storage_down_is_server_error() {
    let router = app(Repositories::from_store(Arc::new(UnreachableStore)), FixedLoader::constant(1.0));

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("<pre>"));
    assert!(body.contains("connection refused"));
}

#[tokio::test]
async fn test_handler_panic_is_server_error() {
    let router = app(Repositories::from_store(Arc::new(PanickingStore)), FixedLoader::constant(1.0));

    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("measurement cursor corrupted"));
}

#[tokio::test]
async fn test_json_forecast_endpoint() {
    let router = app(Repositories::from_store(seeded_repo()), FixedLoader::scenario());

    let (status, body) = get(router, "/api/v1/forecast").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["window_start"], "2025-06-11");
    assert_eq!(json["data"]["window_end"], "2025-06-16");
    assert_eq!(json["data"]["predicted_total_kwh"], 523.4);
}

#[tokio::test]
async fn test_json_forecast_error_envelope() {
    let router = app(Repositories::from_store(Arc::new(MemoryRepo::new())), FixedLoader::constant(1.0));

    let (status, body) = get(router, "/api/v1/forecast").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "NoMeasurementData");
}

#[tokio::test]
async fn test_health_endpoints() {
    let healthy = app(Repositories::from_store(seeded_repo()), FixedLoader::constant(1.0));
    assert_eq!(get(healthy.clone(), "/health/live").await.0, StatusCode::OK);
    assert_eq!(get(healthy.clone(), "/health/ready").await.0, StatusCode::OK);

    let (status, body) = get(healthy, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["checks"]["storage"]["status"], "healthy");

    let down = app(Repositories::from_store(Arc::new(UnreachableStore)), FixedLoader::constant(1.0));
    assert_eq!(get(down.clone(), "/health/live").await.0, StatusCode::OK);
    assert_eq!(get(down.clone(), "/health/ready").await.0, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(get(down, "/health").await.0, StatusCode::SERVICE_UNAVAILABLE);
}
