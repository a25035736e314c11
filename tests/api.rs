//! REST API tests against the seeded in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use delivery_fee::domain::{RepositoryProvider, WeatherObservation};
use delivery_fee::interfaces::http::modules::health::HealthState;
use delivery_fee::{create_api_router, AppState, InMemoryRepositoryProvider};

async fn setup() -> (Router, Arc<dyn RepositoryProvider>) {
    let repos: Arc<dyn RepositoryProvider> =
        Arc::new(InMemoryRepositoryProvider::seeded().await.unwrap());
    let router = create_api_router(
        AppState::new(repos.clone()),
        HealthState::new(None, false),
        None,
    );
    (router, repos)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn observe(repos: &Arc<dyn RepositoryProvider>, observation: WeatherObservation) {
    repos.weather().save(observation).await.unwrap();
}

// ── Delivery fee ───────────────────────────────────────────────

#[tokio::test]
async fn base_fee_only_without_weather() {
    let (router, _) = setup().await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Tallinn", "vehicle_type": "Car"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_fee"], 4.0);
    assert_eq!(body["data"]["message"], "Total delivery fee: 4.00");
    assert_eq!(body["data"]["breakdown"]["base_fee"], 4.0);
}

#[tokio::test]
async fn cold_snowy_weather_adds_extra_fees() {
    let (router, repos) = setup().await;
    observe(
        &repos,
        WeatherObservation::new("Tallinn-Harku", 26038, Utc::now())
            .with_air_temperature(dec!(-12.0))
            .with_wind_speed(dec!(3.0))
            .with_phenomenon("Light snow shower"),
    )
    .await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Tallinn", "vehicle_type": "Scooter"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_fee"], 5.5);
    assert_eq!(body["data"]["breakdown"]["air_temperature_fee"], 1.0);
    assert_eq!(body["data"]["breakdown"]["phenomenon_fee"], 1.0);
    assert_eq!(body["data"]["message"], "Total delivery fee: 5.50");
}

#[tokio::test]
async fn strong_wind_forbids_bike() {
    let (router, repos) = setup().await;
    observe(
        &repos,
        WeatherObservation::new("Tallinn-Harku", 26038, Utc::now()).with_wind_speed(dec!(25.0)),
    )
    .await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Tallinn", "vehicle_type": "Bike"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Usage of selected vehicle type is forbidden"));
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let (router, _) = setup().await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Narva", "vehicle_type": "Car"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No base fee found for city: Narva and vehicle type: Car"
    );
}

#[tokio::test]
async fn blank_input_is_bad_request() {
    let (router, _) = setup().await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "", "vehicle_type": "Car"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Tartu", "vehicle_type": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Tartu"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Base fees ──────────────────────────────────────────────────

#[tokio::test]
async fn base_fee_crud_lifecycle() {
    let (router, _) = setup().await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/base-fees",
        Some(json!({"city": "Narva", "vehicle_type": "Car", "fee": 3.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/base-fees",
        Some(json!({"city": "Narva", "vehicle_type": "Car", "fee": 2.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/v1/base-fees/{}", id),
        Some(json!({"city": "Narva", "vehicle_type": "Car", "fee": 3.25})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fee"], 3.25);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Narva", "vehicle_type": "Car"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Total delivery fee: 3.25");

    let (status, body) = send(&router, "DELETE", &format!("/api/v1/base-fees/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&router, "GET", &format!("/api/v1/base-fees/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "DELETE", &format!("/api/v1/base-fees/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_missing_base_fee_is_not_found() {
    let (router, _) = setup().await;

    let (status, _) = send(
        &router,
        "PUT",
        "/api/v1/base-fees/9999",
        Some(json!({"city": "Narva", "vehicle_type": "Car", "fee": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn base_fee_batch_is_all_or_nothing() {
    let (router, _) = setup().await;
    let (_, before) = send(&router, "GET", "/api/v1/base-fees", None).await;
    let count = before["data"].as_array().unwrap().len();
    assert_eq!(count, 9);

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/base-fees/batch",
        Some(json!([
            {"city": "Narva", "vehicle_type": "Car", "fee": 3.0},
            {"city": "Tallinn", "vehicle_type": "Car", "fee": 9.0}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/base-fees/batch",
        Some(json!([
            {"city": "Narva", "vehicle_type": "Car", "fee": 3.0},
            {"city": "Narva", "vehicle_type": "Bike", "fee": -1.0}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, after) = send(&router, "GET", "/api/v1/base-fees", None).await;
    assert_eq!(after["data"].as_array().unwrap().len(), count);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/base-fees/batch",
        Some(json!([
            {"city": "Narva", "vehicle_type": "Car", "fee": 3.0},
            {"city": "Narva", "vehicle_type": "Bike", "fee": 2.0}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let (router, _) = setup().await;

    let (status, body) = send(&router, "POST", "/api/v1/base-fees/batch", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "items: batch must not be empty");
}

// ── Extra fees ─────────────────────────────────────────────────

#[tokio::test]
async fn extra_fee_validation_and_creation() {
    let (router, repos) = setup().await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/extra-fees",
        Some(json!({
            "condition_type": "HUMIDITY",
            "vehicle_type": "Bike",
            "fee": 1.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/extra-fees",
        Some(json!({
            "condition_type": "AIR_TEMPERATURE",
            "vehicle_type": "Bike",
            "fee": 1.0,
            "min_value": 5.0,
            "max_value": -5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/extra-fees",
        Some(json!({
            "condition_type": "WEATHER_PHENOMENON",
            "vehicle_type": "Car",
            "fee": 0.0,
            "weather_phenomenon": "tornado",
            "is_forbidden": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["condition_type"], "WEATHER_PHENOMENON");
    assert_eq!(body["data"]["is_forbidden"], true);

    observe(
        &repos,
        WeatherObservation::new("Pärnu", 41803, Utc::now()).with_phenomenon("Tornado"),
    )
    .await;
    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/delivery-fee",
        Some(json!({"city": "Pärnu", "vehicle_type": "Car"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn extra_fee_update_and_delete() {
    let (router, _) = setup().await;
    let (_, list) = send(&router, "GET", "/api/v1/extra-fees", None).await;
    let rules = list["data"].as_array().unwrap();
    assert_eq!(rules.len(), 17);
    let id = rules[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/v1/extra-fees/{}", id),
        Some(json!({
            "condition_type": "AIR_TEMPERATURE",
            "vehicle_type": "Scooter",
            "fee": 1.5,
            "max_value": -10.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fee"], 1.5);
    assert_eq!(body["data"]["min_value"], Value::Null);

    let (status, _) = send(&router, "DELETE", &format!("/api/v1/extra-fees/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, "GET", &format!("/api/v1/extra-fees/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Weather ────────────────────────────────────────────────────

#[tokio::test]
async fn latest_observation_by_city() {
    let (router, repos) = setup().await;

    let (status, _) = send(
        &router,
        "GET",
        "/api/v1/weather-observations/latest?city=Tartu",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    observe(
        &repos,
        WeatherObservation::new("Tartu-Tõravere", 26242, Utc::now()).with_air_temperature(dec!(1.5)),
    )
    .await;

    let (status, body) = send(
        &router,
        "GET",
        "/api/v1/weather-observations/latest?city=tartu",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["station_name"], "Tartu-Tõravere");
    assert_eq!(body["data"]["air_temperature"], 1.5);

    let (status, body) = send(&router, "GET", "/api/v1/weather-observations?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn manual_import_without_importer_is_unavailable() {
    let (router, _) = setup().await;

    let (status, body) = send(&router, "POST", "/api/v1/weather-observations/import", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Weather import is disabled");
}

// ── Service endpoints ──────────────────────────────────────────

#[tokio::test]
async fn health_reports_in_memory_store() {
    let (router, _) = setup().await;

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "in-memory");
    assert_eq!(body["weather_import"], "disabled");
}

#[tokio::test]
async fn openapi_document_lists_fee_endpoint() {
    let (router, _) = setup().await;

    let (status, body) = send(&router, "GET", "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/delivery-fee"]["post"].is_object());
}

#[tokio::test]
async fn metrics_route_absent_without_recorder() {
    let (router, _) = setup().await;

    let (status, _) = send(&router, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
