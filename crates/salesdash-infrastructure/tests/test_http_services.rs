use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, response::IntoResponse};
use salesdash_core::DashError;
use salesdash_core::service::{AskService, HealthService, SalesDataService};
use salesdash_infrastructure::{
    BackendClient, HttpAskService, HttpHealthService, HttpSalesDataService,
};
use serde_json::{Value, json};

/// Serves `app` on an ephemeral port and returns its base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_ask_returns_answer() {
    let app = Router::new().route(
        "/api/ai",
        post(|Json(body): Json<Value>| async move {
            let question = body["question"].as_str().unwrap_or_default().to_string();
            Json(json!({ "answer": format!("echo: {}", question) }))
        }),
    );
    let base = spawn_backend(app).await;

    let service = HttpAskService::new(client(&base));
    let answer = service.ask("What is Q3 revenue?").await.unwrap();

    assert_eq!(answer, "echo: What is Q3 revenue?");
}

#[tokio::test]
async fn test_ask_non_2xx_is_http_status_error() {
    let app = Router::new().route(
        "/api/ai",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
    );
    let base = spawn_backend(app).await;

    let err = HttpAskService::new(client(&base)).ask("hi").await.unwrap_err();

    match err {
        DashError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_ask_missing_answer_is_malformed() {
    let app = Router::new().route(
        "/api/ai",
        post(|| async { Json(json!({ "response": "wrong field" })) }),
    );
    let base = spawn_backend(app).await;

    let err = HttpAskService::new(client(&base)).ask("hi").await.unwrap_err();
    assert!(err.is_malformed(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_ask_times_out() {
    let app = Router::new().route(
        "/api/ai",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "answer": "too late" }))
        }),
    );
    let base = spawn_backend(app).await;

    let backend = BackendClient::new(&base, Duration::from_millis(200)).unwrap();
    let err = HttpAskService::new(backend).ask("hi").await.unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpHealthService::new(client(&format!("http://{}", addr)))
        .fetch_health()
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_health_degraded_503_still_returns_report() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "components": { "db": false } })),
            )
                .into_response()
        }),
    );
    let base = spawn_backend(app).await;

    let report = HttpHealthService::new(client(&base))
        .fetch_health()
        .await
        .unwrap();

    assert_eq!(report.payload["status"], "degraded");
    assert_eq!(report.payload["components"]["db"], false);
}

#[tokio::test]
async fn test_health_502_without_document_is_error() {
    let app = Router::new().route(
        "/health",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn_backend(app).await;

    let err = HttpHealthService::new(client(&base))
        .fetch_health()
        .await
        .unwrap_err();

    assert!(matches!(err, DashError::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_health_error_body_is_truncated() {
    let app = Router::new().route(
        "/health",
        get(|| async { (StatusCode::BAD_GATEWAY, "x".repeat(5_000)) }),
    );
    let base = spawn_backend(app).await;

    let err = HttpHealthService::new(client(&base))
        .fetch_health()
        .await
        .unwrap_err();

    match err {
        DashError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body.chars().count(), 203);
            assert!(body.ends_with("..."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_sales_endpoints() {
    let app = Router::new()
        .route(
            "/api/data",
            get(|| async {
                Json(json!({
                    "salesReps": [{
                        "id": 1,
                        "name": "Alice",
                        "role": "Senior Sales Executive",
                        "region": "North America",
                        "skills": ["Negotiation"],
                        "deals": [
                            { "client": "Acme Corp", "value": 120000, "status": "Closed Won" }
                        ],
                        "clients": [{
                            "name": "Acme Corp",
                            "industry": "Manufacturing",
                            "contact": "alice@acme.com"
                        }]
                    }]
                }))
            }),
        )
        .route(
            "/api/sales-analytics",
            get(|| async {
                Json(json!({
                    "totalDealCount": 1,
                    "dealStatusSummary": { "Closed Won": 1, "In Progress": 0, "Closed Lost": 0 },
                    "totalDealValue": 120000,
                    "averageDealValue": 120000.0,
                    "regionDistribution": ["North America"]
                }))
            }),
        );
    let base = spawn_backend(app).await;
    let service = HttpSalesDataService::new(client(&base));

    let data = service.fetch_sales_data().await.unwrap();
    assert_eq!(data.sales_reps.len(), 1);
    assert_eq!(data.sales_reps[0].deals[0].value, 120_000.0);

    let analytics = service.fetch_analytics().await.unwrap();
    assert_eq!(analytics.total_deal_count, 1);
    assert_eq!(analytics.status_count("Closed Won"), 1);
}
