//! Round trips against a local stand-in for the screener backend.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use screener_core::{Filter, Operator, ScreenRequest, ScreenerApi, ScreenerError};
use screener_http::{ClientConfig, HttpScreenerClient};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Backend {
    last_request: Arc<Mutex<Option<Value>>>,
}

async fn fields() -> Json<Value> {
    Json(json!({ "fields": ["sector", "symbol"] }))
}

async fn screener(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    *backend.last_request.lock().unwrap() = Some(body.clone());

    let sector = body["filters"][0]["value"].as_str().unwrap_or_default();
    match sector {
        "Technology" => (
            StatusCode::OK,
            Json(json!({
                "results": [
                    {
                        "symbol": "AAPL",
                        "sector": "Technology",
                        "latest_financials": {
                            "income_statement": {"revenue": 391035000000.0, "net_income": 93736000000.0}
                        }
                    },
                    {"symbol": "MSFT", "sector": "Technology", "latest_financials": {}}
                ]
            })),
        ),
        "Broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "Database error: connection refused" })),
        ),
        _ => (StatusCode::OK, Json(json!({ "results": [] }))),
    }
}

async fn company(Path(symbol): Path<String>) -> (StatusCode, Json<Value>) {
    if symbol != "AAPL" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Company not found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "company": {"symbol": "AAPL", "short_name": "Apple Inc.", "sector": "Technology"},
            "financials": [
                {"fiscal_year": 2024, "statement": "income_statement", "data": {"revenue": 391035000000.0}},
                {"fiscal_year": 2023, "statement": "income_statement", "data": {"revenue": 383285000000.0}},
                {"fiscal_year": 2024, "statement": "balancesheet_statement", "data": {"total_assets": 364980000000.0}}
            ]
        })),
    )
}

async fn spawn_backend() -> (HttpScreenerClient, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/fields", get(fields))
        .route("/screener", post(screener))
        .route("/company/:symbol", get(company))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(&format!("http://{addr}")).unwrap();
    (HttpScreenerClient::new(config).unwrap(), backend)
}

#[tokio::test]
async fn test_fields() {
    let (client, _) = spawn_backend().await;
    assert_eq!(client.fields().await.unwrap(), vec!["sector", "symbol"]);
}

#[tokio::test]
async fn test_screen_posts_filters_verbatim() {
    let (client, backend) = spawn_backend().await;
    let request = ScreenRequest::new(vec![
        Filter::new("sector", Operator::Eq, "Technology"),
        Filter::new("short_name", Operator::Contains, "App"),
    ]);

    let rows = client.screen(&request).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol(), Some("AAPL"));
    assert!(rows[0].financial("revenue").is_some());

    let sent = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(
        sent,
        json!({
            "filters": [
                {"field": "sector", "op": "=", "value": "Technology"},
                {"field": "short_name", "op": "like", "value": "App"}
            ],
            "limit": 100,
            "offset": 0,
            "columns": null
        })
    );
}

#[tokio::test]
async fn test_screen_empty_result() {
    let (client, _) = spawn_backend().await;
    let request = ScreenRequest::new(vec![Filter::new("sector", Operator::Eq, "Utilities")]);
    assert!(client.screen(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_screen_server_error_carries_detail() {
    let (client, _) = spawn_backend().await;
    let request = ScreenRequest::new(vec![Filter::new("sector", Operator::Eq, "Broken")]);

    let err = client.screen(&request).await.unwrap_err();
    match &err {
        ScreenerError::Server { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Database error: connection refused");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_reason(), "Database error: connection refused");
}

#[tokio::test]
async fn test_company() {
    let (client, _) = spawn_backend().await;
    let detail = client.company("AAPL").await.unwrap();
    assert_eq!(detail.attribute("short_name"), Some(&json!("Apple Inc.")));
    assert_eq!(detail.financials.len(), 3);
}

#[tokio::test]
async fn test_company_not_found() {
    let (client, _) = spawn_backend().await;
    let err = client.company("ZZZZ").await.unwrap_err();
    assert!(matches!(err, ScreenerError::NotFound(symbol) if symbol == "ZZZZ"));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpScreenerClient::new(ClientConfig::new(&format!("http://{addr}")).unwrap()).unwrap();
    assert!(matches!(
        client.fields().await,
        Err(ScreenerError::Network(_))
    ));
}
