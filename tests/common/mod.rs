#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use activity_tracker::migration::{Migrator, MigratorTrait};
use activity_tracker::{ActivityTracker, DatabaseConfig, ExtensionInfo};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Tracker over a fresh, migrated in-memory SQLite database.
///
/// A single pooled connection keeps every query on the same in-memory file.
pub async fn tracker() -> ActivityTracker {
    init_tracing();
    let conn = DatabaseConfig::new("sqlite::memory:")
        .with_max_connections(1)
        .connect()
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&conn, None).await.expect("run migrations");
    ActivityTracker::new(conn, ExtensionInfo::new("activity-test", "0.3.1"))
}

/// Tracker over a migrated SQLite file inside `dir`, with the default pool size.
pub async fn file_tracker(dir: &Path) -> ActivityTracker {
    init_tracing();
    let url = format!("sqlite://{}?mode=rwc", dir.join("activity.db").display());
    let conn = DatabaseConfig::new(url)
        .connect()
        .await
        .expect("connect to sqlite file");
    Migrator::up(&conn, None).await.expect("run migrations");
    ActivityTracker::new(conn, ExtensionInfo::new("activity-test", "0.3.1"))
}

/// Tracker over an in-memory database whose schema was never created.
pub async fn unmigrated_tracker() -> ActivityTracker {
    init_tracing();
    let conn = DatabaseConfig::new("sqlite::memory:")
        .with_max_connections(1)
        .connect()
        .await
        .expect("connect to in-memory sqlite");
    ActivityTracker::new(conn, ExtensionInfo::new("activity-test", "0.3.1"))
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{addr}")
}

async fn validation_status(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    let feature = params.get("feature").map(String::as_str).unwrap_or_default();
    match feature {
        "Slow Checkout" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            (StatusCode::OK, Json(json!({ "status": "Pass" })))
        }
        "User Authentication" => (StatusCode::OK, Json(json!({ "status": "Pass" }))),
        "Payment Gateway" => (StatusCode::OK, Json(json!({ "status": "Fail" }))),
        "Session Timeout" => (StatusCode::OK, Json(json!({ "status": "Incomplete" }))),
        "Dark Mode" => (StatusCode::OK, Json(json!({ "status": "Skipped" }))),
        "Audit Log" => (StatusCode::OK, Json(json!({}))),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Feature not found" })),
        ),
    }
}

/// Mock validation service with a fixed feature table; also returns its hit counter.
pub async fn validation_server() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/api/validation/status", get(validation_status))
        .with_state(Arc::clone(&hits));
    (serve(router).await, hits)
}

/// Query strings received by the mock inventory service, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn inventory() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Laptop", "category": "Electronics", "stockStatus": "InStock" }),
        json!({ "id": 2, "name": "T-Shirt", "category": "Apparel", "stockStatus": "OutOfStock" }),
        json!({ "id": 3, "name": "Headphones", "category": "Electronics", "stockStatus": "InStock" }),
        json!({ "id": 4, "name": "Dress Shirt", "category": "Apparel", "stockStatus": "InStock" }),
        json!({ "id": 5, "name": "Shirt Printer", "category": "Electronics", "stockStatus": "OutOfStock" }),
    ]
}

async fn inventory_search(
    State(log): State<RequestLog>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    log.lock().unwrap().push(params.clone());

    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    if q == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "boom" })));
    }
    if q.starts_with("slow") {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    let field = |item: &Value, key: &str| item[key].as_str().unwrap_or_default().to_string();
    let results: Vec<Value> = inventory()
        .into_iter()
        .filter(|item| q.is_empty() || field(item, "name").to_lowercase().contains(&q))
        .filter(|item| {
            params
                .get("category")
                .map_or(true, |c| c.is_empty() || &field(item, "category") == c)
        })
        .filter(|item| {
            params
                .get("stockStatus")
                .map_or(true, |s| s.is_empty() || &field(item, "stockStatus") == s)
        })
        .collect();

    (StatusCode::OK, Json(json!({ "results": results })))
}

/// Mock inventory service; `q=slow*` answers after a delay, `q=boom` fails.
pub async fn inventory_server() -> (String, RequestLog) {
    let log = RequestLog::default();
    let router = Router::new()
        .route("/api/inventory/search", get(inventory_search))
        .with_state(Arc::clone(&log));
    (serve(router).await, log)
}
