use super::*;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::{columns::ColumnDescriptor, domain::RequestId, error::ErrorKind, query::TableQuery};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    bodies: Arc<Mutex<Vec<Value>>>,
    cache_headers: Arc<Mutex<Vec<String>>>,
}

async fn handle_customers(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let fetch_id = body["fetchId"].clone();
    state.bodies.lock().await.push(body);
    if let Some(value) = headers.get("cache-control").and_then(|v| v.to_str().ok()) {
        state.cache_headers.lock().await.push(value.to_string());
    }
    Json(json!({
        "fetchId": fetch_id,
        "data": [
            { "firstName": "Mary", "lastName": "Smith" },
            { "firstName": "Patricia", "lastName": "Johnson" }
        ],
        "recordsFiltered": 2,
        "recordsTotal": 599
    }))
}

async fn handle_wrong_id(Json(body): Json<Value>) -> Json<Value> {
    let fetch_id = body["fetchId"].as_u64().unwrap_or(0) + 1;
    Json(json!({
        "fetchId": fetch_id,
        "data": [],
        "recordsFiltered": 0,
        "recordsTotal": 0
    }))
}

async fn handle_garbage() -> &'static str {
    "<html>not json</html>"
}

async fn handle_missing_fields(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "fetchId": body["fetchId"] }))
}

async fn handle_failure() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn spawn_table_server() -> anyhow::Result<(String, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/datatable/customers", post(handle_customers))
        .route("/wrong-id", post(handle_wrong_id))
        .route("/garbage", post(handle_garbage))
        .route("/missing-fields", post(handle_missing_fields))
        .route("/failure", post(handle_failure))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn gateway(base: &str, path: &str) -> HttpFetchGateway {
    HttpFetchGateway::new(Url::parse(&format!("{base}{path}")).expect("endpoint url"))
}

fn request(id: u64) -> FetchRequest {
    let mut query = TableQuery::with_page_size(20);
    query.page_index = 1;
    query.filters.insert("lastName".into(), "S".into());
    FetchRequest::build(
        RequestId(id),
        &query,
        &[ColumnDescriptor::path("lastName", "Last Name")],
    )
}

#[tokio::test]
async fn posts_wire_body_and_parses_page() {
    let (base, state) = spawn_table_server().await.expect("spawn server");
    let gateway = gateway(&base, "/api/datatable/customers");

    let page = gateway.fetch(&request(4)).await.expect("page");

    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.filtered_count, 2);
    assert_eq!(page.total_count, 599);

    let bodies = state.bodies.lock().await;
    assert_eq!(
        bodies.as_slice(),
        &[json!({
            "fetchId": 4,
            "limit": 20,
            "offset": 20,
            "filters": [{ "id": "lastName", "value": "S" }],
            "orders": []
        })]
    );
    assert_eq!(state.cache_headers.lock().await.as_slice(), &["no-cache".to_string()]);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (base, _) = spawn_table_server().await.expect("spawn server");
    let err = gateway(&base, "/failure")
        .fetch(&request(1))
        .await
        .expect_err("status error");

    assert_eq!(
        err,
        TableError::Status {
            status: 500,
            message: "database unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn unknown_route_is_a_status_error() {
    let (base, _) = spawn_table_server().await.expect("spawn server");
    let err = gateway(&base, "/api/datatable/unknown")
        .fetch(&request(1))
        .await
        .expect_err("status error");
    assert_eq!(err.kind(), ErrorKind::Status);
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let (base, _) = spawn_table_server().await.expect("spawn server");

    let err = gateway(&base, "/garbage")
        .fetch(&request(1))
        .await
        .expect_err("decode error");
    assert_eq!(err.kind(), ErrorKind::Decode);

    let err = gateway(&base, "/missing-fields")
        .fetch(&request(1))
        .await
        .expect_err("decode error");
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn echoed_fetch_id_is_passed_through() {
    let (base, _) = spawn_table_server().await.expect("spawn server");

    let page = gateway(&base, "/api/datatable/customers")
        .fetch(&request(4))
        .await
        .expect("page");
    assert_eq!(page.fetch_id, Some(RequestId(4)));

    let page = gateway(&base, "/wrong-id")
        .fetch(&request(9))
        .await
        .expect("page");
    assert_eq!(page.fetch_id, Some(RequestId(10)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = gateway(&format!("http://{addr}"), "/api/datatable/customers")
        .fetch(&request(1))
        .await
        .expect_err("network error");
    assert_eq!(err.kind(), ErrorKind::Network);
}
