use std::sync::{Arc, Mutex};

use axum::{
	Json, Router,
	extract::{RawQuery, State},
	http::{HeaderMap, StatusCode},
	routing::{get, post},
};
use serde_json::Value;
use time::macros::datetime;
use tokio::net::TcpListener;

use decyde_storage::{
	Error, Store,
	models::{LogRecord, SearchLogEntry},
	rest::RestStore,
};

#[derive(Clone, Default)]
struct Seen {
	queries: Arc<Mutex<Vec<String>>>,
	bodies: Arc<Mutex<Vec<Value>>>,
	api_keys: Arc<Mutex<Vec<String>>>,
}
impl Seen {
	fn remember(&self, headers: &HeaderMap, query: Option<String>) {
		let key = headers.get("apikey").and_then(|v| v.to_str().ok()).unwrap_or("").to_string();

		self.api_keys.lock().unwrap_or_else(|err| err.into_inner()).push(key);
		self.queries
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(query.unwrap_or_default());
	}

	fn queries(&self) -> Vec<String> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

async fn rpc_unavailable(State(seen): State<Seen>, headers: HeaderMap) -> StatusCode {
	seen.remember(&headers, None);

	StatusCode::NOT_FOUND
}

async fn direct_coverage(
	State(seen): State<Seen>,
	headers: HeaderMap,
	RawQuery(query): RawQuery,
) -> Json<Value> {
	seen.remember(&headers, query);

	Json(serde_json::json!([
		{
			"partner": "Zepto",
			"active": true,
			"pincodes": { "district": "Bengaluru Urban", "statename": "Karnataka" }
		},
		{ "partner": "Blinkit", "active": true, "pincodes": null }
	]))
}

async fn prices(
	State(seen): State<Seen>,
	headers: HeaderMap,
	RawQuery(query): RawQuery,
) -> Json<Value> {
	seen.remember(&headers, query);

	Json(serde_json::json!([
		{ "partner": "Zepto", "sku": "milk", "price": 28.5 },
		{ "partner": "Blinkit", "sku": "milk", "price": 30 }
	]))
}

async fn insert_search(
	State(seen): State<Seen>,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> StatusCode {
	seen.remember(&headers, None);
	seen.bodies.lock().unwrap_or_else(|err| err.into_inner()).push(body);

	StatusCode::CREATED
}

async fn recent_searches(
	State(seen): State<Seen>,
	headers: HeaderMap,
	RawQuery(query): RawQuery,
) -> Json<Value> {
	seen.remember(&headers, query);

	Json(serde_json::json!([
		{
			"area_id": "560001",
			"items": ["milk"],
			"user_id": null,
			"created_at": "2026-10-16T09:30:00.123456+00:00"
		}
	]))
}

async fn broken_redirects() -> StatusCode {
	StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_fake_store() -> (String, Seen) {
	let seen = Seen::default();
	let app = Router::new()
		.route("/rest/v1/rpc/get_partner_coverage", post(rpc_unavailable))
		.route("/rest/v1/partner_coverage", get(direct_coverage))
		.route("/rest/v1/price_records", get(prices))
		.route("/rest/v1/search_logs", post(insert_search).get(recent_searches))
		.route("/rest/v1/redirect_logs", get(broken_redirects))
		.with_state(seen.clone());
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind fake store.");
	let addr = listener.local_addr().expect("Failed to read fake store address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});

	(format!("http://{addr}"), seen)
}

fn store_for(url: String) -> RestStore {
	let cfg = decyde_config::Store {
		url: Some(url),
		api_key: Some("anon-key".to_string()),
		..Default::default()
	};

	RestStore::new(&cfg).expect("Failed to build REST store.")
}

#[tokio::test]
async fn coverage_falls_back_to_direct_query_when_rpc_fails() {
	let (url, seen) = spawn_fake_store().await;
	let store = store_for(url);
	let rows = store.coverage_rows("560001").await.expect("Expected coverage rows.");

	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].partner, "Zepto");
	assert_eq!(rows[0].district(), Some("Bengaluru Urban"));
	assert_eq!(rows[1].statename(), None);

	let queries = seen.queries();
	let direct = queries.last().expect("Expected a direct coverage query.");

	assert!(direct.contains("pincode=eq.560001"), "{direct}");
	assert!(direct.contains("active=eq.true"), "{direct}");
	assert!(
		seen.api_keys.lock().unwrap_or_else(|err| err.into_inner()).iter().all(|k| k == "anon-key")
	);
}

#[tokio::test]
async fn price_query_sends_quoted_in_filters() {
	let (url, seen) = spawn_fake_store().await;
	let store = store_for(url);
	let partners = vec!["Zepto".to_string(), "Blinkit".to_string()];
	let skus = vec!["milk".to_string()];
	let records = store.price_records(&partners, &skus).await.expect("Expected price records.");

	assert_eq!(records.len(), 2);
	assert_eq!(records[1].price, 30.0);

	let query = seen.queries().pop().expect("Expected a price query.");

	assert!(query.contains("partner=in.%28%22Zepto%22%2C%22Blinkit%22%29"), "{query}");
	assert!(query.contains("sku=in.%28%22milk%22%29"), "{query}");
}

#[tokio::test]
async fn empty_price_query_skips_the_network() {
	let (url, seen) = spawn_fake_store().await;
	let store = store_for(url);
	let records = store.price_records(&[], &["milk".to_string()]).await.expect("Expected Ok.");

	assert!(records.is_empty());
	assert!(seen.queries().is_empty());
}

#[tokio::test]
async fn appends_and_reads_search_logs() {
	let (url, seen) = spawn_fake_store().await;
	let store = store_for(url);
	let record = LogRecord::Search(SearchLogEntry {
		area_id: "560001".to_string(),
		items: vec!["milk".to_string()],
		user_id: Some("user-1".to_string()),
		created_at: datetime!(2026-10-16 09:30 UTC),
	});

	store.append_log(&record).await.expect("Expected append to succeed.");

	let bodies = seen.bodies.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(bodies[0]["area_id"], "560001");
	assert_eq!(bodies[0]["user_id"], "user-1");
	assert_eq!(bodies[0]["created_at"], "2026-10-16T09:30:00Z");

	let recent = store.recent_searches(500).await.expect("Expected recent searches.");
	let query = seen.queries().pop().expect("Expected a recent query.");

	assert_eq!(recent.len(), 1);
	assert_eq!(recent[0].items, vec!["milk"]);
	assert!(query.contains("order=created_at.desc"), "{query}");
	assert!(query.contains("limit=500"), "{query}");
}

#[tokio::test]
async fn non_success_status_is_reported() {
	let (url, _seen) = spawn_fake_store().await;
	let store = store_for(url);
	let err = store.recent_redirects(10).await.expect_err("Expected a status error.");

	match err {
		Error::Status { resource, status } => {
			assert_eq!(resource, "redirect_logs");
			assert_eq!(status.as_u16(), 500);
		},
		other => panic!("Unexpected error: {other}"),
	}
}
