use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use recommender_api::api::{create_router, AppState};
use recommender_api::clients::{AuthClient, CatalogClient};
use recommender_api::error::AppResult;
use recommender_api::model::CfModel;
use recommender_api::models::{ApiDataAsset, DatasetId, OrganizationId};
use recommender_api::store::{create_redis_client, ScoreStore};

/// Catalog stub that records how often the filter-chain collaborators are
/// touched; rejected requests must never reach them.
#[derive(Default)]
struct CountingCatalog {
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogClient for CountingCatalog {
    async fn fetch_taxonomy(&self) -> AppResult<HashSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }

    async fn fetch_preferences(&self, _org_id: &OrganizationId) -> AppResult<HashSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }

    async fn fetch_dataset_catalog(&self) -> AppResult<Vec<ApiDataAsset>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn fetch_organizations(&self) -> AppResult<Vec<OrganizationId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn fetch_owned(&self, _org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }

    async fn fetch_visible(&self, _org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }

    async fn fetch_live_ids(&self) -> AppResult<HashSet<DatasetId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }
}

struct StubAuth {
    valid: bool,
    calls: AtomicUsize,
}

impl StubAuth {
    fn new(valid: bool) -> Self {
        Self {
            valid,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AuthClient for StubAuth {
    async fn validate(&self, _cookie: &str) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.valid)
    }
}

fn item_model() -> CfModel {
    serde_json::from_str(
        r#"{
            "global_mean": 2.0,
            "neighbors": {"10": ["11", "12", "13"]}
        }"#,
    )
    .unwrap()
}

fn test_state(
    catalog: Arc<CountingCatalog>,
    auth: Arc<StubAuth>,
    item_model: Option<Arc<CfModel>>,
) -> AppState {
    // The client connects lazily; these tests never touch the store.
    let redis_client = create_redis_client("redis://127.0.0.1").unwrap();

    AppState {
        store: ScoreStore::new(redis_client),
        catalog,
        auth,
        item_model,
        fallback_org_id: OrganizationId::from("1"),
    }
}

fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        None,
    );
    let server = create_test_server(state);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommend_without_cookie_is_unauthorized() {
    let catalog = Arc::new(CountingCatalog::default());
    let auth = Arc::new(StubAuth::new(true));
    let server = create_test_server(test_state(catalog.clone(), auth.clone(), None));

    let response = server
        .post("/api/v1/recommender/")
        .json(&json!({ "org_id": "1" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "ERROR: Unauthorized");

    // The rejection happens before any collaborator is consulted
    assert_eq!(catalog.call_count(), 0);
    assert_eq!(auth.call_count(), 0);
}

#[tokio::test]
async fn test_recommend_with_invalid_session_is_unauthorized() {
    let catalog = Arc::new(CountingCatalog::default());
    let auth = Arc::new(StubAuth::new(false));
    let server = create_test_server(test_state(catalog.clone(), auth.clone(), None));

    let response = server
        .post("/api/v1/recommender/")
        .add_header(header::COOKIE, HeaderValue::from_static("session=expired"))
        .json(&json!({ "org_id": "1" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(auth.call_count(), 1);
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test]
async fn test_recommend_without_body_is_bad_request() {
    let catalog = Arc::new(CountingCatalog::default());
    let auth = Arc::new(StubAuth::new(true));
    let server = create_test_server(test_state(catalog.clone(), auth, None));

    let response = server
        .post("/api/v1/recommender/")
        .add_header(header::COOKIE, HeaderValue::from_static("session=abc"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test]
async fn test_recommend_without_org_id_is_bad_request() {
    let catalog = Arc::new(CountingCatalog::default());
    let auth = Arc::new(StubAuth::new(true));
    let server = create_test_server(test_state(catalog, auth, None));

    let response = server
        .post("/api/v1/recommender/")
        .add_header(header::COOKIE, HeaderValue::from_static("session=abc"))
        .json(&json!({ "datasets_id": ["1", "2"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_similar_datasets_lookup() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        Some(Arc::new(item_model())),
    );
    let server = create_test_server(state);

    let response = server.get("/api/v1/recommender/similar/10?k=2").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["neighbors"], json!(["11", "12"]));
}

#[tokio::test]
async fn test_similar_datasets_defaults_to_ten_neighbors() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        Some(Arc::new(item_model())),
    );
    let server = create_test_server(state);

    let response = server.get("/api/v1/recommender/similar/10").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["neighbors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_similar_datasets_unknown_dataset_is_not_found() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        Some(Arc::new(item_model())),
    );
    let server = create_test_server(state);

    let response = server.get("/api/v1/recommender/similar/404").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similar_datasets_without_model_is_not_found() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        None,
    );
    let server = create_test_server(state);

    let response = server.get("/api/v1/recommender/similar/10").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed_in_response_headers() {
    let state = test_state(
        Arc::new(CountingCatalog::default()),
        Arc::new(StubAuth::new(true)),
        None,
    );
    let server = create_test_server(state);

    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}
