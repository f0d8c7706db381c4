//! Integration tests for the clinic HTTP server.

use std::sync::{Arc, OnceLock};

use api::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use common::EntityId;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{
    InMemoryStore, Owner, OwnerRepository, Page, PageRequest, StoreError, Vet, VetRepository,
};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_store() -> (axum::Router, InMemoryStore) {
    let store = InMemoryStore::with_demo_data();
    let app = api::create_app(api::create_state(store.clone()), get_metrics_handle());
    (app, store)
}

fn setup() -> axum::Router {
    setup_with_store().0
}

/// Owners work normally; the vet lookup behind the health probe fails.
#[derive(Clone)]
struct FailingStore {
    owners: InMemoryStore,
}

#[async_trait]
impl OwnerRepository for FailingStore {
    async fn find_by_id(&self, id: EntityId) -> store::Result<Option<Owner>> {
        self.owners.find_by_id(id).await
    }

    async fn save(&self, owner: Owner) -> store::Result<Owner> {
        self.owners.save(owner).await
    }

    async fn find_by_last_name_starting_with(
        &self,
        prefix: &str,
        request: PageRequest,
    ) -> store::Result<Page<Owner>> {
        self.owners
            .find_by_last_name_starting_with(prefix, request)
            .await
    }
}

#[async_trait]
impl VetRepository for FailingStore {
    async fn find_all(&self) -> store::Result<Vec<Vet>> {
        Err(StoreError::Unavailable("Connection refused".to_string()))
    }
}

async fn get(app: axum::Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: axum::Router, uri: &str, form: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .map(|value| value.to_str().unwrap())
}

const VALID_OWNER: &str =
    "firstName=Joe&lastName=Bloggs&address=123+Caramel+Street&city=London&telephone=1316761638";

#[tokio::test]
async fn test_health_reports_up() {
    let response = get(setup(), "/api/v1/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "UP");
    assert_eq!(json["components"]["database"]["status"], "UP");
    assert_eq!(
        json["components"]["database"]["details"],
        "Database connection is healthy"
    );
    assert_eq!(json["components"]["application"]["status"], "UP");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_down_when_database_fails() {
    let store = FailingStore {
        owners: InMemoryStore::with_demo_data(),
    };
    let app = api::create_app(api::create_state(store), get_metrics_handle());

    let response = get(app, "/api/v1/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["components"]["database"]["status"], "DOWN");
    assert_eq!(
        json["components"]["database"]["details"],
        "Database connection failed: Connection refused"
    );
    assert_eq!(json["components"]["application"]["status"], "UP");
}

#[tokio::test]
async fn test_health_allows_cross_origin_requests() {
    let response = setup()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_init_creation_form() {
    let response = get(setup(), "/owners/new").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/createOrUpdateOwnerForm\""));
    assert!(html.contains("&quot;owner&quot;"));
}

#[tokio::test]
async fn test_process_creation_form_success() {
    let (app, store) = setup_with_store();
    let before = store.owner_count().await;

    let response = post_form(app, "/owners/new", VALID_OWNER).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location"), Some("/owners/11"));
    assert_eq!(header(&response, "x-flash-message"), Some("New Owner Created"));
    assert_eq!(store.owner_count().await, before + 1);

    let saved = store.find_by_id(EntityId::new(11)).await.unwrap().unwrap();
    assert_eq!(saved.last_name, "Bloggs");
    assert_eq!(saved.telephone, "1316761638");
}

#[tokio::test]
async fn test_process_creation_form_ignores_submitted_id() {
    let (app, store) = setup_with_store();

    let form = format!("id=1&{VALID_OWNER}");
    let response = post_form(app, "/owners/new", &form).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location"), Some("/owners/11"));

    let george = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
    assert_eq!(george.last_name, "Franklin");
}

#[tokio::test]
async fn test_process_creation_form_has_errors() {
    let (app, store) = setup_with_store();
    let before = store.owner_count().await;

    let response = post_form(
        app,
        "/owners/new",
        "firstName=Joe&lastName=Bloggs&city=London&telephone=abc",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "x-flash-error"),
        Some("There was an error in creating the owner.")
    );
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/createOrUpdateOwnerForm\""));
    assert!(html.contains("&quot;address&quot;"));
    assert!(html.contains("Telephone must be a 10-digit number."));
    assert_eq!(store.owner_count().await, before);
}

#[tokio::test]
async fn test_init_find_form() {
    let response = get(setup(), "/owners/find").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/findOwners\""));
}

#[tokio::test]
async fn test_process_find_form_many_results() {
    let response = get(setup(), "/owners?page=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/ownersList\""));
    assert!(html.contains("&quot;currentPage&quot;: 1"));
    assert!(html.contains("&quot;totalPages&quot;: 2"));
    assert!(html.contains("&quot;totalItems&quot;: 10"));
    assert!(html.contains("Franklin"));
    assert!(!html.contains("Black"));
}

#[tokio::test]
async fn test_process_find_form_second_page() {
    let response = get(setup(), "/owners?page=2&lastName=").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("&quot;currentPage&quot;: 2"));
    assert!(html.contains("Black"));
    assert!(html.contains("Estaban"));
    assert!(!html.contains("Franklin"));
}

#[tokio::test]
async fn test_process_find_form_lone_owner_on_last_page_lists() {
    let (app, store) = setup_with_store();
    store
        .save(Owner {
            first_name: "Joe".to_string(),
            last_name: "Bloggs".to_string(),
            address: "123 Caramel Street".to_string(),
            city: "London".to_string(),
            telephone: "1316761638".to_string(),
            ..Owner::default()
        })
        .await
        .unwrap();

    let response = get(app, "/owners?page=3&lastName=").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/ownersList\""));
    assert!(html.contains("&quot;currentPage&quot;: 3"));
    assert!(html.contains("&quot;totalPages&quot;: 3"));
    assert!(html.contains("&quot;totalItems&quot;: 11"));
    assert!(html.contains("Bloggs"));
    assert!(!html.contains("Estaban"));
}

#[tokio::test]
async fn test_process_find_form_by_last_name_prefix() {
    let response = get(setup(), "/owners?lastName=Davis").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/ownersList\""));
    assert!(html.contains("Betty"));
    assert!(html.contains("Harold"));
    assert!(html.contains("&quot;totalItems&quot;: 2"));
}

#[tokio::test]
async fn test_process_find_form_single_result_redirects() {
    let response = get(setup(), "/owners?page=1&lastName=Franklin").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location"), Some("/owners/1"));
}

#[tokio::test]
async fn test_process_find_form_no_results() {
    let response = get(setup(), "/owners?page=1&lastName=Unknown+Surname").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/findOwners\""));
    assert!(html.contains("&quot;notFound&quot;"));
    assert!(html.contains("Unknown Surname"));
}

#[tokio::test]
async fn test_process_find_form_rejects_invalid_page() {
    let response = get(setup(), "/owners?page=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Invalid page number"));
}

#[tokio::test]
async fn test_process_find_form_rejects_page_zero() {
    let response = get(setup(), "/owners?page=0&lastName=Davis").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "Invalid page number: 0");
}

#[tokio::test]
async fn test_show_owner() {
    let response = get(setup(), "/owners/6").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/ownerDetails\""));
    assert!(html.contains("Coleman"));
    assert!(html.contains("Samantha"));
    assert!(html.contains("Max"));
}

#[tokio::test]
async fn test_show_missing_owner_is_not_found() {
    let response = get(setup(), "/owners/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "Owner not found with id: 999");
}

#[tokio::test]
async fn test_init_update_owner_form() {
    let response = get(setup(), "/owners/1/edit").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/createOrUpdateOwnerForm\""));
    assert!(html.contains("George"));
    assert!(html.contains("110 W. Liberty St."));
}

#[tokio::test]
async fn test_init_update_missing_owner_is_not_found() {
    let response = get(setup(), "/owners/999/edit").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_process_update_owner_form_success() {
    let (app, store) = setup_with_store();

    let response = post_form(app, "/owners/1/edit", VALID_OWNER).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location"), Some("/owners/1"));
    assert_eq!(header(&response, "x-flash-message"), Some("Owner Values Updated"));

    let updated = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
    assert_eq!(updated.first_name, "Joe");
    assert_eq!(updated.last_name, "Bloggs");
    assert_eq!(updated.pets.len(), 1);
}

#[tokio::test]
async fn test_process_update_owner_form_ignores_submitted_id() {
    let (app, store) = setup_with_store();

    let form = format!("id=2&{VALID_OWNER}");
    let response = post_form(app, "/owners/1/edit", &form).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location"), Some("/owners/1"));

    let betty = store.find_by_id(EntityId::new(2)).await.unwrap().unwrap();
    assert_eq!(betty.first_name, "Betty");
    let updated = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
    assert_eq!(updated.first_name, "Joe");
}

#[tokio::test]
async fn test_process_update_owner_form_has_errors() {
    let (app, store) = setup_with_store();

    let response = post_form(
        app,
        "/owners/1/edit",
        "firstName=Joe&lastName=&address=&city=London&telephone=",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "x-flash-error"),
        Some("There was an error in updating the owner.")
    );
    let html = body_text(response).await;
    assert!(html.contains("data-view=\"owners/createOrUpdateOwnerForm\""));
    assert!(html.contains("&quot;lastName&quot;"));

    let unchanged = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
    assert_eq!(unchanged.first_name, "George");
}

#[tokio::test]
async fn test_process_update_missing_owner_is_not_found() {
    let response = post_form(setup(), "/owners/999/edit", VALID_OWNER).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    let _ = get(app.clone(), "/owners?lastName=Davis").await;

    let response = get(app, "/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        header(&response, "content-type")
            .unwrap()
            .starts_with("text/plain")
    );
    let text = body_text(response).await;
    assert!(text.contains("owner_searches_total"));
}

#[tokio::test]
async fn test_state_exposes_restricted_binder() {
    let state: Arc<AppState<InMemoryStore>> = api::create_state(InMemoryStore::new());
    let binder = state.owner_binder();

    assert!(!binder.is_allowed("id"));
    assert!(binder.is_allowed("lastName"));
}
