use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use slotbook_server::Server;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

struct App {
    _data: TempDir,
    _public: TempDir,
    router: Router,
}

async fn app() -> App {
    let data = tempfile::tempdir().unwrap();
    let public = tempfile::tempdir().unwrap();
    fs::write(public.path().join("index.html"), "<h1>Book a slot</h1>").unwrap();
    fs::write(
        data.path().join("config.json"),
        json!({
            "cohorts": ["Alpha", "Beta"],
            "perDayLimit": 2,
            "perCohortLimit": 1,
            "allowedDates": ["2024-01-01"],
            "adminPassword": "letmein",
        })
        .to_string(),
    )
    .unwrap();

    let server = Server::builder()
        .data_dir(data.path())
        .static_dir(public.path())
        .build()
        .await
        .unwrap();

    App { router: server.router(), _data: data, _public: public }
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn register(contact: &str, cohort: &str) -> Request<Body> {
    let body = json!({
        "name": "Ada", "college": "Analytical", "year": 2, "contact": contact,
        "email": "ada@example.org", "food": "Veg", "date": "2024-01-01", "cohort": cohort,
    });
    Request::post("/api/register")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn health_and_docs_are_served() {
    let app = app().await;

    let (status, body) = call(&app.router, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "up");

    let (status, body) = call(&app.router, Request::get("/api").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    for path in ["/api/register", "/api/slots", "/api/admin/csv", "/health"] {
        assert!(page.contains(path), "{path} missing from the API reference");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unrouted_paths_fall_back_to_static_files() {
    let app = app().await;

    let (status, body) = call(&app.router, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>Book a slot</h1>");

    let (status, _) =
        call(&app.router, Request::get("/missing.js").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn booking_flow_end_to_end() {
    let app = app().await;

    let (_, body) = call(&app.router, register("1111111111", "Alpha")).await;
    let first: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(first["success"], true);
    assert_eq!(first["counts"], json!({ "Alpha": 1, "Beta": 0 }));

    let (_, body) = call(&app.router, register("2222222222", "Alpha")).await;
    let second: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(second["message"], "Alpha cohort is full for this date.");

    let (status, body) = call(
        &app.router,
        Request::get("/api/admin/data")
            .header("x-admin-password", "letmein")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);

    let (status, _) =
        call(&app.router, Request::post("/api/reset").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test]
fn notifier_follows_the_cargo_feature() {
    assert_eq!(slotbook::features::is_enabled("notifier"), cfg!(feature = "notifier"));
    assert!(slotbook::features::is_enabled("booking"));
}
