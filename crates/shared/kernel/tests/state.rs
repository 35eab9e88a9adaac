use axum::body::Body;
use axum::http::{Request, StatusCode};
use slotbook_derive::slotbook_slice;
use slotbook_kernel::domain::config::ApiConfig;
use slotbook_kernel::domain::registry::InitializedSlice;
use slotbook_kernel::server::{ApiState, ApiStateError, system_router};
use slotbook_storage::Storage;
use tower::ServiceExt;

#[slotbook_slice]
pub struct Counter {
    pub start: u32,
}

#[slotbook_slice]
pub struct Unregistered {}

async fn storage() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::builder().root(dir.path()).connect().await.unwrap();
    (dir, storage)
}

#[tokio::test]
async fn build_requires_config_and_storage() {
    let (_dir, storage) = storage().await;

    let missing_config = ApiState::builder().storage(storage).build().unwrap_err();
    assert!(matches!(missing_config, ApiStateError::Validation { .. }));

    let missing_storage = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
    assert!(matches!(missing_storage, ApiStateError::Validation { .. }));
}

#[tokio::test]
async fn slices_are_found_by_type() {
    let (_dir, storage) = storage().await;
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .storage(storage)
        .register_slice(InitializedSlice::new(Counter::new(CounterInner { start: 7 })))
        .build()
        .unwrap();

    assert_eq!(state.try_get_slice::<Counter>().unwrap().start, 7);
    assert!(state.get_slice::<Unregistered>().is_none());
    assert!(matches!(
        state.try_get_slice::<Unregistered>(),
        Err(ApiStateError::MissingSlice { .. })
    ));
    assert_eq!(state.slice_names().count(), 1);
}

#[tokio::test]
async fn health_endpoint_reports_up() {
    let (router, api) = system_router::<()>().split_for_parts();
    assert!(api.paths.paths.contains_key("/health"));

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "up");
}
