//! Integration tests for system endpoints and file-backed persistence.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use planning_api::config::Config;
use planning_api::db::Store;
use planning_api::db::migrator::DEFAULT_ADMIN_EMAIL;
use std::path::PathBuf;
use tower::ServiceExt;

fn temp_db() -> (PathBuf, String) {
    let db_path = std::env::temp_dir().join(format!(
        "planning-system-test-{}.db",
        uuid::Uuid::new_v4()
    ));
    let url = format!("sqlite:{}", db_path.display());
    (db_path, url)
}

async fn spawn_app(database_path: &str) -> (Router, String) {
    let mut config = Config::default();
    config.general.database_path = database_path.to_string();

    let state = planning_api::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    let api_key = state
        .store()
        .get_user_api_key(DEFAULT_ADMIN_EMAIL)
        .await
        .expect("Failed to fetch bootstrap API key")
        .expect("Bootstrap admin user missing API key");

    (planning_api::api::router(state).await, api_key)
}

async fn get(app: &Router, uri: &str, api_key: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_live() {
    let (_path, url) = temp_db();
    let (app, _) = spawn_app(&url).await;

    let response = get(&app, "/api/system/health/live", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["status"], "alive");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_ready() {
    let (_path, url) = temp_db();
    let (app, _) = spawn_app(&url).await;

    let response = get(&app, "/api/system/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_metrics_requires_auth() {
    let (_path, url) = temp_db();
    let (app, api_key) = spawn_app(&url).await;

    let response = get(&app, "/api/metrics", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, "/api/metrics", Some(&api_key)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let (path, url) = temp_db();
    let (app, api_key) = spawn_app(&url).await;

    let store = Store::new(&url).await.unwrap();
    let magasin = store.create_magasin("Centre", None).await.unwrap();

    let payload = serde_json::json!({
        "user": 1,
        "magasin": magasin.id,
        "date": "2024-05-02",
        "heure_debut": "07:30",
        "heure_fin": "11:00",
        "tache": "Mise en rayon",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/plannings")
                .header("X-Api-Key", &api_key)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    drop(app);

    // Migrations are idempotent and the admin is not seeded twice
    let (app, _) = spawn_app(&url).await;
    let response = get(&app, "/api/plannings", Some(&api_key)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let plannings = body["data"].as_array().unwrap();
    assert_eq!(plannings.len(), 1);
    assert_eq!(plannings[0]["tache"], "Mise en rayon");
    assert_eq!(plannings[0]["magasin_nom"], "Centre");

    std::fs::remove_file(path).ok();
}
