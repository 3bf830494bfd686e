use actix_web::{test, App, web};
use relaychat_server::AppState;
use chrono::DateTime;
use config::{Config, Environment};

fn test_settings() -> relaychat_server::Settings {
    Config::builder()
        .set_default("environment", "test").unwrap()
        .set_default("server.host", "127.0.0.1").unwrap()
        .set_default("server.port", 8080).unwrap()
        .set_default("server.workers", 1).unwrap()
        .set_default("chat.host", "127.0.0.1").unwrap()
        .set_default("chat.port", 0).unwrap()
        .set_default("cors.enabled", false).unwrap()
        .set_default("cors.allow_any_origin", false).unwrap()
        .set_default("cors.max_age", 60).unwrap()
        .add_source(Environment::with_prefix("app").separator("__").try_parsing(true))
        .build()
        .unwrap()
        .try_deserialize()
        .expect("Failed to load test config")
}

#[actix_web::test]
async fn test_health_check() {
    // Create test app state
    let state = web::Data::new(AppState::new(test_settings()));

    // Create test app
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(relaychat_server::health_check))
    ).await;

    // Send request
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    // Assert response
    assert!(resp.status().is_success());

    // Parse response body
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // Verify response format
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["connections"], 0);
    assert!(DateTime::parse_from_rfc3339(
        json["timestamp"].as_str().unwrap()
    ).is_ok());
}
