mod common;

use actix_web::{App, http::StatusCode, test, web};
use common::*;
use dla_backend::config::SeedConfig;
use dla_backend::handlers;
use dla_backend::middlewares::AuthMiddleware;
use dla_backend::models::LoginRequest;
use dla_backend::seed;
use dla_backend::services::*;
use dla_backend::utils::JwtService;
use serde_json::{Value, json};

fn jwt() -> JwtService {
    JwtService::new("api-test-secret", 900, 3600)
}

macro_rules! test_app {
    ($db:expr) => {{
        let db = $db.clone();
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt()))
                .app_data(web::Data::new(AuthService::new(db.clone(), jwt())))
                .app_data(web::Data::new(CustomerService::new(db.clone())))
                .app_data(web::Data::new(SettingsService::new(db.clone())))
                .app_data(web::Data::new(ReportService::new(db.clone())))
                .route("/health", web::get().to(handlers::health))
                .service(web::scope("/api/v1").configure(handlers::api_config)),
        )
        .await
    }};
}

async fn seeded_token(db: &sea_orm::DatabaseConnection) -> String {
    seed::run(db, &SeedConfig::default()).await.unwrap();
    AuthService::new(db.clone(), jwt())
        .login(LoginRequest {
            email: SeedConfig::default().admin_email,
            password: SeedConfig::default().admin_password,
        })
        .await
        .unwrap()
        .access_token
}

#[actix_web::test]
async fn test_health_is_public() {
    let db = setup_db().await;
    let app = test_app!(db);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_protected_routes_need_a_token() {
    let db = setup_db().await;
    let app = test_app!(db);

    let req = test::TestRequest::get().uri("/api/v1/customers").to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("request without token must fail");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/customers")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("garbage token must fail");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_login_returns_the_envelope() {
    let db = setup_db().await;
    seed::run(&db, &SeedConfig::default()).await.unwrap();
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "admin@dla.com", "password": "Admin12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert_eq!(body["data"]["user"]["email"], "admin@dla.com");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "admin@dla.com", "password": "nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[actix_web::test]
async fn test_customer_list_carries_pagination_meta() {
    let db = setup_db().await;
    let token = seeded_token(&db).await;
    create_customer(&db, "CLI-0001", dla_backend::entities::CustomerTier::Vip, 0).await;
    create_customer(&db, "CLI-0002", dla_backend::entities::CustomerTier::Eventual, 0).await;
    let app = test_app!(db);

    let req = test::TestRequest::get()
        .uri("/api/v1/customers?page=1&limit=1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["meta"]["total"], 2);
    assert_eq!(body["data"]["meta"]["totalPages"], 2);
}

#[actix_web::test]
async fn test_validation_errors_use_the_error_envelope() {
    let db = setup_db().await;
    let token = seeded_token(&db).await;
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "code": "bad code", "name": "X", "tier": "VIP" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_settings_need_the_settings_permission() {
    let db = setup_db().await;
    let admin_token = seeded_token(&db).await;
    let app = test_app!(db);

    let req = test::TestRequest::get()
        .uri("/api/v1/settings/roles")
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // a seller token without settings.manage
    let seller = jwt()
        .generate_access_token(&dla_backend::utils::TokenSubject {
            user_id: 99,
            email: "vendedor@dla.com".to_string(),
            roles: vec![seed::SELLER_ROLE.to_string()],
            permissions: vec!["orders.manage".to_string()],
        })
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/settings/roles")
        .insert_header(("Authorization", format!("Bearer {seller}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
