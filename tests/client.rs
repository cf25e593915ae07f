mod common;

use actix_web::{App, HttpServer, web};
use common::*;
use dla_backend::client::{ApiClient, ClientError, ListState, QueryCache};
use dla_backend::config::SeedConfig;
use dla_backend::entities::{CustomerTier, PaymentType};
use dla_backend::handlers;
use dla_backend::middlewares::AuthMiddleware;
use dla_backend::models::*;
use dla_backend::seed;
use dla_backend::services::*;
use dla_backend::utils::JwtService;

/// Runs the API on an ephemeral port and returns its base url
async fn spawn_server(fx: &Fixture) -> String {
    let jwt = JwtService::new("client-test-secret", 900, 3600);
    let db = fx.db.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt.clone()))
            .app_data(web::Data::new(AuthService::new(db.clone(), jwt.clone())))
            .app_data(web::Data::new(CustomerService::new(db.clone())))
            .app_data(web::Data::new(OrderService::new(db.clone(), loyalty_config())))
            .app_data(web::Data::new(LoyaltyService::new(db.clone(), loyalty_config())))
            .app_data(web::Data::new(CollectionService::new(db.clone())))
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind test server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}/api/v1/")
}

async fn logged_in(fx: &Fixture) -> ApiClient {
    seed::run(&fx.db, &SeedConfig::default()).await.unwrap();
    let mut client = ApiClient::new(spawn_server(fx).await);
    let config = SeedConfig::default();
    client
        .login(&LoginRequest {
            email: config.admin_email,
            password: config.admin_password,
        })
        .await
        .unwrap();
    client
}

#[actix_web::test]
async fn test_client_talks_to_the_api() {
    let fx = Fixture::new().await;
    let client = logged_in(&fx).await;
    assert!(client.token().is_some());

    let me = client.me().await.unwrap();
    assert_eq!(me.email, "admin@dla.com");

    let customer = client.get_customer(fx.customer_id).await.unwrap();
    assert_eq!(customer.tier, CustomerTier::Frecuente);

    let detail = client
        .create_order(&fx.order_request(1, PaymentType::Cash))
        .await
        .unwrap();
    assert_eq!(detail.order.total, 16_800);

    let err = client.get_customer(9999).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        ClientError::Api { code, .. } => assert_eq!(code, "NOT_FOUND"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[actix_web::test]
async fn test_client_without_token_is_rejected() {
    let fx = Fixture::new().await;
    let client = ApiClient::new(spawn_server(&fx).await);
    let err = client.get_customer(fx.customer_id).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[actix_web::test]
async fn test_client_validates_before_sending() {
    // nothing listens on the discard port; validation must fail first
    let client = ApiClient::new("http://127.0.0.1:9/api/v1");
    let err = client
        .redeem_points(&RedeemPointsRequest {
            customer_id: 1,
            points: 0,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(err.status(), None);
}

#[actix_web::test]
async fn test_cached_list_feeds_list_state() {
    let fx = Fixture::new().await;
    create_customer(&fx.db, "CLI-0002", CustomerTier::Vip, 0).await;
    let client = logged_in(&fx).await;

    let cache: QueryCache<PaginatedResponse<dla_backend::entities::customer_entity::Model>> =
        QueryCache::new();
    let query = CustomerQuery::default();
    let page = cache
        .fetch("customers", || client.list_customers(&query))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 2);
    assert!(cache.peek("customers").await.is_some());

    let state = ListState::from_rows(page.data);
    assert_eq!(state.rows().len(), 2);
    assert!(!state.is_loading());

    cache.invalidate_prefix("cust").await;
    assert!(cache.peek("customers").await.is_none());
}
