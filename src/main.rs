use actix_web::{App, HttpServer, middleware::Logger, web};

use dla_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::{JwtService, init_logger},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logger();

    let config = Config::from_toml().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let customer_service = CustomerService::new(pool.clone());
    let product_service = ProductService::new(pool.clone());
    let order_service = OrderService::new(pool.clone(), config.loyalty.clone());
    let inventory_service = InventoryService::new(pool.clone());
    let delivery_service = DeliveryService::new(pool.clone(), config.loyalty.clone());
    let expense_service = ExpenseService::new(pool.clone());
    let loyalty_service = LoyaltyService::new(pool.clone(), config.loyalty.clone());
    let promotion_service = PromotionService::new(pool.clone());
    let collection_service = CollectionService::new(pool.clone());
    let cash_register_service = CashRegisterService::new(pool.clone());
    let report_service = ReportService::new(pool.clone());
    let settings_service = SettingsService::new(pool.clone());

    // Background loyalty expiration sweep
    {
        let loyalty_service = loyalty_service.clone();
        let interval = std::time::Duration::from_secs(config.loyalty.sweep_interval_secs.max(1));
        tokio::spawn(async move {
            loop {
                match loyalty_service.expire_points().await {
                    Ok(result) if result.expired_transactions > 0 => log::info!(
                        "Expired {} points from {} transactions",
                        result.expired_points,
                        result.expired_transactions
                    ),
                    Ok(_) => log::debug!("No loyalty points due to expire"),
                    Err(e) => log::error!("Loyalty expiration failed: {:?}", e),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(inventory_service.clone()))
            .app_data(web::Data::new(delivery_service.clone()))
            .app_data(web::Data::new(expense_service.clone()))
            .app_data(web::Data::new(loyalty_service.clone()))
            .app_data(web::Data::new(promotion_service.clone()))
            .app_data(web::Data::new(collection_service.clone()))
            .app_data(web::Data::new(cash_register_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .configure(swagger_config)
            .route("/health", web::get().to(handlers::health))
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
