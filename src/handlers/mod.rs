pub mod auth;
pub mod cash_register;
pub mod collection;
pub mod customer;
pub mod delivery;
pub mod expense;
pub mod inventory;
pub mod loyalty;
pub mod order;
pub mod product;
pub mod promotion;
pub mod report;
pub mod settings;

pub use auth::auth_config;
pub use cash_register::cash_register_config;
pub use collection::collection_config;
pub use customer::customer_config;
pub use delivery::delivery_config;
pub use expense::expense_config;
pub use inventory::inventory_config;
pub use loyalty::loyalty_config;
pub use order::order_config;
pub use product::product_config;
pub use promotion::promotion_config;
pub use report::report_config;
pub use settings::settings_config;

use actix_web::web;

/// Mounts every domain under the current scope
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth_config)
        .configure(customer_config)
        .configure(product_config)
        .configure(order_config)
        .configure(inventory_config)
        .configure(delivery_config)
        .configure(expense_config)
        .configure(loyalty_config)
        .configure(promotion_config)
        .configure(collection_config)
        .configure(cash_register_config)
        .configure(report_config)
        .configure(settings_config);
}

pub async fn health() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
