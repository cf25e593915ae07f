pub mod auth_service;
pub mod cash_register_service;
pub mod collection_service;
pub mod customer_service;
pub mod delivery_service;
pub mod expense_service;
pub mod inventory_service;
pub mod loyalty_service;
pub mod order_service;
pub mod product_service;
pub mod promotion_service;
pub mod report_service;
pub mod settings_service;

pub use auth_service::AuthService;
pub use cash_register_service::CashRegisterService;
pub use collection_service::CollectionService;
pub use customer_service::CustomerService;
pub use delivery_service::DeliveryService;
pub use expense_service::ExpenseService;
pub use inventory_service::InventoryService;
pub use loyalty_service::LoyaltyService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use promotion_service::PromotionService;
pub use report_service::ReportService;
pub use settings_service::SettingsService;
