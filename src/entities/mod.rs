pub mod branches;
pub mod brands;
pub mod cash_registers;
pub mod categories;
pub mod collections;
pub mod customers;
pub mod delivery_routes;
pub mod delivery_stops;
pub mod drivers;
pub mod expenses;
pub mod inventories;
pub mod inventory_movements;
pub mod loyalty_transactions;
pub mod loyalty_wallets;
pub mod order_items;
pub mod orders;
pub mod permissions;
pub mod products;
pub mod promotions;
pub mod role_permissions;
pub mod roles;
pub mod stock_rules;
pub mod user_roles;
pub mod users;

pub use branches as branch_entity;
pub use brands as brand_entity;
pub use cash_registers as cash_register_entity;
pub use categories as category_entity;
pub use collections as collection_entity;
pub use customers as customer_entity;
pub use delivery_routes as delivery_route_entity;
pub use delivery_stops as delivery_stop_entity;
pub use drivers as driver_entity;
pub use expenses as expense_entity;
pub use inventories as inventory_entity;
pub use inventory_movements as inventory_movement_entity;
pub use loyalty_transactions as loyalty_transaction_entity;
pub use loyalty_wallets as loyalty_wallet_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use permissions as permission_entity;
pub use products as product_entity;
pub use promotions as promotion_entity;
pub use role_permissions as role_permission_entity;
pub use roles as role_entity;
pub use stock_rules as stock_rule_entity;
pub use user_roles as user_role_entity;
pub use users as user_entity;

pub use cash_registers::CashRegisterStatus;
pub use collections::PaymentMethod;
pub use customers::CustomerTier;
pub use delivery_routes::RouteStatus;
pub use delivery_stops::StopStatus;
pub use inventory_movements::MovementType;
pub use loyalty_transactions::LoyaltyTransactionType;
pub use order_items::OrderUnit;
pub use orders::{OrderStatus, PaymentStatus, PaymentType};
pub use promotions::DiscountType;
