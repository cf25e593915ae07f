#![allow(dead_code)]

use dla_backend::config::LoyaltyConfig;
use dla_backend::entities::{CustomerTier, MovementType, OrderUnit, PaymentType};
use dla_backend::models::*;
use dla_backend::services::*;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same SQLite memory store.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn loyalty_config() -> LoyaltyConfig {
    LoyaltyConfig {
        cents_per_point: 1000,
        expiration_days: 365,
        sweep_interval_secs: 3600,
    }
}

/// Branch, customer and product with 120 pieces (10 boxes) in stock
pub struct Fixture {
    pub db: DatabaseConnection,
    pub branch_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = setup_db().await;
        let branch_id = create_branch(&db, "MATRIZ").await;
        let customer_id = create_customer(&db, "CLI-0001", CustomerTier::Frecuente, 0).await;
        let product_id = create_product(&db, "ACE-001").await;
        add_stock(&db, product_id, branch_id, 120).await;
        Self {
            db,
            branch_id,
            customer_id,
            product_id,
        }
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone(), loyalty_config())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.db.clone())
    }

    pub fn loyalty(&self) -> LoyaltyService {
        LoyaltyService::new(self.db.clone(), loyalty_config())
    }

    pub fn deliveries(&self) -> DeliveryService {
        DeliveryService::new(self.db.clone(), loyalty_config())
    }

    pub fn collections(&self) -> CollectionService {
        CollectionService::new(self.db.clone())
    }

    pub fn promotions(&self) -> PromotionService {
        PromotionService::new(self.db.clone())
    }

    pub fn customers(&self) -> CustomerService {
        CustomerService::new(self.db.clone())
    }

    pub async fn stock(&self) -> i32 {
        self.inventory()
            .stock_level(self.product_id, self.branch_id)
            .await
            .expect("stock level")
    }

    /// Order of `boxes` boxes of the fixture product
    pub fn order_request(&self, boxes: i32, payment_type: PaymentType) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_id: self.customer_id,
            branch_id: self.branch_id,
            payment_type,
            items: vec![CreateOrderItem {
                product_id: self.product_id,
                unit: OrderUnit::Box,
                quantity: boxes,
            }],
            promotion_code: None,
            notes: None,
        }
    }

    pub async fn place_order(&self, boxes: i32) -> i32 {
        self.orders()
            .create_order(None, self.order_request(boxes, PaymentType::Cash))
            .await
            .expect("create order")
            .order
            .id
    }
}

pub async fn create_branch(db: &DatabaseConnection, code: &str) -> i32 {
    SettingsService::new(db.clone())
        .create_branch(CreateBranchRequest {
            code: code.to_string(),
            name: format!("Sucursal {code}"),
            address: None,
            phone: None,
            delivery_days: ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        })
        .await
        .expect("create branch")
        .branch
        .id
}

pub async fn create_customer(
    db: &DatabaseConnection,
    code: &str,
    tier: CustomerTier,
    credit_limit: i64,
) -> i32 {
    CustomerService::new(db.clone())
        .create_customer(CreateCustomerRequest {
            code: code.to_string(),
            name: format!("Cliente {code}"),
            phone: None,
            email: None,
            address: None,
            tier,
            credit_limit,
            credit_days: 15,
            branch_id: None,
        })
        .await
        .expect("create customer")
        .id
}

/// 12 pieces per box; piece prices 15.00 / 14.00 / 13.00
pub async fn create_product(db: &DatabaseConnection, sku: &str) -> i32 {
    ProductService::new(db.clone())
        .create_product(CreateProductRequest {
            sku: sku.to_string(),
            name: format!("Producto {sku}"),
            description: None,
            category_id: None,
            brand_id: None,
            units_per_box: 12,
            price_eventual: 1500,
            price_frecuente: 1400,
            price_vip: 1300,
        })
        .await
        .expect("create product")
        .id
}

pub async fn add_stock(db: &DatabaseConnection, product_id: i32, branch_id: i32, pieces: i32) {
    InventoryService::new(db.clone())
        .create_movement(
            None,
            CreateMovementRequest {
                product_id,
                branch_id,
                movement_type: MovementType::Entry,
                quantity: pieces,
                reference: None,
                note: Some("initial stock".to_string()),
            },
        )
        .await
        .expect("stock entry");
}
