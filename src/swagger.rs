use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    CashRegisterStatus, CustomerTier, DiscountType, LoyaltyTransactionType, MovementType,
    OrderStatus, OrderUnit, PaymentMethod, PaymentStatus, PaymentType, RouteStatus, StopStatus,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::customer::list_customers,
        handlers::customer::get_customer,
        handlers::customer::create_customer,
        handlers::customer::update_customer,
        handlers::customer::delete_customer,
        handlers::customer::toggle_blocked,
        handlers::product::list_products,
        handlers::product::get_product,
        handlers::product::create_product,
        handlers::product::update_product,
        handlers::product::delete_product,
        handlers::product::get_price,
        handlers::product::list_categories,
        handlers::product::create_category,
        handlers::product::list_brands,
        handlers::product::create_brand,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::create_order,
        handlers::order::update_status,
        handlers::order::cancel_order,
        handlers::inventory::list_inventory,
        handlers::inventory::get_inventory,
        handlers::inventory::create_movement,
        handlers::inventory::list_movements,
        handlers::inventory::list_stock_rules,
        handlers::inventory::create_stock_rule,
        handlers::inventory::update_stock_rule,
        handlers::inventory::delete_stock_rule,
        handlers::inventory::get_alerts,
        handlers::delivery::list_drivers,
        handlers::delivery::get_driver,
        handlers::delivery::create_driver,
        handlers::delivery::update_driver,
        handlers::delivery::delete_driver,
        handlers::delivery::list_routes,
        handlers::delivery::get_route,
        handlers::delivery::create_route,
        handlers::delivery::start_route,
        handlers::delivery::deliver_stop,
        handlers::delivery::fail_stop,
        handlers::delivery::cancel_route,
        handlers::expense::list_expenses,
        handlers::expense::get_expense,
        handlers::expense::create_expense,
        handlers::expense::update_expense,
        handlers::expense::delete_expense,
        handlers::loyalty::get_wallet,
        handlers::loyalty::list_transactions,
        handlers::loyalty::earn_points,
        handlers::loyalty::redeem_points,
        handlers::loyalty::expire_points,
        handlers::promotion::list_promotions,
        handlers::promotion::get_promotion,
        handlers::promotion::create_promotion,
        handlers::promotion::update_promotion,
        handlers::promotion::delete_promotion,
        handlers::promotion::toggle_promotion,
        handlers::promotion::validate_promotion,
        handlers::collection::list_collections,
        handlers::collection::register_payment,
        handlers::collection::list_receivables,
        handlers::collection::customer_balance,
        handlers::cash_register::open_register,
        handlers::cash_register::current_register,
        handlers::cash_register::list_registers,
        handlers::cash_register::get_register,
        handlers::cash_register::close_register,
        handlers::report::sales_summary,
        handlers::report::sales_by_day,
        handlers::report::top_products,
        handlers::report::dashboard,
        handlers::settings::list_users,
        handlers::settings::get_user,
        handlers::settings::create_user,
        handlers::settings::update_user,
        handlers::settings::toggle_user_active,
        handlers::settings::assign_roles,
        handlers::settings::list_roles,
        handlers::settings::create_role,
        handlers::settings::set_role_permissions,
        handlers::settings::list_permissions,
        handlers::settings::list_branches,
        handlers::settings::create_branch,
        handlers::settings::update_branch,
    ),
    components(
        schemas(
            ApiError,
            PaginationMeta,
            CustomerTier,
            OrderStatus,
            OrderUnit,
            PaymentType,
            PaymentStatus,
            PaymentMethod,
            MovementType,
            LoyaltyTransactionType,
            DiscountType,
            CashRegisterStatus,
            RouteStatus,
            StopStatus,
            LoginRequest,
            RefreshRequest,
            UserProfile,
            AuthResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            CreateBrandRequest,
            ProductPriceResponse,
            CreateOrderItem,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            CancelOrderRequest,
            InventoryItemResponse,
            CreateMovementRequest,
            CreateStockRuleRequest,
            UpdateStockRuleRequest,
            StockAlert,
            CreateDriverRequest,
            UpdateDriverRequest,
            CreateRouteRequest,
            StopUpdateRequest,
            CreateExpenseRequest,
            UpdateExpenseRequest,
            EarnPointsRequest,
            RedeemPointsRequest,
            ExpirePointsResponse,
            CreatePromotionRequest,
            UpdatePromotionRequest,
            ValidatePromotionRequest,
            PromotionValidation,
            CreateCollectionRequest,
            ReceivableResponse,
            CustomerBalance,
            OpenCashRegisterRequest,
            CloseCashRegisterRequest,
            StatusCount,
            SalesSummary,
            DailySales,
            TopProduct,
            Dashboard,
            CreateUserRequest,
            UpdateUserRequest,
            AssignRolesRequest,
            CreateRoleRequest,
            SetPermissionsRequest,
            CreateBranchRequest,
            UpdateBranchRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication"),
        (name = "customer", description = "Customers"),
        (name = "product", description = "Product catalog and tier prices"),
        (name = "order", description = "Orders and their lifecycle"),
        (name = "inventory", description = "Stock, movements and alerts"),
        (name = "delivery", description = "Drivers and delivery routes"),
        (name = "expense", description = "Branch expenses"),
        (name = "loyalty", description = "Loyalty points"),
        (name = "promotion", description = "Promotion codes"),
        (name = "collection", description = "Payments and receivables"),
        (name = "cash_register", description = "Cash register sessions"),
        (name = "report", description = "Sales reports and dashboard"),
        (name = "settings", description = "Users, roles and branches"),
    ),
    info(
        title = "DLA Backend API",
        version = "1.0.0",
        description = "Distribution business REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
