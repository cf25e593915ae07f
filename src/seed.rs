//! Bootstrap data: roles, the permission catalog, the admin account and the
//! default branch. Every step is create-if-absent, so running it again is a
//! no-op.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::config::SeedConfig;
use crate::entities::branches::{format_delivery_days, parse_delivery_days};
use crate::entities::{
    branch_entity as branches, permission_entity as permissions,
    role_entity as roles, role_permission_entity as role_permissions,
    user_entity as users, user_role_entity as user_roles,
};
use crate::error::{AppError, AppResult};
use crate::utils::{hash_password, password_issue};

pub const ADMIN_ROLE: &str = "ADMIN";
pub const SELLER_ROLE: &str = "VENDEDOR";

pub const PERMISSION_CATALOG: &[(&str, &str)] = &[
    ("customers.manage", "Manage customers"),
    ("products.manage", "Manage products, categories and brands"),
    ("orders.manage", "Create and move orders"),
    ("inventory.manage", "Register stock movements and rules"),
    ("deliveries.manage", "Manage drivers and routes"),
    ("expenses.manage", "Record expenses"),
    ("loyalty.manage", "Earn and redeem loyalty points"),
    ("promotions.manage", "Manage promotion codes"),
    ("collections.manage", "Register payments"),
    ("cash_register.manage", "Open and close cash registers"),
    ("reports.view", "View reports"),
    ("settings.manage", "Manage users, roles and branches"),
];

/// Permissions the seller role starts with
const SELLER_PERMISSIONS: &[&str] = &[
    "customers.manage",
    "orders.manage",
    "collections.manage",
    "loyalty.manage",
];

/// What a seed run actually inserted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub permissions_created: usize,
    pub grants_created: usize,
    pub admin_created: bool,
    pub admin_role_assigned: bool,
    pub branch_created: bool,
}

async fn ensure_role<C: ConnectionTrait>(
    db: &C,
    name: &str,
    description: &str,
    report: &mut SeedReport,
) -> AppResult<roles::Model> {
    if let Some(role) = roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(role);
    }
    report.roles_created += 1;
    Ok(roles::ActiveModel {
        name: Set(name.to_string()),
        description: Set(Some(description.to_string())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

async fn ensure_permission<C: ConnectionTrait>(
    db: &C,
    code: &str,
    description: &str,
    report: &mut SeedReport,
) -> AppResult<permissions::Model> {
    if let Some(permission) = permissions::Entity::find()
        .filter(permissions::Column::Code.eq(code))
        .one(db)
        .await?
    {
        return Ok(permission);
    }
    report.permissions_created += 1;
    Ok(permissions::ActiveModel {
        code: Set(code.to_string()),
        description: Set(Some(description.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

async fn ensure_grant<C: ConnectionTrait>(
    db: &C,
    role_id: i32,
    permission_id: i32,
    report: &mut SeedReport,
) -> AppResult<()> {
    let existing = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.eq(role_id))
        .filter(role_permissions::Column::PermissionId.eq(permission_id))
        .one(db)
        .await?;
    if existing.is_none() {
        role_permissions::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        report.grants_created += 1;
    }
    Ok(())
}

async fn ensure_branch<C: ConnectionTrait>(
    db: &C,
    config: &SeedConfig,
    report: &mut SeedReport,
) -> AppResult<branches::Model> {
    let code = config.branch_code.trim().to_ascii_uppercase();
    if let Some(branch) = branches::Entity::find()
        .filter(branches::Column::Code.eq(code.clone()))
        .one(db)
        .await?
    {
        return Ok(branch);
    }

    let days = parse_delivery_days(&config.delivery_days);
    if days.is_empty() {
        return Err(AppError::ConfigError(format!(
            "Invalid seed delivery days: {}",
            config.delivery_days
        )));
    }
    let now = Utc::now();
    report.branch_created = true;
    Ok(branches::ActiveModel {
        code: Set(code),
        name: Set(config.branch_name.clone()),
        address: Set(None),
        phone: Set(None),
        delivery_days: Set(format_delivery_days(&days)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

async fn ensure_admin<C: ConnectionTrait>(
    db: &C,
    config: &SeedConfig,
    branch_id: i32,
    report: &mut SeedReport,
) -> AppResult<users::Model> {
    let email = config.admin_email.trim().to_lowercase();
    if let Some(user) = users::Entity::find()
        .filter(users::Column::Email.eq(email.clone()))
        .one(db)
        .await?
    {
        return Ok(user);
    }
    let now = Utc::now();
    report.admin_created = true;
    Ok(users::ActiveModel {
        email: Set(email),
        name: Set(config.admin_name.clone()),
        password_hash: Set(hash_password(&config.admin_password)?),
        branch_id: Set(Some(branch_id)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

async fn ensure_user_role<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    role_id: i32,
    report: &mut SeedReport,
) -> AppResult<()> {
    let existing = user_roles::Entity::find()
        .filter(user_roles::Column::UserId.eq(user_id))
        .filter(user_roles::Column::RoleId.eq(role_id))
        .one(db)
        .await?;
    if existing.is_none() {
        user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        report.admin_role_assigned = true;
    }
    Ok(())
}

/// Runs the whole seed in one transaction
pub async fn run(db: &DatabaseConnection, config: &SeedConfig) -> AppResult<SeedReport> {
    if let Some(issue) = password_issue(&config.admin_password) {
        return Err(AppError::ConfigError(format!(
            "Seed admin password rejected: {}",
            issue.message()
        )));
    }

    let mut report = SeedReport::default();
    let txn = db.begin().await?;

    let admin_role = ensure_role(&txn, ADMIN_ROLE, "Full access", &mut report).await?;
    let seller_role = ensure_role(&txn, SELLER_ROLE, "Sales staff", &mut report).await?;

    for (code, description) in PERMISSION_CATALOG {
        let permission = ensure_permission(&txn, code, description, &mut report).await?;
        ensure_grant(&txn, admin_role.id, permission.id, &mut report).await?;
        if SELLER_PERMISSIONS.contains(code) {
            ensure_grant(&txn, seller_role.id, permission.id, &mut report).await?;
        }
    }

    let branch = ensure_branch(&txn, config, &mut report).await?;
    let admin = ensure_admin(&txn, config, branch.id, &mut report).await?;
    ensure_user_role(&txn, admin.id, admin_role.id, &mut report).await?;

    txn.commit().await?;
    log::info!(
        "Seed finished: {} roles, {} permissions, {} grants created; admin created: {}, branch created: {}",
        report.roles_created,
        report.permissions_created,
        report.grants_created,
        report.admin_created,
        report.branch_created
    );
    Ok(report)
}
