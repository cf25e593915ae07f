use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{
    branch_entity as branches, permission_entity as permissions, role_entity as roles,
    role_permission_entity as role_permissions, user_entity as users,
    user_role_entity as user_roles,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::hash_password;

#[derive(Clone)]
pub struct SettingsService {
    pool: DatabaseConnection,
}

pub(crate) async fn roles_of_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> AppResult<Vec<roles::Model>> {
    let role_ids: Vec<i32> = user_roles::Entity::find()
        .filter(user_roles::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|ur| ur.role_id)
        .collect();
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(roles::Entity::find()
        .filter(roles::Column::Id.is_in(role_ids))
        .order_by_asc(roles::Column::Name)
        .all(db)
        .await?)
}

pub(crate) async fn permissions_of_roles<C: ConnectionTrait>(
    db: &C,
    role_ids: Vec<i32>,
) -> AppResult<Vec<permissions::Model>> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut permission_ids: Vec<i32> = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.is_in(role_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|rp| rp.permission_id)
        .collect();
    permission_ids.sort_unstable();
    permission_ids.dedup();
    if permission_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(permissions::Entity::find()
        .filter(permissions::Column::Id.is_in(permission_ids))
        .order_by_asc(permissions::Column::Code)
        .all(db)
        .await?)
}

/// Replaces the role set of a user
async fn replace_user_roles<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    role_ids: &[i32],
) -> AppResult<()> {
    let mut wanted = role_ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let found = roles::Entity::find()
        .filter(roles::Column::Id.is_in(wanted.clone()))
        .count(db)
        .await?;
    if found as usize != wanted.len() {
        return Err(AppError::ValidationError("Unknown role id".to_string()));
    }

    user_roles::Entity::delete_many()
        .filter(user_roles::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    let now = Utc::now();
    for role_id in wanted {
        user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Replaces the permission set of a role
async fn replace_role_permissions<C: ConnectionTrait>(
    db: &C,
    role_id: i32,
    codes: &[String],
) -> AppResult<Vec<permissions::Model>> {
    let mut wanted: Vec<String> = codes.iter().map(|c| c.trim().to_string()).collect();
    wanted.sort();
    wanted.dedup();

    let found = permissions::Entity::find()
        .filter(permissions::Column::Code.is_in(wanted.clone()))
        .order_by_asc(permissions::Column::Code)
        .all(db)
        .await?;
    if found.len() != wanted.len() {
        let missing: Vec<&String> = wanted
            .iter()
            .filter(|code| !found.iter().any(|p| &p.code == *code))
            .collect();
        return Err(AppError::ValidationError(format!(
            "Unknown permissions: {missing:?}"
        )));
    }

    role_permissions::Entity::delete_many()
        .filter(role_permissions::Column::RoleId.eq(role_id))
        .exec(db)
        .await?;
    for permission in &found {
        role_permissions::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(found)
}

impl SettingsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    // ---- users ----

    pub async fn list_users(
        &self,
        query: &UserQuery,
    ) -> AppResult<PaginatedResponse<UserWithRoles>> {
        let params = query.pagination();
        let mut select = users::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(users::Column::Name.contains(search))
                    .add(users::Column::Email.contains(search.to_lowercase())),
            );
        }
        if let Some(active) = query.is_active {
            select = select.filter(users::Column::IsActive.eq(active));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(users::Column::BranchId.eq(branch_id));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for user in rows {
            let roles = roles_of_user(&self.pool, user.id).await?;
            items.push(UserWithRoles { user, roles });
        }
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_user(&self, id: i32) -> AppResult<UserWithRoles> {
        let user = users::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let roles = roles_of_user(&self.pool, user.id).await?;
        Ok(UserWithRoles { user, roles })
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserWithRoles> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let txn = self.pool.begin().await?;
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("Email {email} is already in use")));
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            email: Set(email),
            name: Set(request.name.trim().to_string()),
            password_hash: Set(hash_password(&request.password)?),
            branch_id: Set(request.branch_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        replace_user_roles(&txn, user.id, &request.role_ids).await?;
        txn.commit().await?;

        log::info!("User {} created", user.email);
        self.get_user(user.id).await
    }

    pub async fn update_user(&self, id: i32, request: UpdateUserRequest) -> AppResult<UserWithRoles> {
        request.validate()?;
        let user = users::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut am = user.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(password) = request.password {
            am.password_hash = Set(hash_password(&password)?);
        }
        if request.branch_id.is_some() {
            am.branch_id = Set(request.branch_id);
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.pool).await?;
        self.get_user(id).await
    }

    /// A user cannot deactivate their own account
    pub async fn toggle_user_active(&self, id: i32, acting_user_id: i32) -> AppResult<UserWithRoles> {
        if id == acting_user_id {
            return Err(AppError::ValidationError(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        let user = users::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let active = !user.is_active;
        let mut am = user.into_active_model();
        am.is_active = Set(active);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.pool).await?;
        log::info!("User {} active = {}", updated.email, updated.is_active);
        self.get_user(id).await
    }

    pub async fn assign_roles(&self, id: i32, request: AssignRolesRequest) -> AppResult<UserWithRoles> {
        let txn = self.pool.begin().await?;
        users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        replace_user_roles(&txn, id, &request.role_ids).await?;
        txn.commit().await?;
        log::info!("Roles of user {} set to {:?}", id, request.role_ids);
        self.get_user(id).await
    }

    // ---- roles & permissions ----

    pub async fn list_roles(&self) -> AppResult<Vec<RoleWithPermissions>> {
        let all = roles::Entity::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.pool)
            .await?;
        let mut items = Vec::with_capacity(all.len());
        for role in all {
            let permissions = permissions_of_roles(&self.pool, vec![role.id]).await?;
            items.push(RoleWithPermissions { role, permissions });
        }
        Ok(items)
    }

    pub async fn create_role(&self, request: CreateRoleRequest) -> AppResult<RoleWithPermissions> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        let existing = roles::Entity::find()
            .filter(roles::Column::Name.eq(request.name.clone()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Role {} already exists",
                request.name
            )));
        }
        let role = roles::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let permissions = replace_role_permissions(&txn, role.id, &request.permission_codes).await?;
        txn.commit().await?;

        log::info!("Role {} created", role.name);
        Ok(RoleWithPermissions { role, permissions })
    }

    pub async fn set_role_permissions(
        &self,
        id: i32,
        request: SetPermissionsRequest,
    ) -> AppResult<RoleWithPermissions> {
        let txn = self.pool.begin().await?;
        let role = roles::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;
        let permissions = replace_role_permissions(&txn, role.id, &request.permission_codes).await?;
        txn.commit().await?;
        log::info!("Permissions of role {} replaced", role.name);
        Ok(RoleWithPermissions { role, permissions })
    }

    pub async fn list_permissions(&self) -> AppResult<Vec<permissions::Model>> {
        Ok(permissions::Entity::find()
            .order_by_asc(permissions::Column::Code)
            .all(&self.pool)
            .await?)
    }

    // ---- branches ----

    pub async fn list_branches(&self) -> AppResult<Vec<BranchResponse>> {
        Ok(branches::Entity::find()
            .order_by_asc(branches::Column::Code)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(BranchResponse::from)
            .collect())
    }

    pub async fn create_branch(&self, request: CreateBranchRequest) -> AppResult<BranchResponse> {
        request.validate()?;
        let existing = branches::Entity::find()
            .filter(branches::Column::Code.eq(request.code.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Branch {} already exists",
                request.code
            )));
        }

        let now = Utc::now();
        let branch = branches::ActiveModel {
            code: Set(request.code),
            name: Set(request.name.trim().to_string()),
            address: Set(request.address),
            phone: Set(request.phone),
            delivery_days: Set(normalize_days(&request.delivery_days)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Branch {} created", branch.code);
        Ok(branch.into())
    }

    pub async fn update_branch(
        &self,
        id: i32,
        request: UpdateBranchRequest,
    ) -> AppResult<BranchResponse> {
        request.validate()?;
        let mut am = branches::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?
            .into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if request.address.is_some() {
            am.address = Set(request.address);
        }
        if request.phone.is_some() {
            am.phone = Set(request.phone);
        }
        if let Some(days) = request.delivery_days {
            am.delivery_days = Set(normalize_days(&days));
        }
        if let Some(active) = request.is_active {
            am.is_active = Set(active);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.pool).await?.into())
    }
}

fn normalize_days(days: &[String]) -> String {
    use crate::entities::branches::{format_delivery_days, parse_delivery_days};
    let mut parsed = parse_delivery_days(&days.join(","));
    parsed.sort_by_key(|d| d.num_days_from_monday());
    parsed.dedup();
    format_delivery_days(&parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_days_orders_and_dedups() {
        let days = vec!["fri".to_string(), "MON".to_string(), "FRI".to_string()];
        assert_eq!(normalize_days(&days), "MON,FRI");
    }
}
