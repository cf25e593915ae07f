use super::{ApiClient, ClientResult, check};
use crate::entities::permission_entity;
use crate::models::*;

impl ApiClient {
    pub async fn list_users(
        &self,
        query: &UserQuery,
    ) -> ClientResult<PaginatedResponse<UserWithRoles>> {
        self.get_with("/settings/users", query).await
    }

    pub async fn get_user(&self, id: i32) -> ClientResult<UserWithRoles> {
        self.get(&format!("/settings/users/{id}")).await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> ClientResult<UserWithRoles> {
        check(request)?;
        self.post("/settings/users", request).await
    }

    pub async fn update_user(
        &self,
        id: i32,
        request: &UpdateUserRequest,
    ) -> ClientResult<UserWithRoles> {
        check(request)?;
        self.put(&format!("/settings/users/{id}"), request).await
    }

    pub async fn toggle_user_active(&self, id: i32) -> ClientResult<UserWithRoles> {
        self.patch_empty(&format!("/settings/users/{id}/toggle-active"))
            .await
    }

    pub async fn assign_roles(
        &self,
        id: i32,
        request: &AssignRolesRequest,
    ) -> ClientResult<UserWithRoles> {
        self.put(&format!("/settings/users/{id}/roles"), request)
            .await
    }

    pub async fn list_roles(&self) -> ClientResult<Vec<RoleWithPermissions>> {
        self.get("/settings/roles").await
    }

    pub async fn create_role(&self, request: &CreateRoleRequest) -> ClientResult<RoleWithPermissions> {
        check(request)?;
        self.post("/settings/roles", request).await
    }

    pub async fn set_role_permissions(
        &self,
        id: i32,
        request: &SetPermissionsRequest,
    ) -> ClientResult<RoleWithPermissions> {
        self.put(&format!("/settings/roles/{id}/permissions"), request)
            .await
    }

    pub async fn list_permissions(&self) -> ClientResult<Vec<permission_entity::Model>> {
        self.get("/settings/permissions").await
    }

    pub async fn list_branches(&self) -> ClientResult<Vec<BranchResponse>> {
        self.get("/settings/branches").await
    }

    pub async fn create_branch(&self, request: &CreateBranchRequest) -> ClientResult<BranchResponse> {
        check(request)?;
        self.post("/settings/branches", request).await
    }

    pub async fn update_branch(
        &self,
        id: i32,
        request: &UpdateBranchRequest,
    ) -> ClientResult<BranchResponse> {
        check(request)?;
        self.put(&format!("/settings/branches/{id}"), request)
            .await
    }
}
