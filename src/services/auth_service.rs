use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::settings_service::{permissions_of_roles, roles_of_user};
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.trim().to_lowercase()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("Failed login for {}", user.email);
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }
        if !user.is_active {
            return Err(AppError::AuthError("User is inactive".to_string()));
        }

        log::info!("User {} logged in", user.email);
        self.issue_tokens(user).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i32 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User not found".to_string()))?;
        if !user.is_active {
            return Err(AppError::AuthError("User is inactive".to_string()));
        }

        // roles may have changed since the refresh token was issued
        self.issue_tokens(user).await
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<UserProfile> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        self.load_profile(user).await
    }

    async fn load_profile(&self, user: users::Model) -> AppResult<UserProfile> {
        let roles = roles_of_user(&self.pool, user.id).await?;
        let permissions =
            permissions_of_roles(&self.pool, roles.iter().map(|r| r.id).collect()).await?;
        Ok(UserProfile {
            id: user.id,
            email: user.email,
            name: user.name,
            branch_id: user.branch_id,
            roles: roles.into_iter().map(|r| r.name).collect(),
            permissions: permissions.into_iter().map(|p| p.code).collect(),
        })
    }

    async fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let profile = self.load_profile(user).await?;
        let subject = TokenSubject {
            user_id: profile.id,
            email: profile.email.clone(),
            roles: profile.roles.clone(),
            permissions: profile.permissions.clone(),
        };

        Ok(AuthResponse {
            access_token: self.jwt_service.generate_access_token(&subject)?,
            refresh_token: self.jwt_service.generate_refresh_token(&subject)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: profile,
        })
    }
}
