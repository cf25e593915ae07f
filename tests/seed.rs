mod common;

use common::setup_db;
use dla_backend::config::SeedConfig;
use dla_backend::models::*;
use dla_backend::seed::{self, ADMIN_ROLE, PERMISSION_CATALOG, SeedReport};
use dla_backend::services::{AuthService, SettingsService};
use dla_backend::utils::JwtService;

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = setup_db().await;
    let config = SeedConfig::default();

    let first = seed::run(&db, &config).await.unwrap();
    assert_eq!(first.roles_created, 2);
    assert_eq!(first.permissions_created, PERMISSION_CATALOG.len());
    assert!(first.admin_created);
    assert!(first.admin_role_assigned);
    assert!(first.branch_created);

    let second = seed::run(&db, &config).await.unwrap();
    assert_eq!(second, SeedReport::default());

    let settings = SettingsService::new(db.clone());
    assert_eq!(settings.list_roles().await.unwrap().len(), 2);
    assert_eq!(
        settings.list_permissions().await.unwrap().len(),
        PERMISSION_CATALOG.len()
    );
    assert_eq!(settings.list_branches().await.unwrap().len(), 1);

    let users = settings.list_users(&UserQuery::default()).await.unwrap();
    assert_eq!(users.meta.total, 1);
    let admin = &users.data[0];
    assert_eq!(admin.user.email, config.admin_email);
    assert_eq!(admin.roles.len(), 1);
    assert_eq!(admin.roles[0].name, ADMIN_ROLE);
}

#[tokio::test]
async fn test_seeded_admin_can_log_in_with_every_permission() {
    let db = setup_db().await;
    let config = SeedConfig::default();
    seed::run(&db, &config).await.unwrap();

    let auth = AuthService::new(db.clone(), JwtService::new("test-secret", 900, 3600));
    let session = auth
        .login(LoginRequest {
            email: config.admin_email.to_uppercase(),
            password: config.admin_password.clone(),
        })
        .await
        .unwrap();
    assert_eq!(session.user.roles, vec![ADMIN_ROLE.to_string()]);
    assert_eq!(session.user.permissions.len(), PERMISSION_CATALOG.len());
    assert!(!session.access_token.is_empty());

    let refreshed = auth.refresh_token(&session.refresh_token).await.unwrap();
    assert_eq!(refreshed.user.id, session.user.id);

    let err = auth
        .login(LoginRequest {
            email: config.admin_email.clone(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, dla_backend::AppError::AuthError(_)));
}

#[tokio::test]
async fn test_seed_refuses_a_weak_admin_password() {
    let db = setup_db().await;
    let config = SeedConfig {
        admin_password: "admin".to_string(),
        ..SeedConfig::default()
    };
    let err = seed::run(&db, &config).await.unwrap_err();
    assert!(matches!(err, dla_backend::AppError::ConfigError(_)));
    // nothing was written
    assert!(
        SettingsService::new(db.clone())
            .list_roles()
            .await
            .unwrap()
            .is_empty()
    );
}
