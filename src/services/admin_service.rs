use crate::config::AdminBootstrapConfig;
use crate::entities::admin_entity as admins;
use crate::error::{AppError, AppResult};
use crate::models::{AdminLoginRequest, AdminLoginResponse, AdminResponse, UpdateSettingsRequest};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const DEFAULT_ROLE: &str = "admin";

/// 设置变更前的校验结果
#[derive(Debug, PartialEq)]
struct SettingsChange {
    new_password: Option<String>,
    email: Option<String>,
}

fn trimmed(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 新密码需与确认一致并满足强度要求；当前密码的正确性在调用方核对
fn plan_settings_change(req: &UpdateSettingsRequest) -> AppResult<SettingsChange> {
    let new_password = req.new_password.clone().filter(|s| !s.is_empty());

    if let Some(new_password) = &new_password {
        if req.current_password.as_deref().unwrap_or_default().is_empty() {
            return Err(AppError::ValidationError(
                "Current password is required to change password".to_string(),
            ));
        }
        if let Some(confirm) = &req.confirm_password
            && confirm != new_password
        {
            return Err(AppError::ValidationError(
                "New password and confirmation do not match".to_string(),
            ));
        }
        validate_password(new_password)?;
    }

    Ok(SettingsChange {
        new_password,
        email: trimmed(&req.email),
    })
}

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// 启动时调用：同名管理员不存在则创建
    pub async fn ensure_default_admin(&self, bootstrap: &AdminBootstrapConfig) -> AppResult<()> {
        let existing = admins::Entity::find()
            .filter(admins::Column::Username.eq(bootstrap.username.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let active = admins::ActiveModel {
            username: Set(bootstrap.username.clone()),
            password_hash: Set(hash_password(&bootstrap.password)?),
            email: Set(bootstrap.email.clone()),
            role: Set(DEFAULT_ROLE.to_string()),
            is_active: Set(true),
            ..Default::default()
        };
        active.insert(&self.pool).await?;

        log::warn!(
            "Default admin '{}' created; change its password after first login",
            bootstrap.username
        );
        Ok(())
    }

    pub async fn login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        let admin = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .filter(admins::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &admin.password_hash)? {
            log::warn!("Failed login attempt for admin '{}'", username);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        let mut active = admin.into_active_model();
        active.last_login_at = Set(Some(Utc::now()));
        let admin = active.update(&self.pool).await?;

        let access_token =
            self.jwt_service
                .generate_access_token(admin.id, &admin.username, &admin.role)?;

        log::info!("Admin '{}' logged in", admin.username);
        Ok(AdminLoginResponse {
            admin: admin.into(),
            access_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    async fn find_admin(&self, admin_id: i64) -> AppResult<admins::Model> {
        admins::Entity::find_by_id(admin_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
    }

    pub async fn get_settings(&self, admin_id: i64) -> AppResult<AdminResponse> {
        Ok(self.find_admin(admin_id).await?.into())
    }

    pub async fn update_settings(
        &self,
        admin_id: i64,
        req: UpdateSettingsRequest,
    ) -> AppResult<AdminResponse> {
        let change = plan_settings_change(&req)?;
        let admin = self.find_admin(admin_id).await?;

        let mut active = admin.clone().into_active_model();
        if let Some(new_password) = &change.new_password {
            let current = req.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, &admin.password_hash)? {
                return Err(AppError::ValidationError(
                    "Current password is incorrect".to_string(),
                ));
            }
            active.password_hash = Set(hash_password(new_password)?);
        }
        if let Some(email) = change.email {
            active.email = Set(Some(email));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&self.pool).await?;
        log::info!("Admin '{}' updated settings", updated.username);
        Ok(updated.into())
    }
}
