use crate::entities::admin_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "Admin12345")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<admin_entity::Model> for AdminResponse {
    fn from(m: admin_entity::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
            last_login_at: m.last_login_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub admin: AdminResponse,
    pub access_token: String,
    pub expires_in: i64,
}

/// 后台设置：修改密码需同时提交当前密码
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
    pub email: Option<String>,
}
