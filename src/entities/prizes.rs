use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Medal {
    #[sea_orm(string_value = "🥇")]
    #[serde(rename = "🥇")]
    Gold,
    #[sea_orm(string_value = "🥈")]
    #[serde(rename = "🥈")]
    Silver,
    #[sea_orm(string_value = "🥉")]
    #[serde(rename = "🥉")]
    Bronze,
    #[sea_orm(string_value = "🏆")]
    #[serde(rename = "🏆")]
    Trophy,
    #[sea_orm(string_value = "🎁")]
    #[serde(rename = "🎁")]
    Gift,
}

/// 展示奖品实体
/// - amount: 奖品价值（卢比）
/// - image: images 目录下的文件名
/// - position: 展示顺序（唯一）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub amount: i64,
    pub image: String,
    pub position: i32,
    pub emoji: String,
    pub medal: Medal,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
