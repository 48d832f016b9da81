use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum AccountType {
    #[sea_orm(string_value = "Current")]
    Current,
    #[sea_orm(string_value = "Savings")]
    Savings,
    #[sea_orm(string_value = "Business")]
    Business,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum BankPurpose {
    #[sea_orm(string_value = "Prize Distribution")]
    #[serde(rename = "Prize Distribution")]
    PrizeDistribution,
    #[sea_orm(string_value = "Registration Fees")]
    #[serde(rename = "Registration Fees")]
    RegistrationFees,
    #[sea_orm(string_value = "General")]
    General,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// 公司收款账户实体
/// 同一 purpose 下最多一个 is_primary = true 的有效账户（由服务层在事务内维护）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "company_bank_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub branch_name: Option<String>,
    pub branch_address: Option<String>,
    pub account_type: AccountType,
    pub purpose: BankPurpose,
    pub display_name: String,
    pub is_active: bool,
    pub is_primary: bool,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub upi_id: Option<String>,
    pub qr_code_path: Option<String>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 展示用账号：保留前三位与后三位
    pub fn display_account_number(&self) -> String {
        let chars: Vec<char> = self.account_number.chars().collect();
        if chars.len() > 6 {
            let first3: String = chars[..3].iter().collect();
            let last3: String = chars[chars.len() - 3..].iter().collect();
            format!("{}{}{}", first3, "X".repeat(chars.len() - 6), last3)
        } else {
            self.account_number.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
