use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum PrizeType {
    #[sea_orm(string_value = "Cash")]
    Cash,
    #[sea_orm(string_value = "Car")]
    Car,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum BankDetailStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Verified")]
    Verified,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl BankDetailStatus {
    /// 后台列表徽标样式
    pub fn badge_class(&self) -> &'static str {
        match self {
            BankDetailStatus::Verified => "success",
            BankDetailStatus::Approved => "info",
            BankDetailStatus::Paid => "primary",
            BankDetailStatus::Rejected => "danger",
            BankDetailStatus::Pending => "warning",
        }
    }
}

impl std::fmt::Display for BankDetailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "Not Verified")]
    #[serde(rename = "Not Verified")]
    NotVerified,
    #[sea_orm(string_value = "Under Review")]
    #[serde(rename = "Under Review")]
    UnderReview,
    #[sea_orm(string_value = "Verified")]
    Verified,
    #[sea_orm(string_value = "Failed")]
    Failed,
}

impl VerificationStatus {
    pub fn badge_class(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "success",
            VerificationStatus::UnderReview => "info",
            VerificationStatus::Failed => "danger",
            VerificationStatus::NotVerified => "secondary",
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "Bank Transfer")]
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[sea_orm(string_value = "UPI")]
    #[serde(rename = "UPI")]
    Upi,
    #[sea_orm(string_value = "Cheque")]
    Cheque,
    #[sea_orm(string_value = "Cash")]
    Cash,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// 中奖者银行信息实体（每个中奖者最多一条有效记录）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bank_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub winner_id: i64,
    pub winner_name: String,
    pub phone: String,
    pub wcode: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub branch_name: Option<String>,
    /// 奖金（卢比）
    pub prize_amount: i64,
    pub prize_type: PrizeType,
    pub status: BankDetailStatus,
    pub verification_status: VerificationStatus,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 账号脱敏：仅保留后四位
    pub fn masked_account_number(&self) -> String {
        let chars: Vec<char> = self.account_number.chars().collect();
        if chars.len() > 4 {
            let last4: String = chars[chars.len() - 4..].iter().collect();
            format!("{}{}", "X".repeat(chars.len() - 4), last4)
        } else {
            self.account_number.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::winners::Entity",
        from = "Column::WinnerId",
        to = "super::winners::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Winner,
}

impl Related<super::winners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_from_label() {
        assert_eq!(
            BankDetailStatus::try_from_value(&"Approved".to_string()).ok(),
            Some(BankDetailStatus::Approved)
        );
        assert!(BankDetailStatus::try_from_value(&"Active".to_string()).is_err());
        assert_eq!(
            VerificationStatus::try_from_value(&"Under Review".to_string()).ok(),
            Some(VerificationStatus::UnderReview)
        );
        assert_eq!(BankDetailStatus::Paid.badge_class(), "primary");
    }
}
