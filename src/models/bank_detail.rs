use crate::entities::bank_detail_entity;
use crate::entities::{BankDetailStatus, PaymentMethod, PrizeType, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailResponse {
    pub id: i64,
    pub winner_id: i64,
    pub winner_name: String,
    pub phone: String,
    pub wcode: String,
    pub bank_name: String,
    pub account_number: String,
    pub masked_account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub branch_name: Option<String>,
    pub prize_amount: i64,
    pub prize_type: PrizeType,
    pub status: BankDetailStatus,
    pub status_badge_class: String,
    pub verification_status: VerificationStatus,
    pub verification_badge_class: String,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<bank_detail_entity::Model> for BankDetailResponse {
    fn from(m: bank_detail_entity::Model) -> Self {
        Self {
            masked_account_number: m.masked_account_number(),
            status_badge_class: m.status.badge_class().to_string(),
            verification_badge_class: m.verification_status.badge_class().to_string(),
            id: m.id,
            winner_id: m.winner_id,
            winner_name: m.winner_name,
            phone: m.phone,
            wcode: m.wcode,
            bank_name: m.bank_name,
            account_number: m.account_number,
            ifsc_code: m.ifsc_code,
            account_holder_name: m.account_holder_name,
            branch_name: m.branch_name,
            prize_amount: m.prize_amount,
            prize_type: m.prize_type,
            status: m.status,
            verification_status: m.verification_status,
            notes: m.notes,
            admin_notes: m.admin_notes,
            payment_date: m.payment_date,
            transaction_id: m.transaction_id,
            payment_method: m.payment_method,
            created_by: m.created_by,
            updated_by: m.updated_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 按手机号新增 / 更新中奖者银行信息
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBankDetailRequest {
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    pub winner_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    #[schema(example = "SBIN0001234")]
    pub ifsc_code: Option<String>,
    pub account_holder_name: Option<String>,
    pub branch_name: Option<String>,
    /// 为空时取中奖记录上的奖金数值
    pub prize_amount: Option<i64>,
    pub prize_type: Option<PrizeType>,
    pub status: Option<BankDetailStatus>,
    pub verification_status: Option<VerificationStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BankDetailListQuery {
    pub page: Option<u64>,
    /// 模糊匹配 winner_name / phone / bank_name / account_holder_name
    pub search: Option<String>,
    /// 非法或空状态忽略
    pub status: Option<String>,
}

