use crate::entities::company_bank_entity;
use crate::entities::{AccountType, BankPurpose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBankResponse {
    pub id: i64,
    pub company_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub display_account_number: String,
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
    pub sort_order: i32,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<company_bank_entity::Model> for CompanyBankResponse {
    fn from(m: company_bank_entity::Model) -> Self {
        Self {
            display_account_number: m.display_account_number(),
            id: m.id,
            company_name: m.company_name,
            bank_name: m.bank_name,
            account_number: m.account_number,
            ifsc_code: m.ifsc_code,
            account_holder_name: m.account_holder_name,
            branch_name: m.branch_name,
            branch_address: m.branch_address,
            account_type: m.account_type,
            purpose: m.purpose,
            display_name: m.display_name,
            is_active: m.is_active,
            is_primary: m.is_primary,
            description: m.description,
            instructions: m.instructions,
            contact_phone: m.contact_phone,
            contact_email: m.contact_email,
            upi_id: m.upi_id,
            qr_code_path: m.qr_code_path,
            sort_order: m.sort_order,
            created_by: m.created_by,
            updated_by: m.updated_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 前台展示视图（账号中间脱敏）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBankPublicView {
    pub display_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub branch_name: Option<String>,
    pub upi_id: Option<String>,
    pub instructions: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl From<company_bank_entity::Model> for CompanyBankPublicView {
    fn from(m: company_bank_entity::Model) -> Self {
        Self {
            account_number: m.display_account_number(),
            display_name: m.display_name,
            bank_name: m.bank_name,
            ifsc_code: m.ifsc_code,
            account_holder_name: m.account_holder_name,
            branch_name: m.branch_name,
            upi_id: m.upi_id,
            instructions: m.instructions,
            contact_phone: m.contact_phone,
            contact_email: m.contact_email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyBankRequest {
    pub company_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub account_holder_name: Option<String>,
    pub branch_name: Option<String>,
    pub branch_address: Option<String>,
    pub account_type: Option<AccountType>,
    pub purpose: Option<BankPurpose>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub upi_id: Option<String>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_hides_middle_digits() {
        let model = company_bank_entity::Model {
            id: 1,
            company_name: "Herbal".into(),
            bank_name: "SBI".into(),
            account_number: "123456789012".into(),
            ifsc_code: "SBIN0001".into(),
            account_holder_name: "Herbal Pvt".into(),
            branch_name: None,
            branch_address: None,
            account_type: AccountType::Current,
            purpose: BankPurpose::PrizeDistribution,
            display_name: "Main".into(),
            is_active: true,
            is_primary: true,
            description: None,
            instructions: None,
            contact_phone: None,
            contact_email: None,
            upi_id: None,
            qr_code_path: None,
            created_by: "Admin".into(),
            updated_by: None,
            sort_order: 0,
            created_at: None,
            updated_at: None,
        };
        let view = CompanyBankPublicView::from(model);
        assert_eq!(view.account_number, "123XXXXXX012");
    }
}
