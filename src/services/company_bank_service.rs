use crate::entities::{AccountType, BankPurpose, company_bank_entity as company_bank};
use crate::error::{AppError, AppResult};
use crate::models::{CompanyBankResponse, CreateCompanyBankRequest};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

const DEFAULT_COMPANY_NAME: &str = "Herbal Ayurveda Pvt. Ltd.";
const DEFAULT_DISPLAY_NAME: &str = "Prize Distributor Department";

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct CompanyBankService {
    pool: DatabaseConnection,
}

impl CompanyBankService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 有效账户：主账户在前，其余按 sort_order
    pub async fn list_active(&self) -> AppResult<Vec<CompanyBankResponse>> {
        let list = company_bank::Entity::find()
            .filter(company_bank::Column::IsActive.eq(true))
            .order_by_desc(company_bank::Column::IsPrimary)
            .order_by_asc(company_bank::Column::SortOrder)
            .order_by_asc(company_bank::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 新增账户；设为主账户时同一用途的其它主账户在同一事务内取消
    pub async fn create(
        &self,
        req: CreateCompanyBankRequest,
        operator: &str,
    ) -> AppResult<CompanyBankResponse> {
        let (Some(bank_name), Some(account_number), Some(ifsc_code), Some(account_holder_name)) = (
            non_empty(req.bank_name),
            non_empty(req.account_number),
            non_empty(req.ifsc_code),
            non_empty(req.account_holder_name),
        ) else {
            return Err(AppError::ValidationError(
                "All required bank fields must be filled".to_string(),
            ));
        };

        let purpose = req.purpose.unwrap_or(BankPurpose::PrizeDistribution);

        let txn = self.pool.begin().await?;

        if req.is_primary {
            company_bank::Entity::update_many()
                .col_expr(company_bank::Column::IsPrimary, Expr::value(false))
                .col_expr(company_bank::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(company_bank::Column::Purpose.eq(purpose.clone()))
                .filter(company_bank::Column::IsActive.eq(true))
                .filter(company_bank::Column::IsPrimary.eq(true))
                .exec(&txn)
                .await?;
        }

        let active = company_bank::ActiveModel {
            company_name: Set(
                non_empty(req.company_name).unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string())
            ),
            bank_name: Set(bank_name),
            account_number: Set(account_number),
            ifsc_code: Set(ifsc_code.to_uppercase()),
            account_holder_name: Set(account_holder_name),
            branch_name: Set(non_empty(req.branch_name)),
            branch_address: Set(non_empty(req.branch_address)),
            account_type: Set(req.account_type.unwrap_or(AccountType::Current)),
            purpose: Set(purpose),
            display_name: Set(
                non_empty(req.display_name).unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
            ),
            is_active: Set(true),
            is_primary: Set(req.is_primary),
            description: Set(non_empty(req.description)),
            instructions: Set(non_empty(req.instructions)),
            contact_phone: Set(non_empty(req.contact_phone)),
            contact_email: Set(non_empty(req.contact_email)),
            upi_id: Set(non_empty(req.upi_id)),
            created_by: Set(operator.to_string()),
            sort_order: Set(req.sort_order.unwrap_or(0)),
            ..Default::default()
        };
        let saved = active.insert(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Company bank account {} created (primary: {})",
            saved.id,
            saved.is_primary
        );
        Ok(saved.into())
    }

    pub async fn soft_delete(&self, id: i64, operator: &str) -> AppResult<()> {
        let model = company_bank::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Company bank details not found".to_string()))?;

        let mut active = model.into_active_model();
        active.is_active = Set(false);
        active.updated_by = Set(Some(operator.to_string()));
        active.updated_at = Set(Some(Utc::now()));
        active.update(&self.pool).await?;
        Ok(())
    }

    /// 主账户；没有则退回任一有效的奖金发放账户
    pub async fn primary(&self) -> AppResult<Option<company_bank::Model>> {
        let primary = company_bank::Entity::find()
            .filter(company_bank::Column::IsActive.eq(true))
            .filter(company_bank::Column::IsPrimary.eq(true))
            .order_by_asc(company_bank::Column::SortOrder)
            .one(&self.pool)
            .await?;

        if primary.is_some() {
            return Ok(primary);
        }

        Ok(company_bank::Entity::find()
            .filter(company_bank::Column::IsActive.eq(true))
            .filter(company_bank::Column::Purpose.eq(BankPurpose::PrizeDistribution))
            .order_by_asc(company_bank::Column::SortOrder)
            .one(&self.pool)
            .await?)
    }
}
