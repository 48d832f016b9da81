use crate::database::contains_ci;
use crate::entities::{
    BankDetailStatus, PaymentMethod, PrizeType, VerificationStatus,
    bank_detail_entity as bank_details, winner_entity as winners,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    BankDetailListQuery, BankDetailResponse, PaginatedResponse, PaginationParams,
    UpsertBankDetailRequest,
};
use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

const BANK_DETAILS_PAGE_SIZE: u64 = 20;

/// 校验后的银行信息字段
#[derive(Debug, Clone, PartialEq)]
struct BankFields {
    phone: String,
    winner_name: String,
    bank_name: String,
    account_number: String,
    ifsc_code: String,
    account_holder_name: String,
}

fn validate_upsert(req: &UpsertBankDetailRequest) -> AppResult<BankFields> {
    let take = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match (
        take(&req.phone),
        take(&req.winner_name),
        take(&req.bank_name),
        take(&req.account_number),
        take(&req.ifsc_code),
        take(&req.account_holder_name),
    ) {
        (
            Some(phone),
            Some(winner_name),
            Some(bank_name),
            Some(account_number),
            Some(ifsc_code),
            Some(account_holder_name),
        ) => Ok(BankFields {
            phone,
            winner_name,
            bank_name,
            account_number,
            ifsc_code: ifsc_code.to_uppercase(),
            account_holder_name,
        }),
        _ => Err(AppError::ValidationError(
            "All required fields must be filled".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct BankDetailService {
    pool: DatabaseConnection,
}

impl BankDetailService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        query: &BankDetailListQuery,
    ) -> AppResult<PaginatedResponse<BankDetailResponse>> {
        let params = PaginationParams::new(query.page, None, BANK_DETAILS_PAGE_SIZE);

        let mut select =
            bank_details::Entity::find().filter(bank_details::Column::IsActive.eq(true));

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(bank_details::Column::WinnerName, search))
                    .add(contains_ci(bank_details::Column::Phone, search))
                    .add(contains_ci(bank_details::Column::BankName, search))
                    .add(contains_ci(bank_details::Column::AccountHolderName, search)),
            );
        }
        if let Some(status) = query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| BankDetailStatus::try_from_value(&s.to_string()).ok())
        {
            select = select.filter(bank_details::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;
        let list = select
            .order_by_desc(bank_details::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            list.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    /// 按手机号找到有效中奖者，更新其现有银行信息或新建一条
    ///
    /// 返回 (记录, 是否新建)
    pub async fn upsert_by_phone(
        &self,
        req: UpsertBankDetailRequest,
        operator: &str,
    ) -> AppResult<(BankDetailResponse, bool)> {
        let fields = validate_upsert(&req)?;

        let winner = winners::Entity::find()
            .filter(winners::Column::Phone.eq(fields.phone.as_str()))
            .filter(winners::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Winner not found with the provided phone number".to_string())
            })?;

        let prize_amount = req
            .prize_amount
            .filter(|v| *v > 0)
            .or_else(|| winner.prize_amount_value())
            .unwrap_or(0);

        let existing = bank_details::Entity::find()
            .filter(bank_details::Column::WinnerId.eq(winner.id))
            .filter(bank_details::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?;

        let status = req.status.clone().unwrap_or(BankDetailStatus::Pending);
        let notes = req.notes.clone().filter(|s| !s.trim().is_empty());
        let branch_name = req.branch_name.clone().filter(|s| !s.trim().is_empty());

        let (saved, created) = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.winner_name = Set(fields.winner_name);
                active.bank_name = Set(fields.bank_name);
                active.account_number = Set(fields.account_number);
                active.ifsc_code = Set(fields.ifsc_code);
                active.account_holder_name = Set(fields.account_holder_name);
                active.branch_name = Set(branch_name);
                active.prize_amount = Set(prize_amount);
                active.status = Set(status);
                active.notes = Set(notes);
                if let Some(v) = req.prize_type {
                    active.prize_type = Set(v);
                }
                if let Some(v) = req.verification_status {
                    active.verification_status = Set(v);
                }
                if let Some(v) = req.payment_method {
                    active.payment_method = Set(v);
                }
                if let Some(v) = req.transaction_id.filter(|s| !s.trim().is_empty()) {
                    active.transaction_id = Set(Some(v));
                }
                if let Some(v) = req.admin_notes.filter(|s| !s.trim().is_empty()) {
                    active.admin_notes = Set(Some(v));
                }
                if matches!(req.status, Some(BankDetailStatus::Paid)) {
                    active.payment_date = Set(Some(Utc::now()));
                }
                active.updated_by = Set(Some(operator.to_string()));
                active.updated_at = Set(Some(Utc::now()));
                (active.update(&self.pool).await?, false)
            }
            None => {
                let active = bank_details::ActiveModel {
                    winner_id: Set(winner.id),
                    winner_name: Set(fields.winner_name),
                    phone: Set(fields.phone),
                    wcode: Set(winner.wcode.clone()),
                    bank_name: Set(fields.bank_name),
                    account_number: Set(fields.account_number),
                    ifsc_code: Set(fields.ifsc_code),
                    account_holder_name: Set(fields.account_holder_name),
                    branch_name: Set(branch_name),
                    prize_amount: Set(prize_amount),
                    prize_type: Set(req.prize_type.unwrap_or(PrizeType::Cash)),
                    status: Set(status.clone()),
                    verification_status: Set(req
                        .verification_status
                        .unwrap_or(VerificationStatus::NotVerified)),
                    notes: Set(notes),
                    admin_notes: Set(req.admin_notes.filter(|s| !s.trim().is_empty())),
                    payment_date: Set((status == BankDetailStatus::Paid).then(Utc::now)),
                    transaction_id: Set(req.transaction_id.filter(|s| !s.trim().is_empty())),
                    payment_method: Set(req.payment_method.unwrap_or(PaymentMethod::BankTransfer)),
                    created_by: Set(operator.to_string()),
                    is_active: Set(true),
                    ..Default::default()
                };
                (active.insert(&self.pool).await?, true)
            }
        };

        log::info!(
            "Bank details {} for winner {} ({})",
            if created { "created" } else { "updated" },
            winner.id,
            winner.wcode
        );

        Ok((saved.into(), created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpsertBankDetailRequest {
        UpsertBankDetailRequest {
            phone: Some(" 9876543210 ".into()),
            winner_name: Some("John".into()),
            bank_name: Some("SBI".into()),
            account_number: Some("123456789".into()),
            ifsc_code: Some("sbin0001234".into()),
            account_holder_name: Some("John".into()),
            branch_name: None,
            prize_amount: None,
            prize_type: None,
            status: None,
            verification_status: None,
            payment_method: None,
            transaction_id: None,
            notes: None,
            admin_notes: None,
        }
    }

    #[test]
    fn test_validate_uppercases_ifsc() {
        let fields = validate_upsert(&request()).unwrap();
        assert_eq!(fields.ifsc_code, "SBIN0001234");
        assert_eq!(fields.phone, "9876543210");
    }

    #[test]
    fn test_validate_requires_fields() {
        let mut req = request();
        req.bank_name = Some("  ".into());
        assert!(matches!(
            validate_upsert(&req),
            Err(AppError::ValidationError(_))
        ));
    }
}
