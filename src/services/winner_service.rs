use crate::database::contains_ci;
use crate::entities::winner_entity as winners;
use crate::error::{AppError, AppResult};
use crate::import::{DbWinnerStore, WinnerCandidate, WinnerStore};
use std::sync::Arc;
use crate::models::{
    CreateWinnerRequest, PaginatedResponse, PaginationParams, SearchType, UpdateWinnerRequest,
    WinnerListQuery, WinnerResponse, WinnerStats,
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

pub const DUPLICATE_WINNER_MESSAGE: &str =
    "Winner with this phone number, W-Code, or ID already exists";

fn conflict_or_db(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(DUPLICATE_WINNER_MESSAGE.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct WinnerService {
    pool: DatabaseConnection,
    store: Arc<dyn WinnerStore>,
}

impl WinnerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self {
            store: Arc::new(DbWinnerStore::new(pool.clone())),
            pool,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_store(pool: DatabaseConnection, store: Arc<dyn WinnerStore>) -> Self {
        Self { pool, store }
    }

    async fn require(&self, id: i64) -> AppResult<winners::Model> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Winner not found".to_string()))
    }

    /// 有效中奖者分页列表（按创建时间倒序）
    pub async fn list(
        &self,
        query: &WinnerListQuery,
        default_page_size: u64,
    ) -> AppResult<PaginatedResponse<WinnerResponse>> {
        let params = PaginationParams::new(query.page, query.limit, default_page_size);

        let mut select = winners::Entity::find().filter(winners::Column::IsActive.eq(true));

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(winners::Column::Name, search))
                    .add(contains_ci(winners::Column::Phone, search))
                    .add(contains_ci(winners::Column::Wcode, search)),
            );
        }
        if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(winners::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;
        let list = select
            .order_by_desc(winners::Column::CreatedAt)
            .order_by_desc(winners::Column::Id)
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

    /// 后台单条新增：全部字段必填，三键任一冲突即拒绝
    pub async fn create(
        &self,
        req: CreateWinnerRequest,
        default_status: &str,
    ) -> AppResult<WinnerResponse> {
        let fields = (
            required(req.id),
            required(req.phone),
            required(req.name),
            required(req.address),
            required(req.paid),
            required(req.product),
            required(req.prize_amount),
            required(req.date),
            required(req.wcode),
        );
        let (
            Some(external_id),
            Some(phone),
            Some(name),
            Some(address),
            Some(paid),
            Some(product),
            Some(prize_amount),
            Some(date),
            Some(wcode),
        ) = fields
        else {
            return Err(AppError::ValidationError(
                "All fields are required".to_string(),
            ));
        };

        let candidate = WinnerCandidate {
            external_id,
            phone,
            name,
            address,
            paid,
            product,
            prize_amount,
            date,
            status: required(req.status).unwrap_or_else(|| default_status.to_string()),
            wcode,
        };

        if self.store.find_conflict(&candidate).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_WINNER_MESSAGE.to_string()));
        }

        let model = self.store.insert(&candidate).await.map_err(conflict_or_db)?;
        log::info!("Winner {} created (wcode {})", model.id, model.wcode);
        Ok(model.into())
    }

    pub async fn update(&self, id: i64, req: UpdateWinnerRequest) -> AppResult<WinnerResponse> {
        let model = self.require(id).await?;

        let mut active = model.into_active_model();
        if let Some(v) = required(req.phone) {
            active.phone = Set(v);
        }
        if let Some(v) = required(req.name) {
            active.name = Set(v);
        }
        if let Some(v) = required(req.address) {
            active.address = Set(v);
        }
        if let Some(v) = required(req.paid) {
            active.paid = Set(v);
        }
        if let Some(v) = required(req.product) {
            active.product = Set(v);
        }
        if let Some(v) = required(req.prize_amount) {
            active.prize_amount = Set(v);
        }
        if let Some(v) = required(req.date) {
            active.date = Set(v);
        }
        if let Some(v) = required(req.status) {
            active.status = Set(v);
        }
        if let Some(v) = required(req.wcode) {
            active.wcode = Set(v);
        }
        if let Some(v) = required(req.image) {
            active.image = Set(Some(v));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = self.store.update(active).await.map_err(conflict_or_db)?;
        Ok(updated.into())
    }

    /// 软删除（is_active = false），记录仍参与导入冲突检查
    pub async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let model = self.require(id).await?;

        let mut active = model.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        self.store.update(active).await?;

        log::info!("Winner {} deactivated", id);
        Ok(())
    }

    async fn count_active(&self, status: Option<&str>) -> AppResult<u64> {
        let mut select = winners::Entity::find().filter(winners::Column::IsActive.eq(true));
        if let Some(status) = status {
            select = select.filter(winners::Column::Status.eq(status));
        }
        Ok(select.count(&self.pool).await?)
    }

    pub async fn stats(&self) -> AppResult<WinnerStats> {
        Ok(WinnerStats {
            total_winners: self.count_active(None).await?,
            pending_winners: self.count_active(Some("Pending")).await?,
            approved_winners: self.count_active(Some("Approved")).await?,
            paid_winners: self.count_active(Some("Paid")).await?,
            recent_winners: self
                .recent(5)
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }

    /// 最近的有效中奖者（不限状态）
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .order_by_desc(winners::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }

    pub async fn find_active_by_phone(&self, phone: &str) -> AppResult<Option<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Phone.eq(phone))
            .order_by_desc(winners::Column::CreatedAt)
            .one(&self.pool)
            .await?)
    }

    pub async fn find_active_by_wcode(&self, wcode: &str) -> AppResult<Option<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Wcode.eq(wcode))
            .one(&self.pool)
            .await?)
    }

    pub async fn find_active_by_phone_and_wcode(
        &self,
        phone: &str,
        wcode: &str,
    ) -> AppResult<Option<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Phone.eq(phone))
            .filter(winners::Column::Wcode.eq(wcode))
            .one(&self.pool)
            .await?)
    }

    pub async fn find_approved_by_wcode(&self, wcode: &str) -> AppResult<Option<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Status.eq("Approved"))
            .filter(winners::Column::Wcode.eq(wcode))
            .one(&self.pool)
            .await?)
    }

    /// 有效且状态在 `statuses` 内的中奖者，按创建时间倒序
    pub async fn list_by_status(
        &self,
        statuses: &[&str],
        limit: u64,
    ) -> AppResult<Vec<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Status.is_in(statuses.iter().copied()))
            .order_by_desc(winners::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }

    /// 公开搜索：仅 Approved，按类型匹配子串
    pub async fn search_approved(
        &self,
        needle: &str,
        search_type: SearchType,
        limit: u64,
    ) -> AppResult<Vec<winners::Model>> {
        let condition = match search_type {
            SearchType::Phone => Condition::all().add(contains_ci(winners::Column::Phone, needle)),
            SearchType::Wcode => Condition::all().add(contains_ci(winners::Column::Wcode, needle)),
            SearchType::Name => Condition::all().add(contains_ci(winners::Column::Name, needle)),
            SearchType::Any => Condition::any()
                .add(contains_ci(winners::Column::Name, needle))
                .add(contains_ci(winners::Column::Phone, needle))
                .add(contains_ci(winners::Column::Wcode, needle)),
        };

        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(winners::Column::Status.eq("Approved"))
            .filter(condition)
            .order_by_desc(winners::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }

    /// 搜索结果页：手机号子串匹配，不限状态
    pub async fn search_active_by_phone(
        &self,
        needle: &str,
        limit: u64,
    ) -> AppResult<Vec<winners::Model>> {
        Ok(winners::Entity::find()
            .filter(winners::Column::IsActive.eq(true))
            .filter(contains_ci(winners::Column::Phone, needle))
            .order_by_desc(winners::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::store::memory::MemoryWinnerStore;

    fn stored(id: i64, phone: &str, wcode: &str) -> winners::Model {
        winners::Model {
            id,
            external_id: format!("EXT-{id}"),
            phone: phone.to_string(),
            name: "Asha".to_string(),
            address: "Pune".to_string(),
            paid: "500".to_string(),
            product: "Mixer".to_string(),
            prize_amount: "10000".to_string(),
            date: "2025-01-15".to_string(),
            status: "Pending".to_string(),
            wcode: wcode.to_string(),
            image: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn service(rows: Vec<winners::Model>) -> (WinnerService, Arc<MemoryWinnerStore>) {
        let store = Arc::new(MemoryWinnerStore::with_rows(rows));
        let service = WinnerService::with_store(DatabaseConnection::Disconnected, store.clone());
        (service, store)
    }

    fn create_request(phone: &str, wcode: &str) -> CreateWinnerRequest {
        CreateWinnerRequest {
            id: Some("EXT-NEW".to_string()),
            phone: Some(phone.to_string()),
            name: Some("Ravi".to_string()),
            address: Some("Nagpur".to_string()),
            paid: Some("300".to_string()),
            product: Some("Fan".to_string()),
            prize_amount: Some("5000".to_string()),
            date: Some("2025-02-01".to_string()),
            status: None,
            wcode: Some(wcode.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        let (service, store) = service(vec![]);
        let mut req = create_request("9000000001", "WC-1");
        req.address = Some("   ".to_string());

        let err = service.create(req, "Active").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "All fields are required"));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_create_applies_default_status() {
        let (service, store) = service(vec![]);
        let created = service
            .create(create_request("9000000001", "WC-1"), "Active")
            .await
            .unwrap();
        assert_eq!(created.status, "Active");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_phone() {
        let (service, store) = service(vec![stored(1, "9000000001", "WC-OLD")]);
        let err = service
            .create(create_request("9000000001", "WC-NEW"), "Active")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == DUPLICATE_WINNER_MESSAGE));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let (service, _) = service(vec![stored(1, "9000000001", "WC-1")]);

        let err = service
            .update(999, UpdateWinnerRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Winner not found"));

        let err = service.soft_delete(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_blank_fields() {
        let (service, store) = service(vec![stored(1, "9000000001", "WC-1")]);
        let req = UpdateWinnerRequest {
            status: Some("Approved".to_string()),
            name: Some("  ".to_string()),
            ..Default::default()
        };

        let updated = service.update(1, req).await.unwrap();
        assert_eq!(updated.status, "Approved");
        assert_eq!(updated.name, "Asha");
        assert_eq!(store.rows.lock().unwrap()[0].status, "Approved");
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let (service, store) = service(vec![stored(1, "9000000001", "WC-1")]);
        service.soft_delete(1).await.unwrap();

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_active);
    }
}
