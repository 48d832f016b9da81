use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use super::normalizer::WinnerCandidate;
use crate::entities::winner_entity as winners;

/// 中奖者存储抽象（导入流水线只用前两个操作，后台单条编辑用后两个）
#[async_trait]
pub trait WinnerStore: Send + Sync {
    /// 手机号 / 外部编号 / W-Code 任一相同即视为冲突，不区分是否已软删除
    async fn find_conflict(
        &self,
        candidate: &WinnerCandidate,
    ) -> Result<Option<winners::Model>, DbErr>;

    async fn insert(&self, candidate: &WinnerCandidate) -> Result<winners::Model, DbErr>;

    async fn find_by_id(&self, id: i64) -> Result<Option<winners::Model>, DbErr>;

    async fn update(&self, active: winners::ActiveModel) -> Result<winners::Model, DbErr>;
}

/// 存储错误 -> 行级错误原因
pub fn storage_reason(err: &DbErr) -> String {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            format!("Duplicate W-Code or ID rejected by database ({detail})")
        }
        _ => err.to_string(),
    }
}

#[derive(Clone)]
pub struct DbWinnerStore {
    pool: DatabaseConnection,
}

impl DbWinnerStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WinnerStore for DbWinnerStore {
    async fn find_conflict(
        &self,
        candidate: &WinnerCandidate,
    ) -> Result<Option<winners::Model>, DbErr> {
        winners::Entity::find()
            .filter(
                Condition::any()
                    .add(winners::Column::Phone.eq(candidate.phone.as_str()))
                    .add(winners::Column::ExternalId.eq(candidate.external_id.as_str()))
                    .add(winners::Column::Wcode.eq(candidate.wcode.as_str())),
            )
            .order_by_asc(winners::Column::Id)
            .one(&self.pool)
            .await
    }

    async fn insert(&self, candidate: &WinnerCandidate) -> Result<winners::Model, DbErr> {
        candidate.to_active_model().insert(&self.pool).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<winners::Model>, DbErr> {
        winners::Entity::find_by_id(id).one(&self.pool).await
    }

    async fn update(&self, active: winners::ActiveModel) -> Result<winners::Model, DbErr> {
        active.update(&self.pool).await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use sea_orm::TryIntoModel;
    use std::sync::Mutex;

    /// 内存实现，external_id / wcode 唯一约束与数据库一致
    #[derive(Default)]
    pub struct MemoryWinnerStore {
        pub rows: Mutex<Vec<winners::Model>>,
        /// 对这些手机号的插入直接失败
        pub failing_phones: Vec<String>,
        /// 冲突查询总是返回空，模拟检查与写入之间被并发写入抢先
        pub blind_lookup: bool,
    }

    impl MemoryWinnerStore {
        pub fn with_rows(rows: Vec<winners::Model>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Default::default()
            }
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl WinnerStore for MemoryWinnerStore {
        async fn find_conflict(
            &self,
            candidate: &WinnerCandidate,
        ) -> Result<Option<winners::Model>, DbErr> {
            if self.blind_lookup {
                return Ok(None);
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|w| {
                    w.phone == candidate.phone
                        || w.external_id == candidate.external_id
                        || w.wcode == candidate.wcode
                })
                .cloned())
        }

        async fn insert(&self, candidate: &WinnerCandidate) -> Result<winners::Model, DbErr> {
            if self.failing_phones.contains(&candidate.phone) {
                return Err(DbErr::Custom("connection reset".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|w| w.external_id == candidate.external_id || w.wcode == candidate.wcode)
            {
                return Err(DbErr::Custom("duplicate key value".to_string()));
            }
            let model = winners::Model {
                id: rows.len() as i64 + 1,
                external_id: candidate.external_id.clone(),
                phone: candidate.phone.clone(),
                name: candidate.name.clone(),
                address: candidate.address.clone(),
                paid: candidate.paid.clone(),
                product: candidate.product.clone(),
                prize_amount: candidate.prize_amount.clone(),
                date: candidate.date.clone(),
                status: candidate.status.clone(),
                wcode: candidate.wcode.clone(),
                image: None,
                is_active: true,
                created_at: Some(chrono::Utc::now()),
                updated_at: Some(chrono::Utc::now()),
            };
            rows.push(model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<winners::Model>, DbErr> {
            Ok(self.rows.lock().unwrap().iter().find(|w| w.id == id).cloned())
        }

        async fn update(&self, active: winners::ActiveModel) -> Result<winners::Model, DbErr> {
            let model = active.try_into_model()?;
            let mut rows = self.rows.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|w| w.id == model.id)
                .ok_or(DbErr::RecordNotUpdated)?;
            *slot = model.clone();
            Ok(model)
        }
    }
}
