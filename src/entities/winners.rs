use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 中奖者实体
/// 说明:
/// - external_id / wcode 唯一（数据库唯一索引）
/// - paid / prize_amount / date 均为文本，保持与导入表格一致
/// - status 不是封闭枚举（常见值: Active / Pending / Approved / Paid / Rejected）
/// - is_active 为软删除标记
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub external_id: String,
    pub phone: String,
    pub name: String,
    pub address: String,
    pub paid: String,
    pub product: String,
    pub prize_amount: String,
    pub date: String,
    pub status: String,
    pub wcode: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 奖金数值（去掉逗号 / 货币符号后解析），无法解析时为 None
    pub fn prize_amount_value(&self) -> Option<i64> {
        let digits: String = self
            .prize_amount
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        digits.trim_matches('.').parse::<f64>().ok().map(|v| v.round() as i64)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(prize_amount: &str) -> Model {
        Model {
            id: 1,
            external_id: "W1".into(),
            phone: "9876543210".into(),
            name: "A".into(),
            address: "B".into(),
            paid: "Yes".into(),
            product: "P".into(),
            prize_amount: prize_amount.into(),
            date: "2024-01-01".into(),
            status: "Active".into(),
            wcode: "WC1".into(),
            image: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_prize_amount_value() {
        assert_eq!(sample("1000").prize_amount_value(), Some(1000));
        assert_eq!(sample("Rs 14,80,000").prize_amount_value(), Some(1_480_000));
        assert_eq!(sample("325.6").prize_amount_value(), Some(326));
        assert_eq!(sample("Rs. 500").prize_amount_value(), Some(500));
        assert_eq!(sample("n/a").prize_amount_value(), None);
    }
}
