//! 表格行 -> 中奖者候选记录
//!
//! 表头写法五花八门（`Phone No` / `Mobile` / `Prize Amount:` ...），每个字段按
//! 优先级依次尝试别名，第一个非空值生效。

use std::collections::HashMap;

use uuid::Uuid;

use crate::entities::winner_entity as winners;
use sea_orm::Set;

/// 表格单元格（已由表格解析层解码）
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// 转为文本；空单元格或空白字符串返回 None
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Int(n) => Some(n.to_string()),
            // 整数值的浮点不带小数（手机号常被存成数字）
            CellValue::Float(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{n}"))
                }
            }
            CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// 一行数据：表头 -> 单元格
pub type RawRow = HashMap<String, CellValue>;

pub const ID_KEYS: &[&str] = &["ID", "Id", "id"];
pub const PHONE_KEYS: &[&str] = &["Phone", "Phone No", "Mobile", "phone"];
pub const NAME_KEYS: &[&str] = &["Name", "FullName", "name"];
pub const ADDRESS_KEYS: &[&str] = &["Address", "address"];
pub const PAID_KEYS: &[&str] = &["Paid", "paid"];
pub const PRODUCT_KEYS: &[&str] = &["Product", "product"];
pub const PRIZE_AMOUNT_KEYS: &[&str] = &[
    "Prize Amount:",
    "Prize Amount",
    "PrizeAmount",
    "prizeAmount",
];
/// 仅 API 入口接受：同时作为 paid 与 prize_amount 的最后备选
pub const AMOUNT_KEY: &str = "Amount";
pub const DATE_KEYS: &[&str] = &["Date:", "Date", "date"];
pub const STATUS_KEYS: &[&str] = &["Status", "status"];
pub const WCODE_KEYS: &[&str] = &["W-Code", "WCode", "wcode"];

/// 导入入口差异（后台页面 / JSON API）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProfile {
    /// 行内未给出状态时使用
    pub default_status: String,
    /// 行内未给出日期时使用（None 表示保持为空，交由必填校验拒绝）
    pub fallback_date: Option<String>,
    /// 是否接受 `Amount` 列
    pub amount_alias: bool,
}

impl ImportProfile {
    pub fn admin(default_status: impl Into<String>) -> Self {
        Self {
            default_status: default_status.into(),
            fallback_date: None,
            amount_alias: false,
        }
    }

    /// API 入口缺少日期时使用当天日期
    pub fn api(default_status: impl Into<String>, today: impl Into<String>) -> Self {
        Self {
            default_status: default_status.into(),
            fallback_date: Some(today.into()),
            amount_alias: true,
        }
    }
}

/// 规范化后的中奖者候选记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerCandidate {
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
}

impl WinnerCandidate {
    /// phone / name / address / paid / product / prize_amount / date 任一为空
    pub fn is_missing_required(&self) -> bool {
        [
            &self.phone,
            &self.name,
            &self.address,
            &self.paid,
            &self.product,
            &self.prize_amount,
            &self.date,
        ]
        .iter()
        .any(|v| v.trim().is_empty())
    }

    /// 新记录（is_active = true）
    pub fn to_active_model(&self) -> winners::ActiveModel {
        winners::ActiveModel {
            external_id: Set(self.external_id.clone()),
            phone: Set(self.phone.clone()),
            name: Set(self.name.clone()),
            address: Set(self.address.clone()),
            paid: Set(self.paid.clone()),
            product: Set(self.product.clone()),
            prize_amount: Set(self.prize_amount.clone()),
            date: Set(self.date.clone()),
            status: Set(self.status.clone()),
            wcode: Set(self.wcode.clone()),
            image: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
    }
}

/// 按别名优先级取第一个非空值
pub fn resolve_field(row: &RawRow, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find_map(CellValue::as_text)
}

/// 随机占位编号，避免同一毫秒内的行或并发导入撞号
pub fn placeholder_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple()).to_uppercase()
}

/// `index` 为数据行下标（从 0 开始），仅用于日志
pub fn normalize_row(row: &RawRow, index: usize, profile: &ImportProfile) -> WinnerCandidate {
    let field = |keys: &[&str]| resolve_field(row, keys).unwrap_or_default();
    let amount_field = |keys: &[&str]| {
        resolve_field(row, keys)
            .or_else(|| {
                profile
                    .amount_alias
                    .then(|| resolve_field(row, &[AMOUNT_KEY]))
                    .flatten()
            })
            .unwrap_or_default()
    };

    let external_id = resolve_field(row, ID_KEYS).unwrap_or_else(|| {
        let id = placeholder_id("W");
        log::debug!("Row {} has no ID, generated {}", index + 2, id);
        id
    });

    WinnerCandidate {
        external_id,
        phone: field(PHONE_KEYS),
        name: field(NAME_KEYS),
        address: field(ADDRESS_KEYS),
        paid: amount_field(PAID_KEYS),
        product: field(PRODUCT_KEYS),
        prize_amount: amount_field(PRIZE_AMOUNT_KEYS),
        date: resolve_field(row, DATE_KEYS)
            .or_else(|| profile.fallback_date.clone())
            .unwrap_or_default(),
        status: resolve_field(row, STATUS_KEYS).unwrap_or_else(|| profile.default_status.clone()),
        wcode: resolve_field(row, WCODE_KEYS).unwrap_or_else(|| placeholder_id("WC")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_header_aliases_resolve() {
        let r = row(&[
            ("Phone No", "9876543210".into()),
            ("Name", "A".into()),
            ("Address", "B".into()),
            ("Paid", "Yes".into()),
            ("Product", "P".into()),
            ("Prize Amount:", "100".into()),
            ("Date:", "2024-01-01".into()),
        ]);
        let c = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(c.phone, "9876543210");
        assert_eq!(c.name, "A");
        assert_eq!(c.prize_amount, "100");
        assert_eq!(c.date, "2024-01-01");
        assert_eq!(c.status, "Active");
        assert!(c.external_id.starts_with("W-"));
        assert!(c.wcode.starts_with("WC-"));
        assert!(!c.is_missing_required());
    }

    #[test]
    fn test_alias_priority_order() {
        let r = row(&[
            ("phone", "111".into()),
            ("Mobile", "222".into()),
            ("Phone", "333".into()),
        ]);
        let c = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(c.phone, "333");
    }

    #[test]
    fn test_blank_value_falls_through_to_next_alias() {
        let r = row(&[("Phone", "   ".into()), ("Phone No", "444".into())]);
        let c = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(c.phone, "444");
    }

    #[test]
    fn test_numeric_cells_render_without_decimals() {
        let r = row(&[
            ("Phone", CellValue::Float(9876543210.0)),
            ("Prize Amount", CellValue::Int(500)),
            ("Paid", CellValue::Float(12.5)),
        ]);
        let c = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(c.phone, "9876543210");
        assert_eq!(c.prize_amount, "500");
        assert_eq!(c.paid, "12.5");
    }

    #[test]
    fn test_explicit_identifiers_and_status_are_kept() {
        let r = row(&[
            ("ID", "X-1".into()),
            ("W-Code", "WC-9".into()),
            ("Status", "Approved".into()),
        ]);
        let c = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(c.external_id, "X-1");
        assert_eq!(c.wcode, "WC-9");
        assert_eq!(c.status, "Approved");
    }

    #[test]
    fn test_profile_defaults_differ() {
        let r = row(&[("Name", "A".into())]);
        let admin = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        let api = normalize_row(&r, 0, &ImportProfile::api("Pending", "2025-09-01"));
        assert_eq!(admin.status, "Active");
        assert_eq!(admin.date, "");
        assert_eq!(api.status, "Pending");
        assert_eq!(api.date, "2025-09-01");
    }

    #[test]
    fn test_missing_required_fields() {
        let c = normalize_row(&row(&[("Name", "A".into())]), 0, &ImportProfile::admin("Active"));
        assert!(c.is_missing_required());
    }

    #[test]
    fn test_placeholders_do_not_collide() {
        let r = RawRow::new();
        let profile = ImportProfile::admin("Active");
        let a = normalize_row(&r, 0, &profile);
        let b = normalize_row(&r, 0, &profile);
        assert_ne!(a.external_id, b.external_id);
        assert_ne!(a.wcode, b.wcode);
    }

    #[test]
    fn test_amount_column_only_on_api_profile() {
        let r = row(&[
            ("Phone", "9876543210".into()),
            ("Name", "A".into()),
            ("Address", "B".into()),
            ("Product", "P".into()),
            ("Date", "2024-01-01".into()),
            ("Amount", "750".into()),
        ]);

        let admin = normalize_row(&r, 0, &ImportProfile::admin("Active"));
        assert_eq!(admin.paid, "");
        assert_eq!(admin.prize_amount, "");
        assert!(admin.is_missing_required());

        let api = normalize_row(&r, 0, &ImportProfile::api("Pending", "2025-09-01"));
        assert_eq!(api.paid, "750");
        assert_eq!(api.prize_amount, "750");
        assert!(!api.is_missing_required());
    }

    #[test]
    fn test_named_column_wins_over_amount() {
        let r = row(&[("Paid", "Yes".into()), ("Amount", "750".into())]);
        let api = normalize_row(&r, 0, &ImportProfile::api("Pending", "2025-09-01"));
        assert_eq!(api.paid, "Yes");
        assert_eq!(api.prize_amount, "750");
    }
}
