use crate::entities::winner_entity;
use crate::utils::{format_display_date, mask_phone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// 后台完整视图
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinnerResponse {
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

impl From<winner_entity::Model> for WinnerResponse {
    fn from(m: winner_entity::Model) -> Self {
        Self {
            id: m.id,
            external_id: m.external_id,
            phone: m.phone,
            name: m.name,
            address: m.address,
            paid: m.paid,
            product: m.product,
            prize_amount: m.prize_amount,
            date: m.date,
            status: m.status,
            wcode: m.wcode,
            image: m.image,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 公开列表视图（手机号脱敏，不含地址 / 付款信息）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicWinner {
    pub name: String,
    pub phone: String,
    pub product: String,
    pub prize_amount: String,
    pub date: String,
    pub status: String,
    pub wcode: String,
}

impl From<winner_entity::Model> for PublicWinner {
    fn from(m: winner_entity::Model) -> Self {
        Self {
            phone: mask_phone(&m.phone),
            name: m.name,
            product: m.product,
            prize_amount: m.prize_amount,
            date: m.date,
            status: m.status,
            wcode: m.wcode,
        }
    }
}

/// 状态查询的精简视图
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStatusView {
    pub name: String,
    pub wcode: String,
    pub status: String,
    pub prize_amount: String,
    pub product: String,
    pub date: String,
}

impl From<winner_entity::Model> for WinnerStatusView {
    fn from(m: winner_entity::Model) -> Self {
        Self {
            name: m.name,
            wcode: m.wcode,
            status: m.status,
            prize_amount: m.prize_amount,
            product: m.product,
            date: m.date,
        }
    }
}

/// 按 W-Code 查看的中奖详情
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinnerDetailView {
    pub name: String,
    pub phone: String,
    pub wcode: String,
    pub product: String,
    pub prize_amount: String,
    pub date: String,
    pub status: String,
    pub paid: String,
    pub image: Option<String>,
}

impl From<winner_entity::Model> for WinnerDetailView {
    fn from(m: winner_entity::Model) -> Self {
        Self {
            phone: mask_phone(&m.phone),
            name: m.name,
            wcode: m.wcode,
            product: m.product,
            prize_amount: m.prize_amount,
            date: m.date,
            status: m.status,
            paid: m.paid,
            image: m.image,
        }
    }
}

/// 搜索结果页：日期按入库时间格式化为 dd/mm/yyyy
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultWinner {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub product: String,
    pub prize_amount: String,
    pub paid: String,
    pub formatted_date: String,
    pub status: String,
    pub wcode: String,
    pub image: Option<String>,
}

impl From<winner_entity::Model> for SearchResultWinner {
    fn from(m: winner_entity::Model) -> Self {
        let formatted_date = match m.created_at {
            Some(at) => at.format("%d/%m/%Y").to_string(),
            None => format_display_date(&m.date),
        };
        Self {
            phone: mask_phone(&m.phone),
            formatted_date,
            name: m.name,
            address: m.address,
            product: m.product,
            prize_amount: m.prize_amount,
            paid: m.paid,
            status: m.status,
            wcode: m.wcode,
            image: m.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWinnerRequest {
    #[schema(example = "W-1001")]
    pub id: Option<String>,
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    pub address: Option<String>,
    #[schema(example = "Yes")]
    pub paid: Option<String>,
    pub product: Option<String>,
    #[schema(example = "1000")]
    pub prize_amount: Option<String>,
    #[schema(example = "2024-01-01")]
    pub date: Option<String>,
    pub status: Option<String>,
    #[schema(example = "WC-1001")]
    pub wcode: Option<String>,
}

/// 部分更新，只修改提交的字段
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWinnerRequest {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub paid: Option<String>,
    pub product: Option<String>,
    pub prize_amount: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub wcode: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct WinnerListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// 模糊匹配 name / phone / wcode（不区分大小写）
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStats {
    pub total_winners: u64,
    pub pending_winners: u64,
    pub approved_winners: u64,
    pub paid_winners: u64,
    pub recent_winners: Vec<WinnerResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhoneSearchRequest {
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCheckRequest {
    pub phone: Option<String>,
    pub wcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Phone,
    Wcode,
    Name,
    #[default]
    Any,
}

/// GET 使用 `q` / `type`，POST 使用 `query` / `searchType`
#[derive(Debug, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct WinnerSearchQuery {
    #[serde(alias = "q")]
    pub query: Option<String>,
    #[serde(rename = "type", alias = "searchType", default)]
    pub search_type: Option<SearchType>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchResultQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PublicListQuery {
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> winner_entity::Model {
        winner_entity::Model {
            id: 3,
            external_id: "W-1".into(),
            phone: "9876543210".into(),
            name: "John".into(),
            address: "Street".into(),
            paid: "Yes".into(),
            product: "Car".into(),
            prize_amount: "1000".into(),
            date: "2024-03-09".into(),
            status: "Approved".into(),
            wcode: "WC-1".into(),
            image: Some("car.jpg".into()),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_public_views_mask_phone() {
        assert_eq!(PublicWinner::from(model()).phone, "98XXXXXX10");
        assert_eq!(WinnerDetailView::from(model()).phone, "98XXXXXX10");

        let row = SearchResultWinner::from(model());
        assert_eq!(row.phone, "98XXXXXX10");
        assert_eq!(row.formatted_date, "09/03/2024");
    }

    #[test]
    fn test_public_winner_hides_address() {
        let json = serde_json::to_value(PublicWinner::from(model())).unwrap();
        assert!(json.get("address").is_none());
        assert_eq!(json["prizeAmount"], "1000");
    }

    #[test]
    fn test_search_type_parse() {
        let q: WinnerSearchQuery =
            serde_json::from_str(r#"{"query":"ab","searchType":"wcode"}"#).unwrap();
        assert_eq!(q.search_type, Some(SearchType::Wcode));

        let q: WinnerSearchQuery = serde_json::from_str(r#"{"q":"jo","type":"name"}"#).unwrap();
        assert_eq!(q.query.as_deref(), Some("jo"));
        assert_eq!(q.search_type, Some(SearchType::Name));
    }
}
