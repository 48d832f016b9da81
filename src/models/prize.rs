use crate::entities::{Medal, prize_entity};
use crate::utils::{MultipartForm, format_inr};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrizeResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub amount: i64,
    /// 14,80,000
    pub formatted_amount: String,
    pub image: String,
    pub position: i32,
    pub emoji: String,
    pub medal: Medal,
    pub is_active: bool,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        Self {
            formatted_amount: format_inr(m.amount),
            id: m.id,
            title: m.title,
            description: m.description,
            amount: m.amount,
            image: m.image,
            position: m.position,
            emoji: m.emoji,
            medal: m.medal,
            is_active: m.is_active,
        }
    }
}

/// 奖品表单（multipart 文本字段解析后）
#[derive(Debug, Clone, Default)]
pub struct PrizeForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub position: Option<i32>,
    pub emoji: Option<String>,
    pub medal: Option<Medal>,
    pub is_active: Option<bool>,
}

fn parse_flag(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes")
}

impl PrizeForm {
    /// 从 multipart 文本字段取值；数字无法解析时视为未填写
    pub fn from_multipart(form: &MultipartForm) -> Self {
        Self {
            title: form.text("title").map(str::to_string),
            description: form.text("description").map(str::to_string),
            amount: form.text("amount").and_then(|v| v.replace(',', "").parse().ok()),
            position: form.text("position").and_then(|v| v.parse().ok()),
            emoji: form.text("emoji").map(str::to_string),
            medal: form
                .text("medal")
                .and_then(|v| Medal::try_from_value(&v.to_string()).ok()),
            is_active: form.text("isActive").map(parse_flag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_multipart() {
        let mut form = MultipartForm::default();
        for (k, v) in [
            ("title", " Tata Safari "),
            ("description", "SUV"),
            ("amount", "14,80,000"),
            ("position", "2"),
            ("medal", "🥈"),
            ("isActive", "on"),
        ] {
            form.fields.insert(k.to_string(), v.to_string());
        }

        let prize = PrizeForm::from_multipart(&form);
        assert_eq!(prize.title.as_deref(), Some("Tata Safari"));
        assert_eq!(prize.amount, Some(1_480_000));
        assert_eq!(prize.position, Some(2));
        assert_eq!(prize.medal, Some(Medal::Silver));
        assert_eq!(prize.is_active, Some(true));
        assert_eq!(prize.emoji, None);
    }

    #[test]
    fn test_unknown_medal_ignored() {
        let mut form = MultipartForm::default();
        form.fields.insert("medal".into(), "star".into());
        form.fields.insert("amount".into(), "lots".into());
        let prize = PrizeForm::from_multipart(&form);
        assert_eq!(prize.medal, None);
        assert_eq!(prize.amount, None);
    }
}
