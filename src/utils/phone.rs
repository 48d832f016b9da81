use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

static MASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\d+(\d{2})").expect("valid mask regex"));

/// 公开展示用手机号：保留首尾各两位，中间替换为 XXXXXX
///
/// 只替换第一段连续数字；不足 5 位数字时原样返回。
pub fn mask_phone(phone: &str) -> String {
    MASK_RE.replace(phone, "${1}XXXXXX${2}").into_owned()
}

/// 去掉首尾空白；空手机号视为未输入
pub fn require_phone(phone: Option<&str>) -> AppResult<String> {
    match phone.map(str::trim) {
        Some(p) if !p.is_empty() => Ok(p.to_string()),
        _ => Err(AppError::ValidationError(
            "Please enter phone number".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("9876543210"), "98XXXXXX10");
        assert_eq!(mask_phone("+91 9876543210"), "+91 98XXXXXX10");
        assert_eq!(mask_phone("12345"), "12XXXXXX45");
        assert_eq!(mask_phone("1234"), "1234");
    }

    #[test]
    fn test_require_phone() {
        assert_eq!(require_phone(Some(" 987 ")).unwrap(), "987");
        assert!(require_phone(Some("   ")).is_err());
        assert!(require_phone(None).is_err());
    }
}
