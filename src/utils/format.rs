use chrono::NaiveDate;

/// 印度数字分组：末三位一组，其余两位一组（1480000 -> 14,80,000）
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{sign}{},{tail}", groups.join(","))
}

/// 表格里的日期文本 -> dd/mm/yyyy；无法识别时原样返回
pub fn format_display_date(raw: &str) -> String {
    let raw = raw.trim();
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            // 带时间部分的 ISO 字符串
            raw.get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0), "0");
        assert_eq!(format_inr(999), "999");
        assert_eq!(format_inr(1000), "1,000");
        assert_eq!(format_inr(980000), "9,80,000");
        assert_eq!(format_inr(1480000), "14,80,000");
        assert_eq!(format_inr(123456789), "12,34,56,789");
        assert_eq!(format_inr(-50000), "-50,000");
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2024-01-05"), "05/01/2024");
        assert_eq!(format_display_date("2024-01-05T10:00:00Z"), "05/01/2024");
        assert_eq!(format_display_date("05/01/2024"), "05/01/2024");
        assert_eq!(format_display_date("someday"), "someday");
    }
}
