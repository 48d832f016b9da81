use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// 单行被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    MissingFields,
    Duplicate { phone: String },
    Storage(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingFields => write!(f, "Missing required fields"),
            RowRejection::Duplicate { phone } => {
                write!(f, "Winner already exists (Phone: {phone})")
            }
            RowRejection::Storage(msg) => write!(f, "{msg}"),
        }
    }
}

/// 一次导入的汇总结果
/// 不变量: imported_count + error_count == total_rows, errors.len() == error_count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
    pub total_rows: usize,
}

impl ImportOutcome {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.imported_count += 1;
    }

    /// `index` 为数据行下标（从 0 开始），表头占第 1 行，因此报告为 index + 2
    pub fn record_failure(&mut self, index: usize, reason: &RowRejection) {
        self.error_count += 1;
        self.errors.push(format!("Row {}: {}", index + 2, reason));
    }

    /// JSON API 返回体
    pub fn api_summary(&self) -> ApiImportSummary {
        ApiImportSummary {
            message: "Import completed".to_string(),
            imported: self.imported_count,
            errors: self.errors.clone(),
            total: self.total_rows,
        }
    }

    /// 后台页面提示；错误超过 `max_listed_errors` 条时只保留计数
    pub fn admin_notices(&self, max_listed_errors: usize) -> AdminNotices {
        let mut notices = AdminNotices::default();

        if self.imported_count > 0 {
            let mut msg = format!(
                "Upload completed: {} winners added successfully",
                self.imported_count
            );
            if self.error_count > 0 {
                msg.push_str(&format!(", {} errors occurred", self.error_count));
            }
            notices.success.push(msg);
        } else {
            notices
                .error
                .push("No winners were added. Please check your Excel file format.".to_string());
        }

        if !self.errors.is_empty() && self.errors.len() <= max_listed_errors {
            notices
                .error
                .push(format!("Errors: {}", self.errors.join("; ")));
        }

        notices
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApiImportSummary {
    pub message: String,
    pub imported: usize,
    pub errors: Vec<String>,
    pub total: usize,
}

/// 后台页面提示消息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminNotices {
    pub success: Vec<String>,
    pub error: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(imported: usize, failed: usize) -> ImportOutcome {
        let mut o = ImportOutcome::new(imported + failed);
        for _ in 0..imported {
            o.record_success();
        }
        for i in 0..failed {
            o.record_failure(i, &RowRejection::MissingFields);
        }
        o
    }

    #[test]
    fn test_row_numbers_offset_by_header() {
        let mut o = ImportOutcome::new(2);
        o.record_failure(0, &RowRejection::MissingFields);
        o.record_failure(
            1,
            &RowRejection::Duplicate {
                phone: "9876543210".into(),
            },
        );
        assert_eq!(o.errors[0], "Row 2: Missing required fields");
        assert_eq!(
            o.errors[1],
            "Row 3: Winner already exists (Phone: 9876543210)"
        );
        assert_eq!(o.error_count, 2);
    }

    #[test]
    fn test_api_summary_shape() {
        let o = outcome(3, 1);
        let json = serde_json::to_value(o.api_summary()).unwrap();
        assert_eq!(json["message"], "Import completed");
        assert_eq!(json["imported"], 3);
        assert_eq!(json["total"], 4);
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_admin_notices_success_with_errors() {
        let notices = outcome(2, 1).admin_notices(10);
        assert_eq!(
            notices.success,
            vec!["Upload completed: 2 winners added successfully, 1 errors occurred"]
        );
        assert_eq!(notices.error, vec!["Errors: Row 2: Missing required fields"]);
    }

    #[test]
    fn test_admin_notices_nothing_imported() {
        let notices = outcome(0, 0).admin_notices(10);
        assert!(notices.success.is_empty());
        assert_eq!(
            notices.error,
            vec!["No winners were added. Please check your Excel file format."]
        );
    }

    #[test]
    fn test_admin_notices_suppress_long_error_list() {
        let notices = outcome(1, 11).admin_notices(10);
        assert_eq!(
            notices.success,
            vec!["Upload completed: 1 winners added successfully, 11 errors occurred"]
        );
        assert!(notices.error.is_empty());

        let notices = outcome(0, 10).admin_notices(10);
        assert_eq!(notices.error.len(), 2);
        assert!(notices.error[1].starts_with("Errors: Row 2"));
    }

    #[test]
    fn test_camel_case_outcome() {
        let json = serde_json::to_value(outcome(1, 0)).unwrap();
        assert_eq!(json["importedCount"], 1);
        assert_eq!(json["totalRows"], 1);
    }
}
