use thiserror::Error;

use super::normalizer::{ImportProfile, RawRow, normalize_row};
use super::outcome::{ImportOutcome, RowRejection};
use super::store::{WinnerStore, storage_reason};

/// 整次导入失败（与行级错误区分）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Excel file is empty or has no data")]
    EmptyFile,

    #[error("Error processing Excel file: {0}")]
    Decode(String),
}

/// 逐行导入：规范化 -> 必填校验 -> 冲突检查 -> 写入
///
/// 单行失败只记录错误并继续；行按原顺序依次处理，前面成功写入的行
/// 会让后面相同手机号 / 编号的行命中冲突。
pub async fn run_import<S>(
    store: &S,
    rows: &[RawRow],
    profile: &ImportProfile,
) -> Result<ImportOutcome, ImportError>
where
    S: WinnerStore + ?Sized,
{
    if rows.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut outcome = ImportOutcome::new(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let candidate = normalize_row(row, index, profile);

        if candidate.is_missing_required() {
            outcome.record_failure(index, &RowRejection::MissingFields);
            continue;
        }

        match store.find_conflict(&candidate).await {
            Ok(Some(_)) => {
                outcome.record_failure(
                    index,
                    &RowRejection::Duplicate {
                        phone: candidate.phone.clone(),
                    },
                );
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Conflict lookup failed for row {}: {}", index + 2, e);
                outcome.record_failure(index, &RowRejection::Storage(storage_reason(&e)));
                continue;
            }
        }

        match store.insert(&candidate).await {
            Ok(_) => outcome.record_success(),
            Err(e) => {
                log::warn!("Insert failed for row {}: {}", index + 2, e);
                outcome.record_failure(index, &RowRejection::Storage(storage_reason(&e)));
            }
        }
    }

    log::info!(
        "Import finished: {} imported, {} errors, {} rows",
        outcome.imported_count,
        outcome.error_count,
        outcome.total_rows
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::winner_entity as winners;
    use crate::import::normalizer::CellValue;
    use crate::import::store::memory::MemoryWinnerStore;

    fn full_row(phone: &str) -> RawRow {
        [
            ("Phone No", phone),
            ("Name", "John Doe"),
            ("Address", "123 Main Street"),
            ("Paid", "Yes"),
            ("Product", "Lucky Draw Prize"),
            ("Prize Amount:", "1000"),
            ("Date:", "2024-01-01"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), CellValue::from(v)))
        .collect()
    }

    fn existing(phone: &str, active: bool) -> winners::Model {
        winners::Model {
            id: 1,
            external_id: "OLD-1".into(),
            phone: phone.into(),
            name: "Old".into(),
            address: "Somewhere".into(),
            paid: "No".into(),
            product: "P".into(),
            prize_amount: "10".into(),
            date: "2023-01-01".into(),
            status: "Active".into(),
            wcode: "WC-OLD".into(),
            image: None,
            is_active: active,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_input_is_whole_run_failure() {
        let store = MemoryWinnerStore::default();
        let result = run_import(&store, &[], &ImportProfile::admin("Active")).await;
        assert_eq!(result, Err(ImportError::EmptyFile));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_all_rows_imported() {
        let store = MemoryWinnerStore::default();
        let rows = vec![full_row("9000000001"), full_row("9000000002")];
        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 2);
        assert_eq!(outcome.error_count, 0);
        assert_eq!(outcome.total_rows, 2);
        assert_eq!(store.len(), 2);

        let rows = store.rows.lock().unwrap();
        assert!(rows.iter().all(|w| w.is_active && w.status == "Active"));
    }

    #[tokio::test]
    async fn test_missing_fields_row_is_skipped() {
        let store = MemoryWinnerStore::default();
        let mut bad = full_row("9000000003");
        bad.remove("Address");
        let rows = vec![full_row("9000000001"), bad];
        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 1);
        assert_eq!(outcome.errors, vec!["Row 3: Missing required fields"]);
    }

    #[tokio::test]
    async fn test_conflict_with_soft_deleted_record() {
        let store = MemoryWinnerStore::with_rows(vec![existing("9000000001", false)]);
        let rows = vec![full_row("9000000001")];
        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 0);
        assert_eq!(
            outcome.errors,
            vec!["Row 2: Winner already exists (Phone: 9000000001)"]
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_inside_same_file() {
        let store = MemoryWinnerStore::default();
        let rows = vec![full_row("9000000001"), full_row("9000000001")];
        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 1);
        assert_eq!(
            outcome.errors,
            vec!["Row 3: Winner already exists (Phone: 9000000001)"]
        );
    }

    #[tokio::test]
    async fn test_conflict_on_wcode_reports_phone() {
        let store = MemoryWinnerStore::with_rows(vec![existing("9111111111", true)]);
        let mut row = full_row("9000000009");
        row.insert("W-Code".into(), CellValue::from("WC-OLD"));
        let outcome = run_import(&store, &[row], &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(
            outcome.errors,
            vec!["Row 2: Winner already exists (Phone: 9000000009)"]
        );
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_abort_run() {
        let store = MemoryWinnerStore {
            failing_phones: vec!["9000000002".into()],
            ..Default::default()
        };
        let rows = vec![
            full_row("9000000001"),
            full_row("9000000002"),
            full_row("9000000003"),
        ];
        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 2);
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].starts_with("Row 3: "));
        assert!(outcome.errors[0].contains("connection reset"));
        assert_eq!(
            outcome.imported_count + outcome.error_count,
            outcome.total_rows
        );
    }

    #[tokio::test]
    async fn test_api_profile_fills_date_and_pending_status() {
        let store = MemoryWinnerStore::default();
        let mut row = full_row("9000000001");
        row.remove("Date:");
        let profile = ImportProfile::api("Pending", "2025-09-01");
        let outcome = run_import(&store, &[row], &profile).await.unwrap();
        assert_eq!(outcome.imported_count, 1);

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows[0].status, "Pending");
        assert_eq!(rows[0].date, "2025-09-01");
    }

    #[tokio::test]
    async fn test_admin_profile_rejects_missing_date() {
        let store = MemoryWinnerStore::default();
        let mut row = full_row("9000000001");
        row.remove("Date:");
        let outcome = run_import(&store, &[row], &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.errors, vec!["Row 2: Missing required fields"]);
    }

    #[tokio::test]
    async fn test_rerun_same_file_adds_nothing() {
        let store = MemoryWinnerStore::default();
        let rows = vec![
            full_row("9000000001"),
            full_row("9000000002"),
            full_row("9000000003"),
        ];
        let profile = ImportProfile::admin("Active");

        let first = run_import(&store, &rows, &profile).await.unwrap();
        assert_eq!(first.imported_count, 3);

        let second = run_import(&store, &rows, &profile).await.unwrap();
        assert_eq!(second.imported_count, 0);
        assert_eq!(second.error_count, 3);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_conflict_on_external_id_only() {
        let store = MemoryWinnerStore::with_rows(vec![existing("9111111111", true)]);
        let mut row = full_row("9000000009");
        row.insert("ID".into(), CellValue::from("OLD-1"));
        let outcome = run_import(&store, &[row], &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 0);
        assert_eq!(
            outcome.errors,
            vec!["Row 2: Winner already exists (Phone: 9000000009)"]
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_write_rejected_by_unique_key_after_lookup() {
        let store = MemoryWinnerStore {
            rows: std::sync::Mutex::new(vec![existing("9111111111", true)]),
            blind_lookup: true,
            ..Default::default()
        };
        let mut dup = full_row("9000000001");
        dup.insert("W-Code".into(), CellValue::from("WC-OLD"));
        let rows = vec![dup, full_row("9000000002")];

        let outcome = run_import(&store, &rows, &ImportProfile::admin("Active"))
            .await
            .unwrap();
        assert_eq!(outcome.imported_count, 1);
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].starts_with("Row 2: "));
        assert!(outcome.errors[0].contains("duplicate key value"));
        assert_eq!(store.len(), 2);
    }
}
