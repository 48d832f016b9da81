use std::path::PathBuf;

use actix_web::web;
use chrono::Local;
use sea_orm::DatabaseConnection;

use crate::config::{ImportConfig, UploadConfig};
use crate::error::{AppError, AppResult};
use crate::import::{
    DbWinnerStore, ImportError, ImportOutcome, ImportProfile, decode_workbook, run_import,
    winner_template,
};
use crate::utils::{EXCEL_EXTENSIONS, StagedUpload, UploadedFile};

/// 上传入口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEntry {
    Admin,
    Api,
}

#[derive(Clone)]
pub struct ImportService {
    store: DbWinnerStore,
    import_config: ImportConfig,
    upload_config: UploadConfig,
}

impl ImportService {
    pub fn new(
        pool: DatabaseConnection,
        import_config: ImportConfig,
        upload_config: UploadConfig,
    ) -> Self {
        Self {
            store: DbWinnerStore::new(pool),
            import_config,
            upload_config,
        }
    }

    pub fn import_config(&self) -> &ImportConfig {
        &self.import_config
    }

    pub fn max_excel_bytes(&self) -> usize {
        self.upload_config.max_excel_bytes
    }

    fn profile(&self, entry: ImportEntry) -> ImportProfile {
        match entry {
            ImportEntry::Admin => ImportProfile::admin(&self.import_config.admin_default_status),
            ImportEntry::Api => ImportProfile::api(
                &self.import_config.api_default_status,
                Local::now().format("%Y-%m-%d").to_string(),
            ),
        }
    }

    /// 暂存上传文件 -> 解码 -> 逐行导入；暂存文件在返回前删除
    ///
    /// 外层错误为请求本身的问题（扩展名、IO），内层为整次导入失败。
    pub async fn import_upload(
        &self,
        file: &UploadedFile,
        entry: ImportEntry,
    ) -> AppResult<Result<ImportOutcome, ImportError>> {
        let staged =
            StagedUpload::stage(file, &self.upload_config.excel_dir, EXCEL_EXTENSIONS).await?;
        log::info!(
            "Processing uploaded spreadsheet {} ({} bytes)",
            file.file_name,
            file.bytes.len()
        );

        let path: PathBuf = staged.path().to_path_buf();
        let decoded = web::block(move || decode_workbook(&path))
            .await
            .map_err(|e| AppError::InternalError(format!("Spreadsheet worker failed: {e}")))?;

        let rows = match decoded {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Spreadsheet {} rejected: {}", file.file_name, e);
                return Ok(Err(e));
            }
        };

        let result = run_import(&self.store, &rows, &self.profile(entry)).await;
        drop(staged);
        Ok(result)
    }

    pub fn template(&self) -> AppResult<Vec<u8>> {
        winner_template().map_err(|e| AppError::SpreadsheetError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 这些用例不触达数据库
    fn service() -> ImportService {
        ImportService::new(
            DatabaseConnection::Disconnected,
            ImportConfig::default(),
            UploadConfig::default(),
        )
    }

    #[test]
    fn test_profiles_follow_config() {
        let svc = service();
        assert_eq!(svc.profile(ImportEntry::Admin).default_status, "Active");
        assert_eq!(svc.profile(ImportEntry::Admin).fallback_date, None);

        let api = svc.profile(ImportEntry::Api);
        assert_eq!(api.default_status, "Pending");
        assert_eq!(api.fallback_date.map(|d| d.len()), Some(10));
    }

    #[test]
    fn test_template_is_xlsx() {
        let bytes = service().template().unwrap();
        // xlsx 为 zip 容器
        assert_eq!(&bytes[..2], b"PK");
    }
}
