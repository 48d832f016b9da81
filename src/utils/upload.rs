use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::error::{AppError, AppResult};

pub const EXCEL_FIELD: &str = "excelFile";
pub const IMAGE_FIELD: &str = "image";
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xls"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
/// 普通文本字段上限
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// multipart 中的一个文件字段
#[derive(Debug)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// 小写扩展名（不含点）
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }
}

/// 解析后的表单：普通文本字段 + 文件字段
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn take_file(&mut self, field_name: &str) -> Option<UploadedFile> {
        let pos = self.files.iter().position(|f| f.field_name == field_name)?;
        Some(self.files.remove(pos))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn check_part_size(is_file: bool, size: usize, max_file_bytes: usize) -> AppResult<()> {
    if is_file && size > max_file_bytes {
        return Err(AppError::ValidationError(format!(
            "File too large (max {} MB)",
            max_file_bytes / (1024 * 1024)
        )));
    }
    if !is_file && size > MAX_TEXT_FIELD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Form field too large (max {} KB)",
            MAX_TEXT_FIELD_BYTES / 1024
        )));
    }
    Ok(())
}

/// 读取整个 multipart 请求；任一文件超过 `max_file_bytes`、
/// 或文本字段超过 `MAX_TEXT_FIELD_BYTES` 即拒绝
pub async fn read_multipart(mut payload: Multipart, max_file_bytes: usize) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {e}")))?
    {
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => continue,
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {e}")))?
        {
            check_part_size(file_name.is_some(), bytes.len() + chunk.len(), max_file_bytes)?;
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            // 浏览器未选择文件时也会提交空文件名的空字段
            Some(file_name) if !file_name.is_empty() => form.files.push(UploadedFile {
                field_name: name,
                file_name,
                bytes,
            }),
            Some(_) => {}
            None => {
                form.fields
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }

    Ok(form)
}

/// 上传的表格暂存文件，离开作用域时删除（无论处理成功与否）
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    /// 校验扩展名后写入暂存目录
    pub async fn stage(file: &UploadedFile, dir: &str, allowed: &[&str]) -> AppResult<Self> {
        let ext = file
            .extension()
            .filter(|e| allowed.contains(&e.as_str()))
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Only {} files are allowed",
                    allowed
                        .iter()
                        .map(|e| format!(".{e}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        tokio::fs::create_dir_all(dir).await?;
        let path = PathBuf::from(dir).join(format!(
            "excelFile-{}-{}.{ext}",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        ));
        let staged = Self { path };
        tokio::fs::write(&staged.path, &file.bytes).await?;

        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            log::warn!("Failed to remove staged upload {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            field_name: EXCEL_FIELD.to_string(),
            file_name: name.to_string(),
            bytes: b"data".to_vec(),
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("winners.XLSX"), Some("xlsx".to_string()));
        assert_eq!(extension_of("noext"), None);
    }

    #[tokio::test]
    async fn test_staged_upload_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap().to_string();

        let staged = StagedUpload::stage(&file("w.xlsx"), &dir_str, EXCEL_EXTENSIONS)
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let result = StagedUpload::stage(
            &file("w.csv"),
            dir.path().to_str().unwrap(),
            EXCEL_EXTENSIONS,
        )
        .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_take_file_and_text() {
        let mut form = MultipartForm::default();
        form.fields.insert("title".into(), "  Car ".into());
        form.fields.insert("blank".into(), "  ".into());
        form.files.push(file("a.xlsx"));

        assert_eq!(form.text("title"), Some("Car"));
        assert_eq!(form.text("blank"), None);
        assert!(form.take_file(EXCEL_FIELD).is_some());
        assert!(form.take_file(EXCEL_FIELD).is_none());
    }

    #[test]
    fn test_part_size_limits() {
        let max_file = 5 * 1024 * 1024;
        assert!(check_part_size(true, max_file, max_file).is_ok());
        assert!(matches!(
            check_part_size(true, max_file + 1, max_file),
            Err(AppError::ValidationError(ref m)) if m == "File too large (max 5 MB)"
        ));

        // 文本字段不受文件上限放宽
        assert!(check_part_size(false, MAX_TEXT_FIELD_BYTES, max_file).is_ok());
        assert!(matches!(
            check_part_size(false, MAX_TEXT_FIELD_BYTES + 1, max_file),
            Err(AppError::ValidationError(ref m)) if m == "Form field too large (max 64 KB)"
        ));
    }
}
