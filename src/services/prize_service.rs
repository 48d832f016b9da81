use std::path::PathBuf;

use crate::config::UploadConfig;
use crate::entities::{Medal, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{PrizeForm, PrizeResponse};
use crate::utils::{IMAGE_EXTENSIONS, UploadedFile};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

const DEFAULT_EMOJI: &str = "🏆";
const IMAGE_REQUIRED_MESSAGE: &str = "Image is required and must be JPG, PNG, or WEBP under 2MB";

/// 去掉扩展名，仅保留字母数字、`_`、`-`
fn sanitize_base(file_name: &str) -> String {
    let base = match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    };
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// `<毫秒时间戳>-<安全文件名>.<ext>`
fn stored_image_name(file_name: &str, ext: &str, millis: i64) -> String {
    format!("{millis}-{}.{ext}", sanitize_base(file_name))
}

fn position_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A prize with this position already exists".to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Clone)]
pub struct PrizeService {
    pool: DatabaseConnection,
    images_dir: String,
    max_image_bytes: usize,
}

impl PrizeService {
    pub fn new(pool: DatabaseConnection, uploads: &UploadConfig) -> Self {
        Self {
            pool,
            images_dir: uploads.images_dir.clone(),
            max_image_bytes: uploads.max_image_bytes,
        }
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// 校验图片并写入图片目录，返回存储的文件名
    async fn save_image(&self, image: &UploadedFile) -> AppResult<String> {
        let ext = image
            .extension()
            .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
            .filter(|_| !image.bytes.is_empty() && image.bytes.len() <= self.max_image_bytes)
            .ok_or_else(|| AppError::ValidationError(IMAGE_REQUIRED_MESSAGE.to_string()))?;

        tokio::fs::create_dir_all(&self.images_dir).await?;
        let name = stored_image_name(&image.file_name, &ext, Utc::now().timestamp_millis());
        tokio::fs::write(PathBuf::from(&self.images_dir).join(&name), &image.bytes).await?;

        log::info!("Prize image stored as {}", name);
        Ok(name)
    }

    pub async fn list_all(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = prizes::Entity::find()
            .order_by_asc(prizes::Column::Position)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn list_active(&self, limit: u64) -> AppResult<Vec<PrizeResponse>> {
        let list = prizes::Entity::find()
            .filter(prizes::Column::IsActive.eq(true))
            .order_by_asc(prizes::Column::Position)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        form: PrizeForm,
        image: Option<UploadedFile>,
    ) -> AppResult<PrizeResponse> {
        let image = image
            .ok_or_else(|| AppError::ValidationError(IMAGE_REQUIRED_MESSAGE.to_string()))?;

        let (Some(title), Some(description), Some(amount), Some(position)) =
            (form.title, form.description, form.amount, form.position)
        else {
            return Err(AppError::ValidationError(
                "Title, description, amount and position are required".to_string(),
            ));
        };

        let image = self.save_image(&image).await?;

        let active = prizes::ActiveModel {
            title: Set(title),
            description: Set(description),
            amount: Set(amount),
            image: Set(image),
            position: Set(position),
            emoji: Set(form.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string())),
            medal: Set(form.medal.unwrap_or(Medal::Trophy)),
            is_active: Set(form.is_active.unwrap_or(true)),
            ..Default::default()
        };
        let saved = active.insert(&self.pool).await.map_err(position_conflict)?;

        log::info!("Prize {} created at position {}", saved.id, saved.position);
        Ok(saved.into())
    }

    /// 未上传新图片时保留原图片
    pub async fn update(
        &self,
        id: i64,
        form: PrizeForm,
        image: Option<UploadedFile>,
    ) -> AppResult<PrizeResponse> {
        let model = prizes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".to_string()))?;

        let new_image = match image {
            Some(image) => Some(self.save_image(&image).await?),
            None => None,
        };

        let mut active = model.into_active_model();
        if let Some(v) = form.title {
            active.title = Set(v);
        }
        if let Some(v) = form.description {
            active.description = Set(v);
        }
        if let Some(v) = form.amount {
            active.amount = Set(v);
        }
        if let Some(v) = form.position {
            active.position = Set(v);
        }
        if let Some(v) = form.emoji {
            active.emoji = Set(v);
        }
        if let Some(v) = form.medal {
            active.medal = Set(v);
        }
        if let Some(v) = form.is_active {
            active.is_active = Set(v);
        }
        if let Some(v) = new_image {
            active.image = Set(v);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&self.pool).await.map_err(position_conflict)?;
        Ok(updated.into())
    }

    /// 硬删除；图片文件保留
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = prizes::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Prize not found".to_string()));
        }
        log::info!("Prize {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 图片校验先于任何查询，未连接的连接即可
    fn service(dir: &str) -> PrizeService {
        let pool = DatabaseConnection::Disconnected;
        let uploads = UploadConfig {
            images_dir: dir.to_string(),
            ..UploadConfig::default()
        };
        PrizeService::new(pool, &uploads)
    }

    fn image(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            field_name: "image".to_string(),
            file_name: name.to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn test_sanitize_base() {
        assert_eq!(sanitize_base("Tata Safari (1).png"), "TataSafari1");
        assert_eq!(sanitize_base("gold_car-2.jpeg"), "gold_car-2");
        assert_eq!(sanitize_base(".hidden"), "hidden");
    }

    #[test]
    fn test_stored_image_name() {
        assert_eq!(
            stored_image_name("My Car.PNG", "png", 1700000000000),
            "1700000000000-MyCar.png"
        );
    }

    #[tokio::test]
    async fn test_save_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path().to_str().unwrap());

        let name = svc.save_image(&image("car.webp", 16)).await.unwrap();
        assert!(name.ends_with("-car.webp"));
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn test_save_image_rejects_type_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path().to_str().unwrap());

        assert!(matches!(
            svc.save_image(&image("car.gif", 16)).await,
            Err(AppError::ValidationError(_))
        ));
        let too_big = svc.max_image_bytes() + 1;
        assert!(matches!(
            svc.save_image(&image("car.png", too_big)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path().to_str().unwrap());
        let result = svc.create(PrizeForm::default(), None).await;
        assert!(
            matches!(result, Err(AppError::ValidationError(msg)) if msg == IMAGE_REQUIRED_MESSAGE)
        );
    }
}
