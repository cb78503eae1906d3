use async_trait::async_trait;
use chrono::{DateTime, Utc};
use imgvault_core::{AppError, Image, NewImage, StorageProvider};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence operations on image metadata.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Insert a row; timestamps are assigned by the database.
    async fn insert(&self, image: NewImage) -> Result<Image, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, AppError>;

    /// Delete a row. Returns `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    filename: String,
    url: String,
    description: Option<String>,
    original_name: Option<String>,
    mime_type: Option<String>,
    file_size: Option<i64>,
    storage_provider: StorageProvider,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ImageRow {
    fn into_image(self) -> Image {
        Image {
            id: self.id,
            filename: self.filename,
            url: self.url,
            description: self.description,
            original_name: self.original_name,
            mime_type: self.mime_type,
            file_size: self.file_size,
            storage_provider: self.storage_provider,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    #[tracing::instrument(skip(self, image), fields(db.table = "images", db.record_id = %image.id))]
    async fn insert(&self, image: NewImage) -> Result<Image, AppError> {
        let row = sqlx::query_as::<Postgres, ImageRow>(
            r#"
            INSERT INTO images (id, filename, url, description, original_name, mime_type, file_size, storage_provider)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, filename, url, description, original_name, mime_type, file_size,
                      storage_provider, created_at, updated_at
            "#,
        )
        .bind(image.id)
        .bind(&image.filename)
        .bind(&image.url)
        .bind(&image.description)
        .bind(&image.original_name)
        .bind(&image.mime_type)
        .bind(image.file_size)
        .bind(image.storage_provider)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_image())
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, AppError> {
        let row = sqlx::query_as::<Postgres, ImageRow>(
            r#"
            SELECT id, filename, url, description, original_name, mime_type, file_size,
                   storage_provider, created_at, updated_at
            FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ImageRow::into_image))
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
