use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::material::{DownloadGrant, Material};
use crate::database::models::subject::Subject;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Material not found")]
    MaterialNotFound,
    #[error("Purchase required")]
    PurchaseRequired,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub chapters: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub subject_id: Option<Uuid>,
    pub class_level: Option<String>,
    #[serde(default = "default_material_type")]
    pub material_type: String,
    pub content: Option<String>,
    pub pdf_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub price_inr: i64,
}

fn default_material_type() -> String {
    "pdf".to_string()
}

pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub async fn new() -> Result<Self, CatalogError> {
        let pool = DatabaseManager::app_pool().await?;
        Ok(Self { pool })
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>, CatalogError> {
        let subjects =
            sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(subjects)
    }

    pub async fn create_subject(&self, new: NewSubject) -> Result<Subject, CatalogError> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, description, icon, chapters)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.icon)
        .bind(new.chapters)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn list_materials(
        &self,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Material>, CatalogError> {
        let materials = match subject_id {
            Some(subject_id) => {
                sqlx::query_as::<_, Material>(
                    "SELECT * FROM materials WHERE subject_id = $1 ORDER BY created_at DESC",
                )
                .bind(subject_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Material>("SELECT * FROM materials ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(materials)
    }

    pub async fn get_material(&self, material_id: Uuid) -> Result<Material, CatalogError> {
        sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CatalogError::MaterialNotFound)
    }

    pub async fn create_material(&self, new: NewMaterial) -> Result<Material, CatalogError> {
        let is_free = new.price_inr <= 0;

        let material = sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials
                (title, description, subject_id, class_level, material_type,
                 content, pdf_url, thumbnail_url, price_inr, is_free)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.subject_id)
        .bind(&new.class_level)
        .bind(&new.material_type)
        .bind(&new.content)
        .bind(&new.pdf_url)
        .bind(&new.thumbnail_url)
        .bind(new.price_inr.max(0))
        .bind(is_free)
        .fetch_one(&self.pool)
        .await?;

        Ok(material)
    }

    /// Grant a download: free materials are open to any signed-in user, paid
    /// ones require a completed purchase. Bumps the counter and records the
    /// download for the purchase history view.
    pub async fn record_download(
        &self,
        user_id: Uuid,
        material_id: Uuid,
    ) -> Result<DownloadGrant, CatalogError> {
        let material = self.get_material(material_id).await?;

        if !material.is_free && !self.has_completed_purchase(user_id, material_id).await? {
            return Err(CatalogError::PurchaseRequired);
        }

        let (downloads,): (i64,) = sqlx::query_as(
            "UPDATE materials SET downloads = downloads + 1 WHERE id = $1 RETURNING downloads",
        )
        .bind(material_id)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query("INSERT INTO material_downloads (user_id, material_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(material_id)
            .execute(&self.pool)
            .await?;

        Ok(DownloadGrant {
            material_id,
            pdf_url: material.pdf_url,
            downloads,
        })
    }

    pub async fn has_completed_purchase(
        &self,
        user_id: Uuid,
        material_id: Uuid,
    ) -> Result<bool, CatalogError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM purchases
            WHERE user_id = $1 AND material_id = $2 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .bind(material_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}
