use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject_id: Option<Uuid>,
    pub class_level: Option<String>,
    pub material_type: String,
    pub content: Option<String>,
    pub pdf_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Price in whole rupees; 0 means the material is free.
    pub price_inr: i64,
    pub is_free: bool,
    pub downloads: i64,
    pub created_at: DateTime<Utc>,
}

/// Returned by the download endpoint after access is granted.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadGrant {
    pub material_id: Uuid,
    pub pdf_url: Option<String>,
    pub downloads: i64,
}
