use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_id: Uuid,
    pub amount_inr: i64,
    pub currency: String,
    pub gateway: String,
    /// Locally generated receipt identifier.
    pub receipt: String,
    /// Gateway order id, attached once checkout completes.
    pub order_id: Option<String>,
    /// Gateway payment id, attached once checkout completes.
    pub payment_ref: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A completed purchase joined with its material and payment details,
/// as listed on the "my purchases" page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseDetails {
    pub id: Uuid,
    pub material_id: Uuid,
    pub amount_inr: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,

    pub title: String,
    pub description: String,
    pub class_level: Option<String>,
    pub pdf_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price_inr: i64,

    pub receipt: String,
    pub order_id: Option<String>,
    pub payment_ref: Option<String>,
    pub gateway: String,
    pub paid_at: DateTime<Utc>,

    pub last_downloaded: Option<DateTime<Utc>>,
}
